use super::PrepError;
use crate::{config::HospitalConfiguration, model::spatial::FeatureLayer};
use std::path::Path;
use tractaccess_core::{algorithm::search_buffer::SearchBuffer, model::Hospital};

#[derive(Debug, Clone)]
pub struct HospitalSelection {
    pub hospitals: Vec<Hospital>,
    pub buffer: SearchBuffer,
    /// hospitals in the source dataset with a location
    pub candidates: usize,
}

/// the hospitals strictly inside the square buffer around `center`
/// (latitude, longitude), numbered 1, 2, 3, ... in source order
pub fn select_hospitals(
    layer: &FeatureLayer,
    center: (f64, f64),
    conf: &HospitalConfiguration,
) -> HospitalSelection {
    let (latitude, longitude) = center;
    let buffer = SearchBuffer::around(
        latitude,
        longitude,
        conf.radius_miles,
        conf.miles_per_degree,
    );
    let locations = layer
        .features
        .iter()
        .filter_map(|f| f.location())
        .map(|p| (p.y(), p.x()))
        .collect::<Vec<_>>();
    let hospitals = buffer
        .select(locations.iter(), |(lat, lon)| (*lat, *lon))
        .into_iter()
        .enumerate()
        .map(|(idx, (lat, lon))| Hospital {
            id: idx as u64 + 1,
            latitude: *lat,
            longitude: *lon,
        })
        .collect::<Vec<_>>();
    log::info!(
        "{} of {} hospitals within {} miles of ({latitude:.5}, {longitude:.5})",
        hospitals.len(),
        locations.len(),
        conf.radius_miles
    );
    HospitalSelection {
        hospitals,
        buffer,
        candidates: locations.len(),
    }
}

/// writes the id and license count of the hospitals located in `county`.
/// returns `None` without writing when the dataset lacks the configured
/// fields or has no hospital in the county.
pub fn write_license_summary(
    layer: &FeatureLayer,
    county: &str,
    conf: &HospitalConfiguration,
    path: &Path,
) -> Result<Option<usize>, PrepError> {
    if !layer.has_field(&conf.county_field) {
        log::info!(
            "hospital dataset has no '{}' field, skipping license summary",
            conf.county_field
        );
        return Ok(None);
    }
    let in_county = layer
        .features
        .iter()
        .filter(|f| f.text(&conf.county_field).as_deref() == Some(county))
        .collect::<Vec<_>>();
    if in_county.is_empty()
        || !layer.has_field(&conf.license_field)
        || !layer.has_field(&conf.id_field)
    {
        log::info!(
            "no '{}' values for hospitals in {county}, skipping license summary",
            conf.license_field
        );
        return Ok(None);
    }
    let write_error = |e: csv::Error| crate::model::table::TableError::Write {
        path: path.to_string_lossy().to_string(),
        message: e.to_string(),
    };
    let mut writer = csv::Writer::from_path(path).map_err(write_error)?;
    writer
        .write_record([conf.id_field.as_str(), conf.license_field.as_str()])
        .map_err(write_error)?;
    for f in in_county.iter() {
        let id = f.text(&conf.id_field).unwrap_or_default();
        let license = f.text(&conf.license_field).unwrap_or_default();
        writer.write_record([id, license]).map_err(write_error)?;
    }
    writer
        .flush()
        .map_err(|e| crate::model::table::TableError::Write {
            path: path.to_string_lossy().to_string(),
            message: e.to_string(),
        })?;
    log::info!(
        "wrote license counts of {} hospitals to {}",
        in_county.len(),
        path.display()
    );
    Ok(Some(in_county.len()))
}
