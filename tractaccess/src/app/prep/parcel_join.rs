use super::PrepError;
use crate::{
    config::CountyRule,
    model::spatial::{FeatureLayer, TractIndex},
};
use itertools::Itertools;
use kdam::{Bar, BarExt};
use rayon::prelude::*;
use std::sync::{Arc, Mutex};
use tractaccess_core::model::{assign_parcel_keys, Parcel, TractId};

pub const LAND_USE_FIELD: &str = "PARUSEDESC";

/// a parcel point that passed the land use filter, not yet matched to a tract
#[derive(Debug, Clone, PartialEq)]
pub struct ResidentialParcel {
    pub latitude: f64,
    pub longitude: f64,
    pub altparno: Option<String>,
    pub nparno: Option<String>,
    pub land_use: String,
}

/// parcels matched to tracts with their keys assigned
#[derive(Debug, Clone, Default)]
pub struct ParcelJoin {
    pub parcels: Vec<Parcel>,
    /// residential parcels outside every tract of the county
    pub unmatched: usize,
}

/// keeps the parcels whose land use description is allowed by the county's
/// rule. the comparison is exact.
pub fn filter_residential(
    layer: &FeatureLayer,
    rule: &CountyRule,
) -> Result<Vec<ResidentialParcel>, PrepError> {
    layer.require_field(LAND_USE_FIELD)?;
    let counts = layer
        .features
        .iter()
        .filter_map(|f| f.text(LAND_USE_FIELD))
        .counts();
    let distinct = counts
        .iter()
        .sorted()
        .map(|(value, n)| format!("'{value}' ({n})"))
        .join(", ");
    log::info!("{LAND_USE_FIELD} values present: {distinct}");

    let mut without_location = 0;
    let mut residential = vec![];
    for feature in layer.features.iter() {
        let land_use = match feature.text(LAND_USE_FIELD) {
            Some(v) if rule.allows(&v) => v,
            _ => continue,
        };
        let Some(point) = feature.location() else {
            without_location += 1;
            continue;
        };
        residential.push(ResidentialParcel {
            latitude: point.y(),
            longitude: point.x(),
            altparno: feature.text("ALTPARNO"),
            nparno: feature.text("NPARNO"),
            land_use,
        });
    }
    if without_location > 0 {
        log::warn!("{without_location} residential parcels have no location and were skipped");
    }
    log::info!(
        "parcels before land use filter: {}, after: {}",
        layer.len(),
        residential.len()
    );
    Ok(residential)
}

/// matches each parcel to the tract containing it and assigns parcel keys.
/// parcels outside every tract are dropped.
pub fn join_parcels(
    residential: Vec<ResidentialParcel>,
    index: &TractIndex,
) -> Result<ParcelJoin, PrepError> {
    let join_bar = Arc::new(Mutex::new(
        Bar::builder()
            .desc("point in polygon join")
            .total(residential.len())
            .build()
            .map_err(|e| PrepError::Progress(e.to_string()))?,
    ));
    let located: Vec<(Option<TractId>, ResidentialParcel)> = residential
        .into_par_iter()
        .map(|parcel| {
            if let Ok(mut bar) = join_bar.clone().lock() {
                if let Err(e) = bar.update(1) {
                    log::debug!("progress bar update failed: {e}");
                }
            }
            (index.locate(parcel.longitude, parcel.latitude), parcel)
        })
        .collect();
    eprintln!();

    let total = located.len();
    let matched = located
        .into_iter()
        .filter_map(|(tract_id, parcel)| tract_id.map(|id| (id, parcel)))
        .collect_vec();
    let unmatched = total - matched.len();
    if unmatched > 0 {
        log::warn!("{unmatched} of {total} residential parcels fall outside every tract and were dropped");
    }

    let parcels = assign_parcel_keys(matched)?
        .into_iter()
        .map(|(key, p)| Parcel {
            key,
            tract_id: key.encoded_tract_id(),
            local_sequence: key.local_sequence(),
            latitude: p.latitude,
            longitude: p.longitude,
            altparno: p.altparno,
            nparno: p.nparno,
            land_use: p.land_use,
        })
        .collect();
    Ok(ParcelJoin { parcels, unmatched })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::spatial::{AttributeValue, SpatialFeature};
    use geo::{point, polygon, Geometry, MultiPolygon};
    use std::collections::BTreeMap;

    fn parcel_feature(row: usize, x: f64, y: f64, land_use: &str) -> SpatialFeature {
        let mut attributes = BTreeMap::new();
        attributes.insert(
            String::from(LAND_USE_FIELD),
            AttributeValue::Text(land_use.to_string()),
        );
        attributes.insert(
            String::from("ALTPARNO"),
            AttributeValue::Text(format!("P{row}")),
        );
        SpatialFeature {
            row,
            geometry: Geometry::Point(point! { x: x, y: y }),
            attributes,
        }
    }

    fn square(x0: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: x0, y: 0.0),
            (x: x0 + 1.0, y: 0.0),
            (x: x0 + 1.0, y: 1.0),
            (x: x0, y: 1.0),
        ]])
    }

    #[test]
    fn test_filter_and_join() {
        let layer = FeatureLayer {
            name: String::from("parcels.shp"),
            fields: vec![String::from(LAND_USE_FIELD), String::from("ALTPARNO")],
            features: vec![
                parcel_feature(0, 1.5, 0.5, "RESIDENTIAL"),
                parcel_feature(1, 0.5, 0.5, "RESIDENTIAL"),
                parcel_feature(2, 0.6, 0.5, "COMMERCIAL"),
                parcel_feature(3, 0.7, 0.5, "TOWNHOUSE"),
                parcel_feature(4, 5.0, 5.0, "RESIDENTIAL"),
                parcel_feature(5, 1.2, 0.2, "residential"),
            ],
        };
        let rule = CountyRule {
            land_use: vec![String::from("RESIDENTIAL"), String::from("TOWNHOUSE")],
            county_naming: None,
        };
        let residential = filter_residential(&layer, &rule).unwrap();
        assert_eq!(residential.len(), 4);

        let index = TractIndex::new(vec![(TractId(1), square(0.0)), (TractId(2), square(1.0))]);
        let join = join_parcels(residential, &index).unwrap();
        assert_eq!(join.unmatched, 1);
        let keys = join.parcels.iter().map(|p| p.key.0).collect_vec();
        assert_eq!(keys, vec![10001, 10002, 20001]);
        // source order is kept within a tract
        assert_eq!(join.parcels[0].altparno.as_deref(), Some("P1"));
        assert_eq!(join.parcels[1].land_use, "TOWNHOUSE");
        assert_eq!(join.parcels[2].altparno.as_deref(), Some("P0"));
        for p in join.parcels.iter() {
            assert_eq!(p.key.encoded_tract_id(), p.tract_id);
        }
    }
}
