use super::{
    filter_residential, join_parcels, load_tracts, select_hospitals, write_license_summary,
    PrepError,
};
use crate::{
    config::{normalize_county_name, PipelineConfiguration},
    model::{
        spatial::{FeatureSource, PointShapefileWriter, ShapefileField, TractIndex},
        table::{write_rows, ParcelAverageRow, ParcelRow, TractRow},
    },
};
use std::{path::Path, time::Instant};
use tractaccess_core::model::{AnalysisOption, Origin, Parcel};

pub const HOSPITALS_FILENAME: &str = "hospitals_within_buffer.csv";

/// counts of what the preparation stage wrote
#[derive(Debug, Clone, PartialEq)]
pub struct PrepSummary {
    pub county: String,
    pub tracts: usize,
    pub parcels: usize,
    pub unmatched_parcels: usize,
    pub tracts_with_parcels: usize,
    pub hospitals: usize,
}

/// prepares one county: reads the tract, parcel and hospital datasets of the
/// state and writes the three origin sets and the hospital set to the county
/// directory.
pub fn run(
    conf: &PipelineConfiguration,
    county_name: &str,
    state_name: &str,
) -> Result<PrepSummary, PrepError> {
    let start_time = Instant::now();
    let county = normalize_county_name(county_name);
    let rules = conf.land_use.build()?;
    let rule = rules
        .rule(&county)
        .ok_or_else(|| PrepError::UnknownCounty {
            county: county.clone(),
            known: rules.county_names().join(", "),
        })?;
    let naming = conf.county_naming(&county, &rules);
    let layout = &conf.layout;
    let county_directory = layout.county_directory(&county);
    std::fs::create_dir_all(&county_directory).map_err(|e| PrepError::Directory {
        path: county_directory.to_string_lossy().to_string(),
        source: e,
    })?;

    // tracts
    let tract_source = conf.tract_source(state_name);
    let tract_layer = tract_source.read()?;
    log::info!(
        "read {} tracts from {}, elapsed {:.1} sec",
        tract_layer.len(),
        tract_source.file().display(),
        start_time.elapsed().as_secs_f64()
    );
    let tracts = load_tracts(&tract_layer, &naming.tract_label(&county))?;
    drop(tract_layer);
    let option1_path = layout.county_file(&county, AnalysisOption::Option1.origin_filename());
    let n = write_rows(&option1_path, tracts.arena.iter().map(TractRow::from))?;
    log::info!(
        "wrote {n} tract centroids to {}, elapsed {:.1} sec",
        option1_path.display(),
        start_time.elapsed().as_secs_f64()
    );

    // parcels
    let parcel_source = FeatureSource::Shapefile {
        file: layout.parcel_shapefile(&county),
        epsg: conf.prep.parcel_epsg,
    };
    let parcel_layer = parcel_source.read()?;
    let residential = filter_residential(&parcel_layer, rule)?;
    if residential.is_empty() {
        return Err(PrepError::EmptyParcels {
            path: parcel_layer.name.clone(),
            county: county.clone(),
            before: parcel_layer.len(),
        });
    }
    drop(parcel_layer);
    let n_residential = residential.len();
    let index = TractIndex::new(tracts.polygons);
    let join = join_parcels(residential, &index)?;
    if join.parcels.is_empty() {
        return Err(PrepError::NoMatchedParcels {
            county: county.clone(),
            residential: n_residential,
        });
    }
    log::info!(
        "matched {} parcels to tracts, elapsed {:.1} sec",
        join.parcels.len(),
        start_time.elapsed().as_secs_f64()
    );

    let averages = Origin::parcel_averages(&join.parcels);
    let option2_path = layout.county_file(&county, AnalysisOption::Option2.origin_filename());
    let n = write_rows(&option2_path, averages.iter().map(ParcelAverageRow::from))?;
    log::info!("wrote {n} parcel average points to {}", option2_path.display());

    let option3_path = layout.county_file(&county, AnalysisOption::Option3.origin_filename());
    let n = write_rows(&option3_path, join.parcels.iter().map(ParcelRow::from))?;
    log::info!("wrote {n} residential parcels to {}", option3_path.display());

    if conf.prep.write_parcel_shapefile {
        let shapefile_path = layout.parcel_output_shapefile(&county);
        let n = write_parcel_shapefile(&shapefile_path, &join.parcels)?;
        log::info!(
            "wrote {n} parcels to {}, elapsed {:.1} sec",
            shapefile_path.display(),
            start_time.elapsed().as_secs_f64()
        );
    }

    // hospitals
    let hospital_source = FeatureSource::Shapefile {
        file: layout.hospital_shapefile(state_name),
        epsg: conf.prep.hospital_epsg,
    };
    let hospital_layer = hospital_source.read()?;
    let summary_path = layout.county_file(
        &county,
        &format!("{county}_hospitals_physicians_count.csv"),
    );
    write_license_summary(&hospital_layer, &county, &conf.hospitals, &summary_path)?;
    let center = tracts
        .arena
        .mean_centroid()
        .ok_or_else(|| PrepError::EmptyTracts {
            path: tract_source.file().to_string_lossy().to_string(),
            field: String::from("COUNTY"),
            label: naming.tract_label(&county),
        })?;
    let selection = select_hospitals(&hospital_layer, center, &conf.hospitals);
    if selection.hospitals.is_empty() {
        return Err(PrepError::EmptyHospitals {
            path: hospital_layer.name.clone(),
            radius_miles: conf.hospitals.radius_miles,
        });
    }
    let hospitals_path = layout.county_file(&county, HOSPITALS_FILENAME);
    let n = write_rows(&hospitals_path, selection.hospitals.iter())?;
    log::info!(
        "wrote {n} hospitals to {}, elapsed {:.1} sec",
        hospitals_path.display(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(PrepSummary {
        county,
        tracts: tracts.arena.len(),
        parcels: join.parcels.len(),
        unmatched_parcels: join.unmatched,
        tracts_with_parcels: averages.len(),
        hospitals: selection.hospitals.len(),
    })
}

fn write_parcel_shapefile(path: &Path, parcels: &[Parcel]) -> Result<usize, PrepError> {
    let character = |name: &str, length: u8| ShapefileField::Character {
        name: name.to_string(),
        length,
    };
    let numeric = |name: &str, length: u8, decimals: u8| ShapefileField::Numeric {
        name: name.to_string(),
        length,
        decimals,
    };
    let fields = vec![
        numeric("new_index", 18, 0),
        numeric("poly_idx", 10, 0),
        numeric("pt_idx", 10, 0),
        numeric("latitude", 19, 11),
        numeric("longitude", 19, 11),
        character("ALTPARNO", 64),
        character("NPARNO", 64),
        character("PARUSEDESC", 128),
    ];
    let mut writer = PointShapefileWriter::create(path, fields)?;
    for parcel in parcels.iter() {
        writer.write(
            parcel.longitude,
            parcel.latitude,
            &[
                Some(parcel.key.to_string()),
                Some(parcel.tract_id.to_string()),
                Some(parcel.local_sequence.to_string()),
                Some(parcel.latitude.to_string()),
                Some(parcel.longitude.to_string()),
                parcel.altparno.clone(),
                parcel.nparno.clone(),
                Some(parcel.land_use.clone()),
            ],
        )?;
    }
    Ok(writer.finish())
}
