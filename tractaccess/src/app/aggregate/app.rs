use super::{AggregatedFiles, AggregationError};
use crate::{
    config::{normalize_county_name, PipelineConfiguration},
    model::table::{read_rows, write_combined, write_combined_before, ParcelRow, TractRow},
};
use std::{
    path::{Path, PathBuf},
    time::Instant,
};
use tractaccess_core::{
    algorithm::combine::{combine_tracts, group_parcel_times},
    model::{AggregateRow, AnalysisOption, ParcelTractLookup, Tract, TractArena},
};

pub const COMBINED_BEFORE_FILENAME: &str = "customized_combined_output_BEFORE.csv";
pub const COMBINED_FILENAME: &str = "customized_combined_output.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct AggregationOutput {
    pub before_path: PathBuf,
    pub combined_path: PathBuf,
    pub tracts: usize,
    /// tracts with a complete worst-case summary
    pub tracts_with_top_x: usize,
    /// Option 3 rows whose tract is not among the county's tracts
    pub orphaned_parcels: usize,
}

/// combines the most recent aggregated file of each option with the county's
/// tracts. returns `None` when any option has no aggregated file yet.
pub fn run(
    conf: &PipelineConfiguration,
    county_name: &str,
) -> Result<Option<AggregationOutput>, AggregationError> {
    let start_time = Instant::now();
    let county = normalize_county_name(county_name);
    let layout = &conf.layout;
    let county_directory = layout.county_directory(&county);
    let files = AggregatedFiles::discover(&county_directory)?;
    let (option1_path, option2_path, option3_path) =
        match (&files.option1, &files.option2, &files.option3) {
            (Some(a), Some(b), Some(c)) => (a, b, c),
            _ => {
                log::warn!(
                    "aggregated files of all three options are required in {}, run `travel-time` for the missing options",
                    county_directory.display()
                );
                files.log_counts();
                return Ok(None);
            }
        };

    let tract_path = layout.county_file(&county, AnalysisOption::Option1.origin_filename());
    let arena = read_tract_arena(&tract_path)?;
    let option1 = read_aggregates(option1_path)?;
    let option2 = read_aggregates(option2_path)?;
    let option3 = read_aggregates(option3_path)?;

    let parcel_path = layout.county_file(&county, AnalysisOption::Option3.origin_filename());
    let lookup = if parcel_path.exists() {
        let parcels = read_rows::<ParcelRow>(&parcel_path)?;
        ParcelTractLookup::new(parcels.iter().map(|p| (p.key(), p.tract_id())))
    } else {
        log::warn!(
            "parcel table {} not found, resolving parcel tracts from their keys",
            parcel_path.display()
        );
        ParcelTractLookup::decode_only()
    };
    let parcel_times = group_parcel_times(&arena, &option3, &lookup)?;
    if parcel_times.orphaned > 0 {
        log::warn!(
            "{} Option3 rows belong to tracts that are not in {}",
            parcel_times.orphaned,
            tract_path.display()
        );
    }
    let rows = combine_tracts(&arena, &option1, &option2, &parcel_times);
    let tracts_with_top_x = rows.iter().filter(|r| !r.top_x.is_empty()).count();
    log::info!(
        "combined {} tracts, {tracts_with_top_x} with a worst-case summary, elapsed {:.1} sec",
        rows.len(),
        start_time.elapsed().as_secs_f64()
    );

    let before_path = layout.county_file(&county, COMBINED_BEFORE_FILENAME);
    let n = write_combined_before(&before_path, &rows)?;
    log::info!("wrote {n} rows to {}", before_path.display());
    let combined_path = layout.county_file(&county, COMBINED_FILENAME);
    let n = write_combined(&combined_path, &rows)?;
    log::info!(
        "wrote {n} rows to {}, elapsed {:.1} sec",
        combined_path.display(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(Some(AggregationOutput {
        before_path,
        combined_path,
        tracts: rows.len(),
        tracts_with_top_x,
        orphaned_parcels: parcel_times.orphaned,
    }))
}

fn read_tract_arena(path: &Path) -> Result<TractArena, AggregationError> {
    if !path.exists() {
        return Err(AggregationError::MissingInput {
            path: path.to_string_lossy().to_string(),
            stage: String::from("prep"),
        });
    }
    let tracts = read_rows::<TractRow>(path)?
        .into_iter()
        .map(Tract::from)
        .collect::<Vec<_>>();
    let arena = TractArena::from_tracts(tracts)?;
    log::info!("read {} tracts from {}", arena.len(), path.display());
    Ok(arena)
}

fn read_aggregates(path: &Path) -> Result<Vec<AggregateRow>, AggregationError> {
    let rows = read_rows::<AggregateRow>(path)?;
    log::info!("read {} aggregated rows from {}", rows.len(), path.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::DataLayout, model::table::read_combined};
    use tractaccess_core::model::{ParcelKey, TractId};

    const AGGREGATE_HEADER: &str = "to_id,min_travel_time,second_min_travel_time,third_min_travel_time,median_travel_time,average_travel_time,q1_travel_time,q3_travel_time\n";

    fn test_configuration(dir: &Path) -> PipelineConfiguration {
        PipelineConfiguration {
            layout: DataLayout {
                data_directory: dir.to_path_buf(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn write_aggregate(dir: &Path, name: &str, rows: &[(u64, f64)]) {
        let mut contents = String::from(AGGREGATE_HEADER);
        for (to_id, min) in rows {
            contents.push_str(&format!("{to_id},{min},,,{min},{min},{min},{min}\n"));
        }
        std::fs::write(dir.join(name), contents).unwrap();
    }

    fn write_tracts(dir: &Path) {
        std::fs::write(
            dir.join("Option1_county_centroids.csv"),
            "source_index,OBJECTID,poly_idx,latitude,longitude,E_NOVEH,M_NOVEH,area,perimeter,pp_score_n,schwartz_n\n\
             4,101,1,36.0,-77.0,2.0,1.0,,,,\n\
             9,102,2,36.1,-77.1,5.0,1.0,,,,\n",
        )
        .unwrap();
    }

    #[test]
    fn test_missing_option_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let conf = test_configuration(dir.path());
        let county_dir = conf.layout.county_directory("Bertie");
        std::fs::create_dir_all(&county_dir).unwrap();
        write_aggregate(&county_dir, "Option1_aggregated_information_2locations_to_1hospitals__1.csv", &[(1, 10.0)]);
        let result = run(&conf, "bertie").unwrap();
        assert!(result.is_none());
        assert!(!county_dir.join(COMBINED_FILENAME).exists());
    }

    #[test]
    fn test_combines_three_options() {
        let dir = tempfile::tempdir().unwrap();
        let conf = test_configuration(dir.path());
        let county_dir = conf.layout.county_directory("Bertie");
        std::fs::create_dir_all(&county_dir).unwrap();
        write_tracts(&county_dir);
        write_aggregate(&county_dir, "Option1_aggregated_information_2locations_to_1hospitals__1.csv", &[(1, 12.0), (2, 14.0)]);
        // an older file that must be ignored
        write_aggregate(&county_dir, "Option1_aggregated_information_2locations_to_1hospitals__0.csv", &[(1, 99.0)]);
        write_aggregate(&county_dir, "Option2_aggregated_information_1locations_to_1hospitals__1.csv", &[(1, 11.0)]);
        write_aggregate(
            &county_dir,
            "Option3_aggregated_information_3locations_to_1hospitals__1.csv",
            &[(10001, 10.0), (10002, 30.0), (10003, 20.0)],
        );

        let output = run(&conf, "Bertie").unwrap().unwrap();
        assert_eq!(output.tracts, 2);
        assert_eq!(output.tracts_with_top_x, 1);
        assert_eq!(output.orphaned_parcels, 0);

        let rows = read_combined(&output.combined_path).unwrap();
        assert_eq!(rows[0].tract.id, TractId(1));
        assert_eq!(rows[0].option1_min_travel_time, Some(12.0));
        assert_eq!(rows[0].option2_min_travel_time, Some(11.0));
        assert_eq!(rows[0].option3_min_travel_times, vec![10.0, 30.0, 20.0]);
        assert_eq!(rows[0].top_x.top_x_values, vec![30.0, 20.0]);
        assert_eq!(rows[0].top_x.avg_top_x, Some(25.0));
        assert_eq!(rows[0].abs_option1_minus3, Some(13.0));
        assert_eq!(rows[0].abs_option2_minus3, Some(14.0));
        // five car-less households but no parcels
        assert_eq!(rows[1].option2_min_travel_time, None);
        assert_eq!(rows[1].top_x.num_parcels, 0);
        assert_eq!(rows[1].top_x.avg_top_x, None);

        let before = std::fs::read_to_string(&output.before_path).unwrap();
        assert!(before.lines().next().unwrap().ends_with("Option3_aggregated_min_travel_time_list"));
    }

    #[test]
    fn test_parcel_table_disagreement_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let conf = test_configuration(dir.path());
        let county_dir = conf.layout.county_directory("Bertie");
        std::fs::create_dir_all(&county_dir).unwrap();
        write_tracts(&county_dir);
        std::fs::write(
            county_dir.join("Option3_residential_parcel_centroids.csv"),
            "new_index,poly_idx,pt_idx,latitude,longitude,ALTPARNO,NPARNO,PARUSEDESC,geometry_wkt\n\
             10001,2,1,36.0,-77.0,,,RESIDENTIAL,POINT (-77.0 36.0)\n",
        )
        .unwrap();
        write_aggregate(&county_dir, "Option1_aggregated_information_2locations_to_1hospitals__1.csv", &[(1, 12.0)]);
        write_aggregate(&county_dir, "Option2_aggregated_information_1locations_to_1hospitals__1.csv", &[(1, 11.0)]);
        write_aggregate(&county_dir, "Option3_aggregated_information_1locations_to_1hospitals__1.csv", &[(10001, 10.0)]);
        match run(&conf, "Bertie") {
            Err(AggregationError::InconsistentParcelKey {
                key,
                recorded,
                encoded,
            }) => {
                assert_eq!(key, ParcelKey(10001));
                assert_eq!(recorded, TractId(2));
                assert_eq!(encoded, TractId(1));
            }
            other => panic!("expected inconsistent parcel key, found {other:?}"),
        }
    }
}
