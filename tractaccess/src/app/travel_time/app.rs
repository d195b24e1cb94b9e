use super::TravelTimeError;
use crate::{
    app::prep::HOSPITALS_FILENAME,
    config::{normalize_county_name, PipelineConfiguration},
    model::{
        routing::{MatrixRequest, RoutingEngine, RoutingError},
        table::{read_origins, read_rows, write_rows},
    },
};
use std::{
    path::{Path, PathBuf},
    time::Instant,
};
use tractaccess_core::{
    algorithm::origin_aggregation::{aggregate_by_destination, count_unreachable_destinations},
    model::{AnalysisOption, Hospital},
};

/// files written by one travel time run
#[derive(Debug, Clone, PartialEq)]
pub struct TravelTimeOutput {
    pub travel_times_path: PathBuf,
    pub aggregated_path: PathBuf,
    pub n_records: usize,
    pub n_aggregated: usize,
    pub n_unreachable: usize,
}

/// builds the routing engine over `state_data/osm/{osm_name}.osm.pbf` and
/// computes the travel times of one analysis option of a county.
pub fn run(
    conf: &PipelineConfiguration,
    county_name: &str,
    state_name: &str,
    option: AnalysisOption,
    osm_name: &str,
) -> Result<TravelTimeOutput, TravelTimeError> {
    let county = normalize_county_name(county_name);
    let network = conf.layout.osm_extract(osm_name);
    log::info!(
        "building {} network for {state_name} from {}",
        conf.routing.mode,
        network.display()
    );
    let engine = conf
        .routing
        .engine
        .as_ref()
        .ok_or(RoutingError::EngineNotConfigured)?
        .build(&network)?;
    let epoch = chrono::Utc::now().timestamp();
    compute(conf, &county, option, engine.as_ref(), epoch)
}

/// reads the origins of `option` and the selected hospitals of `county`,
/// queries `engine`, and writes the raw and aggregated tables stamped with
/// `epoch`.
pub fn compute(
    conf: &PipelineConfiguration,
    county: &str,
    option: AnalysisOption,
    engine: &dyn RoutingEngine,
    epoch: i64,
) -> Result<TravelTimeOutput, TravelTimeError> {
    let start_time = Instant::now();
    let layout = &conf.layout;
    let origin_path = layout.county_file(county, option.origin_filename());
    let hospital_path = layout.county_file(county, HOSPITALS_FILENAME);
    require_input(&origin_path)?;
    require_input(&hospital_path)?;

    let origins = read_origins(&origin_path, option.origin_id_column())?;
    if origins.is_empty() {
        return Err(TravelTimeError::NoOrigins(
            origin_path.to_string_lossy().to_string(),
        ));
    }
    let hospitals = read_rows::<Hospital>(&hospital_path)?;
    if hospitals.is_empty() {
        return Err(TravelTimeError::NoHospitals(
            hospital_path.to_string_lossy().to_string(),
        ));
    }
    let n_origins = origins.len();
    let n_hospitals = hospitals.len();
    log::info!(
        "{option}: computing travel times from {n_hospitals} hospitals to {n_origins} origins of {county} with engine '{}'",
        engine.name()
    );

    let request = MatrixRequest::from_hospitals(
        &hospitals,
        origins,
        conf.routing.mode,
        conf.routing.departure,
        layout.county_directory(county),
    );
    let expected = request.n_pairs();
    let records = engine.travel_time_matrix(&request)?;
    request.check_records(&records)?;
    if records.len() > expected {
        return Err(TravelTimeError::IncompleteMatrix {
            expected,
            found: records.len(),
        });
    }
    let n_unreachable_pairs = records
        .iter()
        .filter(|r| r.reachable_time().is_none())
        .count();
    if n_unreachable_pairs > 0 || records.len() < expected {
        log::warn!(
            "{option}: {n_unreachable_pairs} of {} returned pairs are unreachable, {} pairs were not returned",
            records.len(),
            expected - records.len()
        );
    }
    log::info!(
        "{option}: travel time matrix of {} records computed, elapsed {:.1} sec",
        records.len(),
        start_time.elapsed().as_secs_f64()
    );

    let travel_times_path = layout.county_file(
        county,
        &option.travel_times_filename(n_origins, n_hospitals, epoch),
    );
    let n_records = write_rows(&travel_times_path, records.iter())?;
    log::info!("wrote {n_records} travel times to {}", travel_times_path.display());

    let aggregated = aggregate_by_destination(&records);
    let n_unreachable = count_unreachable_destinations(&records);
    if n_unreachable > 0 {
        log::warn!("{option}: {n_unreachable} origins cannot reach any hospital and are left out of the aggregate");
    }
    let aggregated_path = layout.county_file(
        county,
        &option.aggregated_filename(n_origins, n_hospitals, epoch),
    );
    let n_aggregated = write_rows(&aggregated_path, aggregated.iter())?;
    log::info!(
        "wrote {n_aggregated} aggregated rows to {}, elapsed {:.1} sec",
        aggregated_path.display(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(TravelTimeOutput {
        travel_times_path,
        aggregated_path,
        n_records,
        n_aggregated,
        n_unreachable,
    })
}

fn require_input(path: &Path) -> Result<(), TravelTimeError> {
    if path.exists() {
        Ok(())
    } else {
        Err(TravelTimeError::MissingInput {
            path: path.to_string_lossy().to_string(),
            stage: String::from("prep"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::DataLayout, model::routing::CrowFlyEngine};
    use tractaccess_core::model::{AggregateRow, TravelTimeRecord};

    fn test_configuration(dir: &Path) -> PipelineConfiguration {
        PipelineConfiguration {
            layout: DataLayout {
                data_directory: dir.to_path_buf(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_compute_writes_raw_and_aggregated_tables() {
        let dir = tempfile::tempdir().unwrap();
        let conf = test_configuration(dir.path());
        let county_dir = conf.layout.county_directory("Bertie");
        std::fs::create_dir_all(&county_dir).unwrap();
        std::fs::write(
            county_dir.join("Option2_county_centroids.csv"),
            "county_index,latitude,longitude\n1,36.0,-77.0\n2,36.1,-77.1\n",
        )
        .unwrap();
        std::fs::write(
            county_dir.join(HOSPITALS_FILENAME),
            "ID,latitude,longitude\n1,36.0,-77.0\n2,36.5,-77.5\n3,35.8,-76.9\n",
        )
        .unwrap();
        let engine = CrowFlyEngine::new(1.3, 30.0);
        let output = compute(&conf, "Bertie", AnalysisOption::Option2, &engine, 1700000000).unwrap();

        assert_eq!(output.n_records, 6);
        assert_eq!(output.n_aggregated, 2);
        assert_eq!(output.n_unreachable, 0);
        assert_eq!(
            output.travel_times_path.file_name().unwrap().to_string_lossy(),
            "Option2_travel_times_2locations_to_3hospitals_1700000000.csv"
        );
        assert_eq!(
            output.aggregated_path.file_name().unwrap().to_string_lossy(),
            "Option2_aggregated_information_2locations_to_3hospitals__1700000000.csv"
        );

        let records = read_rows::<TravelTimeRecord>(&output.travel_times_path).unwrap();
        assert_eq!(records.len(), 6);
        let rows = read_rows::<AggregateRow>(&output.aggregated_path).unwrap();
        assert_eq!(rows.iter().map(|r| r.to_id).collect::<Vec<_>>(), vec![1, 2]);
        // origin 1 sits on hospital 1
        assert_eq!(rows[0].min_travel_time, 0.0);
        assert!(rows[0].second_min_travel_time.unwrap() <= rows[0].third_min_travel_time.unwrap());
    }

    /// replays a fixed result regardless of the request
    struct ReplayEngine(Vec<TravelTimeRecord>);

    impl RoutingEngine for ReplayEngine {
        fn name(&self) -> &str {
            "replay"
        }

        fn travel_time_matrix(
            &self,
            _request: &MatrixRequest,
        ) -> Result<Vec<TravelTimeRecord>, RoutingError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_records_of_another_option_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let conf = test_configuration(dir.path());
        let county_dir = conf.layout.county_directory("Bertie");
        std::fs::create_dir_all(&county_dir).unwrap();
        std::fs::write(
            county_dir.join("Option3_residential_parcel_centroids.csv"),
            "new_index,latitude,longitude\n10001,36.0,-77.0\n10002,36.1,-77.1\n",
        )
        .unwrap();
        std::fs::write(
            county_dir.join(HOSPITALS_FILENAME),
            "ID,latitude,longitude\n1,36.0,-77.0\n",
        )
        .unwrap();
        // tract level ids, as an Option 1 run would return them
        let engine = ReplayEngine(vec![
            TravelTimeRecord {
                from_id: 1,
                to_id: 1,
                travel_time: Some(5.0),
            },
            TravelTimeRecord {
                from_id: 1,
                to_id: 2,
                travel_time: Some(7.0),
            },
        ]);
        let result = compute(&conf, "Bertie", AnalysisOption::Option3, &engine, 0);
        assert!(matches!(
            result,
            Err(TravelTimeError::Routing(RoutingError::UnexpectedPair { to_id: 1, .. }))
        ));
        let written = std::fs::read_dir(&county_dir).unwrap().count();
        assert_eq!(written, 2);
    }

    #[test]
    fn test_run_requires_a_configured_engine() {
        let dir = tempfile::tempdir().unwrap();
        let conf = test_configuration(dir.path());
        assert!(conf.routing.engine.is_none());
        let result = run(&conf, "Bertie", "North Carolina", AnalysisOption::Option1, "nc");
        assert!(matches!(
            result,
            Err(TravelTimeError::Routing(RoutingError::EngineNotConfigured))
        ));
    }

    #[test]
    fn test_missing_hospitals_points_to_prep() {
        let dir = tempfile::tempdir().unwrap();
        let conf = test_configuration(dir.path());
        let county_dir = conf.layout.county_directory("Bertie");
        std::fs::create_dir_all(&county_dir).unwrap();
        std::fs::write(
            county_dir.join("Option1_county_centroids.csv"),
            "poly_idx,latitude,longitude\n1,36.0,-77.0\n",
        )
        .unwrap();
        let engine = CrowFlyEngine::new(1.3, 30.0);
        let result = compute(&conf, "Bertie", AnalysisOption::Option1, &engine, 0);
        match result {
            Err(TravelTimeError::MissingInput { path, stage }) => {
                assert!(path.ends_with(HOSPITALS_FILENAME));
                assert_eq!(stage, "prep");
            }
            other => panic!("expected missing input, found {other:?}"),
        }
    }
}
