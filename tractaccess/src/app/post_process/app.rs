use super::ComparisonSource;
use crate::{
    app::aggregate::{AggregatedFiles, AggregationError, COMBINED_FILENAME},
    config::{normalize_county_name, PipelineConfiguration},
    model::table::{read_combined, read_rows, write_rows},
};
use std::path::PathBuf;
use tractaccess_core::{
    algorithm::comparison::{from_aggregates, from_combined},
    model::{AggregateRow, ComparisonRow},
};

pub const COMPARISON_FILENAME: &str = "customized_combined_output_AFTER.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct PostProcessOutput {
    pub path: PathBuf,
    pub rows: usize,
}

/// writes the comparison table of a county. `source` overrides the
/// configured source. returns `None` when the inputs of the chosen source
/// do not exist yet.
pub fn run(
    conf: &PipelineConfiguration,
    county_name: &str,
    source: Option<ComparisonSource>,
) -> Result<Option<PostProcessOutput>, AggregationError> {
    let county = normalize_county_name(county_name);
    let source = source.unwrap_or(conf.post_process.source);
    let layout = &conf.layout;
    log::info!("building comparison table of {county} from {source}");
    let rows = match source {
        ComparisonSource::AggregatedFiles => {
            let files = AggregatedFiles::discover(&layout.county_directory(&county))?;
            match (&files.option1, &files.option2, &files.option3) {
                (Some(a), Some(b), Some(c)) => {
                    let option1 = read_rows::<AggregateRow>(a)?;
                    let option2 = read_rows::<AggregateRow>(b)?;
                    let option3 = read_rows::<AggregateRow>(c)?;
                    log::info!(
                        "aligning {} Option1, {} Option2 and {} Option3 rows by position",
                        option1.len(),
                        option2.len(),
                        option3.len()
                    );
                    from_aggregates(&option1, &option2, &option3)
                }
                _ => {
                    log::warn!("the aggregated files of all three options are required");
                    files.log_counts();
                    return Ok(None);
                }
            }
        }
        ComparisonSource::CombinedTractTable => {
            let combined_path = layout.county_file(&county, COMBINED_FILENAME);
            if !combined_path.exists() {
                log::warn!(
                    "{} not found, run the `aggregate` stage first",
                    combined_path.display()
                );
                return Ok(None);
            }
            from_combined(&read_combined(&combined_path)?)
        }
    };

    let path = layout.county_file(&county, COMPARISON_FILENAME);
    let n = write_rows(&path, rows.iter())?;
    log::info!("wrote {n} comparison rows to {}", path.display());
    Ok(Some(PostProcessOutput { path, rows: n }))
}

/// reads a comparison table written by [`run`]
pub fn read_comparison(path: &std::path::Path) -> Result<Vec<ComparisonRow>, AggregationError> {
    Ok(read_rows::<ComparisonRow>(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataLayout;
    use std::path::Path;

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
    fn test_aggregated_files_are_aligned_by_position() {
        let dir = tempfile::tempdir().unwrap();
        let conf = test_configuration(dir.path());
        let county_dir = conf.layout.county_directory("Wake");
        std::fs::create_dir_all(&county_dir).unwrap();
        let header = "to_id,min_travel_time,second_min_travel_time,third_min_travel_time,median_travel_time,average_travel_time,q1_travel_time,q3_travel_time\n";
        std::fs::write(
            county_dir.join("Option1_aggregated_information_1locations_to_3hospitals__7.csv"),
            format!("{header}1,10.0,12.0,15.0,12.0,12.3,11.0,13.5\n"),
        )
        .unwrap();
        std::fs::write(
            county_dir.join("Option2_aggregated_information_1locations_to_3hospitals__7.csv"),
            format!("{header}1,9.0,11.0,14.0,11.0,11.3,10.0,12.5\n"),
        )
        .unwrap();
        std::fs::write(
            county_dir.join("Option3_aggregated_information_2locations_to_3hospitals__7.csv"),
            format!("{header}10001,3.0,6.0,9.0,6.0,6.0,4.5,7.5\n10002,4.0,,,4.0,4.0,4.0,4.0\n"),
        )
        .unwrap();

        let output = run(&conf, "WAKE", None).unwrap().unwrap();
        assert_eq!(output.rows, 2);
        let contents = std::fs::read_to_string(&output.path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Option1_aggregated_min_travel_time,Option2_aggregated_min_travel_time,avg_all_parcel,avg_top_x"
        );
        let rows = read_comparison(&output.path).unwrap();
        assert_eq!(rows[0].option1, Some(10.0));
        assert_eq!(rows[0].avg_all_parcel, Some(3.0));
        assert_eq!(rows[0].avg_top_x, Some(6.0));
        assert_eq!(rows[1].option1, None);
        assert_eq!(rows[1].option2, None);
        assert_eq!(rows[1].avg_top_x, Some(4.0));
    }

    #[test]
    fn test_missing_combined_table_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let conf = test_configuration(dir.path());
        let result = run(&conf, "Wake", Some(ComparisonSource::CombinedTractTable)).unwrap();
        assert!(result.is_none());
    }
}
