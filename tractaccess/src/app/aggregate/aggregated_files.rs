use super::AggregationError;
use regex::Regex;
use std::path::{Path, PathBuf};
use tractaccess_core::model::AnalysisOption;

const EPOCH_SUFFIX: &str = r"_(\d+)\.csv$";

/// the most recent aggregated file of each analysis option in a directory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedFiles {
    pub option1: Option<PathBuf>,
    pub option2: Option<PathBuf>,
    pub option3: Option<PathBuf>,
    /// count of candidate files per option
    pub counts: [usize; 3],
}

impl AggregatedFiles {
    pub fn discover(directory: &Path) -> Result<AggregatedFiles, AggregationError> {
        let mut result = AggregatedFiles::default();
        for option in AnalysisOption::ALL {
            let files = list_aggregated(directory, option)?;
            let idx = option.number() as usize - 1;
            result.counts[idx] = files.len();
            let latest = latest(files);
            match option {
                AnalysisOption::Option1 => result.option1 = latest,
                AnalysisOption::Option2 => result.option2 = latest,
                AnalysisOption::Option3 => result.option3 = latest,
            }
        }
        Ok(result)
    }

    pub fn get(&self, option: AnalysisOption) -> Option<&Path> {
        match option {
            AnalysisOption::Option1 => self.option1.as_deref(),
            AnalysisOption::Option2 => self.option2.as_deref(),
            AnalysisOption::Option3 => self.option3.as_deref(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.option1.is_some() && self.option2.is_some() && self.option3.is_some()
    }

    pub fn log_counts(&self) {
        for option in AnalysisOption::ALL {
            log::info!(
                "{option}: found {} aggregated files",
                self.counts[option.number() as usize - 1]
            );
        }
    }
}

/// files in `directory` named `Option{N}_aggregated_*.csv`, sorted by name.
/// a missing directory has no files.
pub fn list_aggregated(
    directory: &Path,
    option: AnalysisOption,
) -> Result<Vec<PathBuf>, AggregationError> {
    if !directory.is_dir() {
        return Ok(vec![]);
    }
    let prefix = option.aggregated_prefix();
    let entries = std::fs::read_dir(directory).map_err(|e| AggregationError::Directory {
        path: directory.to_string_lossy().to_string(),
        source: e,
    })?;
    let mut files = vec![];
    for entry in entries {
        let entry = entry.map_err(|e| AggregationError::Directory {
            path: directory.to_string_lossy().to_string(),
            source: e,
        })?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with(&prefix) && name.ends_with(".csv") {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// the most recent aggregated file of `option` in `directory`
pub fn find_latest_aggregated(
    directory: &Path,
    option: AnalysisOption,
) -> Result<Option<PathBuf>, AggregationError> {
    Ok(latest(list_aggregated(directory, option)?))
}

/// largest trailing epoch wins. equal or missing epochs fall back to the
/// lexicographically last name.
fn latest(files: Vec<PathBuf>) -> Option<PathBuf> {
    let regex = Regex::new(EPOCH_SUFFIX).ok();
    files.into_iter().max_by_key(|p| {
        let name = p
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        (epoch(regex.as_ref(), &name), name)
    })
}

fn epoch(regex: Option<&Regex>, filename: &str) -> Option<u64> {
    regex?
        .captures(filename)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), "to_id\n").unwrap();
    }

    #[test]
    fn test_largest_epoch_wins() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "Option1_aggregated_information_5locations_to_2hospitals__1719917624.csv");
        touch(dir.path(), "Option1_aggregated_information_5locations_to_2hospitals__999.csv");
        touch(dir.path(), "Option1_travel_times_5locations_to_2hospitals_2000000000.csv");
        touch(dir.path(), "Option2_aggregated_information_5locations_to_2hospitals__5.csv");
        let latest = find_latest_aggregated(dir.path(), AnalysisOption::Option1)
            .unwrap()
            .unwrap();
        assert!(latest.to_string_lossy().ends_with("__1719917624.csv"));

        let files = AggregatedFiles::discover(dir.path()).unwrap();
        assert_eq!(files.counts, [2, 1, 0]);
        assert!(!files.is_complete());
        assert!(files.get(AnalysisOption::Option3).is_none());
    }

    #[test]
    fn test_missing_epoch_falls_back_to_name() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "Option3_aggregated_a.csv");
        touch(dir.path(), "Option3_aggregated_b.csv");
        let latest = find_latest_aggregated(dir.path(), AnalysisOption::Option3)
            .unwrap()
            .unwrap();
        assert!(latest.to_string_lossy().ends_with("Option3_aggregated_b.csv"));
    }

    #[test]
    fn test_missing_directory_has_no_files() {
        let files = list_aggregated(Path::new("/nonexistent/county"), AnalysisOption::Option1);
        assert!(files.unwrap().is_empty());
    }
}
