use super::{MatrixRequest, RoutingEngine, RoutingError};
use std::{
    path::{Path, PathBuf},
    process::Command,
};
use tractaccess_core::model::{Origin, TravelTimeRecord};

const FROM_FILENAME: &str = "routing_from.csv";
const TO_FILENAME: &str = "routing_to.csv";
const OUTPUT_FILENAME: &str = "routing_output.csv";

/// delegates the matrix to an external router run as a blocking subprocess.
/// the point sets are handed over as `id,latitude,longitude` csv files and the
/// router must write `from_id,to_id,travel_time` (minutes, empty when
/// unreachable) to the output path.
///
/// every call gets its own temporary directory under the request's work
/// directory, removed when the call returns, so concurrent runs for one county
/// never share files and an output can only come from this call.
pub struct ExternalCommandEngine {
    program: String,
    args: Vec<String>,
    network: PathBuf,
}

impl ExternalCommandEngine {
    pub fn new(program: String, args: Vec<String>, network: PathBuf) -> ExternalCommandEngine {
        ExternalCommandEngine {
            program,
            args,
            network,
        }
    }

    fn substitute(&self, arg: &str, request: &MatrixRequest, files: &[PathBuf; 3]) -> String {
        arg.replace("{network}", &self.network.to_string_lossy())
            .replace("{from}", &files[0].to_string_lossy())
            .replace("{to}", &files[1].to_string_lossy())
            .replace("{output}", &files[2].to_string_lossy())
            .replace(
                "{departure}",
                &request.departure.format("%Y-%m-%dT%H:%M:%S").to_string(),
            )
            .replace("{mode}", request.mode.as_str())
    }
}

impl RoutingEngine for ExternalCommandEngine {
    fn name(&self) -> &str {
        &self.program
    }

    fn travel_time_matrix(
        &self,
        request: &MatrixRequest,
    ) -> Result<Vec<TravelTimeRecord>, RoutingError> {
        let work_dir = tempfile::Builder::new()
            .prefix("routing_")
            .tempdir_in(&request.work_directory)
            .map_err(|e| file_error(&request.work_directory, e))?;
        let files = [
            work_dir.path().join(FROM_FILENAME),
            work_dir.path().join(TO_FILENAME),
            work_dir.path().join(OUTPUT_FILENAME),
        ];
        write_points(&files[0], &request.from)?;
        write_points(&files[1], &request.to)?;

        let args = self
            .args
            .iter()
            .map(|a| self.substitute(a, request, &files))
            .collect::<Vec<_>>();
        log::info!("running {} {}", self.program, args.join(" "));
        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| RoutingError::CommandStart {
                program: self.program.clone(),
                source: e,
            })?;
        if !output.status.success() {
            return Err(RoutingError::CommandFailed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        if !files[2].is_file() {
            return Err(RoutingError::MissingOutput {
                program: self.program.clone(),
                path: files[2].to_string_lossy().to_string(),
            });
        }
        let records = read_records(&files[2])?;
        request.check_records(&records)?;
        Ok(records)
    }
}

fn file_error(path: &Path, e: impl ToString) -> RoutingError {
    RoutingError::File {
        path: path.to_string_lossy().to_string(),
        message: e.to_string(),
    }
}

fn write_points(path: &Path, points: &[Origin]) -> Result<(), RoutingError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| file_error(path, e))?;
    for point in points.iter() {
        writer.serialize(point).map_err(|e| file_error(path, e))?;
    }
    writer.flush().map_err(|e| file_error(path, e))?;
    Ok(())
}

fn read_records(path: &Path) -> Result<Vec<TravelTimeRecord>, RoutingError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| file_error(path, e))?;
    reader
        .deserialize::<TravelTimeRecord>()
        .enumerate()
        .map(|(row, r)| r.map_err(|e| file_error(path, format!("row {row}: {e}"))))
        .collect()
}
