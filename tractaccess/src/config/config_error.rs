#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{msg}: {source}")]
    ConfigReadError {
        msg: String,
        source: config::ConfigError,
    },
    #[error("failed reading '{filepath}': {error}")]
    ReadError { filepath: String, error: String },
    #[error("failure decoding {filepath}: {error}")]
    DecodeError { filepath: String, error: String },
    #[error("unsupported configuration file type: {0}")]
    UnsupportedFileType(String),
    #[error("invalid configuration: {0}")]
    InvalidValue(String),
}
