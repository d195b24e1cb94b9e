#[derive(thiserror::Error, Debug)]
pub enum TableError {
    #[error("failed reading '{path}': {message}")]
    Read { path: String, message: String },
    #[error("failed writing '{path}': {message}")]
    Write { path: String, message: String },
    #[error("file '{path}' missing {column} column")]
    MissingColumn { path: String, column: String },
    #[error("file '{path}' row {row} column {column}: {message}")]
    InvalidValue {
        path: String,
        row: usize,
        column: String,
        message: String,
    },
}
