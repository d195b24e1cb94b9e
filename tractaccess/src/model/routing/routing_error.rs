#[derive(thiserror::Error, Debug)]
pub enum RoutingError {
    #[error("road network extract '{0}' not found")]
    NetworkNotFound(String),
    #[error("invalid routing request: {0}")]
    InvalidRequest(String),
    #[error("failed to start routing command '{program}': {source}")]
    CommandStart {
        program: String,
        source: std::io::Error,
    },
    #[error("routing command '{program}' exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("failure with routing file '{path}': {message}")]
    File { path: String, message: String },
    #[error("routing command '{program}' finished without writing '{path}'")]
    MissingOutput { program: String, path: String },
    #[error("routing result pairs hospital {from_id} with origin {to_id}, which is not part of the request")]
    UnexpectedPair { from_id: u64, to_id: u64 },
    #[error("no routing engine configured, set [routing.engine] to external_command (or crow_fly for a network-free estimate)")]
    EngineNotConfigured,
}
