use crate::model::table::TableError;
use tractaccess_core::model::{ModelError, ParcelKey, TractId};

#[derive(thiserror::Error, Debug)]
pub enum AggregationError {
    #[error("input file '{path}' not found, run the `{stage}` stage first")]
    MissingInput { path: String, stage: String },
    #[error("failure listing directory '{path}': {source}")]
    Directory {
        path: String,
        source: std::io::Error,
    },
    #[error("parcel {key} is recorded in tract {recorded} but its key encodes tract {encoded}, the parcel table and the Option3 results disagree")]
    InconsistentParcelKey {
        key: ParcelKey,
        recorded: TractId,
        encoded: TractId,
    },
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Model(ModelError),
}

impl From<ModelError> for AggregationError {
    fn from(value: ModelError) -> Self {
        match value {
            ModelError::InconsistentParcelKey {
                key,
                recorded,
                encoded,
            } => AggregationError::InconsistentParcelKey {
                key,
                recorded,
                encoded,
            },
            other => AggregationError::Model(other),
        }
    }
}
