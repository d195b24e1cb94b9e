use super::{ParcelKey, TractId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("tract {tract} has more than {max} parcels, its parcel keys would collide with tract {next}")]
    ParcelCapacityExceeded {
        tract: TractId,
        max: u32,
        next: TractId,
    },
    #[error("parcel local sequence numbers start at 1, found 0 in tract {0}")]
    InvalidLocalSequence(TractId),
    #[error("tract ids must be sequential from 1, found {found} at row {row}")]
    NonSequentialTractId { found: TractId, row: usize },
    #[error("invalid analysis option {0}, must be one of 1, 2, 3")]
    InvalidAnalysisOption(u8),
    #[error("parcel {key} is recorded in tract {recorded} but its key encodes tract {encoded}")]
    InconsistentParcelKey {
        key: ParcelKey,
        recorded: TractId,
        encoded: TractId,
    },
    #[error("unknown comparison column '{0}'")]
    UnknownComparisonColumn(String),
}
