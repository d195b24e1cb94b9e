use super::{RoutingError, TransportMode};
use chrono::NaiveDateTime;
use std::{collections::HashSet, path::PathBuf};
use tractaccess_core::model::{Hospital, Origin, TravelTimeRecord};

/// an all-pairs travel time query. hospitals are the `from` side and
/// residences the `to` side, so results group by the residence in `to_id`.
#[derive(Debug, Clone)]
pub struct MatrixRequest {
    pub from: Vec<Origin>,
    pub to: Vec<Origin>,
    pub mode: TransportMode,
    pub departure: NaiveDateTime,
    /// directory for intermediate files of engines that need them
    pub work_directory: PathBuf,
}

impl MatrixRequest {
    pub fn from_hospitals(
        hospitals: &[Hospital],
        residences: Vec<Origin>,
        mode: TransportMode,
        departure: NaiveDateTime,
        work_directory: PathBuf,
    ) -> MatrixRequest {
        let from = hospitals
            .iter()
            .map(|h| Origin::new(h.id, h.latitude, h.longitude))
            .collect();
        MatrixRequest {
            from,
            to: residences,
            mode,
            departure,
            work_directory,
        }
    }

    pub fn n_pairs(&self) -> usize {
        self.from.len() * self.to.len()
    }

    /// fails on the first record whose ids are not among the requested points
    pub fn check_records(&self, records: &[TravelTimeRecord]) -> Result<(), RoutingError> {
        let from_ids = self.from.iter().map(|o| o.id).collect::<HashSet<_>>();
        let to_ids = self.to.iter().map(|o| o.id).collect::<HashSet<_>>();
        match records
            .iter()
            .find(|r| !from_ids.contains(&r.from_id) || !to_ids.contains(&r.to_id))
        {
            Some(r) => Err(RoutingError::UnexpectedPair {
                from_id: r.from_id,
                to_id: r.to_id,
            }),
            None => Ok(()),
        }
    }
}
