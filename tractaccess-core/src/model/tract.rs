use super::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// identifier of a census tract within a single pipeline run, written to
/// files as `poly_idx`. assigned once, from row order after the county filter,
/// and never recomputed by later stages.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(transparent)]
pub struct TractId(pub u32);

impl TractId {
    pub fn as_u64(&self) -> u64 {
        self.0 as u64
    }
}

impl Display for TractId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// optional polygon shape quality metrics carried by the SVI tract dataset
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ShapeMetrics {
    pub area: Option<f64>,
    pub perimeter: Option<f64>,
    pub pp_score_n: Option<f64>,
    pub schwartz_n: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Tract {
    pub id: TractId,
    /// row position of this tract in the source dataset, before filtering
    pub source_index: usize,
    pub object_id: Option<i64>,
    pub latitude: f64,
    pub longitude: f64,
    /// estimated count of households without a vehicle
    pub e_noveh: Option<f64>,
    /// margin of error of `e_noveh`
    pub m_noveh: Option<f64>,
    pub shape_metrics: ShapeMetrics,
}

impl Tract {
    /// the size of the worst-case parcel subset for this tract, `round(E_NOVEH)`.
    /// rounds half to even. `None` when the estimate is missing or not finite.
    pub fn carless_households(&self) -> Option<i64> {
        self.e_noveh
            .filter(|v| v.is_finite())
            .map(|v| v.round_ties_even() as i64)
    }
}

/// all tracts of one county for one pipeline run, indexed by [`TractId`].
#[derive(Debug, Clone, Default)]
pub struct TractArena {
    tracts: Vec<Tract>,
}

impl TractArena {
    /// builds the arena from filtered source rows, assigning ids 1..=n in row order.
    pub fn from_rows<T, F>(rows: impl IntoIterator<Item = T>, build: F) -> TractArena
    where
        F: Fn(TractId, T) -> Tract,
    {
        let tracts = rows
            .into_iter()
            .enumerate()
            .map(|(idx, row)| build(TractId(idx as u32 + 1), row))
            .collect();
        TractArena { tracts }
    }

    /// rebuilds an arena from tracts read back from disk. the ids must be the
    /// dense 1..=n sequence that [`TractArena::from_rows`] produced.
    pub fn from_tracts(tracts: Vec<Tract>) -> Result<TractArena, ModelError> {
        for (row, tract) in tracts.iter().enumerate() {
            if tract.id.0 as usize != row + 1 {
                return Err(ModelError::NonSequentialTractId {
                    found: tract.id,
                    row,
                });
            }
        }
        Ok(TractArena { tracts })
    }

    pub fn get(&self, id: TractId) -> Option<&Tract> {
        (id.0 as usize)
            .checked_sub(1)
            .and_then(|idx| self.tracts.get(idx))
    }

    pub fn contains(&self, id: TractId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tract> {
        self.tracts.iter()
    }

    pub fn len(&self) -> usize {
        self.tracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracts.is_empty()
    }

    /// mean of the tract centroids as (latitude, longitude)
    pub fn mean_centroid(&self) -> Option<(f64, f64)> {
        if self.tracts.is_empty() {
            return None;
        }
        let n = self.tracts.len() as f64;
        let lat = self.tracts.iter().map(|t| t.latitude).sum::<f64>() / n;
        let lon = self.tracts.iter().map(|t| t.longitude).sum::<f64>() / n;
        Some((lat, lon))
    }
}
