use super::top_x::worst_case_top_x;
use crate::model::{
    AggregateRow, CombinedTractRow, ModelError, ParcelKey, ParcelTractLookup, TractArena, TractId,
};
use std::collections::{BTreeMap, HashMap};

/// Option 3 per-parcel minimum travel times grouped by parent tract
#[derive(Debug, Clone, Default)]
pub struct ParcelTimesByTract {
    pub groups: BTreeMap<TractId, Vec<f64>>,
    /// parcels whose tract is not part of the arena
    pub orphaned: usize,
}

/// resolves each Option 3 aggregate row to its tract and collects the
/// `min_travel_time` values per tract, keeping the aggregate row order.
pub fn group_parcel_times(
    arena: &TractArena,
    option3: &[AggregateRow],
    lookup: &ParcelTractLookup,
) -> Result<ParcelTimesByTract, ModelError> {
    let mut result = ParcelTimesByTract::default();
    for row in option3.iter() {
        let tract_id = lookup.resolve(ParcelKey(row.to_id))?;
        if arena.contains(tract_id) {
            result
                .groups
                .entry(tract_id)
                .or_default()
                .push(row.min_travel_time);
        } else {
            result.orphaned += 1;
        }
    }
    Ok(result)
}

/// joins the per-origin minima of all three options onto the tract arena.
/// Option 1 and 2 rows join on `to_id == poly_idx`; tracts without a row get
/// an empty minimum.
pub fn combine_tracts(
    arena: &TractArena,
    option1: &[AggregateRow],
    option2: &[AggregateRow],
    option3: &ParcelTimesByTract,
) -> Vec<CombinedTractRow> {
    let option1_lookup = min_lookup(option1);
    let option2_lookup = min_lookup(option2);
    arena
        .iter()
        .map(|tract| {
            let option1_min = option1_lookup.get(&tract.id.as_u64()).copied();
            let option2_min = option2_lookup.get(&tract.id.as_u64()).copied();
            let parcel_times = option3.groups.get(&tract.id).cloned().unwrap_or_default();
            let top_x = worst_case_top_x(&parcel_times, tract.carless_households());
            CombinedTractRow {
                tract: tract.clone(),
                option1_min_travel_time: option1_min,
                option2_min_travel_time: option2_min,
                abs_option1_minus3: abs_difference(top_x.avg_top_x, option1_min),
                abs_option2_minus3: abs_difference(top_x.avg_top_x, option2_min),
                option3_min_travel_times: parcel_times,
                top_x,
            }
        })
        .collect()
}

fn min_lookup(rows: &[AggregateRow]) -> HashMap<u64, f64> {
    rows.iter().map(|r| (r.to_id, r.min_travel_time)).collect()
}

fn abs_difference(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some((a - b).abs()),
        _ => None,
    }
}
