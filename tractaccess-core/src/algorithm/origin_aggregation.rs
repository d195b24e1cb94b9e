use super::stats;
use crate::model::{AggregateRow, TravelTimeRecord};
use std::collections::BTreeMap;

/// reduces a travel time matrix to one [`AggregateRow`] per destination-of-record
/// (`to_id`, the residence side of the query), in ascending id order.
///
/// unreachable pairs are ignored. an id whose pairs are all unreachable gets
/// no row. having fewer than two (three) reachable hospitals is not an error:
/// the second (third) minimum is left empty.
pub fn aggregate_by_destination(records: &[TravelTimeRecord]) -> Vec<AggregateRow> {
    let mut groups: BTreeMap<u64, Vec<f64>> = BTreeMap::new();
    for record in records.iter() {
        if let Some(t) = record.reachable_time() {
            groups.entry(record.to_id).or_default().push(t);
        }
    }
    groups
        .into_iter()
        .filter_map(|(to_id, times)| aggregate_times(to_id, &times))
        .collect()
}

/// count of distinct `to_id`s that have no reachable hospital at all
pub fn count_unreachable_destinations(records: &[TravelTimeRecord]) -> usize {
    let mut reachable: BTreeMap<u64, bool> = BTreeMap::new();
    for record in records.iter() {
        let entry = reachable.entry(record.to_id).or_insert(false);
        *entry = *entry || record.reachable_time().is_some();
    }
    reachable.values().filter(|r| !**r).count()
}

fn aggregate_times(to_id: u64, times: &[f64]) -> Option<AggregateRow> {
    let sorted = stats::sorted(times);
    let row = AggregateRow {
        to_id,
        min_travel_time: *sorted.first()?,
        second_min_travel_time: sorted.get(1).copied(),
        third_min_travel_time: sorted.get(2).copied(),
        median_travel_time: stats::quantile_sorted(&sorted, 0.5)?,
        average_travel_time: stats::mean(&sorted)?,
        q1_travel_time: stats::quantile_sorted(&sorted, 0.25)?,
        q3_travel_time: stats::quantile_sorted(&sorted, 0.75)?,
    };
    Some(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rec(from_id: u64, to_id: u64, travel_time: Option<f64>) -> TravelTimeRecord {
        TravelTimeRecord {
            from_id,
            to_id,
            travel_time,
        }
    }

    #[test]
    fn test_aggregate_rows() {
        let records = vec![
            rec(1, 10, Some(12.0)),
            rec(2, 10, Some(4.0)),
            rec(3, 10, Some(8.0)),
            rec(4, 10, Some(20.0)),
            rec(1, 20, Some(15.0)),
        ];
        let rows = aggregate_by_destination(&records);
        assert_eq!(rows.len(), 2);
        let r = &rows[0];
        assert_eq!(r.to_id, 10);
        assert_eq!(r.min_travel_time, 4.0);
        assert_eq!(r.second_min_travel_time, Some(8.0));
        assert_eq!(r.third_min_travel_time, Some(12.0));
        assert_relative_eq!(r.median_travel_time, 10.0);
        assert_relative_eq!(r.average_travel_time, 11.0);
        assert_relative_eq!(r.q1_travel_time, 7.0);
        assert_relative_eq!(r.q3_travel_time, 14.0);
        assert!(r.q1_travel_time <= r.median_travel_time && r.median_travel_time <= r.q3_travel_time);
    }

    #[test]
    fn test_single_reachable_hospital_leaves_second_and_third_empty() {
        let records = vec![rec(1, 7, Some(9.5)), rec(2, 7, None), rec(3, 7, Some(f64::NAN))];
        let rows = aggregate_by_destination(&records);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].min_travel_time, 9.5);
        assert_eq!(rows[0].second_min_travel_time, None);
        assert_eq!(rows[0].third_min_travel_time, None);
        assert_eq!(rows[0].median_travel_time, 9.5);
    }

    #[test]
    fn test_unreachable_destinations_have_no_row() {
        let records = vec![rec(1, 7, None), rec(1, 8, Some(3.0))];
        let rows = aggregate_by_destination(&records);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].to_id, 8);
        assert_eq!(count_unreachable_destinations(&records), 1);
    }
}
