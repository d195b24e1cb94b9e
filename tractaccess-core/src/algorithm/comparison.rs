//! builds the comparison table consumed by the plots from either the raw
//! per-option aggregates or the per-tract combined table.
use super::stats;
use crate::model::{AggregateRow, CombinedTractRow, ComparisonRow};

/// places the per-origin aggregates of the three options side by side by row
/// position. the columns have different lengths (tracts vs. parcels) and the
/// shorter ones are padded with empty values.
///
/// `avg_all_parcel` receives each Option 3 row's `min_travel_time` and
/// `avg_top_x` the mean of that row's defined `min`, `second_min` and
/// `third_min` travel times.
pub fn from_aggregates(
    option1: &[AggregateRow],
    option2: &[AggregateRow],
    option3: &[AggregateRow],
) -> Vec<ComparisonRow> {
    let n = option1.len().max(option2.len()).max(option3.len());
    (0..n)
        .map(|idx| {
            let parcel = option3.get(idx);
            ComparisonRow {
                option1: option1.get(idx).map(|r| r.min_travel_time),
                option2: option2.get(idx).map(|r| r.min_travel_time),
                avg_all_parcel: parcel.map(|r| r.min_travel_time),
                avg_top_x: parcel.and_then(mean_of_three_smallest),
            }
        })
        .collect()
}

/// one row per tract from the combined table
pub fn from_combined(rows: &[CombinedTractRow]) -> Vec<ComparisonRow> {
    rows.iter()
        .map(|row| ComparisonRow {
            option1: row.option1_min_travel_time,
            option2: row.option2_min_travel_time,
            avg_all_parcel: stats::mean(&row.option3_min_travel_times),
            avg_top_x: row.top_x.avg_top_x,
        })
        .collect()
}

fn mean_of_three_smallest(row: &AggregateRow) -> Option<f64> {
    let defined: Vec<f64> = [
        Some(row.min_travel_time),
        row.second_min_travel_time,
        row.third_min_travel_time,
    ]
    .into_iter()
    .flatten()
    .filter(|v| v.is_finite())
    .collect();
    stats::mean(&defined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ComparisonColumn, TopXSummary, Tract, TractId};
    use approx::assert_relative_eq;

    fn row(to_id: u64, times: &[f64]) -> AggregateRow {
        AggregateRow {
            to_id,
            min_travel_time: times[0],
            second_min_travel_time: times.get(1).copied(),
            third_min_travel_time: times.get(2).copied(),
            median_travel_time: times[0],
            average_travel_time: times[0],
            q1_travel_time: times[0],
            q3_travel_time: times[0],
        }
    }

    #[test]
    fn test_aggregates_are_padded_by_position() {
        let option1 = vec![row(1, &[10.0])];
        let option2 = vec![row(1, &[11.0]), row(2, &[12.0])];
        let option3 = vec![row(10001, &[3.0, 6.0, 9.0]), row(10002, &[4.0]), row(20001, &[5.0, 7.0])];
        let table = from_aggregates(&option1, &option2, &option3);
        assert_eq!(table.len(), 3);
        assert_eq!(table[0].option1, Some(10.0));
        assert_eq!(table[1].option1, None);
        assert_eq!(table[2].option2, None);
        assert_eq!(table[0].avg_all_parcel, Some(3.0));
        assert_relative_eq!(table[0].avg_top_x.unwrap(), 6.0);
        assert_relative_eq!(table[1].avg_top_x.unwrap(), 4.0);
        assert_relative_eq!(table[2].avg_top_x.unwrap(), 6.0);
        assert_eq!(table[2].get(ComparisonColumn::Option3Average), Some(5.0));
    }

    #[test]
    fn test_from_combined() {
        let tract = Tract {
            id: TractId(1),
            source_index: 0,
            object_id: None,
            latitude: 35.0,
            longitude: -78.0,
            e_noveh: Some(1.0),
            m_noveh: None,
            shape_metrics: Default::default(),
        };
        let combined = CombinedTractRow {
            tract,
            option1_min_travel_time: Some(12.0),
            option2_min_travel_time: None,
            option3_min_travel_times: vec![10.0, 20.0],
            top_x: TopXSummary {
                avg_top_x: Some(20.0),
                ..TopXSummary::empty(2)
            },
            abs_option1_minus3: Some(8.0),
            abs_option2_minus3: None,
        };
        let table = from_combined(&[combined]);
        assert_eq!(
            table,
            vec![ComparisonRow {
                option1: Some(12.0),
                option2: None,
                avg_all_parcel: Some(15.0),
                avg_top_x: Some(20.0),
            }]
        );
    }
}
