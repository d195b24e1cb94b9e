use super::stats;
use crate::model::TopXSummary;

/// summarizes the worst-case accessibility of a tract: the `x` largest of its
/// parcels' minimum travel times, where `x` is the tract's count of households
/// without a vehicle.
///
/// the selection sorts descending with a stable sort, so equal travel times
/// keep their input order. when `x` is missing, `x <= 0`, or the tract has
/// fewer than `x` parcels, only `num_parcels` is reported.
pub fn worst_case_top_x(parcel_min_travel_times: &[f64], x: Option<i64>) -> TopXSummary {
    let num_parcels = parcel_min_travel_times.len();
    let x = match x {
        Some(x) if x > 0 && num_parcels as i64 >= x => x as usize,
        _ => return TopXSummary::empty(num_parcels),
    };

    let mut descending = parcel_min_travel_times.to_vec();
    descending.sort_by(|a, b| b.total_cmp(a));
    descending.truncate(x);
    let top_x_values = descending;

    let min_top_x = stats::min(&top_x_values);
    let max_top_x = stats::max(&top_x_values);
    let range_top_x = match (min_top_x, max_top_x) {
        (Some(lo), Some(hi)) => Some(hi - lo),
        _ => None,
    };
    TopXSummary {
        min_top_x,
        max_top_x,
        avg_top_x: stats::mean(&top_x_values),
        median_top_x: stats::median(&top_x_values),
        range_top_x,
        std_dev_top_x: stats::population_std_dev(&top_x_values),
        num_parcels,
        top_x_values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_takes_largest_values() {
        let s = worst_case_top_x(&[5.0, 12.0, 8.0, 20.0], Some(2));
        assert_eq!(s.top_x_values, vec![20.0, 12.0]);
        assert_eq!(s.min_top_x, Some(12.0));
        assert_eq!(s.max_top_x, Some(20.0));
        assert_eq!(s.avg_top_x, Some(16.0));
        assert_eq!(s.median_top_x, Some(16.0));
        assert_eq!(s.range_top_x, Some(8.0));
        assert_relative_eq!(s.std_dev_top_x.unwrap(), 4.0);
        assert_eq!(s.num_parcels, 4);
    }

    #[test]
    fn test_ordering_invariants_hold() {
        let times = [3.0, 17.5, 9.25, 9.25, 40.0, 1.0, 22.0];
        for x in 1..=times.len() as i64 {
            let s = worst_case_top_x(&times, Some(x));
            let (lo, med, hi) = (s.min_top_x.unwrap(), s.median_top_x.unwrap(), s.max_top_x.unwrap());
            assert!(lo <= med && med <= hi);
            assert_relative_eq!(s.range_top_x.unwrap(), hi - lo);
            assert_eq!(s.top_x_values.len(), x as usize);
        }
    }

    #[test]
    fn test_not_enough_parcels_is_empty() {
        let s = worst_case_top_x(&[5.0, 12.0], Some(3));
        assert!(s.is_empty());
        assert_eq!(s.avg_top_x, None);
        assert_eq!(s.std_dev_top_x, None);
        assert_eq!(s.num_parcels, 2);
    }

    #[test]
    fn test_non_positive_or_missing_x_is_empty() {
        for x in [Some(0), Some(-999), None] {
            let s = worst_case_top_x(&[5.0, 12.0], x);
            assert!(s.is_empty());
            assert_eq!(s.min_top_x, None);
            assert_eq!(s.num_parcels, 2);
        }
        let s = worst_case_top_x(&[], Some(1));
        assert_eq!(s.num_parcels, 0);
        assert!(s.is_empty());
    }
}
