use tractaccess_core::algorithm::stats;

/// the five numbers of a box-and-whisker glyph. whiskers reach the most
/// extreme values within 1.5 IQR of the box, values beyond are outliers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    /// `None` for an empty column. NaN values are dropped.
    pub fn new(values: &[f64]) -> Option<BoxSummary> {
        let sorted = stats::sorted(values);
        let q1 = stats::quantile_sorted(&sorted, 0.25)?;
        let median = stats::quantile_sorted(&sorted, 0.5)?;
        let q3 = stats::quantile_sorted(&sorted, 0.75)?;
        let iqr = q3 - q1;
        let lower_fence = q1 - 1.5 * iqr;
        let upper_fence = q3 + 1.5 * iqr;
        let inside = sorted
            .iter()
            .copied()
            .filter(|v| *v >= lower_fence && *v <= upper_fence)
            .collect::<Vec<_>>();
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < lower_fence || *v > upper_fence)
            .collect::<Vec<_>>();
        Some(BoxSummary {
            q1,
            median,
            q3,
            lower_whisker: inside.first().copied().unwrap_or(q1),
            upper_whisker: inside.last().copied().unwrap_or(q3),
            outliers,
        })
    }

    pub fn lowest(&self) -> f64 {
        self.outliers
            .iter()
            .copied()
            .fold(self.lower_whisker, f64::min)
    }

    pub fn highest(&self) -> f64 {
        self.outliers
            .iter()
            .copied()
            .fold(self.upper_whisker, f64::max)
    }
}

/// y range covering every summary with a 5% margin
pub fn auto_range(summaries: &[&BoxSummary]) -> Option<(f64, f64)> {
    let lo = summaries.iter().map(|s| s.lowest()).reduce(f64::min)?;
    let hi = summaries.iter().map(|s| s.highest()).reduce(f64::max)?;
    let margin = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
    Some((lo - margin, hi + margin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_whiskers_and_outliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 100.0];
        let s = BoxSummary::new(&values).unwrap();
        assert_eq!(s.q1, 3.0);
        assert_eq!(s.median, 5.0);
        assert_eq!(s.q3, 7.0);
        assert_eq!(s.lower_whisker, 1.0);
        assert_eq!(s.upper_whisker, 8.0);
        assert_eq!(s.outliers, vec![100.0]);
        assert_eq!(s.highest(), 100.0);
    }

    #[test]
    fn test_empty_and_constant_columns() {
        assert!(BoxSummary::new(&[]).is_none());
        assert!(BoxSummary::new(&[f64::NAN]).is_none());
        let s = BoxSummary::new(&[4.0, 4.0]).unwrap();
        let (lo, hi) = auto_range(&[&s]).unwrap();
        assert_relative_eq!(lo, 3.0);
        assert_relative_eq!(hi, 5.0);
    }
}
