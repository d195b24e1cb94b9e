//! descriptive statistics over travel time samples. quantiles interpolate
//! linearly between order statistics and the standard deviation used for the
//! worst-case subset is the population one, which keeps results comparable
//! with tables produced by pandas/numpy.

/// values sorted ascending, NaN values removed
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    out.sort_by(|a, b| a.total_cmp(b));
    out
}

pub fn min(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .min_by(|a, b| a.total_cmp(b))
}

pub fn max(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .max_by(|a, b| a.total_cmp(b))
}

/// the k-th smallest value (1-based). `None` when fewer than k values exist.
pub fn nth_smallest(values: &[f64], k: usize) -> Option<f64> {
    if k == 0 {
        return None;
    }
    sorted(values).get(k - 1).copied()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n == 0 {
        return None;
    }
    Some(values.iter().sum::<f64>() / n as f64)
}

/// quantile `q` in [0, 1] with linear interpolation
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    let s = sorted(values);
    quantile_sorted(&s, q)
}

/// same as [`quantile`] over an already sorted slice
pub fn quantile_sorted(sorted_values: &[f64], q: f64) -> Option<f64> {
    if sorted_values.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let pos = q * (sorted_values.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted_values[lo] + (sorted_values[hi] - sorted_values[lo]) * frac)
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// standard deviation with `ddof` delta degrees of freedom
fn std_dev(values: &[f64], ddof: usize) -> Option<f64> {
    let n = values.len();
    if n <= ddof {
        return None;
    }
    let mu = mean(values)?;
    let ss = values.iter().map(|v| (v - mu) * (v - mu)).sum::<f64>();
    Some((ss / (n - ddof) as f64).sqrt())
}

/// population standard deviation (divides by n)
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    std_dev(values, 0)
}

/// sample standard deviation (divides by n - 1)
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    std_dev(values, 1)
}

/// summary of a numeric column, in the shape of a dataframe `describe()`
#[derive(Debug, Clone, PartialEq)]
pub struct Description {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

/// describes the defined values of a column
pub fn describe(values: &[Option<f64>]) -> Description {
    let defined: Vec<f64> = values.iter().flatten().copied().filter(|v| !v.is_nan()).collect();
    let s = sorted(&defined);
    Description {
        count: defined.len(),
        mean: mean(&defined),
        std: sample_std_dev(&defined),
        min: s.first().copied(),
        q1: quantile_sorted(&s, 0.25),
        median: quantile_sorted(&s, 0.5),
        q3: quantile_sorted(&s, 0.75),
        max: s.last().copied(),
    }
}
