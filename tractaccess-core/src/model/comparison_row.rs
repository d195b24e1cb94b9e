use super::ModelError;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// a row of the post-processed comparison table consumed by the plots.
///
/// `avg_all_parcel` and `avg_top_x` keep the names used by the downstream
/// plots, but see [`ComparisonColumn`] for what each actually holds.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ComparisonRow {
    #[serde(rename = "Option1_aggregated_min_travel_time")]
    pub option1: Option<f64>,
    #[serde(rename = "Option2_aggregated_min_travel_time")]
    pub option2: Option<f64>,
    pub avg_all_parcel: Option<f64>,
    pub avg_top_x: Option<f64>,
}

impl ComparisonRow {
    pub fn get(&self, column: ComparisonColumn) -> Option<f64> {
        match column {
            ComparisonColumn::Option1 => self.option1,
            ComparisonColumn::Option2 => self.option2,
            ComparisonColumn::Option3Average => self.avg_all_parcel,
            ComparisonColumn::Option3Worst => self.avg_top_x,
        }
    }
}

/// columns of the comparison table with their display labels. the mapping
/// between column names and labels is one-to-one.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonColumn {
    Option1,
    Option2,
    /// `avg_all_parcel`. holds a per-parcel minimum travel time, not an average
    Option3Average,
    /// `avg_top_x`
    Option3Worst,
}

impl ComparisonColumn {
    pub const ALL: [ComparisonColumn; 4] = [
        ComparisonColumn::Option1,
        ComparisonColumn::Option2,
        ComparisonColumn::Option3Average,
        ComparisonColumn::Option3Worst,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            ComparisonColumn::Option1 => "Option1_aggregated_min_travel_time",
            ComparisonColumn::Option2 => "Option2_aggregated_min_travel_time",
            ComparisonColumn::Option3Average => "avg_all_parcel",
            ComparisonColumn::Option3Worst => "avg_top_x",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ComparisonColumn::Option1 => "Option1",
            ComparisonColumn::Option2 => "Option2",
            ComparisonColumn::Option3Average => "Option3 (avg)",
            ComparisonColumn::Option3Worst => "Option3 (worst)",
        }
    }

    pub fn from_label(label: &str) -> Result<ComparisonColumn, ModelError> {
        Self::ALL
            .into_iter()
            .find(|c| c.label() == label)
            .ok_or_else(|| ModelError::UnknownComparisonColumn(label.to_string()))
    }
}

impl FromStr for ComparisonColumn {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.column_name() == s)
            .ok_or_else(|| ModelError::UnknownComparisonColumn(s.to_string()))
    }
}

impl Display for ComparisonColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_labels_are_bijective() {
        let labels: HashSet<_> = ComparisonColumn::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(labels.len(), ComparisonColumn::ALL.len());
        for column in ComparisonColumn::ALL {
            assert_eq!(ComparisonColumn::from_label(column.label()).unwrap(), column);
            assert_eq!(column.column_name().parse::<ComparisonColumn>().unwrap(), column);
        }
        assert_eq!(
            "Option1_aggregated_min_travel_time"
                .parse::<ComparisonColumn>()
                .unwrap()
                .label(),
            "Option1"
        );
    }
}
