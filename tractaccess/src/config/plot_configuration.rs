use serde::{Deserialize, Serialize};
use tractaccess_core::model::ComparisonColumn;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PlotConfiguration {
    /// appended to county names in plot titles
    pub state_abbreviation: String,
    /// left column of the box plot grid, drawn in alphabetical order
    pub urban_counties: Vec<String>,
    /// right column of the box plot grid, drawn in the given order
    pub rural_counties: Vec<String>,
    /// comparison columns drawn as boxes, left to right
    pub columns: Vec<ComparisonColumn>,
    /// upper y bound of the fixed scale view
    pub fixed_scale_max: f64,
    pub cell_width: u32,
    pub cell_height: u32,
}

impl Default for PlotConfiguration {
    fn default() -> Self {
        Self {
            state_abbreviation: String::from("NC"),
            urban_counties: ["Guilford", "Wake", "Durham", "Buncombe", "Mecklenburg"]
                .into_iter()
                .map(String::from)
                .collect(),
            rural_counties: ["Bertie", "Bladen", "Columbus", "Pender", "Washington"]
                .into_iter()
                .map(String::from)
                .collect(),
            columns: vec![
                ComparisonColumn::Option1,
                ComparisonColumn::Option2,
                ComparisonColumn::Option3Worst,
            ],
            fixed_scale_max: 50.0,
            cell_width: 800,
            cell_height: 500,
        }
    }
}

impl PlotConfiguration {
    pub fn sorted_urban_counties(&self) -> Vec<String> {
        let mut counties = self.urban_counties.clone();
        counties.sort();
        counties
    }
}
