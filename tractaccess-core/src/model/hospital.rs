use serde::{Deserialize, Serialize};

/// a hospital inside the search buffer around the county, as written to
/// `hospitals_within_buffer.csv`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Hospital {
    #[serde(rename = "ID")]
    pub id: u64,
    pub latitude: f64,
    pub longitude: f64,
}
