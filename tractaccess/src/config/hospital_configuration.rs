use serde::{Deserialize, Serialize};

/// selection of hospitals around a county and the fields of the hospital
/// dataset used for the license summary
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HospitalConfiguration {
    /// half-width of the square search buffer around the county's mean tract
    /// centroid. earlier runs used 30.
    pub radius_miles: f64,
    pub miles_per_degree: f64,
    pub county_field: String,
    pub id_field: String,
    pub license_field: String,
}

impl Default for HospitalConfiguration {
    fn default() -> Self {
        Self {
            radius_miles: 40.0,
            miles_per_degree: 69.0,
            county_field: String::from("fcounty"),
            id_field: String::from("objectid"),
            license_field: String::from("hgenlic"),
        }
    }
}
