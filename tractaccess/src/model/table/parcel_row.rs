use serde::{Deserialize, Serialize};
use tractaccess_core::model::{Origin, Parcel, ParcelKey, TractId};

/// a residential parcel as written to `Option3_residential_parcel_centroids.csv`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ParcelRow {
    pub new_index: u64,
    pub poly_idx: u32,
    pub pt_idx: u32,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "ALTPARNO")]
    pub altparno: Option<String>,
    #[serde(rename = "NPARNO")]
    pub nparno: Option<String>,
    #[serde(rename = "PARUSEDESC")]
    pub land_use: String,
    pub geometry_wkt: String,
}

impl ParcelRow {
    pub fn key(&self) -> ParcelKey {
        ParcelKey(self.new_index)
    }

    pub fn tract_id(&self) -> TractId {
        TractId(self.poly_idx)
    }
}

impl From<&Parcel> for ParcelRow {
    fn from(parcel: &Parcel) -> Self {
        ParcelRow {
            new_index: parcel.key.0,
            poly_idx: parcel.tract_id.0,
            pt_idx: parcel.local_sequence,
            latitude: parcel.latitude,
            longitude: parcel.longitude,
            altparno: parcel.altparno.clone(),
            nparno: parcel.nparno.clone(),
            land_use: parcel.land_use.clone(),
            geometry_wkt: format!("POINT ({:?} {:?})", parcel.longitude, parcel.latitude),
        }
    }
}

/// the mean parcel location of a tract, `Option2_county_centroids.csv`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ParcelAverageRow {
    pub county_index: u64,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&Origin> for ParcelAverageRow {
    fn from(origin: &Origin) -> Self {
        ParcelAverageRow {
            county_index: origin.id,
            latitude: origin.latitude,
            longitude: origin.longitude,
        }
    }
}
