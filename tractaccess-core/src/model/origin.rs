use super::{Parcel, TractArena};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// a point sent to the routing engine, tagged with the id used to join its
/// travel times back onto the tract table
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Origin {
    pub id: u64,
    pub latitude: f64,
    pub longitude: f64,
}

impl Origin {
    pub fn new(id: u64, latitude: f64, longitude: f64) -> Origin {
        Origin {
            id,
            latitude,
            longitude,
        }
    }

    /// Option 1, one origin per tract centroid
    pub fn tract_centroids(arena: &TractArena) -> Vec<Origin> {
        arena
            .iter()
            .map(|t| Origin::new(t.id.as_u64(), t.latitude, t.longitude))
            .collect()
    }

    /// Option 2, one origin per tract at the mean of its parcel coordinates.
    /// tracts without parcels have no origin.
    pub fn parcel_averages(parcels: &[Parcel]) -> Vec<Origin> {
        parcels
            .iter()
            .into_group_map_by(|p| p.tract_id)
            .into_iter()
            .sorted_by_key(|(tract_id, _)| *tract_id)
            .map(|(tract_id, group)| {
                let n = group.len() as f64;
                let lat = group.iter().map(|p| p.latitude).sum::<f64>() / n;
                let lon = group.iter().map(|p| p.longitude).sum::<f64>() / n;
                Origin::new(tract_id.as_u64(), lat, lon)
            })
            .collect()
    }

    /// Option 3, one origin per residential parcel
    pub fn parcels(parcels: &[Parcel]) -> Vec<Origin> {
        parcels
            .iter()
            .map(|p| Origin::new(p.key.0, p.latitude, p.longitude))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ParcelKey, TractId};
    use approx::assert_relative_eq;

    fn parcel(tract: u32, seq: u32, lat: f64, lon: f64) -> Parcel {
        Parcel {
            key: ParcelKey::new(TractId(tract), seq).unwrap(),
            tract_id: TractId(tract),
            local_sequence: seq,
            latitude: lat,
            longitude: lon,
            altparno: None,
            nparno: None,
            land_use: String::from("RESIDENTIAL"),
        }
    }

    #[test]
    fn test_parcel_averages() {
        let parcels = vec![
            parcel(2, 1, 36.0, -80.0),
            parcel(1, 1, 35.0, -79.0),
            parcel(2, 2, 36.5, -80.5),
        ];
        let origins = Origin::parcel_averages(&parcels);
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0].id, 1);
        assert_eq!(origins[1].id, 2);
        assert_relative_eq!(origins[1].latitude, 36.25);
        assert_relative_eq!(origins[1].longitude, -80.25);
    }

    #[test]
    fn test_parcel_origins_use_composite_key() {
        let parcels = vec![parcel(3, 2, 36.0, -80.0)];
        assert_eq!(Origin::parcels(&parcels)[0].id, 30002);
    }
}
