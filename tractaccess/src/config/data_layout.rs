use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// on-disk layout of pipeline inputs and outputs. state level inputs live in
/// `{data_directory}/{state_data}`, everything per county in
/// `{data_directory}/{county_data}/{County}`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DataLayout {
    pub data_directory: PathBuf,
    pub state_data: String,
    pub county_data: String,
    /// prefix of the parcel point files, `{prefix}_{county}_parcels_pt.shp`
    pub parcel_file_prefix: String,
}

impl Default for DataLayout {
    fn default() -> Self {
        Self {
            data_directory: PathBuf::from("."),
            state_data: String::from("state_data"),
            county_data: String::from("county_data"),
            parcel_file_prefix: String::from("nc"),
        }
    }
}

impl DataLayout {
    pub fn state_directory(&self) -> PathBuf {
        self.data_directory.join(&self.state_data)
    }

    pub fn county_directory(&self, county: &str) -> PathBuf {
        self.data_directory.join(&self.county_data).join(county)
    }

    pub fn county_file(&self, county: &str, filename: &str) -> PathBuf {
        self.county_directory(county).join(filename)
    }

    /// tract polygons with SVI attributes for a whole state
    pub fn svi_tract_shapefile(&self, state: &str) -> PathBuf {
        self.state_directory().join(format!("SVI_{state}_SHP.shp"))
    }

    pub fn parcel_shapefile(&self, county: &str) -> PathBuf {
        let filename = format!(
            "{}_{}_parcels_pt.shp",
            self.parcel_file_prefix,
            county.to_lowercase()
        );
        self.county_file(county, &filename)
    }

    pub fn parcel_output_shapefile(&self, county: &str) -> PathBuf {
        let filename = format!(
            "{}_{}_parcels_pt_withNewIndex.shp",
            self.parcel_file_prefix, county
        );
        self.county_file(county, &filename)
    }

    pub fn hospital_shapefile(&self, state: &str) -> PathBuf {
        self.state_directory()
            .join(format!("{state}_Hospitals"))
            .join("Hospitals.shp")
    }

    /// road network extract consumed by the routing engine
    pub fn osm_extract(&self, name: &str) -> PathBuf {
        self.state_directory()
            .join("osm")
            .join(format!("{name}.osm.pbf"))
    }

    /// directory receiving the multi-county plots
    pub fn plot_directory(&self) -> &Path {
        &self.data_directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let layout = DataLayout {
            data_directory: PathBuf::from("/data"),
            ..Default::default()
        };
        assert_eq!(
            layout.parcel_shapefile("Guilford"),
            PathBuf::from("/data/county_data/Guilford/nc_guilford_parcels_pt.shp")
        );
        assert_eq!(
            layout.parcel_output_shapefile("Guilford"),
            PathBuf::from("/data/county_data/Guilford/nc_Guilford_parcels_pt_withNewIndex.shp")
        );
        assert_eq!(
            layout.svi_tract_shapefile("NorthCarolina"),
            PathBuf::from("/data/state_data/SVI_NorthCarolina_SHP.shp")
        );
        assert_eq!(
            layout.hospital_shapefile("NorthCarolina"),
            PathBuf::from("/data/state_data/NorthCarolina_Hospitals/Hospitals.shp")
        );
        assert_eq!(
            layout.osm_extract("north-carolina-latest"),
            PathBuf::from("/data/state_data/osm/north-carolina-latest.osm.pbf")
        );
    }
}
