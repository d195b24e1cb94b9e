use super::{
    ConfigError, CountyNaming, DataLayout, HospitalConfiguration, LandUseRuleSource,
    LandUseRuleTable, PlotConfiguration, RoutingConfiguration,
};
use crate::{app::post_process::ComparisonSource, model::spatial::FeatureSource};
use config::{Config, Environment, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_CONFIGURATION: &str = include_str!("../../resources/default_configuration.toml");

/// settings of the spatial preparation stage
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PrepConfiguration {
    /// also write the keyed parcel points as a shapefile
    pub write_parcel_shapefile: bool,
    /// tract polygons to read instead of `SVI_{state}_SHP.shp`, such as the
    /// GeoJSON written by `svi-merge`
    #[serde(default)]
    pub tract_source: Option<FeatureSource>,
    /// EPSG code of the parcel file when it has no .prj sidecar
    #[serde(default)]
    pub parcel_epsg: Option<u32>,
    /// EPSG code of the hospital file when it has no .prj sidecar
    #[serde(default)]
    pub hospital_epsg: Option<u32>,
}

impl Default for PrepConfiguration {
    fn default() -> Self {
        Self {
            write_parcel_shapefile: true,
            tract_source: None,
            parcel_epsg: None,
            hospital_epsg: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct PostProcessConfiguration {
    pub source: ComparisonSource,
}

/// complete configuration of a pipeline run
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct PipelineConfiguration {
    #[serde(default)]
    pub layout: DataLayout,
    #[serde(default)]
    pub hospitals: HospitalConfiguration,
    #[serde(default)]
    pub land_use: LandUseRuleSource,
    /// overrides the tract naming of the land use rule table
    #[serde(default)]
    pub county_naming: Option<CountyNaming>,
    #[serde(default)]
    pub prep: PrepConfiguration,
    #[serde(default)]
    pub routing: RoutingConfiguration,
    #[serde(default)]
    pub post_process: PostProcessConfiguration,
    #[serde(default)]
    pub plot: PlotConfiguration,
}

impl PipelineConfiguration {
    /// layers the built-in defaults, an optional .toml or .json file, and
    /// `TRACTACCESS__SECTION__KEY` environment variables.
    pub fn load(user_file: Option<&Path>) -> Result<PipelineConfiguration, ConfigError> {
        let mut builder = Config::builder().add_source(config::File::from_str(
            DEFAULT_CONFIGURATION,
            FileFormat::Toml,
        ));
        if let Some(path) = user_file {
            let filepath = path.to_string_lossy().to_string();
            let format = match path.extension().and_then(|e| e.to_str()) {
                Some("toml") => FileFormat::Toml,
                Some("json") => FileFormat::Json,
                _ => return Err(ConfigError::UnsupportedFileType(filepath)),
            };
            log::info!("reading pipeline configuration from {filepath}");
            builder = builder.add_source(config::File::new(&filepath, format));
        }
        let config = builder
            .add_source(
                Environment::with_prefix("TRACTACCESS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigError::ConfigReadError {
                msg: String::from("failed reading pipeline configuration"),
                source: e,
            })?;
        let conf = config
            .try_deserialize::<PipelineConfiguration>()
            .map_err(|e| ConfigError::ConfigReadError {
                msg: String::from("failed decoding pipeline configuration"),
                source: e,
            })?;
        conf.validate()?;
        Ok(conf)
    }

    /// the configured tract source, or the state's SVI shapefile
    pub fn tract_source(&self, state_name: &str) -> FeatureSource {
        self.prep
            .tract_source
            .clone()
            .unwrap_or_else(|| FeatureSource::Shapefile {
                file: self.layout.svi_tract_shapefile(state_name),
                epsg: None,
            })
    }

    /// how the tract dataset names `county`: the configured override first,
    /// then the rule table
    pub fn county_naming(&self, county: &str, rules: &LandUseRuleTable) -> CountyNaming {
        self.county_naming
            .unwrap_or_else(|| rules.county_naming(county))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.hospitals.radius_miles > 0.0) {
            return Err(ConfigError::InvalidValue(format!(
                "hospitals.radius_miles must be positive, found {}",
                self.hospitals.radius_miles
            )));
        }
        if !(self.hospitals.miles_per_degree > 0.0) {
            return Err(ConfigError::InvalidValue(format!(
                "hospitals.miles_per_degree must be positive, found {}",
                self.hospitals.miles_per_degree
            )));
        }
        if self.plot.columns.is_empty() {
            return Err(ConfigError::InvalidValue(String::from(
                "plot.columns must name at least one column",
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::routing::RoutingEngineConfig;
    use std::io::Write;
    use tractaccess_core::model::ComparisonColumn;

    #[test]
    fn test_defaults() {
        let conf = PipelineConfiguration::load(None).unwrap();
        assert_eq!(conf.hospitals.radius_miles, 40.0);
        assert_eq!(conf.hospitals.miles_per_degree, 69.0);
        assert_eq!(conf.hospitals.license_field, "hgenlic");
        assert!(conf.prep.write_parcel_shapefile);
        assert_eq!(
            conf.routing.departure.format("%Y-%m-%d %H:%M").to_string(),
            "2024-06-09 15:30"
        );
        assert!(conf.routing.engine.is_none());
        assert_eq!(conf.post_process.source, ComparisonSource::AggregatedFiles);
        assert_eq!(
            conf.plot.columns,
            vec![
                ComparisonColumn::Option1,
                ComparisonColumn::Option2,
                ComparisonColumn::Option3Worst
            ]
        );
        assert_eq!(conf.plot.sorted_urban_counties()[0], "Buncombe");
    }

    #[test]
    fn test_user_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[hospitals]
radius_miles = 30.0

[land_use]
type = "built_in"
name = "legacy"

[routing.engine]
type = "external_command"
program = "python"
args = ["r5_matrix.py", "{{network}}"]
"#
        )
        .unwrap();
        let conf = PipelineConfiguration::load(Some(file.path())).unwrap();
        assert_eq!(conf.hospitals.radius_miles, 30.0);
        assert_eq!(conf.hospitals.county_field, "fcounty");
        let table = conf.land_use.build().unwrap();
        assert!(table.rule("Other").is_some());
        match conf.routing.engine {
            Some(RoutingEngineConfig::ExternalCommand { program, args }) => {
                assert_eq!(program, "python");
                assert_eq!(args, vec!["r5_matrix.py", "{network}"]);
            }
            other => panic!("unexpected engine {other:?}"),
        }
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let result = PipelineConfiguration::load(Some(Path::new("settings.yaml")));
        assert!(matches!(result, Err(ConfigError::UnsupportedFileType(_))));
    }
}
