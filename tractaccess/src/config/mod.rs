mod config_error;
mod county_naming;
mod data_layout;
mod hospital_configuration;
mod land_use_rules;
mod pipeline_configuration;
mod plot_configuration;
mod routing_configuration;

pub use config_error::ConfigError;
pub use county_naming::{normalize_county_name, CountyNaming};
pub use data_layout::DataLayout;
pub use hospital_configuration::HospitalConfiguration;
pub use land_use_rules::{BuiltInRules, CountyRule, LandUseRuleSource, LandUseRuleTable};
pub use pipeline_configuration::{PipelineConfiguration, PrepConfiguration};
pub use plot_configuration::PlotConfiguration;
pub use routing_configuration::RoutingConfiguration;
