use super::{CrowFlyEngine, ExternalCommandEngine, RoutingEngine, RoutingError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum RoutingEngineConfig {
    /// great-circle distance scaled by a circuity factor at a constant speed.
    /// ignores the road network.
    CrowFly { circuity_factor: f64, speed_mph: f64 },
    /// runs an external router as a subprocess. `args` may contain the
    /// placeholders `{network}`, `{from}`, `{to}`, `{output}`, `{departure}`
    /// and `{mode}`.
    ExternalCommand { program: String, args: Vec<String> },
}

impl RoutingEngineConfig {
    /// builds the engine for the road network extract at `network`
    pub fn build(&self, network: &Path) -> Result<Box<dyn RoutingEngine>, RoutingError> {
        match self {
            RoutingEngineConfig::CrowFly {
                circuity_factor,
                speed_mph,
            } => {
                if !(*circuity_factor > 0.0 && *speed_mph > 0.0) {
                    return Err(RoutingError::InvalidRequest(format!(
                        "crow fly engine needs positive circuity factor and speed, found {circuity_factor} and {speed_mph}"
                    )));
                }
                log::warn!(
                    "crow fly engine: travel times are straight-line estimates (circuity {circuity_factor}, {speed_mph} mph) and ignore the road network '{}'",
                    network.display()
                );
                Ok(Box::new(CrowFlyEngine::new(*circuity_factor, *speed_mph)))
            }
            RoutingEngineConfig::ExternalCommand { program, args } => {
                if !network.exists() {
                    return Err(RoutingError::NetworkNotFound(
                        network.to_string_lossy().to_string(),
                    ));
                }
                Ok(Box::new(ExternalCommandEngine::new(
                    program.clone(),
                    args.clone(),
                    network.to_path_buf(),
                )))
            }
        }
    }
}
