use crate::model::routing::{RoutingEngineConfig, TransportMode};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RoutingConfiguration {
    /// has no default: travel times are only computed with an engine chosen
    /// explicitly
    #[serde(default)]
    pub engine: Option<RoutingEngineConfig>,
    pub departure: NaiveDateTime,
    pub mode: TransportMode,
}

impl Default for RoutingConfiguration {
    fn default() -> Self {
        Self {
            engine: None,
            departure: chrono::NaiveDate::from_ymd_opt(2024, 6, 9)
                .and_then(|d| d.and_hms_opt(15, 30, 0))
                .unwrap_or_default(),
            mode: TransportMode::Car,
        }
    }
}
