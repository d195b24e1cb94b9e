use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    #[default]
    Car,
    Walk,
    Bicycle,
    Transit,
}

impl TransportMode {
    /// the mode name as routing engines spell it
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Car => "CAR",
            TransportMode::Walk => "WALK",
            TransportMode::Bicycle => "BICYCLE",
            TransportMode::Transit => "TRANSIT",
        }
    }
}

impl Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
