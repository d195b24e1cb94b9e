//! the routing collaborator: computing all-pairs travel times between two
//! point sets over a road network.
mod crow_fly;
mod external_command;
mod matrix_request;
mod routing_engine;
mod routing_engine_config;
mod routing_error;
mod transport_mode;

pub use crow_fly::CrowFlyEngine;
pub use external_command::ExternalCommandEngine;
pub use matrix_request::MatrixRequest;
pub use routing_engine::RoutingEngine;
pub use routing_engine_config::RoutingEngineConfig;
pub use routing_error::RoutingError;
pub use transport_mode::TransportMode;
