//! travel times from every hospital in the buffer to every origin of one
//! analysis option, exported raw and aggregated per origin.
mod app;
mod travel_time_error;

pub use app::{compute, run, TravelTimeOutput};
pub use travel_time_error::TravelTimeError;
