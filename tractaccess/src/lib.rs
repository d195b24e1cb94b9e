//! batch pipeline measuring how far residents of each census tract travel to
//! the nearest hospitals, comparing three ways of placing trip origins.
pub mod app;
pub mod config;
pub mod model;
