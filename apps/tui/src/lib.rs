// Export our modules for use in the binary and tests
pub mod app;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod normalize;
pub mod render;
pub mod services;

pub use domain::{CountryName, ViewState};
pub use engine::{DashboardProfile, Derivation};
