pub mod geo;
pub mod loaders;
pub mod models;

pub use geo::{load_boundaries, CountryBoundaries, CountryShape};
pub use loaders::{load_emissions, load_emissions_file, load_ev, load_ev_file, LoadError};
