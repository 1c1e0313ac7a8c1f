//! Dashboard state, the events background tasks send it, and key handling.

pub mod actions;
pub mod input;
pub mod picker;
pub mod state;
#[cfg(test)]
pub(crate) mod testing;

pub use actions::DashboardEvent;
pub use input::handle_input;
pub use picker::{CountryPicker, PickerSlot};
pub use state::{App, DatasetStatus, LoadStatus, SentimentState};
