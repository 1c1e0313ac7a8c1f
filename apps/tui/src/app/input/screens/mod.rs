use crate::app::state::App;
use crate::domain::Tab;
use crossterm::event::KeyCode;

mod controls;
mod global;
mod help;
mod map;
mod picker;

/// Overlays take keys first (help, then the picker); everything else goes
/// to the global keys, the shared view controls and finally the map.
pub fn dispatch_input(app: &mut App, key: KeyCode) {
    if help::handle_help_toggle(app, key) {
        return;
    }

    if app.picker.is_some() {
        picker::handle_picker_input(app, key);
        return;
    }

    if global::handle_global_input(app, key) {
        return;
    }

    if controls::handle_view_controls(app, key) {
        return;
    }

    if app.view.active_tab == Tab::Dashboard {
        map::handle_map_input(app, key);
    }
}
