use crate::app::input::helpers::{
    step_rate, step_year, RATE_FINE_STEP, RATE_STEP, YEAR_PAGE_STEP,
};
use crate::app::picker::{CountryPicker, PickerSlot};
use crate::app::state::App;
use crossterm::event::KeyCode;

/// Sliders, selectors and toggles. These apply on every tab since the
/// compare and sentiment views read the same year and rate.
pub fn handle_view_controls(app: &mut App, key: KeyCode) -> bool {
    let view = &mut app.view;
    match key {
        KeyCode::Left => view.selected_year = step_year(view.selected_year, -1),
        KeyCode::Right => view.selected_year = step_year(view.selected_year, 1),
        KeyCode::PageUp => view.selected_year = step_year(view.selected_year, -YEAR_PAGE_STEP),
        KeyCode::PageDown => view.selected_year = step_year(view.selected_year, YEAR_PAGE_STEP),
        KeyCode::Up => view.ev_adoption_rate = step_rate(view.ev_adoption_rate, RATE_STEP),
        KeyCode::Down => view.ev_adoption_rate = step_rate(view.ev_adoption_rate, -RATE_STEP),
        KeyCode::Char(']') => {
            view.ev_adoption_rate = step_rate(view.ev_adoption_rate, RATE_FINE_STEP);
        }
        KeyCode::Char('[') => {
            view.ev_adoption_rate = step_rate(view.ev_adoption_rate, -RATE_FINE_STEP);
        }
        KeyCode::Char('m') => view.show_ev_map = !view.show_ev_map,
        KeyCode::Char('c') => open_picker(app, PickerSlot::First),
        KeyCode::Char('v') => open_picker(app, PickerSlot::Second),
        KeyCode::Char('r') => {
            app.status_message = "Reloading news sentiment...".to_string();
            app.reload_sentiment();
        }
        _ => return false,
    }
    true
}

fn open_picker(app: &mut App, slot: PickerSlot) {
    if app.selectable_countries().is_empty() {
        app.status_message = "No countries loaded yet".to_string();
    }
    app.picker = Some(CountryPicker::new(slot));
}
