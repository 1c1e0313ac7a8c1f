use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_picker_input(app: &mut App, key: KeyCode) {
    let Some(mut picker) = app.picker.take() else {
        return;
    };

    match key {
        KeyCode::Esc => return,
        KeyCode::Enter => {
            if let Some(country) = picker.current(app.selectable_countries()).cloned() {
                app.select_country(picker.slot, country);
                return;
            }
            app.status_message = "No matching country".to_string();
        }
        KeyCode::Up => {
            let len = picker.matches(app.selectable_countries()).len();
            picker.selected = wrap_decrement(picker.selected, len);
        }
        KeyCode::Down => {
            let len = picker.matches(app.selectable_countries()).len();
            picker.selected = wrap_increment(picker.selected, len);
        }
        KeyCode::Backspace => picker.pop(),
        KeyCode::Char(ch) => picker.push(ch),
        _ => {}
    }

    app.picker = Some(picker);
}
