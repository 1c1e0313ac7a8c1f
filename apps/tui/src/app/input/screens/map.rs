use crate::app::state::App;
use crate::render::MapViewport;
use crossterm::event::KeyCode;

pub fn handle_map_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('+' | '=') => app.viewport.zoom_in(),
        KeyCode::Char('-') => app.viewport.zoom_out(),
        KeyCode::Char('0') => app.viewport = MapViewport::default(),
        _ => {}
    }
}
