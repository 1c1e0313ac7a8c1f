use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::App;
use crate::domain::Tab;
use crossterm::event::KeyCode;

pub fn handle_global_input(app: &mut App, key: KeyCode) -> bool {
    let tab_count = Tab::ALL.len();
    let current = app.view.active_tab.index();

    let next = match key {
        KeyCode::Char('q') => {
            app.quit();
            return true;
        }
        KeyCode::Char('1') => Tab::Dashboard,
        KeyCode::Char('2') => Tab::Compare,
        KeyCode::Char('3') => Tab::Sentiment,
        KeyCode::Tab => Tab::from_index(wrap_increment(current, tab_count)).unwrap_or(Tab::Dashboard),
        KeyCode::BackTab => Tab::from_index(wrap_decrement(current, tab_count)).unwrap_or(Tab::Dashboard),
        _ => return false,
    };

    app.view.active_tab = next;
    true
}
