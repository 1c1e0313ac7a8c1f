use emissions_dashboard::app::App;
use emissions_dashboard::render::comparison_bars;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

use crate::ui::widgets::charts::{render_bar_panel, render_empty_panel, render_series_chart};

pub fn render_compare(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let title = format!("Comparison {} (adjusted kt)", app.view.selected_year);
    match app.engine().compare(&app.view) {
        Some(comparison) => render_bar_panel(
            f,
            chunks[0],
            &title,
            &comparison_bars(&comparison),
            Direction::Vertical,
        ),
        None => render_empty_panel(
            f,
            chunks[0],
            &title,
            "Press c and v to pick two countries",
        ),
    }

    let countries: Vec<_> = app
        .view
        .selected_country
        .iter()
        .chain(app.view.second_selected_country.iter())
        .collect();
    render_series_chart(app, f, chunks[1], &countries);
}
