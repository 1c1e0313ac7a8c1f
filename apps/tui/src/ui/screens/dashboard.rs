use emissions_dashboard::app::App;
use emissions_dashboard::domain::{EvDatasetKind, LAST_HISTORICAL_YEAR};
use emissions_dashboard::engine::{MapReading, TOP_EMITTERS};
use emissions_dashboard::render::{emitter_bars, format_kt};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};
use ratatui::Frame;

use crate::ui::widgets::charts::{render_bar_panel, render_series_chart};
use crate::ui::widgets::map::{render_legend, render_map};

pub fn render_dashboard(app: &App, f: &mut Frame<'_>, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(3)])
        .split(columns[0]);
    render_map(app, f, left[0]);
    render_legend(app, f, left[1]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Min(8),
            Constraint::Length(9),
        ])
        .split(columns[1]);
    render_controls(app, f, right[0]);

    let selected: Vec<_> = app.view.selected_country.iter().collect();
    render_series_chart(app, f, right[1], &selected);

    let top = app.engine().top_emitters(&app.view, TOP_EMITTERS);
    render_bar_panel(
        f,
        right[2],
        &format!("Top {TOP_EMITTERS} emitters {}", app.view.selected_year),
        &emitter_bars(&top),
        Direction::Horizontal,
    );
}

fn key(text: &'static str) -> Span<'static> {
    Span::styled(
        text,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
}

fn render_controls(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Controls")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let view = &app.view;
    let phase = if view.selected_year > LAST_HISTORICAL_YEAR {
        "prediction"
    } else {
        "historical"
    };
    let year = Paragraph::new(TextLine::from(vec![
        key("←/→"),
        Span::raw(" Year: "),
        Span::styled(
            view.selected_year.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" ({phase})"), Style::default().fg(Color::Gray)),
    ]));
    f.render_widget(year, rows[0]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Rgb(50, 205, 50)))
        .ratio((view.ev_adoption_rate / 100.0).clamp(0.0, 1.0))
        .label(format!("↑/↓ EV adoption: {:.0}%", view.ev_adoption_rate));
    f.render_widget(gauge, rows[1]);

    let map_mode = if view.show_ev_map { "EV adoption" } else { "CO2 emissions" };
    let mut lines = vec![
        TextLine::from(vec![key("m"), Span::raw(format!(" Map: {map_mode}"))]),
        TextLine::from(vec![
            key("c"),
            Span::raw(" Country: "),
            Span::raw(
                view.selected_country
                    .as_ref()
                    .map_or_else(|| "(none)".to_string(), ToString::to_string),
            ),
        ]),
    ];

    if let Some(country) = &view.selected_country {
        let engine = app.engine();
        let reading = match engine.map_reading(country, view) {
            Some(MapReading::Emissions(value)) => format!("{} kt adjusted", format_kt(value)),
            Some(MapReading::Adoption(value)) => match app.tables.ev.kind() {
                EvDatasetKind::Share => format!("{value:.1}% of new cars electric"),
                EvDatasetKind::Stock => format!("{} EVs on the road", format_kt(value)),
            },
            None => "No data".to_string(),
        };
        let pending = if app.predictions.is_pending(country) {
            " (prediction loading)"
        } else {
            ""
        };
        lines.push(TextLine::from(vec![
            Span::styled(format!("{country}: "), Style::default().fg(Color::Gray)),
            Span::raw(format!("{reading}{pending}")),
        ]));
    }

    f.render_widget(Paragraph::new(Text::from(lines)), rows[2]);
}
