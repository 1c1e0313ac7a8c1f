pub mod screens;
pub mod widgets;

use emissions_dashboard::app::App;
use emissions_dashboard::domain::Tab;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};
use ratatui::Frame;
use throbber_widgets_tui::Throbber;

/// Log lines shown under the body.
const VISIBLE_LOG_LINES: usize = 3;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(app, f, layout[0]);

    match app.view.active_tab {
        Tab::Dashboard => screens::dashboard::render_dashboard(app, f, layout[1]),
        Tab::Compare => screens::compare::render_compare(app, f, layout[1]),
        Tab::Sentiment => screens::sentiment::render_sentiment(app, f, layout[1]),
    }

    render_status(app, f, layout[2]);
    f.render_widget(shortcuts_line(), layout[3]);

    if let Some(picker) = &app.picker {
        widgets::popup::render_picker(app, picker, f);
    }
    if app.show_help {
        screens::help::render_help_popup(app, f, f.area());
    }
}

fn render_header(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(24)])
        .split(area);

    let titles: Vec<TextLine<'_>> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| TextLine::from(format!("{} {}", i + 1, tab.label())))
        .collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title("CO2 Emissions Dashboard")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .select(app.view.active_tab.index())
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, chunks[0]);

    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(chunks[1]);
    f.render_widget(block, chunks[1]);
    if app.is_busy() {
        let throbber = Throbber::default()
            .label("Loading")
            .style(Style::default().fg(Color::Cyan));
        f.render_stateful_widget(throbber, inner, &mut app.throbber_state.clone());
    } else {
        f.render_widget(
            Paragraph::new(Span::styled("Ready", Style::default().fg(Color::Green))),
            inner,
        );
    }
}

fn render_status(app: &App, f: &mut Frame<'_>, area: Rect) {
    let mut lines = vec![TextLine::from(Span::styled(
        app.status_message.clone(),
        Style::default().fg(Color::Yellow),
    ))];
    let skip = app.logs.len().saturating_sub(VISIBLE_LOG_LINES);
    for entry in app.logs.iter().skip(skip) {
        lines.push(TextLine::from(Span::styled(
            entry.trim_end().to_string(),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .title("Status")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(paragraph, area);
}

fn shortcuts_line() -> Paragraph<'static> {
    let key = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let text = Style::default().fg(Color::Gray);
    let mut spans = Vec::new();
    for (k, description) in [
        ("?", ": Help  "),
        ("←/→", ": Year  "),
        ("↑/↓", ": EV rate  "),
        ("c/v", ": Countries  "),
        ("m", ": Map mode  "),
        ("q", ": Quit"),
    ] {
        spans.push(Span::styled(k, key));
        spans.push(Span::styled(description, text));
    }
    Paragraph::new(TextLine::from(spans))
}
