use emissions_dashboard::app::App;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::ui::widgets::popup::{centered_rect, ClearWidget};

const SHORTCUTS: [(&str, &str); 14] = [
    ("  ? / F1", " - Toggle this help popup"),
    ("  1 2 3", " - Dashboard, Compare, Sentiment"),
    ("  Tab", " - Next tab"),
    ("  ← / →", " - Previous / next year"),
    ("  PgUp / PgDn", " - Jump ten years"),
    ("  ↑ / ↓", " - EV adoption rate by 5%"),
    ("  [ / ]", " - EV adoption rate by 1%"),
    ("  m", " - Switch map between emissions and EV adoption"),
    ("  c", " - Choose a country"),
    ("  v", " - Choose a comparison country"),
    ("  + / -", " - Zoom the map"),
    ("  0", " - Reset the map view"),
    ("  r", " - Reload news sentiment"),
    ("  q", " - Quit application"),
];

pub fn render_help_popup(_app: &App, f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(80, 80, area);
    f.render_widget(ClearWidget, popup_area);

    let help_block = Block::default()
        .title("== Help & Keyboard Shortcuts ==")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let help_paragraph = Paragraph::new(Text::from(build_help_lines()))
        .block(help_block)
        .wrap(Wrap { trim: true });
    f.render_widget(help_paragraph, popup_area);

    let hint = Paragraph::new(TextLine::from(vec![Span::styled(
        "Press ? or Esc to close",
        Style::default().fg(Color::Gray),
    )]))
    .alignment(Alignment::Center);

    let hint_area = Rect {
        x: popup_area.x,
        y: popup_area.y + popup_area.height.saturating_sub(2),
        width: popup_area.width,
        height: 1,
    };
    f.render_widget(hint, hint_area);
}

fn build_help_lines() -> Vec<TextLine<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let key = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        TextLine::from(vec![Span::styled(
            "CO2 Emissions Dashboard",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )]),
        TextLine::from(""),
        TextLine::from(
            "Explore how EV adoption would reduce each country's CO2 emissions, historically and in predicted years.",
        ),
        TextLine::from(""),
        TextLine::from(vec![Span::styled("Keyboard Shortcuts:", bold)]),
    ];

    for (keys, description) in SHORTCUTS {
        lines.push(TextLine::from(vec![
            Span::styled(keys, key),
            Span::raw(description),
        ]));
    }

    lines.push(TextLine::from(""));
    lines.push(TextLine::from(vec![Span::styled("CLI Options:", bold)]));

    let help_text = crate::cli::CliArgs::help_text();
    for line in help_text.lines() {
        if line.starts_with("Usage") || line.starts_with("Options") || line.trim().is_empty() {
            continue;
        }
        lines.push(TextLine::from(line.to_string()));
    }

    lines
}
