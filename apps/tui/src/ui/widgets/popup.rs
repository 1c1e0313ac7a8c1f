use emissions_dashboard::app::{App, CountryPicker};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::Buffer;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Widget};
use ratatui::Frame;

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1]);

    horizontal_layout[1]
}

pub struct ClearWidget;

impl Widget for ClearWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        ratatui::widgets::Clear.render(area, buf);
    }
}

/// Query line on top, ranked matches below.
pub fn render_picker(app: &App, picker: &CountryPicker, f: &mut Frame<'_>) {
    let popup_area = centered_rect(40, 60, f.area());
    f.render_widget(ClearWidget, popup_area);

    let block = Block::default()
        .title(picker.slot.label())
        .title_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let query = Paragraph::new(TextLine::from(vec![
        Span::styled("Search: ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{}_", picker.query),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ]));
    f.render_widget(query, chunks[0]);

    let matches = picker.matches(app.selectable_countries());
    if matches.is_empty() {
        f.render_widget(
            Paragraph::new("No matching country").style(Style::default().fg(Color::Gray)),
            chunks[1],
        );
    } else {
        let items: Vec<ListItem<'_>> = matches
            .iter()
            .map(|country| ListItem::new(country.as_str()))
            .collect();
        let list = List::new(items).highlight_style(
            Style::default()
                .bg(Color::Rgb(0, 0, 238))
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
        let mut state = ListState::default().with_selected(Some(picker.selected));
        f.render_stateful_widget(list, chunks[1], &mut state);
    }

    let hint = Paragraph::new("↑/↓: Move  Enter: Select  Esc: Cancel")
        .style(Style::default().fg(Color::Gray));
    f.render_widget(hint, chunks[2]);
}
