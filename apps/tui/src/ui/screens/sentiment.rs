use emissions_dashboard::app::{App, SentimentState};
use emissions_dashboard::domain::Article;
use emissions_dashboard::services::sentiment::{format_sentiment, keyword_cloud, sentiment_label};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use crate::ui::widgets::charts::render_empty_panel;

const CLOUD_TITLE: &str = "Keywords";
const ARTICLES_TITLE: &str = "Climate news sentiment";

pub fn render_sentiment(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(5)])
        .split(area);

    match &app.sentiment {
        SentimentState::Ready(articles) => {
            render_cloud(f, chunks[0], articles);
            render_articles(f, chunks[1], articles);
        }
        SentimentState::Loading | SentimentState::Idle => {
            render_empty_panel(f, chunks[0], CLOUD_TITLE, "Loading...");
            render_empty_panel(f, chunks[1], ARTICLES_TITLE, "Loading...");
        }
        SentimentState::Failed(reason) => {
            render_empty_panel(f, chunks[0], CLOUD_TITLE, "No keywords");
            render_empty_panel(
                f,
                chunks[1],
                ARTICLES_TITLE,
                &format!("Could not load news: {reason}. Press r to retry"),
            );
        }
    }
}

fn render_cloud(f: &mut Frame<'_>, area: Rect, articles: &[Article]) {
    let cloud = keyword_cloud(articles);
    let top = cloud.first().map_or(1, |weight| weight.count.max(1));

    let mut spans = Vec::new();
    for weight in &cloud {
        // Heavier words get brighter and bolder
        let style = if weight.count * 3 >= top * 2 {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else if weight.count * 3 >= top {
            Style::default().fg(Color::LightBlue)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!("{} ({})", weight.word, weight.count), style));
        spans.push(Span::raw("  "));
    }

    if spans.is_empty() {
        render_empty_panel(f, area, CLOUD_TITLE, "No keywords");
        return;
    }

    let paragraph = Paragraph::new(TextLine::from(spans))
        .block(
            Block::default()
                .title(CLOUD_TITLE)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn label_color(label: &str) -> Color {
    match label {
        "positive" => Color::Green,
        "negative" => Color::Red,
        _ => Color::Gray,
    }
}

fn render_articles(f: &mut Frame<'_>, area: Rect, articles: &[Article]) {
    if articles.is_empty() {
        render_empty_panel(f, area, ARTICLES_TITLE, "No articles");
        return;
    }

    let rows = articles.iter().map(|article| {
        let label = sentiment_label(article.sentiment);
        Row::new(vec![
            Cell::from(article.title.clone()),
            Cell::from(format_sentiment(article.sentiment)),
            Cell::from(label).style(Style::default().fg(label_color(label))),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .header(
        Row::new(vec!["Title", "Score", "Tone"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(
        Block::default()
            .title(format!("{ARTICLES_TITLE} ({})", articles.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(table, area);
}
