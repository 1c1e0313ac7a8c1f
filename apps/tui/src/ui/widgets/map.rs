use emissions_dashboard::app::{App, LoadStatus};
use emissions_dashboard::domain::Rgb;
use emissions_dashboard::render::{shade_countries, ShadedCountry};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::canvas::{Canvas, Context, Line};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::ui::widgets::charts::render_empty_panel;

pub const fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

fn draw_outline(ctx: &mut Context<'_>, country: &ShadedCountry<'_>, color: Color) {
    for ring in &country.shape.rings {
        for pair in ring.windows(2) {
            let (x1, y1) = pair[0];
            let (x2, y2) = pair[1];
            ctx.draw(&Line { x1, y1, x2, y2, color });
        }
    }
}

/// Country outlines drawn in their fill color; selected countries are
/// drawn last, in white, so they stay visible on top.
pub fn render_map(app: &App, f: &mut Frame<'_>, area: Rect) {
    let title = if app.view.show_ev_map {
        format!("EV adoption ({})", app.tables.ev.kind().as_str())
    } else {
        "CO2 emissions (adjusted)".to_string()
    };

    let Some(boundaries) = &app.boundaries else {
        let message = match &app.datasets.boundaries {
            LoadStatus::Loading => "Loading map...",
            _ => "No map data",
        };
        render_empty_panel(f, area, &title, message);
        return;
    };

    let engine = app.engine();
    let shaded = shade_countries(boundaries, &engine, &app.view);
    let viewport = app.viewport;

    let canvas = Canvas::default()
        .block(
            Block::default()
                .title(format!("{title} | zoom {}", viewport.zoom))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .marker(Marker::Braille)
        .x_bounds(viewport.x_bounds())
        .y_bounds(viewport.y_bounds())
        .paint(|ctx| {
            for country in shaded.iter().filter(|country| !country.selected) {
                draw_outline(ctx, country, to_color(country.color));
            }
            ctx.layer();
            for country in shaded.iter().filter(|country| country.selected) {
                draw_outline(ctx, country, Color::White);
            }
        });

    f.render_widget(canvas, area);
}

pub fn render_legend(app: &App, f: &mut Frame<'_>, area: Rect) {
    let scale = app.engine().active_scale(&app.view);
    let mut spans = Vec::new();
    for (label, rgb) in scale.legend() {
        spans.push(Span::styled("██ ", Style::default().fg(to_color(rgb))));
        spans.push(Span::raw(format!("{label}   ")));
    }

    let legend = Paragraph::new(TextLine::from(spans)).block(
        Block::default()
            .title("Legend")
            .title_style(Style::default().add_modifier(Modifier::BOLD))
            .borders(Borders::ALL),
    );
    f.render_widget(legend, area);
}
