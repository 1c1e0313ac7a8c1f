use emissions_dashboard::app::App;
use emissions_dashboard::domain::{CountryName, LAST_HISTORICAL_YEAR};
use emissions_dashboard::render::{axis_labels, format_kt, series_chart, BarDatum, SeriesChart};
use ratatui::layout::{Alignment, Direction, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Line as TextLine;
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, LegendPosition,
    Paragraph,
};
use ratatui::Frame;

/// Original and adjusted line colors, per plotted country.
const SERIES_COLORS: [(Color, Color); 2] = [
    (Color::Rgb(255, 99, 132), Color::Rgb(75, 192, 192)),
    (Color::Rgb(255, 159, 64), Color::Rgb(153, 102, 255)),
];

pub fn render_empty_panel(f: &mut Frame<'_>, area: Rect, title: &str, message: &str) {
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let paragraph = Paragraph::new(message.to_string())
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

/// Original vs adjusted emissions over time for up to two countries, with
/// a marker at the selected year.
pub fn render_series_chart(app: &App, f: &mut Frame<'_>, area: Rect, countries: &[&CountryName]) {
    let title = "Emissions over time (kt)";
    if countries.is_empty() {
        render_empty_panel(f, area, title, "Press c to select a country");
        return;
    }

    let engine = app.engine();
    let charts: Vec<(String, SeriesChart)> = countries
        .iter()
        .filter_map(|country| {
            series_chart(&engine.derived_series(country, app.view.ev_adoption_rate))
                .map(|chart| (country.to_string(), chart))
        })
        .collect();

    if charts.is_empty() {
        render_empty_panel(f, area, title, "No data");
        return;
    }

    let x_bounds = charts.iter().fold([f64::MAX, f64::MIN], |acc, (_, chart)| {
        [acc[0].min(chart.x_bounds[0]), acc[1].max(chart.x_bounds[1])]
    });
    let y_max = charts
        .iter()
        .map(|(_, chart)| chart.y_bounds[1])
        .fold(1.0_f64, f64::max);

    let year = f64::from(app.view.selected_year);
    let year_marker = [(year, 0.0), (year, y_max)];

    let mut datasets = Vec::new();
    for ((name, chart), (original_color, adjusted_color)) in charts.iter().zip(SERIES_COLORS) {
        datasets.push(
            Dataset::default()
                .name(format!("{name} original"))
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(original_color))
                .data(&chart.original),
        );
        datasets.push(
            Dataset::default()
                .name(format!("{name} adjusted"))
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(adjusted_color))
                .data(&chart.adjusted),
        );
    }
    datasets.push(
        Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::DarkGray))
            .data(&year_marker),
    );

    let phase = if app.view.selected_year > LAST_HISTORICAL_YEAR {
        "predicted"
    } else {
        "historical"
    };

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(format!("{title} | {} {phase}", app.view.selected_year))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .x_axis(
            Axis::default()
                .title("Year")
                .style(Style::default().fg(Color::Gray))
                .bounds(x_bounds)
                .labels(axis_labels(x_bounds, 3, |v| format!("{v:.0}"))),
        )
        .y_axis(
            Axis::default()
                .title("kt")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, y_max])
                .labels(axis_labels([0.0, y_max], 3, format_kt)),
        )
        .legend_position(Some(LegendPosition::TopLeft));

    f.render_widget(chart, area);
}

/// Bars with the highest entry highlighted. Values are adjusted kt.
pub fn render_bar_panel(f: &mut Frame<'_>, area: Rect, title: &str, data: &[BarDatum], direction: Direction) {
    if data.is_empty() {
        render_empty_panel(f, area, title, "No data");
        return;
    }

    let bars: Vec<Bar<'_>> = data
        .iter()
        .map(|datum| {
            let color = if datum.high {
                Color::Rgb(255, 99, 132)
            } else {
                Color::Rgb(75, 192, 192)
            };
            Bar::default()
                .value(datum.value)
                .text_value(format_kt(u64_to_f64(datum.value)))
                .label(TextLine::from(datum.label.clone()))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD))
        })
        .collect();

    let max_value = data.iter().map(|datum| datum.value).max().unwrap_or(0).max(1);

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(title.to_string())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .direction(direction)
        .data(BarGroup::default().bars(&bars))
        .max(max_value)
        .bar_gap(1)
        .bar_width(if direction == Direction::Horizontal { 1 } else { 12 });

    f.render_widget(chart, area);
}

#[allow(clippy::cast_precision_loss)]
fn u64_to_f64(value: u64) -> f64 {
    value as f64
}
