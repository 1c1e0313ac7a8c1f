use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use serde::Serialize;
use std::io::Stdout;
use std::time::Duration;
use tracing::{info, warn};

use emissions_dashboard::app::{handle_input, App};
use emissions_dashboard::config::AppConfig;
use emissions_dashboard::domain::CountryName;
use emissions_dashboard::engine::{Comparison, DerivedPoint, RankedEmitter, TOP_EMITTERS};
use emissions_dashboard::render::format_kt;

use crate::ui;

/// Run without a terminal: load, wait for predictions, print a report.
pub async fn run_headless(app: &mut App, config: &AppConfig, json: bool) -> Result<()> {
    app.start_loading(config);

    while app.datasets.is_loading() {
        match app.next_event().await {
            Some(event) => app.apply_event(event),
            None => break,
        }
    }

    let attempts = config.prediction_attempts.max(1);
    let deadline = config.request_timeout.saturating_mul(attempts);
    let waited = tokio::time::timeout(deadline, async {
        while app.predictions.in_flight() > 0 {
            match app.next_event().await {
                Some(event) => app.apply_event(event),
                None => break,
            }
        }
    })
    .await;
    if waited.is_err() {
        warn!(
            outstanding = app.predictions.in_flight(),
            "timed out waiting for predictions"
        );
    }

    let report = HeadlessReport::build(app);
    if json {
        let json = serde_json::to_string_pretty(&report)?;
        println!("{json}");
    } else {
        render_headless_text(&report);
    }

    Ok(())
}

fn render_headless_text(report: &HeadlessReport) {
    println!("\nCO2 Emissions Dashboard");
    println!("=======================");
    println!("Year: {}", report.year);
    println!("EV adoption rate: {:.0}%", report.ev_adoption_rate);
    println!("Profile: {}", report.profile);
    println!(
        "Countries: {} with emissions, {} with EV data, {} with predictions",
        report.emissions_countries, report.ev_countries, report.predicted_countries
    );

    println!("\nTop {TOP_EMITTERS} emitters (adjusted, kt):");
    if report.top_emitters.is_empty() {
        println!("- No data");
    }
    for (rank, emitter) in report.top_emitters.iter().enumerate() {
        println!(
            "{}. {} | {}",
            rank + 1,
            emitter.country,
            format_kt(emitter.adjusted_emissions)
        );
    }

    if let Some(comparison) = &report.comparison {
        println!("\nComparison:");
        for entry in [&comparison.first, &comparison.second] {
            let value = entry
                .adjusted_emissions
                .map_or_else(|| "no data".to_string(), format_kt);
            let marker = if entry.high { " (higher)" } else { "" };
            println!("- {}: {value}{marker}", entry.country);
        }
    }

    if let Some(selected) = &report.selected {
        println!("\n{} emissions (kt, original -> adjusted):", selected.country);
        if selected.series.is_empty() {
            println!("- No data");
        }
        for point in &selected.series {
            println!(
                "- {} | {} -> {}",
                point.year,
                format_kt(point.emissions),
                format_kt(point.adjusted_emissions)
            );
        }
    }
}

#[derive(Serialize)]
struct HeadlessReport {
    year: i32,
    ev_adoption_rate: f64,
    profile: &'static str,
    emissions_countries: usize,
    ev_countries: usize,
    predicted_countries: usize,
    top_emitters: Vec<RankedEmitter>,
    comparison: Option<Comparison>,
    selected: Option<SelectedSeries>,
}

#[derive(Serialize)]
struct SelectedSeries {
    country: CountryName,
    series: Vec<DerivedPoint>,
}

impl HeadlessReport {
    fn build(app: &App) -> Self {
        let engine = app.engine();
        let view = &app.view;

        Self {
            year: view.selected_year,
            ev_adoption_rate: view.ev_adoption_rate,
            profile: app.profile.version.as_str(),
            emissions_countries: app.tables.emissions.len(),
            ev_countries: app.tables.ev.len(),
            predicted_countries: app.tables.predictions.len(),
            top_emitters: engine.top_emitters(view, TOP_EMITTERS),
            comparison: engine.compare(view),
            selected: view.selected_country.as_ref().map(|country| SelectedSeries {
                country: country.clone(),
                series: engine.derived_series(country, view.ev_adoption_rate),
            }),
        }
    }
}

/// Run the main application event loop
pub async fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    loop {
        // Fold in background results before drawing
        app.tick();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    handle_input(app, key.code);
                    if !app.running {
                        info!("quitting");
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    // Force a redraw after resize
                    if terminal.draw(|f| ui::ui(app, f)).is_err() {
                        // Non-fatal redraw error
                    }
                }
                Ok(_) | Err(_) => {
                    // Ignore everything else
                }
            }
        }

        // Let spawned tasks make progress between frames
        tokio::task::yield_now().await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use emissions_dashboard::domain::{EmissionsSeries, YearPoint};
    use emissions_dashboard::engine::DashboardProfile;
    use emissions_dashboard::services::ServiceSet;

    #[tokio::test]
    async fn report_covers_selection_and_ranking() {
        let services = ServiceSet::from_config(&AppConfig::default()).unwrap();
        let mut app = App::new(services, DashboardProfile::default());
        for (country, value) in [("China", 300.0), ("India", 200.0), ("Chad", 1.0)] {
            let name = app.normalizer.normalize(country);
            app.tables.emissions.insert(
                name,
                EmissionsSeries::from_points(vec![YearPoint::new(2019, value)]),
            );
        }
        app.view.selected_country = Some(app.normalizer.normalize("India"));
        app.view.second_selected_country = Some(app.normalizer.normalize("China"));
        app.view.ev_adoption_rate = 100.0;

        let report = HeadlessReport::build(&app);
        assert_eq!(report.top_emitters.len(), 3);
        assert_eq!(report.top_emitters[0].country.as_str(), "China");
        let comparison = report.comparison.as_ref().unwrap();
        assert!(comparison.second.high);
        let selected = report.selected.as_ref().unwrap();
        assert!((selected.series[0].adjusted_emissions - 140.0).abs() < 1e-9);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["profile"], "current");
        assert_eq!(json["selected"]["country"], "India");
    }
}
