mod cli;
mod event;
mod logging;
mod terminal;
mod ui;

use clap::Parser;
use cli::CliArgs;
use color_eyre::Result;
use emissions_dashboard::app::App;
use emissions_dashboard::config::init_app_config;
use emissions_dashboard::engine::DashboardProfile;
use emissions_dashboard::services::ServiceSet;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let config = init_app_config()?;

    // Check if we're running in a terminal
    let headless = args.headless || !is_terminal();
    let log_rx = logging::init(args.debug, headless);
    info!(profile = config.profile.as_str(), headless, "starting dashboard");

    let services = ServiceSet::from_config(&config)?;
    let mut app = App::new(services, DashboardProfile::for_version(config.profile));
    app.view = args.initial_view(&app.normalizer);

    if headless {
        return event::run_headless(&mut app, &config, args.json).await;
    }

    if let Some(receiver) = log_rx {
        app.attach_log_receiver(receiver);
    }
    app.start_loading(&config);
    app.reload_sentiment();
    if let Some(country) = app.view.selected_country.clone() {
        app.geocode.request(&country);
    }

    // Setup terminal
    let mut terminal = terminal::setup()?;

    // Run the application
    let result = event::run(&mut terminal, &mut app).await;

    // Restore terminal
    terminal::cleanup(true, true);

    result
}

fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
