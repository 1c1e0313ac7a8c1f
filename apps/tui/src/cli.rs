use clap::{CommandFactory, Parser};
use emissions_dashboard::domain::{ViewState, MAX_YEAR, MIN_YEAR};
use emissions_dashboard::normalize::CountryNormalizer;

#[derive(Debug, Parser)]
#[command(
    name = "emissions-dashboard",
    version,
    about = "CO2 emissions and EV adoption dashboard"
)]
pub struct CliArgs {
    /// Print a report and exit
    #[arg(long)]
    pub headless: bool,

    /// Print the headless report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the emissions CSV path
    #[arg(long, value_name = "PATH")]
    pub emissions: Option<String>,

    /// Override the EV dataset CSV path
    #[arg(long, value_name = "PATH")]
    pub ev: Option<String>,

    /// EV dataset shape: stock or share
    #[arg(long = "ev-dataset", value_name = "KIND")]
    pub ev_dataset: Option<String>,

    /// Override the country boundaries GeoJSON path
    #[arg(long, value_name = "PATH")]
    pub geojson: Option<String>,

    /// Override the prediction service base URL
    #[arg(long = "prediction-url", value_name = "URL")]
    pub prediction_url: Option<String>,

    /// Derivation profile: current or legacy
    #[arg(long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Initial year
    #[arg(long, value_parser = clap::value_parser!(i32).range(i64::from(MIN_YEAR)..=i64::from(MAX_YEAR)))]
    pub year: Option<i32>,

    /// Initially selected country
    #[arg(long, value_name = "NAME")]
    pub country: Option<String>,

    /// Initially selected comparison country
    #[arg(long, value_name = "NAME")]
    pub compare: Option<String>,

    /// Initial EV adoption rate in percent
    #[arg(long = "ev-rate", value_name = "PERCENT")]
    pub ev_rate: Option<f64>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        let overrides = [
            ("EMISSIONS_CSV", &self.emissions),
            ("EV_CSV", &self.ev),
            ("EV_DATASET", &self.ev_dataset),
            ("BOUNDARIES_GEOJSON", &self.geojson),
            ("PREDICTION_URL", &self.prediction_url),
            ("DASHBOARD_PROFILE", &self.profile),
        ];
        for (key, value) in overrides {
            if let Some(value) = value {
                std::env::set_var(key, value);
            }
        }
    }

    /// Starting view from the command line; unset flags keep the defaults.
    pub fn initial_view(&self, normalizer: &CountryNormalizer) -> ViewState {
        let mut view = ViewState::default();
        if let Some(year) = self.year {
            view.selected_year = year;
        }
        if let Some(rate) = self.ev_rate {
            view.ev_adoption_rate = rate.clamp(0.0, 100.0);
        }
        view.selected_country = self.country.as_deref().map(|name| normalizer.normalize(name));
        view.second_selected_country = self.compare.as_deref().map(|name| normalizer.normalize(name));
        view
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}
