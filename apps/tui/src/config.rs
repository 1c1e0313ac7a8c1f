use crate::domain::EvDatasetKind;
use crate::engine::ProfileVersion;
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_EMISSIONS_CSV: &str = "data/co2_emissions_kt_by_country.csv";
pub const DEFAULT_EV_CSV: &str = "data/ev_share.csv";
pub const DEFAULT_BOUNDARIES: &str = "data/custom.geo.json";
pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_GEOCODER_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime settings, read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub emissions_csv: PathBuf,
    pub ev_csv: PathBuf,
    pub ev_dataset: EvDatasetKind,
    pub boundaries_geojson: PathBuf,
    pub prediction_url: String,
    pub sentiment_url: String,
    pub geocoder_url: String,
    /// Geocoding is disabled without a key.
    pub geocoder_api_key: Option<String>,
    pub profile: ProfileVersion,
    pub prediction_attempts: u32,
    pub prediction_concurrency: usize,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            emissions_csv: PathBuf::from(DEFAULT_EMISSIONS_CSV),
            ev_csv: PathBuf::from(DEFAULT_EV_CSV),
            ev_dataset: EvDatasetKind::Share,
            boundaries_geojson: PathBuf::from(DEFAULT_BOUNDARIES),
            prediction_url: DEFAULT_SERVICE_URL.to_string(),
            sentiment_url: DEFAULT_SERVICE_URL.to_string(),
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            geocoder_api_key: None,
            profile: ProfileVersion::Current,
            prediction_attempts: 2,
            prediction_concurrency: 8,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl AppConfig {
    /// Builds the config from any key lookup. Unset or blank keys keep their
    /// defaults; set keys that fail to parse are an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(path) = get("EMISSIONS_CSV") {
            config.emissions_csv = PathBuf::from(path);
        }
        if let Some(path) = get("EV_CSV") {
            config.ev_csv = PathBuf::from(path);
        }
        if let Some(kind) = get("EV_DATASET") {
            config.ev_dataset = EvDatasetKind::parse(&kind).ok_or(ConfigError::Invalid {
                key: "EV_DATASET",
                value: kind,
            })?;
        }
        if let Some(path) = get("BOUNDARIES_GEOJSON") {
            config.boundaries_geojson = PathBuf::from(path);
        }
        if let Some(url) = get("PREDICTION_URL") {
            config.prediction_url = url;
        }
        if let Some(url) = get("SENTIMENT_URL") {
            config.sentiment_url = url;
        }
        if let Some(url) = get("GEOCODER_URL") {
            config.geocoder_url = url;
        }
        config.geocoder_api_key = get("GEOCODER_API_KEY");
        if let Some(profile) = get("DASHBOARD_PROFILE") {
            config.profile = ProfileVersion::parse(&profile).ok_or(ConfigError::Invalid {
                key: "DASHBOARD_PROFILE",
                value: profile,
            })?;
        }
        if let Some(attempts) = get("PREDICTION_ATTEMPTS") {
            config.prediction_attempts = parse_positive("PREDICTION_ATTEMPTS", attempts)?;
        }
        if let Some(concurrency) = get("PREDICTION_CONCURRENCY") {
            config.prediction_concurrency = parse_positive("PREDICTION_CONCURRENCY", concurrency)?;
        }
        if let Some(secs) = get("REQUEST_TIMEOUT_SECS") {
            config.request_timeout =
                Duration::from_secs(parse_positive("REQUEST_TIMEOUT_SECS", secs)?);
        }

        Ok(config)
    }
}

fn parse_positive<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match value.parse::<T>() {
        Ok(parsed) if parsed > T::default() => Ok(parsed),
        _ => Err(ConfigError::Invalid { key, value }),
    }
}

/// Loads `.env` (if present) and reads the process environment.
pub fn init_app_config() -> Result<AppConfig, ConfigError> {
    dotenv().ok();
    AppConfig::from_lookup(|key| env::var(key).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.ev_dataset, EvDatasetKind::Share);
        assert_eq!(config.profile, ProfileVersion::Current);
        assert!(config.geocoder_api_key.is_none());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            ("EV_DATASET", "stock"),
            ("DASHBOARD_PROFILE", "legacy"),
            ("GEOCODER_API_KEY", "secret"),
            ("PREDICTION_ATTEMPTS", "4"),
            ("REQUEST_TIMEOUT_SECS", "3"),
            ("EV_CSV", " data/ev_stock.csv "),
        ]))
        .unwrap();

        assert_eq!(config.ev_dataset, EvDatasetKind::Stock);
        assert_eq!(config.profile, ProfileVersion::Legacy);
        assert_eq!(config.geocoder_api_key.as_deref(), Some("secret"));
        assert_eq!(config.prediction_attempts, 4);
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.ev_csv, PathBuf::from("data/ev_stock.csv"));
    }

    #[test]
    fn blank_api_key_disables_geocoding() {
        let config = AppConfig::from_lookup(lookup(&[("GEOCODER_API_KEY", "  ")])).unwrap();
        assert!(config.geocoder_api_key.is_none());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_eq!(
            AppConfig::from_lookup(lookup(&[("EV_DATASET", "hybrid")])),
            Err(ConfigError::Invalid {
                key: "EV_DATASET",
                value: "hybrid".into()
            })
        );
        assert!(AppConfig::from_lookup(lookup(&[("PREDICTION_CONCURRENCY", "0")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("PREDICTION_ATTEMPTS", "two")])).is_err());
    }
}
