//! Clients for the external collaborators: the prediction service, the
//! geocoder and the news sentiment feed.
//!
//! Each collaborator sits behind a small trait so the dashboard can be driven
//! by in-process fakes in tests.

pub mod geocode;
pub mod prediction;
pub mod sentiment;

use crate::config::AppConfig;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub use geocode::{GeocodeOutcome, GeocodeRequests, GeocodeSource, HttpGeocoder, SelectionToken};
pub use prediction::{
    HttpPredictionSource, PredictionFetcher, PredictionSource, PredictionUpdate, RetryPolicy,
};
pub use sentiment::{HttpSentimentSource, SentimentSource};

/// Boxed future so the service traits stay object safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{service} returned HTTP {status}")]
    Status { service: &'static str, status: u16 },
    #[error("invalid service URL: {0}")]
    Url(String),
    #[error("{0}")]
    Unavailable(String),
}

impl ServiceError {
    /// Timeouts, connection failures and 5xx responses are worth another try;
    /// a 404 for an unknown country is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(error) => error.is_timeout() || error.is_connect(),
            Self::Status { status, .. } => *status >= 500,
            Self::Url(_) => false,
            Self::Unavailable(_) => true,
        }
    }
}

pub fn http_client(timeout: Duration) -> Result<reqwest::Client, ServiceError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(ServiceError::from)
}

/// The collaborators one dashboard session talks to.
#[derive(Clone)]
pub struct ServiceSet {
    pub prediction: Arc<dyn PredictionSource>,
    pub geocoder: Option<Arc<dyn GeocodeSource>>,
    pub sentiment: Arc<dyn SentimentSource>,
    pub retry: RetryPolicy,
    pub concurrency: usize,
}

impl ServiceSet {
    /// HTTP clients for every configured service. The geocoder is left out
    /// when no API key is configured.
    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        let client = http_client(config.request_timeout)?;

        let geocoder: Option<Arc<dyn GeocodeSource>> = match &config.geocoder_api_key {
            Some(key) => Some(Arc::new(HttpGeocoder::new(
                client.clone(),
                &config.geocoder_url,
                key.clone(),
            )?)),
            None => None,
        };

        Ok(Self {
            prediction: Arc::new(HttpPredictionSource::new(client.clone(), &config.prediction_url)?),
            geocoder,
            sentiment: Arc::new(HttpSentimentSource::new(client, &config.sentiment_url)?),
            retry: RetryPolicy {
                max_attempts: config.prediction_attempts,
                ..RetryPolicy::default()
            },
            concurrency: config.prediction_concurrency,
        })
    }
}

pub(crate) fn parse_base_url(raw: &str) -> Result<reqwest::Url, ServiceError> {
    reqwest::Url::parse(raw).map_err(|error| ServiceError::Url(format!("{raw}: {error}")))
}

pub(crate) fn check_status(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ServiceError::Status {
            service,
            status: status.as_u16(),
        })
    }
}
