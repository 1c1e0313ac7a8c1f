use crate::config::AppConfig;
use crate::data::{
    load_boundaries, load_emissions_file, load_ev_file, CountryBoundaries, LoadError,
};
use crate::domain::{Article, EmissionsDataset, EvAdoption};
use crate::normalize::CountryNormalizer;
use crate::services::{GeocodeOutcome, PredictionUpdate, SentimentSource, ServiceError};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;

/// Everything background tasks report back to the event loop.
#[derive(Debug)]
pub enum DashboardEvent {
    EmissionsLoaded(Result<EmissionsDataset, LoadError>),
    EvLoaded(Result<EvAdoption, LoadError>),
    BoundariesLoaded(Result<CountryBoundaries, LoadError>),
    Prediction(PredictionUpdate),
    Geocoded(GeocodeOutcome),
    Sentiment(Result<Vec<Article>, ServiceError>),
}

impl From<PredictionUpdate> for DashboardEvent {
    fn from(update: PredictionUpdate) -> Self {
        Self::Prediction(update)
    }
}

impl From<GeocodeOutcome> for DashboardEvent {
    fn from(outcome: GeocodeOutcome) -> Self {
        Self::Geocoded(outcome)
    }
}

/// Starts the three dataset loads. Each reports independently; a failed
/// load leaves its table empty and does not hold up the others.
pub fn spawn_dataset_loads(
    config: &AppConfig,
    normalizer: &Arc<CountryNormalizer>,
    sender: &UnboundedSender<DashboardEvent>,
) {
    {
        let path = config.emissions_csv.clone();
        let normalizer = Arc::clone(normalizer);
        let sender = sender.clone();
        tokio::spawn(async move {
            let result = load_emissions_file(&path, &normalizer).await;
            let _ = sender.send(DashboardEvent::EmissionsLoaded(result));
        });
    }
    {
        let path = config.ev_csv.clone();
        let kind = config.ev_dataset;
        let normalizer = Arc::clone(normalizer);
        let sender = sender.clone();
        tokio::spawn(async move {
            let result = load_ev_file(&path, kind, &normalizer).await;
            let _ = sender.send(DashboardEvent::EvLoaded(result));
        });
    }
    {
        let path = config.boundaries_geojson.clone();
        let normalizer = Arc::clone(normalizer);
        let sender = sender.clone();
        tokio::spawn(async move {
            let result = load_boundaries(&path, &normalizer).await;
            let _ = sender.send(DashboardEvent::BoundariesLoaded(result));
        });
    }
}

pub fn spawn_sentiment_fetch(
    source: Arc<dyn SentimentSource>,
    sender: UnboundedSender<DashboardEvent>,
) -> AbortHandle {
    tokio::spawn(async move {
        let result = source.articles().await;
        let _ = sender.send(DashboardEvent::Sentiment(result));
    })
    .abort_handle()
}
