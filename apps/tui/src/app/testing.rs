use crate::app::state::App;
use crate::domain::{Article, YearPoint};
use crate::engine::DashboardProfile;
use crate::services::{
    BoxFuture, PredictionSource, RetryPolicy, SentimentSource, ServiceError, ServiceSet,
};
use std::sync::Arc;
use std::time::Duration;

struct Offline;

impl PredictionSource for Offline {
    fn predict<'a>(
        &'a self,
        _source_name: &'a str,
        _start_year: i32,
        _end_year: i32,
    ) -> BoxFuture<'a, Result<Vec<YearPoint>, ServiceError>> {
        Box::pin(async { Err(ServiceError::Unavailable("offline".into())) })
    }
}

impl SentimentSource for Offline {
    fn articles(&self) -> BoxFuture<'_, Result<Vec<Article>, ServiceError>> {
        Box::pin(async { Err(ServiceError::Unavailable("offline".into())) })
    }
}

/// An app whose services all fail and which has no geocoder.
pub fn offline_app() -> App {
    let services = ServiceSet {
        prediction: Arc::new(Offline),
        geocoder: None,
        sentiment: Arc::new(Offline),
        retry: RetryPolicy {
            max_attempts: 1,
            backoff: Duration::from_millis(1),
        },
        concurrency: 1,
    };
    App::new(services, DashboardProfile::default())
}
