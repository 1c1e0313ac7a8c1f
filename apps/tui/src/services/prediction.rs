use crate::domain::{
    CountryName, EmissionsSeries, SourceNames, YearPoint, FIRST_PREDICTION_YEAR, LAST_PREDICTION_YEAR,
};
use crate::services::{check_status, parse_base_url, BoxFuture, ServiceError};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Semaphore;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

/// Predictions are keyed by the country's spelling in the emissions CSV,
/// which is what the service trained its models on.
pub trait PredictionSource: Send + Sync {
    fn predict<'a>(
        &'a self,
        source_name: &'a str,
        start_year: i32,
        end_year: i32,
    ) -> BoxFuture<'a, Result<Vec<YearPoint>, ServiceError>>;
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    #[serde(default)]
    predictions: Vec<YearPoint>,
}

/// `GET {base}/predict/{country}?start_year=..&end_year=..`
#[derive(Debug, Clone)]
pub struct HttpPredictionSource {
    client: reqwest::Client,
    base_url: reqwest::Url,
}

impl HttpPredictionSource {
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self, ServiceError> {
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
        })
    }

    fn endpoint(&self, source_name: &str, start_year: i32, end_year: i32) -> Result<reqwest::Url, ServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ServiceError::Url(self.base_url.to_string()))?
            .pop_if_empty()
            .push("predict")
            .push(source_name);
        url.query_pairs_mut()
            .append_pair("start_year", &start_year.to_string())
            .append_pair("end_year", &end_year.to_string());
        Ok(url)
    }
}

impl PredictionSource for HttpPredictionSource {
    fn predict<'a>(
        &'a self,
        source_name: &'a str,
        start_year: i32,
        end_year: i32,
    ) -> BoxFuture<'a, Result<Vec<YearPoint>, ServiceError>> {
        Box::pin(async move {
            let url = self.endpoint(source_name, start_year, end_year)?;
            let response = check_status("prediction service", self.client.get(url).send().await?)?;
            let body: PredictionResponse = response.json().await?;
            Ok(body.predictions)
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff: Duration::from_millis(500),
        }
    }
}

/// Outcome of one country's prediction task.
#[derive(Debug)]
pub struct PredictionUpdate {
    pub country: CountryName,
    pub result: Result<EmissionsSeries, ServiceError>,
}

/// Owns the per-country prediction tasks.
///
/// Each country is requested at most once per session. Countries that drop
/// out of the known list have their task aborted. Results are sent as
/// `PredictionUpdate`s (wrapped into `E`) for the owner to merge, and the
/// owner reports back through [`PredictionFetcher::complete`].
pub struct PredictionFetcher<E> {
    source: Arc<dyn PredictionSource>,
    policy: RetryPolicy,
    permits: Arc<Semaphore>,
    in_flight: HashMap<CountryName, AbortHandle>,
    settled: HashSet<CountryName>,
    sender: UnboundedSender<E>,
}

impl<E> PredictionFetcher<E>
where
    E: From<PredictionUpdate> + Send + 'static,
{
    pub fn new(
        source: Arc<dyn PredictionSource>,
        policy: RetryPolicy,
        concurrency: usize,
        sender: UnboundedSender<E>,
    ) -> Self {
        Self {
            source,
            policy,
            permits: Arc::new(Semaphore::new(concurrency.max(1))),
            in_flight: HashMap::new(),
            settled: HashSet::new(),
            sender,
        }
    }

    /// Brings the task set in line with `countries`: aborts tasks for
    /// countries no longer listed and starts one for every listed country
    /// that has neither a running task nor a settled result. Requests use
    /// the name from `source_names`, or the canonical name when absent.
    pub fn sync(&mut self, countries: &[CountryName], source_names: &SourceNames) {
        let wanted: HashSet<&CountryName> = countries.iter().collect();

        self.in_flight.retain(|country, handle| {
            let keep = wanted.contains(country);
            if !keep {
                debug!(%country, "aborting prediction request");
                handle.abort();
            }
            keep
        });

        for country in countries {
            if self.in_flight.contains_key(country) || self.settled.contains(country) {
                continue;
            }
            let source_name = source_names
                .get(country)
                .cloned()
                .unwrap_or_else(|| country.to_string());
            let handle = self.spawn(country.clone(), source_name);
            self.in_flight.insert(country.clone(), handle);
        }
    }

    fn spawn(&self, country: CountryName, source_name: String) -> AbortHandle {
        let source = Arc::clone(&self.source);
        let permits = Arc::clone(&self.permits);
        let sender = self.sender.clone();
        let policy = self.policy;

        tokio::spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            let result = fetch_with_retry(source.as_ref(), &country, &source_name, policy).await;
            let _ = sender.send(E::from(PredictionUpdate { country, result }));
        })
        .abort_handle()
    }

    /// Marks a country's request as finished, successful or not. A settled
    /// country is never requested again.
    pub fn complete(&mut self, country: &CountryName) {
        self.in_flight.remove(country);
        self.settled.insert(country.clone());
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_pending(&self, country: &CountryName) -> bool {
        self.in_flight.contains_key(country)
    }

    pub fn abort_all(&mut self) {
        for (_, handle) in self.in_flight.drain() {
            handle.abort();
        }
    }
}

impl<E> Drop for PredictionFetcher<E> {
    fn drop(&mut self) {
        for handle in self.in_flight.values() {
            handle.abort();
        }
    }
}

async fn fetch_with_retry(
    source: &dyn PredictionSource,
    country: &CountryName,
    source_name: &str,
    policy: RetryPolicy,
) -> Result<EmissionsSeries, ServiceError> {
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match source
            .predict(source_name, FIRST_PREDICTION_YEAR, LAST_PREDICTION_YEAR)
            .await
        {
            Ok(points) => return Ok(EmissionsSeries::from_points(points)),
            Err(error) if attempt < attempts && error.is_retryable() => {
                warn!(%country, attempt, %error, "prediction request failed, retrying");
                tokio::time::sleep(policy.backoff).await;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::CountryNormalizer;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    /// Fails every request for `failing`, answers everyone else with a
    /// single 2030 point, and counts calls per country.
    struct FakeSource {
        failing: Option<String>,
        calls: Mutex<HashMap<String, usize>>,
        total: AtomicUsize,
    }

    impl FakeSource {
        fn new(failing: Option<&str>) -> Self {
            Self {
                failing: failing.map(str::to_string),
                calls: Mutex::new(HashMap::new()),
                total: AtomicUsize::new(0),
            }
        }

        fn calls_for(&self, country: &str) -> usize {
            self.calls.lock().unwrap().get(country).copied().unwrap_or(0)
        }
    }

    impl PredictionSource for FakeSource {
        fn predict<'a>(
            &'a self,
            source_name: &'a str,
            start_year: i32,
            end_year: i32,
        ) -> BoxFuture<'a, Result<Vec<YearPoint>, ServiceError>> {
            Box::pin(async move {
                assert_eq!((start_year, end_year), (2020, 2050));
                self.total.fetch_add(1, Ordering::SeqCst);
                *self
                    .calls
                    .lock()
                    .unwrap()
                    .entry(source_name.to_string())
                    .or_default() += 1;
                if self.failing.as_deref() == Some(source_name) {
                    Err(ServiceError::Unavailable("model offline".into()))
                } else {
                    Ok(vec![YearPoint::new(2030, 42.0)])
                }
            })
        }
    }

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            backoff: Duration::from_millis(1),
        }
    }

    fn names(raw: &[&str]) -> Vec<CountryName> {
        let normalizer = CountryNormalizer::default();
        raw.iter().map(|name| normalizer.normalize(name)).collect()
    }

    async fn drain(
        fetcher: &mut PredictionFetcher<PredictionUpdate>,
        rx: &mut mpsc::UnboundedReceiver<PredictionUpdate>,
        expected: usize,
    ) -> Vec<PredictionUpdate> {
        let mut updates = Vec::new();
        while updates.len() < expected {
            let update = rx.recv().await.unwrap();
            fetcher.complete(&update.country);
            updates.push(update);
        }
        updates
    }

    #[test]
    fn endpoint_escapes_country_names() {
        let source =
            HttpPredictionSource::new(reqwest::Client::new(), "http://127.0.0.1:5000").unwrap();
        let url = source.endpoint("Korea, Rep.", 2020, 2050).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:5000/predict/Korea,%20Rep.?start_year=2020&end_year=2050"
        );
    }

    #[tokio::test]
    async fn one_failure_does_not_touch_other_countries() {
        let source = Arc::new(FakeSource::new(Some("Chad")));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut fetcher = PredictionFetcher::new(source.clone(), policy(3), 2, tx);
        let countries = names(&["China", "Chad", "India"]);

        fetcher.sync(&countries, &SourceNames::new());
        let updates = drain(&mut fetcher, &mut rx, 3).await;

        let failed: Vec<_> = updates.iter().filter(|u| u.result.is_err()).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].country.as_str(), "Chad");
        for update in updates.iter().filter(|u| u.result.is_ok()) {
            let series = update.result.as_ref().unwrap();
            assert_eq!(series.value_for(2030), Some(42.0));
        }
        assert_eq!(source.calls_for("Chad"), 3);
        assert_eq!(source.calls_for("China"), 1);
        assert_eq!(fetcher.in_flight(), 0);
    }

    #[tokio::test]
    async fn requests_use_the_csv_spelling() {
        let source = Arc::new(FakeSource::new(None));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut fetcher = PredictionFetcher::new(source.clone(), policy(1), 2, tx);
        let countries = names(&["Russian Federation", "Chad"]);
        let mut source_names = SourceNames::new();
        source_names.insert(countries[0].clone(), "Russian Federation".to_string());

        fetcher.sync(&countries, &source_names);
        let updates = drain(&mut fetcher, &mut rx, 2).await;

        assert_eq!(source.calls_for("Russian Federation"), 1);
        assert_eq!(source.calls_for("Russia"), 0);
        assert_eq!(source.calls_for("Chad"), 1);
        assert!(updates.iter().any(|u| u.country.as_str() == "Russia" && u.result.is_ok()));
    }

    #[tokio::test]
    async fn settled_countries_are_not_requested_again() {
        let source = Arc::new(FakeSource::new(Some("Chad")));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut fetcher = PredictionFetcher::new(source.clone(), policy(2), 4, tx);
        let countries = names(&["China", "Chad"]);

        fetcher.sync(&countries, &SourceNames::new());
        fetcher.sync(&countries, &SourceNames::new());
        drain(&mut fetcher, &mut rx, 2).await;
        fetcher.sync(&countries, &SourceNames::new());
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(rx.try_recv().is_err());
        assert_eq!(source.total.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn countries_leaving_the_list_are_aborted() {
        let source = Arc::new(FakeSource::new(None));
        let (tx, _rx) = mpsc::unbounded_channel::<PredictionUpdate>();
        // No permits free up while the test runs, so both tasks stay queued.
        let mut fetcher = PredictionFetcher::new(source, policy(1), 1, tx);
        let permit_hog = Arc::clone(&fetcher.permits).acquire_owned().await.unwrap();

        fetcher.sync(&names(&["China", "India"]), &SourceNames::new());
        assert_eq!(fetcher.in_flight(), 2);

        fetcher.sync(&names(&["India"]), &SourceNames::new());
        assert_eq!(fetcher.in_flight(), 1);
        assert!(fetcher.is_pending(&names(&["India"])[0]));
        drop(permit_hog);
    }
}
