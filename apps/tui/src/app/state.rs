use crate::app::actions::{spawn_dataset_loads, spawn_sentiment_fetch, DashboardEvent};
use crate::app::picker::{CountryPicker, PickerSlot};
use crate::config::AppConfig;
use crate::data::CountryBoundaries;
use crate::domain::{Article, CountryName, DashboardTables, EvAdoption, EvDatasetKind, ViewState};
use crate::engine::{DashboardProfile, Derivation};
use crate::normalize::{CountryNormalizer, RecognizedCountries};
use crate::render::MapViewport;
use crate::services::{
    GeocodeOutcome, GeocodeRequests, PredictionFetcher, PredictionUpdate, SentimentSource,
    ServiceSet,
};
use std::collections::VecDeque;
use std::sync::{mpsc, Arc};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::AbortHandle;
use tracing::{error, info, warn};

const MAX_LOG_LINES: usize = 200;

/// Selected once the emissions table arrives, if nothing was picked yet.
pub const DEFAULT_COUNTRY: &str = "China";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetStatus {
    pub emissions: LoadStatus,
    pub ev: LoadStatus,
    pub boundaries: LoadStatus,
}

impl DatasetStatus {
    pub fn is_loading(&self) -> bool {
        [&self.emissions, &self.ev, &self.boundaries]
            .iter()
            .any(|status| **status == LoadStatus::Loading)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SentimentState {
    Idle,
    Loading,
    Ready(Vec<Article>),
    Failed(String),
}

pub struct App {
    pub running: bool,
    pub view: ViewState,
    pub tables: DashboardTables,
    pub boundaries: Option<CountryBoundaries>,
    pub profile: DashboardProfile,
    pub normalizer: Arc<CountryNormalizer>,
    pub recognized: RecognizedCountries,
    pub viewport: MapViewport,
    pub show_help: bool,
    pub picker: Option<CountryPicker>,
    pub status_message: String,
    pub datasets: DatasetStatus,
    pub sentiment: SentimentState,
    pub throbber_state: ThrobberState,
    pub logs: VecDeque<String>,
    pub predictions: PredictionFetcher<DashboardEvent>,
    pub geocode: GeocodeRequests<DashboardEvent>,
    sentiment_source: Arc<dyn SentimentSource>,
    sentiment_task: Option<AbortHandle>,
    log_rx: Option<mpsc::Receiver<String>>,
    events_tx: UnboundedSender<DashboardEvent>,
    events_rx: UnboundedReceiver<DashboardEvent>,
}

impl App {
    pub fn new(services: ServiceSet, profile: DashboardProfile) -> Self {
        let (events_tx, events_rx) = unbounded_channel();
        let normalizer = Arc::new(CountryNormalizer::default());
        let recognized = RecognizedCountries::default();

        Self {
            running: true,
            view: ViewState::default(),
            tables: DashboardTables::new(EvDatasetKind::Share),
            boundaries: None,
            profile,
            normalizer,
            recognized,
            viewport: MapViewport::default(),
            show_help: false,
            picker: None,
            status_message: String::new(),
            datasets: DatasetStatus {
                emissions: LoadStatus::Loading,
                ev: LoadStatus::Loading,
                boundaries: LoadStatus::Loading,
            },
            sentiment: SentimentState::Idle,
            throbber_state: ThrobberState::default(),
            logs: VecDeque::new(),
            predictions: PredictionFetcher::new(
                services.prediction,
                services.retry,
                services.concurrency,
                events_tx.clone(),
            ),
            geocode: GeocodeRequests::new(services.geocoder, events_tx.clone()),
            sentiment_source: services.sentiment,
            sentiment_task: None,
            log_rx: None,
            events_tx,
            events_rx,
        }
    }

    /// Kicks off the dataset loads described by `config`.
    pub fn start_loading(&mut self, config: &AppConfig) {
        self.tables = DashboardTables::new(config.ev_dataset);
        spawn_dataset_loads(config, &self.normalizer, &self.events_tx);
    }

    /// Fetches the news feed, replacing any fetch still running.
    pub fn reload_sentiment(&mut self) {
        if let Some(task) = self.sentiment_task.take() {
            task.abort();
        }
        self.sentiment = SentimentState::Loading;
        self.sentiment_task = Some(spawn_sentiment_fetch(
            Arc::clone(&self.sentiment_source),
            self.events_tx.clone(),
        ));
    }

    pub fn attach_log_receiver(&mut self, receiver: mpsc::Receiver<String>) {
        self.log_rx = Some(receiver);
    }

    pub fn engine(&self) -> Derivation<'_> {
        Derivation::new(&self.tables, &self.profile, &self.recognized)
    }

    /// Countries offered by the pickers: everything with emissions data.
    pub fn selectable_countries(&self) -> &[CountryName] {
        self.tables.emissions.countries()
    }

    pub fn is_busy(&self) -> bool {
        self.datasets.is_loading() || self.predictions.in_flight() > 0
    }

    /// Per-frame housekeeping: advance the spinner and fold in logs and
    /// task results.
    pub fn tick(&mut self) {
        self.throbber_state.calc_next();
        self.drain_logs();
        self.drain_events();
    }

    pub fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_event(event);
            applied += 1;
        }
        applied
    }

    pub async fn next_event(&mut self) -> Option<DashboardEvent> {
        self.events_rx.recv().await
    }

    fn drain_logs(&mut self) {
        let Some(receiver) = &self.log_rx else {
            return;
        };
        while let Ok(line) = receiver.try_recv() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            if self.logs.len() == MAX_LOG_LINES {
                self.logs.pop_front();
            }
            self.logs.push_back(line.to_string());
        }
    }

    pub fn apply_event(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::EmissionsLoaded(Ok(dataset)) => {
                self.tables.emissions = dataset.series;
                self.tables.source_names = dataset.source_names;
                self.datasets.emissions = LoadStatus::Ready;
                let countries = self.tables.emissions.countries().to_vec();
                self.predictions.sync(&countries, &self.tables.source_names);
                self.select_default_country();
            }
            DashboardEvent::EmissionsLoaded(Err(err)) => {
                error!(error = %err, "failed to load emissions");
                self.datasets.emissions = LoadStatus::Failed(err.to_string());
            }
            DashboardEvent::EvLoaded(Ok(ev)) => {
                self.tables.ev = ev;
                self.datasets.ev = LoadStatus::Ready;
            }
            DashboardEvent::EvLoaded(Err(err)) => {
                error!(error = %err, "failed to load EV dataset");
                self.tables.ev = EvAdoption::empty(self.tables.ev.kind());
                self.datasets.ev = LoadStatus::Failed(err.to_string());
            }
            DashboardEvent::BoundariesLoaded(Ok(boundaries)) => {
                self.boundaries = Some(boundaries);
                self.datasets.boundaries = LoadStatus::Ready;
            }
            DashboardEvent::BoundariesLoaded(Err(err)) => {
                error!(error = %err, "failed to load country boundaries");
                self.datasets.boundaries = LoadStatus::Failed(err.to_string());
            }
            DashboardEvent::Prediction(update) => self.apply_prediction(update),
            DashboardEvent::Geocoded(outcome) => self.apply_geocode(outcome),
            DashboardEvent::Sentiment(result) => {
                self.sentiment_task = None;
                self.sentiment = match result {
                    Ok(articles) => {
                        info!(articles = articles.len(), "loaded news sentiment");
                        SentimentState::Ready(articles)
                    }
                    Err(err) => {
                        warn!(error = %err, "failed to fetch news sentiment");
                        SentimentState::Failed(err.to_string())
                    }
                };
            }
        }
    }

    /// Merges into any existing prediction entry instead of replacing it.
    fn apply_prediction(&mut self, update: PredictionUpdate) {
        self.predictions.complete(&update.country);
        match update.result {
            Ok(series) if series.is_empty() => {
                warn!(country = %update.country, "prediction service returned no points");
            }
            Ok(series) => {
                if let Some(existing) = self.tables.predictions.get_mut(&update.country) {
                    existing.merge_from(&series);
                } else {
                    self.tables.predictions.insert(update.country, series);
                }
            }
            Err(err) => {
                warn!(country = %update.country, error = %err, "prediction request failed");
            }
        }
    }

    fn apply_geocode(&mut self, outcome: GeocodeOutcome) {
        let country = outcome.country.clone();
        match self.geocode.accept(outcome) {
            Some(Ok(Some(point))) => {
                self.viewport.recenter(point);
                info!(%country, lat = point.lat, lng = point.lng, "recentered map");
            }
            Some(Ok(None)) => {
                info!(%country, "country not found by geocoder");
                self.status_message = format!("{country}: location not found");
            }
            Some(Err(err)) => {
                warn!(%country, error = %err, "geocoding failed");
            }
            None => {}
        }
    }

    fn select_default_country(&mut self) {
        if self.view.selected_country.is_some() {
            return;
        }
        let country = self.normalizer.normalize(DEFAULT_COUNTRY);
        if self.tables.emissions.contains(&country) {
            self.select_country(PickerSlot::First, country);
        }
    }

    /// Stores a selection and asks the geocoder to locate it.
    pub fn select_country(&mut self, slot: PickerSlot, country: CountryName) {
        info!(%country, ?slot, "country selected");
        self.geocode.request(&country);
        match slot {
            PickerSlot::First => self.view.selected_country = Some(country),
            PickerSlot::Second => self.view.second_selected_country = Some(country),
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
        self.predictions.abort_all();
        if let Some(task) = self.sentiment_task.take() {
            task.abort();
        }
    }
}
