//! Derivation engine: turns the loaded tables plus the current view state
//! into chart series, map values, rankings and the two-country comparison.
//!
//! Nothing here is cached. Every function is a pure read of
//! `(tables, view, profile)` and is re-run on each frame.

use crate::domain::{
    CountryName, DashboardTables, EmissionsSeries, EvDatasetKind, Rgb, ViewState, YearPoint,
    LAST_HISTORICAL_YEAR, NO_DATA_COLOR,
};
use crate::normalize::RecognizedCountries;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

pub const TOP_EMITTERS: usize = 5;

/// Emissions reduction per percentage point of EV adoption.
pub const CURRENT_SENSITIVITY: f64 = 0.003;
/// Older dashboards scaled emissions by `1 - rate / 100`.
pub const LEGACY_SENSITIVITY: f64 = 0.01;

/// Maps a value (or its absence) to a fill color.
pub trait ColorScale: fmt::Debug + Send + Sync {
    fn color(&self, value: Option<f64>) -> Rgb;

    /// Sample stops for a map legend, highest first.
    fn legend(&self) -> Vec<(String, Rgb)>;
}

/// Spreads color over orders of magnitude: green for small emitters, red
/// once emissions approach `ceiling`.
#[derive(Debug, Clone, Copy)]
pub struct LogScale {
    pub ceiling: f64,
}

impl Default for LogScale {
    fn default() -> Self {
        Self { ceiling: 1_000_000.0 }
    }
}

impl ColorScale for LogScale {
    fn color(&self, value: Option<f64>) -> Rgb {
        let Some(value) = value else {
            return NO_DATA_COLOR;
        };
        let intensity = ((value.max(0.0) + 1.0).ln() / self.ceiling.ln()).clamp(0.0, 1.0);
        let red = channel(255.0 * intensity);
        Rgb::new(red, 255 - red, 0)
    }

    fn legend(&self) -> Vec<(String, Rgb)> {
        [self.ceiling, self.ceiling.sqrt(), 10.0]
            .into_iter()
            .map(|value| (format!("{value:.0} kt"), self.color(Some(value))))
            .chain(std::iter::once(("No data".to_string(), NO_DATA_COLOR)))
            .collect()
    }
}

/// Linear red/green ramp that saturates at `max`.
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    pub max: f64,
}

impl Default for LinearScale {
    fn default() -> Self {
        Self { max: 5000.0 }
    }
}

impl ColorScale for LinearScale {
    fn color(&self, value: Option<f64>) -> Rgb {
        let Some(value) = value else {
            return NO_DATA_COLOR;
        };
        let green = (255.0 - value / self.max * 255.0).clamp(0.0, 255.0);
        let green = channel(green);
        Rgb::new(255 - green, green, 0)
    }

    fn legend(&self) -> Vec<(String, Rgb)> {
        vec![
            ("High emissions".to_string(), self.color(Some(self.max))),
            ("Low emissions".to_string(), self.color(Some(0.0))),
            ("No data".to_string(), NO_DATA_COLOR),
        ]
    }
}

pub const EV_HIGH_COLOR: Rgb = Rgb::new(0, 100, 0);
pub const EV_MEDIUM_COLOR: Rgb = Rgb::new(50, 205, 50);
pub const EV_LOW_COLOR: Rgb = Rgb::new(144, 238, 144);

/// Discrete bands on adoption percentage.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdoptionThresholds;

impl ColorScale for AdoptionThresholds {
    fn color(&self, value: Option<f64>) -> Rgb {
        match value {
            Some(rate) if rate > 20.0 => EV_HIGH_COLOR,
            Some(rate) if rate > 10.0 => EV_MEDIUM_COLOR,
            Some(rate) if rate > 1.0 => EV_LOW_COLOR,
            _ => NO_DATA_COLOR,
        }
    }

    fn legend(&self) -> Vec<(String, Rgb)> {
        vec![
            ("> 20%".to_string(), EV_HIGH_COLOR),
            ("> 10%".to_string(), EV_MEDIUM_COLOR),
            ("> 1%".to_string(), EV_LOW_COLOR),
            ("No data".to_string(), NO_DATA_COLOR),
        ]
    }
}

/// Continuous light-to-dark green ramp over cumulative EV stock.
#[derive(Debug, Clone, Copy)]
pub struct StockGradient {
    pub max_stock: f64,
}

impl Default for StockGradient {
    fn default() -> Self {
        Self {
            max_stock: 1_000_000.0,
        }
    }
}

impl ColorScale for StockGradient {
    fn color(&self, value: Option<f64>) -> Rgb {
        match value {
            Some(stock) if stock > 0.0 => {
                let t = (stock / self.max_stock).clamp(0.0, 1.0);
                Rgb::new(
                    channel(200.0 * (1.0 - t)),
                    channel(255.0 - 155.0 * t),
                    channel(200.0 * (1.0 - t)),
                )
            }
            _ => NO_DATA_COLOR,
        }
    }

    fn legend(&self) -> Vec<(String, Rgb)> {
        vec![
            (format!("{:.0}+ EVs", self.max_stock), self.color(Some(self.max_stock))),
            ("Few EVs".to_string(), self.color(Some(1.0))),
            ("No data".to_string(), NO_DATA_COLOR),
        ]
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileVersion {
    /// Linear color ramp, `1 - rate/100` adjustment.
    Legacy,
    /// Log color scale, k = 0.003.
    Current,
}

impl ProfileVersion {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Current => "current",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "legacy" | "v1" => Some(Self::Legacy),
            "current" | "latest" => Some(Self::Current),
            _ => None,
        }
    }
}

/// Versioned knobs for the derivation: sensitivity and the color scales.
/// The EV map has one scale per dataset kind, since percentages and vehicle
/// counts cannot share bands.
#[derive(Debug, Clone)]
pub struct DashboardProfile {
    pub version: ProfileVersion,
    pub sensitivity: f64,
    pub emissions_scale: Arc<dyn ColorScale>,
    pub share_scale: Arc<dyn ColorScale>,
    pub stock_scale: Arc<dyn ColorScale>,
}

impl DashboardProfile {
    pub fn for_version(version: ProfileVersion) -> Self {
        match version {
            ProfileVersion::Legacy => Self {
                version,
                sensitivity: LEGACY_SENSITIVITY,
                emissions_scale: Arc::new(LinearScale::default()),
                share_scale: Arc::new(AdoptionThresholds),
                stock_scale: Arc::new(StockGradient::default()),
            },
            ProfileVersion::Current => Self {
                version,
                sensitivity: CURRENT_SENSITIVITY,
                emissions_scale: Arc::new(LogScale::default()),
                share_scale: Arc::new(AdoptionThresholds),
                stock_scale: Arc::new(StockGradient::default()),
            },
        }
    }

    #[must_use]
    pub fn with_emissions_scale(mut self, scale: Arc<dyn ColorScale>) -> Self {
        self.emissions_scale = scale;
        self
    }

    #[must_use]
    pub fn with_ev_scale(mut self, kind: EvDatasetKind, scale: Arc<dyn ColorScale>) -> Self {
        match kind {
            EvDatasetKind::Share => self.share_scale = scale,
            EvDatasetKind::Stock => self.stock_scale = scale,
        }
        self
    }

    pub fn ev_scale(&self, kind: EvDatasetKind) -> &dyn ColorScale {
        match kind {
            EvDatasetKind::Share => self.share_scale.as_ref(),
            EvDatasetKind::Stock => self.stock_scale.as_ref(),
        }
    }
}

impl Default for DashboardProfile {
    fn default() -> Self {
        Self::for_version(ProfileVersion::Current)
    }
}

/// `emissions × (1 − rate × k)`, never below zero.
pub fn adjusted_emissions(emissions: f64, ev_adoption_rate: f64, sensitivity: f64) -> f64 {
    emissions * (1.0 - ev_adoption_rate * sensitivity).max(0.0)
}

/// Historical points first, then predictions; the first point for a year
/// wins, so history beats a prediction for the same year.
pub fn merge_series(historical: &[YearPoint], prediction: &[YearPoint]) -> Vec<YearPoint> {
    let mut seen = HashSet::new();
    let mut merged: Vec<YearPoint> = historical
        .iter()
        .chain(prediction)
        .filter(|point| seen.insert(point.year))
        .copied()
        .collect();
    merged.sort_by_key(|point| point.year);
    merged
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedPoint {
    pub year: i32,
    pub emissions: f64,
    pub adjusted_emissions: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapReading {
    /// Adjusted emissions in kt.
    Emissions(f64),
    /// EV share (percent) or stock count, depending on the dataset.
    Adoption(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEmitter {
    pub country: CountryName,
    pub adjusted_emissions: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonEntry {
    pub country: CountryName,
    pub adjusted_emissions: Option<f64>,
    pub high: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub first: ComparisonEntry,
    pub second: ComparisonEntry,
}

/// Read-only view over the tables for one profile and allow-list.
#[derive(Debug, Clone, Copy)]
pub struct Derivation<'a> {
    tables: &'a DashboardTables,
    profile: &'a DashboardProfile,
    recognized: &'a RecognizedCountries,
}

impl<'a> Derivation<'a> {
    pub const fn new(
        tables: &'a DashboardTables,
        profile: &'a DashboardProfile,
        recognized: &'a RecognizedCountries,
    ) -> Self {
        Self {
            tables,
            profile,
            recognized,
        }
    }

    pub fn adjust(&self, emissions: f64, ev_adoption_rate: f64) -> f64 {
        adjusted_emissions(emissions, ev_adoption_rate, self.profile.sensitivity)
    }

    /// Merged historical + predicted series with adjusted values.
    pub fn derived_series(&self, country: &CountryName, ev_adoption_rate: f64) -> Vec<DerivedPoint> {
        let historical = self
            .tables
            .emissions
            .get(country)
            .map_or(&[][..], EmissionsSeries::points);
        let prediction = self
            .tables
            .predictions
            .get(country)
            .map_or(&[][..], EmissionsSeries::points);

        merge_series(historical, prediction)
            .into_iter()
            .map(|point| DerivedPoint {
                year: point.year,
                emissions: point.emissions,
                adjusted_emissions: self.adjust(point.emissions, ev_adoption_rate),
            })
            .collect()
    }

    /// Unadjusted emissions for a year: predictions after the historical
    /// cutoff, history otherwise. No fallback between the two.
    pub fn emissions_for_year(&self, country: &CountryName, year: i32) -> Option<f64> {
        let source = if year > LAST_HISTORICAL_YEAR {
            &self.tables.predictions
        } else {
            &self.tables.emissions
        };
        source.get(country).and_then(|series| series.value_for(year))
    }

    pub fn adjusted_for_year(&self, country: &CountryName, view: &ViewState) -> Option<f64> {
        self.emissions_for_year(country, view.selected_year)
            .map(|emissions| self.adjust(emissions, view.ev_adoption_rate))
    }

    pub fn map_reading(&self, country: &CountryName, view: &ViewState) -> Option<MapReading> {
        if view.show_ev_map {
            self.tables
                .ev
                .value_for(country, view.selected_year)
                .map(MapReading::Adoption)
        } else {
            self.adjusted_for_year(country, view).map(MapReading::Emissions)
        }
    }

    pub fn fill_color(&self, country: &CountryName, view: &ViewState) -> Rgb {
        let scale = self.active_scale(view);
        let value = self.map_reading(country, view).map(|reading| match reading {
            MapReading::Emissions(value) | MapReading::Adoption(value) => value,
        });
        scale.color(value)
    }

    /// The EV scale follows the loaded dataset, not the profile version.
    pub fn active_scale(&self, view: &ViewState) -> &'a dyn ColorScale {
        if view.show_ev_map {
            self.profile.ev_scale(self.tables.ev.kind())
        } else {
            self.profile.emissions_scale.as_ref()
        }
    }

    /// Highest adjusted emitters for the selected year among recognized
    /// countries. Equal values keep table order.
    pub fn top_emitters(&self, view: &ViewState, limit: usize) -> Vec<RankedEmitter> {
        let mut ranked: Vec<RankedEmitter> = self
            .tables
            .emissions
            .countries()
            .iter()
            .filter(|country| self.recognized.contains(country))
            .filter_map(|country| {
                self.adjusted_for_year(country, view).map(|adjusted| RankedEmitter {
                    country: country.clone(),
                    adjusted_emissions: adjusted,
                })
            })
            .collect();

        ranked.sort_by(|a, b| b.adjusted_emissions.total_cmp(&a.adjusted_emissions));
        ranked.truncate(limit);
        ranked
    }

    /// Pairs the two selected countries. The first country is marked high
    /// unless the second is strictly larger; a missing value never wins.
    pub fn compare(&self, view: &ViewState) -> Option<Comparison> {
        let first = view.selected_country.as_ref()?;
        let second = view.second_selected_country.as_ref()?;
        let first_value = self.adjusted_for_year(first, view);
        let second_value = self.adjusted_for_year(second, view);

        let second_high = match (first_value, second_value) {
            (Some(a), Some(b)) => a < b,
            (None, Some(_)) => true,
            _ => false,
        };
        let first_high = first_value.is_some() && !second_high;

        Some(Comparison {
            first: ComparisonEntry {
                country: first.clone(),
                adjusted_emissions: first_value,
                high: first_high,
            },
            second: ComparisonEntry {
                country: second.clone(),
                adjusted_emissions: second_value,
                high: second_high,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EvAdoption, EvDatasetKind};
    use crate::normalize::CountryNormalizer;

    fn name(raw: &str) -> CountryName {
        CountryNormalizer::default().normalize(raw)
    }

    fn series(points: &[(i32, f64)]) -> EmissionsSeries {
        EmissionsSeries::from_points(points.iter().map(|&(y, e)| YearPoint::new(y, e)).collect())
    }

    fn tables() -> DashboardTables {
        let mut tables = DashboardTables::new(EvDatasetKind::Share);
        tables.emissions.insert(name("China"), series(&[(2010, 800.0), (2019, 1000.0)]));
        tables.emissions.insert(name("World"), series(&[(2019, 99_999.0)]));
        tables.emissions.insert(name("Germany"), series(&[(2019, 300.0)]));
        tables.emissions.insert(name("France"), series(&[(2019, 300.0)]));
        tables.emissions.insert(name("India"), series(&[(2019, 700.0)]));
        tables.emissions.insert(name("Japan"), series(&[(2019, 500.0)]));
        tables.emissions.insert(name("Chad"), series(&[(2019, 1.0)]));
        tables.emissions.insert(name("Italy"), series(&[(2018, 250.0)]));
        tables.predictions.insert(name("China"), series(&[(2019, 5.0), (2030, 900.0)]));
        tables
    }

    fn view(year: i32, rate: f64) -> ViewState {
        ViewState {
            selected_year: year,
            ev_adoption_rate: rate,
            ..ViewState::default()
        }
    }

    #[test]
    fn adjustment_matches_sensitivity() {
        assert!((adjusted_emissions(100.0, 0.0, CURRENT_SENSITIVITY) - 100.0).abs() < 1e-9);
        assert!((adjusted_emissions(100.0, 100.0, CURRENT_SENSITIVITY) - 70.0).abs() < 1e-9);
        assert!((adjusted_emissions(100.0, 50.0, LEGACY_SENSITIVITY) - 50.0).abs() < 1e-9);
        assert!(adjusted_emissions(100.0, 100.0, 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn merge_prefers_history_and_sorts() {
        let merged = merge_series(
            &[YearPoint::new(2020, 100.0), YearPoint::new(2021, 90.0)],
            &[YearPoint::new(2021, 999.0), YearPoint::new(2022, 80.0)],
        );
        assert_eq!(
            merged,
            vec![
                YearPoint::new(2020, 100.0),
                YearPoint::new(2021, 90.0),
                YearPoint::new(2022, 80.0),
            ]
        );
    }

    #[test]
    fn derived_series_adjusts_history_and_predictions() {
        let tables = tables();
        let profile = DashboardProfile::default();
        let recognized = RecognizedCountries::default();
        let engine = Derivation::new(&tables, &profile, &recognized);

        let derived = engine.derived_series(&name("China"), 100.0);
        let years: Vec<i32> = derived.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2010, 2019, 2030]);
        assert!((derived[1].emissions - 1000.0).abs() < 1e-9);
        assert!((derived[2].adjusted_emissions - 630.0).abs() < 1e-9);
        assert!(engine.derived_series(&name("Atlantis"), 0.0).is_empty());
    }

    #[test]
    fn map_value_switches_source_after_cutoff() {
        let tables = tables();
        let profile = DashboardProfile::default();
        let recognized = RecognizedCountries::default();
        let engine = Derivation::new(&tables, &profile, &recognized);
        let china = name("China");

        assert_eq!(engine.emissions_for_year(&china, 2019), Some(1000.0));
        assert_eq!(engine.emissions_for_year(&china, 2030), Some(900.0));
        assert_eq!(engine.emissions_for_year(&china, 2021), None);
        assert_eq!(engine.emissions_for_year(&name("Germany"), 2030), None);
        assert_eq!(engine.fill_color(&name("Germany"), &view(2030, 0.0)), NO_DATA_COLOR);
    }

    #[test]
    fn ev_map_uses_adoption_thresholds() {
        let mut tables = tables();
        let mut shares = crate::domain::CountryTable::new();
        shares.insert(name("Norway"), [(2019, 56.0)].into_iter().collect());
        shares.insert(name("China"), [(2019, 15.0)].into_iter().collect());
        shares.insert(name("India"), [(2019, 1.5)].into_iter().collect());
        shares.insert(name("Chad"), [(2019, 0.2)].into_iter().collect());
        tables.ev = EvAdoption::Share(shares);
        let profile = DashboardProfile::default();
        let recognized = RecognizedCountries::default();
        let engine = Derivation::new(&tables, &profile, &recognized);
        let ev_view = ViewState {
            show_ev_map: true,
            ..view(2019, 0.0)
        };

        assert_eq!(engine.fill_color(&name("Norway"), &ev_view), EV_HIGH_COLOR);
        assert_eq!(engine.fill_color(&name("China"), &ev_view), EV_MEDIUM_COLOR);
        assert_eq!(engine.fill_color(&name("India"), &ev_view), EV_LOW_COLOR);
        assert_eq!(engine.fill_color(&name("Chad"), &ev_view), NO_DATA_COLOR);
        assert_eq!(engine.fill_color(&name("Germany"), &ev_view), NO_DATA_COLOR);
        assert_eq!(
            engine.map_reading(&name("Norway"), &ev_view),
            Some(MapReading::Adoption(56.0))
        );
    }

    fn stock_tables() -> DashboardTables {
        let mut tables = tables();
        let mut stock = crate::domain::CountryTable::new();
        stock.insert(name("Norway"), 650_000.0);
        stock.insert(name("Chad"), 25.0);
        tables.ev = EvAdoption::Stock(stock);
        tables
    }

    fn share_tables() -> DashboardTables {
        let mut tables = tables();
        let mut shares = crate::domain::CountryTable::new();
        shares.insert(name("Norway"), [(2019, 56.0)].into_iter().collect());
        shares.insert(name("Chad"), [(2019, 0.2)].into_iter().collect());
        tables.ev = EvAdoption::Share(shares);
        tables
    }

    #[test]
    fn ev_scale_follows_the_loaded_dataset_under_every_profile() {
        let recognized = RecognizedCountries::default();
        let ev_view = ViewState {
            show_ev_map: true,
            ..view(2019, 0.0)
        };

        for version in [ProfileVersion::Current, ProfileVersion::Legacy] {
            let profile = DashboardProfile::for_version(version);

            let stock = stock_tables();
            let engine = Derivation::new(&stock, &profile, &recognized);
            let norway = engine.fill_color(&name("Norway"), &ev_view);
            let chad = engine.fill_color(&name("Chad"), &ev_view);
            assert_ne!(norway, chad, "{version:?} stock");
            assert_eq!(chad, StockGradient::default().color(Some(25.0)));
            assert_eq!(
                engine.active_scale(&ev_view).legend()[0].0,
                "1000000+ EVs",
                "{version:?} stock legend"
            );

            let share = share_tables();
            let engine = Derivation::new(&share, &profile, &recognized);
            assert_eq!(engine.fill_color(&name("Norway"), &ev_view), EV_HIGH_COLOR, "{version:?} share");
            assert_eq!(engine.fill_color(&name("Chad"), &ev_view), NO_DATA_COLOR, "{version:?} share");
        }
    }

    #[test]
    fn custom_ev_scale_replaces_only_its_kind() {
        let profile = DashboardProfile::default()
            .with_ev_scale(EvDatasetKind::Stock, Arc::new(StockGradient { max_stock: 100.0 }));
        assert_eq!(
            profile.ev_scale(EvDatasetKind::Stock).color(Some(100.0)),
            Rgb::new(0, 100, 0)
        );
        assert_eq!(profile.ev_scale(EvDatasetKind::Share).color(Some(15.0)), EV_MEDIUM_COLOR);
    }

    #[test]
    fn log_scale_is_monotonic_and_distinct_from_no_data() {
        let scale = LogScale::default();
        let mut previous = 0_u8;
        for exponent in 0..=14 {
            let value = 2_f64.powi(exponent * 2) - 1.0;
            let color = scale.color(Some(value));
            assert!(color.r >= previous, "red dropped at {value}");
            assert_eq!(u16::from(color.r) + u16::from(color.g), 255);
            assert_ne!(color, NO_DATA_COLOR);
            previous = color.r;
        }
        assert_eq!(scale.color(Some(0.0)), Rgb::new(0, 255, 0));
        assert_eq!(scale.color(Some(1e9)), Rgb::new(255, 0, 0));
        assert_eq!(scale.color(None), NO_DATA_COLOR);
    }

    #[test]
    fn linear_scale_saturates() {
        let scale = LinearScale::default();
        assert_eq!(scale.color(Some(0.0)), Rgb::new(0, 255, 0));
        assert_eq!(scale.color(Some(10_000.0)), Rgb::new(255, 0, 0));
        assert_eq!(scale.color(None), NO_DATA_COLOR);
    }

    #[test]
    fn top_emitters_respects_allow_list_and_limit() {
        let tables = tables();
        let profile = DashboardProfile::default();
        let recognized = RecognizedCountries::default();
        let engine = Derivation::new(&tables, &profile, &recognized);

        let top = engine.top_emitters(&view(2019, 0.0), TOP_EMITTERS);
        let names: Vec<&str> = top.iter().map(|e| e.country.as_str()).collect();

        assert_eq!(names, vec!["China", "India", "Japan", "Germany", "France"]);
        assert!(top
            .windows(2)
            .all(|pair| pair[0].adjusted_emissions >= pair[1].adjusted_emissions));
        assert!(!names.contains(&"World"));
    }

    #[test]
    fn top_emitters_skip_missing_years() {
        let tables = tables();
        let profile = DashboardProfile::default();
        let recognized = RecognizedCountries::default();
        let engine = Derivation::new(&tables, &profile, &recognized);

        let top = engine.top_emitters(&view(2018, 0.0), TOP_EMITTERS);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].country.as_str(), "Italy");
    }

    #[test]
    fn comparison_marks_larger_and_breaks_ties_to_first() {
        let mut tables = tables();
        tables.emissions.insert(name("Brazil"), series(&[(2019, 500.0)]));
        let profile = DashboardProfile::default();
        let recognized = RecognizedCountries::default();
        let engine = Derivation::new(&tables, &profile, &recognized);

        let mut state = view(2019, 0.0);
        state.selected_country = Some(name("Germany"));
        state.second_selected_country = Some(name("Brazil"));
        let pair = engine.compare(&state).unwrap();
        assert!(!pair.first.high);
        assert!(pair.second.high);

        state.selected_country = Some(name("Germany"));
        state.second_selected_country = Some(name("France"));
        let tie = engine.compare(&state).unwrap();
        assert!(tie.first.high);
        assert!(!tie.second.high);

        state.second_selected_country = None;
        assert!(engine.compare(&state).is_none());
    }

    #[test]
    fn comparison_never_marks_missing_value_high() {
        let tables = tables();
        let profile = DashboardProfile::default();
        let recognized = RecognizedCountries::default();
        let engine = Derivation::new(&tables, &profile, &recognized);

        let mut state = view(2019, 0.0);
        state.selected_country = Some(name("Atlantis"));
        state.second_selected_country = Some(name("Japan"));
        let pair = engine.compare(&state).unwrap();
        assert!(!pair.first.high);
        assert!(pair.second.high);

        state.second_selected_country = Some(name("Lemuria"));
        let neither = engine.compare(&state).unwrap();
        assert!(!neither.first.high && !neither.second.high);
    }

    #[test]
    fn profiles_carry_their_constants() {
        assert_eq!(ProfileVersion::parse("LEGACY"), Some(ProfileVersion::Legacy));
        let legacy = DashboardProfile::for_version(ProfileVersion::Legacy);
        assert!((legacy.sensitivity - LEGACY_SENSITIVITY).abs() < f64::EPSILON);
        let custom = DashboardProfile::default().with_emissions_scale(Arc::new(LinearScale { max: 1.0 }));
        assert_eq!(custom.emissions_scale.color(Some(1.0)), Rgb::new(255, 0, 0));
    }
}
