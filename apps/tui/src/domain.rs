use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Last year covered by the historical emissions dataset. Years after this
/// are read from the prediction table.
pub const LAST_HISTORICAL_YEAR: i32 = 2019;
pub const FIRST_PREDICTION_YEAR: i32 = 2020;
pub const LAST_PREDICTION_YEAR: i32 = 2050;

pub const MIN_YEAR: i32 = 1960;
pub const MAX_YEAR: i32 = LAST_PREDICTION_YEAR;

/// A country name after normalization. Only the normalizer hands these out,
/// so two datasets holding the same `CountryName` agree on the spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CountryName(String);

impl CountryName {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearPoint {
    pub year: i32,
    pub emissions: f64,
}

impl YearPoint {
    pub const fn new(year: i32, emissions: f64) -> Self {
        Self { year, emissions }
    }
}

/// Year-ascending, duplicate-free emissions points for one country.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EmissionsSeries(Vec<YearPoint>);

impl EmissionsSeries {
    /// Sorts by year and keeps the first point seen for each year.
    pub fn from_points(points: Vec<YearPoint>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let mut points: Vec<YearPoint> = points
            .into_iter()
            .filter(|point| seen.insert(point.year))
            .collect();
        points.sort_by_key(|point| point.year);
        Self(points)
    }

    pub fn points(&self) -> &[YearPoint] {
        &self.0
    }

    pub fn value_for(&self, year: i32) -> Option<f64> {
        self.0
            .binary_search_by_key(&year, |point| point.year)
            .ok()
            .map(|index| self.0[index].emissions)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Replaces points for years present in `incoming` and keeps every other
    /// year untouched.
    pub fn merge_from(&mut self, incoming: &Self) {
        let mut by_year: BTreeMap<i32, f64> =
            self.0.iter().map(|p| (p.year, p.emissions)).collect();
        for point in &incoming.0 {
            by_year.insert(point.year, point.emissions);
        }
        self.0 = by_year
            .into_iter()
            .map(|(year, emissions)| YearPoint { year, emissions })
            .collect();
    }
}

/// Insertion-ordered table keyed by canonical country name. Iteration order
/// is the order countries were first inserted, which is also the tie-break
/// order for rankings.
#[derive(Debug, Clone)]
pub struct CountryTable<V> {
    order: Vec<CountryName>,
    entries: HashMap<CountryName, V>,
}

impl<V> Default for CountryTable<V> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            entries: HashMap::new(),
        }
    }
}

impl<V> CountryTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, country: &CountryName) -> Option<&V> {
        self.entries.get(country)
    }

    pub fn get_mut(&mut self, country: &CountryName) -> Option<&mut V> {
        self.entries.get_mut(country)
    }

    pub fn contains(&self, country: &CountryName) -> bool {
        self.entries.contains_key(country)
    }

    pub fn insert(&mut self, country: CountryName, value: V) {
        if !self.entries.contains_key(&country) {
            self.order.push(country.clone());
        }
        self.entries.insert(country, value);
    }

    pub fn entry_or_insert_with(&mut self, country: &CountryName, make: impl FnOnce() -> V) -> &mut V {
        if !self.entries.contains_key(country) {
            self.order.push(country.clone());
        }
        self.entries.entry(country.clone()).or_insert_with(make)
    }

    pub fn countries(&self) -> &[CountryName] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CountryName, &V)> {
        self.order
            .iter()
            .filter_map(|country| self.entries.get(country).map(|value| (country, value)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

pub type EmissionsTable = CountryTable<EmissionsSeries>;
pub type PredictionTable = CountryTable<EmissionsSeries>;

/// The spelling each country first had in the emissions CSV. The prediction
/// service keys its models by these raw names, not by canonical ones.
pub type SourceNames = CountryTable<String>;

/// Output of the emissions loader.
#[derive(Debug, Clone, Default)]
pub struct EmissionsDataset {
    pub series: EmissionsTable,
    pub source_names: SourceNames,
}

/// Which EV dataset shape is loaded. Only one is authoritative at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvDatasetKind {
    Stock,
    Share,
}

impl EvDatasetKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stock => "stock",
            Self::Share => "share",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "stock" => Some(Self::Stock),
            "share" | "percentage" => Some(Self::Share),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum EvAdoption {
    /// Cumulative EV stock per country, summed over all rows.
    Stock(CountryTable<f64>),
    /// Share of new cars that are electric, in percent, per year.
    Share(CountryTable<BTreeMap<i32, f64>>),
}

impl EvAdoption {
    pub fn empty(kind: EvDatasetKind) -> Self {
        match kind {
            EvDatasetKind::Stock => Self::Stock(CountryTable::new()),
            EvDatasetKind::Share => Self::Share(CountryTable::new()),
        }
    }

    pub const fn kind(&self) -> EvDatasetKind {
        match self {
            Self::Stock(_) => EvDatasetKind::Stock,
            Self::Share(_) => EvDatasetKind::Share,
        }
    }

    /// Stock counts do not vary by year; shares are looked up for `year`.
    pub fn value_for(&self, country: &CountryName, year: i32) -> Option<f64> {
        match self {
            Self::Stock(table) => table.get(country).copied(),
            Self::Share(table) => table.get(country).and_then(|years| years.get(&year).copied()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Stock(table) => table.len(),
            Self::Share(table) => table.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The three loaded datasets the derivation engine reads from.
#[derive(Debug, Clone)]
pub struct DashboardTables {
    pub emissions: EmissionsTable,
    pub source_names: SourceNames,
    pub ev: EvAdoption,
    pub predictions: PredictionTable,
}

impl DashboardTables {
    pub fn new(ev_kind: EvDatasetKind) -> Self {
        Self {
            emissions: EmissionsTable::new(),
            source_names: SourceNames::new(),
            ev: EvAdoption::empty(ev_kind),
            predictions: PredictionTable::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Compare,
    Sentiment,
}

impl Tab {
    pub const ALL: [Self; 3] = [Self::Dashboard, Self::Compare, Self::Sentiment];

    pub const fn index(self) -> usize {
        match self {
            Self::Dashboard => 0,
            Self::Compare => 1,
            Self::Sentiment => 2,
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Dashboard),
            1 => Some(Self::Compare),
            2 => Some(Self::Sentiment),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Compare => "Compare",
            Self::Sentiment => "Sentiment",
        }
    }
}

/// Everything the user can change. Written only by input handling.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub ev_adoption_rate: f64,
    pub selected_country: Option<CountryName>,
    pub second_selected_country: Option<CountryName>,
    pub selected_year: i32,
    pub show_ev_map: bool,
    pub active_tab: Tab,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            ev_adoption_rate: 0.0,
            selected_country: None,
            second_selected_country: None,
            selected_year: LAST_HISTORICAL_YEAR,
            show_ev_map: false,
            active_tab: Tab::Dashboard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Fill for countries without a value. Its blue channel is non-zero, which
/// no emissions color has, and it matches none of the EV colors.
pub const NO_DATA_COLOR: Rgb = Rgb::new(211, 211, 211);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Article {
    pub title: String,
    pub sentiment: f64,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_sorts_and_drops_repeated_years() {
        let series = EmissionsSeries::from_points(vec![
            YearPoint::new(2001, 3.0),
            YearPoint::new(2000, 1.0),
            YearPoint::new(2001, 9.0),
        ]);

        assert_eq!(
            series.points(),
            &[YearPoint::new(2000, 1.0), YearPoint::new(2001, 3.0)]
        );
        assert_eq!(series.value_for(2001), Some(3.0));
        assert_eq!(series.value_for(1999), None);
    }

    #[test]
    fn merge_from_overrides_only_incoming_years() {
        let mut series =
            EmissionsSeries::from_points(vec![YearPoint::new(2020, 1.0), YearPoint::new(2021, 2.0)]);
        series.merge_from(&EmissionsSeries::from_points(vec![
            YearPoint::new(2021, 5.0),
            YearPoint::new(2022, 6.0),
        ]));

        assert_eq!(series.value_for(2020), Some(1.0));
        assert_eq!(series.value_for(2021), Some(5.0));
        assert_eq!(series.value_for(2022), Some(6.0));
    }

    #[test]
    fn country_table_keeps_first_insertion_order() {
        let mut table = CountryTable::new();
        table.insert(CountryName::new("B"), 1);
        table.insert(CountryName::new("A"), 2);
        table.insert(CountryName::new("B"), 3);

        let order: Vec<_> = table.iter().map(|(c, v)| (c.as_str(), *v)).collect();
        assert_eq!(order, vec![("B", 3), ("A", 2)]);
    }

    #[test]
    fn stock_values_ignore_year() {
        let mut table = CountryTable::new();
        table.insert(CountryName::new("Norway"), 650_000.0);
        let ev = EvAdoption::Stock(table);

        assert_eq!(ev.value_for(&CountryName::new("Norway"), 1990), Some(650_000.0));
        assert_eq!(ev.kind(), EvDatasetKind::Stock);
    }

    #[test]
    fn tab_index_round_trips() {
        for tab in Tab::ALL {
            assert_eq!(Tab::from_index(tab.index()), Some(tab));
        }
        assert_eq!(Tab::from_index(7), None);
    }
}
