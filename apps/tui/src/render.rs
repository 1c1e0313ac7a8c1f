//! Renderer-neutral adapters: map shading, viewport math and chart data.
//! The terminal widgets in the binary draw whatever these produce.

use crate::data::{CountryBoundaries, CountryShape};
use crate::domain::{GeoPoint, Rgb, ViewState};
use crate::engine::{Comparison, DerivedPoint, Derivation, RankedEmitter};

pub const MIN_ZOOM: u8 = 2;
pub const MAX_ZOOM: u8 = 8;
/// Zoom applied when the map recenters on a selected country.
pub const SELECTION_ZOOM: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    pub center: GeoPoint,
    pub zoom: u8,
}

impl Default for MapViewport {
    fn default() -> Self {
        Self {
            center: GeoPoint { lat: 20.0, lng: 0.0 },
            zoom: MIN_ZOOM,
        }
    }
}

impl MapViewport {
    pub fn recenter(&mut self, point: GeoPoint) {
        self.center = point;
        self.zoom = SELECTION_ZOOM;
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + 1).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1).max(MIN_ZOOM);
    }

    /// Longitude span halves with every zoom step; zoom 2 shows the world.
    pub fn lng_span(&self) -> f64 {
        360.0 / f64::from(1_u32 << (self.zoom.saturating_sub(MIN_ZOOM)))
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        let half = self.lng_span() / 2.0;
        [self.center.lng - half, self.center.lng + half]
    }

    pub fn y_bounds(&self) -> [f64; 2] {
        let half = self.lng_span() / 4.0;
        [self.center.lat - half, self.center.lat + half]
    }
}

#[derive(Debug, Clone)]
pub struct ShadedCountry<'a> {
    pub shape: &'a CountryShape,
    pub color: Rgb,
    pub selected: bool,
}

/// Assigns each boundary its fill color for the current view. Lookups use
/// the normalized name, never the raw GeoJSON label.
pub fn shade_countries<'a>(
    boundaries: &'a CountryBoundaries,
    engine: &Derivation<'_>,
    view: &ViewState,
) -> Vec<ShadedCountry<'a>> {
    boundaries
        .shapes
        .iter()
        .map(|shape| ShadedCountry {
            shape,
            color: engine.fill_color(&shape.name, view),
            selected: view.selected_country.as_ref() == Some(&shape.name)
                || view.second_selected_country.as_ref() == Some(&shape.name),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesChart {
    pub original: Vec<(f64, f64)>,
    pub adjusted: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

pub fn series_chart(points: &[DerivedPoint]) -> Option<SeriesChart> {
    let first = points.first()?;
    let last = points.last()?;

    let original: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (f64::from(p.year), p.emissions))
        .collect();
    let adjusted: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (f64::from(p.year), p.adjusted_emissions))
        .collect();
    let max = points
        .iter()
        .map(|p| p.emissions.max(p.adjusted_emissions))
        .fold(0.0_f64, f64::max);

    let (start, end) = (f64::from(first.year), f64::from(last.year));
    Some(SeriesChart {
        original,
        adjusted,
        x_bounds: if start < end { [start, end] } else { [start - 1.0, end + 1.0] },
        y_bounds: [0.0, if max > 0.0 { max * 1.1 } else { 1.0 }],
    })
}

/// Evenly spaced tick labels across `bounds`.
pub fn axis_labels(bounds: [f64; 2], count: usize, format: impl Fn(f64) -> String) -> Vec<String> {
    if count < 2 {
        return vec![format(bounds[0])];
    }
    #[allow(clippy::cast_precision_loss)]
    let step = (bounds[1] - bounds[0]) / (count - 1) as f64;
    #[allow(clippy::cast_precision_loss)]
    (0..count)
        .map(|i| format(bounds[0] + step * i as f64))
        .collect()
}

/// Compact kilotonne figure for labels: 1.2M, 350k, 42.
pub fn format_kt(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if magnitude >= 1_000.0 {
        format!("{:.0}k", value / 1_000.0)
    } else {
        format!("{value:.0}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarDatum {
    pub label: String,
    pub value: u64,
    pub high: bool,
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bar_value(value: f64) -> u64 {
    value.max(0.0).round() as u64
}

pub fn emitter_bars(emitters: &[RankedEmitter]) -> Vec<BarDatum> {
    emitters
        .iter()
        .enumerate()
        .map(|(index, emitter)| BarDatum {
            label: emitter.country.to_string(),
            value: bar_value(emitter.adjusted_emissions),
            high: index == 0,
        })
        .collect()
}

/// Missing values draw as empty bars.
pub fn comparison_bars(comparison: &Comparison) -> Vec<BarDatum> {
    [&comparison.first, &comparison.second]
        .into_iter()
        .map(|entry| BarDatum {
            label: entry.country.to_string(),
            value: entry.adjusted_emissions.map_or(0, bar_value),
            high: entry.high,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DashboardTables, EmissionsSeries, EvDatasetKind, YearPoint, NO_DATA_COLOR};
    use crate::engine::DashboardProfile;
    use crate::normalize::{CountryNormalizer, RecognizedCountries};

    #[test]
    fn viewport_zoom_is_bounded() {
        let mut viewport = MapViewport::default();
        assert_eq!(viewport.x_bounds(), [-180.0, 180.0]);
        assert_eq!(viewport.y_bounds(), [-70.0, 110.0]);

        viewport.zoom_out();
        assert_eq!(viewport.zoom, MIN_ZOOM);
        for _ in 0..20 {
            viewport.zoom_in();
        }
        assert_eq!(viewport.zoom, MAX_ZOOM);
    }

    #[test]
    fn recenter_zooms_to_selection() {
        let mut viewport = MapViewport::default();
        viewport.recenter(GeoPoint { lat: 46.0, lng: 2.0 });
        assert_eq!(viewport.zoom, SELECTION_ZOOM);
        assert_eq!(viewport.x_bounds(), [-43.0, 47.0]);
    }

    #[test]
    fn shading_uses_normalized_names() {
        let normalizer = CountryNormalizer::default();
        let geo = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"name":"Russian Federation"},
             "geometry":{"type":"Polygon","coordinates":[[[30,50],[40,50],[40,60],[30,50]]]}},
            {"type":"Feature","properties":{"name":"Atlantis"},
             "geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}}]}"#;
        let boundaries = CountryBoundaries::parse(geo.as_bytes(), &normalizer).unwrap();

        let mut tables = DashboardTables::new(EvDatasetKind::Share);
        tables.emissions.insert(
            normalizer.normalize("Russia"),
            EmissionsSeries::from_points(vec![YearPoint::new(2019, 1_000_000.0)]),
        );
        let profile = DashboardProfile::default();
        let recognized = RecognizedCountries::default();
        let engine = Derivation::new(&tables, &profile, &recognized);
        let view = ViewState {
            selected_country: Some(normalizer.normalize("Russia")),
            ..ViewState::default()
        };

        let shaded = shade_countries(&boundaries, &engine, &view);
        assert_eq!(shaded[0].color, Rgb::new(255, 0, 0));
        assert!(shaded[0].selected);
        assert_eq!(shaded[1].color, NO_DATA_COLOR);
        assert!(!shaded[1].selected);
    }

    #[test]
    fn series_chart_bounds_cover_data() {
        let points = [
            DerivedPoint { year: 2000, emissions: 100.0, adjusted_emissions: 70.0 },
            DerivedPoint { year: 2030, emissions: 200.0, adjusted_emissions: 140.0 },
        ];
        let chart = series_chart(&points).unwrap();
        assert_eq!(chart.x_bounds, [2000.0, 2030.0]);
        assert!((chart.y_bounds[1] - 220.0).abs() < 1e-9);
        assert_eq!(chart.adjusted[1], (2030.0, 140.0));
        assert!(series_chart(&[]).is_none());
    }

    #[test]
    fn labels_and_units() {
        assert_eq!(format_kt(10_707_219.6), "10.7M");
        assert_eq!(format_kt(350_400.0), "350k");
        assert_eq!(format_kt(42.4), "42");
        assert_eq!(
            axis_labels([1960.0, 2050.0], 3, |v| format!("{v:.0}")),
            vec!["1960", "2005", "2050"]
        );
    }
}
