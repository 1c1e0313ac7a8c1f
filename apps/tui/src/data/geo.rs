use crate::data::loaders::LoadError;
use crate::domain::CountryName;
use crate::normalize::CountryNormalizer;
use geojson::{GeoJson, Value};
use std::path::Path;
use tracing::{info, warn};

/// One country outline. `raw_name` is kept as it appears in the GeoJSON;
/// `name` is what every table lookup uses.
#[derive(Debug, Clone)]
pub struct CountryShape {
    pub raw_name: String,
    pub name: CountryName,
    /// Exterior rings as `(lng, lat)` pairs.
    pub rings: Vec<Vec<(f64, f64)>>,
}

#[derive(Debug, Clone, Default)]
pub struct CountryBoundaries {
    pub shapes: Vec<CountryShape>,
}

impl CountryBoundaries {
    pub fn parse(reader: impl std::io::Read, normalizer: &CountryNormalizer) -> Result<Self, LoadError> {
        let GeoJson::FeatureCollection(collection) = GeoJson::from_reader(reader)? else {
            return Err(LoadError::NotFeatureCollection);
        };

        let mut shapes = Vec::with_capacity(collection.features.len());
        for feature in collection.features {
            let Some(raw_name) = feature
                .properties
                .as_ref()
                .and_then(|props| props.get("name"))
                .and_then(|value| value.as_str())
                .map(str::to_string)
            else {
                warn!("skipping boundary feature without a name");
                continue;
            };

            let rings = match feature.geometry.map(|geometry| geometry.value) {
                Some(Value::Polygon(polygon)) => exterior_rings(std::iter::once(polygon)),
                Some(Value::MultiPolygon(polygons)) => exterior_rings(polygons),
                _ => {
                    warn!(country = %raw_name, "skipping boundary feature without polygons");
                    continue;
                }
            };

            shapes.push(CountryShape {
                name: normalizer.normalize(&raw_name),
                raw_name,
                rings,
            });
        }

        Ok(Self { shapes })
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

fn exterior_rings(polygons: impl IntoIterator<Item = Vec<Vec<Vec<f64>>>>) -> Vec<Vec<(f64, f64)>> {
    polygons
        .into_iter()
        .filter_map(|polygon| polygon.into_iter().next())
        .map(|ring| {
            ring.into_iter()
                .filter_map(|position| match position.as_slice() {
                    [lng, lat, ..] => Some((*lng, *lat)),
                    _ => None,
                })
                .collect()
        })
        .collect()
}

pub async fn load_boundaries(
    path: &Path,
    normalizer: &CountryNormalizer,
) -> Result<CountryBoundaries, LoadError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let boundaries = CountryBoundaries::parse(bytes.as_slice(), normalizer)?;
    info!(path = %path.display(), shapes = boundaries.len(), "loaded country boundaries");
    Ok(boundaries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
      "type": "FeatureCollection",
      "features": [
        {
          "type": "Feature",
          "properties": { "name": "United States of America" },
          "geometry": {
            "type": "MultiPolygon",
            "coordinates": [
              [[[-100.0, 40.0], [-90.0, 40.0], [-90.0, 45.0], [-100.0, 40.0]]],
              [[[-150.0, 60.0], [-140.0, 60.0], [-140.0, 65.0], [-150.0, 60.0]]]
            ]
          }
        },
        {
          "type": "Feature",
          "properties": { "name": "France" },
          "geometry": {
            "type": "Polygon",
            "coordinates": [[[2.0, 46.0], [3.0, 46.0], [3.0, 47.0], [2.0, 46.0]]]
          }
        },
        {
          "type": "Feature",
          "properties": { "iso": "XX" },
          "geometry": { "type": "Point", "coordinates": [0.0, 0.0] }
        }
      ]
    }"#;

    #[test]
    fn parses_named_polygons_and_normalizes() {
        let boundaries =
            CountryBoundaries::parse(SAMPLE.as_bytes(), &CountryNormalizer::default()).unwrap();

        assert_eq!(boundaries.len(), 2);
        let usa = &boundaries.shapes[0];
        assert_eq!(usa.raw_name, "United States of America");
        assert_eq!(usa.name.as_str(), "United States");
        assert_eq!(usa.rings.len(), 2);
        assert_eq!(usa.rings[0][0], (-100.0, 40.0));
        assert_eq!(boundaries.shapes[1].rings.len(), 1);
    }

    #[test]
    fn truncated_json_is_a_json_error() {
        let result = CountryBoundaries::parse(&b"{ \"type\": \"Feature"[..], &CountryNormalizer::default());
        assert!(matches!(result, Err(LoadError::Json(_))));
    }

    #[test]
    fn rejects_bare_geometry() {
        let json = r#"{ "type": "Point", "coordinates": [0.0, 0.0] }"#;
        let result = CountryBoundaries::parse(json.as_bytes(), &CountryNormalizer::default());
        assert!(matches!(result, Err(LoadError::NotFeatureCollection)));
    }
}
