use crate::data::models::{EmissionsRecord, EvShareRecord, EvStockRecord, EV_STOCK_PARAMETER};
use crate::domain::{
    CountryTable, EmissionsDataset, EmissionsSeries, EmissionsTable, EvAdoption, EvDatasetKind,
    SourceNames, YearPoint,
};
use crate::normalize::CountryNormalizer;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a GeoJSON FeatureCollection")]
    NotFeatureCollection,
}

async fn read_file(path: &Path) -> Result<Vec<u8>, LoadError> {
    tokio::fs::read(path).await.map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses `country_name,year,value` rows into per-country series.
///
/// Rows with an empty value are skipped; any row that fails to parse fails
/// the whole load so the caller can fall back to an empty table. The first
/// raw spelling of each country is kept alongside the series.
pub fn load_emissions(
    reader: impl Read,
    normalizer: &CountryNormalizer,
) -> Result<EmissionsDataset, LoadError> {
    let mut grouped: CountryTable<Vec<YearPoint>> = CountryTable::new();
    let mut source_names = SourceNames::new();
    let mut skipped = 0_usize;

    for record in csv::Reader::from_reader(reader).deserialize::<EmissionsRecord>() {
        let record = record?;
        let Some(value) = record.value else {
            skipped += 1;
            continue;
        };
        let country = normalizer.normalize(&record.country_name);
        if !source_names.contains(&country) {
            source_names.insert(country.clone(), record.country_name.trim().to_string());
        }
        grouped
            .entry_or_insert_with(&country, Vec::new)
            .push(YearPoint::new(record.year, value));
    }

    if skipped > 0 {
        debug!(skipped, "skipped emissions rows without a value");
    }

    let mut series = EmissionsTable::new();
    for (country, points) in grouped.iter() {
        series.insert(country.clone(), EmissionsSeries::from_points(points.clone()));
    }
    Ok(EmissionsDataset {
        series,
        source_names,
    })
}

pub async fn load_emissions_file(
    path: &Path,
    normalizer: &CountryNormalizer,
) -> Result<EmissionsDataset, LoadError> {
    let bytes = read_file(path).await?;
    let dataset = load_emissions(bytes.as_slice(), normalizer)?;
    info!(path = %path.display(), countries = dataset.series.len(), "loaded emissions");
    Ok(dataset)
}

/// Parses either EV dataset shape. Stock rows are summed per region; share
/// rows are assigned per (country, year), later rows replacing earlier ones.
pub fn load_ev(
    reader: impl Read,
    kind: EvDatasetKind,
    normalizer: &CountryNormalizer,
) -> Result<EvAdoption, LoadError> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    match kind {
        EvDatasetKind::Stock => {
            let mut stock: CountryTable<f64> = CountryTable::new();
            for record in csv_reader.deserialize::<EvStockRecord>() {
                let record = record?;
                if record.parameter != EV_STOCK_PARAMETER {
                    continue;
                }
                let Some(value) = record.value else {
                    continue;
                };
                let country = normalizer.normalize(&record.region);
                *stock.entry_or_insert_with(&country, || 0.0) += value;
            }
            Ok(EvAdoption::Stock(stock))
        }
        EvDatasetKind::Share => {
            let mut shares: CountryTable<BTreeMap<i32, f64>> = CountryTable::new();
            for record in csv_reader.deserialize::<EvShareRecord>() {
                let record = record?;
                let Some(share) = record.share else {
                    continue;
                };
                let country = normalizer.normalize(&record.entity);
                shares
                    .entry_or_insert_with(&country, BTreeMap::new)
                    .insert(record.year, share);
            }
            Ok(EvAdoption::Share(shares))
        }
    }
}

pub async fn load_ev_file(
    path: &Path,
    kind: EvDatasetKind,
    normalizer: &CountryNormalizer,
) -> Result<EvAdoption, LoadError> {
    let bytes = read_file(path).await?;
    let ev = load_ev(bytes.as_slice(), kind, normalizer)?;
    info!(
        path = %path.display(),
        kind = kind.as_str(),
        countries = ev.len(),
        "loaded EV dataset"
    );
    Ok(ev)
}
