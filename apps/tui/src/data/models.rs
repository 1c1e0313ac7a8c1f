use serde::Deserialize;

/// One row of the historical emissions CSV (kt of CO2).
#[derive(Debug, Deserialize)]
pub struct EmissionsRecord {
    pub country_name: String,
    pub year: i32,
    pub value: Option<f64>,
}

/// One row of the IEA global EV dataset. Only `parameter == "EV stock"` rows
/// are counted.
#[derive(Debug, Deserialize)]
pub struct EvStockRecord {
    pub region: String,
    pub parameter: String,
    pub value: Option<f64>,
}

/// One row of the share-of-new-cars dataset.
#[derive(Debug, Deserialize)]
pub struct EvShareRecord {
    #[serde(rename = "Entity")]
    pub entity: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Share of new cars that are electric")]
    pub share: Option<f64>,
}

pub const EV_STOCK_PARAMETER: &str = "EV stock";
