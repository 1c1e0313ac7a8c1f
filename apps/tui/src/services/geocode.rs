use crate::domain::{CountryName, GeoPoint};
use crate::services::{check_status, parse_base_url, BoxFuture, ServiceError};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;
use tracing::debug;

pub trait GeocodeSource: Send + Sync {
    /// First matching location for `address`, or `None` when the service
    /// knows no such place.
    fn locate<'a>(&'a self, address: &'a str) -> BoxFuture<'a, Result<Option<GeoPoint>, ServiceError>>;
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeHit>,
}

#[derive(Debug, Deserialize)]
struct GeocodeHit {
    geometry: GeocodeGeometry,
}

#[derive(Debug, Deserialize)]
struct GeocodeGeometry {
    location: GeoPoint,
}

/// Address lookup against a Google-style geocoding endpoint
/// (`?address=..&key=..`).
#[derive(Debug, Clone)]
pub struct HttpGeocoder {
    client: reqwest::Client,
    endpoint: reqwest::Url,
    api_key: String,
}

impl HttpGeocoder {
    pub fn new(client: reqwest::Client, endpoint: &str, api_key: impl Into<String>) -> Result<Self, ServiceError> {
        Ok(Self {
            client,
            endpoint: parse_base_url(endpoint)?,
            api_key: api_key.into(),
        })
    }
}

impl GeocodeSource for HttpGeocoder {
    fn locate<'a>(&'a self, address: &'a str) -> BoxFuture<'a, Result<Option<GeoPoint>, ServiceError>> {
        Box::pin(async move {
            let mut url = self.endpoint.clone();
            url.query_pairs_mut()
                .append_pair("address", address)
                .append_pair("key", &self.api_key);
            let response = check_status("geocoder", self.client.get(url).send().await?)?;
            let body: GeocodeResponse = response.json().await?;
            Ok(body
                .results
                .into_iter()
                .next()
                .map(|hit| hit.geometry.location))
        })
    }
}

/// Identifies the selection that started a geocode request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionToken(u64);

/// A finished lookup, tagged with the selection that asked for it.
#[derive(Debug)]
pub struct GeocodeOutcome {
    pub token: SelectionToken,
    pub country: CountryName,
    pub result: Result<Option<GeoPoint>, ServiceError>,
}

/// Keeps at most one geocode in flight: the one for the latest selection.
///
/// A new request aborts the previous task, and [`GeocodeRequests::accept`]
/// drops any outcome whose token does not match the latest request, so a
/// slow answer for an old selection can never move the map.
pub struct GeocodeRequests<E> {
    source: Option<Arc<dyn GeocodeSource>>,
    next_token: u64,
    current: Option<(SelectionToken, CountryName)>,
    handle: Option<AbortHandle>,
    sender: UnboundedSender<E>,
}

impl<E> GeocodeRequests<E>
where
    E: From<GeocodeOutcome> + Send + 'static,
{
    /// With no source, requests are accepted and silently never resolve.
    pub fn new(source: Option<Arc<dyn GeocodeSource>>, sender: UnboundedSender<E>) -> Self {
        Self {
            source,
            next_token: 0,
            current: None,
            handle: None,
            sender,
        }
    }

    pub fn request(&mut self, country: &CountryName) -> SelectionToken {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }

        self.next_token += 1;
        let token = SelectionToken(self.next_token);
        self.current = Some((token, country.clone()));

        if let Some(source) = &self.source {
            let source = Arc::clone(source);
            let sender = self.sender.clone();
            let country = country.clone();
            let handle = tokio::spawn(async move {
                let result = source.locate(country.as_str()).await;
                let _ = sender.send(E::from(GeocodeOutcome {
                    token,
                    country,
                    result,
                }));
            })
            .abort_handle();
            self.handle = Some(handle);
        }

        token
    }

    /// Returns the lookup result if `outcome` belongs to the latest request,
    /// otherwise discards it.
    pub fn accept(&mut self, outcome: GeocodeOutcome) -> Option<Result<Option<GeoPoint>, ServiceError>> {
        match &self.current {
            Some((token, country)) if *token == outcome.token && *country == outcome.country => {
                self.current = None;
                self.handle = None;
                Some(outcome.result)
            }
            _ => {
                debug!(country = %outcome.country, "discarding stale geocode result");
                None
            }
        }
    }

    pub fn pending(&self) -> Option<&CountryName> {
        self.current.as_ref().map(|(_, country)| country)
    }

    pub const fn is_enabled(&self) -> bool {
        self.source.is_some()
    }
}
