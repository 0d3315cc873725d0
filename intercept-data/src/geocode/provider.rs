//! Blocking `Geocoder` over Nominatim's search API.

use geo::Coord;
use intercept_core::{GeocodeError, Geocoder};
use log::debug;
use url::Url;

use super::nominatim::Place;
use crate::http::{BlockingClient, ClientBuildError, HttpClientConfig};

/// Default base URL of a local Nominatim instance.
pub const DEFAULT_GEOCODER_URL: &str = "http://localhost:8080";

/// Geocoder calling a Nominatim-compatible HTTP service.
#[derive(Debug)]
pub struct HttpGeocoder {
    client: BlockingClient,
}

impl HttpGeocoder {
    /// Geocoder for `base_url` with default settings.
    ///
    /// # Errors
    /// Returns [`ClientBuildError`] when the URL is invalid or the HTTP
    /// client or runtime cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientBuildError> {
        Self::with_config(&HttpClientConfig::new(base_url))
    }

    /// Geocoder with explicit connection settings.
    ///
    /// # Errors
    /// Same as [`HttpGeocoder::new`].
    pub fn with_config(config: &HttpClientConfig) -> Result<Self, ClientBuildError> {
        Ok(Self {
            client: BlockingClient::build(config)?,
        })
    }

    fn search_url(&self, address: &str) -> Url {
        self.client.endpoint(
            "search",
            &[("q", address), ("format", "json"), ("limit", "1")],
        )
    }

    async fn fetch(&self, url: Url) -> Result<Vec<Place>, GeocodeError> {
        let unavailable = |err: &reqwest::Error| GeocodeError::ServiceUnavailable {
            url: url.to_string(),
            message: self.client.describe(err),
        };
        let response = self
            .client
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| unavailable(&err))?
            .error_for_status()
            .map_err(|err| unavailable(&err))?;
        response
            .json()
            .await
            .map_err(|err| GeocodeError::InvalidResponse {
                message: err.to_string(),
            })
    }
}

/// Resolve the first hit of a search response.
fn first_match(address: &str, places: Vec<Place>) -> Result<Coord<f64>, GeocodeError> {
    let place = places
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeError::NotFound {
            address: address.to_owned(),
        })?;
    if let Some(name) = &place.display_name {
        debug!("geocoded '{address}' to '{name}'");
    }
    place
        .coord()
        .map_err(|message| GeocodeError::InvalidResponse { message })
}

impl Geocoder for HttpGeocoder {
    fn geocode(&self, address: &str) -> Result<Coord<f64>, GeocodeError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }
        let places = self.client.block_on(self.fetch(self.search_url(address)))?;
        first_match(address, places)
    }
}
