//! Blocking `IsochroneProvider` over GraphHopper's isochrone API.

use std::time::Duration;

use geo::{Coord, Polygon};
use intercept_core::{IsochroneError, IsochroneProvider};
use log::debug;
use url::Url;

use super::graphhopper::IsochroneResponse;
use crate::http::{BlockingClient, ClientBuildError, HttpClientConfig};

/// Default base URL of a local GraphHopper instance.
pub const DEFAULT_ISOCHRONE_URL: &str = "http://localhost:8989";

/// Default routing profile.
const DEFAULT_PROFILE: &str = "car";

/// Configuration for [`HttpIsochroneProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpIsochroneProviderConfig {
    /// Connection settings.
    pub http: HttpClientConfig,
    /// GraphHopper profile, e.g. `"car"` or `"foot"`.
    pub profile: String,
}

impl Default for HttpIsochroneProviderConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ISOCHRONE_URL)
    }
}

impl HttpIsochroneProviderConfig {
    /// Configuration for `base_url` using the `car` profile.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: HttpClientConfig::new(base_url),
            profile: DEFAULT_PROFILE.to_owned(),
        }
    }

    /// Set the routing profile.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }
}

/// Isochrone provider calling a GraphHopper-compatible HTTP service.
#[derive(Debug)]
pub struct HttpIsochroneProvider {
    client: BlockingClient,
    profile: String,
}

impl HttpIsochroneProvider {
    /// Provider for `base_url` with default settings.
    ///
    /// # Errors
    /// Returns [`ClientBuildError`] when the URL is invalid or the HTTP
    /// client or runtime cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientBuildError> {
        Self::with_config(HttpIsochroneProviderConfig::new(base_url))
    }

    /// Provider with explicit configuration.
    ///
    /// # Errors
    /// Same as [`HttpIsochroneProvider::new`].
    pub fn with_config(config: HttpIsochroneProviderConfig) -> Result<Self, ClientBuildError> {
        Ok(Self {
            client: BlockingClient::build(&config.http)?,
            profile: config.profile,
        })
    }

    /// Build the request URL: `point` is `lat,lon` and the limit is in whole
    /// seconds.
    fn isochrone_url(&self, center: Coord<f64>, time_limit: Duration) -> Url {
        let point = format!("{},{}", center.y, center.x);
        let seconds = time_limit.as_secs().to_string();
        self.client.endpoint(
            "isochrone",
            &[
                ("point", point.as_str()),
                ("time_limit", seconds.as_str()),
                ("profile", self.profile.as_str()),
                ("buckets", "1"),
            ],
        )
    }

    async fn fetch(&self, url: Url) -> Result<IsochroneResponse, IsochroneError> {
        let unavailable = |err: &reqwest::Error| IsochroneError::ServiceUnavailable {
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
            .map_err(|err| IsochroneError::InvalidResponse {
                message: err.to_string(),
            })
    }
}

/// Extract the first polygon of a response.
fn first_polygon(response: IsochroneResponse) -> Result<Polygon<f64>, IsochroneError> {
    let feature = response
        .polygons
        .into_iter()
        .next()
        .ok_or(IsochroneError::NoPolygon)?;
    if feature.geometry.kind != "Polygon" {
        return Err(IsochroneError::InvalidResponse {
            message: format!("expected a Polygon geometry, found {}", feature.geometry.kind),
        });
    }
    feature
        .geometry
        .into_polygon()
        .ok_or(IsochroneError::NoPolygon)
}

impl IsochroneProvider for HttpIsochroneProvider {
    /// Fetch the isochrone for `time_limit` around `center`.
    ///
    /// Sub-second parts of the limit are truncated. When called inside a
    /// `current_thread` Tokio runtime the request runs on the provider's own
    /// runtime and blocks the caller's.
    fn isochrone(
        &self,
        center: Coord<f64>,
        time_limit: Duration,
    ) -> Result<Polygon<f64>, IsochroneError> {
        if time_limit.as_secs() == 0 {
            return Err(IsochroneError::ZeroTimeLimit);
        }
        let url = self.isochrone_url(center, time_limit);
        debug!("requesting isochrone from {url}");
        let response = self.client.block_on(self.fetch(url))?;
        first_polygon(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    use crate::isochrone::graphhopper::{GeoJsonPolygon, PolygonFeature};

    #[fixture]
    fn provider() -> HttpIsochroneProvider {
        HttpIsochroneProvider::new("http://gh.example.com").expect("provider should build")
    }

    fn feature(kind: &str, coordinates: Vec<Vec<[f64; 2]>>) -> PolygonFeature {
        PolygonFeature {
            geometry: GeoJsonPolygon {
                kind: kind.to_owned(),
                coordinates,
            },
        }
    }

    #[rstest]
    fn url_puts_latitude_first(provider: HttpIsochroneProvider) {
        let url = provider.isochrone_url(Coord { x: 1.5, y: 43.25 }, Duration::from_secs(1_800));
        assert_eq!(
            url.as_str(),
            "http://gh.example.com/isochrone?point=43.25%2C1.5&time_limit=1800&profile=car&buckets=1"
        );
    }

    #[rstest]
    fn profile_is_configurable() {
        let provider = HttpIsochroneProvider::with_config(
            HttpIsochroneProviderConfig::new("http://gh.example.com").with_profile("foot"),
        )
        .expect("provider should build");
        let url = provider.isochrone_url(Coord { x: 0.0, y: 0.0 }, Duration::from_secs(60));
        assert!(url.as_str().contains("profile=foot"));
    }

    #[rstest]
    fn zero_limit_is_rejected_without_a_request(provider: HttpIsochroneProvider) {
        let err = provider
            .isochrone(Coord { x: 0.0, y: 0.0 }, Duration::from_millis(500))
            .expect_err("zero limit");
        assert_eq!(err, IsochroneError::ZeroTimeLimit);
    }

    #[rstest]
    fn first_polygon_is_returned() {
        let response = IsochroneResponse {
            polygons: vec![
                feature("Polygon", vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]),
                feature("Polygon", vec![vec![[5.0, 5.0], [6.0, 5.0], [6.0, 6.0], [5.0, 5.0]]]),
            ],
        };
        let polygon = first_polygon(response).expect("polygon");
        assert_eq!(polygon.exterior().0.len(), 4);
        assert_eq!(polygon.exterior().0.get(1), Some(&Coord { x: 1.0, y: 0.0 }));
    }

    #[rstest]
    fn empty_response_has_no_polygon() {
        let response = IsochroneResponse {
            polygons: Vec::new(),
        };
        assert_eq!(first_polygon(response), Err(IsochroneError::NoPolygon));
    }

    #[rstest]
    fn other_geometries_are_invalid() {
        let response = IsochroneResponse {
            polygons: vec![feature("MultiPolygon", Vec::new())],
        };
        assert!(matches!(
            first_polygon(response),
            Err(IsochroneError::InvalidResponse { .. })
        ));
    }

    #[rstest]
    fn unreachable_service_is_unavailable() {
        let provider = HttpIsochroneProvider::with_config(
            HttpIsochroneProviderConfig::new("http://127.0.0.1:9")
                .with_timeout(Duration::from_secs(2)),
        )
        .expect("provider should build");
        let err = provider
            .isochrone(Coord { x: 0.0, y: 0.0 }, Duration::from_secs(60))
            .expect_err("nothing listens on the discard port");
        assert!(err.is_unavailable());
    }
}
