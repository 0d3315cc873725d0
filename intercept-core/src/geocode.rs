//! Resolve free-form addresses to coordinates.

use geo::Coord;
use thiserror::Error;

/// Errors from [`Geocoder::geocode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// The address was blank.
    #[error("address must not be empty")]
    EmptyAddress,
    /// The service answered but knew no such address.
    #[error("no location found for '{address}'")]
    NotFound {
        /// Address as supplied by the caller.
        address: String,
    },
    /// The service could not be reached, timed out or answered with an error
    /// status.
    #[error("geocoding service at {url} is unavailable: {message}")]
    ServiceUnavailable {
        /// Request URL.
        url: String,
        /// Transport or status description.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("invalid geocoding response: {message}")]
    InvalidResponse {
        /// Decoder message.
        message: String,
    },
}

impl GeocodeError {
    /// Report whether the failure lies with the remote service rather than
    /// with the address.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::ServiceUnavailable { .. })
    }
}

/// Translate an address into WGS84 coordinates.
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use intercept_core::{GeocodeError, Geocoder};
///
/// struct TownHall;
///
/// impl Geocoder for TownHall {
///     fn geocode(&self, address: &str) -> Result<Coord<f64>, GeocodeError> {
///         match address {
///             "Auch" => Ok(Coord { x: 0.5857, y: 43.6465 }),
///             _ => Err(GeocodeError::NotFound { address: address.to_owned() }),
///         }
///     }
/// }
///
/// assert_eq!(TownHall.geocode("Auch")?.y, 43.6465);
/// assert!(TownHall.geocode("Atlantis").is_err());
/// # Ok::<(), GeocodeError>(())
/// ```
pub trait Geocoder {
    /// Resolve `address` to a single coordinate.
    fn geocode(&self, address: &str) -> Result<Coord<f64>, GeocodeError>;
}

impl<T: Geocoder + ?Sized> Geocoder for &T {
    fn geocode(&self, address: &str) -> Result<Coord<f64>, GeocodeError> {
        (**self).geocode(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use crate::test_support::StubGeocoder;

    #[rstest]
    fn stub_resolves_known_addresses() {
        let geocoder = StubGeocoder::default().with_address("Auch", Coord { x: 0.58, y: 43.64 });
        assert_eq!(
            geocoder.geocode("Auch"),
            Ok(Coord { x: 0.58, y: 43.64 })
        );
    }

    #[rstest]
    #[case("", GeocodeError::EmptyAddress)]
    #[case("Nowhere", GeocodeError::NotFound { address: "Nowhere".into() })]
    fn stub_reports_failures(#[case] address: &str, #[case] expected: GeocodeError) {
        assert_eq!(StubGeocoder::default().geocode(address), Err(expected));
    }

    #[rstest]
    fn unavailability_is_distinguishable_from_not_found() {
        let down = GeocodeError::ServiceUnavailable {
            url: "http://localhost".into(),
            message: "connection refused".into(),
        };
        assert!(down.is_unavailable());
        assert!(!GeocodeError::NotFound { address: "x".into() }.is_unavailable());
    }
}
