//! Deterministic collaborators for unit and behaviour tests.
//!
//! None of these types touch the network. Geometry is built on a sphere with
//! [`Haversine`], so disks are round on the ground rather than in degrees.

use std::collections::HashMap;
use std::time::Duration;

use geo::{Coord, Destination, Haversine, LineString, Point, Polygon};

use crate::{GeocodeError, Geocoder, IsochroneError, IsochroneProvider};

/// Number of vertices used to approximate a disk.
pub const DISK_SEGMENTS: usize = 64;

/// Approximate a disk of `radius_m` metres around `center`.
///
/// The ring has [`DISK_SEGMENTS`] vertices and is closed.
#[must_use]
pub fn disk(center: Coord<f64>, radius_m: f64) -> Polygon<f64> {
    let origin = Point::from(center);
    let step = 360.0 / DISK_SEGMENTS as f64;
    let ring: Vec<Coord<f64>> = (0..DISK_SEGMENTS)
        .map(|i| Haversine.destination(origin, step * i as f64, radius_m).0)
        .collect();
    Polygon::new(LineString::from(ring), Vec::new())
}

/// Point `distance_m` metres from `center` along `bearing` degrees.
#[must_use]
pub fn offset(center: Coord<f64>, bearing: f64, distance_m: f64) -> Coord<f64> {
    Haversine
        .destination(Point::from(center), bearing, distance_m)
        .0
}

/// Geocoder answering from a fixed table.
#[derive(Debug, Clone, Default)]
pub struct StubGeocoder {
    addresses: HashMap<String, Coord<f64>>,
}

impl StubGeocoder {
    /// Register an address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>, location: Coord<f64>) -> Self {
        self.addresses.insert(address.into(), location);
        self
    }
}

impl Geocoder for StubGeocoder {
    fn geocode(&self, address: &str) -> Result<Coord<f64>, GeocodeError> {
        if address.trim().is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }
        self.addresses
            .get(address)
            .copied()
            .ok_or_else(|| GeocodeError::NotFound {
                address: address.to_owned(),
            })
    }
}

/// Isochrone provider returning disks that grow at a constant speed.
#[derive(Debug, Clone, Copy)]
pub struct DiskIsochroneProvider {
    speed_m_per_s: f64,
}

impl DiskIsochroneProvider {
    /// Provider whose disks grow by `speed_m_per_s` metres per second.
    #[must_use]
    pub const fn new(speed_m_per_s: f64) -> Self {
        Self { speed_m_per_s }
    }
}

impl IsochroneProvider for DiskIsochroneProvider {
    fn isochrone(
        &self,
        center: Coord<f64>,
        time_limit: Duration,
    ) -> Result<Polygon<f64>, IsochroneError> {
        if time_limit.is_zero() {
            return Err(IsochroneError::ZeroTimeLimit);
        }
        Ok(disk(center, self.speed_m_per_s * time_limit.as_secs_f64()))
    }
}

/// Isochrone provider that always fails with the configured error.
#[derive(Debug, Clone)]
pub struct FailingIsochroneProvider {
    error: IsochroneError,
}

impl FailingIsochroneProvider {
    /// Provider failing with `error` on every call.
    #[must_use]
    pub const fn new(error: IsochroneError) -> Self {
        Self { error }
    }

    /// Provider simulating an unreachable service.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::new(IsochroneError::ServiceUnavailable {
            url: "http://localhost:8989/isochrone".to_owned(),
            message: "connection refused".to_owned(),
        })
    }
}

impl IsochroneProvider for FailingIsochroneProvider {
    fn isochrone(
        &self,
        _center: Coord<f64>,
        _time_limit: Duration,
    ) -> Result<Polygon<f64>, IsochroneError> {
        Err(self.error.clone())
    }
}
