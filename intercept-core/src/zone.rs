//! Reduce nested isochrones to the zones a pursuer should search.
//!
//! Isochrones are assumed nested: the inner polygon is reachable in the
//! shortest time and the horizon polygon in the longest. The valid zone is the
//! ring reachable inside the window but not before it. Reduction is a pure
//! function of its inputs.

use std::fmt;

use geo::{
    Area, BooleanOps, BoundingRect, Coord, Intersects, MultiPolygon, Polygon, Rect, Validation,
};
use log::warn;
use thiserror::Error;

/// Search area made of zero or more polygons, possibly with holes.
///
/// Boundary points are inside the zone, following the [`Intersects`]
/// convention.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone(MultiPolygon<f64>);

impl Default for Zone {
    fn default() -> Self {
        Self(MultiPolygon::new(Vec::new()))
    }
}

impl Zone {
    /// Zone covering nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Report whether the zone covers no area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.0.is_empty()
    }

    /// Report whether a coordinate lies inside or on the boundary.
    #[must_use]
    pub fn contains(&self, coord: &Coord<f64>) -> bool {
        self.0.intersects(coord)
    }

    /// Axis-aligned bounds, `None` for an empty zone.
    #[must_use]
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        self.0.bounding_rect()
    }

    /// Planar area in squared coordinate units.
    ///
    /// Only meaningful for comparing zones built from the same inputs.
    #[must_use]
    pub fn planar_area(&self) -> f64 {
        self.0.unsigned_area()
    }

    /// Borrow the underlying geometry.
    #[must_use]
    pub const fn geometry(&self) -> &MultiPolygon<f64> {
        &self.0
    }
}

impl From<MultiPolygon<f64>> for Zone {
    fn from(geometry: MultiPolygon<f64>) -> Self {
        Self(geometry)
    }
}

impl From<Polygon<f64>> for Zone {
    fn from(polygon: Polygon<f64>) -> Self {
        Self(MultiPolygon::new(vec![polygon]))
    }
}

/// Position of a polygon within an [`IsochroneSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsochroneRole {
    /// Area reachable by the start of the window.
    Inner,
    /// Area reachable by the end of the window.
    Outer,
    /// Area reachable by the end of the probable-presence margin.
    Horizon,
}

impl fmt::Display for IsochroneRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Inner => "inner",
            Self::Outer => "outer",
            Self::Horizon => "horizon",
        })
    }
}

/// Errors raised by [`reduce_isochrones`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZoneError {
    /// An input polygon was not a valid simple polygon.
    #[error("{role} isochrone is not a valid polygon: {reason}")]
    InvalidPolygon {
        /// Which isochrone failed validation.
        role: IsochroneRole,
        /// Validation failure reported by `geo`.
        reason: String,
    },
}

/// Two or three nested isochrones around the same origin.
#[derive(Debug, Clone, PartialEq)]
pub struct IsochroneSet {
    /// Isochrone for the shortest time bound.
    pub inner: Polygon<f64>,
    /// Isochrone for the end of the search window.
    pub outer: Polygon<f64>,
    /// Optional isochrone beyond the window.
    pub horizon: Option<Polygon<f64>>,
}

impl IsochroneSet {
    /// Pair an inner and an outer isochrone.
    #[must_use]
    pub const fn new(inner: Polygon<f64>, outer: Polygon<f64>) -> Self {
        Self {
            inner,
            outer,
            horizon: None,
        }
    }

    /// Add a horizon isochrone used for the probable-presence ring.
    #[must_use]
    pub fn with_horizon(mut self, horizon: Polygon<f64>) -> Self {
        self.horizon = Some(horizon);
        self
    }
}

/// Output of [`reduce_isochrones`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReducedZones {
    /// `outer − inner`: where candidates are searched.
    pub valid: Zone,
    /// `horizon − outer`, when a horizon was supplied.
    pub probable: Option<Zone>,
}

/// Subtract nested isochrones to obtain the valid and probable zones.
///
/// Degenerate but valid inputs never fail: an inner polygon covering the
/// outer one yields an empty valid zone, and disjoint polygons are logged and
/// also yield an empty valid zone.
///
/// # Errors
/// Returns [`ZoneError::InvalidPolygon`] when any input fails
/// [`Validation`], for example a self-intersecting ring.
///
/// # Examples
/// ```
/// use geo::polygon;
/// use intercept_core::{IsochroneSet, reduce_isochrones};
///
/// let outer = polygon![(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 4.0)];
/// let inner = polygon![(x: 1.0, y: 1.0), (x: 3.0, y: 1.0), (x: 3.0, y: 3.0), (x: 1.0, y: 3.0)];
/// let zones = reduce_isochrones(&IsochroneSet::new(inner, outer))?;
/// assert!((zones.valid.planar_area() - 12.0).abs() < 1e-9);
/// assert!(zones.probable.is_none());
/// # Ok::<(), intercept_core::ZoneError>(())
/// ```
pub fn reduce_isochrones(set: &IsochroneSet) -> Result<ReducedZones, ZoneError> {
    validate(&set.inner, IsochroneRole::Inner)?;
    validate(&set.outer, IsochroneRole::Outer)?;
    if let Some(horizon) = &set.horizon {
        validate(horizon, IsochroneRole::Horizon)?;
    }

    let valid = subtract(&set.outer, &set.inner, "outer", "inner");
    let probable = set
        .horizon
        .as_ref()
        .map(|horizon| subtract(horizon, &set.outer, "horizon", "outer"));
    Ok(ReducedZones { valid, probable })
}

fn validate(polygon: &Polygon<f64>, role: IsochroneRole) -> Result<(), ZoneError> {
    polygon
        .check_validation()
        .map_err(|err| ZoneError::InvalidPolygon {
            role,
            reason: err.to_string(),
        })
}

fn subtract(minuend: &Polygon<f64>, subtrahend: &Polygon<f64>, a: &str, b: &str) -> Zone {
    if minuend.exterior().0.is_empty() {
        return Zone::empty();
    }
    if !subtrahend.exterior().0.is_empty() && !minuend.intersects(subtrahend) {
        warn!("{a} and {b} isochrones do not overlap; treating the zone as empty");
        return Zone::empty();
    }
    Zone(minuend.difference(subtrahend))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{coord, polygon};
    use rstest::rstest;

    fn square(min: f64, max: f64) -> Polygon<f64> {
        polygon![
            (x: min, y: min),
            (x: max, y: min),
            (x: max, y: max),
            (x: min, y: max),
        ]
    }

    #[rstest]
    fn ring_excludes_inner_interior_and_keeps_boundary() {
        let zones = reduce_isochrones(&IsochroneSet::new(square(1.0, 3.0), square(0.0, 4.0)))
            .expect("valid input");
        assert!(!zones.valid.contains(&coord! { x: 2.0, y: 2.0 }));
        assert!(zones.valid.contains(&coord! { x: 0.5, y: 0.5 }));
        assert!(zones.valid.contains(&coord! { x: 1.0, y: 2.0 }));
        assert!(!zones.valid.contains(&coord! { x: 5.0, y: 5.0 }));
    }

    #[rstest]
    fn covering_inner_yields_empty_zone() {
        let zones = reduce_isochrones(&IsochroneSet::new(square(-1.0, 5.0), square(0.0, 4.0)))
            .expect("valid input");
        assert!(zones.valid.is_empty());
        assert_eq!(zones.valid.bounding_rect(), None);
    }

    #[rstest]
    fn disjoint_isochrones_yield_empty_zone() {
        let zones = reduce_isochrones(&IsochroneSet::new(square(10.0, 11.0), square(0.0, 4.0)))
            .expect("valid input");
        assert!(zones.valid.is_empty());
    }

    #[rstest]
    fn horizon_produces_probable_ring() {
        let set = IsochroneSet::new(square(1.0, 3.0), square(0.0, 4.0)).with_horizon(square(-1.0, 5.0));
        let zones = reduce_isochrones(&set).expect("valid input");
        let probable = zones.probable.expect("probable zone");
        assert!((probable.planar_area() - 20.0).abs() < 1e-9);
        assert!(!probable.contains(&coord! { x: 2.0, y: 2.0 }));
        assert!(probable.contains(&coord! { x: -0.5, y: -0.5 }));
    }

    #[rstest]
    #[case(IsochroneRole::Inner)]
    #[case(IsochroneRole::Outer)]
    #[case(IsochroneRole::Horizon)]
    fn self_intersecting_input_is_rejected(#[case] role: IsochroneRole) {
        let bowtie = polygon![
            (x: 0.0, y: 0.0),
            (x: 2.0, y: 2.0),
            (x: 2.0, y: 0.0),
            (x: 0.0, y: 2.0),
        ];
        let mut set = IsochroneSet::new(square(1.0, 3.0), square(0.0, 4.0))
            .with_horizon(square(-1.0, 5.0));
        match role {
            IsochroneRole::Inner => set.inner = bowtie,
            IsochroneRole::Outer => set.outer = bowtie,
            IsochroneRole::Horizon => set.horizon = Some(bowtie),
        }
        let err = reduce_isochrones(&set).expect_err("bowtie must fail");
        assert!(matches!(err, ZoneError::InvalidPolygon { role: r, .. } if r == role));
    }
}
