//! Isochrone provider trait.

use std::time::Duration;

use geo::{Coord, Polygon};

use super::error::IsochroneError;

/// Fetch the area reachable from a centre within a time limit.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use geo::{Coord, Polygon, polygon};
/// use intercept_core::{IsochroneError, IsochroneProvider};
///
/// struct SquareProvider;
///
/// impl IsochroneProvider for SquareProvider {
///     fn isochrone(
///         &self,
///         center: Coord<f64>,
///         time_limit: Duration,
///     ) -> Result<Polygon<f64>, IsochroneError> {
///         if time_limit.is_zero() {
///             return Err(IsochroneError::ZeroTimeLimit);
///         }
///         let r = time_limit.as_secs_f64() / 3600.0;
///         Ok(polygon![
///             (x: center.x - r, y: center.y - r),
///             (x: center.x + r, y: center.y - r),
///             (x: center.x + r, y: center.y + r),
///             (x: center.x - r, y: center.y + r),
///         ])
///     }
/// }
///
/// let polygon = SquareProvider.isochrone(Coord { x: 0.0, y: 0.0 }, Duration::from_secs(60))?;
/// assert_eq!(polygon.exterior().0.len(), 5);
/// # Ok::<(), IsochroneError>(())
/// ```
pub trait IsochroneProvider {
    /// Return the polygon reachable from `center` within `time_limit`.
    ///
    /// Implementations must return `Err(IsochroneError::ZeroTimeLimit)` when
    /// `time_limit` is zero.
    fn isochrone(
        &self,
        center: Coord<f64>,
        time_limit: Duration,
    ) -> Result<Polygon<f64>, IsochroneError>;
}

impl<T: IsochroneProvider + ?Sized> IsochroneProvider for &T {
    fn isochrone(
        &self,
        center: Coord<f64>,
        time_limit: Duration,
    ) -> Result<Polygon<f64>, IsochroneError> {
        (**self).isochrone(center, time_limit)
    }
}
