//! Dynamic per-request features: distance and heading deviation.
//!
//! Each candidate's value depends only on its own location, so columns are
//! computed independently per entry. With the `parallel` feature the work is
//! spread over the rayon pool; the output is identical either way.

use geo::{Bearing, Coord, Distance, Haversine, Point};
use intercept_core::{FeatureId, Heading};

use crate::{ScoringError, WorkingSet};

/// Great-circle distance between two WGS84 coordinates, in metres.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use intercept_scorer::distance_m;
///
/// let a = Coord { x: 0.0, y: 0.0 };
/// let b = Coord { x: 0.0, y: 1.0 };
/// let d = distance_m(a, b);
/// assert!((d - 111_195.0).abs() < 100.0);
/// assert!((d - distance_m(b, a)).abs() < 1e-9);
/// ```
#[must_use]
pub fn distance_m(a: Coord<f64>, b: Coord<f64>) -> f64 {
    Haversine.distance(Point::from(a), Point::from(b))
}

/// Angle in degrees, within `[0, 180]`, between the bearing from
/// `reference` to `point` and `heading`.
///
/// Returns `0` when no heading is given or when both points coincide.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use intercept_core::Heading;
/// use intercept_scorer::angular_deviation;
///
/// let origin = Coord { x: 0.0, y: 0.0 };
/// let east = Coord { x: 0.01, y: 0.0 };
/// let north = Heading::from_degrees(0.0);
/// assert!((angular_deviation(east, origin, north) - 90.0).abs() < 1e-6);
/// assert_eq!(angular_deviation(east, origin, None), 0.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "angular differences are folded into the half circle"
)]
pub fn angular_deviation(point: Coord<f64>, reference: Coord<f64>, heading: Option<Heading>) -> f64 {
    let Some(heading) = heading else {
        return 0.0;
    };
    if point == reference {
        return 0.0;
    }
    let bearing = Haversine.bearing(Point::from(reference), Point::from(point));
    let diff = (bearing - heading.degrees()).rem_euclid(360.0);
    if diff > 180.0 { 360.0 - diff } else { diff }
}

/// Distance in metres from every location to `reference`.
#[must_use]
pub fn distances_from(locations: &[Coord<f64>], reference: Coord<f64>) -> Vec<f64> {
    map_locations(locations, |location| distance_m(*location, reference))
}

/// Heading deviation of every location as seen from `reference`.
#[must_use]
pub fn deviations_from(
    locations: &[Coord<f64>],
    reference: Coord<f64>,
    heading: Option<Heading>,
) -> Vec<f64> {
    map_locations(locations, |location| {
        angular_deviation(*location, reference, heading)
    })
}

fn map_locations<F>(locations: &[Coord<f64>], f: F) -> Vec<f64>
where
    F: Fn(&Coord<f64>) -> f64 + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        locations.par_iter().map(f).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        locations.iter().map(f).collect()
    }
}

/// Request-specific inputs to the dynamic features.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringContext {
    /// Last known position of the pursued actor.
    pub origin: Coord<f64>,
    /// Escape heading, if known.
    pub heading: Option<Heading>,
}

impl ScoringContext {
    /// Build a context for an origin and optional heading.
    #[must_use]
    pub const fn new(origin: Coord<f64>, heading: Option<Heading>) -> Self {
        Self { origin, heading }
    }
}

/// Materialise the raw dynamic columns listed in `features`.
///
/// Static features in the list are ignored; they come from the candidates.
///
/// # Errors
/// Propagates [`ScoringError::LengthMismatch`] from
/// [`WorkingSet::insert_column`], which cannot occur for columns computed
/// from the set's own locations.
pub fn build_dynamic_features<I>(
    working_set: &mut WorkingSet,
    context: &ScoringContext,
    features: I,
) -> Result<(), ScoringError>
where
    I: IntoIterator<Item = FeatureId>,
{
    for feature in features {
        let values = match feature {
            FeatureId::DistanceToStart => {
                distances_from(working_set.locations(), context.origin)
            }
            FeatureId::DifferenceAngle => {
                deviations_from(working_set.locations(), context.origin, context.heading)
            }
            _ => continue,
        };
        working_set.insert_column(feature, values)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Destination;
    use intercept_core::Candidate;
    use rstest::rstest;

    const ORIGIN: Coord<f64> = Coord { x: 0.0, y: 0.0 };

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(90.0, 90.0)]
    #[case(180.0, 180.0)]
    #[case(270.0, 90.0)]
    fn deviation_from_north_heading(#[case] bearing: f64, #[case] expected: f64) {
        let point = Haversine
            .destination(Point::from(ORIGIN), bearing, 500.0)
            .0;
        let deviation = angular_deviation(point, ORIGIN, Heading::from_degrees(0.0));
        assert!((deviation - expected).abs() < 1e-6, "got {deviation}");
    }

    #[rstest]
    fn coincident_points_have_no_deviation() {
        assert_eq!(
            angular_deviation(ORIGIN, ORIGIN, Heading::from_degrees(90.0)),
            0.0
        );
    }

    #[rstest]
    fn distance_is_symmetric_and_monotonic() {
        let near = Coord { x: 0.001, y: 0.0 };
        let far = Coord { x: 0.002, y: 0.0 };
        assert!((distance_m(ORIGIN, near) - distance_m(near, ORIGIN)).abs() < 1e-9);
        assert!(distance_m(ORIGIN, near) < distance_m(ORIGIN, far));
        assert_eq!(distance_m(ORIGIN, ORIGIN), 0.0);
    }

    #[rstest]
    fn build_only_adds_dynamic_columns() {
        let mut working_set = WorkingSet::from_candidates(
            [
                Candidate::new(1, Coord { x: 0.001, y: 0.0 }),
                Candidate::new(2, Coord { x: 0.0, y: 0.001 }),
            ],
            [],
        )
        .expect("working set");
        let context = ScoringContext::new(ORIGIN, None);
        build_dynamic_features(
            &mut working_set,
            &context,
            [FeatureId::SpeedMax, FeatureId::DistanceToStart],
        )
        .expect("dynamic features");
        assert!(working_set.column(FeatureId::SpeedMax).is_none());
        let distances = working_set
            .column(FeatureId::DistanceToStart)
            .expect("distance column");
        assert_eq!(distances.len(), 2);
        assert!(distances.iter().all(|&d| d > 100.0));
    }

    #[rstest]
    fn angle_column_follows_the_escape_heading() {
        let candidates = [
            Candidate::new(1, Coord { x: -0.01, y: 0.0 }),
            Candidate::new(2, Coord { x: 0.01, y: 0.0 }),
        ];
        let east = Heading::parse("E").expect("compass label");
        let mut heading_set =
            WorkingSet::from_candidates(candidates.clone(), []).expect("working set");
        build_dynamic_features(
            &mut heading_set,
            &ScoringContext::new(ORIGIN, east),
            [FeatureId::DifferenceAngle],
        )
        .expect("dynamic features");
        let angles = heading_set
            .column(FeatureId::DifferenceAngle)
            .expect("angle column");
        assert!((angles[0] - 180.0).abs() < 1e-6);
        assert!(angles[1].abs() < 1e-6);

        let mut headless = WorkingSet::from_candidates(candidates, []).expect("working set");
        build_dynamic_features(
            &mut headless,
            &ScoringContext::new(ORIGIN, None),
            [FeatureId::DifferenceAngle],
        )
        .expect("dynamic features");
        headless.normalise_all();
        assert_eq!(
            headless.column(FeatureId::DifferenceAngle),
            Some([0.5, 0.5].as_slice())
        );
    }
}
