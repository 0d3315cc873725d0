//! End-to-end answer to a selection request.
//!
//! [`Interceptor`] resolves the origin, asks the isochrone provider for the
//! window boundaries, reduces them to the valid zone, loads the candidates
//! inside it, scores them and runs the diverse selector. All collaborator I/O
//! completes before scoring starts.

use std::num::NonZeroUsize;
use std::time::Duration;

use geo::{Coord, Polygon};
use intercept_core::{
    CandidateStore, Geocoder, Heading, IsochroneProvider, IsochroneRole, IsochroneSet,
    ReducedZones, StrategyBook, reduce_isochrones,
};
use intercept_scorer::{ScoredCandidate, ScoringContext, score_candidates};
use log::{debug, info, warn};

use crate::{DiverseSelector, SelectError, TieBreak};

/// Where the pursued actor was last seen.
#[derive(Debug, Clone, PartialEq)]
pub enum Origin {
    /// Free-form address resolved through the [`Geocoder`].
    Address(String),
    /// WGS84 coordinates (`x = longitude`, `y = latitude`).
    Coordinates(Coord<f64>),
}

/// Width of the search window relative to the time budget.
///
/// For a budget `T` the valid zone lies between the isochrones for `T` and
/// `T + delta`. With a horizon `ε` the probable zone lies between
/// `T + delta` and `T + delta + ε`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsochroneWindow {
    /// Extra travel time covered by the valid zone.
    pub delta: Duration,
    /// Margin beyond the window for the probable zone, if wanted.
    pub horizon: Option<Duration>,
}

impl IsochroneWindow {
    /// Default window width of thirty minutes.
    pub const DEFAULT_DELTA: Duration = Duration::from_secs(30 * 60);
    /// Default probable-presence margin of ten minutes.
    pub const DEFAULT_HORIZON: Duration = Duration::from_secs(10 * 60);

    /// Window of `delta` without a horizon.
    #[must_use]
    pub const fn new(delta: Duration) -> Self {
        Self {
            delta,
            horizon: None,
        }
    }

    /// Add a probable-presence margin.
    #[must_use]
    pub const fn with_horizon(mut self, horizon: Duration) -> Self {
        self.horizon = Some(horizon);
        self
    }

    fn bounds(&self, time_budget: Duration) -> (Duration, Duration, Option<Duration>) {
        let outer = time_budget.saturating_add(self.delta);
        let horizon = self.horizon.map(|margin| outer.saturating_add(margin));
        (time_budget, outer, horizon)
    }
}

impl Default for IsochroneWindow {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELTA).with_horizon(Self::DEFAULT_HORIZON)
    }
}

/// Parameters of one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectRequest {
    /// Last known position.
    pub origin: Origin,
    /// Name of the strategy in the [`StrategyBook`].
    pub strategy: String,
    /// Elapsed travel time since the origin was observed.
    pub time_budget: Duration,
    /// Escape heading, if known.
    pub heading: Option<Heading>,
    /// Number of checkpoints wanted.
    pub num_points: usize,
    /// Policy for choosing among the best candidates.
    pub tie_break: TieBreak,
}

impl SelectRequest {
    /// Request `num_points` checkpoints with no heading and the
    /// deterministic tie-break.
    #[must_use]
    pub fn new(
        origin: Origin,
        strategy: impl Into<String>,
        time_budget: Duration,
        num_points: usize,
    ) -> Self {
        Self {
            origin,
            strategy: strategy.into(),
            time_budget,
            heading: None,
            num_points,
            tie_break: TieBreak::LowestId,
        }
    }

    /// Set the escape heading.
    #[must_use]
    pub const fn with_heading(mut self, heading: Heading) -> Self {
        self.heading = Some(heading);
        self
    }

    /// Replace the tie-break policy.
    #[must_use]
    pub const fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }
}

/// Whether the selection produced every requested point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fulfilment {
    /// All requested points were found.
    Complete,
    /// The valid zone held fewer candidates than requested.
    Degraded {
        /// Points requested.
        requested: NonZeroUsize,
        /// Points returned.
        found: usize,
    },
}

/// Result of a successful selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionOutcome {
    /// Chosen candidates in pick order.
    pub picks: Vec<ScoredCandidate>,
    /// Whether every requested point was found.
    pub fulfilment: Fulfilment,
    /// Zones the candidates were drawn from.
    pub zones: ReducedZones,
    /// Resolved origin.
    pub origin: Coord<f64>,
}

impl SelectionOutcome {
    /// Chosen locations as `(latitude, longitude)` pairs.
    #[must_use]
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.picks
            .iter()
            .map(|pick| (pick.location.y, pick.location.x))
            .collect()
    }

    /// Whether fewer points than requested were found.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self.fulfilment, Fulfilment::Degraded { .. })
    }
}

/// Selection engine wired to its collaborators.
///
/// # Examples
/// ```
/// use std::time::Duration;
///
/// use geo::Coord;
/// use intercept_core::test_support::{DiskIsochroneProvider, StubGeocoder, offset};
/// use intercept_core::{Candidate, FeatureId, MemoryCandidateStore, Strategy, StrategyBook};
/// use intercept_selector::{Interceptor, Origin, SelectRequest};
///
/// let origin = Coord { x: 1.44, y: 43.6 };
/// let store = MemoryCandidateStore::new(
///     (1_u32..=4).map(|i| Candidate::new(u64::from(i), offset(origin, 90.0 * f64::from(i), 1_500.0))),
/// );
/// let book = StrategyBook::new().with_strategy(
///     Strategy::builder("near")
///         .with_weight(FeatureId::DistanceToStart, -1.0)
///         .with_repulsion(1.0)
///         .validate()?,
/// );
/// // One metre per second: 1000 m at T, 2800 m at T + 30 min.
/// let interceptor = Interceptor::new(
///     StubGeocoder::default(),
///     DiskIsochroneProvider::new(1.0),
///     store,
///     book,
/// );
/// let request = SelectRequest::new(
///     Origin::Coordinates(origin),
///     "near",
///     Duration::from_secs(1_000),
///     2,
/// );
/// let outcome = interceptor.select_points(&request)?;
/// assert_eq!(outcome.points().len(), 2);
/// assert!(!outcome.is_degraded());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Interceptor<G, I, S> {
    geocoder: G,
    isochrones: I,
    store: S,
    strategies: StrategyBook,
    window: IsochroneWindow,
}

impl<G, I, S> Interceptor<G, I, S>
where
    G: Geocoder,
    I: IsochroneProvider,
    S: CandidateStore,
{
    /// Wire the collaborators with the default [`IsochroneWindow`].
    #[must_use]
    pub fn new(geocoder: G, isochrones: I, store: S, strategies: StrategyBook) -> Self {
        Self {
            geocoder,
            isochrones,
            store,
            strategies,
            window: IsochroneWindow::default(),
        }
    }

    /// Replace the search window.
    #[must_use]
    pub const fn with_window(mut self, window: IsochroneWindow) -> Self {
        self.window = window;
        self
    }

    /// Select up to `num_points` diverse checkpoints.
    ///
    /// Request validation and strategy lookup happen before any collaborator
    /// is called. An empty valid zone is not an error; it produces an empty,
    /// degraded outcome.
    ///
    /// # Errors
    /// Returns [`SelectError`] for invalid requests, unknown strategies,
    /// collaborator failures, invalid isochrones and candidates missing a
    /// weighted feature. Use [`SelectError::kind`] to tell them apart.
    pub fn select_points(&self, request: &SelectRequest) -> Result<SelectionOutcome, SelectError> {
        let requested = NonZeroUsize::new(request.num_points).ok_or(SelectError::ZeroPoints)?;
        if request.time_budget.is_zero() {
            return Err(SelectError::ZeroTimeBudget);
        }
        let strategy = self.strategies.get(&request.strategy)?;

        let origin = self.resolve_origin(&request.origin)?;
        info!(
            "selecting {} points with strategy '{}' from ({}, {})",
            requested, request.strategy, origin.y, origin.x
        );

        let zones = reduce_isochrones(&self.isochrone_set(origin, request.time_budget)?)?;
        let candidates: Vec<_> = self.store.candidates_in_zone(&zones.valid).collect();
        debug!("valid zone holds {} candidates", candidates.len());

        let context = ScoringContext::new(origin, request.heading);
        let scored = score_candidates(candidates, strategy, &context)?;
        let picks = DiverseSelector::from_strategy(strategy, request.tie_break)
            .select(scored, requested.get());

        let fulfilment = if picks.len() < requested.get() {
            warn!(
                "only {} of {} requested points found in the valid zone",
                picks.len(),
                requested
            );
            Fulfilment::Degraded {
                requested,
                found: picks.len(),
            }
        } else {
            Fulfilment::Complete
        };

        Ok(SelectionOutcome {
            picks,
            fulfilment,
            zones,
            origin,
        })
    }

    fn resolve_origin(&self, origin: &Origin) -> Result<Coord<f64>, SelectError> {
        match origin {
            Origin::Coordinates(coord) => Ok(*coord),
            Origin::Address(address) => self
                .geocoder
                .geocode(address)
                .map_err(SelectError::Geocode),
        }
    }

    fn isochrone_set(
        &self,
        origin: Coord<f64>,
        time_budget: Duration,
    ) -> Result<IsochroneSet, SelectError> {
        let (inner, outer, horizon) = self.window.bounds(time_budget);
        let set = IsochroneSet::new(
            self.isochrone(origin, inner, IsochroneRole::Inner)?,
            self.isochrone(origin, outer, IsochroneRole::Outer)?,
        );
        match horizon {
            Some(limit) => Ok(set.with_horizon(self.isochrone(
                origin,
                limit,
                IsochroneRole::Horizon,
            )?)),
            None => Ok(set),
        }
    }

    fn isochrone(
        &self,
        origin: Coord<f64>,
        limit: Duration,
        role: IsochroneRole,
    ) -> Result<Polygon<f64>, SelectError> {
        debug!("requesting {role} isochrone for {}s", limit.as_secs());
        self.isochrones
            .isochrone(origin, limit)
            .map_err(|source| SelectError::Isochrone { role, source })
    }
}
