use std::collections::BTreeMap;

use geo::Coord;
use rstar::{AABB, RTreeObject};

use crate::FeatureId;

/// Static feature values keyed by feature.
pub type Features = BTreeMap<FeatureId, f64>;

/// A road node or intersection where a checkpoint could be placed.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`.
/// Only static features are stored on the candidate; dynamic ones are
/// derived for each request by the scoring pipeline.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use intercept_core::{Candidate, FeatureId};
///
/// let candidate = Candidate::new(1, Coord { x: 0.58, y: 43.64 })
///     .with_feature(FeatureId::SpeedMax, 80.0);
///
/// assert_eq!(candidate.id, 1);
/// assert_eq!(candidate.feature(FeatureId::SpeedMax), Some(80.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    /// Identifier, unique within the candidate universe.
    pub id: u64,
    /// Geospatial position.
    pub location: Coord<f64>,
    /// Static map attributes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub features: Features,
}

impl Candidate {
    /// Construct a `Candidate` without features.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use intercept_core::Candidate;
    ///
    /// let candidate = Candidate::new(7, Coord { x: 0.0, y: 0.0 });
    /// assert!(candidate.features.is_empty());
    /// ```
    #[must_use]
    pub const fn new(id: u64, location: Coord<f64>) -> Self {
        Self {
            id,
            location,
            features: BTreeMap::new(),
        }
    }

    /// Construct a `Candidate` with the provided features.
    #[must_use]
    pub const fn with_features(id: u64, location: Coord<f64>, features: Features) -> Self {
        Self {
            id,
            location,
            features,
        }
    }

    /// Set a feature value while returning `self` for chaining.
    #[must_use]
    pub fn with_feature(mut self, feature: FeatureId, value: f64) -> Self {
        self.features.insert(feature, value);
        self
    }

    /// Return the value of a feature, if present.
    #[must_use]
    pub fn feature(&self, feature: FeatureId) -> Option<f64> {
        self.features.get(&feature).copied()
    }
}

impl RTreeObject for Candidate {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.location.x, self.location.y])
    }
}
