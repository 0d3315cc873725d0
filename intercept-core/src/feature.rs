//! Features describing a candidate checkpoint.
//!
//! The enum is the closed set of attributes a strategy may weight. Names are
//! resolved when configuration is loaded, so an unknown feature fails before
//! any candidate is touched.
//!
//! # Examples
//! ```
//! use intercept_core::{FeatureId, FeatureKind};
//!
//! assert_eq!(FeatureId::SpeedMax.as_str(), "speed_max");
//! assert_eq!(FeatureId::DistanceToStart.kind(), FeatureKind::Dynamic);
//! ```
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Identifier of a numeric candidate attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum FeatureId {
    /// Number of road segments meeting at the node.
    StreetCount,
    /// Highest legal speed among adjacent segments (km/h).
    SpeedMax,
    /// Mean legal speed among adjacent segments (km/h).
    SpeedAvg,
    /// Lowest legal speed among adjacent segments (km/h).
    SpeedMin,
    /// Highest lane count among adjacent segments.
    LanesMax,
    /// Mean lane count among adjacent segments.
    LanesAvg,
    /// Lowest lane count among adjacent segments.
    LanesMin,
    /// Distance from the last known position, in metres.
    DistanceToStart,
    /// Deviation from the escape heading, in degrees.
    DifferenceAngle,
}

/// Whether a feature is fixed map data or recomputed for every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// Derived once from map data.
    Static,
    /// Derived from the request origin and heading.
    Dynamic,
}

/// Error returned when a feature name is not part of [`FeatureId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown feature '{0}'")]
pub struct UnknownFeatureError(pub String);

impl FeatureId {
    /// Every feature, static ones first.
    pub const ALL: [Self; 9] = [
        Self::StreetCount,
        Self::SpeedMax,
        Self::SpeedAvg,
        Self::SpeedMin,
        Self::LanesMax,
        Self::LanesAvg,
        Self::LanesMin,
        Self::DistanceToStart,
        Self::DifferenceAngle,
    ];

    /// Return the configuration name of the feature.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StreetCount => "street_count",
            Self::SpeedMax => "speed_max",
            Self::SpeedAvg => "speed_avg",
            Self::SpeedMin => "speed_min",
            Self::LanesMax => "lanes_max",
            Self::LanesAvg => "lanes_avg",
            Self::LanesMin => "lanes_min",
            Self::DistanceToStart => "distance_to_start",
            Self::DifferenceAngle => "difference_angle",
        }
    }

    /// Classify the feature as static or dynamic.
    #[must_use]
    pub const fn kind(self) -> FeatureKind {
        match self {
            Self::DistanceToStart | Self::DifferenceAngle => FeatureKind::Dynamic,
            _ => FeatureKind::Static,
        }
    }

    /// Report whether the feature comes from map data.
    #[must_use]
    pub const fn is_static(self) -> bool {
        matches!(self.kind(), FeatureKind::Static)
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureId {
    type Err = UnknownFeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|feature| feature.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownFeatureError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn names_round_trip_through_from_str() {
        for feature in FeatureId::ALL {
            assert_eq!(FeatureId::from_str(feature.as_str()), Ok(feature));
        }
    }

    #[rstest]
    #[case("SPEED_MAX", FeatureId::SpeedMax)]
    #[case(" street_count ", FeatureId::StreetCount)]
    fn parsing_is_lenient_about_case_and_whitespace(
        #[case] raw: &str,
        #[case] expected: FeatureId,
    ) {
        assert_eq!(raw.parse::<FeatureId>(), Ok(expected));
    }

    #[rstest]
    fn parsing_rejects_unknown() {
        let err = FeatureId::from_str("popularity").unwrap_err();
        assert_eq!(err.to_string(), "unknown feature 'popularity'");
    }

    #[rstest]
    fn only_distance_and_angle_are_dynamic() {
        let dynamic: Vec<_> = FeatureId::ALL
            .into_iter()
            .filter(|feature| !feature.is_static())
            .collect();
        assert_eq!(
            dynamic,
            vec![FeatureId::DistanceToStart, FeatureId::DifferenceAngle]
        );
    }
}
