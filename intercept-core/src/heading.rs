//! Escape headings given as degrees or compass labels.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Eight-point compass label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompassPoint {
    /// North, 0°.
    N,
    /// North-east, 45°.
    NE,
    /// East, 90°.
    E,
    /// South-east, 135°.
    SE,
    /// South, 180°.
    S,
    /// South-west, 225°.
    SW,
    /// West, 270°.
    W,
    /// North-west, 315°.
    NW,
}

impl CompassPoint {
    /// Bearing in degrees clockwise from north.
    #[must_use]
    pub const fn degrees(self) -> f64 {
        match self {
            Self::N => 0.0,
            Self::NE => 45.0,
            Self::E => 90.0,
            Self::SE => 135.0,
            Self::S => 180.0,
            Self::SW => 225.0,
            Self::W => 270.0,
            Self::NW => 315.0,
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        let point = match label.to_ascii_uppercase().as_str() {
            "N" => Self::N,
            "NE" => Self::NE,
            "E" => Self::E,
            "SE" => Self::SE,
            "S" => Self::S,
            "SW" | "SO" => Self::SW,
            "W" | "O" => Self::W,
            "NW" | "NO" => Self::NW,
            _ => return None,
        };
        Some(point)
    }
}

/// Error returned when a heading string cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeadingError {
    /// The text is neither a compass label nor a number of degrees.
    #[error("unrecognised heading '{0}'")]
    Unrecognised(String),
    /// The number is NaN or infinite.
    #[error("heading must be a finite number of degrees, got '{0}'")]
    NotFinite(String),
}

/// Bearing in degrees clockwise from north, normalised to `[0, 360)`.
///
/// # Examples
/// ```
/// use intercept_core::Heading;
///
/// assert_eq!(Heading::parse("NE")?, Heading::from_degrees(45.0));
/// assert_eq!(Heading::parse("O")?, Heading::from_degrees(270.0));
/// assert_eq!(Heading::parse("none")?, None);
/// assert_eq!(Heading::from_degrees(-90.0).map(Heading::degrees), Some(270.0));
/// assert_eq!(Heading::from_degrees(f64::NAN), None);
/// # Ok::<(), intercept_core::HeadingError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heading(f64);

impl Heading {
    /// Build a heading from any finite angle, or `None` for NaN and
    /// infinities.
    #[must_use]
    pub fn from_degrees(degrees: f64) -> Option<Self> {
        degrees
            .is_finite()
            .then(|| Self(degrees.rem_euclid(360.0)))
    }

    /// Degrees clockwise from north in `[0, 360)`.
    #[must_use]
    pub const fn degrees(self) -> f64 {
        self.0
    }

    /// Parse optional heading text.
    ///
    /// Empty text and `None` (any case) mean "no preferred direction".
    ///
    /// # Errors
    /// Returns [`HeadingError`] when the text is neither a label nor a
    /// finite number.
    pub fn parse(raw: &str) -> Result<Option<Self>, HeadingError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        trimmed.parse().map(Some)
    }
}

impl From<CompassPoint> for Heading {
    fn from(point: CompassPoint) -> Self {
        Self(point.degrees())
    }
}

impl FromStr for Heading {
    type Err = HeadingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(point) = CompassPoint::from_label(trimmed) {
            return Ok(point.into());
        }
        let degrees: f64 = trimmed
            .parse()
            .map_err(|_| HeadingError::Unrecognised(s.to_owned()))?;
        Self::from_degrees(degrees).ok_or_else(|| HeadingError::NotFinite(s.to_owned()))
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}
