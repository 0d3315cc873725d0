//! Fallback speeds for road segments without a usable `maxspeed` tag.
//!
//! Segments are classified by their OSM `highway` value. `*_link` ramps use
//! the speed of the road they connect to. Classes missing from the table use
//! its default.

use std::collections::BTreeMap;

use camino::Utf8Path;
use intercept_fs::open_utf8_file;
use serde::Deserialize;
use thiserror::Error;

/// Default speed in km/h for unlisted classes.
pub const DEFAULT_SPEED_KPH: f64 = 50.0;

/// Built-in speeds in km/h per `highway` class.
const BUILT_IN: [(&str, f64); 8] = [
    ("motorway", 130.0),
    ("trunk", 100.0),
    ("primary", 80.0),
    ("secondary", 60.0),
    ("tertiary", 50.0),
    ("residential", 50.0),
    ("service", 30.0),
    ("track", 10.0),
];

/// Errors raised while loading a [`RoadClassTable`].
#[derive(Debug, Error)]
pub enum RoadClassError {
    /// The table file could not be opened.
    #[error("failed to open road class table at {path}")]
    Open {
        /// Table path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The table was not valid JSON of the expected shape.
    #[error("failed to parse road class table")]
    Parse(#[from] serde_json::Error),
    /// A speed was not a positive finite number.
    #[error("speed for '{class}' must be positive and finite, got {speed}")]
    InvalidSpeed {
        /// Offending class, or `default`.
        class: String,
        /// Supplied value.
        speed: f64,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RoadClassFile {
    #[serde(default = "default_speed")]
    default: f64,
    #[serde(default)]
    classes: BTreeMap<String, f64>,
}

const fn default_speed() -> f64 {
    DEFAULT_SPEED_KPH
}

/// Lookup table from `highway` class to speed in km/h.
///
/// # Examples
/// ```
/// use intercept_data::RoadClassTable;
///
/// let table = RoadClassTable::default();
/// assert_eq!(table.speed_for("primary"), 80.0);
/// assert_eq!(table.speed_for("motorway_link"), 130.0);
/// assert_eq!(table.speed_for("bridleway"), 50.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RoadClassTable {
    speeds: BTreeMap<String, f64>,
    default_kph: f64,
}

impl Default for RoadClassTable {
    fn default() -> Self {
        Self {
            speeds: BUILT_IN
                .iter()
                .map(|(class, speed)| ((*class).to_owned(), *speed))
                .collect(),
            default_kph: DEFAULT_SPEED_KPH,
        }
    }
}

impl RoadClassTable {
    /// Parse a table of the form
    /// `{"default": 50, "classes": {"primary": 80, ...}}`.
    ///
    /// Listed classes override the built-in speeds; others are kept.
    ///
    /// # Errors
    /// Returns [`RoadClassError::Parse`] for malformed JSON and
    /// [`RoadClassError::InvalidSpeed`] for non-positive speeds.
    pub fn from_json_str(json: &str) -> Result<Self, RoadClassError> {
        Self::from_file(serde_json::from_str(json)?)
    }

    /// Load a table from a JSON file.
    ///
    /// # Errors
    /// Returns [`RoadClassError::Open`] when the file cannot be opened and
    /// the errors of [`RoadClassTable::from_json_str`].
    pub fn load(path: &Utf8Path) -> Result<Self, RoadClassError> {
        let file = open_utf8_file(path).map_err(|source| RoadClassError::Open {
            path: path.to_string(),
            source,
        })?;
        Self::from_file(serde_json::from_reader(file)?)
    }

    fn from_file(file: RoadClassFile) -> Result<Self, RoadClassError> {
        check_speed("default", file.default)?;
        let mut table = Self {
            default_kph: file.default,
            ..Self::default()
        };
        for (class, speed) in file.classes {
            check_speed(&class, speed)?;
            table.speeds.insert(class, speed);
        }
        Ok(table)
    }

    /// Speed for `highway`, falling back to the default.
    #[must_use]
    pub fn speed_for(&self, highway: &str) -> f64 {
        let class = highway.strip_suffix("_link").unwrap_or(highway);
        self.speeds
            .get(highway)
            .or_else(|| self.speeds.get(class))
            .copied()
            .unwrap_or(self.default_kph)
    }

    /// Speed used for unlisted classes.
    #[must_use]
    pub const fn default_speed(&self) -> f64 {
        self.default_kph
    }
}

fn check_speed(class: &str, speed: f64) -> Result<(), RoadClassError> {
    if speed.is_finite() && speed > 0.0 {
        Ok(())
    } else {
        Err(RoadClassError::InvalidSpeed {
            class: class.to_owned(),
            speed,
        })
    }
}
