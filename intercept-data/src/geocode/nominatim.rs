//! Nominatim search response types.
//!
//! See: <https://nominatim.org/release-docs/latest/api/Search/>

use geo::Coord;
use serde::Deserialize;

/// One search hit. Nominatim encodes coordinates as strings.
#[derive(Debug, Deserialize)]
pub struct Place {
    /// Latitude in decimal degrees.
    pub lat: String,
    /// Longitude in decimal degrees.
    pub lon: String,
    /// Human-readable name of the match.
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Place {
    /// Parse the coordinates, returning the offending text on failure.
    pub fn coord(&self) -> Result<Coord<f64>, String> {
        let parse = |raw: &str| {
            raw.trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| format!("invalid coordinate '{raw}'"))
        };
        Ok(Coord {
            x: parse(&self.lon)?,
            y: parse(&self.lat)?,
        })
    }
}
