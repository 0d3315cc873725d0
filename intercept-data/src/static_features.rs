//! Static candidate features derived from the road segments at a node.
//!
//! Each candidate is a road-network node. Its static features summarise the
//! segments meeting there: how many there are, and the spread of their speed
//! limits and lane counts. Speeds without a usable `maxspeed` tag come from
//! a [`RoadClassTable`]; segments without a usable `lanes` tag count as one
//! lane.

use camino::Utf8Path;
use geo::Coord;
use intercept_core::{Candidate, FeatureId, Features};
use intercept_fs::open_utf8_file;
use serde::Deserialize;
use thiserror::Error;

use crate::RoadClassTable;

/// Lane count assumed when a segment carries no usable tag.
pub const DEFAULT_LANES: f64 = 1.0;

/// Miles per hour to kilometres per hour.
const KPH_PER_MPH: f64 = 1.609_344;

/// One road segment touching a node, with raw OSM tag values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoadSegment {
    /// OSM `highway` class, e.g. `"primary"`.
    pub highway: String,
    /// Raw `maxspeed` tag, e.g. `"50"` or `"30 mph"`.
    #[serde(default)]
    pub maxspeed: Option<String>,
    /// Raw `lanes` tag.
    #[serde(default)]
    pub lanes: Option<String>,
}

impl RoadSegment {
    /// Segment of class `highway` without speed or lane tags.
    #[must_use]
    pub fn new(highway: impl Into<String>) -> Self {
        Self {
            highway: highway.into(),
            maxspeed: None,
            lanes: None,
        }
    }

    /// Set the raw `maxspeed` tag.
    #[must_use]
    pub fn with_maxspeed(mut self, maxspeed: impl Into<String>) -> Self {
        self.maxspeed = Some(maxspeed.into());
        self
    }

    /// Set the raw `lanes` tag.
    #[must_use]
    pub fn with_lanes(mut self, lanes: impl Into<String>) -> Self {
        self.lanes = Some(lanes.into());
        self
    }

    /// Speed limit in km/h from the tag, or the table's speed for the class.
    #[must_use]
    pub fn speed_kph(&self, table: &RoadClassTable) -> f64 {
        self.maxspeed
            .as_deref()
            .and_then(parse_maxspeed)
            .unwrap_or_else(|| table.speed_for(&self.highway))
    }

    /// Lane count from the tag, or [`DEFAULT_LANES`].
    #[must_use]
    pub fn lane_count(&self) -> f64 {
        self.lanes
            .as_deref()
            .and_then(first_positive_number)
            .unwrap_or(DEFAULT_LANES)
    }
}

/// Parse a `maxspeed` value in km/h.
///
/// Multi-valued tags use their first entry. Values suffixed with `mph` are
/// converted. Symbolic values such as `"none"`, `"walk"` or `"FR:urban"`
/// yield `None`.
///
/// # Examples
/// ```
/// use intercept_data::parse_maxspeed;
///
/// assert_eq!(parse_maxspeed("90"), Some(90.0));
/// assert_eq!(parse_maxspeed("50;30"), Some(50.0));
/// assert!(parse_maxspeed("30 mph").is_some_and(|kph| (kph - 48.28).abs() < 0.01));
/// assert_eq!(parse_maxspeed("FR:urban"), None);
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "unit conversion from mph")]
pub fn parse_maxspeed(raw: &str) -> Option<f64> {
    let first = raw.split(';').next()?.trim();
    match first.strip_suffix("mph") {
        Some(value) => first_positive_number(value).map(|mph| mph * KPH_PER_MPH),
        None => first_positive_number(first.strip_suffix("km/h").unwrap_or(first)),
    }
}

fn first_positive_number(raw: &str) -> Option<f64> {
    raw.split(';')
        .next()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
}

/// Derive the static features of a node from its segments.
///
/// A node without segments gets zero for every feature.
///
/// # Examples
/// ```
/// use intercept_core::FeatureId;
/// use intercept_data::{RoadClassTable, RoadSegment, derive_static_features};
///
/// let segments = [
///     RoadSegment::new("primary").with_lanes("2"),
///     RoadSegment::new("residential").with_maxspeed("30"),
/// ];
/// let features = derive_static_features(&segments, &RoadClassTable::default());
/// assert_eq!(features[&FeatureId::StreetCount], 2.0);
/// assert_eq!(features[&FeatureId::SpeedMax], 80.0);
/// assert_eq!(features[&FeatureId::SpeedMin], 30.0);
/// assert_eq!(features[&FeatureId::LanesAvg], 1.5);
/// ```
#[must_use]
pub fn derive_static_features(segments: &[RoadSegment], table: &RoadClassTable) -> Features {
    let speeds: Vec<f64> = segments.iter().map(|s| s.speed_kph(table)).collect();
    let lanes: Vec<f64> = segments.iter().map(RoadSegment::lane_count).collect();
    let (speed_max, speed_avg, speed_min) = summarise(&speeds);
    let (lanes_max, lanes_avg, lanes_min) = summarise(&lanes);
    Features::from([
        (FeatureId::StreetCount, count_as_f64(segments.len())),
        (FeatureId::SpeedMax, speed_max),
        (FeatureId::SpeedAvg, speed_avg),
        (FeatureId::SpeedMin, speed_min),
        (FeatureId::LanesMax, lanes_max),
        (FeatureId::LanesAvg, lanes_avg),
        (FeatureId::LanesMin, lanes_min),
    ])
}

/// `(max, mean, min)` of the values, or zeros when empty.
#[expect(clippy::float_arithmetic, reason = "mean of segment values")]
fn summarise(values: &[f64]) -> (f64, f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mean = values.iter().sum::<f64>() / count_as_f64(values.len());
    (max, mean, min)
}

fn count_as_f64(count: usize) -> f64 {
    u32::try_from(count).map_or(f64::from(u32::MAX), f64::from)
}

/// A road-network node with the segments meeting at it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NodeRecord {
    /// Node identifier, reused as the candidate id.
    pub id: u64,
    /// Longitude in decimal degrees.
    pub lon: f64,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Segments touching the node.
    #[serde(default)]
    pub segments: Vec<RoadSegment>,
}

impl NodeRecord {
    /// Build the candidate for this node.
    #[must_use]
    pub fn to_candidate(&self, table: &RoadClassTable) -> Candidate {
        Candidate::with_features(
            self.id,
            Coord {
                x: self.lon,
                y: self.lat,
            },
            derive_static_features(&self.segments, table),
        )
    }
}

/// Errors raised by [`read_node_records`].
#[derive(Debug, Error)]
pub enum NodeRecordError {
    /// The file could not be opened.
    #[error("failed to open node file at {path}")]
    Open {
        /// File path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file was not a JSON array of node records.
    #[error("failed to parse node file at {path}")]
    Parse {
        /// File path.
        path: String,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// A node had a non-finite or out-of-range coordinate.
    #[error("node {id} has invalid coordinates ({lat}, {lon})")]
    InvalidCoordinates {
        /// Node identifier.
        id: u64,
        /// Supplied latitude.
        lat: f64,
        /// Supplied longitude.
        lon: f64,
    },
}

/// Read a JSON array of [`NodeRecord`]s.
///
/// # Errors
/// Returns [`NodeRecordError`] when the file cannot be read or parsed, or a
/// node lies outside the WGS84 range.
pub fn read_node_records(path: &Utf8Path) -> Result<Vec<NodeRecord>, NodeRecordError> {
    let file = open_utf8_file(path).map_err(|source| NodeRecordError::Open {
        path: path.to_string(),
        source,
    })?;
    let records: Vec<NodeRecord> =
        serde_json::from_reader(file).map_err(|source| NodeRecordError::Parse {
            path: path.to_string(),
            source,
        })?;
    if let Some(bad) = records.iter().find(|record| !valid_coordinates(record)) {
        return Err(NodeRecordError::InvalidCoordinates {
            id: bad.id,
            lat: bad.lat,
            lon: bad.lon,
        });
    }
    Ok(records)
}

fn valid_coordinates(record: &NodeRecord) -> bool {
    (-90.0..=90.0).contains(&record.lat) && (-180.0..=180.0).contains(&record.lon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("50", Some(50.0))]
    #[case(" 70 ", Some(70.0))]
    #[case("110 km/h", Some(110.0))]
    #[case("none", None)]
    #[case("walk", None)]
    #[case("0", None)]
    #[case("", None)]
    fn maxspeed_values(#[case] raw: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_maxspeed(raw), expected);
    }

    #[rstest]
    fn missing_speed_falls_back_to_road_class() {
        let table = RoadClassTable::default();
        assert_eq!(RoadSegment::new("secondary").speed_kph(&table), 60.0);
        assert_eq!(
            RoadSegment::new("secondary").with_maxspeed("FR:rural").speed_kph(&table),
            60.0
        );
        assert_eq!(
            RoadSegment::new("secondary").with_maxspeed("70").speed_kph(&table),
            70.0
        );
    }

    #[rstest]
    #[case(None, 1.0)]
    #[case(Some("3"), 3.0)]
    #[case(Some("2;3"), 2.0)]
    #[case(Some("many"), 1.0)]
    fn lane_counts(#[case] raw: Option<&str>, #[case] expected: f64) {
        let segment = RoadSegment {
            highway: "primary".to_owned(),
            maxspeed: None,
            lanes: raw.map(str::to_owned),
        };
        assert_eq!(segment.lane_count(), expected);
    }

    #[rstest]
    fn isolated_nodes_get_zeros() {
        let features = derive_static_features(&[], &RoadClassTable::default());
        assert_eq!(features.len(), 7);
        assert!(features.values().all(|value| *value == 0.0));
    }

    #[rstest]
    fn features_cover_every_static_id() {
        let features =
            derive_static_features(&[RoadSegment::new("track")], &RoadClassTable::default());
        let expected: Vec<_> = FeatureId::ALL
            .iter()
            .copied()
            .filter(|feature| feature.is_static())
            .collect();
        assert_eq!(features.keys().copied().collect::<Vec<_>>(), expected);
    }

    #[rstest]
    fn records_become_candidates() {
        let record = NodeRecord {
            id: 42,
            lon: 0.58,
            lat: 43.64,
            segments: vec![RoadSegment::new("motorway").with_lanes("3")],
        };
        let candidate = record.to_candidate(&RoadClassTable::default());
        assert_eq!(candidate.id, 42);
        assert_eq!(candidate.location, Coord { x: 0.58, y: 43.64 });
        assert_eq!(candidate.feature(FeatureId::SpeedMax), Some(130.0));
        assert_eq!(candidate.feature(FeatureId::LanesMin), Some(3.0));
    }

    #[rstest]
    fn reads_records_and_rejects_bad_coordinates() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path =
            camino::Utf8PathBuf::from_path_buf(dir.path().join("nodes.json")).expect("UTF-8 path");
        std::fs::write(
            &path,
            r#"[{"id": 1, "lon": 0.5, "lat": 43.6, "segments": [{"highway": "primary"}]}]"#,
        )
        .expect("write nodes");
        let records = read_node_records(&path).expect("records");
        assert_eq!(records.len(), 1);

        std::fs::write(&path, r#"[{"id": 2, "lon": 200.0, "lat": 43.6}]"#).expect("write nodes");
        assert!(matches!(
            read_node_records(&path),
            Err(NodeRecordError::InvalidCoordinates { id: 2, .. })
        ));
    }
}
