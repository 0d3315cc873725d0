//! GraphHopper isochrone response types.
//!
//! Only the parts of the response the provider reads are modelled: the list
//! of GeoJSON polygon features, one per bucket.

use geo::{Coord, LineString, Polygon};
use serde::Deserialize;

/// Isochrone API response.
#[derive(Debug, Deserialize)]
pub struct IsochroneResponse {
    /// One feature per requested bucket.
    #[serde(default)]
    pub polygons: Vec<PolygonFeature>,
}

/// GeoJSON feature wrapping an isochrone polygon.
#[derive(Debug, Deserialize)]
pub struct PolygonFeature {
    /// Polygon geometry.
    pub geometry: GeoJsonPolygon,
}

/// GeoJSON polygon with `[lon, lat]` positions.
#[derive(Debug, Deserialize)]
pub struct GeoJsonPolygon {
    /// GeoJSON geometry type; must be `"Polygon"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Exterior ring followed by any holes.
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

impl GeoJsonPolygon {
    /// Convert to a `geo` polygon, returning `None` when the exterior ring is
    /// missing or empty.
    pub fn into_polygon(self) -> Option<Polygon<f64>> {
        let mut rings = self.coordinates.into_iter().map(ring);
        let exterior = rings.next().filter(|exterior| !exterior.0.is_empty())?;
        Some(Polygon::new(exterior, rings.collect()))
    }
}

fn ring(positions: Vec<[f64; 2]>) -> LineString<f64> {
    positions
        .into_iter()
        .map(|[x, y]| Coord { x, y })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn deserialise_polygon_response() {
        let json = r#"{
            "polygons": [{
                "type": "Feature",
                "properties": {"bucket": 0},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[1.0, 43.0], [1.1, 43.0], [1.1, 43.1], [1.0, 43.0]]]
                }
            }],
            "info": {"copyrights": ["GraphHopper"]}
        }"#;
        let response: IsochroneResponse = serde_json::from_str(json).expect("should deserialise");
        let feature = response.polygons.into_iter().next().expect("one polygon");
        assert_eq!(feature.geometry.kind, "Polygon");
        let polygon = feature.geometry.into_polygon().expect("exterior ring");
        assert_eq!(polygon.exterior().0.first(), Some(&Coord { x: 1.0, y: 43.0 }));
        assert!(polygon.interiors().is_empty());
    }

    #[rstest]
    fn missing_polygons_default_to_empty() {
        let response: IsochroneResponse =
            serde_json::from_str(r#"{"info": {}}"#).expect("should deserialise");
        assert!(response.polygons.is_empty());
    }

    #[rstest]
    fn empty_exterior_is_not_a_polygon() {
        let geometry = GeoJsonPolygon {
            kind: "Polygon".to_owned(),
            coordinates: vec![Vec::new()],
        };
        assert!(geometry.into_polygon().is_none());
    }
}
