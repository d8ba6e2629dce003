use crate::error::{GwdError, Result};
use geo::{BoundingRect, Coord, LineString, MultiPolygon, Polygon, Rect};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Property keys tried, in order, for a feature's region name.
pub const NAME_PROPERTIES: [&str; 2] = ["name", "NAME"];

/// A named region boundary (for example a US state) in lon/lat order.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionGeometry {
    pub name: String,
    pub boundary: MultiPolygon<f64>,
}

impl RegionGeometry {
    pub fn new(name: impl Into<String>, boundary: MultiPolygon<f64>) -> Self {
        Self {
            name: name.into(),
            boundary,
        }
    }

    /// A region bounded by a single ring of `(lon, lat)` vertices.
    pub fn from_exterior(name: impl Into<String>, ring: &[(f64, f64)]) -> Self {
        let exterior = LineString::from(ring.to_vec());
        Self::new(name, MultiPolygon::new(vec![Polygon::new(exterior, vec![])]))
    }

    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.boundary.bounding_rect()
    }

    /// Read every named `Polygon` / `MultiPolygon` feature of a GeoJSON
    /// feature collection.
    ///
    /// Features with another geometry type or without a name are skipped
    /// with a warning. A collection that yields no regions at all is an
    /// error, since nothing downstream can classify against it.
    pub fn from_geojson(data: &str) -> Result<Vec<RegionGeometry>> {
        let collection: FeatureCollection = serde_json::from_str(data)?;
        let total = collection.features.len();
        let mut regions = Vec::with_capacity(total);
        for feature in collection.features {
            let Some(name) = feature.name() else {
                log::warn!("skipping region feature without a name property");
                continue;
            };
            let boundary = match feature.geometry {
                Some(Geometry::Polygon { coordinates }) => {
                    MultiPolygon::new(vec![polygon_from_rings(coordinates)])
                }
                Some(Geometry::MultiPolygon { coordinates }) => MultiPolygon::new(
                    coordinates.into_iter().map(polygon_from_rings).collect(),
                ),
                Some(Geometry::Unsupported) | None => {
                    log::warn!("skipping region {}: not a polygon geometry", name);
                    continue;
                }
            };
            regions.push(RegionGeometry::new(name, boundary));
        }
        log::info!("regions: loaded {} of {} features", regions.len(), total);
        if regions.is_empty() {
            return Err(GwdError::MissingGeometry);
        }
        Ok(regions)
    }
}

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    geometry: Option<Geometry>,
}

impl Feature {
    fn name(&self) -> Option<String> {
        let properties = self.properties.as_ref()?;
        NAME_PROPERTIES
            .iter()
            .find_map(|key| properties.get(*key).and_then(Value::as_str))
            .map(str::to_string)
    }
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon {
        coordinates: Vec<Vec<Vec<f64>>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Vec<f64>>>>,
    },
    #[serde(other)]
    Unsupported,
}

/// First ring is the exterior, the rest are holes. Positions may carry an
/// altitude, which is dropped.
fn polygon_from_rings(rings: Vec<Vec<Vec<f64>>>) -> Polygon<f64> {
    let mut rings = rings.into_iter().map(|ring| {
        ring.into_iter()
            .filter(|position| position.len() >= 2)
            .map(|position| Coord {
                x: position[0],
                y: position[1],
            })
            .collect::<LineString<f64>>()
    });
    let exterior = rings.next().unwrap_or_else(|| LineString::new(vec![]));
    Polygon::new(exterior, rings.collect())
}
