//! Area of interest geometry.

use geo::BoundingRect;
use geo_types::{coord, LineString, MultiPolygon, Polygon, Rect};

use crate::error::{Result, TerradiffError};

#[derive(Debug, Clone, PartialEq)]
enum AoiGeometry {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

/// Area of interest: a polygon or multipolygon in WGS84 lon/lat.
///
/// Construction validates that every exterior ring has at least three
/// positions, so downstream code never sees a degenerate geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Aoi {
    geometry: AoiGeometry,
}

impl Aoi {
    /// Build from a GeoJSON-style polygon coordinate array: one exterior ring
    /// followed by optional holes, each a list of `[lng, lat]` positions.
    pub fn from_polygon_rings(rings: &[Vec<[f64; 2]>]) -> Result<Self> {
        let (exterior, holes) = match rings.split_first() {
            Some((exterior, holes)) if exterior.len() >= 3 => (exterior, holes),
            _ => {
                return Err(TerradiffError::InvalidAoi {
                    reason: "polygon needs an exterior ring with at least 3 positions".to_string(),
                })
            }
        };

        let to_line = |ring: &Vec<[f64; 2]>| {
            LineString::from(ring.iter().map(|p| (p[0], p[1])).collect::<Vec<_>>())
        };

        let polygon = Polygon::new(to_line(exterior), holes.iter().map(to_line).collect());
        Ok(Self { geometry: AoiGeometry::Polygon(polygon) })
    }

    /// Build from already-parsed polygons (e.g. from a KML file). One polygon
    /// stays a polygon; several become a multipolygon.
    pub fn from_polygons(mut polygons: Vec<Polygon<f64>>) -> Result<Self> {
        for polygon in &polygons {
            if polygon.exterior().0.len() < 3 {
                return Err(TerradiffError::InvalidAoi {
                    reason: "polygon exterior ring has fewer than 3 positions".to_string(),
                });
            }
        }
        match polygons.len() {
            0 => Err(TerradiffError::InvalidAoi { reason: "no polygon found".to_string() }),
            1 => Ok(Self { geometry: AoiGeometry::Polygon(polygons.remove(0)) }),
            _ => Ok(Self { geometry: AoiGeometry::MultiPolygon(MultiPolygon(polygons)) }),
        }
    }

    /// Accepts Polygon and MultiPolygon GeoJSON geometries; rejects everything
    /// else.
    pub fn from_geojson(geometry: &geojson::Geometry) -> Result<Self> {
        match &geometry.value {
            geojson::Value::Polygon(_) => {
                let polygon: Polygon<f64> = geometry.value.clone().try_into().map_err(
                    |e: geojson::Error| TerradiffError::InvalidAoi { reason: e.to_string() },
                )?;
                Self::from_polygons(vec![polygon])
            }
            geojson::Value::MultiPolygon(_) => {
                let multi: MultiPolygon<f64> = geometry.value.clone().try_into().map_err(
                    |e: geojson::Error| TerradiffError::InvalidAoi { reason: e.to_string() },
                )?;
                Self::from_polygons(multi.0)
            }
            _ => Err(TerradiffError::InvalidAoi {
                reason: "AOI must be a Polygon or MultiPolygon".to_string(),
            }),
        }
    }

    pub fn to_geojson(&self) -> geojson::Geometry {
        match &self.geometry {
            AoiGeometry::Polygon(p) => geojson::Geometry::new(geojson::Value::from(p)),
            AoiGeometry::MultiPolygon(mp) => geojson::Geometry::new(geojson::Value::from(mp)),
        }
    }

    /// The AOI as a multipolygon; a single polygon is wrapped into a
    /// one-element multipolygon so callers handle one shape.
    pub fn multi_polygon(&self) -> MultiPolygon<f64> {
        match &self.geometry {
            AoiGeometry::Polygon(p) => MultiPolygon(vec![p.clone()]),
            AoiGeometry::MultiPolygon(mp) => mp.clone(),
        }
    }

    pub fn is_multi_polygon(&self) -> bool {
        matches!(self.geometry, AoiGeometry::MultiPolygon(_))
    }

    fn rect(&self) -> Rect<f64> {
        // Construction guarantees a non-degenerate exterior ring, so the
        // bounding rect exists; the fallback keeps this panic-free anyway.
        let fallback = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 0.0, y: 0.0 });
        match &self.geometry {
            AoiGeometry::Polygon(p) => p.bounding_rect().unwrap_or(fallback),
            AoiGeometry::MultiPolygon(mp) => mp.bounding_rect().unwrap_or(fallback),
        }
    }

    /// Bounding box as a closed GeoJSON Polygon ring, the shape the frontend
    /// uses to fit the map view.
    pub fn bounds_polygon(&self) -> geojson::Geometry {
        let rect = self.rect();
        let (min, max) = (rect.min(), rect.max());
        let ring = vec![
            vec![min.x, min.y],
            vec![max.x, min.y],
            vec![max.x, max.y],
            vec![min.x, max.y],
            vec![min.x, min.y],
        ];
        geojson::Geometry::new(geojson::Value::Polygon(vec![ring]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vec<[f64; 2]>> {
        vec![vec![[30.0, 50.0], [31.0, 50.0], [31.0, 51.0], [30.0, 51.0], [30.0, 50.0]]]
    }

    #[test]
    fn empty_coordinates_are_rejected() {
        let err = Aoi::from_polygon_rings(&[]).unwrap_err();
        assert!(matches!(err, TerradiffError::InvalidAoi { .. }));
    }

    #[test]
    fn two_point_ring_is_rejected() {
        let err = Aoi::from_polygon_rings(&[vec![[0.0, 0.0], [1.0, 1.0]]]).unwrap_err();
        assert!(matches!(err, TerradiffError::InvalidAoi { .. }));
    }

    #[test]
    fn geojson_round_trip_preserves_coordinates() {
        let aoi = Aoi::from_polygon_rings(&square()).unwrap();
        let geojson = aoi.to_geojson();
        match geojson.value {
            geojson::Value::Polygon(rings) => {
                assert_eq!(rings.len(), 1);
                assert_eq!(rings[0][0], vec![30.0, 50.0]);
                assert_eq!(rings[0][2], vec![31.0, 51.0]);
            }
            other => panic!("expected Polygon, got {:?}", other),
        }
    }

    #[test]
    fn point_geometry_is_rejected() {
        let point = geojson::Geometry::new(geojson::Value::Point(vec![1.0, 2.0]));
        assert!(Aoi::from_geojson(&point).is_err());
    }

    #[test]
    fn bounds_polygon_is_a_closed_ring() {
        let aoi = Aoi::from_polygon_rings(&square()).unwrap();
        match aoi.bounds_polygon().value {
            geojson::Value::Polygon(rings) => {
                let ring = &rings[0];
                assert_eq!(ring.len(), 5);
                assert_eq!(ring.first(), ring.last());
                assert_eq!(ring[0], vec![30.0, 50.0]);
                assert_eq!(ring[2], vec![31.0, 51.0]);
            }
            other => panic!("expected Polygon, got {:?}", other),
        }
    }

    #[test]
    fn several_polygons_become_a_multipolygon() {
        let p = |dx: f64| {
            Polygon::new(
                LineString::from(vec![(dx, 0.0), (dx + 1.0, 0.0), (dx + 1.0, 1.0), (dx, 0.0)]),
                vec![],
            )
        };
        let aoi = Aoi::from_polygons(vec![p(0.0), p(5.0)]).unwrap();
        assert!(aoi.is_multi_polygon());
        assert_eq!(aoi.multi_polygon().0.len(), 2);
    }
}
