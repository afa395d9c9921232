use anyhow::{Context, Result, anyhow, bail};
use geo::{Coord, Geometry, LineString, MultiPolygon, Polygon};
use serde_json::{Value, json};

/// Parse a GeoJSON geometry object into a geo::Geometry.
/// Only `Polygon` and `MultiPolygon` are accepted; district boundaries are areal.
pub(crate) fn read_geometry(value: &Value) -> Result<Geometry<f64>> {
    let geometry = value.as_object()
        .ok_or_else(|| anyhow!("Invalid geometry: expected an object"))?;
    let ty = geometry.get("type").and_then(Value::as_str)
        .ok_or_else(|| anyhow!("Invalid geometry: missing \"type\""))?;
    let coords = geometry.get("coordinates").and_then(Value::as_array)
        .ok_or_else(|| anyhow!("Invalid {ty}: missing \"coordinates\" array"))?;

    match ty {
        "Polygon" => Ok(Geometry::Polygon(parse_polygon_coords(coords)?)),
        "MultiPolygon" => {
            let polygons = coords.iter().enumerate()
                .map(|(i, polygon)| {
                    let rings = polygon.as_array()
                        .ok_or_else(|| anyhow!("Invalid MultiPolygon: polygon {i} is not an array"))?;
                    parse_polygon_coords(rings)
                        .with_context(|| format!("Invalid MultiPolygon: polygon {i}"))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Geometry::MultiPolygon(MultiPolygon(polygons)))
        }
        other => bail!("Unsupported geometry type {other:?} (expected Polygon or MultiPolygon)"),
    }
}

/// Parse GeoJSON Polygon coordinates into a geo::Polygon.
/// Format: [exterior, hole, hole, ...] where each ring is [[x, y], [x, y], ...]
fn parse_polygon_coords(rings: &[Value]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter().enumerate().map(|(i, ring)| {
        let ring = ring.as_array()
            .ok_or_else(|| anyhow!("Invalid Polygon: ring {i} is not an array"))?;
        parse_ring_coords(ring).with_context(|| format!("Invalid Polygon: ring {i}"))
    });

    let exterior = rings.next()
        .ok_or_else(|| anyhow!("Invalid Polygon: missing exterior ring"))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;

    Ok(Polygon::new(exterior, interiors))
}

/// Parse a ring (exterior or interior) from GeoJSON coordinates.
/// Format: [[x, y], [x, y], ...]; extra ordinates (altitude) are ignored.
fn parse_ring_coords(coords: &[Value]) -> Result<LineString<f64>> {
    let mut points = Vec::with_capacity(coords.len() + 1);

    for coord_pair in coords {
        let coord_array = coord_pair.as_array()
            .filter(|pair| pair.len() >= 2)
            .ok_or_else(|| anyhow!("Invalid coordinate: expected [x, y], got {coord_pair}"))?;
        let x = coord_array[0].as_f64()
            .ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?;
        let y = coord_array[1].as_f64()
            .ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?;
        points.push(Coord { x, y });
    }

    // Ensure ring is closed (first point == last point)
    if !points.is_empty() && points[0] != points[points.len() - 1] {
        points.push(points[0]);
    }

    if points.len() < 4 {
        bail!("ring has {} positions, a closed ring needs at least 4", points.len());
    }

    Ok(LineString(points))
}

/// Convert a district geometry to a serde_json::Value holding GeoJSON,
/// keeping the Polygon / MultiPolygon type it was read with.
pub(crate) fn write_geometry(geom: &Geometry<f64>) -> Result<Value> {
    match geom {
        Geometry::Polygon(polygon) => Ok(json!({
            "type": "Polygon",
            "coordinates": polygon_coords(polygon),
        })),
        Geometry::MultiPolygon(mp) => Ok(json!({
            "type": "MultiPolygon",
            "coordinates": mp.0.iter().map(polygon_coords).collect::<Vec<_>>(),
        })),
        _ => bail!("Unsupported geometry for GeoJSON output (expected Polygon or MultiPolygon)"),
    }
}

fn polygon_coords(polygon: &Polygon<f64>) -> Vec<Vec<[f64; 2]>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(|ring| ring.coords().map(|c| [c.x, c.y]).collect())
        .collect()
}

/// View an areal geometry as a MultiPolygon for containment tests.
pub(crate) fn to_multipolygon(geom: &Geometry<f64>) -> Result<MultiPolygon<f64>> {
    match geom {
        Geometry::Polygon(polygon) => Ok(MultiPolygon(vec![polygon.clone()])),
        Geometry::MultiPolygon(mp) => Ok(mp.clone()),
        _ => bail!("Expected Polygon or MultiPolygon geometry"),
    }
}
