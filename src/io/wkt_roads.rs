//! Road WKT reader (§4.8/§6): one `LINESTRING (x y, x y, ...)` per line,
//! any other geometry type rejected.

use std::fs;
use std::path::Path;

use geo::LineString;
use wkt::TryFromWkt;

use crate::geometry::{GeometryFactory, Polyline};

use super::error::IoError;

/// Reads every road in `path`, returning `(id, path)` pairs where `id` is
/// the 0-based line number as a string — callers typically feed these
/// straight into [`crate::graph::RoadGraph::add_bidirectional_edge`].
pub fn read_roads(path: &Path, factory: GeometryFactory) -> Result<Vec<(String, Polyline)>, IoError> {
    let contents = fs::read_to_string(path)?;
    let mut roads = Vec::new();

    for (line_no, raw_line) in contents.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if !(line.starts_with("LINESTRING (") || line.starts_with("LINESTRING(")) {
            return Err(IoError::UnsupportedGeometry { line: line_no, text: line.to_string() });
        }

        let geom: LineString = LineString::try_from_wkt_str(line).map_err(|e| IoError::MalformedRow {
            line: line_no,
            reason: e.to_string(),
        })?;

        let points = geom
            .coords()
            .map(|c| factory.create_point(c.x, c.y))
            .collect::<Result<Vec<_>, _>>()?;
        let polyline = factory.create_polyline(points)?;

        roads.push((line_no.to_string(), polyline));
    }

    Ok(roads)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_two_roads_and_rejects_a_third_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roads.wkt");
        fs::write(
            &path,
            "LINESTRING (5.0 52.0, 5.0 52.01)\nLINESTRING(5.0 52.01, 5.0 52.02)\n",
        )
        .unwrap();

        let factory = GeometryFactory::geoidal();
        let roads = read_roads(&path, factory).unwrap();
        assert_eq!(roads.len(), 2);
        assert_eq!(roads[0].1.len(), 2);
    }

    #[test]
    fn rejects_non_linestring_geometry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roads.wkt");
        fs::write(&path, "POINT (5.0 52.0)\n").unwrap();

        let factory = GeometryFactory::geoidal();
        let err = read_roads(&path, factory).unwrap_err();
        assert!(matches!(err, IoError::UnsupportedGeometry { .. }));
    }

    #[test]
    fn skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roads.wkt");
        fs::write(&path, "\nLINESTRING (5.0 52.0, 5.0 52.01)\n\n").unwrap();

        let factory = GeometryFactory::geoidal();
        let roads = read_roads(&path, factory).unwrap();
        assert_eq!(roads.len(), 1);
    }
}
