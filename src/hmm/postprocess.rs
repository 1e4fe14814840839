//! Post-processing: path connection (§4.6.5). Turns the raw decoded edge
//! sequence — with `None` gaps where a step was skipped or a run restarted —
//! into a single connected route.

use itertools::Itertools;

use crate::geometry::{GeometryFactory, Point, Polyline};
use crate::graph::{EdgeId, RoadGraph};
use crate::search::{self, AStarConfig, WeightKind};
use crate::topology::Calculator;

use super::error::HmmError;

/// Drops nulls from the decoded sequence, preserving order (§4.6.5 step 1).
pub fn drop_nulls(decoded: &[Option<EdgeId>]) -> Vec<EdgeId> {
    decoded.iter().filter_map(|e| *e).collect()
}

/// Bridges consecutive distinct edges that are not already adjacent by
/// routing between them with A* under `Distance` weights (§4.6.5 step 2).
/// A gap with no route is logged and skipped rather than failing the match.
pub fn connect(graph: &RoadGraph, calc: Calculator, edges: &[EdgeId]) -> Result<Vec<EdgeId>, HmmError> {
    if edges.is_empty() {
        return Ok(Vec::new());
    }

    let astar_config = AStarConfig { weight: WeightKind::Distance };
    let mut connected = vec![edges[0]];

    for window in edges.windows(2) {
        let (a, b) = (window[0], window[1]);
        if a == b {
            continue;
        }
        let edge_a = graph.edge(a)?;
        let edge_b = graph.edge(b)?;

        if graph.out_edges(edge_a.to).contains(&b) {
            connected.push(b);
            continue;
        }

        match search::find_path(graph, calc, &astar_config, edge_a.to, edge_b.from)? {
            Some(route) => {
                for hop in route.nodes.windows(2) {
                    let hop_edges = graph.find_out_edges(hop[0], hop[1]);
                    if let Some(&edge_id) = hop_edges.first() {
                        connected.push(edge_id);
                    }
                }
                connected.push(b);
            }
            None => {
                log::debug!("no route between edge {a} and edge {b}, leaving a gap");
                connected.push(b);
            }
        }
    }

    Ok(connected)
}

/// Concatenates the geometries of a connected edge sequence into one
/// polyline, de-duplicating adjacent equal points (§4.6.5 step 3).
pub fn concatenate_path(
    graph: &RoadGraph,
    factory: GeometryFactory,
    edges: &[EdgeId],
) -> Result<Option<Polyline>, HmmError> {
    let mut flat: Vec<Point> = Vec::new();
    for &edge_id in edges {
        let edge = graph.edge(edge_id)?;
        flat.extend(edge.path.points().iter().copied());
    }
    let points: Vec<Point> = flat.into_iter().dedup().collect();
    if points.len() < 2 {
        return Ok(None);
    }
    Ok(Some(factory.create_polyline(points)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryFactory;
    use crate::graph::RoadGraphConfig;

    #[test]
    fn drop_nulls_preserves_order() {
        let decoded = vec![None, Some(EdgeId(0)), None, Some(EdgeId(1))];
        assert_eq!(drop_nulls(&decoded), vec![EdgeId(0), EdgeId(1)]);
    }

    #[test]
    fn adjacent_edges_need_no_bridging() {
        let factory = GeometryFactory::geoidal();
        let mut g = RoadGraph::new(factory, RoadGraphConfig::default()).unwrap();
        let a = factory.create_point(5.0, 52.0).unwrap();
        let b = factory.create_point(5.0, 52.01).unwrap();
        let c = factory.create_point(5.0, 52.02).unwrap();
        let e0 = g.add_direct_edge("ab", factory.create_polyline(vec![a, b]).unwrap()).unwrap()[0];
        let e1 = g.add_direct_edge("bc", factory.create_polyline(vec![b, c]).unwrap()).unwrap()[0];
        let calc = g.calculator();
        let connected = connect(&g, calc, &[e0, e1]).unwrap();
        assert_eq!(connected, vec![e0, e1]);
    }

    #[test]
    fn disconnected_edges_are_bridged_by_a_star() {
        let factory = GeometryFactory::geoidal();
        let mut g = RoadGraph::new(factory, RoadGraphConfig::default()).unwrap();
        let a = factory.create_point(5.0, 52.0).unwrap();
        let b = factory.create_point(5.0, 52.01).unwrap();
        let c = factory.create_point(5.0, 52.02).unwrap();
        let d = factory.create_point(5.0, 52.03).unwrap();
        let e0 = g.add_direct_edge("ab", factory.create_polyline(vec![a, b]).unwrap()).unwrap()[0];
        g.add_direct_edge("bc", factory.create_polyline(vec![b, c]).unwrap()).unwrap();
        let e2 = g.add_direct_edge("cd", factory.create_polyline(vec![c, d]).unwrap()).unwrap()[0];
        let calc = g.calculator();
        let connected = connect(&g, calc, &[e0, e2]).unwrap();
        assert_eq!(connected.first(), Some(&e0));
        assert_eq!(connected.last(), Some(&e2));
        assert!(connected.len() >= 2);
    }

    #[test]
    fn concatenation_de_duplicates_shared_endpoints() {
        let factory = GeometryFactory::geoidal();
        let mut g = RoadGraph::new(factory, RoadGraphConfig::default()).unwrap();
        let a = factory.create_point(5.0, 52.0).unwrap();
        let b = factory.create_point(5.0, 52.01).unwrap();
        let c = factory.create_point(5.0, 52.02).unwrap();
        let e0 = g.add_direct_edge("ab", factory.create_polyline(vec![a, b]).unwrap()).unwrap()[0];
        let e1 = g.add_direct_edge("bc", factory.create_polyline(vec![b, c]).unwrap()).unwrap()[0];
        let path = concatenate_path(&g, factory, &[e0, e1]).unwrap().unwrap();
        assert_eq!(path.len(), 3);
    }
}
