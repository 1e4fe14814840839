//! A* path-finder (§4.5) over a [`RoadGraph`]. Ties on `f = g + h` are
//! broken by smaller `g`, then by node identity, so the search is
//! deterministic given the same graph and weight configuration.

use std::cmp::Reverse;
use std::collections::HashMap;

use ordered_float::OrderedFloat;

use crate::graph::{EdgeId, NodeId, RoadGraph};
use crate::topology::Calculator;
use crate::util::priority_queue::InternalPriorityQueue;

use super::error::SearchError;
use super::weight::AStarConfig;

type Priority = Reverse<(OrderedFloat<f64>, OrderedFloat<f64>, NodeId)>;

fn priority(f: f64, g: f64, id: NodeId) -> Priority {
    Reverse((OrderedFloat(f), OrderedFloat(g), id))
}

/// The routed path between two nodes: the node sequence, the edge chosen
/// for each hop (parallel, one shorter than `nodes`), and the total routed
/// cost under the configured weight.
#[derive(Clone, Debug)]
pub struct AStarPath {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
    pub cost: f64,
}

/// Runs A* from `source` to `target`. Returns `Ok(None)` when no path
/// exists (§7: "no path" is not an error).
pub fn find_path(
    graph: &RoadGraph,
    calc: Calculator,
    config: &AStarConfig,
    source: NodeId,
    target: NodeId,
) -> Result<Option<AStarPath>, SearchError> {
    if source == target {
        return Ok(Some(AStarPath {
            nodes: vec![source],
            edges: Vec::new(),
            cost: 0.0,
        }));
    }

    let target_point = graph.node(target)?.point();

    let mut open: InternalPriorityQueue<NodeId, Priority> = InternalPriorityQueue::default();
    let mut g_score: HashMap<NodeId, f64> = HashMap::new();
    let mut came_from: HashMap<NodeId, (NodeId, EdgeId)> = HashMap::new();

    g_score.insert(source, 0.0);
    let h0 = config
        .weight
        .heuristic(calc, &graph.node(source)?.point(), &target_point)?;
    open.push(source, priority(h0, 0.0, source));

    while let Some((current, _)) = open.pop() {
        if current == target {
            break;
        }
        let current_g = *g_score.get(&current).unwrap_or(&f64::INFINITY);

        for &edge_id in graph.out_edges(current) {
            let edge = graph.edge(edge_id)?;
            let w = config.weight.edge_weight(graph, calc, edge)?;
            let tentative_g = current_g + w;
            let best_known = *g_score.get(&edge.to).unwrap_or(&f64::INFINITY);
            if tentative_g < best_known {
                g_score.insert(edge.to, tentative_g);
                came_from.insert(edge.to, (current, edge_id));
                let h = config
                    .weight
                    .heuristic(calc, &graph.node(edge.to)?.point(), &target_point)?;
                open.push_increase(edge.to, priority(tentative_g + h, tentative_g, edge.to));
            }
        }
    }

    if !g_score.contains_key(&target) {
        return Ok(None);
    }

    let mut nodes = vec![target];
    let mut edges = Vec::new();
    let mut cursor = target;
    while cursor != source {
        let (prev, edge_id) = *came_from
            .get(&cursor)
            .expect("target reachable implies a back-pointer chain to source");
        nodes.push(prev);
        edges.push(edge_id);
        cursor = prev;
    }
    nodes.reverse();
    edges.reverse();

    Ok(Some(AStarPath {
        nodes,
        edges,
        cost: g_score[&target],
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryFactory;
    use crate::graph::RoadGraphConfig;
    use crate::search::weight::WeightKind;

    fn line_graph() -> (RoadGraph, Vec<NodeId>) {
        // 0 -> 1 -> 2 -> 3, evenly spaced along a meridian so distance
        // weights are monotone with node index.
        let factory = GeometryFactory::geoidal();
        let mut g = RoadGraph::new(factory, RoadGraphConfig::default()).unwrap();
        let pts: Vec<_> = (0..4)
            .map(|i| factory.create_point(5.0, 50.0 + i as f64 * 0.01).unwrap())
            .collect();
        let mut nodes = Vec::new();
        for w in pts.windows(2) {
            let path = factory.create_polyline(vec![w[0], w[1]]).unwrap();
            let inserted = g.add_direct_edge("e", path).unwrap();
            assert_eq!(inserted.len(), 1);
        }
        for (i, _) in pts.iter().enumerate() {
            nodes.push(NodeId(i));
        }
        (g, nodes)
    }

    #[test]
    fn finds_path_along_a_chain() {
        let (g, nodes) = line_graph();
        let calc = g.calculator();
        let config = AStarConfig { weight: WeightKind::Distance };
        let result = find_path(&g, calc, &config, nodes[0], nodes[3]).unwrap().unwrap();
        assert_eq!(result.nodes, vec![nodes[0], nodes[1], nodes[2], nodes[3]]);
        assert_eq!(result.edges.len(), 3);
        assert!(result.cost > 0.0);
    }

    #[test]
    fn no_path_returns_none_not_error() {
        let factory = GeometryFactory::geoidal();
        let mut g = RoadGraph::new(factory, RoadGraphConfig::default()).unwrap();
        let a = factory.create_point(0.0, 0.0).unwrap();
        let b = factory.create_point(0.0, 1.0).unwrap();
        let c = factory.create_point(10.0, 10.0).unwrap();
        let d = factory.create_point(10.0, 11.0).unwrap();
        g.add_direct_edge("ab", factory.create_polyline(vec![a, b]).unwrap()).unwrap();
        g.add_direct_edge("cd", factory.create_polyline(vec![c, d]).unwrap()).unwrap();
        let calc = g.calculator();
        let config = AStarConfig::default();
        let result = find_path(&g, calc, &config, NodeId(0), NodeId(2)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn source_equals_target_is_trivial() {
        let (g, nodes) = line_graph();
        let calc = g.calculator();
        let config = AStarConfig::default();
        let result = find_path(&g, calc, &config, nodes[0], nodes[0]).unwrap().unwrap();
        assert_eq!(result.nodes, vec![nodes[0]]);
        assert_eq!(result.cost, 0.0);
    }
}
