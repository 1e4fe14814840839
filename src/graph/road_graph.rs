//! Node-coalescing road graph (§4.4). Edges are added one polyline at a
//! time; incident endpoints within a configured tolerance are merged onto a
//! shared node whose point becomes the running mean of everything merged
//! into it.

use std::collections::HashMap;

use crate::geometry::{Envelope, GeometryFactory, Point, Polyline};
use crate::spatial_index::HPRtree;
use crate::topology::Calculator;

use super::edge::{Edge, EdgeId};
use super::error::GraphError;
use super::node::{Node, NodeId};

/// Declarative configuration for a [`RoadGraph`]: the node-merge tolerance
/// and whether to maintain a spatial index for `get_edges_near`.
#[derive(Copy, Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RoadGraphConfig {
    /// Merge tolerance `tau`, metres (planar factories: native units). `0.0`
    /// coalesces only on exact point equality.
    pub merge_threshold_m: f64,
    /// Whether `get_edges_near` is usable; without it, querying is a
    /// configuration error.
    pub with_rtree: bool,
}

impl Default for RoadGraphConfig {
    fn default() -> Self {
        Self {
            merge_threshold_m: 0.0,
            with_rtree: true,
        }
    }
}

/// A node-coalescing road graph: an arena of [`Node`]s and [`Edge`]s indexed
/// by stable [`NodeId`]/[`EdgeId`], plus an optional Hilbert-packed R-tree
/// over edge path bounding boxes for `get_edges_near`.
///
/// The R-tree is a *static*, bulk-loaded structure (§4.2), which does not
/// support incremental insertion. The graph therefore follows the lifecycle
/// note in §3 ("R-tree is built, then queried") literally: edges are added
/// with `add_direct_edge`/`add_bidirectional_edge`, then [`Self::build_index`]
/// bulk-loads the R-tree once from the finished edge set before
/// `get_edges_near` becomes callable. See `DESIGN.md`.
pub struct RoadGraph {
    factory: GeometryFactory,
    calculator: Calculator,
    config: RoadGraphConfig,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    rtree: Option<HPRtree<EdgeId>>,
}

impl RoadGraph {
    pub fn new(factory: GeometryFactory, config: RoadGraphConfig) -> Result<Self, GraphError> {
        if config.merge_threshold_m < 0.0 {
            return Err(GraphError::NegativeMergeThreshold(config.merge_threshold_m));
        }
        Ok(Self {
            factory,
            calculator: Calculator::from(factory.kind()),
            config,
            nodes: Vec::new(),
            edges: Vec::new(),
            rtree: None,
        })
    }

    pub fn factory(&self) -> GeometryFactory {
        self.factory
    }

    pub fn calculator(&self) -> Calculator {
        self.calculator
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, GraphError> {
        self.nodes.get(id.0).ok_or(GraphError::UnknownNode(id.0))
    }

    pub fn edge(&self, id: EdgeId) -> Result<&Edge, GraphError> {
        self.edges.get(id.0).ok_or(GraphError::UnknownEdge(id.0))
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter().enumerate().map(|(i, e)| (EdgeId(i), e))
    }

    pub fn out_edges(&self, node: NodeId) -> &[EdgeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.out_edges.as_slice())
            .unwrap_or(&[])
    }

    /// Edge ids `e` such that `e.from == from` and `e.to == to`, in
    /// insertion order. Multiple edges between the same node pair (multi-
    /// edges) are permitted per the Open Question in §9(ii); all are
    /// returned.
    pub fn find_out_edges(&self, from: NodeId, to: NodeId) -> Vec<EdgeId> {
        self.out_edges(from)
            .iter()
            .copied()
            .filter(|id| self.edges[id.0].to == to)
            .collect()
    }

    /// Locates existing nodes within `tau` of `p`, or creates a single new
    /// node seeded at `p` if none are found. When a match is found its
    /// point is replaced by the arithmetic mean of its current point and
    /// `p` (§4.4 step 1), which is idempotent once no further nearby edges
    /// are inserted.
    fn find_or_create_nodes_near(&mut self, p: Point) -> Result<Vec<NodeId>, GraphError> {
        let tau = self.config.merge_threshold_m;
        let mut matches = Vec::new();
        for (i, node) in self.nodes.iter().enumerate() {
            let within = if tau == 0.0 {
                node.point == p
            } else {
                self.calculator.distance(&node.point, &p)? <= tau
            };
            if within {
                matches.push(NodeId(i));
            }
        }
        if matches.is_empty() {
            let id = NodeId(self.nodes.len());
            self.nodes.push(Node {
                point: p,
                label: id.to_string(),
                out_edges: Vec::new(),
            });
            return Ok(vec![id]);
        }
        if tau > 0.0 {
            for id in &matches {
                let node = &mut self.nodes[id.0];
                let mean_x = (node.point.x() + p.x()) / 2.0;
                let mean_y = (node.point.y() + p.y()) / 2.0;
                node.point = Point::new(mean_x, mean_y, None, self.factory)?;
            }
        }
        Ok(matches)
    }

    fn path_length(&self, path: &Polyline) -> Result<f64, GraphError> {
        let mut total = 0.0;
        for (a, b) in path.segments() {
            total += self.calculator.distance(&a, &b)?;
        }
        Ok(total)
    }

    fn insert_edge_if_new(&mut self, candidate: Edge) -> Option<EdgeId> {
        if self.edges.iter().any(|e| *e == candidate) {
            return None;
        }
        let id = EdgeId(self.edges.len());
        self.nodes[candidate.from.0].out_edges.push(id);
        self.edges.push(candidate);
        Some(id)
    }

    /// Adds a single directed edge (§4.4 `addDirectEdge`): coalesces the
    /// polyline's start/end onto existing nodes (or creates new ones),
    /// connects every non-overlapping start/end pair, and self-connects any
    /// node pair that coalesced into the same cluster at both ends.
    /// Returns the ids of the edges actually inserted (duplicates by
    /// `(from, to, weight)` are skipped).
    pub fn add_direct_edge(
        &mut self,
        id: impl Into<String>,
        path: Polyline,
    ) -> Result<Vec<EdgeId>, GraphError> {
        let id = id.into();
        let weight = self.path_length(&path)?;

        let start_matches = self.find_or_create_nodes_near(path.start_point())?;
        let end_matches = self.find_or_create_nodes_near(path.end_point())?;

        let shared: Vec<NodeId> = start_matches
            .iter()
            .copied()
            .filter(|n| end_matches.contains(n))
            .collect();

        let mut inserted = Vec::new();

        for &s in &start_matches {
            if shared.contains(&s) {
                continue;
            }
            for &e in &end_matches {
                if shared.contains(&e) {
                    continue;
                }
                let edge = Edge::new(id.clone(), s, e, path.clone(), weight);
                if let Some(eid) = self.insert_edge_if_new(edge) {
                    inserted.push(eid);
                }
            }
        }

        for &i in &shared {
            for &j in &shared {
                if i == j {
                    continue;
                }
                let edge = Edge::new(id.clone(), i, j, path.clone(), weight);
                if let Some(eid) = self.insert_edge_if_new(edge) {
                    inserted.push(eid);
                }
            }
        }

        Ok(inserted)
    }

    /// Adds both directions of `path` (§4.4 `addBidirectionalEdge`): the
    /// forward edge under `id`, the reverse edge (reversed polyline) under
    /// `"{id}-rev"`.
    pub fn add_bidirectional_edge(
        &mut self,
        id: impl Into<String>,
        path: Polyline,
    ) -> Result<Vec<EdgeId>, GraphError> {
        let id = id.into();
        let mut inserted = self.add_direct_edge(id.clone(), path.clone())?;
        inserted.extend(self.add_direct_edge(format!("{id}-rev"), path.reverse())?);
        Ok(inserted)
    }

    /// Bulk-loads the R-tree over every edge's path bounding box. Must be
    /// called (once, after all edges are added) before `get_edges_near`;
    /// a no-op error if the graph was configured without an index.
    pub fn build_index(&mut self) -> Result<(), GraphError> {
        if !self.config.with_rtree {
            return Err(GraphError::NoRtreeAttached);
        }
        let items: Vec<(Envelope, EdgeId)> = self
            .edges
            .iter()
            .enumerate()
            .map(|(i, e)| (e.path.bounding_box(), EdgeId(i)))
            .collect();
        self.rtree = Some(HPRtree::bulk_load(items));
        Ok(())
    }

    /// Edges whose path envelope intersects a square envelope centred on
    /// `point` with half-diagonal `radius` (§4.4 `getEdgesNear`), computed
    /// via diagonal destinations at bearings 45 deg/225 deg exactly as
    /// specified rather than a plain coordinate expansion, so the query
    /// envelope is correct under the geoidal calculator too.
    pub fn get_edges_near(&self, point: &Point, radius: f64) -> Result<Vec<EdgeId>, GraphError> {
        let rtree = self.rtree.as_ref().ok_or(GraphError::NoRtreeAttached)?;

        let mut envelope = Envelope::of_point(point.x(), point.y());
        for bearing in [45.0, 225.0] {
            let (dx, dy) = self.calculator.destination(point, bearing, radius)?;
            envelope.expand_to_include_xy(dx, dy);
        }

        Ok(rtree.query(&envelope).into_iter().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryFactory;

    fn graph(merge_threshold_m: f64) -> RoadGraph {
        let factory = GeometryFactory::geoidal();
        RoadGraph::new(
            factory,
            RoadGraphConfig {
                merge_threshold_m,
                with_rtree: true,
            },
        )
        .unwrap()
    }

    #[test]
    fn s5_near_graph_two_vertex() {
        let mut g = graph(500.0);
        let f = g.factory();
        let n0 = f.create_point(22.22, 33.33).unwrap();
        let n1 = f.create_point(33.22, 44.33).unwrap();
        let path = f.create_polyline(vec![n0, n1]).unwrap();

        let inserted = g.add_direct_edge("e0", path).unwrap();
        assert_eq!(inserted.len(), 1);

        g.build_index().unwrap();
        let near = g.get_edges_near(&n0, 600.0).unwrap();
        assert_eq!(near.len(), 1);
        assert_eq!(near[0], inserted[0]);
    }

    #[test]
    fn graph_containment_invariant() {
        // invariant 4: every edge's from/to are present in the node map.
        let mut g = graph(0.0);
        let f = g.factory();
        let a = f.create_point(0.0, 0.0).unwrap();
        let b = f.create_point(0.0, 1.0).unwrap();
        let path = f.create_polyline(vec![a, b]).unwrap();
        let inserted = g.add_direct_edge("e0", path).unwrap();
        for eid in inserted {
            let e = g.edge(eid).unwrap();
            assert!(g.node(e.from).is_ok());
            assert!(g.node(e.to).is_ok());
            assert!(g.out_edges(e.from).contains(&eid));
        }
    }

    #[test]
    fn bidirectional_edge_adds_both_directions() {
        let mut g = graph(0.0);
        let f = g.factory();
        let a = f.create_point(0.0, 0.0).unwrap();
        let b = f.create_point(0.0, 1.0).unwrap();
        let path = f.create_polyline(vec![a, b]).unwrap();
        let inserted = g.add_bidirectional_edge("e0", path).unwrap();
        assert_eq!(inserted.len(), 2);
        let e0 = g.edge(inserted[0]).unwrap();
        let e1 = g.edge(inserted[1]).unwrap();
        assert!(e0.is_reverse_of(e1));
    }

    #[test]
    fn zero_threshold_requires_exact_point_match() {
        let mut g = graph(0.0);
        let f = g.factory();
        let a = f.create_point(0.0, 0.0).unwrap();
        let b = f.create_point(0.0, 1.0).unwrap();
        let c = f.create_point(0.000_001, 1.0).unwrap(); // just outside snap tolerance
        g.add_direct_edge("e0", f.create_polyline(vec![a, b]).unwrap())
            .unwrap();
        g.add_direct_edge("e1", f.create_polyline(vec![b, c]).unwrap())
            .unwrap();
        // b is shared exactly, so there should be exactly 2 nodes connected
        // through it, not a third coalesced node.
        assert!(g.nodes().count() >= 3);
    }

    #[test]
    fn missing_rtree_is_a_configuration_error() {
        let factory = GeometryFactory::geoidal();
        let g = RoadGraph::new(
            factory,
            RoadGraphConfig {
                merge_threshold_m: 0.0,
                with_rtree: false,
            },
        )
        .unwrap();
        let p = factory.create_point(0.0, 0.0).unwrap();
        assert!(matches!(
            g.get_edges_near(&p, 10.0),
            Err(GraphError::NoRtreeAttached)
        ));
    }

    #[test]
    fn negative_merge_threshold_is_rejected() {
        let factory = GeometryFactory::geoidal();
        let err = RoadGraph::new(
            factory,
            RoadGraphConfig {
                merge_threshold_m: -1.0,
                with_rtree: true,
            },
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::NegativeMergeThreshold(_)));
    }
}
