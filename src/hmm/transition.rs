//! Transition probability (§4.6.3): a sum of pluggable non-negative
//! log-penalty factors. Any factor contributing `+inf` prunes the
//! candidate pair outright.

use crate::geometry::{Point, Polyline};
use crate::graph::{Edge, EdgeId, RoadGraph};
use crate::search::{self, AStarConfig, WeightKind};
use crate::topology::Calculator;

use super::error::HmmError;

/// One recognized transition-probability plugin (§4.6.3's table).
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind")]
pub enum TransitionPlugin {
    Topological,
    NoUTurn,
    Direction,
    ShortestPath { beta_m: f64 },
}

fn shares_endpoint(a: &Edge, b: &Edge) -> bool {
    a.from == b.from || a.from == b.to || a.to == b.from || a.to == b.to
}

/// The bearing of the segment of `path` nearest to `at`, i.e. the local
/// direction of travel through the observation's projection point.
fn local_bearing(calc: Calculator, path: &Polyline, at: &Point) -> Result<f64, HmmError> {
    let mut best_dist = f64::INFINITY;
    let mut best_bearing = 0.0;
    for (a, b) in path.segments() {
        let closest = calc.on_track_closest_point(&a, &b, at)?;
        let d = calc.distance(at, &closest)?;
        if d < best_dist {
            best_dist = d;
            best_bearing = calc.initial_bearing(&a, &b)?;
        }
    }
    Ok(best_bearing)
}

impl TransitionPlugin {
    /// Non-negative log-penalty contributed by this plugin for the
    /// transition `prev_edge -> edge`, given the observations that picked
    /// each out (`o_prev`, `o_cur`). `f64::INFINITY` prunes the pair.
    pub fn penalty(
        &self,
        graph: &RoadGraph,
        calc: Calculator,
        prev_edge: EdgeId,
        edge: EdgeId,
        o_prev: &Point,
        o_cur: &Point,
    ) -> Result<f64, HmmError> {
        let prev = graph.edge(prev_edge)?;
        let cur = graph.edge(edge)?;

        match self {
            TransitionPlugin::Topological => {
                let reachable = prev_edge == edge
                    || graph.out_edges(prev.to).contains(&edge)
                    || shares_endpoint(prev, cur);
                Ok(if reachable { 0.0 } else { f64::INFINITY })
            }
            TransitionPlugin::NoUTurn => Ok(if cur.is_reverse_of(prev) { f64::INFINITY } else { 0.0 }),
            TransitionPlugin::Direction => {
                let bearing_prev = local_bearing(calc, &prev.path, o_prev)?;
                let bearing_cur = local_bearing(calc, &cur.path, o_cur)?;
                let theta = (bearing_prev - bearing_cur).to_radians();
                let cos_theta = theta.cos();
                if cos_theta <= 0.0 {
                    Ok(f64::INFINITY)
                } else {
                    Ok(-cos_theta.ln())
                }
            }
            TransitionPlugin::ShortestPath { beta_m } => {
                let d_gc = calc.distance(o_prev, o_cur)?;
                let d_route = if prev_edge == edge || prev.to == cur.from {
                    0.0
                } else {
                    let routed = search::find_path(
                        graph,
                        calc,
                        &AStarConfig { weight: WeightKind::Distance },
                        prev.to,
                        cur.from,
                    )?;
                    match routed {
                        Some(path) => path.cost,
                        None => return Ok(f64::INFINITY),
                    }
                };
                Ok((d_route - d_gc).abs() / beta_m)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryFactory;
    use crate::graph::RoadGraphConfig;

    fn two_edge_graph() -> (RoadGraph, EdgeId, EdgeId) {
        let factory = GeometryFactory::geoidal();
        let mut g = RoadGraph::new(factory, RoadGraphConfig::default()).unwrap();
        let a = factory.create_point(5.0, 52.0).unwrap();
        let b = factory.create_point(5.0, 52.01).unwrap();
        let c = factory.create_point(5.0, 52.02).unwrap();
        let e0 = g
            .add_direct_edge("ab", factory.create_polyline(vec![a, b]).unwrap())
            .unwrap()[0];
        let e1 = g
            .add_direct_edge("bc", factory.create_polyline(vec![b, c]).unwrap())
            .unwrap()[0];
        (g, e0, e1)
    }

    #[test]
    fn topological_allows_connected_edges() {
        let (g, e0, e1) = two_edge_graph();
        let calc = g.calculator();
        let p = TransitionPlugin::Topological;
        let o = g.node(g.edge(e0).unwrap().from).unwrap().point();
        let penalty = p
            .penalty(&g, calc, e0, e1, &o, &o)
            .unwrap();
        assert_eq!(penalty, 0.0);
    }

    #[test]
    fn no_u_turn_rejects_the_reverse_edge() {
        let factory = GeometryFactory::geoidal();
        let mut g = RoadGraph::new(factory, RoadGraphConfig::default()).unwrap();
        let a = factory.create_point(5.0, 52.0).unwrap();
        let b = factory.create_point(5.0, 52.01).unwrap();
        let ids = g
            .add_bidirectional_edge("ab", factory.create_polyline(vec![a, b]).unwrap())
            .unwrap();
        let calc = g.calculator();
        let penalty = TransitionPlugin::NoUTurn
            .penalty(&g, calc, ids[0], ids[1], &a, &b)
            .unwrap();
        assert_eq!(penalty, f64::INFINITY);
    }

    #[test]
    fn direction_penalizes_sharp_turns() {
        let (g, e0, e1) = two_edge_graph();
        let calc = g.calculator();
        let o_prev = g.node(g.edge(e0).unwrap().from).unwrap().point();
        let o_cur = g.node(g.edge(e1).unwrap().to).unwrap().point();
        let penalty = TransitionPlugin::Direction
            .penalty(&g, calc, e0, e1, &o_prev, &o_cur)
            .unwrap();
        assert!(penalty.is_finite());
    }
}
