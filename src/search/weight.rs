//! Edge-weight and heuristic calculators for A* (§4.5). Two interchangeable
//! pairs are supported: straight orthodromic/Euclidean distance, and
//! duration under a configured maximum speed.

use crate::graph::{Edge, RoadGraph};
use crate::topology::Calculator;

use super::error::SearchError;

/// Converts km/h to metres/minute — the unit `Duration` weights work in.
fn speed_m_per_min(max_speed_kmh: f64) -> f64 {
    max_speed_kmh * 1000.0 / 60.0
}

/// A* weight/heuristic pair (§4.5). `Duration`'s `max_speed_kmh` plays the
/// role of the spec's global `MAX_ALLOWED_SPEED`: it is used identically for
/// every edge's weight and for the destination heuristic, since the source
/// data model carries no per-edge speed attribute.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind")]
pub enum WeightKind {
    Distance,
    Duration { max_speed_kmh: f64 },
}

impl Default for WeightKind {
    fn default() -> Self {
        WeightKind::Distance
    }
}

impl WeightKind {
    /// `w(e)`: admissible, non-negative edge weight.
    pub fn edge_weight(&self, graph: &RoadGraph, calc: Calculator, edge: &Edge) -> Result<f64, SearchError> {
        let from = graph.node(edge.from)?.point();
        let to = graph.node(edge.to)?.point();
        let length = calc.distance(&from, &to)?;
        match self {
            WeightKind::Distance => Ok(length),
            WeightKind::Duration { max_speed_kmh } => Ok(length / speed_m_per_min(*max_speed_kmh)),
        }
    }

    /// `h`: admissible heuristic from `current` to `target`, by triangle
    /// inequality over the same calculator used for `edge_weight`.
    pub fn heuristic(
        &self,
        calc: Calculator,
        current: &crate::geometry::Point,
        target: &crate::geometry::Point,
    ) -> Result<f64, SearchError> {
        let d = calc.distance(current, target)?;
        match self {
            WeightKind::Distance => Ok(d),
            WeightKind::Duration { max_speed_kmh } => Ok(d / speed_m_per_min(*max_speed_kmh)),
        }
    }
}

/// Declarative A* configuration.
#[derive(Copy, Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AStarConfig {
    pub weight: WeightKind,
}
