//! Ties the prefilter, Viterbi decoder and post-processor together into a
//! single `Matcher::match_trajectory` call (§4.6, component I).

use crate::geometry::Polyline;
use crate::graph::{EdgeId, RoadGraph};
use crate::observation::Observation;

use super::config::HmmConfig;
use super::error::HmmError;
use super::{postprocess, prefilter, viterbi};

/// The four artifacts the CLI harness prints (§6): the raw decoded edge
/// sequence, the connected sequence, the stitched path geometry, and the
/// average orthogonal positioning error across decoded steps.
#[derive(Clone, Debug)]
pub struct MatchResult {
    pub decoded: Vec<Option<EdgeId>>,
    pub connected: Vec<EdgeId>,
    pub path: Option<Polyline>,
    pub avg_cross_track_error_m: f64,
}

/// Matches trajectories against one immutable [`RoadGraph`] (§5's "graphs...
/// are immutable after construction and may be shared freely").
pub struct Matcher<'g> {
    graph: &'g RoadGraph,
    config: HmmConfig,
}

impl<'g> Matcher<'g> {
    pub fn new(graph: &'g RoadGraph, config: HmmConfig) -> Self {
        Self { graph, config }
    }

    pub fn match_trajectory(&self, observations: &[Observation]) -> Result<MatchResult, HmmError> {
        if observations.is_empty() {
            return Err(HmmError::EmptyTrajectory);
        }

        let calc = self.graph.calculator();
        let filtered = prefilter::prefilter(self.graph, observations, self.config.candidate_radius_m)?;
        let columns = viterbi::build_columns(self.graph, calc, &filtered, self.config.candidate_radius_m)?;
        let decoded = viterbi::decode(self.graph, calc, &self.config, &filtered, &columns)?;

        let raw = postprocess::drop_nulls(&decoded);
        let connected = postprocess::connect(self.graph, calc, &raw)?;
        let path = postprocess::concatenate_path(self.graph, self.graph.factory(), &connected)?;

        let mut error_sum = 0.0;
        let mut error_count = 0usize;
        for (step, chosen) in decoded.iter().enumerate() {
            if let Some(edge_id) = chosen {
                if let Some(pos) = columns[step].candidates.iter().position(|c| c == edge_id) {
                    error_sum += columns[step].cross_track_m[pos];
                    error_count += 1;
                }
            }
        }
        let avg_cross_track_error_m = if error_count > 0 { error_sum / error_count as f64 } else { 0.0 };

        Ok(MatchResult { decoded, connected, path, avg_cross_track_error_m })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryFactory;
    use crate::graph::RoadGraphConfig;
    use chrono::{TimeZone, Utc};

    #[test]
    fn matches_a_short_trajectory_along_a_single_road() {
        let factory = GeometryFactory::geoidal();
        let mut g = RoadGraph::new(factory, RoadGraphConfig::default()).unwrap();
        let a = factory.create_point(5.0, 52.0).unwrap();
        let b = factory.create_point(5.0, 52.01).unwrap();
        let c = factory.create_point(5.0, 52.02).unwrap();
        g.add_direct_edge("ab", factory.create_polyline(vec![a, b]).unwrap()).unwrap();
        g.add_direct_edge("bc", factory.create_polyline(vec![b, c]).unwrap()).unwrap();
        g.build_index().unwrap();

        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let observations = vec![
            Observation::new(factory.create_point(5.0001, 52.0).unwrap(), t0),
            Observation::new(
                factory.create_point(5.0001, 52.005).unwrap(),
                t0 + chrono::Duration::seconds(5),
            ),
            Observation::new(
                factory.create_point(5.0001, 52.01).unwrap(),
                t0 + chrono::Duration::seconds(10),
            ),
        ];

        let matcher = Matcher::new(&g, HmmConfig { candidate_radius_m: 100.0, ..Default::default() });
        let result = matcher.match_trajectory(&observations).unwrap();

        assert!(result.decoded.iter().any(Option::is_some));
        assert!(!result.connected.is_empty());
        assert!(result.path.is_some());
        assert!(result.avg_cross_track_error_m >= 0.0);
    }

    #[test]
    fn empty_trajectory_is_rejected() {
        let factory = GeometryFactory::geoidal();
        let mut g = RoadGraph::new(factory, RoadGraphConfig::default()).unwrap();
        let a = factory.create_point(5.0, 52.0).unwrap();
        let b = factory.create_point(5.0, 52.01).unwrap();
        g.add_direct_edge("ab", factory.create_polyline(vec![a, b]).unwrap()).unwrap();
        g.build_index().unwrap();

        let matcher = Matcher::new(&g, HmmConfig::default());
        assert!(matches!(matcher.match_trajectory(&[]), Err(HmmError::EmptyTrajectory)));
    }
}
