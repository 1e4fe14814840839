//! Observation prefilter (component J): blanks out any observation with no
//! candidate edge within range before it reaches the trellis, so the
//! restart rule in `viterbi::decode` never has to special-case "no
//! candidates because nothing is nearby" differently from "no candidates
//! because the transition plugins pruned everything".

use crate::graph::RoadGraph;
use crate::observation::Observation;

use super::error::HmmError;

/// Replaces observations with no candidate edge within `candidate_radius_m`
/// with `None`. Asserts non-decreasing timestamps in debug builds (§3's
/// "asserted non-decreasing by the prefilter in debug builds").
pub fn prefilter(
    graph: &RoadGraph,
    observations: &[Observation],
    candidate_radius_m: f64,
) -> Result<Vec<Option<Observation>>, HmmError> {
    #[cfg(debug_assertions)]
    for pair in observations.windows(2) {
        debug_assert!(
            pair[1].at >= pair[0].at,
            "observations must be supplied in non-decreasing timestamp order"
        );
    }

    observations
        .iter()
        .map(|o| {
            let candidates = graph.get_edges_near(&o.point, candidate_radius_m)?;
            Ok(if candidates.is_empty() { None } else { Some(*o) })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryFactory;
    use crate::graph::RoadGraphConfig;
    use chrono::{TimeZone, Utc};

    fn graph_with_one_edge() -> RoadGraph {
        let factory = GeometryFactory::geoidal();
        let mut g = RoadGraph::new(factory, RoadGraphConfig::default()).unwrap();
        let a = factory.create_point(5.0, 52.0).unwrap();
        let b = factory.create_point(5.0, 52.01).unwrap();
        g.add_direct_edge("ab", factory.create_polyline(vec![a, b]).unwrap()).unwrap();
        g.build_index().unwrap();
        g
    }

    #[test]
    fn blanks_observations_with_no_nearby_candidates() {
        let g = graph_with_one_edge();
        let factory = g.factory();
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let near = Observation::new(factory.create_point(5.0, 52.005).unwrap(), t0);
        let far = Observation::new(
            factory.create_point(20.0, 20.0).unwrap(),
            t0 + chrono::Duration::seconds(1),
        );
        let result = prefilter(&g, &[near, far], 100.0).unwrap();
        assert!(result[0].is_some());
        assert!(result[1].is_none());
    }
}
