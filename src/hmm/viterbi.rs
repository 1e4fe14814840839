//! Viterbi decoding over the HMM lattice (§4.6.4): classical forward pass
//! with back-pointers, plus the "graceful recovery" restart rule when a
//! step's candidates are all pruned to `+inf` by the transition plugins.

use std::collections::HashMap;

use crate::graph::{EdgeId, RoadGraph};
use crate::observation::Observation;
use crate::topology::Calculator;

use super::config::HmmConfig;
use super::error::HmmError;

/// One trellis column: the candidate edges at this step and their
/// cross-track distances, parallel vectors. Empty for a null observation
/// or one with no candidates within range.
pub struct Column {
    pub candidates: Vec<EdgeId>,
    pub cross_track_m: Vec<f64>,
}

/// Builds the per-step candidate set and cross-track distances (§4.6,
/// "Candidate set at step t").
pub fn build_columns(
    graph: &RoadGraph,
    calc: Calculator,
    observations: &[Option<Observation>],
    candidate_radius_m: f64,
) -> Result<Vec<Column>, HmmError> {
    observations
        .iter()
        .map(|obs| match obs {
            None => Ok(Column { candidates: Vec::new(), cross_track_m: Vec::new() }),
            Some(o) => {
                let candidates = graph.get_edges_near(&o.point, candidate_radius_m)?;
                let mut cross_track_m = Vec::with_capacity(candidates.len());
                for &edge_id in &candidates {
                    let edge = graph.edge(edge_id)?;
                    cross_track_m.push(calc.distance_to_polyline(&o.point, &edge.path)?);
                }
                Ok(Column { candidates, cross_track_m })
            }
        })
        .collect()
}

fn argmin(delta: &HashMap<EdgeId, f64>) -> Option<(EdgeId, f64)> {
    delta
        .iter()
        .map(|(&id, &v)| (id, v))
        .min_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)))
}

/// Runs Viterbi over the full observation sequence, returning the decoded
/// edge at every index — `None` for null/skipped observations, and for any
/// index that fell inside a step where every candidate was pruned (the
/// restart rule drops that step, the next feasible observation starts a
/// fresh run).
pub fn decode(
    graph: &RoadGraph,
    calc: Calculator,
    config: &HmmConfig,
    observations: &[Option<Observation>],
    columns: &[Column],
) -> Result<Vec<Option<EdgeId>>, HmmError> {
    let n = columns.len();
    let mut decoded: Vec<Option<EdgeId>> = vec![None; n];

    let emissions: Vec<HashMap<EdgeId, f64>> = columns
        .iter()
        .map(|c| {
            let nll = config.emission.neg_log_likelihoods(&c.cross_track_m);
            c.candidates.iter().copied().zip(nll).collect()
        })
        .collect();

    let mut t = 0usize;
    while t < n {
        while t < n && columns[t].candidates.is_empty() {
            t += 1;
        }
        if t >= n {
            break;
        }

        // initial probability (§4.6.2), combined with this step's emission.
        let c0 = columns[t].candidates.len() as f64;
        let mut delta: HashMap<EdgeId, f64> = columns[t]
            .candidates
            .iter()
            .map(|&c| (c, c0.ln() + emissions[t][&c]))
            .collect();

        let mut real_indices: Vec<usize> = vec![t];
        let mut psis: Vec<HashMap<EdgeId, EdgeId>> = Vec::new();

        let mut next = t + 1;
        loop {
            if next >= n {
                break;
            }
            if columns[next].candidates.is_empty() {
                next += 1;
                continue;
            }

            let prev_index = *real_indices.last().unwrap();
            let o_prev = observations[prev_index]
                .as_ref()
                .expect("non-empty column implies a real observation");
            let o_cur = observations[next]
                .as_ref()
                .expect("non-empty column implies a real observation");

            let mut new_delta: HashMap<EdgeId, f64> = HashMap::new();
            let mut psi: HashMap<EdgeId, EdgeId> = HashMap::new();

            for &c in &columns[next].candidates {
                let mut best: Option<(EdgeId, f64)> = None;
                for (&prev_c, &prev_score) in &delta {
                    let mut penalty = 0.0;
                    let mut pruned = false;
                    for plugin in &config.plugins {
                        let p = plugin.penalty(graph, calc, prev_c, c, &o_prev.point, &o_cur.point)?;
                        if !p.is_finite() {
                            pruned = true;
                            break;
                        }
                        penalty += p;
                    }
                    if pruned {
                        continue;
                    }
                    let total = prev_score + penalty;
                    if best.map(|(_, b)| total < b).unwrap_or(true) {
                        best = Some((prev_c, total));
                    }
                }
                if let Some((prev_c, best_score)) = best {
                    new_delta.insert(c, best_score + emissions[next][&c]);
                    psi.insert(c, prev_c);
                }
            }

            if new_delta.is_empty() {
                // every candidate at `next` was pruned from every state in
                // `delta`: end this run here, restart from `next` (§4.6.4).
                log::trace!("trellis fully pruned at step {next}, restarting decoder there");
                t = next;
                break;
            }

            delta = new_delta;
            psis.push(psi);
            real_indices.push(next);
            next += 1;
        }

        let (best_edge, _) = argmin(&delta).expect("delta is non-empty by construction");
        let mut cur_edge = best_edge;
        decoded[*real_indices.last().unwrap()] = Some(cur_edge);
        for i in (1..real_indices.len()).rev() {
            let prev_edge = psis[i - 1][&cur_edge];
            decoded[real_indices[i - 1]] = Some(prev_edge);
            cur_edge = prev_edge;
        }

        if next >= n {
            break;
        }
    }

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryFactory;
    use crate::graph::RoadGraphConfig;
    use crate::hmm::emission::EmissionKernel;
    use crate::hmm::transition::TransitionPlugin;
    use chrono::{TimeZone, Utc};

    fn parallel_roads_graph() -> RoadGraph {
        // two parallel N-S roads 50 m apart (east/west), five points each.
        let factory = GeometryFactory::geoidal();
        let mut g = RoadGraph::new(factory, RoadGraphConfig::default()).unwrap();
        // ~50 m in longitude at this latitude.
        let west_lon = 5.0;
        let east_lon = 5.000_72;
        let lat0 = 52.0;
        let step = 0.0005; // ~55m north-south steps
        for i in 0..3 {
            let a = factory.create_point(west_lon, lat0 + i as f64 * step).unwrap();
            let b = factory.create_point(west_lon, lat0 + (i + 1) as f64 * step).unwrap();
            g.add_direct_edge(format!("west-{i}"), factory.create_polyline(vec![a, b]).unwrap())
                .unwrap();
            let c = factory.create_point(east_lon, lat0 + i as f64 * step).unwrap();
            let d = factory.create_point(east_lon, lat0 + (i + 1) as f64 * step).unwrap();
            g.add_direct_edge(format!("east-{i}"), factory.create_polyline(vec![c, d]).unwrap())
                .unwrap();
        }
        g.build_index().unwrap();
        g
    }

    #[test]
    fn s6_mini_hmm_prefers_the_east_road() {
        let g = parallel_roads_graph();
        let factory = g.factory();
        let calc = g.calculator();
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        // three observations biased 10 m east of the east road.
        let bias_lon = 5.000_72 + 0.000_14; // ~10m further east
        let lat0 = 52.0;
        let step = 0.0005;
        let observations: Vec<Option<Observation>> = (0..3)
            .map(|i| {
                Some(Observation::new(
                    factory.create_point(bias_lon, lat0 + i as f64 * step).unwrap(),
                    t0 + chrono::Duration::seconds(i),
                ))
            })
            .collect();

        let config = HmmConfig {
            candidate_radius_m: 200.0,
            emission: EmissionKernel::Gaussian { sigma_m: 15.0 },
            plugins: vec![TransitionPlugin::Topological, TransitionPlugin::Direction],
            astar: Default::default(),
        };

        let columns = build_columns(&g, calc, &observations, config.candidate_radius_m).unwrap();
        let decoded = decode(&g, calc, &config, &observations, &columns).unwrap();

        for d in &decoded {
            let edge_id = d.expect("expected a decoded edge at every step");
            let edge = g.edge(edge_id).unwrap();
            assert!(edge.id.starts_with("east"), "expected an east-road edge, got {}", edge.id);
        }
    }
}
