use crate::search::AStarConfig;

use super::emission::EmissionKernel;
use super::transition::TransitionPlugin;

/// Declarative HMM matcher configuration: how far to look for candidate
/// edges, which emission kernel to score them with, and the ordered list
/// of transition-probability plugins to sum (§4.6.3).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HmmConfig {
    pub candidate_radius_m: f64,
    pub emission: EmissionKernel,
    pub plugins: Vec<TransitionPlugin>,
    pub astar: AStarConfig,
}

impl Default for HmmConfig {
    fn default() -> Self {
        Self {
            candidate_radius_m: 50.0,
            emission: EmissionKernel::default(),
            plugins: vec![TransitionPlugin::Topological, TransitionPlugin::Direction],
            astar: AStarConfig::default(),
        }
    }
}
