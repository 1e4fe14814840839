//! Emission probability (§4.6.1): how likely a candidate edge explains an
//! observation, expressed as a negative log-likelihood so "multiply" stays
//! "add" across an arbitrarily long trajectory (§9, probability space).

/// The two interchangeable emission kernels.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind")]
pub enum EmissionKernel {
    /// `p ∝ exp(-1/2 * (d / sigma)^2)`.
    Gaussian { sigma_m: f64 },
    /// `p ∝ exp(-d / (mean(d) + epsilon))`, relative to the candidate set
    /// at this step.
    Bayesian { epsilon: f64 },
}

impl Default for EmissionKernel {
    fn default() -> Self {
        EmissionKernel::Gaussian { sigma_m: 15.0 }
    }
}

impl EmissionKernel {
    /// Negative log-likelihoods for every candidate at one step, given
    /// their cross-track distances. Normalised across the candidate set
    /// (§4.6.1's "values are normalised per step") — this is a constant
    /// shift per step under Viterbi and does not change which path is
    /// chosen, but keeps the reported scale meaningful.
    pub fn neg_log_likelihoods(&self, cross_track_m: &[f64]) -> Vec<f64> {
        if cross_track_m.is_empty() {
            return Vec::new();
        }
        let raw: Vec<f64> = match self {
            EmissionKernel::Gaussian { sigma_m } => cross_track_m
                .iter()
                .map(|d| (-0.5 * (d / sigma_m).powi(2)).exp())
                .collect(),
            EmissionKernel::Bayesian { epsilon } => {
                let mean = cross_track_m.iter().sum::<f64>() / cross_track_m.len() as f64;
                cross_track_m
                    .iter()
                    .map(|d| (-d / (mean + epsilon)).exp())
                    .collect()
            }
        };
        let sum: f64 = raw.iter().sum();
        if sum <= 0.0 {
            return vec![f64::INFINITY; raw.len()];
        }
        raw.iter().map(|v| -(v / sum).ln()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gaussian_prefers_the_closer_candidate() {
        let kernel = EmissionKernel::Gaussian { sigma_m: 15.0 };
        let nll = kernel.neg_log_likelihoods(&[5.0, 50.0]);
        assert!(nll[0] < nll[1]);
    }

    #[test]
    fn bayesian_prefers_the_closer_candidate() {
        let kernel = EmissionKernel::Bayesian { epsilon: 1e-6 };
        let nll = kernel.neg_log_likelihoods(&[5.0, 50.0]);
        assert!(nll[0] < nll[1]);
    }

    #[test]
    fn empty_candidate_set_yields_empty_output() {
        let kernel = EmissionKernel::default();
        assert!(kernel.neg_log_likelihoods(&[]).is_empty());
    }
}
