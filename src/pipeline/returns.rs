//! Truncated TD(λ) return targets

use crate::{Error, Result, pipeline::episode::Trajectory};

/// Terms in the truncated λ-return: the immediate reward plus up to nine
/// lookahead rewards.
pub const MAX_RETURN_TERMS: usize = 10;

/// Backward TD(λ) targets for a finished episode.
///
/// Step `i` receives `(1-λ)·Σ_k λ^k·r[i+k]` for `k` in `0..min(10, n)`,
/// clipped at the end of the episode. Terms past the ninth lookahead are
/// dropped rather than summed to the horizon.
///
/// ```
/// use td2048::pipeline::td_lambda_targets;
///
/// let targets = td_lambda_targets(&[1.0, 0.0, 0.0, 0.0], 0.5);
/// assert_eq!(targets, vec![0.5, 0.0, 0.0, 0.0]);
/// ```
pub fn td_lambda_targets(rewards: &[f64], lambda: f64) -> Vec<f64> {
    let n = rewards.len();
    let mut targets: Vec<f64> = rewards.iter().map(|r| r * (1.0 - lambda)).collect();

    for k in 1..n.min(MAX_RETURN_TERMS) {
        let weight = (1.0 - lambda) * lambda.powf(k as f64);
        for i in 0..n - k {
            targets[i] += rewards[i + k] * weight;
        }
    }

    targets
}

/// Computes return targets for trajectories with a fixed λ
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnEstimator {
    lambda: f64,
}

impl ReturnEstimator {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] unless `0 <= lambda < 1`.
    pub fn new(lambda: f64) -> Result<Self> {
        if !(0.0..1.0).contains(&lambda) {
            return Err(Error::InvalidConfiguration {
                message: format!("lambda must be in [0, 1), got {lambda}"),
            });
        }
        Ok(Self { lambda })
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// One target per trajectory step, in step order
    pub fn targets(&self, trajectory: &Trajectory) -> Vec<f64> {
        td_lambda_targets(&trajectory.rewards(), self.lambda)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!((a - e).abs() < 1e-12, "target[{i}] = {a}, expected {e}");
        }
    }

    #[test]
    fn test_single_leading_reward() {
        let targets = td_lambda_targets(&[1.0, 0.0, 0.0, 0.0], 0.5);
        assert_eq!(targets[0], 0.5);
        assert_eq!(targets[3], 0.0);
        assert_close(&targets, &[0.5, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_late_reward_flows_backwards() {
        // w_k = 0.5 * 0.5^k
        let targets = td_lambda_targets(&[0.0, 0.0, 0.0, 1.0], 0.5);
        assert_close(&targets, &[0.0625, 0.125, 0.25, 0.5]);
    }

    #[test]
    fn test_empty_and_single_step() {
        assert!(td_lambda_targets(&[], 0.9).is_empty());
        assert_close(&td_lambda_targets(&[8.0], 0.75), &[2.0]);
    }

    #[test]
    fn test_lambda_zero_is_immediate_reward() {
        let rewards = [3.0, 0.0, 4.0, 8.0];
        assert_close(&td_lambda_targets(&rewards, 0.0), &rewards);
    }

    #[test]
    fn test_truncates_after_nine_lookahead_terms() {
        let mut rewards = vec![0.0; 15];
        rewards[9] = 1.0;
        rewards[10] = 1.0;
        let lambda: f64 = 0.9;

        let targets = td_lambda_targets(&rewards, lambda);
        // Step 0 sees r[9] at k=9 but not r[10] at k=10.
        let expected = (1.0 - lambda) * lambda.powi(9);
        assert!((targets[0] - expected).abs() < 1e-12);
        // Step 1 sees both at k=8 and k=9.
        let expected = (1.0 - lambda) * (lambda.powi(8) + lambda.powi(9));
        assert!((targets[1] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_constant_rewards_short_episode() {
        // Three unit rewards with λ=0.9: w0=0.1, w1=0.09, w2=0.081.
        let targets = td_lambda_targets(&[1.0, 1.0, 1.0], 0.9);
        assert_close(&targets, &[0.271, 0.19, 0.1]);
    }

    #[test]
    fn test_estimator_validates_lambda() {
        assert!(ReturnEstimator::new(1.0).is_err());
        assert!(ReturnEstimator::new(-0.2).is_err());
        assert_eq!(ReturnEstimator::new(0.9).unwrap().lambda(), 0.9);
    }
}
