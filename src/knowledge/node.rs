//! Per-state action values

use std::fmt;

use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::types::{ACTION_COUNT, Action};

/// What the agent knows about acting from one board state.
///
/// Holds a running return estimate and an update count for each of the four
/// moves. Estimates start at 0.0 and only move through [`update`](Self::update).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionValueNode {
    action_quality: [f64; ACTION_COUNT],
    action_count: [u64; ACTION_COUNT],
}

impl ActionValueNode {
    /// Create a node with all estimates at 0.0 and no visits
    pub fn new() -> Self {
        Self::default()
    }

    /// Current return estimate for `action`
    pub fn get_estimate(&self, action: Action) -> f64 {
        self.action_quality[action.index()]
    }

    /// Fold an observed return into the estimate for `action`.
    ///
    /// Q(a) ← Q(a) + α(G - Q(a))
    ///
    /// With a constant α this weights recent returns more heavily than a true
    /// arithmetic mean would.
    pub fn update(&mut self, action: Action, observed_return: f64, alpha: f64) {
        let slot = action.index();
        self.action_count[slot] += 1;
        self.action_quality[slot] += (observed_return - self.action_quality[slot]) * alpha;
    }

    /// Total number of updates across all actions
    pub fn visit_count(&self) -> u64 {
        self.action_count.iter().sum()
    }

    /// Number of updates applied to `action`
    pub fn count(&self, action: Action) -> u64 {
        self.action_count[action.index()]
    }

    pub fn qualities(&self) -> &[f64; ACTION_COUNT] {
        &self.action_quality
    }

    pub fn counts(&self) -> &[u64; ACTION_COUNT] {
        &self.action_count
    }

    /// Action with the highest estimate.
    ///
    /// Ties are broken uniformly at random among every maximal action.
    pub fn best_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Action {
        let max_quality = self
            .action_quality
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);

        let mut joint_best: Vec<Action> = Action::ALL
            .into_iter()
            .filter(|action| self.action_quality[action.index()] == max_quality)
            .collect();

        // NaN qualities leave nothing equal to the max; fall back to any move.
        if joint_best.is_empty() {
            joint_best.extend(Action::ALL);
        }

        joint_best.choose(rng).copied().unwrap_or(Action::Up)
    }
}

impl fmt::Display for ActionValueNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Visited {} times. I know (action:count:score)",
            self.visit_count()
        )?;
        for action in Action::ALL {
            let slot = action.index();
            write!(
                f,
                " {}:{}:{:.1}",
                slot, self.action_count[slot], self.action_quality[slot]
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_new_node_is_neutral() {
        let node = ActionValueNode::new();
        for action in Action::ALL {
            assert_eq!(node.get_estimate(action), 0.0);
            assert_eq!(node.count(action), 0);
        }
        assert_eq!(node.visit_count(), 0);
    }

    #[test]
    fn test_update_counts_once_per_call() {
        let mut node = ActionValueNode::new();
        node.update(Action::Left, 4.0, 0.1);
        node.update(Action::Left, 4.0, 0.1);
        node.update(Action::Up, 2.0, 0.1);

        assert_eq!(node.count(Action::Left), 2);
        assert_eq!(node.count(Action::Up), 1);
        assert_eq!(node.count(Action::Down), 0);
        assert_eq!(node.visit_count(), 3);
    }

    #[test]
    fn test_alpha_one_jumps_to_target() {
        let mut node = ActionValueNode::new();
        node.update(Action::Down, 7.5, 1.0);
        assert_eq!(node.get_estimate(Action::Down), 7.5);
    }

    #[test]
    fn test_constant_target_converges_geometrically() {
        let mut node = ActionValueNode::new();
        let target = 10.0;
        let alpha = 0.25;

        let mut previous_gap = target;
        for step in 1..=50 {
            node.update(Action::Right, target, alpha);
            let gap = target - node.get_estimate(Action::Right);
            // Gap shrinks by (1 - α) every step.
            let expected = target * (1.0_f64 - alpha).powi(step);
            assert!((gap - expected).abs() < 1e-9);
            assert!(gap < previous_gap);
            previous_gap = gap;
        }
        assert!(previous_gap < 1e-5);
    }

    #[test]
    fn test_best_action_picks_unique_max() {
        let mut node = ActionValueNode::new();
        node.update(Action::Down, 3.0, 1.0);
        node.update(Action::Left, 1.0, 1.0);

        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            assert_eq!(node.best_action(&mut rng), Action::Down);
        }
    }

    #[test]
    fn test_best_action_ignores_lower_entries_in_tie() {
        let mut node = ActionValueNode::new();
        node.update(Action::Up, 2.0, 1.0);
        node.update(Action::Left, 2.0, 1.0);
        node.update(Action::Right, -1.0, 1.0);
        node.update(Action::Down, -1.0, 1.0);

        let mut rng = StdRng::seed_from_u64(9);
        let mut seen_up = false;
        let mut seen_left = false;
        for _ in 0..200 {
            match node.best_action(&mut rng) {
                Action::Up => seen_up = true,
                Action::Left => seen_left = true,
                other => panic!("picked non-maximal action {other}"),
            }
        }
        assert!(seen_up && seen_left);
    }

    #[test]
    fn test_display_lists_every_action() {
        let mut node = ActionValueNode::new();
        node.update(Action::Right, 2.0, 0.5);
        assert_eq!(
            node.to_string(),
            "Visited 1 times. I know (action:count:score) 0:0:0.0 1:1:1.0 2:0:0.0 3:0:0.0"
        );
    }
}
