//! Search configuration parameters.

use serde::{Deserialize, Serialize};

/// Configuration for a search agent. Fixed at agent construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// Search iterations (select/expand/simulate/backpropagate) per
    /// `decide` call. The only latency budget there is: the loop always
    /// runs to completion.
    pub decision_budget: u32,

    /// Independent random rollouts per expansion, each backpropagated
    /// separately.
    pub playout_budget: u32,

    /// Ply cap shared by selection descent and rollouts. A rollout reaching
    /// the cap is judged as if the capped state were terminal.
    pub max_simulation_depth: u32,

    /// Stop selection at the first node with unexplored moves (the standard
    /// policy). Disabling this lets selection keep descending through
    /// partially expanded nodes.
    pub stop_on_unexplored: bool,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            decision_budget: 200,
            playout_budget: 10,
            max_simulation_depth: 150,
            stop_on_unexplored: true,
        }
    }
}

impl MctsConfig {
    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            decision_budget: 10,
            playout_budget: 5,
            max_simulation_depth: 5,
            stop_on_unexplored: true,
        }
    }

    /// Builder pattern: set the per-decision iteration budget.
    pub fn with_decision_budget(mut self, n: u32) -> Self {
        self.decision_budget = n;
        self
    }

    /// Builder pattern: set the rollout count per expansion.
    pub fn with_playout_budget(mut self, n: u32) -> Self {
        self.playout_budget = n;
        self
    }

    /// Builder pattern: set the simulation depth cap.
    pub fn with_max_simulation_depth(mut self, depth: u32) -> Self {
        self.max_simulation_depth = depth;
        self
    }

    /// Builder pattern: set whether selection stops at unexplored frontiers.
    pub fn with_stop_on_unexplored(mut self, stop: bool) -> Self {
        self.stop_on_unexplored = stop;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.decision_budget, 200);
        assert_eq!(config.playout_budget, 10);
        assert_eq!(config.max_simulation_depth, 150);
        assert!(config.stop_on_unexplored);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_decision_budget(50)
            .with_playout_budget(2)
            .with_max_simulation_depth(20);

        assert_eq!(config.decision_budget, 50);
        assert_eq!(config.playout_budget, 2);
        assert_eq!(config.max_simulation_depth, 20);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: MctsConfig = serde_json::from_str("{\"decision_budget\": 32}").unwrap();
        assert_eq!(config.decision_budget, 32);
        assert_eq!(config.playout_budget, 10);
    }
}
