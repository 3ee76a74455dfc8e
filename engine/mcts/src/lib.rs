//! Monte Carlo Tree Search over an abstract game-rules contract.
//!
//! This crate provides a game-agnostic decision engine for two-player,
//! turn-based, perfect-information games. It works with any rule set
//! implementing the `rules-core` `Ruleset` trait and never inspects game
//! content beyond it.
//!
//! # Overview
//!
//! Each `decide` call runs a fixed budget of search iterations, where one
//! iteration is:
//!
//! 1. **Selection**: descend from the root by UCB1 until hitting an
//!    unexplored frontier, a terminal state or the depth cap
//! 2. **Expansion**: materialize exactly one unexplored move as a new child
//! 3. **Simulation**: play uniformly random rollouts from the new child to
//!    a terminal state or the depth cap
//! 4. **Backpropagation**: fold each rollout outcome back up the path,
//!    flipping the win flag whenever the acting player changes
//!
//! The move the search settles on is then *committed*: its subtree becomes
//! the new root and rejected siblings are pruned, so the statistics behind
//! the chosen line carry over into the next `decide` call (tree reuse).
//!
//! Terminal states won by their own acting player short-circuit the
//! statistics entirely: the proven line is marked with forced-outcome flags
//! that dominate UCB1 in both directions.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mcts::{MctsAgent, MctsConfig};
//!
//! let config = MctsConfig::default().with_decision_budget(400);
//! let mut agent = MctsAgent::new(my_ruleset, config);
//!
//! match agent.decide(&state, my_player).as_slice() {
//!     [] => { /* tree is mid-opponent-turn: play on and retry */ }
//!     [mv, ..] => play(mv),
//! }
//! ```
//!
//! An empty result is not an error: it means the retained tree was still
//! positioned before the other player's move, and the agent advanced past
//! it instead of deciding. Call `decide` again once it is your turn.
//!
//! # Concurrency
//!
//! A `decide` call is strictly sequential and runs to completion; there is
//! no internal parallelism, cancellation or timeout. The agent can be moved
//! onto a worker thread wholesale, but a tree must never be searched by two
//! callers at once.

pub mod agent;
pub mod config;
pub mod node;
pub mod tree;

// Re-export main types
pub use agent::MctsAgent;
pub use config::MctsConfig;
pub use node::{NodeId, Proof, SearchNode};
pub use tree::{SearchTree, TreeStats};
