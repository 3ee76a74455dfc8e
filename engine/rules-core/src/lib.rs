//! Core traits and types for the turn-based game-rules contract.
//!
//! This crate provides the seam between the search engine and any concrete
//! game:
//! - `Ruleset`: the four-method contract the engine calls (apply a move,
//!   enumerate legal moves, detect terminal states, judge a winner)
//! - `TurnState`: the one accessor the engine needs on a state (whose turn
//!   it is)
//! - `Move` / `MoveSignature`: action descriptors and their canonical
//!   identity, used to deduplicate edges in the search tree
//!
//! The engine never inspects game content beyond these types; production and
//! test rule sets are both just implementations of `Ruleset`.

pub mod moves;
pub mod ruleset;

// Re-export main types for convenience
pub use moves::{Cell, Move, MoveSignature, MoveTarget};
pub use ruleset::{PlayerIndex, RulesError, Ruleset, TurnState};
