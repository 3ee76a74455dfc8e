//! The game-rules contract consumed by the search engine.

use thiserror::Error;

use crate::moves::Move;

/// Index of a player in a two-player game (0 or 1).
pub type PlayerIndex = u8;

/// Errors a ruleset can report while resolving a move.
#[derive(Debug, Error)]
pub enum RulesError {
    /// The transition resolved to a state the ruleset considers unusable
    /// (e.g. participants went missing during effect resolution). The search
    /// treats this as a skipped expansion or a lost rollout, never as fatal.
    #[error("transition produced an invalid state: {0}")]
    InvalidTransition(String),

    /// The move is not legal in the given state.
    #[error("illegal move {0}")]
    IllegalMove(String),
}

/// Accessor the engine needs on every game state: whose turn it is.
///
/// A node's win statistics are measured from the perspective of its state's
/// acting player, so this is the one piece of game content the search reads.
pub trait TurnState {
    fn acting_player(&self) -> PlayerIndex;
}

/// The rules contract: four pure operations over an opaque state type.
///
/// States are immutable values — `apply` returns a new state and never
/// mutates its input. Implementations may resolve contract-defined
/// randomness inside `apply` (environmental triggers, random targeters);
/// from the engine's perspective the transition is just a function of
/// `(state, move)`.
pub trait Ruleset: Send + Sync {
    type State: TurnState + Clone + Send;

    /// Resolve `mv` against `state`, producing the successor state.
    fn apply(&self, state: &Self::State, mv: &Move) -> Result<Self::State, RulesError>;

    /// All legal moves for the acting player, including the zero-cost
    /// end-turn move. Enumeration order is meaningful: the engine breaks
    /// ties and picks expansion candidates in this order.
    fn enumerate_moves(&self, state: &Self::State) -> Vec<Move>;

    /// Whether the game is over in `state`.
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Whether `player` is judged the winner of a terminal (or depth-capped)
    /// state.
    fn evaluate_terminal(&self, state: &Self::State, player: PlayerIndex) -> bool;
}
