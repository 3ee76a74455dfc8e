//! Action descriptors and their canonical signatures.
//!
//! A `Move` is what a ruleset enumerates and applies; a `MoveSignature` is
//! the order-sensitive identity the search tree keys its edges by. Two moves
//! with identical player, cost, kind and target list (in the same order) are
//! the same edge; a randomized targeter that resolves to a different target
//! list produces a distinct edge even for the same move kind.

use std::fmt;

use crate::ruleset::PlayerIndex;

/// A grid coordinate a move targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// One resolved targeting entry of a move: which selector produced it and
/// the cell it landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveTarget {
    /// Index of the targeting selector that produced this entry.
    pub selector: u8,
    /// The targeted cell.
    pub cell: Cell,
}

impl MoveTarget {
    pub const fn new(selector: u8, cell: Cell) -> Self {
        Self { selector, cell }
    }
}

/// An action descriptor.
///
/// `kind` indexes into the acting player's moveset; the pass move uses the
/// reserved kind `-1`. The `idle` flag marks zero-cost end-turn moves
/// explicitly so consumers never have to infer idleness from the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    /// Player this move belongs to.
    pub player: PlayerIndex,
    /// Action-point cost of the move.
    pub cost: i32,
    /// Move-kind index within the player's moveset.
    pub kind: i32,
    /// Resolved targets, in selector order.
    pub targets: Vec<MoveTarget>,
    /// Whether this is a no-op "end turn" move.
    pub idle: bool,
}

impl Move {
    /// Create a regular (non-idle) move.
    pub fn new(player: PlayerIndex, kind: i32, cost: i32, targets: Vec<MoveTarget>) -> Self {
        Self {
            player,
            cost,
            kind,
            targets,
            idle: false,
        }
    }

    /// The default zero-cost end-turn move for a player.
    pub fn pass(player: PlayerIndex) -> Self {
        Self {
            player,
            cost: 0,
            kind: -1,
            targets: Vec::new(),
            idle: true,
        }
    }

    /// Derive the canonical signature identifying this move as a tree edge.
    pub fn signature(&self) -> MoveSignature {
        MoveSignature {
            player: self.player,
            cost: self.cost,
            kind: self.kind,
            cells: self.targets.iter().map(|t| t.cell).collect(),
            idle: self.idle,
        }
    }
}

/// Canonical, order-sensitive identity of a move.
///
/// Equal signatures denote the same edge in the search tree even when the
/// moves were produced by different enumeration calls. This is identity for
/// tree bookkeeping only, not game-semantic equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MoveSignature {
    player: PlayerIndex,
    cost: i32,
    kind: i32,
    cells: Vec<Cell>,
    idle: bool,
}

impl MoveSignature {
    /// Whether the underlying move was a no-op "end turn" move.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.idle
    }

    /// The player the underlying move belongs to.
    #[inline]
    pub fn player(&self) -> PlayerIndex {
        self.player
    }
}

impl fmt::Display for MoveSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}-({})-#{}:", self.player, self.cost, self.kind)?;
        for cell in &self.cells {
            write!(f, "{cell}")?;
        }
        Ok(())
    }
}
