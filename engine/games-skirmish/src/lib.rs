//! Skirmish: a grid-duel reference game for the search engine.
//!
//! This crate provides a complete, deliberately small implementation of the
//! `rules-core` contract, demonstrating every mechanic the engine cares
//! about: action-point costs, grid-targeted moves, multi-move turns and the
//! zero-cost end-turn move. Two fighters face off on a 3x3 grid; each turn
//! the acting player spends action points on advances, strikes and guards,
//! then ends the turn.
//!
//! The game is fully deterministic, which keeps search behavior
//! reproducible under a seeded agent.

use rules_core::{Cell, Move, MoveTarget, PlayerIndex, RulesError, Ruleset, TurnState};

/// Highest grid coordinate (the board spans `0..=GRID_MAX` on both axes).
pub const GRID_MAX: i32 = 2;
/// Starting and maximum hit points.
pub const START_HP: i32 = 10;
/// Action points granted at the start of each turn.
pub const AP_PER_TURN: i32 = 2;
/// Damage dealt by a strike.
pub const STRIKE_DAMAGE: i32 = 3;
/// Turn cap; at the cap the healthier fighter wins.
pub const MAX_TURNS: u32 = 30;

/// Move kind: step to an adjacent cell.
pub const KIND_ADVANCE: i32 = 0;
/// Move kind: hit an adjacent opponent.
pub const KIND_STRIKE: i32 = 1;
/// Move kind: recover one hit point.
pub const KIND_GUARD: i32 = 2;

/// Targeting selector: a chosen destination cell.
pub const SELECTOR_CELL: u8 = 0;
/// Targeting selector: the opponent's cell.
pub const SELECTOR_OPPONENT: u8 = 1;
/// Targeting selector: the caster's own cell.
pub const SELECTOR_SELF: u8 = 2;

/// Orthogonal step offsets, in enumeration order (north, east, south, west).
const STEPS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// One combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fighter {
    pub hp: i32,
    pub ap: i32,
    pub pos: Cell,
}

/// Complete game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct State {
    /// Completed end-turns so far.
    pub turn: u32,
    /// Player whose turn it is.
    pub acting: PlayerIndex,
    pub fighters: [Fighter; 2],
}

impl State {
    /// Create the initial state: both fighters at full health on opposite
    /// edges, player 0 to act.
    pub fn new() -> Self {
        Self {
            turn: 0,
            acting: 0,
            fighters: [
                Fighter {
                    hp: START_HP,
                    ap: AP_PER_TURN,
                    pos: Cell::new(0, 1),
                },
                Fighter {
                    hp: START_HP,
                    ap: AP_PER_TURN,
                    pos: Cell::new(GRID_MAX, 1),
                },
            ],
        }
    }

    fn actor(&self) -> &Fighter {
        &self.fighters[self.acting as usize]
    }

    fn opponent_index(&self) -> PlayerIndex {
        1 - self.acting
    }

    fn opponent(&self) -> &Fighter {
        &self.fighters[self.opponent_index() as usize]
    }

    /// Whether either fighter is down or the turn cap is reached.
    pub fn is_over(&self) -> bool {
        self.fighters.iter().any(|f| f.hp <= 0) || self.turn >= MAX_TURNS
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnState for State {
    fn acting_player(&self) -> PlayerIndex {
        self.acting
    }
}

fn in_bounds(cell: Cell) -> bool {
    (0..=GRID_MAX).contains(&cell.x) && (0..=GRID_MAX).contains(&cell.y)
}

fn adjacent(a: Cell, b: Cell) -> bool {
    (a.x - b.x).abs() + (a.y - b.y).abs() == 1
}

/// The skirmish rule set.
#[derive(Debug, Default)]
pub struct Skirmish;

impl Skirmish {
    pub fn new() -> Self {
        Self
    }
}

impl Ruleset for Skirmish {
    type State = State;

    fn apply(&self, state: &State, mv: &Move) -> Result<State, RulesError> {
        let illegal = || RulesError::IllegalMove(mv.signature().to_string());

        if self.is_terminal(state) || mv.player != state.acting {
            return Err(illegal());
        }

        let mut next = *state;

        if mv.idle {
            // End of turn: hand over and refill the incoming fighter's AP.
            next.acting = state.opponent_index();
            next.fighters[next.acting as usize].ap = AP_PER_TURN;
            next.turn += 1;
            return Ok(next);
        }

        if state.actor().ap < mv.cost {
            return Err(illegal());
        }

        match mv.kind {
            KIND_ADVANCE => {
                let dest = mv.targets.first().ok_or_else(|| illegal())?.cell;
                if !in_bounds(dest)
                    || !adjacent(state.actor().pos, dest)
                    || dest == state.opponent().pos
                {
                    return Err(illegal());
                }
                next.fighters[state.acting as usize].pos = dest;
            }
            KIND_STRIKE => {
                if !adjacent(state.actor().pos, state.opponent().pos) {
                    return Err(illegal());
                }
                next.fighters[state.opponent_index() as usize].hp -= STRIKE_DAMAGE;
            }
            KIND_GUARD => {
                if state.actor().hp >= START_HP {
                    return Err(illegal());
                }
                next.fighters[state.acting as usize].hp += 1;
            }
            _ => return Err(illegal()),
        }

        next.fighters[state.acting as usize].ap -= mv.cost;
        Ok(next)
    }

    fn enumerate_moves(&self, state: &State) -> Vec<Move> {
        if self.is_terminal(state) {
            return Vec::new();
        }

        let player = state.acting;
        let actor = state.actor();
        let mut moves = Vec::new();

        if actor.ap >= 1 {
            for (dx, dy) in STEPS {
                let dest = Cell::new(actor.pos.x + dx, actor.pos.y + dy);
                if in_bounds(dest) && dest != state.opponent().pos {
                    moves.push(Move::new(
                        player,
                        KIND_ADVANCE,
                        1,
                        vec![MoveTarget::new(SELECTOR_CELL, dest)],
                    ));
                }
            }

            if adjacent(actor.pos, state.opponent().pos) {
                moves.push(Move::new(
                    player,
                    KIND_STRIKE,
                    1,
                    vec![MoveTarget::new(SELECTOR_OPPONENT, state.opponent().pos)],
                ));
            }

            if actor.hp < START_HP {
                moves.push(Move::new(
                    player,
                    KIND_GUARD,
                    1,
                    vec![MoveTarget::new(SELECTOR_SELF, actor.pos)],
                ));
            }
        }

        // Ending the turn is always available.
        moves.push(Move::pass(player));
        moves
    }

    fn is_terminal(&self, state: &State) -> bool {
        state.is_over()
    }

    fn evaluate_terminal(&self, state: &State, player: PlayerIndex) -> bool {
        state.fighters[player as usize].hp > state.fighters[1 - player as usize].hp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> Skirmish {
        Skirmish::new()
    }

    /// Put both fighters side by side for melee scenarios.
    fn adjacent_state() -> State {
        let mut state = State::new();
        state.fighters[0].pos = Cell::new(1, 1);
        state.fighters[1].pos = Cell::new(2, 1);
        state
    }

    fn find_kind(moves: &[Move], kind: i32) -> Option<&Move> {
        moves.iter().find(|m| m.kind == kind && !m.idle)
    }

    #[test]
    fn test_opening_moves() {
        let state = State::new();
        let moves = rules().enumerate_moves(&state);

        // From (0,1): three in-bounds advances, no strike (not adjacent),
        // no guard (full health), plus the end-turn move.
        assert_eq!(moves.len(), 4);
        assert_eq!(moves.iter().filter(|m| m.kind == KIND_ADVANCE).count(), 3);
        assert!(find_kind(&moves, KIND_STRIKE).is_none());
        assert!(moves.last().unwrap().idle);
    }

    #[test]
    fn test_advance_moves_the_fighter_and_spends_ap() {
        let state = State::new();
        let moves = rules().enumerate_moves(&state);
        let advance = find_kind(&moves, KIND_ADVANCE).unwrap();

        let next = rules().apply(&state, advance).unwrap();

        assert_eq!(next.fighters[0].pos, advance.targets[0].cell);
        assert_eq!(next.fighters[0].ap, AP_PER_TURN - 1);
        assert_eq!(next.acting, 0); // still our turn
        assert_eq!(next.turn, 0);
    }

    #[test]
    fn test_strike_requires_adjacency() {
        let apart = State::new();
        assert!(find_kind(&rules().enumerate_moves(&apart), KIND_STRIKE).is_none());

        let close = adjacent_state();
        let moves = rules().enumerate_moves(&close);
        let strike = find_kind(&moves, KIND_STRIKE).unwrap();

        let next = rules().apply(&close, strike).unwrap();
        assert_eq!(next.fighters[1].hp, START_HP - STRIKE_DAMAGE);
        assert_eq!(next.fighters[0].ap, AP_PER_TURN - 1);
    }

    #[test]
    fn test_guard_heals_only_when_hurt() {
        let healthy = State::new();
        assert!(find_kind(&rules().enumerate_moves(&healthy), KIND_GUARD).is_none());

        let mut hurt = State::new();
        hurt.fighters[0].hp = 4;
        let moves = rules().enumerate_moves(&hurt);
        let guard = find_kind(&moves, KIND_GUARD).unwrap();

        let next = rules().apply(&hurt, guard).unwrap();
        assert_eq!(next.fighters[0].hp, 5);
    }

    #[test]
    fn test_exhausted_ap_leaves_only_the_end_turn() {
        let mut state = State::new();
        state.fighters[0].ap = 0;

        let moves = rules().enumerate_moves(&state);
        assert_eq!(moves.len(), 1);
        assert!(moves[0].idle);
    }

    #[test]
    fn test_end_turn_hands_over_and_refills() {
        let mut state = State::new();
        state.fighters[0].ap = 0;
        state.fighters[1].ap = 0;

        let next = rules().apply(&state, &Move::pass(0)).unwrap();

        assert_eq!(next.acting, 1);
        assert_eq!(next.fighters[1].ap, AP_PER_TURN);
        assert_eq!(next.fighters[0].ap, 0); // refill happens on turn start
        assert_eq!(next.turn, 1);
    }

    #[test]
    fn test_knockout_ends_the_game() {
        let mut state = adjacent_state();
        state.fighters[1].hp = STRIKE_DAMAGE; // one strike from down

        let moves = rules().enumerate_moves(&state);
        let strike = find_kind(&moves, KIND_STRIKE).unwrap();
        let next = rules().apply(&state, strike).unwrap();

        assert!(rules().is_terminal(&next));
        assert!(rules().evaluate_terminal(&next, 0));
        assert!(!rules().evaluate_terminal(&next, 1));
        assert!(rules().enumerate_moves(&next).is_empty());
    }

    #[test]
    fn test_turn_cap_decides_by_health() {
        let mut state = State::new();
        state.turn = MAX_TURNS;
        state.fighters[0].hp = 6;
        state.fighters[1].hp = 4;

        assert!(rules().is_terminal(&state));
        assert!(rules().evaluate_terminal(&state, 0));
        assert!(!rules().evaluate_terminal(&state, 1));
    }

    #[test]
    fn test_drawn_cap_is_a_win_for_neither() {
        let mut state = State::new();
        state.turn = MAX_TURNS;

        assert!(rules().is_terminal(&state));
        assert!(!rules().evaluate_terminal(&state, 0));
        assert!(!rules().evaluate_terminal(&state, 1));
    }

    #[test]
    fn test_cannot_advance_onto_the_opponent() {
        let state = adjacent_state();
        let onto_opponent = Move::new(
            0,
            KIND_ADVANCE,
            1,
            vec![MoveTarget::new(SELECTOR_CELL, state.fighters[1].pos)],
        );

        assert!(rules().apply(&state, &onto_opponent).is_err());
        // And it is never enumerated.
        let moves = rules().enumerate_moves(&state);
        assert!(moves
            .iter()
            .filter(|m| m.kind == KIND_ADVANCE)
            .all(|m| m.targets[0].cell != state.fighters[1].pos));
    }

    #[test]
    fn test_out_of_bounds_advance_is_rejected() {
        let state = State::new(); // fighter 0 at (0,1)
        let off_board = Move::new(
            0,
            KIND_ADVANCE,
            1,
            vec![MoveTarget::new(SELECTOR_CELL, Cell::new(-1, 1))],
        );

        assert!(rules().apply(&state, &off_board).is_err());
    }

    #[test]
    fn test_wrong_player_is_rejected() {
        let state = State::new(); // player 0 to act

        assert!(rules().apply(&state, &Move::pass(1)).is_err());
    }

    #[test]
    fn test_moves_on_a_terminal_state_are_rejected() {
        let mut state = State::new();
        state.fighters[1].hp = 0;

        assert!(rules().apply(&state, &Move::pass(0)).is_err());
        assert!(rules().enumerate_moves(&state).is_empty());
    }

    #[test]
    fn test_every_enumerated_move_applies_cleanly() {
        // Play a few plies, always applying the first enumerated move, and
        // verify the contract never rejects its own enumeration.
        let r = rules();
        let mut state = State::new();
        for _ in 0..20 {
            if r.is_terminal(&state) {
                break;
            }
            let moves = r.enumerate_moves(&state);
            state = r.apply(&state, &moves[0]).unwrap();
        }
    }
}
