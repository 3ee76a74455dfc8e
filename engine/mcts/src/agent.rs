//! The search agent: orchestration of the select/expand/simulate/
//! backpropagate loop and the commit protocol that carries the tree across
//! successive decisions.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, trace, warn};

use rules_core::{Move, PlayerIndex, Ruleset, TurnState};

use crate::config::MctsConfig;
use crate::node::{NodeId, Proof};
use crate::tree::SearchTree;

/// Selection score forced onto idle (end-turn) edges so the search never
/// stalls on pass-only branches. Low enough to lose to any scored sibling,
/// high enough to still be pickable when it is the only option.
const IDLE_SCORE: f64 = -0.5;

/// A decision-making agent for two-player, turn-based, perfect-information
/// games.
///
/// The agent owns its ruleset, its random source and the search tree. The
/// tree persists between `decide` calls: committing to a move promotes the
/// corresponding child to be the new root and discards rejected siblings,
/// so statistics accumulated for the followed line keep paying off.
///
/// A single `decide` call runs strictly sequentially; the agent may be moved
/// to a worker thread, but one tree must never be searched from two places
/// at once. Dropping the agent releases the entire retained tree.
pub struct MctsAgent<R: Ruleset> {
    ruleset: R,
    config: MctsConfig,
    tree: Option<SearchTree<R::State>>,
    rng: ChaCha20Rng,
}

impl<R: Ruleset> MctsAgent<R> {
    /// Create an agent with an entropy-seeded RNG.
    pub fn new(ruleset: R, config: MctsConfig) -> Self {
        Self {
            ruleset,
            config,
            tree: None,
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    /// Create an agent with a fixed seed for reproducible searches.
    pub fn with_seed(ruleset: R, config: MctsConfig, seed: u64) -> Self {
        Self {
            ruleset,
            config,
            tree: None,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// The agent's configuration.
    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// The current search tree, if a decision has been made yet.
    pub fn tree(&self) -> Option<&SearchTree<R::State>> {
        self.tree.as_ref()
    }

    /// Pick the next move(s) for `perspective` starting from `state`.
    ///
    /// Returns one committed move in the common case, a single default pass
    /// move when `state` is already terminal or nothing better was found,
    /// and an empty vector when the retained tree is still working through
    /// the other player's moves — the caller should call `decide` again
    /// once play has advanced.
    ///
    /// Only the first ply of the best line is ever committed per call;
    /// deeper look-ahead accumulates across calls through tree reuse.
    pub fn decide(&mut self, state: &R::State, perspective: PlayerIndex) -> Vec<Move> {
        if self.ruleset.is_terminal(state) {
            debug!(perspective, "asked to decide on a terminal state, passing");
            return vec![Move::pass(perspective)];
        }

        // The retained tree outranks the caller's state: when it exists, the
        // commit protocol is what advances it.
        let mut tree = match self.tree.take() {
            Some(tree) => tree,
            None => SearchTree::new(state.clone()),
        };

        for _ in 0..self.config.decision_budget {
            let selected = Self::select(&self.ruleset, &self.config, &mut tree);
            if let Some(expanded) = Self::expand(&self.ruleset, &mut tree, selected) {
                for _ in 0..self.config.playout_budget {
                    let win = Self::simulate(
                        &self.ruleset,
                        &self.config,
                        &tree,
                        expanded,
                        &mut self.rng,
                    );
                    tree.backpropagate(expanded, win);
                }
            }
        }

        let stats = tree.stats();
        trace!(
            nodes = stats.live_nodes,
            root_visits = stats.root_visits,
            root_wins = stats.root_wins,
            "search budget exhausted"
        );

        let root_actor = tree.get(tree.root()).state.acting_player();
        if root_actor != perspective {
            // The tree is paused before the other player's move. Commit
            // their best line one step and tell the caller to retry once
            // that move has been played out.
            debug!(
                perspective,
                root_actor, "root belongs to the other player, advancing past their move"
            );
            if let Some(opponent_move) = Self::best_move(&self.ruleset, &tree, tree.root()) {
                Self::commit(&mut tree, &opponent_move);
            }
            self.tree = Some(tree);
            return Vec::new();
        }

        let decision = match Self::best_move(&self.ruleset, &tree, tree.root()) {
            Some(mv) => mv,
            // Terminal-adjacent root with nothing explored: fall back to the
            // default pass move.
            None => Move::pass(perspective),
        };

        Self::commit(&mut tree, &decision);
        self.tree = Some(tree);
        vec![decision]
    }

    /// Descend from the root to the next node worth expanding, incrementing
    /// visit counts along the way.
    ///
    /// Descends while the depth cap is not hit, the state is not terminal
    /// and (under `stop_on_unexplored`) every legal move already has a
    /// child. Children are scored by UCB1; idle edges are deprioritized to
    /// a small negative constant; ties go to the first-scanned child.
    fn select(ruleset: &R, config: &MctsConfig, tree: &mut SearchTree<R::State>) -> NodeId {
        let mut current = tree.root();
        tree.get_mut(current).visits += 1;

        let mut depth = 0;
        while depth < config.max_simulation_depth {
            let node = tree.get(current);
            if ruleset.is_terminal(&node.state) {
                break;
            }
            if config.stop_on_unexplored
                && node.children.len() != ruleset.enumerate_moves(&node.state).len()
            {
                break;
            }

            let parent_visits = node.visits;
            let mut best: Option<NodeId> = None;
            let mut best_score = f64::NEG_INFINITY;
            for (sig, child_id) in &node.children {
                let mut score = tree.get(*child_id).ucb1(parent_visits);
                if sig.is_idle() {
                    score = IDLE_SCORE;
                }
                if score > best_score {
                    best_score = score;
                    best = Some(*child_id);
                }
            }

            match best {
                Some(child) => {
                    current = child;
                    tree.get_mut(current).visits += 1;
                    depth += 1;
                }
                None => break,
            }
        }

        // Terminal short-circuit: a terminal state won by its own actor is a
        // proven outcome for the whole line that forced it.
        let state = &tree.get(current).state;
        if ruleset.is_terminal(state) && ruleset.evaluate_terminal(state, state.acting_player()) {
            trace!("selection reached a terminal win, marking the line as forced");
            Self::mark_forced(tree, current);
        }

        current
    }

    /// Record a proven outcome along the line ending at `terminal`: the
    /// contiguous chain of ancestors sharing the winner's acting player is
    /// a forced win for that side, and the first ancestor where the
    /// opponent was to act is a forced loss for theirs.
    fn mark_forced(tree: &mut SearchTree<R::State>, terminal: NodeId) {
        let winner = tree.get(terminal).state.acting_player();
        let mut current = terminal;
        loop {
            let node = tree.get_mut(current);
            if node.state.acting_player() != winner {
                node.proof = Proof::ForcedLoss;
                break;
            }
            node.proof = Proof::ForcedWin;
            if node.parent.is_none() {
                break;
            }
            current = node.parent;
        }
    }

    /// Materialize one unexplored move of `node_id`: the first enumerated
    /// move without a child. Returns the new child, or `None` when the node
    /// is terminal, fully expanded, or the transition was rejected by the
    /// ruleset (the iteration is then abandoned without rollouts).
    fn expand(
        ruleset: &R,
        tree: &mut SearchTree<R::State>,
        node_id: NodeId,
    ) -> Option<NodeId> {
        if ruleset.is_terminal(&tree.get(node_id).state) {
            return None;
        }

        let moves = ruleset.enumerate_moves(&tree.get(node_id).state);
        for mv in moves {
            let sig = mv.signature();
            if tree.get(node_id).child(&sig).is_some() {
                continue;
            }

            return match ruleset.apply(&tree.get(node_id).state, &mv) {
                Ok(next_state) => Some(tree.add_child(node_id, sig, next_state)),
                Err(err) => {
                    warn!(%err, culprit = %sig, "expansion rejected, skipping iteration");
                    None
                }
            };
        }

        None
    }

    /// Play one uniformly random rollout from `node_id` to a terminal state
    /// or the depth cap, and judge the end position for its acting player.
    /// A transition rejected mid-rollout scores as a conservative loss.
    fn simulate(
        ruleset: &R,
        config: &MctsConfig,
        tree: &SearchTree<R::State>,
        node_id: NodeId,
        rng: &mut ChaCha20Rng,
    ) -> bool {
        let mut state = tree.get(node_id).state.clone();

        let mut depth = 0;
        while depth < config.max_simulation_depth && !ruleset.is_terminal(&state) {
            let moves = ruleset.enumerate_moves(&state);
            if moves.is_empty() {
                break;
            }

            let mv = &moves[rng.gen_range(0..moves.len())];
            state = match ruleset.apply(&state, mv) {
                Ok(next_state) => next_state,
                Err(err) => {
                    warn!(%err, culprit = %mv.signature(), "rollout rejected, scoring a loss");
                    return false;
                }
            };
            depth += 1;
        }

        ruleset.evaluate_terminal(&state, state.acting_player())
    }

    /// The best single move from `node_id`: among enumerated legal moves,
    /// the one whose child has the highest visit count, with proven wins
    /// outranking any count. Ties go to the first move in enumeration
    /// order; moves that never got a child are skipped. `None` when nothing
    /// below this node was ever explored.
    fn best_move(ruleset: &R, tree: &SearchTree<R::State>, node_id: NodeId) -> Option<Move> {
        let node = tree.get(node_id);
        if ruleset.is_terminal(&node.state) {
            return None;
        }

        let mut best: Option<Move> = None;
        let mut best_key: Option<(bool, u32)> = None;
        for mv in ruleset.enumerate_moves(&node.state) {
            let Some(child_id) = node.child(&mv.signature()) else {
                continue;
            };
            let child = tree.get(child_id);
            let key = (child.proof == Proof::ForcedWin, child.visits);
            if best_key.map_or(true, |current| key > current) {
                best_key = Some(key);
                best = Some(mv);
            }
        }

        if let (Some(mv), Some((forced, visits))) = (&best, best_key) {
            debug!(chosen = %mv.signature(), visits, forced, "extracted best move");
        }
        best
    }

    /// Commit to a move: promote its child to be the new root and discard
    /// rejected siblings. A move that never got expanded leaves the root
    /// unchanged.
    fn commit(tree: &mut SearchTree<R::State>, mv: &Move) {
        let sig = mv.signature();
        if tree.advance_root(&sig) {
            debug!(committed = %sig, nodes = tree.len(), "advanced root past committed move");
        } else {
            debug!(committed = %sig, "committed move has no expanded child, keeping root");
        }
    }
}
