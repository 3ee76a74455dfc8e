//! Search tree with arena allocation.
//!
//! Nodes live in a slab arena and are referenced by `NodeId` handles:
//! children are owning handles into the arena, the parent link is a plain
//! back-reference, so upward traversal is cheap and there is no ownership
//! cycle to manage. Pruning frees whole subtrees through an explicit
//! worklist rather than recursive destruction, and freed slots are reused
//! by later expansions.

use rules_core::{MoveSignature, TurnState};

use crate::node::{NodeId, Proof, SearchNode};

/// Arena-backed search tree rooted at the current decision point.
#[derive(Debug)]
pub struct SearchTree<S> {
    /// Node slots; `None` marks a freed slot awaiting reuse.
    nodes: Vec<Option<SearchNode<S>>>,

    /// Freed slot indices available for reuse.
    free: Vec<u32>,

    /// Current root node.
    root: NodeId,

    /// Number of live nodes.
    live: usize,
}

impl<S> SearchTree<S> {
    /// Create a new tree with the given root state.
    pub fn new(root_state: S) -> Self {
        Self {
            nodes: vec![Some(SearchNode::new_root(root_state))],
            free: Vec::new(),
            root: NodeId(0),
            live: 1,
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    ///
    /// Panics on a stale or out-of-range handle; handles held across
    /// `release`/`advance_root` are a bug in the caller.
    #[inline]
    pub fn get(&self, id: NodeId) -> &SearchNode<S> {
        self.nodes[id.0 as usize]
            .as_ref()
            .expect("stale node handle")
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode<S> {
        self.nodes[id.0 as usize]
            .as_mut()
            .expect("stale node handle")
    }

    /// Number of live nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Whether a handle refers to a live node.
    #[inline]
    pub fn is_live(&self, id: NodeId) -> bool {
        (id.0 as usize) < self.nodes.len() && self.nodes[id.0 as usize].is_some()
    }

    /// Allocate a node, reusing a freed slot when one is available.
    fn allocate(&mut self, node: SearchNode<S>) -> NodeId {
        self.live += 1;
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot as usize] = Some(node);
                NodeId(slot)
            }
            None => {
                let id = NodeId(self.nodes.len() as u32);
                self.nodes.push(Some(node));
                id
            }
        }
    }

    /// Free a single slot, leaving its subtree untouched.
    fn free_slot(&mut self, id: NodeId) -> SearchNode<S> {
        let node = self.nodes[id.0 as usize]
            .take()
            .expect("stale node handle");
        self.free.push(id.0);
        self.live -= 1;
        node
    }

    /// Add a child under `parent` for the edge `sig`.
    /// Returns the new child's ID.
    pub fn add_child(&mut self, parent: NodeId, sig: MoveSignature, state: S) -> NodeId {
        debug_assert!(
            self.get(parent).child(&sig).is_none(),
            "duplicate edge {sig}"
        );

        let child_id = self.allocate(SearchNode::new_child(parent, state));
        self.get_mut(parent).children.push((sig, child_id));
        child_id
    }

    /// Free a node and its entire subtree.
    ///
    /// Worklist-based so deep trees cannot overflow the stack. The node must
    /// not still be referenced from a live parent; callers detach the edge
    /// first.
    pub fn release(&mut self, id: NodeId) {
        let mut worklist = vec![id];
        while let Some(current) = worklist.pop() {
            let node = self.free_slot(current);
            worklist.extend(node.children.iter().map(|(_, child)| *child));
        }
    }

    /// Promote the child reached by `sig` to be the new root, discarding the
    /// old root and every sibling subtree.
    ///
    /// Statistics gathered for the retained line survive, which is what lets
    /// successive decisions reuse each other's work while memory stays
    /// bounded to the committed path plus its unexplored frontier. Returns
    /// false (tree unchanged) when no child exists for the move.
    pub fn advance_root(&mut self, sig: &MoveSignature) -> bool {
        let Some(chosen) = self.get(self.root).child(sig) else {
            return false;
        };

        let old_root = self.free_slot(self.root);
        for (edge, child) in old_root.children {
            if edge != *sig {
                self.release(child);
            }
        }

        self.root = chosen;
        self.get_mut(chosen).parent = NodeId::NONE;
        true
    }
}

impl<S: TurnState> SearchTree<S> {
    /// Backpropagate a rollout outcome from `leaf` up to the root.
    ///
    /// `win` is measured from the perspective of the leaf's acting player
    /// and flips whenever the acting player changes between child and
    /// parent. Visit counts are selection-time bookkeeping and are not
    /// touched here.
    pub fn backpropagate(&mut self, leaf: NodeId, win: bool) {
        let mut current = leaf;
        let mut win = win;

        loop {
            let node = self.get_mut(current);
            if win {
                node.wins += 1;
            }
            let parent = node.parent;
            if parent.is_none() {
                break;
            }

            let actor = self.get(current).state.acting_player();
            if self.get(parent).state.acting_player() != actor {
                win = !win;
            }
            current = parent;
        }
    }

    /// Snapshot of tree health for logging and inspection.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            live_nodes: self.live,
            root_visits: root.visits,
            root_wins: root.wins,
            root_proof: root.proof,
        }
    }
}

/// Statistics about a search tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub live_nodes: usize,
    pub root_visits: u32,
    pub root_wins: u32,
    pub root_proof: Proof,
}
