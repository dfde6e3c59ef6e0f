use crate::graph::HistoryGraph;
use crate::node::NodeId;

/// The minimal undo-then-redo sequence between two nodes in the tree.
///
/// Produced by [`HistoryGraph::path_between`]: undo up to the lowest common
/// ancestor, select the correct branch at every multi-branch node on the way
/// down, then redo to the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoPlan {
    /// Steps from the start node up to the lowest common ancestor.
    pub undo_steps: usize,
    /// `(node, child)` pairs to pass to [`HistoryGraph::set_branch`], ordered
    /// from the ancestor down.
    pub switches: Vec<(NodeId, NodeId)>,
    /// Steps from the lowest common ancestor down to the target node.
    pub redo_steps: usize,
}

impl HistoryGraph {
    /// Plans the minimal cursor movement from `from` to `to`.
    ///
    /// The lowest common ancestor is found by intersecting the two nodes'
    /// ancestor chains from the root downward; the chains agree on a prefix
    /// (at least the root) and the last shared node is the LCA. The plan
    /// includes a branch switch for every node with more than one child on
    /// the LCA→`to` path, so executing it never undoes or redoes more steps
    /// than necessary.
    ///
    /// Returns `None` (with a report) if either node is not in this graph.
    pub fn path_between(&self, from: NodeId, to: NodeId) -> Option<UndoPlan> {
        if self.get(from).is_none() || self.get(to).is_none() {
            tracing::warn!(?from, ?to, "path_between with a node that is not in this graph");
            return None;
        }

        let mut up = self.ancestors(from).collect::<Vec<_>>();
        let mut down = self.ancestors(to).collect::<Vec<_>>();
        up.reverse();
        down.reverse();

        let shared = up.iter().zip(&down).take_while(|(a, b)| a == b).count();
        debug_assert!(shared > 0, "every node shares the sentinel root");
        let lca = up[shared - 1];

        let mut switches = Vec::new();
        for pair in down[shared - 1..].windows(2) {
            let (node, child) = (pair[0], pair[1]);
            if self.node(node).branches().len() > 1 {
                switches.push((node, child));
            }
        }

        tracing::trace!(
            ?from,
            ?to,
            ?lca,
            undo_steps = up.len() - shared,
            redo_steps = down.len() - shared,
            "planned path between history nodes"
        );

        Some(UndoPlan {
            undo_steps: up.len() - shared,
            switches,
            redo_steps: down.len() - shared,
        })
    }

    /// Executes a plan produced by [`path_between`](Self::path_between):
    /// undo, switch branches, redo.
    ///
    /// A failed branch switch is reported and the remaining steps still run,
    /// so the cursor ends up wherever the surviving switches lead; returns
    /// whether every step succeeded.
    pub fn execute(&mut self, plan: &UndoPlan) -> bool {
        let mut ok = true;
        if plan.undo_steps > 0 {
            ok &= self.undo(plan.undo_steps) == plan.undo_steps;
        }
        for &(node, child) in &plan.switches {
            ok &= self.set_branch(node, child);
        }
        if plan.redo_steps > 0 {
            ok &= self.redo(plan.redo_steps) == plan.redo_steps;
        }
        ok
    }

    /// Moves the cursor directly to `target`, the GUI's "jump to revision".
    ///
    /// Returns `false` (with a report) if `target` is not in this graph.
    pub fn jump_to(&mut self, target: NodeId) -> bool {
        if target == self.current() {
            return true;
        }
        match self.path_between(self.current(), target) {
            Some(plan) => {
                let ok = self.execute(&plan);
                debug_assert!(!ok || self.current() == target);
                ok
            }
            None => false,
        }
    }
}
