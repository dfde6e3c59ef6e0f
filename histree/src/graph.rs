use slotmap::SlotMap;

use crate::action::{Action, ActionGroup};
use crate::event::{HandlerResult, HistoryEvent, Listeners};
use crate::node::{Entry, HistoryNode, NodeId};

/// Advisory default for [`HistoryGraph::max_items`].
const DEFAULT_MAX_ITEMS: usize = 100;

/// Marker for a group opened by [`HistoryGraph::start_group`].
///
/// Groups are closed in LIFO order by [`HistoryGraph::end_group`]; the handle
/// carries no authority, it only records the nesting depth at open time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupHandle {
    depth: usize,
}

impl GroupHandle {
    /// Nesting depth of the group, starting at 1 for the outermost.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// A branching undo/redo history for one editable document.
///
/// Unlike a linear undo stack, recording a new action after undoing does not
/// discard the undone future: the new node becomes a sibling branch, and the
/// old chain stays reachable via branch switching. The graph owns an arena of
/// [`HistoryNode`]s rooted at a permanent sentinel (the "before any action"
/// state) and tracks a cursor: the node whose action was most recently
/// applied.
///
/// One instance per document; construct it explicitly and hand it to the GUI
/// layer by reference. All operations are synchronous; expected misuse (undo
/// past the root, redo at a leaf, unbalanced `end_group`) is reported via
/// `tracing` and degrades to a no-op. Recording new actions from within an
/// in-flight undo/redo, or mutating the graph from an event listener, is a
/// caller precondition the graph does not enforce.
pub struct HistoryGraph {
    nodes: SlotMap<NodeId, HistoryNode>,
    root: NodeId,
    current: NodeId,
    open_groups: Vec<ActionGroup>,
    branch_mode: bool,
    max_items: usize,
    listeners: Listeners,
}

impl Default for HistoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryGraph {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(HistoryNode::root());
        Self {
            nodes,
            root,
            current: root,
            open_groups: Vec::new(),
            branch_mode: true,
            max_items: DEFAULT_MAX_ITEMS,
            listeners: Listeners::default(),
        }
    }

    /// Records an action that the caller has already applied.
    ///
    /// While a group is open the action is buffered into the innermost group
    /// and `None` is returned; the node for the whole group is created at
    /// [`end_group`](Self::end_group) time. Otherwise the action becomes a
    /// new child of the cursor node (and its active branch), the cursor
    /// advances to it, and its id is returned.
    pub fn add_action(&mut self, action: Box<dyn Action>) -> Option<NodeId> {
        let depth = self.open_groups.len();
        if let Some(group) = self.open_groups.last_mut() {
            tracing::trace!(name = action.name(), depth, "buffering action into open group");
            group.push(action);
            return None;
        }
        Some(self.record(Entry::Single(action)))
    }

    /// Opens a transactional group. Every action added until the matching
    /// [`end_group`](Self::end_group) is undone and redone as one step.
    pub fn start_group(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> GroupHandle {
        self.open_groups.push(ActionGroup::new(name, description));
        let depth = self.open_groups.len();
        tracing::trace!(depth, "opened action group");
        GroupHandle { depth }
    }

    /// Closes the innermost open group.
    ///
    /// An inner group is appended to its parent group as a single member; the
    /// outermost group is recorded into the tree exactly like
    /// [`add_action`](Self::add_action) and its node id is returned. Calling
    /// this with no open group is a reported no-op.
    pub fn end_group(&mut self) -> Option<NodeId> {
        let Some(group) = self.open_groups.pop() else {
            tracing::warn!("end_group called with no open group");
            return None;
        };
        let depth = self.open_groups.len();
        if let Some(parent) = self.open_groups.last_mut() {
            tracing::trace!(depth, "folded group into parent group");
            parent.push(Box::new(group));
            return None;
        }
        Some(self.record(Entry::Group(group)))
    }

    /// Undoes up to `count` steps, moving the cursor toward the root.
    ///
    /// Stops (with a report) at the sentinel root. Group members are undone
    /// in reverse insertion order. [`PreUndo`]/[`PostUndo`] wrap the whole
    /// batch; a call that cannot perform a single step emits no events at
    /// all. Returns the number of steps actually performed.
    ///
    /// [`PreUndo`]: HistoryEvent::PreUndo
    /// [`PostUndo`]: HistoryEvent::PostUndo
    pub fn undo(&mut self, count: usize) -> usize {
        if count == 0 {
            tracing::warn!("undo requested with a count of zero");
            return 0;
        }
        if self.current == self.root {
            tracing::warn!("nothing to undo: already at the start of history");
            return 0;
        }
        self.emit(HistoryEvent::PreUndo);
        let mut performed = 0;
        for _ in 0..count {
            if self.current == self.root {
                tracing::warn!("nothing to undo: already at the start of history");
                break;
            }
            let node = &mut self.nodes[self.current];
            node.entry.undo();
            let parent = node.parent.expect("non-root node has a parent");
            tracing::trace!(from = ?self.current, to = ?parent, "undo step");
            self.current = parent;
            performed += 1;
        }
        debug_assert!(self.check_invariants());
        self.emit(HistoryEvent::PostUndo);
        self.emit(HistoryEvent::Changed);
        performed
    }

    /// Redoes up to `count` steps, following each node's active branch.
    ///
    /// Stops (with a report) when the cursor has no forward branch. Group
    /// members are redone in forward insertion order. [`PreRedo`]/[`PostRedo`]
    /// wrap the whole batch; a call that cannot perform a single step emits
    /// no events at all. Returns the number of steps actually performed.
    ///
    /// [`PreRedo`]: HistoryEvent::PreRedo
    /// [`PostRedo`]: HistoryEvent::PostRedo
    pub fn redo(&mut self, count: usize) -> usize {
        if count == 0 {
            tracing::warn!("redo requested with a count of zero");
            return 0;
        }
        if self.nodes[self.current].active_branch().is_none() {
            tracing::warn!("nothing to redo: no forward branch from the current node");
            return 0;
        }
        self.emit(HistoryEvent::PreRedo);
        let mut performed = 0;
        for _ in 0..count {
            let Some(next) = self.nodes[self.current].active_branch() else {
                tracing::warn!("nothing to redo: no forward branch from the current node");
                break;
            };
            tracing::trace!(from = ?self.current, to = ?next, "redo step");
            self.current = next;
            self.nodes[next].entry.redo();
            performed += 1;
        }
        debug_assert!(self.check_invariants());
        self.emit(HistoryEvent::PostRedo);
        self.emit(HistoryEvent::Changed);
        performed
    }

    /// Cyclically selects the next branch among the cursor node's children.
    ///
    /// Only changes which child the next [`redo`](Self::redo) follows; the
    /// cursor does not move. Silent no-op with fewer than two branches;
    /// reported no-op in linear mode.
    pub fn next_branch(&mut self) {
        self.cycle_branch(1);
    }

    /// Cyclically selects the previous branch among the cursor node's
    /// children. See [`next_branch`](Self::next_branch).
    pub fn previous_branch(&mut self) {
        self.cycle_branch(-1);
    }

    fn cycle_branch(&mut self, offset: isize) {
        if !self.branch_mode {
            tracing::debug!("branch navigation ignored in linear mode");
            return;
        }
        let node = &mut self.nodes[self.current];
        let len = node.branches.len();
        if len < 2 {
            return;
        }
        node.active = (node.active as isize + offset).rem_euclid(len as isize) as usize;
        self.emit(HistoryEvent::Changed);
    }

    /// Points `node`'s active branch at `child`.
    ///
    /// Returns `false` (with a report) if `child` is not one of `node`'s
    /// children or `node` is not in this graph.
    pub fn set_branch(&mut self, node: NodeId, child: NodeId) -> bool {
        let Some(n) = self.nodes.get_mut(node) else {
            tracing::warn!(?node, "set_branch on a node that is not in this graph");
            return false;
        };
        match n.branches.iter().position(|&branch| branch == child) {
            Some(index) => {
                n.active = index;
                self.emit(HistoryEvent::Changed);
                true
            }
            None => {
                tracing::warn!(?node, ?child, "set_branch target is not a child of the node");
                false
            }
        }
    }

    /// Discards the whole tree and resets to a fresh sentinel root, with the
    /// cursor at the root. Open groups are dropped unrecorded.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = self.nodes.insert(HistoryNode::root());
        self.current = self.root;
        self.open_groups.clear();
        debug_assert!(self.check_invariants());
        self.emit(HistoryEvent::Cleared);
        self.emit(HistoryEvent::Changed);
    }

    /// The sibling branches at the cursor node, i.e. the candidate redo
    /// targets.
    pub fn branches(&self) -> &[NodeId] {
        self.nodes[self.current].branches()
    }

    /// Registers a listener for [`HistoryEvent`]s. Returning
    /// [`HandlerResult::Unsubscribe`] drops the listener after dispatch.
    pub fn subscribe(&mut self, handler: impl FnMut(&HistoryEvent) -> HandlerResult + 'static) {
        self.listeners.subscribe(handler);
    }

    pub fn branch_mode(&self) -> bool {
        self.branch_mode
    }

    /// Switches between branch-aware and linear navigation. This only affects
    /// branch cycling and row flattening, never the tree shape.
    pub fn set_branch_mode(&mut self, branch_mode: bool) {
        if self.branch_mode == branch_mode {
            return;
        }
        self.branch_mode = branch_mode;
        self.emit(HistoryEvent::BranchModeChanged { branch_mode });
        self.emit(HistoryEvent::Changed);
    }

    /// Advisory soft cap on the history length.
    ///
    /// Read/writable but deliberately not enforced: nodes are never pruned,
    /// so the tree grows for the document's lifetime.
    pub fn max_items(&self) -> usize {
        self.max_items
    }

    pub fn set_max_items(&mut self, max_items: usize) {
        self.max_items = max_items;
    }

    /// The sentinel root.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The cursor: the node whose action was most recently applied.
    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn is_current(&self, node: NodeId) -> bool {
        self.current == node
    }

    pub fn get(&self, node: NodeId) -> Option<&HistoryNode> {
        self.nodes.get(node)
    }

    pub fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node)?.parent()
    }

    pub fn children_of(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(node).map_or(&[], HistoryNode::branches)
    }

    /// The node a redo from `node` would move into.
    pub fn next_of(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node)?.active_branch()
    }

    /// Number of open transactional groups.
    pub fn open_group_depth(&self) -> usize {
        self.open_groups.len()
    }

    /// Walks from `node` up to (and including) the root.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(node), move |&n| self.nodes[n].parent)
    }

    /// Depth of `node` below the root. The root itself has depth 0.
    pub fn depth(&self, node: NodeId) -> usize {
        self.ancestors(node).count() - 1
    }

    pub(crate) fn node(&self, node: NodeId) -> &HistoryNode {
        &self.nodes[node]
    }

    pub(crate) fn emit(&mut self, event: HistoryEvent) {
        self.listeners.emit(&event);
    }

    fn record(&mut self, entry: Entry) -> NodeId {
        let parent = self.current;
        let node = self.nodes.insert(HistoryNode::new(entry, parent));
        let parent_node = &mut self.nodes[parent];
        parent_node.branches.push(node);
        parent_node.active = parent_node.branches.len() - 1;
        self.current = node;
        tracing::trace!(?node, ?parent, "recorded history node");
        debug_assert!(self.check_invariants());
        self.emit(HistoryEvent::ActionAdded { node });
        self.emit(HistoryEvent::Changed);
        node
    }

    pub(crate) fn check_invariants(&self) -> bool {
        self.nodes.contains_key(self.current)
            && self.nodes.iter().all(|(id, node)| {
                let parent_ok = match node.parent {
                    None => id == self.root,
                    Some(parent) => {
                        self.nodes[parent].branches.iter().filter(|&&b| b == id).count() == 1
                    }
                };
                let children_ok =
                    node.branches.iter().all(|&branch| self.nodes[branch].parent == Some(id));
                let active_ok = node.branches.is_empty() || node.active < node.branches.len();
                parent_ok && children_ok && active_ok
            })
    }
}
