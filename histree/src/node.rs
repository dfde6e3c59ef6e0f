use std::fmt;

use crate::action::{Action, ActionGroup};

slotmap::new_key_type! {
    /// Handle to a node in a [`HistoryGraph`](crate::HistoryGraph)'s arena.
    pub struct NodeId;
}

/// What a history node records.
pub(crate) enum Entry {
    /// The sentinel representing "before any action". Never undoable.
    Root,
    Single(Box<dyn Action>),
    Group(ActionGroup),
}

impl Entry {
    pub(crate) fn undo(&mut self) {
        match self {
            Entry::Root => unreachable!("the sentinel root is never undone"),
            Entry::Single(action) => action.undo(),
            Entry::Group(group) => group.undo(),
        }
    }

    pub(crate) fn redo(&mut self) {
        match self {
            Entry::Root => unreachable!("the sentinel root is never redone"),
            Entry::Single(action) => action.redo(),
            Entry::Group(group) => group.redo(),
        }
    }
}

/// One recorded, reversible step in the document's edit history.
///
/// Nodes form a tree: each node remembers its parent, its ordered child
/// branches (insertion order, which is creation order), and which child is
/// the active branch that a redo will follow. Branches only ever grow.
pub struct HistoryNode {
    pub(crate) entry: Entry,
    pub(crate) parent: Option<NodeId>,
    pub(crate) branches: Vec<NodeId>,
    /// Index into `branches` selecting the default-next child.
    /// Meaningless while `branches` is empty.
    pub(crate) active: usize,
}

impl HistoryNode {
    pub(crate) fn root() -> Self {
        Self { entry: Entry::Root, parent: None, branches: Vec::new(), active: 0 }
    }

    pub(crate) fn new(entry: Entry, parent: NodeId) -> Self {
        Self { entry, parent: Some(parent), branches: Vec::new(), active: 0 }
    }

    pub fn name(&self) -> &str {
        match &self.entry {
            Entry::Root => "<start>",
            Entry::Single(action) => action.name(),
            Entry::Group(group) => group.name(),
        }
    }

    pub fn description(&self) -> &str {
        match &self.entry {
            Entry::Root => "",
            Entry::Single(action) => action.description(),
            Entry::Group(group) => group.description(),
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self.entry, Entry::Root)
    }

    /// Whether the recorded action is currently undone. Always `false` for
    /// the sentinel root.
    pub fn is_undone(&self) -> bool {
        match &self.entry {
            Entry::Root => false,
            Entry::Single(action) => action.is_undone(),
            Entry::Group(group) => group.is_undone(),
        }
    }

    /// The transactional group recorded at this node, if it is one.
    pub fn group(&self) -> Option<&ActionGroup> {
        match &self.entry {
            Entry::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn branches(&self) -> &[NodeId] {
        &self.branches
    }

    /// The child a redo from this node will move into.
    pub fn active_branch(&self) -> Option<NodeId> {
        self.branches.get(self.active).copied()
    }

    /// Index of the active branch within [`branches`](Self::branches).
    pub fn active_index(&self) -> usize {
        self.active
    }
}

impl fmt::Debug for HistoryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryNode")
            .field("name", &self.name())
            .field("undone", &self.is_undone())
            .field("parent", &self.parent)
            .field("branches", &self.branches)
            .field("active", &self.active)
            .finish()
    }
}
