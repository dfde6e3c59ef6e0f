use std::fmt;

use crate::node::NodeId;

/// Notification emitted by a mutating [`HistoryGraph`](crate::HistoryGraph)
/// operation.
///
/// Dispatch is synchronous and happens inside the triggering call, in the
/// order the operation specifies (the specific event first, [`Changed`]
/// last; the pre/post pairs wrap a whole undo or redo batch rather than each
/// step). Listeners must not re-enter the graph's mutating API.
///
/// [`Changed`]: HistoryEvent::Changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryEvent {
    /// A new node was recorded into the tree.
    ActionAdded { node: NodeId },
    PreUndo,
    PostUndo,
    PreRedo,
    PostRedo,
    /// The whole tree was discarded and reset to a fresh root.
    Cleared,
    BranchModeChanged { branch_mode: bool },
    /// Generic refresh signal, emitted after every observable mutation.
    Changed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerResult {
    Continue,
    /// Queue the handler for removal.
    Unsubscribe,
}

/// Registered event listeners.
///
/// Single-threaded by design: handlers are plain `FnMut` closures owned by
/// the graph, with no `Send`/`Sync` bounds.
#[derive(Default)]
pub(crate) struct Listeners {
    handlers: Vec<Box<dyn FnMut(&HistoryEvent) -> HandlerResult>>,
}

impl Listeners {
    pub(crate) fn subscribe(
        &mut self,
        handler: impl FnMut(&HistoryEvent) -> HandlerResult + 'static,
    ) {
        self.handlers.push(Box::new(handler));
    }

    pub(crate) fn emit(&mut self, event: &HistoryEvent) {
        self.handlers.retain_mut(|handler| matches!(handler(event), HandlerResult::Continue));
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners").field("handlers", &self.handlers.len()).finish()
    }
}
