use std::fmt;

/// An atomic reversible operation recorded in the history tree.
///
/// The graph never constructs or applies actions; the editor's command layer
/// supplies them with the forward effect already applied. Implementations own
/// their {applied, undone} state: calling [`undo`](Action::undo) on an
/// already-undone action (or [`redo`](Action::redo) on an applied one) is a
/// caller error which the action should report and ignore, not correct.
pub trait Action {
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Reverses the action's effect.
    fn undo(&mut self);

    /// Re-applies the action's effect after an undo.
    fn redo(&mut self);

    /// Whether the action is currently in the undone state.
    fn is_undone(&self) -> bool;
}

impl fmt::Debug for dyn Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name())
            .field("undone", &self.is_undone())
            .finish()
    }
}

/// An [`Action`] backed by a pair of closures.
///
/// This is the plain way for a command layer to record an operation: bind the
/// inverse and forward effects as callbacks and hand them over together with a
/// display name. Double-undo and double-redo are reported and ignored.
pub struct CallbackAction {
    name: String,
    description: String,
    undone: bool,
    on_undo: Box<dyn FnMut()>,
    on_redo: Box<dyn FnMut()>,
}

impl CallbackAction {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        on_undo: impl FnMut() + 'static,
        on_redo: impl FnMut() + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            undone: false,
            on_undo: Box::new(on_undo),
            on_redo: Box::new(on_redo),
        }
    }
}

impl Action for CallbackAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn undo(&mut self) {
        if self.undone {
            tracing::warn!(name = %self.name, "undo called on an already undone action");
            return;
        }
        (self.on_undo)();
        self.undone = true;
    }

    fn redo(&mut self) {
        if !self.undone {
            tracing::warn!(name = %self.name, "redo called on an action that is not undone");
            return;
        }
        (self.on_redo)();
        self.undone = false;
    }

    fn is_undone(&self) -> bool {
        self.undone
    }
}

/// An ordered bundle of actions undone and redone as one atomic step.
///
/// Members are undone in reverse insertion order and redone in forward
/// insertion order. A group is itself an [`Action`], so groups nest: closing
/// an inner group appends it to its parent as a single member. The group
/// keeps its own undone flag so that even an empty group round-trips.
pub struct ActionGroup {
    name: String,
    description: String,
    undone: bool,
    actions: Vec<Box<dyn Action>>,
}

impl ActionGroup {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self { name: name.into(), description: description.into(), undone: false, actions: Vec::new() }
    }

    pub fn push(&mut self, action: Box<dyn Action>) {
        self.actions.push(action);
    }

    pub fn actions(&self) -> &[Box<dyn Action>] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl fmt::Debug for ActionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionGroup")
            .field("name", &self.name)
            .field("undone", &self.undone)
            .field("actions", &self.actions)
            .finish()
    }
}

impl Action for ActionGroup {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn undo(&mut self) {
        for action in self.actions.iter_mut().rev() {
            action.undo();
        }
        self.undone = true;
    }

    fn redo(&mut self) {
        for action in self.actions.iter_mut() {
            action.redo();
        }
        self.undone = false;
    }

    fn is_undone(&self) -> bool {
        self.undone
    }
}
