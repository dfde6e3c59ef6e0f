//! Branching undo/redo history for editor documents.
//!
//! A [`HistoryGraph`] records opaque reversible [`Action`]s into a tree
//! rather than a stack: undoing and then recording a new action starts a new
//! branch instead of discarding the undone future. The graph tracks a cursor
//! (the most recently applied node), supports transactional groups, cycling
//! and selecting between sibling branches, and planning the minimal
//! undo/switch/redo sequence between two arbitrary points in the tree
//! ([`HistoryGraph::path_between`]), which is what a "jump to revision" list
//! widget needs.
//!
//! The crate is GUI-agnostic: actions come in through the [`Action`] trait
//! and changes go out through [`HistoryEvent`] listeners.

mod action;
mod event;
mod graph;
mod node;
mod path;
mod render;

pub use self::action::{Action, ActionGroup, CallbackAction};
pub use self::event::{HandlerResult, HistoryEvent};
pub use self::graph::{GroupHandle, HistoryGraph};
pub use self::node::{HistoryNode, NodeId};
pub use self::path::UndoPlan;
pub use self::render::Row;
