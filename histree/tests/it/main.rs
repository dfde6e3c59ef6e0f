use std::cell::RefCell;
use std::rc::Rc;

use histree::{Action, CallbackAction, HistoryGraph};

mod props;

type CallLog = Rc<RefCell<Vec<String>>>;

fn noop(name: &str) -> Box<dyn Action> {
    Box::new(CallbackAction::new(name, "", || {}, || {}))
}

/// An action that appends its undo/redo invocations to a shared log, the way
/// an editor command layer binds inverse and forward callbacks.
fn logged(log: &CallLog, name: &str) -> Box<dyn Action> {
    let undo_log = Rc::clone(log);
    let redo_log = Rc::clone(log);
    let undo_name = format!("undo {name}");
    let redo_name = format!("redo {name}");
    Box::new(CallbackAction::new(
        name,
        "",
        move || undo_log.borrow_mut().push(undo_name.clone()),
        move || redo_log.borrow_mut().push(redo_name.clone()),
    ))
}

/// Structural invariants checked through the public API: the reachable tree
/// is acyclic with consistent parent/child links, the active index is in
/// bounds, and a node is undone exactly when it is off the root→cursor path.
#[track_caller]
fn check_tree(graph: &HistoryGraph) {
    let root = graph.root();
    assert!(graph.get(root).unwrap().is_root());
    assert_eq!(graph.parent_of(root), None);

    let mut seen = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        assert!(!seen.contains(&id), "node reachable through two paths");
        seen.push(id);
        let node = graph.get(id).unwrap();
        if !node.branches().is_empty() {
            assert!(node.active_index() < node.branches().len());
        }
        for &child in node.branches() {
            assert_eq!(graph.parent_of(child), Some(id), "child must point back at its parent");
            stack.push(child);
        }
    }

    let path = graph.ancestors(graph.current()).collect::<Vec<_>>();
    assert_eq!(path.last(), Some(&root), "the cursor hangs off the root");
    for &id in &seen {
        let undone = graph.get(id).unwrap().is_undone();
        if path.contains(&id) {
            assert!(!undone, "nodes at or above the cursor are applied");
        } else {
            assert!(undone, "nodes off the cursor path are undone");
        }
    }
}
