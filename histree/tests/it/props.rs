use histree::HistoryGraph;
use proptest::prelude::*;

use crate::{check_tree, noop};

#[derive(Debug, Clone, Copy)]
enum Op {
    Add,
    Undo(usize),
    Redo(usize),
    NextBranch,
    PreviousBranch,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Add),
        2 => (1usize..4).prop_map(Op::Undo),
        2 => (1usize..4).prop_map(Op::Redo),
        1 => Just(Op::NextBranch),
        1 => Just(Op::PreviousBranch),
    ]
}

fn apply(graph: &mut HistoryGraph, ops: &[Op]) {
    let mut added = 0;
    for &op in ops {
        match op {
            Op::Add => {
                graph.add_action(noop(&format!("a{added}")));
                added += 1;
            }
            Op::Undo(n) => {
                graph.undo(n);
            }
            Op::Redo(n) => {
                graph.redo(n);
            }
            Op::NextBranch => graph.next_branch(),
            Op::PreviousBranch => graph.previous_branch(),
        }
    }
}

proptest! {
    #[test]
    fn random_ops_preserve_tree_invariants(ops in proptest::collection::vec(op(), 1..64)) {
        let mut graph = HistoryGraph::new();
        for op in ops {
            apply(&mut graph, &[op]);
            check_tree(&graph);
        }
    }

    /// From wherever a random op sequence leaves the cursor, undoing to the
    /// root and redoing the same number of steps must land back on the same
    /// node with every node's undone flag restored.
    #[test]
    fn undo_to_root_then_redo_is_a_round_trip(ops in proptest::collection::vec(op(), 1..64)) {
        let mut graph = HistoryGraph::new();
        apply(&mut graph, &ops);

        let node = graph.current();
        let depth = graph.depth(node);
        prop_assume!(depth > 0);

        let flags = graph
            .ancestors(node)
            .map(|id| graph.get(id).unwrap().is_undone())
            .collect::<Vec<_>>();

        prop_assert_eq!(graph.undo(depth), depth);
        prop_assert_eq!(graph.current(), graph.root());

        prop_assert_eq!(graph.redo(depth), depth);
        prop_assert_eq!(graph.current(), node);
        let restored = graph
            .ancestors(node)
            .map(|id| graph.get(id).unwrap().is_undone())
            .collect::<Vec<_>>();
        prop_assert_eq!(flags, restored);
        check_tree(&graph);
    }

    /// A full cycle of `next_branch` calls returns the active index to where
    /// it started.
    #[test]
    fn full_branch_cycle_is_identity(forks in 1usize..6) {
        let mut graph = HistoryGraph::new();
        let fork = graph.add_action(noop("base")).unwrap();
        for i in 0..forks {
            graph.add_action(noop(&format!("f{i}")));
            graph.undo(1);
        }
        prop_assert_eq!(graph.current(), fork);
        prop_assert_eq!(graph.branches().len(), forks);

        let before = graph.get(fork).unwrap().active_index();
        for _ in 0..forks {
            graph.next_branch();
        }
        prop_assert_eq!(graph.get(fork).unwrap().active_index(), before);
        check_tree(&graph);
    }
}
