use std::fmt;

use crate::graph::HistoryGraph;
use crate::node::NodeId;

/// One line of the flattened branch tree, ready for a list widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row<'a> {
    pub node: NodeId,
    /// Indentation depth: 0 for the main chain, +2 per nested branch.
    pub depth: usize,
    /// `None` on the chain being followed, `Some(n)` for the n-th sibling
    /// branch forked off above this row.
    pub branch: Option<usize>,
    pub name: &'a str,
    /// Whether this row is the cursor node.
    pub current: bool,
}

impl HistoryGraph {
    /// Flattens the tree into an indented list of rows, depth-first.
    ///
    /// Each node on a chain is emitted in order; a node's non-first branches
    /// are recursed into (indented and numbered) before the chain continues.
    /// In branch mode the chain follows every node's first branch so all
    /// recorded history is listed; in linear mode it follows the active
    /// branch only, giving the classic flat undo list.
    pub fn rows(&self) -> Vec<Row<'_>> {
        let mut rows = Vec::new();
        self.push_rows(self.root(), 0, None, &mut rows);
        rows
    }

    fn push_rows<'a>(
        &'a self,
        start: NodeId,
        depth: usize,
        branch: Option<usize>,
        out: &mut Vec<Row<'a>>,
    ) {
        let mut id = start;
        let mut branch = branch;
        loop {
            let node = self.node(id);
            out.push(Row { node: id, depth, branch, name: node.name(), current: self.is_current(id) });
            branch = None;

            let next = if self.branch_mode() {
                for (i, &sub) in node.branches().iter().enumerate().skip(1) {
                    self.push_rows(sub, depth + 2, Some(i), out);
                }
                node.branches().first().copied()
            } else {
                node.active_branch()
            };
            match next {
                Some(next) => id = next,
                None => break,
            }
        }
    }
}

/// Renders the indented tree, marking the cursor row with ` <<<`.
impl fmt::Debug for HistoryGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for _ in 0..row.depth {
                write!(f, " ")?;
            }
            match row.branch {
                Some(n) => write!(f, "{n} ")?,
                None => write!(f, "- ")?,
            }
            write!(f, "{}", row.name)?;
            if row.current {
                write!(f, " <<<")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
