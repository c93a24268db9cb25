//! Diagnostic rendering of the heap's tree shapes.
//!
//! One block per root tree, one line per depth level, nodes printed as
//! `key(rank)` (a trailing `*` flags a marked node) in sibling order.
//! Walks the read accessors only, with an explicit stack.

use std::fmt::Write as _;

use crate::heap::FibonacciHeap;
use crate::node::NodeId;

/// Renders the whole heap into a multi-line string.
pub fn render(heap: &FibonacciHeap) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "heap: size {}, trees {}, marked {}",
        heap.len(),
        heap.num_trees(),
        heap.num_marked()
    );
    for (index, root) in heap.roots().enumerate() {
        let mut levels: Vec<Vec<String>> = Vec::new();
        let mut nodes = 0usize;
        let mut stack: Vec<(NodeId, usize)> = vec![(root, 0)];
        while let Some((id, depth)) = stack.pop() {
            nodes += 1;
            if levels.len() <= depth {
                levels.resize_with(depth + 1, Vec::new);
            }
            let key = heap.key(id).unwrap_or_default();
            let rank = heap.rank(id).unwrap_or_default();
            let mark = if heap.is_marked(id) == Some(true) { "*" } else { "" };
            levels[depth].push(format!("{key}({rank}){mark}"));

            // Reverse push keeps siblings in ring order across pops.
            let children: Vec<NodeId> = heap.children(id).collect();
            for child in children.into_iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        let _ = writeln!(out, "tree {index}: {nodes} nodes");
        for (level, entries) in levels.iter().enumerate() {
            let _ = writeln!(out, "{level:>4}: {}", entries.join(","));
        }
    }
    out
}
