//! Structural validation for test harnesses.
//!
//! Walks every sibling ring and every tree through the public read
//! accessors and checks the heap's structural invariants: ring
//! consistency, heap order, exact ranks, mark bookkeeping, and the
//! recorded size/tree/mark counters. All walks are iterative with
//! explicit stacks and step budgets, so a corrupted (cyclic) structure is
//! reported instead of hanging or overflowing the call stack.
//!
//! A violation must never occur through correct use of the public API;
//! tests assert its absence after every mutation.

use std::fmt;

use crate::heap::FibonacciHeap;
use crate::node::NodeId;

/// A broken structural invariant, with the node(s) it was detected at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A sibling ring is not circular/doubly consistent (or never closes).
    BrokenRing { node: NodeId },
    /// A node on the root list still has a parent reference.
    RootHasParent { node: NodeId },
    /// A child's parent reference does not point at the node listing it.
    ParentMismatch { node: NodeId },
    /// A child's key undercuts its parent's key.
    HeapOrder { parent: NodeId, child: NodeId },
    /// A node's rank disagrees with its actual child count.
    RankMismatch {
        node: NodeId,
        rank: usize,
        children: usize,
    },
    /// A root carries a mark.
    MarkedRoot { node: NodeId },
    /// The min pointer is missing or not on the root list.
    MinNotRoot,
    /// A root's key undercuts the min pointer's key.
    MinNotMinimal { root: NodeId },
    /// Recorded size differs from the reachable node count.
    SizeMismatch { recorded: usize, counted: usize },
    /// Recorded tree count differs from the root list length.
    TreeCountMismatch { recorded: usize, counted: usize },
    /// Recorded mark count differs from the marked nodes found.
    MarkCountMismatch { recorded: usize, counted: usize },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::BrokenRing { node } => {
                write!(f, "sibling ring broken at {node:?}")
            }
            InvariantViolation::RootHasParent { node } => {
                write!(f, "root {node:?} has a parent reference")
            }
            InvariantViolation::ParentMismatch { node } => {
                write!(f, "parent back-reference of {node:?} is wrong")
            }
            InvariantViolation::HeapOrder { parent, child } => {
                write!(f, "heap order violated between {parent:?} and {child:?}")
            }
            InvariantViolation::RankMismatch {
                node,
                rank,
                children,
            } => write!(
                f,
                "rank of {node:?} is {rank} but it has {children} children"
            ),
            InvariantViolation::MarkedRoot { node } => {
                write!(f, "root {node:?} is marked")
            }
            InvariantViolation::MinNotRoot => {
                write!(f, "min pointer missing or not on the root list")
            }
            InvariantViolation::MinNotMinimal { root } => {
                write!(f, "root {root:?} has a smaller key than the min pointer")
            }
            InvariantViolation::SizeMismatch { recorded, counted } => {
                write!(f, "size is {recorded} but {counted} nodes are reachable")
            }
            InvariantViolation::TreeCountMismatch { recorded, counted } => {
                write!(f, "numTrees is {recorded} but the root list has {counted}")
            }
            InvariantViolation::MarkCountMismatch { recorded, counted } => {
                write!(f, "numMarked is {recorded} but {counted} marks were found")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Checks every structural invariant of `heap`.
pub fn verify(heap: &FibonacciHeap) -> Result<(), InvariantViolation> {
    let Some(first) = heap.first() else {
        if heap.len() != 0 {
            return Err(InvariantViolation::SizeMismatch {
                recorded: heap.len(),
                counted: 0,
            });
        }
        if heap.num_trees() != 0 {
            return Err(InvariantViolation::TreeCountMismatch {
                recorded: heap.num_trees(),
                counted: 0,
            });
        }
        if heap.num_marked() != 0 {
            return Err(InvariantViolation::MarkCountMismatch {
                recorded: heap.num_marked(),
                counted: 0,
            });
        }
        if heap.find_min().is_ok() {
            return Err(InvariantViolation::MinNotRoot);
        }
        return Ok(());
    };

    let min = heap.find_min().map_err(|_| InvariantViolation::MinNotRoot)?;
    let min_key = heap.key(min).ok_or(InvariantViolation::MinNotRoot)?;

    let roots = collect_ring(heap, first, heap.len())?;
    if !roots.contains(&min) {
        return Err(InvariantViolation::MinNotRoot);
    }

    let mut counted = 0usize;
    let mut marked = 0usize;
    for &root in &roots {
        if heap.parent(root).is_some() {
            return Err(InvariantViolation::RootHasParent { node: root });
        }
        if heap.is_marked(root) == Some(true) {
            return Err(InvariantViolation::MarkedRoot { node: root });
        }
        if key_of(heap, root)? < min_key {
            return Err(InvariantViolation::MinNotMinimal { root });
        }

        // Tree walk with an explicit stack; skewed trees would exhaust
        // call depth otherwise.
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            counted += 1;
            if counted > heap.len() {
                return Err(InvariantViolation::SizeMismatch {
                    recorded: heap.len(),
                    counted,
                });
            }
            if heap.is_marked(id) == Some(true) {
                marked += 1;
            }
            let key = key_of(heap, id)?;

            let mut children = 0usize;
            if let Some(designated) = heap.child(id) {
                for child in collect_ring(heap, designated, heap.len())? {
                    children += 1;
                    if heap.parent(child) != Some(id) {
                        return Err(InvariantViolation::ParentMismatch { node: child });
                    }
                    if key_of(heap, child)? < key {
                        return Err(InvariantViolation::HeapOrder {
                            parent: id,
                            child,
                        });
                    }
                    stack.push(child);
                }
            }
            let rank = heap.rank(id).ok_or(InvariantViolation::BrokenRing { node: id })?;
            if rank != children {
                return Err(InvariantViolation::RankMismatch { node: id, rank, children });
            }
        }
    }

    if counted != heap.len() {
        return Err(InvariantViolation::SizeMismatch {
            recorded: heap.len(),
            counted,
        });
    }
    if roots.len() != heap.num_trees() {
        return Err(InvariantViolation::TreeCountMismatch {
            recorded: heap.num_trees(),
            counted: roots.len(),
        });
    }
    if marked != heap.num_marked() {
        return Err(InvariantViolation::MarkCountMismatch {
            recorded: heap.num_marked(),
            counted: marked,
        });
    }
    Ok(())
}

fn key_of(heap: &FibonacciHeap, node: NodeId) -> Result<i64, InvariantViolation> {
    heap.key(node).ok_or(InvariantViolation::BrokenRing { node })
}

/// Collects one sibling ring, checking `next`/`prev` consistency at every
/// hop. `budget` bounds the walk so an unclosed ring is an error, not a
/// hang.
fn collect_ring(
    heap: &FibonacciHeap,
    start: NodeId,
    budget: usize,
) -> Result<Vec<NodeId>, InvariantViolation> {
    let mut out = Vec::new();
    let mut cur = start;
    loop {
        let next = heap.next(cur).ok_or(InvariantViolation::BrokenRing { node: cur })?;
        let prev = heap.prev(cur).ok_or(InvariantViolation::BrokenRing { node: cur })?;
        if heap.prev(next) != Some(cur) || heap.next(prev) != Some(cur) {
            return Err(InvariantViolation::BrokenRing { node: cur });
        }
        out.push(cur);
        if out.len() > budget {
            return Err(InvariantViolation::BrokenRing { node: cur });
        }
        cur = next;
        if cur == start {
            break;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_heap_verifies() {
        verify(&FibonacciHeap::new()).unwrap();
    }

    #[test]
    fn verifies_through_a_mixed_workload() {
        let mut heap = FibonacciHeap::new();
        let mut handles = Vec::new();
        for key in (0..40).rev() {
            handles.push(heap.insert(key * 3));
            verify(&heap).unwrap();
        }
        heap.delete_min().unwrap();
        verify(&heap).unwrap();

        for handle in handles.iter().skip(5).step_by(7) {
            if heap.key(*handle).is_some() {
                heap.decrease_key(*handle, 50).unwrap();
                verify(&heap).unwrap();
            }
        }
        while heap.delete_min().is_ok() {
            verify(&heap).unwrap();
        }
    }
}
