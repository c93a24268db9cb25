//! k-smallest extraction without disturbing the heap.
//!
//! Works on the read surface only: a candidate min-heap is seeded with the
//! heap's minimum, and every popped candidate fans out to its children in
//! the original structure. Each of the `k` pops inserts at most
//! max-degree candidates, giving O(k log k + k * maxDegree).

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::heap::{FibonacciHeap, HeapError};
use crate::node::NodeId;

/// Returns the `k` smallest keys reachable from `heap`'s minimum tree, in
/// ascending order. The heap itself is not modified.
///
/// Meaningful when the heap consists of a single tree (e.g. right after a
/// delete-min consolidated a power-of-two node count); with several trees
/// only the minimum's own tree is explored.
///
/// # Errors
/// [`HeapError::NotEnoughNodes`] if `k` exceeds the heap size or the
/// seeded tree runs out of nodes before `k` keys are produced.
pub fn k_min(heap: &FibonacciHeap, k: usize) -> Result<Vec<i64>, HeapError> {
    if k == 0 {
        return Ok(Vec::new());
    }
    if k > heap.len() {
        return Err(HeapError::NotEnoughNodes);
    }

    let seed = heap.find_min()?;
    let seed_key = heap.key(seed).ok_or(HeapError::InvalidHandle)?;
    let mut candidates: BinaryHeap<Reverse<(i64, NodeId)>> = BinaryHeap::new();
    candidates.push(Reverse((seed_key, seed)));

    let mut out = Vec::with_capacity(k);
    while out.len() < k {
        let Reverse((key, id)) = candidates.pop().ok_or(HeapError::NotEnoughNodes)?;
        out.push(key);
        for child in heap.children(id) {
            if let Some(child_key) = heap.key(child) {
                candidates.push(Reverse((child_key, child)));
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2^m + 1 inserts followed by one delete-min leave a single tree.
    fn single_tree_heap(m: u32) -> FibonacciHeap {
        let mut heap = FibonacciHeap::new();
        for key in 0..=(1 << m) {
            heap.insert(key);
        }
        heap.delete_min().unwrap();
        assert_eq!(heap.num_trees(), 1);
        heap
    }

    #[test]
    fn zero_k_is_empty_even_on_empty_heap() {
        let heap = FibonacciHeap::new();
        assert_eq!(k_min(&heap, 0), Ok(Vec::new()));
    }

    #[test]
    fn k_beyond_heap_size_is_rejected() {
        let heap = FibonacciHeap::new();
        assert_eq!(k_min(&heap, 1), Err(HeapError::NotEnoughNodes));

        let heap = single_tree_heap(3);
        assert_eq!(k_min(&heap, 9), Err(HeapError::NotEnoughNodes));
    }

    #[test]
    fn matches_sorted_prefix_on_a_single_tree() {
        let heap = single_tree_heap(3);
        for k in 0..=8 {
            let expect: Vec<i64> = (1..=k as i64).collect();
            assert_eq!(k_min(&heap, k), Ok(expect));
        }
        // Non-destructive: the heap is untouched.
        assert_eq!(heap.len(), 8);
        assert_eq!(heap.min_key(), Ok(1));
    }

    #[test]
    fn multi_tree_heap_only_reaches_the_min_tree() {
        let mut heap = FibonacciHeap::new();
        for key in 0..16 {
            heap.insert(key);
        }
        heap.delete_min().unwrap();
        // 15 nodes consolidate into trees of ranks 0..=3; the minimum key
        // 1 sits in the rank-0 singleton.
        assert_eq!(heap.num_trees(), 4);
        assert_eq!(k_min(&heap, 1), Ok(vec![1]));
        assert_eq!(k_min(&heap, 2), Err(HeapError::NotEnoughNodes));
    }
}
