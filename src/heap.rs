//! Fibonacci heap core: root list management, consolidation, and the
//! mark/cut machinery behind decrease-key.
//!
//! The structure is a collection of heap-ordered trees whose roots sit in
//! a circular doubly linked list. Operations are lazy: insert and meld
//! only splice the root list, delete-min pays the deferred work by
//! consolidating trees of equal rank, and decrease-key cuts violating
//! nodes loose with the classic cascading-cut rule.
//!
//! Amortized costs (potential = #trees + 2 * #marked):
//! - insert, meld, find-min, decrease-key: O(1)
//! - delete-min, delete: O(log n)

use std::fmt;
use std::mem;
use std::rc::Rc;

use log::trace;
use smallvec::{smallvec, SmallVec};

use crate::node::{self, Arena, NodeId, SharedArena};

/// Error type for heap operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// `find_min`/`delete_min` on an empty heap.
    EmptyHeap,
    /// `decrease_key` called with a delta that is not strictly positive.
    NonPositiveDelta,
    /// `k_min` asked for more keys than the seeded tree can supply.
    NotEnoughNodes,
    /// The handle refers to a node that was already removed.
    InvalidHandle,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::EmptyHeap => write!(f, "heap is empty"),
            HeapError::NonPositiveDelta => {
                write!(f, "decrease_key delta must be strictly positive")
            }
            HeapError::NotEnoughNodes => {
                write!(f, "fewer nodes available than requested")
            }
            HeapError::InvalidHandle => {
                write!(f, "handle is no longer valid (node was removed)")
            }
        }
    }
}

impl std::error::Error for HeapError {}

/// Link/cut counters for amortized-cost accounting.
///
/// The counters are monotonic over the heap's lifetime and are only reset
/// by an explicit [`FibonacciHeap::reset_stats`] call. They live on the
/// heap value rather than in process-wide state, so independent heaps
/// never share them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapStats {
    /// Equal-rank tree merges performed by consolidation.
    pub links: u64,
    /// Subtree detachments performed by decrease-key/delete.
    pub cuts: u64,
}

/// Fibonacci heap over `i64` keys.
///
/// Nodes live in a slotmap arena shared by every heap on the thread, so
/// [`meld`](Self::meld) is a plain O(1) ring splice and the [`NodeId`]
/// handles returned by [`insert`](Self::insert) follow their nodes into
/// the receiving heap. A handle stays valid until its node is removed
/// and is detected as stale afterwards; it must only be presented to the
/// heap that currently owns the node.
///
/// The shared arena holds an `Rc`, so heaps are single-threaded values.
///
/// # Example
///
/// ```rust
/// use fibonacci_heap::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// let item = heap.insert(5);
/// heap.insert(3);
/// heap.decrease_key(item, 4).unwrap(); // 5 -> 1
/// assert_eq!(heap.delete_min().unwrap(), 1);
/// assert_eq!(heap.delete_min().unwrap(), 3);
/// ```
#[derive(Debug)]
pub struct FibonacciHeap {
    arena: SharedArena,
    min: Option<NodeId>,
    first: Option<NodeId>,
    size: usize,
    num_trees: usize,
    num_marked: usize,
    stats: HeapStats,
}

impl Default for FibonacciHeap {
    fn default() -> Self {
        Self {
            arena: node::shared_arena(),
            min: None,
            first: None,
            size: 0,
            num_trees: 0,
            num_marked: 0,
            stats: HeapStats::default(),
        }
    }
}

impl FibonacciHeap {
    /// Creates an empty heap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the heap holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of nodes in the heap.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Current length of the root list.
    pub fn num_trees(&self) -> usize {
        self.num_trees
    }

    /// Number of marked nodes across the whole heap.
    pub fn num_marked(&self) -> usize {
        self.num_marked
    }

    /// The potential function of the amortized analysis:
    /// `#trees + 2 * #marked`.
    pub fn potential(&self) -> usize {
        self.num_trees + 2 * self.num_marked
    }

    /// Total link operations performed so far.
    pub fn total_links(&self) -> u64 {
        self.stats.links
    }

    /// Total cut operations performed so far.
    pub fn total_cuts(&self) -> u64 {
        self.stats.cuts
    }

    /// Snapshot of the link/cut counters.
    pub fn stats(&self) -> HeapStats {
        self.stats
    }

    /// Zeroes the link/cut counters. Never happens implicitly.
    pub fn reset_stats(&mut self) {
        self.stats = HeapStats::default();
    }

    /// Inserts `key` as a new singleton tree at the front of the root
    /// list and returns its handle.
    ///
    /// # Time Complexity
    /// O(1), actual and amortized.
    pub fn insert(&mut self, key: i64) -> NodeId {
        let shared = Rc::clone(&self.arena);
        let mut arena = shared.borrow_mut();
        let id = node::new_singleton(&mut arena, key);
        self.attach_root_front(&mut arena, id);
        self.size += 1;
        id
    }

    /// Handle of the node with the minimal key.
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if the heap is empty.
    pub fn find_min(&self) -> Result<NodeId, HeapError> {
        self.min.ok_or(HeapError::EmptyHeap)
    }

    /// The minimal key itself, without a handle round-trip.
    pub fn min_key(&self) -> Result<i64, HeapError> {
        self.find_min().map(|id| self.arena.borrow()[id].key)
    }

    /// Removes the node with the minimal key and returns its key. The
    /// children of the removed node become roots; the root list is then
    /// consolidated so no two roots share a rank.
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if the heap is empty.
    ///
    /// # Time Complexity
    /// O(log n) amortized; each link performed is paid for by the drop in
    /// potential.
    pub fn delete_min(&mut self) -> Result<i64, HeapError> {
        let shared = Rc::clone(&self.arena);
        let mut arena = shared.borrow_mut();
        self.delete_min_in(&mut arena)
    }

    fn delete_min_in(&mut self, arena: &mut Arena) -> Result<i64, HeapError> {
        let min_id = self.min.ok_or(HeapError::EmptyHeap)?;
        let first = self.first.ok_or(HeapError::EmptyHeap)?;

        // Surviving roots in ring order, with the minimum replaced by its
        // promoted children.
        let mut roots: Vec<NodeId> =
            Vec::with_capacity(self.num_trees + arena[min_id].rank);
        let mut cur = first;
        loop {
            let next = arena[cur].next;
            if cur == min_id {
                if let Some(child) = arena[cur].child {
                    let mut kid = child;
                    loop {
                        let kid_next = arena[kid].next;
                        let n = &mut arena[kid];
                        n.parent = None;
                        if n.marked {
                            n.marked = false;
                            self.num_marked -= 1;
                        }
                        roots.push(kid);
                        kid = kid_next;
                        if kid == child {
                            break;
                        }
                    }
                }
            } else {
                roots.push(cur);
            }
            cur = next;
            if cur == first {
                break;
            }
        }

        let key = arena.remove(min_id).map(|n| n.key).unwrap();
        self.size -= 1;

        if roots.is_empty() {
            self.min = None;
            self.first = None;
            self.num_trees = 0;
            return Ok(key);
        }
        self.consolidate(arena, roots);
        Ok(key)
    }

    /// Melds `other` into this heap, consuming it.
    ///
    /// The two root rings are concatenated in place (`other`'s list goes
    /// to the back), so the cost is O(1) and handles minted by `other`
    /// stay valid against the receiver. Sizes, tree counts, mark counts,
    /// and link/cut statistics are summed; the min pointer goes to the
    /// smaller of the two minima (ties keep the receiver's).
    pub fn meld(&mut self, mut other: FibonacciHeap) {
        debug_assert!(Rc::ptr_eq(&self.arena, &other.arena));
        // Counter history survives melding even when a side is empty.
        self.stats.links += other.stats.links;
        self.stats.cuts += other.stats.cuts;

        if let Some(other_first) = other.first {
            let shared = Rc::clone(&self.arena);
            let mut arena = shared.borrow_mut();
            match self.first {
                None => {
                    self.min = other.min;
                    self.first = Some(other_first);
                }
                Some(self_first) => {
                    let self_last = arena[self_first].prev;
                    let other_last = arena[other_first].prev;
                    arena[self_last].next = other_first;
                    arena[other_first].prev = self_last;
                    arena[other_last].next = self_first;
                    arena[self_first].prev = other_last;

                    let other_min = other.min.unwrap();
                    let self_min = self.min.unwrap();
                    if arena[other_min].key < arena[self_min].key {
                        self.min = Some(other_min);
                    }
                }
            }
            self.size += other.size;
            self.num_trees += other.num_trees;
            self.num_marked += other.num_marked;
            trace!(
                "meld: absorbed {} nodes, {} trees",
                other.size,
                other.num_trees
            );
            // The receiver owns the nodes now; disarm `other`'s drop.
            other.min = None;
            other.first = None;
            other.size = 0;
            other.num_trees = 0;
            other.num_marked = 0;
        }
    }

    /// Decreases `node`'s key by `delta`.
    ///
    /// The key saturates at `i64::MIN`: a delta larger than the remaining
    /// range clamps there instead of wrapping. If the new key undercuts
    /// the parent's, the node is cut loose into the root list and the
    /// cascading-cut rule runs up the ancestor chain.
    ///
    /// # Errors
    /// [`HeapError::NonPositiveDelta`] if `delta <= 0`;
    /// [`HeapError::InvalidHandle`] if the node was already removed.
    ///
    /// # Time Complexity
    /// O(1) amortized.
    pub fn decrease_key(&mut self, node: NodeId, delta: i64) -> Result<(), HeapError> {
        if delta <= 0 {
            return Err(HeapError::NonPositiveDelta);
        }
        let shared = Rc::clone(&self.arena);
        let mut arena = shared.borrow_mut();
        let Some(n) = arena.get_mut(node) else {
            return Err(HeapError::InvalidHandle);
        };
        n.key = n.key.saturating_sub(delta);
        let (key, parent) = (n.key, n.parent);
        match parent {
            None => {
                let min = self.min.unwrap();
                if key < arena[min].key {
                    self.min = Some(node);
                }
            }
            Some(parent) => {
                if key < arena[parent].key {
                    self.cut(&mut arena, node, parent);
                    self.cascading_cut(&mut arena, parent);
                }
            }
        }
        Ok(())
    }

    /// Removes an arbitrary node from the heap.
    ///
    /// The node is cut loose (cascading), dropped below the current
    /// minimum, and extracted via [`delete_min`](Self::delete_min).
    ///
    /// # Errors
    /// [`HeapError::InvalidHandle`] if the node was already removed.
    pub fn delete(&mut self, node: NodeId) -> Result<(), HeapError> {
        let shared = Rc::clone(&self.arena);
        let mut arena = shared.borrow_mut();
        if !arena.contains_key(node) {
            return Err(HeapError::InvalidHandle);
        }
        if let Some(parent) = arena[node].parent {
            self.cut(&mut arena, node, parent);
            self.cascading_cut(&mut arena, parent);
        }
        let min = self.min.unwrap();
        let floor = arena[min].key.saturating_sub(1);
        let n = &mut arena[node];
        if floor < n.key {
            n.key = floor;
        }
        // The rewritten key is <= every other key, so the node is a valid
        // minimum even when saturation left it tied.
        self.min = Some(node);
        self.delete_min_in(&mut arena).map(|_| ())
    }

    /// Histogram of root ranks: entry `i` counts the rank-`i` roots.
    ///
    /// The result is empty for an empty heap and carries no trailing
    /// zeros beyond the largest rank present.
    pub fn counters_rep(&self) -> Vec<usize> {
        let mut counts = Vec::new();
        for root in self.roots() {
            let rank = self.arena.borrow()[root].rank;
            if rank >= counts.len() {
                counts.resize(rank + 1, 0);
            }
            counts[rank] += 1;
        }
        counts
    }

    // ------------------------------------------------------------------
    // Read accessors: enough surface for validators, printers, and other
    // non-mutating collaborators. All return None on a stale handle.
    // ------------------------------------------------------------------

    /// Key of `node`.
    pub fn key(&self, node: NodeId) -> Option<i64> {
        self.arena.borrow().get(node).map(|n| n.key)
    }

    /// Rank (number of direct children) of `node`.
    pub fn rank(&self, node: NodeId) -> Option<usize> {
        self.arena.borrow().get(node).map(|n| n.rank)
    }

    /// Whether `node` is marked.
    pub fn is_marked(&self, node: NodeId) -> Option<bool> {
        self.arena.borrow().get(node).map(|n| n.marked)
    }

    /// The designated child of `node`, if any.
    pub fn child(&self, node: NodeId) -> Option<NodeId> {
        self.arena.borrow().get(node).and_then(|n| n.child)
    }

    /// The parent of `node`; None for roots (and stale handles).
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.borrow().get(node).and_then(|n| n.parent)
    }

    /// Next sibling in `node`'s ring.
    pub fn next(&self, node: NodeId) -> Option<NodeId> {
        self.arena.borrow().get(node).map(|n| n.next)
    }

    /// Previous sibling in `node`'s ring.
    pub fn prev(&self, node: NodeId) -> Option<NodeId> {
        self.arena.borrow().get(node).map(|n| n.prev)
    }

    /// Front of the root list.
    pub fn first(&self) -> Option<NodeId> {
        self.first
    }

    /// Iterates the root list in ring order, starting at the front.
    pub fn roots(&self) -> RingIter<'_> {
        RingIter {
            heap: self,
            start: self.first.unwrap_or_default(),
            cur: self.first,
        }
    }

    /// Iterates the direct children of `node` in ring order, starting at
    /// the designated child. Empty for leaves and stale handles.
    pub fn children(&self, node: NodeId) -> RingIter<'_> {
        let start = self.child(node);
        RingIter {
            heap: self,
            start: start.unwrap_or_default(),
            cur: start,
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Splices a detached, parentless node in as the new front root.
    fn attach_root_front(&mut self, arena: &mut Arena, id: NodeId) {
        debug_assert!(arena[id].parent.is_none());
        match self.first {
            None => {
                self.min = Some(id);
            }
            Some(first) => {
                node::link_before(arena, first, id);
                let min = self.min.unwrap();
                if arena[id].key < arena[min].key {
                    self.min = Some(id);
                }
            }
        }
        self.first = Some(id);
        self.num_trees += 1;
    }

    /// Appends a root at the back of the list during the rebuild after
    /// consolidation. The node's old ring links are discarded.
    fn attach_root_back(&mut self, arena: &mut Arena, id: NodeId) {
        match self.first {
            None => {
                node::make_solo(arena, id);
                self.first = Some(id);
                self.min = Some(id);
            }
            Some(first) => {
                node::link_before(arena, first, id);
                let min = self.min.unwrap();
                if arena[id].key < arena[min].key {
                    self.min = Some(id);
                }
            }
        }
        self.num_trees += 1;
    }

    /// Repeatedly links equal-rank trees through a degree-indexed bucket
    /// array, then rebuilds the root list (ascending rank) and recomputes
    /// the min pointer and tree count.
    fn consolidate(&mut self, arena: &mut Arena, roots: Vec<NodeId>) {
        let processed = roots.len();
        // log2(size) + 2 buckets cover the common case; adversarial
        // cut-heavy shapes can exceed it, so grow on demand.
        let guess = usize::BITS as usize - self.size.leading_zeros() as usize + 2;
        let mut buckets: SmallVec<[Option<NodeId>; 24]> = smallvec![None; guess];

        for root in roots {
            let mut cur = root;
            loop {
                let rank = arena[cur].rank;
                if rank >= buckets.len() {
                    buckets.resize(rank + 1, None);
                }
                match buckets[rank].take() {
                    Some(other) => cur = self.link(arena, cur, other),
                    None => {
                        buckets[rank] = Some(cur);
                        break;
                    }
                }
            }
        }

        self.min = None;
        self.first = None;
        self.num_trees = 0;
        for id in buckets.into_iter().flatten() {
            self.attach_root_back(arena, id);
        }
        trace!(
            "consolidate: {} roots -> {} trees",
            processed,
            self.num_trees
        );
    }

    /// Links two equal-rank roots and returns the winner. The smaller key
    /// becomes the parent; on a tie the left operand (the tree currently
    /// being bucketed) wins, keeping consolidation deterministic. The
    /// loser joins the back of the winner's child ring.
    fn link(&mut self, arena: &mut Arena, mut a: NodeId, mut b: NodeId) -> NodeId {
        debug_assert_eq!(arena[a].rank, arena[b].rank);
        if arena[b].key < arena[a].key {
            mem::swap(&mut a, &mut b);
        }
        match arena[a].child {
            None => {
                node::make_solo(arena, b);
                arena[a].child = Some(b);
            }
            Some(child) => {
                node::link_before(arena, child, b);
            }
        }
        arena[b].parent = Some(a);
        arena[a].rank += 1;
        self.stats.links += 1;
        a
    }

    /// Detaches `node` from `parent`'s child ring, unmarks it, and makes
    /// it a fresh front root.
    fn cut(&mut self, arena: &mut Arena, node: NodeId, parent: NodeId) {
        let next = arena[node].next;
        if next == node {
            arena[parent].child = None;
        } else {
            node::unlink(arena, node);
            if arena[parent].child == Some(node) {
                arena[parent].child = Some(next);
            }
        }
        arena[parent].rank -= 1;

        let n = &mut arena[node];
        n.parent = None;
        if n.marked {
            n.marked = false;
            self.num_marked -= 1;
        }
        self.stats.cuts += 1;
        self.attach_root_front(arena, node);
    }

    /// Walks up from a node that just lost a child. An unmarked non-root
    /// ancestor takes the mark and stops the cascade ("first loss is
    /// free"); a marked one is cut loose and the walk continues.
    fn cascading_cut(&mut self, arena: &mut Arena, mut node: NodeId) {
        while let Some(parent) = arena[node].parent {
            if !arena[node].marked {
                arena[node].marked = true;
                self.num_marked += 1;
                return;
            }
            self.cut(arena, node, parent);
            node = parent;
        }
    }
}

impl Drop for FibonacciHeap {
    /// Frees this heap's nodes from the shared arena. Iterative walk;
    /// melded-away heaps were emptied by `meld` and free nothing.
    fn drop(&mut self) {
        let Some(first) = self.first else { return };
        let mut arena = self.arena.borrow_mut();
        let mut stack: Vec<NodeId> = Vec::with_capacity(self.num_trees);
        let mut cur = first;
        loop {
            stack.push(cur);
            cur = match arena.get(cur) {
                Some(n) => n.next,
                None => break,
            };
            if cur == first {
                break;
            }
        }
        while let Some(id) = stack.pop() {
            if let Some(removed) = arena.remove(id) {
                if let Some(child) = removed.child {
                    let mut kid = child;
                    loop {
                        stack.push(kid);
                        kid = match arena.get(kid) {
                            Some(n) => n.next,
                            None => break,
                        };
                        if kid == child {
                            break;
                        }
                    }
                }
            }
        }
    }
}

/// Iterator over one circular sibling ring. Yields each node once.
pub struct RingIter<'a> {
    heap: &'a FibonacciHeap,
    start: NodeId,
    cur: Option<NodeId>,
}

impl<'a> Iterator for RingIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let cur = self.cur?;
        self.cur = match self.heap.next(cur) {
            Some(next) if next != self.start => Some(next),
            _ => None,
        };
        Some(cur)
    }
}
