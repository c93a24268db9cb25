//! Node model: the heap node record and the arena it lives in.
//!
//! Every structural link (`child`, `parent`, `next`, `prev`) is an arena
//! key rather than a pointer, so the cyclic sibling rings and parent
//! back-references carry no ownership. Cut and link are O(1) key rewiring.
//!
//! There is one node table per thread, shared by every heap through an
//! `Rc<RefCell<..>>` handle. Meld can therefore concatenate two heaps'
//! root rings in place, and a node handle stays tied to its node no
//! matter which heap currently owns it. The `Rc` also keeps heap values
//! on the thread that allocated their nodes.

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable handle to a node in a [`FibonacciHeap`](crate::FibonacciHeap).
    ///
    /// Handles are generational slotmap keys: `Copy`, cheap to compare,
    /// and a handle whose node has been removed is detected as stale
    /// instead of silently aliasing a recycled slot. A handle follows
    /// its node across meld and stays usable with the receiving heap.
    pub struct NodeId;
}

/// A single heap node.
///
/// `next`/`prev` always hold live keys and form the circular sibling ring;
/// a node with no siblings links to itself. `child` names one designated
/// child, whose ring reaches the rest. `rank` is the exact number of
/// direct children.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub key: i64,
    pub rank: usize,
    pub marked: bool,
    pub child: Option<NodeId>,
    pub parent: Option<NodeId>,
    pub next: NodeId,
    pub prev: NodeId,
}

pub(crate) type Arena = SlotMap<NodeId, Node>;
pub(crate) type SharedArena = Rc<RefCell<Arena>>;

thread_local! {
    static ARENA: SharedArena = SharedArena::default();
}

/// The calling thread's node table.
pub(crate) fn shared_arena() -> SharedArena {
    ARENA.with(Rc::clone)
}

#[cfg(test)]
pub(crate) fn arena_len() -> usize {
    ARENA.with(|arena| arena.borrow().len())
}

/// Allocates a fresh rank-0 node whose sibling ring is just itself.
pub(crate) fn new_singleton(arena: &mut Arena, key: i64) -> NodeId {
    arena.insert_with_key(|id| Node {
        key,
        rank: 0,
        marked: false,
        child: None,
        parent: None,
        next: id,
        prev: id,
    })
}

/// Splices `n` into the ring immediately before `at`.
///
/// Overwrites `n`'s own ring links, so `n` need not be detached first.
pub(crate) fn link_before(arena: &mut Arena, at: NodeId, n: NodeId) {
    let prev = arena[at].prev;
    arena[n].prev = prev;
    arena[n].next = at;
    arena[prev].next = n;
    arena[at].prev = n;
}

/// Unlinks `n` from its ring, closing the gap; `n` becomes a ring of one.
pub(crate) fn unlink(arena: &mut Arena, n: NodeId) {
    let (prev, next) = {
        let node = &arena[n];
        (node.prev, node.next)
    };
    arena[prev].next = next;
    arena[next].prev = prev;
    arena[n].next = n;
    arena[n].prev = n;
}

/// Resets `n`'s ring links to itself, discarding whatever they held.
pub(crate) fn make_solo(arena: &mut Arena, n: NodeId) {
    arena[n].next = n;
    arena[n].prev = n;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring_of(arena: &Arena, start: NodeId) -> Vec<i64> {
        let mut out = vec![arena[start].key];
        let mut cur = arena[start].next;
        while cur != start {
            out.push(arena[cur].key);
            cur = arena[cur].next;
        }
        out
    }

    #[test]
    fn singleton_links_to_itself() {
        let mut arena = Arena::default();
        let a = new_singleton(&mut arena, 7);
        assert_eq!(arena[a].next, a);
        assert_eq!(arena[a].prev, a);
        assert_eq!(arena[a].rank, 0);
    }

    #[test]
    fn link_before_builds_a_ring() {
        let mut arena = Arena::default();
        let a = new_singleton(&mut arena, 1);
        let b = new_singleton(&mut arena, 2);
        let c = new_singleton(&mut arena, 3);
        link_before(&mut arena, a, b); // ring: a, b
        link_before(&mut arena, a, c); // ring: a, b, c
        assert_eq!(ring_of(&arena, a), vec![1, 2, 3]);
        assert_eq!(arena[a].prev, c);
        assert_eq!(arena[b].next, c);
    }

    #[test]
    fn unlink_closes_the_gap() {
        let mut arena = Arena::default();
        let a = new_singleton(&mut arena, 1);
        let b = new_singleton(&mut arena, 2);
        let c = new_singleton(&mut arena, 3);
        link_before(&mut arena, a, b);
        link_before(&mut arena, a, c);
        unlink(&mut arena, b);
        assert_eq!(ring_of(&arena, a), vec![1, 3]);
        assert_eq!(arena[b].next, b);
        assert_eq!(arena[b].prev, b);
    }

    #[test]
    fn unlink_solo_is_a_noop() {
        let mut arena = Arena::default();
        let a = new_singleton(&mut arena, 1);
        unlink(&mut arena, a);
        assert_eq!(arena[a].next, a);
        assert_eq!(arena[a].prev, a);
    }
}
