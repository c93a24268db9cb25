//! An arena-backed Fibonacci heap over integer keys.
//!
//! This crate provides the canonical amortized-cost-bearing mergeable
//! priority queue, with lazy consolidation and cascading cuts:
//!
//! - **insert / meld / find-min / decrease-key**: O(1) amortized
//! - **delete-min / delete**: O(log n) amortized
//!
//! Nodes live in a slotmap arena, so every structural link is a stable
//! generational key instead of an owning pointer; stale handles are
//! detected rather than dereferenced. The arena is shared by every heap
//! on the thread, which keeps meld an O(1) ring splice and lets handles
//! survive it. On top of the heap sit a
//! k-smallest extractor ([`k_min`]), link/cut statistics for
//! amortized-cost accounting ([`FibonacciHeap::potential`]), a
//! structural-invariant verifier ([`validate::verify`]), and a diagnostic
//! tree printer ([`printer::render`]).
//!
//! # Example
//!
//! ```rust
//! use fibonacci_heap::FibonacciHeap;
//!
//! let mut heap = FibonacciHeap::new();
//! let item = heap.insert(5);
//! heap.insert(3);
//! heap.decrease_key(item, 4).unwrap(); // 5 -> 1
//! let min = heap.find_min().unwrap();
//! assert_eq!(heap.key(min), Some(1));
//! assert_eq!(heap.delete_min().unwrap(), 1);
//! ```

pub mod heap;
pub mod kmin;
pub mod node;
pub mod printer;
pub mod validate;

pub use heap::{FibonacciHeap, HeapError, HeapStats};
pub use kmin::k_min;
pub use node::NodeId;
