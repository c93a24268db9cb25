//! Stress tests: large shuffled workloads with periodic structural
//! validation, to catch edge cases that only surface under load.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use fibonacci_heap::validate::verify;
use fibonacci_heap::{FibonacciHeap, NodeId};

fn shuffled(n: i64, rng: &mut StdRng) -> Vec<i64> {
    let mut keys: Vec<i64> = (0..n).collect();
    keys.shuffle(rng);
    keys
}

#[test]
fn shuffled_insert_then_drain_sorted() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let keys = shuffled(10_000, &mut rng);

    let mut heap = FibonacciHeap::new();
    for &key in &keys {
        heap.insert(key);
    }
    verify(&heap).unwrap();

    for expected in 0..10_000 {
        assert_eq!(heap.delete_min(), Ok(expected));
        if expected % 500 == 0 {
            verify(&heap).unwrap();
        }
    }
    assert!(heap.is_empty());
}

#[test]
fn decrease_key_storm_keeps_order() {
    let mut rng = StdRng::seed_from_u64(0xfeed);
    let mut heap = FibonacciHeap::new();

    // Keys spaced out so decreases never collide with each other.
    let mut handles: Vec<(NodeId, i64)> = (0..2_000)
        .map(|i| {
            let key = i * 1_000;
            (heap.insert(key), key)
        })
        .collect();
    heap.delete_min().unwrap();
    handles.remove(0);

    for step in 0..5_000 {
        let idx = rng.gen_range(0..handles.len());
        let delta = rng.gen_range(1..500);
        let (id, key) = handles[idx];
        heap.decrease_key(id, delta).unwrap();
        handles[idx] = (id, key - delta);
        if step % 250 == 0 {
            verify(&heap).unwrap();
        }
    }

    let mut expected: Vec<i64> = handles.iter().map(|&(_, k)| k).collect();
    expected.sort_unstable();
    for want in expected {
        assert_eq!(heap.delete_min(), Ok(want));
    }
}

#[test]
fn meld_chain_drains_in_order() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut combined = FibonacciHeap::new();
    let mut all_keys = Vec::new();

    for chunk in 0..8 {
        let mut piece = FibonacciHeap::new();
        let mut piece_entries: Vec<(NodeId, i64)> = Vec::with_capacity(512);
        for _ in 0..512 {
            let key = rng.gen_range(-100_000..100_000);
            piece_entries.push((piece.insert(key), key));
        }
        if chunk % 3 == 0 {
            // Give some operands internal structure before melding.
            let popped = piece.delete_min().unwrap();
            let pos = piece_entries.iter().position(|&(_, k)| k == popped).unwrap();
            piece_entries.remove(pos);
        }
        all_keys.extend(piece_entries.iter().map(|&(_, k)| k));
        combined.meld(piece);
        verify(&combined).unwrap();

        // Absorbed nodes stay addressable through their original handles.
        for &(id, key) in piece_entries.iter().take(3) {
            if combined.key(id) == Some(key) {
                combined.decrease_key(id, 37).unwrap();
                let pos = all_keys.iter().position(|&k| k == key).unwrap();
                all_keys[pos] = key - 37;
            }
        }
    }

    all_keys.sort_unstable();
    for want in all_keys {
        assert_eq!(combined.delete_min(), Ok(want));
    }
    assert!(combined.is_empty());
}

#[test]
fn interleaved_delete_and_delete_min() {
    let mut rng = StdRng::seed_from_u64(99);
    let keys = shuffled(3_000, &mut rng);

    let mut heap = FibonacciHeap::new();
    let mut handles = Vec::with_capacity(keys.len());
    for &key in &keys {
        handles.push((heap.insert(key), key));
    }
    heap.delete_min().unwrap();

    // Delete a third of the surviving nodes by handle.
    let mut removed = vec![0i64]; // delete_min took key 0
    for &(id, key) in handles.iter().filter(|&&(_, k)| k != 0).step_by(3) {
        heap.delete(id).unwrap();
        removed.push(key);
    }
    verify(&heap).unwrap();

    let mut expected: Vec<i64> = (0..3_000).filter(|k| !removed.contains(k)).collect();
    expected.sort_unstable();
    assert_eq!(heap.len(), expected.len());
    for want in expected {
        assert_eq!(heap.delete_min(), Ok(want));
    }
}
