//! Bounded token counter.
//!
//! A bucket starts full and hands out one token per admitted request. The
//! refill task tops it back up, never past its capacity. The counter sits
//! behind the bucket's own mutex so callers never need the registry lock.

use std::num::NonZeroU32;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{Result, TollgateError};

/// A single client's token bucket.
#[derive(Debug)]
pub struct Bucket {
    capacity: u32,
    tokens: Mutex<u32>,
}

impl Bucket {
    /// Create a full bucket holding `capacity` tokens.
    pub fn new(capacity: NonZeroU32) -> Self {
        Self {
            capacity: capacity.get(),
            tokens: Mutex::new(capacity.get()),
        }
    }

    /// Create a full bucket, rejecting a zero capacity.
    pub fn try_new(capacity: u32) -> Result<Self> {
        NonZeroU32::new(capacity)
            .map(Self::new)
            .ok_or(TollgateError::InvalidCapacity)
    }

    /// Add one token unless the bucket is already full.
    pub fn refill(&self) {
        self.refill_by(1);
    }

    /// Add `amount` tokens, saturating at capacity.
    pub fn refill_by(&self, amount: u32) {
        let mut tokens = self.lock();
        *tokens = tokens.saturating_add(amount).min(self.capacity);
    }

    /// Take one token. Returns `false`, leaving the bucket untouched, when
    /// it is empty.
    pub fn consume(&self) -> bool {
        let mut tokens = self.lock();
        if *tokens > 0 {
            *tokens -= 1;
            true
        } else {
            false
        }
    }

    /// Tokens currently available. Only a snapshot under concurrency.
    pub fn tokens(&self) -> u32 {
        *self.lock()
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.tokens() == self.capacity
    }

    // Nothing panics while the guard is held, so a poisoned lock still
    // holds a valid count.
    fn lock(&self) -> MutexGuard<'_, u32> {
        self.tokens.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;

    fn bucket(capacity: u32) -> Bucket {
        Bucket::try_new(capacity).unwrap()
    }

    #[test]
    fn test_new_bucket_starts_full() {
        let b = bucket(10);
        assert_eq!(b.capacity(), 10);
        assert_eq!(b.tokens(), 10);
        assert!(b.is_full());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            Bucket::try_new(0),
            Err(TollgateError::InvalidCapacity)
        ));
    }

    #[test]
    fn test_admits_exactly_capacity_then_rejects() {
        let b = bucket(5);
        for _ in 0..5 {
            assert!(b.consume());
        }
        assert!(!b.consume());
        assert_eq!(b.tokens(), 0);
    }

    #[test]
    fn test_rejected_consume_leaves_state_unchanged() {
        let b = bucket(1);
        assert!(b.consume());
        assert!(!b.consume());
        assert!(!b.consume());
        assert_eq!(b.tokens(), 0);
    }

    #[test]
    fn test_refill_after_exhaustion_admits_one() {
        let b = bucket(3);
        while b.consume() {}

        b.refill();
        assert!(b.consume());
        assert!(!b.consume());
    }

    #[test]
    fn test_refill_full_bucket_is_noop() {
        let b = bucket(4);
        b.refill();
        b.refill_by(100);
        assert_eq!(b.tokens(), 4);
    }

    #[test]
    fn test_refill_by_saturates_at_capacity() {
        let b = bucket(10);
        for _ in 0..8 {
            b.consume();
        }
        b.refill_by(5);
        assert_eq!(b.tokens(), 7);
        b.refill_by(u32::MAX);
        assert_eq!(b.tokens(), 10);
    }

    #[test]
    fn test_tokens_stay_in_range_for_mixed_sequence() {
        let b = bucket(3);
        // Deterministic pseudo-random walk over consume/refill.
        let mut seed: u32 = 0x9e37_79b9;
        for _ in 0..10_000 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            match seed % 3 {
                0 => b.refill(),
                1 => b.refill_by(seed % 4),
                _ => {
                    b.consume();
                }
            }
            assert!(b.tokens() <= b.capacity());
        }
    }

    #[test]
    fn test_parallel_consume_never_over_admits() {
        const THREADS: usize = 64;
        const TOKENS: u32 = 20;

        let b = Arc::new(bucket(TOKENS));
        let admitted = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let b = Arc::clone(&b);
                let admitted = Arc::clone(&admitted);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    if b.consume() {
                        admitted.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(admitted.load(Ordering::SeqCst), TOKENS as usize);
        assert_eq!(b.tokens(), 0);
    }

    #[test]
    fn test_parallel_consume_and_refill_stay_bounded() {
        let b = Arc::new(bucket(8));
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let b = Arc::clone(&b);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for _ in 0..1_000 {
                        if i % 2 == 0 {
                            b.consume();
                        } else {
                            b.refill();
                        }
                        assert!(b.tokens() <= 8);
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }
        assert!(b.tokens() <= b.capacity());
    }
}
