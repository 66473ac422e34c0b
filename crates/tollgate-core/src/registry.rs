//! Client identity to bucket map.
//!
//! Buckets are created lazily the first time a client is seen and then live
//! as long as the registry. One mutex guards the map itself; bucket counters
//! have their own locks, so handing out an `Arc<Bucket>` lets callers consume
//! and refill without touching the map again.

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::bucket::Bucket;
use crate::identity::ClientIdentity;

type BucketMap = HashMap<ClientIdentity, Arc<Bucket>>;

/// Shared registry of per-client buckets.
#[derive(Debug)]
pub struct Registry {
    capacity: NonZeroU32,
    buckets: Mutex<BucketMap>,
}

impl Registry {
    /// Create an empty registry whose buckets hold `capacity` tokens.
    pub fn new(capacity: NonZeroU32) -> Self {
        Self {
            capacity,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Return the bucket for `identity`, inserting a full one on first sight.
    ///
    /// Lookup and insertion happen under one lock acquisition, so concurrent
    /// first calls for the same identity all receive the same bucket.
    pub fn get_or_create(&self, identity: &ClientIdentity) -> Arc<Bucket> {
        let mut buckets = self.lock();
        if let Some(bucket) = buckets.get(identity) {
            return Arc::clone(bucket);
        }

        let bucket = Arc::new(Bucket::new(self.capacity));
        buckets.insert(identity.clone(), Arc::clone(&bucket));
        debug!(client = %identity, tracked = buckets.len(), "Created bucket for new client");
        bucket
    }

    /// Bucket for `identity` if it has been seen before.
    pub fn get(&self, identity: &ClientIdentity) -> Option<Arc<Bucket>> {
        self.lock().get(identity).cloned()
    }

    /// Apply `visit` to every bucket, holding the map lock for the whole
    /// traversal. Insertions wait until the walk is done.
    ///
    /// `visit` must not call back into this registry.
    pub fn for_each_bucket<F>(&self, mut visit: F)
    where
        F: FnMut(&Bucket),
    {
        let buckets = self.lock();
        for bucket in buckets.values() {
            visit(bucket);
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Capacity given to every new bucket.
    pub fn capacity(&self) -> NonZeroU32 {
        self.capacity
    }

    fn lock(&self) -> MutexGuard<'_, BucketMap> {
        self.buckets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
