//! Bounded free lists for reusable objects.
//!
//! A pool is a bounded MPMC channel used as a lock-free stack of idle objects.
//! Taking from an empty pool or giving to a full one never blocks: the caller
//! allocates a fresh object or the surplus object is dropped.

use crossbeam_channel::{bounded, Receiver, Sender};

/// Upper bound on idle objects kept per pool.
pub(crate) const POOL_CAPACITY: usize = 256;

pub(crate) struct Pool<T> {
    sender: Sender<T>,
    receiver: Receiver<T>,
}

impl<T> Pool<T> {
    pub(crate) fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Take an idle object, if any. The caller is responsible for resetting it.
    #[inline]
    pub(crate) fn take(&self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    /// Return an object. Dropped when the pool is already full.
    #[inline]
    pub(crate) fn give(&self, item: T) {
        let _ = self.sender.try_send(item);
    }

    #[cfg(test)]
    pub(crate) fn idle(&self) -> usize {
        self.receiver.len()
    }
}
