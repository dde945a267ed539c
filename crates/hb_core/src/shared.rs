//! Shared Match Handle
//!
//! Multi-threaded hosts hold one `SharedMatch` per match; every read and
//! mutation goes through the same mutex.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::clock::{SystemWallClock, WallClock};
use crate::engine::Match;

#[derive(Debug)]
pub struct SharedMatch<C: WallClock = SystemWallClock> {
    inner: Arc<Mutex<Match<C>>>,
}

impl<C: WallClock> Clone for SharedMatch<C> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<C: WallClock> SharedMatch<C> {
    pub fn new(m: Match<C>) -> Self {
        Self { inner: Arc::new(Mutex::new(m)) }
    }

    /// Locks the match. A poisoned lock is recovered: mutations commit only
    /// after all their checks pass, so the state behind it is consistent.
    pub fn lock(&self) -> MutexGuard<'_, Match<C>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Runs `f` with the match locked.
    pub fn with<R>(&self, f: impl FnOnce(&mut Match<C>) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }
}
