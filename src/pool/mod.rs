//! Object Pool with Lifecycle Hooks
//!
//! [`ObjectPool`] keeps released items around for reuse instead of
//! destroying and recreating them. What "creating", "activating",
//! "deactivating" and "destroying" an item means is decided by the owner
//! through a [`PoolLifecycle`] implementation passed to each call.
//!
//! # Rules
//!
//! - `acquire` reuses the most recently released idle item, or creates one
//! - `release` keeps the item only while fewer than `max_retained` items are
//!   idle, otherwise destroys it
//! - Active items are counted but not tracked; the caller owns them until it
//!   releases them
//!
//! # Example
//!
//! ```ignore
//! let mut pool = ObjectPool::new(16);
//! let bullet = pool.acquire(&mut hooks);
//! // ... later
//! pool.release(&mut hooks, bullet);
//! ```

use std::fmt;

// ============================================================================
// Lifecycle Hooks
// ============================================================================

/// Callbacks a pool invokes on its items.
///
/// Only `create` is required. The default activate/deactivate hooks do
/// nothing and the default destroy hook simply drops the item.
pub trait PoolLifecycle<T> {
    /// Produce a brand new item, in its inactive state.
    fn create(&mut self) -> T;

    /// Called whenever an item is handed out, new or reused.
    fn on_acquire(&mut self, _item: &mut T) {}

    /// Called whenever an item comes back to the pool.
    fn on_release(&mut self, _item: &mut T) {}

    /// Called for items the pool will not keep.
    fn on_destroy(&mut self, item: T) {
        drop(item);
    }
}

// ============================================================================
// Pool Statistics
// ============================================================================

/// Snapshot of pool counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    /// Items currently owned by callers
    pub active: usize,
    /// Items waiting for reuse
    pub idle: usize,
    /// Items created over the pool's lifetime
    pub created: u64,
    /// Items destroyed over the pool's lifetime
    pub destroyed: u64,
}

impl PoolStats {
    /// Active plus idle
    #[must_use]
    pub const fn all(&self) -> usize {
        self.active + self.idle
    }
}

impl fmt::Display for PoolStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pool: {} items ({} active, {} idle) | created {} | destroyed {}",
            self.all(),
            self.active,
            self.idle,
            self.created,
            self.destroyed
        )
    }
}

// ============================================================================
// Object Pool
// ============================================================================

/// Bounded pool of reusable items.
///
/// | Operation | Time Complexity |
/// |-----------|-----------------|
/// | `acquire` | O(1) amortized  |
/// | `release` | O(1) amortized  |
/// | counts    | O(1)            |
#[derive(Debug)]
pub struct ObjectPool<T> {
    /// Items available for reuse, most recently released last
    idle: Vec<T>,
    /// Upper bound on `idle.len()`
    max_retained: usize,
    /// Number of items handed out and not yet released
    active: usize,
    created: u64,
    destroyed: u64,
}

impl<T> ObjectPool<T> {
    /// Create an empty pool that retains at most `max_retained` idle items.
    #[must_use]
    pub fn new(max_retained: usize) -> Self {
        Self::with_capacity(0, max_retained)
    }

    /// Create an empty pool with room reserved for `capacity` idle items.
    #[must_use]
    pub fn with_capacity(capacity: usize, max_retained: usize) -> Self {
        Self {
            idle: Vec::with_capacity(capacity.min(max_retained)),
            max_retained,
            active: 0,
            created: 0,
            destroyed: 0,
        }
    }

    /// Hand out an item, reusing an idle one when possible.
    ///
    /// Never fails: when no idle item exists a new one is created.
    pub fn acquire<H: PoolLifecycle<T>>(&mut self, hooks: &mut H) -> T {
        let mut item = match self.idle.pop() {
            Some(item) => item,
            None => {
                self.created += 1;
                hooks.create()
            }
        };

        hooks.on_acquire(&mut item);
        self.active += 1;
        item
    }

    /// Take an item back.
    ///
    /// The item is deactivated, then kept for reuse if the idle set has room,
    /// otherwise destroyed. Releasing an item this pool never handed out is
    /// not detected.
    pub fn release<H: PoolLifecycle<T>>(&mut self, hooks: &mut H, mut item: T) {
        hooks.on_release(&mut item);
        self.active = self.active.saturating_sub(1);

        if self.idle.len() < self.max_retained {
            self.idle.push(item);
        } else {
            self.destroyed += 1;
            hooks.on_destroy(item);
        }
    }

    /// Fill the idle set ahead of time.
    ///
    /// Acquires `count` items then releases them in acquisition order, so no
    /// item is left active. Items beyond `max_retained` are destroyed.
    pub fn prewarm<H: PoolLifecycle<T>>(&mut self, hooks: &mut H, count: usize) {
        let items: Vec<T> = (0..count).map(|_| self.acquire(hooks)).collect();
        for item in items {
            self.release(hooks, item);
        }
    }

    /// Destroy every idle item. Active items are unaffected.
    pub fn clear<H: PoolLifecycle<T>>(&mut self, hooks: &mut H) {
        for item in self.idle.drain(..) {
            self.destroyed += 1;
            hooks.on_destroy(item);
        }
    }

    /// Tear the pool down.
    ///
    /// Destroys every idle item plus the active items the caller still
    /// holds, then resets the active count.
    pub fn dispose<H, I>(&mut self, hooks: &mut H, active: I)
    where
        H: PoolLifecycle<T>,
        I: IntoIterator<Item = T>,
    {
        self.clear(hooks);
        for item in active {
            self.destroyed += 1;
            hooks.on_destroy(item);
        }
        self.active = 0;
    }

    /// Active plus idle items
    #[must_use]
    #[inline]
    pub fn count_all(&self) -> usize {
        self.active + self.idle.len()
    }

    /// Items handed out and not yet released
    #[must_use]
    #[inline]
    pub const fn count_active(&self) -> usize {
        self.active
    }

    /// Items waiting for reuse
    #[must_use]
    #[inline]
    pub fn count_idle(&self) -> usize {
        self.idle.len()
    }

    /// Items waiting for reuse, most recently released last
    #[must_use]
    #[inline]
    pub fn idle(&self) -> &[T] {
        &self.idle
    }

    /// Maximum number of idle items kept
    #[must_use]
    #[inline]
    pub const fn max_retained(&self) -> usize {
        self.max_retained
    }

    /// Snapshot of the pool counters
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            active: self.active,
            idle: self.idle.len(),
            created: self.created,
            destroyed: self.destroyed,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Items are numbered by creation order; hooks record what happened.
    #[derive(Debug, Default)]
    struct Recorder {
        next_id: u32,
        created: Vec<u32>,
        acquired: Vec<u32>,
        released: Vec<u32>,
        destroyed: Vec<u32>,
    }

    #[derive(Debug, PartialEq)]
    struct Item {
        id: u32,
        active: bool,
        hits: u32,
    }

    impl PoolLifecycle<Item> for Recorder {
        fn create(&mut self) -> Item {
            let id = self.next_id;
            self.next_id += 1;
            self.created.push(id);
            Item {
                id,
                active: false,
                hits: 0,
            }
        }

        fn on_acquire(&mut self, item: &mut Item) {
            item.active = true;
            self.acquired.push(item.id);
        }

        fn on_release(&mut self, item: &mut Item) {
            item.active = false;
            self.released.push(item.id);
        }

        fn on_destroy(&mut self, item: Item) {
            self.destroyed.push(item.id);
        }
    }

    fn assert_counts(pool: &ObjectPool<Item>) {
        assert_eq!(pool.count_all(), pool.count_active() + pool.count_idle());
        assert!(pool.count_idle() <= pool.max_retained());
    }

    #[test]
    fn test_acquire_creates_then_reuses() {
        let mut pool = ObjectPool::new(4);
        let mut hooks = Recorder::default();

        let item = pool.acquire(&mut hooks);
        assert!(item.active);
        assert_eq!(hooks.created, vec![0]);
        pool.release(&mut hooks, item);
        assert_eq!(pool.count_idle(), 1);

        let again = pool.acquire(&mut hooks);
        assert_eq!(again.id, 0, "Idle item should be reused");
        assert_eq!(hooks.created.len(), 1);
        assert_eq!(hooks.acquired, vec![0, 0]);
        assert_counts(&pool);
    }

    #[test]
    fn test_reused_item_keeps_state() {
        let mut pool = ObjectPool::new(1);
        let mut hooks = Recorder::default();

        let mut item = pool.acquire(&mut hooks);
        item.hits = 3;
        pool.release(&mut hooks, item);

        let item = pool.acquire(&mut hooks);
        assert_eq!(item.hits, 3);
    }

    #[test]
    fn test_release_at_capacity_destroys() {
        let mut pool = ObjectPool::new(2);
        let mut hooks = Recorder::default();

        let items: Vec<_> = (0..3).map(|_| pool.acquire(&mut hooks)).collect();
        for item in items {
            pool.release(&mut hooks, item);
            assert_counts(&pool);
        }

        assert_eq!(pool.count_idle(), 2);
        assert_eq!(hooks.destroyed, vec![2]);
        assert_eq!(hooks.released, vec![0, 1, 2], "Deactivate runs before destroy");
        assert_eq!(pool.count_all(), 2);
    }

    #[test]
    fn test_zero_retention_destroys_everything() {
        let mut pool = ObjectPool::new(0);
        let mut hooks = Recorder::default();

        let a = pool.acquire(&mut hooks);
        let b = pool.acquire(&mut hooks);
        pool.release(&mut hooks, a);
        pool.release(&mut hooks, b);

        assert_eq!(pool.count_idle(), 0);
        assert_eq!(pool.count_all(), 0);
        assert_eq!(hooks.destroyed, vec![0, 1]);
    }

    #[test]
    fn test_n_releases_satisfy_n_acquires() {
        let mut pool = ObjectPool::new(10);
        let mut hooks = Recorder::default();

        let items: Vec<_> = (0..4).map(|_| pool.acquire(&mut hooks)).collect();
        for item in items {
            pool.release(&mut hooks, item);
        }
        assert_eq!(hooks.created.len(), 4);

        let mut held = Vec::new();
        for _ in 0..4 {
            held.push(pool.acquire(&mut hooks));
            assert_eq!(hooks.created.len(), 4, "Reuse must not create");
        }
        held.push(pool.acquire(&mut hooks));
        assert_eq!(hooks.created.len(), 5, "Fifth acquire creates");
        assert_eq!(pool.count_active(), 5);
        assert_counts(&pool);
    }

    #[test]
    fn test_reuse_is_lifo() {
        let mut pool = ObjectPool::new(10);
        let mut hooks = Recorder::default();

        let a = pool.acquire(&mut hooks);
        let b = pool.acquire(&mut hooks);
        pool.release(&mut hooks, a);
        pool.release(&mut hooks, b);

        assert_eq!(pool.acquire(&mut hooks).id, 1);
        assert_eq!(pool.acquire(&mut hooks).id, 0);
    }

    #[test]
    fn test_prewarm_fills_idle_only() {
        let mut pool = ObjectPool::new(10);
        let mut hooks = Recorder::default();

        pool.prewarm(&mut hooks, 5);

        assert_eq!(pool.count_idle(), 5);
        assert_eq!(pool.count_active(), 0);
        assert_eq!(hooks.created, vec![0, 1, 2, 3, 4]);
        assert_eq!(hooks.released, vec![0, 1, 2, 3, 4]);
        assert!(hooks.destroyed.is_empty());
    }

    #[test]
    fn test_prewarm_beyond_capacity() {
        let mut pool = ObjectPool::new(3);
        let mut hooks = Recorder::default();

        pool.prewarm(&mut hooks, 5);

        assert_eq!(pool.count_idle(), 3);
        assert_eq!(hooks.destroyed, vec![3, 4]);
        assert_counts(&pool);
    }

    #[test]
    fn test_dispose_destroys_idle_and_active() {
        let mut pool = ObjectPool::new(10);
        let mut hooks = Recorder::default();

        pool.prewarm(&mut hooks, 2);
        let held = vec![pool.acquire(&mut hooks), pool.acquire(&mut hooks), pool.acquire(&mut hooks)];
        let back = pool.acquire(&mut hooks);
        pool.release(&mut hooks, back);

        pool.dispose(&mut hooks, held);

        assert_eq!(pool.count_all(), 0);
        let mut destroyed = hooks.destroyed.clone();
        destroyed.sort_unstable();
        assert_eq!(destroyed, vec![0, 1, 2, 3]);
        assert_eq!(pool.stats().destroyed, 4);
    }

    #[test]
    fn test_clear_keeps_active_count() {
        let mut pool = ObjectPool::new(10);
        let mut hooks = Recorder::default();

        pool.prewarm(&mut hooks, 3);
        let _held = pool.acquire(&mut hooks);
        pool.clear(&mut hooks);

        assert_eq!(pool.count_idle(), 0);
        assert_eq!(pool.count_active(), 1);
    }

    #[test]
    fn test_stats_display() {
        let mut pool = ObjectPool::new(10);
        let mut hooks = Recorder::default();
        pool.prewarm(&mut hooks, 2);
        let _held = pool.acquire(&mut hooks);

        let stats = pool.stats();
        assert_eq!(stats.all(), 2);
        assert_eq!(
            stats.to_string(),
            "Pool: 2 items (1 active, 1 idle) | created 2 | destroyed 0"
        );
    }

    #[test]
    fn test_invariant_over_mixed_sequence() {
        let mut pool = ObjectPool::new(3);
        let mut hooks = Recorder::default();
        let mut held = Vec::new();

        // Deterministic mix of acquires and releases
        for step in 0..40u32 {
            if step % 3 == 2 || held.is_empty() {
                held.push(pool.acquire(&mut hooks));
            } else if let Some(item) = held.pop() {
                pool.release(&mut hooks, item);
            }
            if step % 7 == 0 {
                held.push(pool.acquire(&mut hooks));
            }
            assert_counts(&pool);
            assert_eq!(pool.count_active(), held.len());
        }
    }
}
