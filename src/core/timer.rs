//! Cancellable Repeating Timers
//!
//! Timers replace suspend-and-resume loops: a behaviour starts a repeating
//! timer, keeps the returned [`TimerHandle`], and drains the number of
//! firings that happened since its last update.
//!
//! # Design Principles
//!
//! - **Single Thread**: Timers are ticked by the host on the same thread that
//!   updates behaviours, so no locking is involved
//! - **Generational Handles**: A cancelled handle never aliases a timer that
//!   later reuses the same slot
//! - **Exact Time**: Intervals are `Duration`s, firings never drift
//!
//! # Example
//!
//! ```ignore
//! let mut timers = Timers::new();
//! let handle = timers.start_repeating(Duration::from_secs(1)).unwrap();
//!
//! timers.tick(Duration::from_millis(2500));
//! assert_eq!(timers.take_fired(handle), 2);
//!
//! timers.cancel(handle);
//! ```

use std::time::Duration;

// ============================================================================
// Timer Handle
// ============================================================================

/// Handle to a repeating timer.
///
/// Stays valid until the timer is cancelled. Stale handles are ignored by
/// every `Timers` method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    index: usize,
    generation: u32,
}

// ============================================================================
// Timer Slot
// ============================================================================

#[derive(Debug)]
struct RepeatingTimer {
    interval: Duration,
    /// Time accumulated towards the next firing
    elapsed: Duration,
    /// Firings not yet drained by the owner
    pending: u32,
}

#[derive(Debug)]
enum SlotState {
    Running(RepeatingTimer),
    /// Points to the next free slot (or `Timers::NONE`)
    Vacant(usize),
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    state: SlotState,
}

// ============================================================================
// Timers
// ============================================================================

/// Set of repeating timers ticked once per frame.
///
/// Slots are recycled through a free list, so starting and cancelling timers
/// at runtime does not grow the storage.
#[derive(Debug)]
pub struct Timers {
    slots: Vec<Slot>,
    free_head: usize,
    running: usize,
}

impl Timers {
    /// Sentinel value indicating end of free list.
    const NONE: usize = usize::MAX;

    /// Create an empty timer set
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: Self::NONE,
            running: 0,
        }
    }

    /// Start a timer that fires every `interval`, first firing one interval
    /// from now.
    ///
    /// Returns `None` for a zero interval, which could never make progress.
    pub fn start_repeating(&mut self, interval: Duration) -> Option<TimerHandle> {
        if interval.is_zero() {
            log::warn!("Refusing to start a repeating timer with a zero interval");
            return None;
        }

        let timer = RepeatingTimer {
            interval,
            elapsed: Duration::ZERO,
            pending: 0,
        };
        self.running += 1;

        if self.free_head != Self::NONE {
            let index = self.free_head;
            let slot = &mut self.slots[index];
            if let SlotState::Vacant(next) = slot.state {
                self.free_head = next;
            }
            slot.state = SlotState::Running(timer);

            Some(TimerHandle {
                index,
                generation: slot.generation,
            })
        } else {
            let index = self.slots.len();
            self.slots.push(Slot {
                generation: 0,
                state: SlotState::Running(timer),
            });

            Some(TimerHandle {
                index,
                generation: 0,
            })
        }
    }

    /// Cancel a timer, discarding firings that were not drained yet.
    ///
    /// Returns `false` if the handle was already cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        if self.timer(handle).is_none() {
            return false;
        }

        let slot = &mut self.slots[handle.index];
        slot.generation = slot.generation.wrapping_add(1);
        slot.state = SlotState::Vacant(self.free_head);
        self.free_head = handle.index;
        self.running -= 1;

        true
    }

    /// Check whether a handle refers to a running timer
    #[must_use]
    pub fn is_running(&self, handle: TimerHandle) -> bool {
        self.timer(handle).is_some()
    }

    /// Advance every running timer by `delta`.
    pub fn tick(&mut self, delta: Duration) {
        for slot in &mut self.slots {
            if let SlotState::Running(timer) = &mut slot.state {
                timer.elapsed += delta;
                while timer.elapsed >= timer.interval {
                    timer.elapsed -= timer.interval;
                    timer.pending += 1;
                }
            }
        }
    }

    /// Drain the number of firings since the last call.
    ///
    /// Stale handles report zero.
    pub fn take_fired(&mut self, handle: TimerHandle) -> u32 {
        match self.timer_mut(handle) {
            Some(timer) => std::mem::take(&mut timer.pending),
            None => 0,
        }
    }

    /// Number of running timers
    #[must_use]
    #[inline]
    pub const fn len(&self) -> usize {
        self.running
    }

    /// Check whether no timer is running
    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.running == 0
    }

    fn timer(&self, handle: TimerHandle) -> Option<&RepeatingTimer> {
        let slot = self.slots.get(handle.index)?;
        match &slot.state {
            SlotState::Running(timer) if slot.generation == handle.generation => Some(timer),
            _ => None,
        }
    }

    fn timer_mut(&mut self, handle: TimerHandle) -> Option<&mut RepeatingTimer> {
        let slot = self.slots.get_mut(handle.index)?;
        match &mut slot.state {
            SlotState::Running(timer) if slot.generation == handle.generation => Some(timer),
            _ => None,
        }
    }
}

impl Default for Timers {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
