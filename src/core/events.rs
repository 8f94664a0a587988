//! Frame events emitted by behaviours
//!
//! Behaviours push [`GameEvent`]s while they update. The queue is
//! double-buffered: events written during frame N become readable in frame
//! N+1, after the host calls [`EventQueue::swap`] at the frame boundary.
//!
//! ```ignore
//! // Inside a trigger
//! ctx.events.push(GameEvent::ColliderTriggered { trigger, other });
//!
//! // Next frame, in game code
//! for event in ctx.events.iter() {
//!     if let GameEvent::ColliderTriggered { other, .. } = event {
//!         open_door(*other);
//!     }
//! }
//! ```

use std::collections::VecDeque;

use glam::Vec3;
use hecs::Entity;

// ============================================================================
// Event Types
// ============================================================================

/// Game events for inter-system communication.
///
/// Behaviours push events describing what happened this frame. Consumers
/// (game logic, logging, effects) read them on the next frame without being
/// coupled to the behaviour that produced them.
///
/// # Extensibility
///
/// The `#[non_exhaustive]` attribute allows adding new variants without
/// breaking downstream code that uses wildcard patterns.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum GameEvent {
    // -------------------------------------------------------------------------
    // Trigger Events
    // -------------------------------------------------------------------------
    /// A tagged entity entered a collider trigger.
    ColliderTriggered {
        /// Entity owning the trigger
        trigger: Entity,
        /// Entity that entered the volume
        other: Entity,
    },

    /// A raycast trigger hit something.
    RayHit {
        /// Entity owning the trigger
        trigger: Entity,
        /// Entity attached to the hit collider, if any
        hit: Option<Entity>,
        /// World-space hit point
        point: Vec3,
        /// Distance from the ray origin
        distance: f32,
    },

    // -------------------------------------------------------------------------
    // Movement Events
    // -------------------------------------------------------------------------
    /// A mover was ordered to start moving.
    MovementStarted {
        /// The moving entity
        entity: Entity,
    },

    /// A mover was ordered to stop moving.
    MovementStopped {
        /// The moving entity
        entity: Entity,
    },

    // -------------------------------------------------------------------------
    // Spawner Events
    // -------------------------------------------------------------------------
    /// A spawner produced an item.
    ItemSpawned {
        /// Entity owning the spawner
        spawner: Entity,
        /// The spawned item
        item: Entity,
    },

    /// An item was handed back to a pooled spawner.
    ItemReleased {
        /// Entity owning the spawner
        spawner: Entity,
        /// The released item
        item: Entity,
    },
}

// ============================================================================
// Event Queue
// ============================================================================

/// Double-buffered queue of [`GameEvent`]s.
#[derive(Debug)]
pub struct EventQueue {
    /// Events being written this frame
    pending: VecDeque<GameEvent>,
    /// Events from the previous frame
    processing: VecDeque<GameEvent>,
}

impl EventQueue {
    const DEFAULT_CAPACITY: usize = 64;

    /// Create a new event queue with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a new event queue with the given initial capacity per buffer.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(capacity),
            processing: VecDeque::with_capacity(capacity),
        }
    }

    /// Push an event; it becomes visible after the next `swap()`.
    #[inline]
    pub fn push(&mut self, event: GameEvent) {
        self.pending.push_back(event);
    }

    /// Make this frame's events readable and start a fresh pending buffer.
    ///
    /// Events from the previous frame that were never read are dropped.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.pending, &mut self.processing);
        self.pending.clear();
    }

    /// Iterate over events from the previous frame.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.processing.iter()
    }

    /// Take ownership of events from the previous frame.
    #[inline]
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.processing.drain(..)
    }

    /// Iterate over events pushed this frame, before they are swapped in.
    ///
    /// Mostly useful in tests that inspect what a single update emitted.
    #[inline]
    pub fn pending(&self) -> impl Iterator<Item = &GameEvent> {
        self.pending.iter()
    }

    /// Check if there are any readable events
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.processing.is_empty()
    }

    /// Number of readable events
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.processing.len()
    }

    /// Number of events waiting for the next swap
    #[must_use]
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Drop every event, readable or pending.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.processing.clear();
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
