//! Behaviour lifecycle
//!
//! A behaviour is a small piece of per-entity logic, attached to an owning
//! entity and driven by the host's per-frame tick:
//!
//! 1. `init()` - once, before the first update
//! 2. `update()` - every frame while alive
//! 3. `on_destroy()` - once, when removed or when the behaviour reports itself dead

use std::fmt;

use super::engine::EngineContext;

/// Per-entity logic driven by the host.
pub trait Behaviour {
    /// Behaviour name for logging.
    fn name(&self) -> &'static str;

    /// Called once before the first `update()`.
    fn init(&mut self, _ctx: &mut EngineContext) {}

    /// Called every frame.
    fn update(&mut self, ctx: &mut EngineContext);

    /// Called once when the behaviour is removed.
    fn on_destroy(&mut self, _ctx: &mut EngineContext) {}

    /// Returning `false` asks the container to destroy this behaviour.
    fn is_alive(&self) -> bool {
        true
    }
}

struct Slot {
    behaviour: Box<dyn Behaviour>,
    initialized: bool,
}

/// Ordered collection of behaviours.
///
/// Behaviours are initialized lazily on the first `update()` after being added,
/// updated in insertion order, and destroyed as soon as they report
/// themselves dead.
#[derive(Default)]
pub struct Behaviours {
    slots: Vec<Slot>,
}

impl Behaviours {
    /// Create an empty collection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a behaviour. It is initialized on the next `update()`.
    pub fn add(&mut self, behaviour: impl Behaviour + 'static) {
        self.slots.push(Slot {
            behaviour: Box::new(behaviour),
            initialized: false,
        });
    }

    /// Initialize pending behaviours, update everything, then drop the dead ones.
    pub fn update(&mut self, ctx: &mut EngineContext) {
        for slot in &mut self.slots {
            if !slot.initialized {
                log::debug!("Initializing behaviour {}", slot.behaviour.name());
                slot.behaviour.init(ctx);
                slot.initialized = true;
            }
            if slot.behaviour.is_alive() {
                slot.behaviour.update(ctx);
            }
        }

        self.slots.retain_mut(|slot| {
            if slot.behaviour.is_alive() {
                return true;
            }
            log::debug!("Destroying behaviour {}", slot.behaviour.name());
            slot.behaviour.on_destroy(ctx);
            false
        });
    }

    /// Destroy every behaviour, in insertion order.
    pub fn destroy_all(&mut self, ctx: &mut EngineContext) {
        for mut slot in self.slots.drain(..) {
            slot.behaviour.on_destroy(ctx);
        }
    }

    /// Number of live behaviours
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check whether the collection is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Names of the behaviours, in update order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots.iter().map(|slot| slot.behaviour.name())
    }
}

impl fmt::Debug for Behaviours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
