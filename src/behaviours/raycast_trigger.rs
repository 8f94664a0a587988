//! Line-of-sight trigger

use hecs::Entity;

use crate::core::{Behaviour, EngineContext, GameEvent, Signal};
use crate::physics::{LayerMask, RaycastHit};

/// Casts a ray every frame and fires when it hits something on the mask.
///
/// The ray starts at the owner's position and points along the forward axis
/// of `ray_origin`, which defaults to the owner itself.
#[derive(Debug)]
pub struct RaycastTrigger {
    owner: Entity,
    ray_origin: Option<Entity>,
    max_distance: f32,
    mask: LayerMask,
    stop_after_hit: bool,
    destroy_after_hit: bool,
    enabled: bool,
    destroyed: bool,
    /// Invoked with the hit that fired the trigger
    pub on_hit: Signal<RaycastHit>,
}

impl RaycastTrigger {
    /// Unlimited ray along the owner's forward axis, stopping after one hit
    #[must_use]
    pub fn new(owner: Entity) -> Self {
        Self {
            owner,
            ray_origin: None,
            max_distance: f32::MAX,
            mask: LayerMask::ALL,
            stop_after_hit: true,
            destroy_after_hit: false,
            enabled: true,
            destroyed: false,
            on_hit: Signal::new("RaycastTrigger"),
        }
    }

    /// Take the ray direction from another entity's forward axis
    #[must_use]
    pub fn with_ray_origin(mut self, origin: Entity) -> Self {
        self.ray_origin = Some(origin);
        self
    }

    /// Limit how far the ray travels
    #[must_use]
    pub fn with_max_distance(mut self, distance: f32) -> Self {
        self.max_distance = distance;
        self
    }

    /// Only hit colliders on these layers
    #[must_use]
    pub fn with_layer_mask(mut self, mask: LayerMask) -> Self {
        self.mask = mask;
        self
    }

    /// Keep casting after a hit instead of pausing
    #[must_use]
    pub fn with_stop_after_hit(mut self, stop: bool) -> Self {
        self.stop_after_hit = stop;
        self
    }

    /// Remove the trigger once it has fired
    #[must_use]
    pub fn with_destroy_after_hit(mut self, destroy: bool) -> Self {
        self.destroy_after_hit = destroy;
        self
    }

    /// Resume casting after a hit paused it
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Whether the trigger is casting
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn cast(&self, ctx: &EngineContext) -> Option<RaycastHit> {
        let origin = ctx.world.transform(self.owner)?;
        let direction = match self.ray_origin {
            Some(entity) => ctx.world.transform(entity)?.forward(),
            None => origin.forward(),
        };
        ctx.physics
            .raycast(origin.position, direction, self.max_distance, self.mask)
    }
}

impl Behaviour for RaycastTrigger {
    fn name(&self) -> &'static str {
        "RaycastTrigger"
    }

    fn update(&mut self, ctx: &mut EngineContext) {
        if !self.enabled || self.destroyed || !ctx.world.is_active(self.owner) {
            return;
        }
        let Some(hit) = self.cast(ctx) else {
            return;
        };

        log::debug!(
            "RaycastTrigger on {:?} hit {:?} at {:.2}",
            self.owner,
            hit.entity,
            hit.distance
        );
        self.on_hit.emit(&hit);
        ctx.events.push(GameEvent::RayHit {
            trigger: self.owner,
            hit: hit.entity,
            point: hit.point,
            distance: hit.distance,
        });

        if self.stop_after_hit {
            self.enabled = false;
        }
        if self.destroy_after_hit {
            self.destroyed = true;
        }
    }

    fn is_alive(&self) -> bool {
        !self.destroyed
    }
}
