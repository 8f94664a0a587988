//! Proximity trigger backed by a box overlap query

use glam::Vec3;
use hecs::Entity;
use rustc_hash::FxHashSet;

use crate::core::{Behaviour, EngineContext, GameEvent, Signal};
use crate::ecs::Tags;
use crate::physics::LayerMask;

/// Fires when a tagged entity enters a box around the owner.
///
/// Entries are found by diffing the overlap set against the previous frame.
/// An entity only triggers if its [`Tags`] contain at least one of the
/// configured tags, so a trigger without tags never fires.
#[derive(Debug)]
pub struct ColliderTrigger {
    owner: Entity,
    half_extents: Vec3,
    mask: LayerMask,
    trigger_tags: Vec<String>,
    trigger_only_once: bool,
    already_triggered: bool,
    overlapping: FxHashSet<Entity>,
    /// Invoked with the entering entity
    pub on_triggered: Signal<Entity>,
}

impl ColliderTrigger {
    /// Trigger volume of `half_extents` centered on `owner`
    #[must_use]
    pub fn new(owner: Entity, half_extents: Vec3) -> Self {
        Self {
            owner,
            half_extents,
            mask: LayerMask::ALL,
            trigger_tags: Vec::new(),
            trigger_only_once: false,
            already_triggered: false,
            overlapping: FxHashSet::default(),
            on_triggered: Signal::new("ColliderTrigger"),
        }
    }

    /// Add a tag that makes entering entities fire the trigger
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.trigger_tags.push(tag.into());
        self
    }

    /// Only consider colliders on these layers
    #[must_use]
    pub fn with_layer_mask(mut self, mask: LayerMask) -> Self {
        self.mask = mask;
        self
    }

    /// Fire at most once over the trigger's lifetime
    #[must_use]
    pub fn with_trigger_only_once(mut self, once: bool) -> Self {
        self.trigger_only_once = once;
        self
    }

    /// Whether the trigger has fired at least once
    #[must_use]
    pub fn has_triggered(&self) -> bool {
        self.already_triggered
    }

    /// Handle `other` entering the volume.
    ///
    /// Called from `update` for every new overlap; hosts that detect
    /// collisions on their own can call it directly. Returns whether the
    /// trigger fired.
    pub fn on_trigger_enter(&mut self, ctx: &mut EngineContext, other: Entity) -> bool {
        if self.already_triggered && self.trigger_only_once {
            return false;
        }
        if self.trigger_tags.is_empty() {
            return false;
        }

        let tagged = ctx
            .world
            .get::<Tags>(other)
            .is_ok_and(|tags| tags.contains_any(self.trigger_tags.as_slice()));
        if !tagged {
            return false;
        }

        log::debug!("ColliderTrigger on {:?} entered by {other:?}", self.owner);
        self.already_triggered = true;
        self.on_triggered.emit(&other);
        ctx.events.push(GameEvent::ColliderTriggered {
            trigger: self.owner,
            other,
        });
        true
    }
}

impl Behaviour for ColliderTrigger {
    fn name(&self) -> &'static str {
        "ColliderTrigger"
    }

    fn update(&mut self, ctx: &mut EngineContext) {
        if !ctx.world.is_active(self.owner) {
            self.overlapping.clear();
            return;
        }
        let Some(transform) = ctx.world.transform(self.owner) else {
            return;
        };

        let current: FxHashSet<Entity> = ctx
            .physics
            .overlap_box(transform.position, transform.rotation, self.half_extents, self.mask)
            .into_iter()
            .filter(|&entity| entity != self.owner)
            .collect();

        let entered: Vec<Entity> = current.difference(&self.overlapping).copied().collect();
        self.overlapping = current;

        for other in entered {
            self.on_trigger_enter(ctx, other);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use glam::Quat;

    use super::*;
    use crate::ecs::Transform;

    fn setup() -> (EngineContext, Entity) {
        let mut ctx = EngineContext::new();
        let owner = ctx.world.spawn((Transform::new(),));
        (ctx, owner)
    }

    /// Tagged entity with a unit box collider on a kinematic body
    fn visitor(
        ctx: &mut EngineContext,
        tag: &str,
        position: Vec3,
    ) -> (Entity, crate::physics::RigidBodyHandle) {
        let entity = ctx
            .world
            .spawn((Transform::from_position(position), Tags::new([tag])));
        let body = ctx.physics.create_kinematic_body(position, Quat::IDENTITY);
        ctx.physics
            .add_box_collider(body, entity, Vec3::splat(0.5), LayerMask::layer(0));
        ctx.physics.update_queries();
        (entity, body)
    }

    #[test]
    fn test_fires_on_tagged_entry_only() {
        let (mut ctx, owner) = setup();
        visitor(&mut ctx, "Enemy", Vec3::new(1.0, 0.0, 0.0));
        let (player, _) = visitor(&mut ctx, "Player", Vec3::new(-1.0, 0.0, 0.0));

        let fired = Rc::new(Cell::new(0));
        let mut trigger = ColliderTrigger::new(owner, Vec3::splat(2.0)).with_tag("Player");
        let counter = Rc::clone(&fired);
        trigger
            .on_triggered
            .connect_infallible(move |_| counter.set(counter.get() + 1));

        trigger.update(&mut ctx);
        assert_eq!(fired.get(), 1);
        assert!(trigger.has_triggered());
        assert!(ctx.events.pending().any(|e| matches!(
            e,
            GameEvent::ColliderTriggered { other, .. } if *other == player
        )));

        // Still inside, not a new entry
        trigger.update(&mut ctx);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_reentry_fires_again_unless_once() {
        for (once, expected) in [(false, 2), (true, 1)] {
            let (mut ctx, owner) = setup();
            let (_, body) = visitor(&mut ctx, "Player", Vec3::ZERO);
            let mut trigger = ColliderTrigger::new(owner, Vec3::ONE)
                .with_tag("Player")
                .with_trigger_only_once(once);
            let fired = Rc::new(Cell::new(0));
            let counter = Rc::clone(&fired);
            trigger
                .on_triggered
                .connect_infallible(move |_| counter.set(counter.get() + 1));

            trigger.update(&mut ctx);
            ctx.physics.set_position(body, Vec3::new(10.0, 0.0, 0.0));
            ctx.step_seconds(0.1);
            trigger.update(&mut ctx);
            ctx.physics.set_position(body, Vec3::ZERO);
            ctx.step_seconds(0.1);
            trigger.update(&mut ctx);

            assert_eq!(fired.get(), expected, "trigger_only_once = {once}");
        }
    }

    #[test]
    fn test_no_tags_never_fires() {
        let (mut ctx, owner) = setup();
        let (player, _) = visitor(&mut ctx, "Player", Vec3::ZERO);
        let mut trigger = ColliderTrigger::new(owner, Vec3::ONE);

        trigger.update(&mut ctx);
        assert!(!trigger.on_trigger_enter(&mut ctx, player));
        assert!(!trigger.has_triggered());
        assert_eq!(ctx.events.pending_count(), 0);
    }

    #[test]
    fn test_layer_mask_filters_colliders() {
        let (mut ctx, owner) = setup();
        visitor(&mut ctx, "Player", Vec3::ZERO);
        let mut trigger = ColliderTrigger::new(owner, Vec3::ONE)
            .with_tag("Player")
            .with_layer_mask(LayerMask::layer(3));

        trigger.update(&mut ctx);
        assert!(!trigger.has_triggered());
    }

    #[test]
    fn test_failing_listener_does_not_block_others() {
        let (mut ctx, owner) = setup();
        let (player, _) = visitor(&mut ctx, "Player", Vec3::ZERO);
        let mut trigger = ColliderTrigger::new(owner, Vec3::ONE).with_tag("Player");
        let reached = Rc::new(Cell::new(false));
        let flag = Rc::clone(&reached);
        trigger.on_triggered.connect(|_| Err("boom".into()));
        trigger.on_triggered.connect_infallible(move |_| flag.set(true));

        assert!(trigger.on_trigger_enter(&mut ctx, player));
        assert!(reached.get());
    }
}
