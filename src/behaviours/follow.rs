//! Copy another entity's world position

use glam::{BVec3, Vec3};
use hecs::Entity;

use crate::core::{Behaviour, EngineContext};
use crate::ecs::Transform;

/// Keeps selected axes of the owner's position locked to a target's, plus
/// an offset. Does nothing while there is no target.
#[derive(Debug, Clone)]
pub struct FollowWorldPosition {
    owner: Entity,
    target: Option<Entity>,
    axes: BVec3,
    offset: Vec3,
}

impl FollowWorldPosition {
    /// Follow nothing yet, on all three axes
    #[must_use]
    pub fn new(owner: Entity) -> Self {
        Self {
            owner,
            target: None,
            axes: BVec3::TRUE,
            offset: Vec3::ZERO,
        }
    }

    /// Entity to follow
    #[must_use]
    pub fn with_target(mut self, target: Entity) -> Self {
        self.target = Some(target);
        self
    }

    /// Choose which axes are copied
    #[must_use]
    pub fn with_axes(mut self, x: bool, y: bool, z: bool) -> Self {
        self.axes = BVec3::new(x, y, z);
        self
    }

    /// Offset added to the target's position
    #[must_use]
    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Change or clear the target at runtime
    pub fn set_target(&mut self, target: Option<Entity>) {
        self.target = target;
    }

    #[must_use]
    pub fn target(&self) -> Option<Entity> {
        self.target
    }
}

impl Behaviour for FollowWorldPosition {
    fn name(&self) -> &'static str {
        "FollowWorldPosition"
    }

    fn update(&mut self, ctx: &mut EngineContext) {
        let Some(target) = self.target.and_then(|t| ctx.world.transform(t)) else {
            return;
        };
        if let Ok(mut transform) = ctx.world.get_mut::<Transform>(self.owner) {
            transform.position =
                Vec3::select(self.axes, target.position + self.offset, transform.position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follows_selected_axes_with_offset() {
        let mut ctx = EngineContext::new();
        let target = ctx
            .world
            .spawn((Transform::from_position(Vec3::new(10.0, 20.0, 30.0)),));
        let owner = ctx
            .world
            .spawn((Transform::from_position(Vec3::new(1.0, 2.0, 3.0)),));
        let mut follow = FollowWorldPosition::new(owner)
            .with_target(target)
            .with_axes(true, false, true)
            .with_offset(Vec3::new(0.5, 100.0, -1.0));

        follow.update(&mut ctx);
        assert_eq!(
            ctx.world.transform(owner).unwrap().position,
            Vec3::new(10.5, 2.0, 29.0)
        );
    }

    #[test]
    fn test_missing_target_is_noop() {
        let mut ctx = EngineContext::new();
        let owner = ctx.world.spawn((Transform::from_position(Vec3::ONE),));
        let gone = ctx.world.spawn((Transform::new(),));
        ctx.world.despawn(gone).unwrap();

        let mut follow = FollowWorldPosition::new(owner);
        follow.update(&mut ctx);
        follow.set_target(Some(gone));
        follow.update(&mut ctx);

        assert_eq!(ctx.world.transform(owner).unwrap().position, Vec3::ONE);
    }
}
