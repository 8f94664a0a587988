//! Physics queries using rapier3d
//!
//! Behaviours only need scene queries from physics: raycasts and overlap
//! tests. Colliders can be bound to an ECS entity and placed on layers so
//! triggers can tell what they touched and filter by layer.

use glam::{Quat, Vec3};
use hecs::Entity;
use rapier3d::na::{Quaternion, Translation3, UnitQuaternion};
use rapier3d::prelude::*;

/// Handle to a rigid body in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RigidBodyHandle(pub rapier3d::dynamics::RigidBodyHandle);

/// Handle to a collider in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(pub rapier3d::geometry::ColliderHandle);

/// Bit set of physics layers.
///
/// A collider is a member of some layers; a query only sees colliders whose
/// membership intersects the query mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Every layer
    pub const ALL: Self = Self(u32::MAX);
    /// No layer
    pub const NONE: Self = Self(0);

    /// Mask containing a single layer (0..32)
    #[must_use]
    pub const fn layer(index: u32) -> Self {
        Self(1 << index)
    }

    /// Union of two masks
    #[must_use]
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    fn group(self) -> Group {
        Group::from_bits_truncate(self.0)
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Convert glam Quat to rapier3d UnitQuaternion
fn quat_to_rapier(q: Quat) -> UnitQuaternion<f32> {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

fn isometry(position: Vec3, rotation: Quat) -> Isometry<Real> {
    Isometry::from_parts(
        Translation3::new(position.x, position.y, position.z),
        quat_to_rapier(rotation),
    )
}

fn entity_from_user_data(data: u128) -> Option<Entity> {
    u64::try_from(data).ok().and_then(Entity::from_bits)
}

/// Physics world manager
pub struct Physics {
    /// Gravity vector
    pub gravity: Vec3,
    pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    /// Query pipeline for raycasts and overlaps
    query_pipeline: QueryPipeline,
    integration_parameters: IntegrationParameters,
}

impl Physics {
    /// Create a new physics world with default gravity
    pub fn new() -> Self {
        Self::with_gravity(Vec3::new(0.0, -9.81, 0.0))
    }

    /// Create a new physics world with custom gravity
    pub fn with_gravity(gravity: Vec3) -> Self {
        Self {
            gravity,
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            integration_parameters: IntegrationParameters::default(),
        }
    }

    /// Step the physics simulation. Also refreshes the query pipeline.
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            self.update_queries();
            return;
        }

        self.integration_parameters.dt = dt;

        self.pipeline.step(
            &vector![self.gravity.x, self.gravity.y, self.gravity.z],
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Refresh the query pipeline without advancing the simulation
    pub fn update_queries(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Create a static rigid body (doesn't move)
    pub fn create_static_body(&mut self, position: Vec3, rotation: Quat) -> RigidBodyHandle {
        let body = RigidBodyBuilder::fixed()
            .position(isometry(position, rotation))
            .build();

        RigidBodyHandle(self.rigid_body_set.insert(body))
    }

    /// Create a kinematic rigid body, moved by game code
    pub fn create_kinematic_body(&mut self, position: Vec3, rotation: Quat) -> RigidBodyHandle {
        let body = RigidBodyBuilder::kinematic_position_based()
            .position(isometry(position, rotation))
            .build();

        RigidBodyHandle(self.rigid_body_set.insert(body))
    }

    /// Add a box collider bound to `entity` and member of `layers`
    pub fn add_box_collider(
        &mut self,
        body: RigidBodyHandle,
        entity: Entity,
        half_extents: Vec3,
        layers: LayerMask,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z);
        self.insert_entity_collider(body, entity, collider, layers)
    }

    /// Add a sphere collider bound to `entity` and member of `layers`
    pub fn add_sphere_collider(
        &mut self,
        body: RigidBodyHandle,
        entity: Entity,
        radius: f32,
        layers: LayerMask,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::ball(radius);
        self.insert_entity_collider(body, entity, collider, layers)
    }

    fn insert_entity_collider(
        &mut self,
        body: RigidBodyHandle,
        entity: Entity,
        builder: ColliderBuilder,
        layers: LayerMask,
    ) -> ColliderHandle {
        let collider = builder
            .user_data(u128::from(entity.to_bits().get()))
            .collision_groups(InteractionGroups::new(layers.group(), Group::ALL))
            .build();

        ColliderHandle(self.collider_set.insert_with_parent(
            collider,
            body.0,
            &mut self.rigid_body_set,
        ))
    }

    /// Entity a collider was bound to
    pub fn collider_entity(&self, collider: ColliderHandle) -> Option<Entity> {
        self.collider_set
            .get(collider.0)
            .and_then(|c| entity_from_user_data(c.user_data))
    }

    /// Get the position of a rigid body
    pub fn get_position(&self, body: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set.get(body.0).map(|rb| {
            let pos = rb.translation();
            Vec3::new(pos.x, pos.y, pos.z)
        })
    }

    /// Teleport a body, used to keep colliders in sync with transforms
    pub fn set_position(&mut self, body: RigidBodyHandle, position: Vec3) {
        if let Some(rb) = self.rigid_body_set.get_mut(body.0) {
            rb.set_translation(vector![position.x, position.y, position.z], true);
        }
    }

    /// Cast a ray against colliders on `mask` and return the first hit
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RaycastHit> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );
        let filter =
            QueryFilter::default().groups(InteractionGroups::new(Group::ALL, mask.group()));

        self.query_pipeline
            .cast_ray(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                filter,
            )
            .map(|(handle, distance)| {
                let point = ray.point_at(distance);
                RaycastHit {
                    collider: ColliderHandle(handle),
                    entity: self.collider_entity(ColliderHandle(handle)),
                    point: Vec3::new(point.x, point.y, point.z),
                    distance,
                }
            })
    }

    /// Entities whose colliders on `mask` overlap an oriented box
    pub fn overlap_box(
        &self,
        center: Vec3,
        rotation: Quat,
        half_extents: Vec3,
        mask: LayerMask,
    ) -> Vec<Entity> {
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        let filter =
            QueryFilter::default().groups(InteractionGroups::new(Group::ALL, mask.group()));
        let mut hits = Vec::new();

        self.query_pipeline.intersections_with_shape(
            &self.rigid_body_set,
            &self.collider_set,
            &isometry(center, rotation),
            &*shape,
            filter,
            |handle| {
                if let Some(entity) = self.collider_entity(ColliderHandle(handle)) {
                    hits.push(entity);
                }
                true
            },
        );

        hits
    }

    /// Remove a rigid body and its colliders
    pub fn remove_body(&mut self, body: RigidBodyHandle) {
        self.rigid_body_set.remove(
            body.0,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }
}

impl Default for Physics {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a raycast
#[derive(Debug, Clone)]
pub struct RaycastHit {
    /// The collider that was hit
    pub collider: ColliderHandle,
    /// Entity bound to the collider
    pub entity: Option<Entity>,
    /// The point of intersection
    pub point: Vec3,
    /// Distance from ray origin
    pub distance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity() -> Entity {
        hecs::World::new().spawn(())
    }

    fn wall(physics: &mut Physics, target: Entity, position: Vec3, layers: LayerMask) {
        let body = physics.create_static_body(position, Quat::IDENTITY);
        physics.add_box_collider(body, target, Vec3::splat(0.5), layers);
    }

    #[test]
    fn test_raycast_reports_bound_entity() {
        let mut physics = Physics::new();
        let target = entity();
        wall(&mut physics, target, Vec3::new(0.0, 0.0, -5.0), LayerMask::layer(1));
        physics.update_queries();

        let hit = physics
            .raycast(Vec3::ZERO, Vec3::NEG_Z, 100.0, LayerMask::ALL)
            .expect("ray should hit the wall");
        assert_eq!(hit.entity, Some(target));
        assert!((hit.distance - 4.5).abs() < 1e-3);
    }

    #[test]
    fn test_raycast_respects_mask_and_distance() {
        let mut physics = Physics::new();
        wall(&mut physics, entity(), Vec3::new(0.0, 0.0, -5.0), LayerMask::layer(1));
        physics.update_queries();

        assert!(
            physics
                .raycast(Vec3::ZERO, Vec3::NEG_Z, 100.0, LayerMask::layer(2))
                .is_none()
        );
        assert!(
            physics
                .raycast(Vec3::ZERO, Vec3::NEG_Z, 3.0, LayerMask::layer(1))
                .is_none()
        );
    }

    #[test]
    fn test_overlap_box() {
        let mut physics = Physics::new();
        let near = entity();
        wall(&mut physics, near, Vec3::new(1.0, 0.0, 0.0), LayerMask::ALL);
        wall(&mut physics, entity(), Vec3::new(10.0, 0.0, 0.0), LayerMask::ALL);
        physics.update_queries();

        let hits = physics.overlap_box(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE, LayerMask::ALL);
        assert_eq!(hits, vec![near]);
    }
}
