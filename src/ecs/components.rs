//! Common ECS components

use glam::{Mat4, Quat, Vec3};
use hecs::Entity;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Transform component for position, rotation, and scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,
    /// Rotation as a quaternion
    pub rotation: Quat,
    /// Scale factor
    pub scale: Vec3,
}

impl Transform {
    /// Create a new transform at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transform with just a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Get the transformation matrix
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Get the forward direction (negative Z in local space)
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Get the right direction (positive X in local space)
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get the up direction (positive Y in local space)
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Translate by a world-space delta
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Translate by a delta expressed in local axes
    pub fn translate_local(&mut self, delta: Vec3) {
        self.position += self.rotation * delta;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// Name component for debugging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Whether an entity participates in the scene.
///
/// Inactive entities keep their other components but are skipped by
/// behaviours and hidden from the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Active(pub bool);

/// Tags used by triggers to filter which entities they react to
#[derive(Debug, Clone, Default)]
pub struct Tags(pub FxHashSet<String>);

impl Tags {
    /// Build a tag set from any list of strings
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tags.into_iter().map(Into::into).collect())
    }

    /// Check whether a tag is present
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    /// Check whether any of `tags` is present
    #[must_use]
    pub fn contains_any<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        tags.iter().any(|tag| self.contains(tag.as_ref()))
    }
}

/// Marks an item that belongs to a pooled spawner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PooledBy(pub Entity);

/// Marks an entity created by a plain spawner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnedBy(pub Entity);
