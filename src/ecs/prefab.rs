//! Serializable entity templates
//!
//! A [`Prefab`] describes the components a spawner stamps onto each new
//! entity. Prefabs are plain data so they can live inside spawner configs.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::components::{Active, Name, Tags, Transform};
use super::world::World;

/// Template for creating entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prefab {
    /// Name given to every instance
    pub name: String,
    /// Tags given to every instance
    #[serde(default)]
    pub tags: Vec<String>,
    /// Scale given to every instance
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

impl Prefab {
    /// Create a prefab with no tags and unit scale
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            scale: Vec3::ONE,
        }
    }

    /// Add a tag
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Set the scale
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Spawn an instance. Position and rotation come from `placement`, scale
    /// from the prefab.
    pub fn instantiate(&self, world: &mut World, placement: Transform, active: bool) -> hecs::Entity {
        let transform = Transform {
            scale: self.scale,
            ..placement
        };
        world.spawn((
            Name::new(self.name.clone()),
            transform,
            Tags::new(self.tags.iter().cloned()),
            Active(active),
        ))
    }
}
