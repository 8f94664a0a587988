//! Idle bobbing animation

use hecs::Entity;

use crate::core::{Behaviour, EngineContext};
use crate::ecs::Transform;

/// Hermite interpolation between `from` and `to`, `t` clamped to [0, 1]
fn smoothstep(from: f32, to: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let t = t * t * (3.0 - 2.0 * t);
    from + (to - from) * t
}

/// Moves the owner up and down around its starting height.
///
/// One sweep from the lowest to the highest point takes `float_speed`
/// seconds. Only the y coordinate is written.
#[derive(Debug, Clone)]
pub struct FloatUpAndDown {
    owner: Entity,
    float_speed: f32,
    magnitude: f32,
    alpha: f32,
    direction: f32,
    /// Lowest and highest y, captured on init
    range: Option<(f32, f32)>,
}

impl FloatUpAndDown {
    /// One-second sweeps, half a unit above and below the start
    #[must_use]
    pub fn new(owner: Entity) -> Self {
        Self {
            owner,
            float_speed: 1.0,
            magnitude: 0.5,
            alpha: 0.0,
            direction: 1.0,
            range: None,
        }
    }

    /// Seconds per sweep, must be positive
    #[must_use]
    pub fn with_speed(mut self, seconds: f32) -> Self {
        self.float_speed = seconds;
        self
    }

    /// Distance moved above and below the start
    #[must_use]
    pub fn with_magnitude(mut self, magnitude: f32) -> Self {
        self.magnitude = magnitude;
        self
    }

    /// Interpolation position in [0, 1]
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

impl Behaviour for FloatUpAndDown {
    fn name(&self) -> &'static str {
        "FloatUpAndDown"
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        if !(self.float_speed.is_finite() && self.float_speed > 0.0) {
            log::warn!(
                "FloatUpAndDown on {:?} has speed {}, not animating",
                self.owner,
                self.float_speed
            );
            return;
        }
        if let Some(transform) = ctx.world.transform(self.owner) {
            let y = transform.position.y;
            self.range = Some((y - self.magnitude, y + self.magnitude));
        }
    }

    fn update(&mut self, ctx: &mut EngineContext) {
        let Some((low, high)) = self.range else {
            return;
        };
        if !ctx.world.is_active(self.owner) {
            return;
        }

        if self.alpha <= 0.0 {
            self.direction = 1.0;
        }
        if self.alpha >= 1.0 {
            self.direction = -1.0;
        }
        self.alpha += self.direction * ctx.time.delta_seconds() / self.float_speed;

        if let Ok(mut transform) = ctx.world.get_mut::<Transform>(self.owner) {
            transform.position.y = smoothstep(low, high, self.alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn setup() -> (EngineContext, Entity) {
        let mut ctx = EngineContext::new();
        let owner = ctx
            .world
            .spawn((Transform::from_position(Vec3::new(3.0, 2.0, -1.0)),));
        (ctx, owner)
    }

    fn y(ctx: &EngineContext, entity: Entity) -> f32 {
        ctx.world.transform(entity).unwrap().position.y
    }

    #[test]
    fn test_smoothstep() {
        assert_eq!(smoothstep(1.0, 3.0, -1.0), 1.0);
        assert_eq!(smoothstep(1.0, 3.0, 0.5), 2.0);
        assert_eq!(smoothstep(1.0, 3.0, 2.0), 3.0);
        assert!(smoothstep(0.0, 1.0, 0.25) < 0.25);
    }

    #[test]
    fn test_bobs_between_peaks() {
        let (mut ctx, owner) = setup();
        let mut float = FloatUpAndDown::new(owner).with_speed(1.0).with_magnitude(0.5);
        float.init(&mut ctx);

        let mut samples = Vec::new();
        for _ in 0..8 {
            ctx.step_seconds(0.25);
            float.update(&mut ctx);
            samples.push(y(&ctx, owner));
        }

        // Up to the high peak after one second, back down after two
        assert!((samples[3] - 2.5).abs() < 1e-4);
        assert!((samples[7] - 1.5).abs() < 1e-4);
        assert!(samples.iter().all(|&y| (1.5 - 1e-4..=2.5 + 1e-4).contains(&y)));

        let position = ctx.world.transform(owner).unwrap().position;
        assert_eq!((position.x, position.z), (3.0, -1.0));
    }

    #[test]
    fn test_non_positive_speed_is_noop() {
        let (mut ctx, owner) = setup();
        let mut float = FloatUpAndDown::new(owner).with_speed(0.0);
        float.init(&mut ctx);

        ctx.step_seconds(0.5);
        float.update(&mut ctx);
        assert_eq!(y(&ctx, owner), 2.0);
        assert_eq!(float.alpha(), 0.0);
    }
}
