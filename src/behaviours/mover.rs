//! Accelerating straight-line mover

use glam::Vec3;
use hecs::Entity;
use serde::{Deserialize, Serialize};

use crate::core::{Behaviour, EngineContext, GameEvent, Signal};
use crate::ecs::Transform;

/// Local axis a [`SimpleMover`] travels along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MoveDirection {
    #[default]
    Forward,
    Left,
    Back,
    Down,
}

impl MoveDirection {
    /// Unit vector in local space
    #[must_use]
    pub fn local_axis(self) -> Vec3 {
        match self {
            Self::Forward => Vec3::NEG_Z,
            Self::Left => Vec3::NEG_X,
            Self::Back => Vec3::Z,
            Self::Down => Vec3::NEG_Y,
        }
    }
}

/// Moves the owner along one of its local axes.
///
/// While moving, speed ramps up by `acceleration` per second until it
/// reaches `max_speed`; once stopped it ramps down to zero the same way.
#[derive(Debug)]
pub struct SimpleMover {
    owner: Entity,
    max_speed: f32,
    acceleration: f32,
    direction: MoveDirection,
    move_on_start: bool,
    speed: f32,
    moving: bool,
    /// Invoked by [`start_movement`](Self::start_movement)
    pub on_start_movement: Signal,
    /// Invoked by [`stop_movement`](Self::stop_movement)
    pub on_stop_movement: Signal,
}

impl SimpleMover {
    /// Forward mover reaching 5 units/s at 2 units/s²
    #[must_use]
    pub fn new(owner: Entity) -> Self {
        Self {
            owner,
            max_speed: 5.0,
            acceleration: 2.0,
            direction: MoveDirection::Forward,
            move_on_start: false,
            speed: 0.0,
            moving: false,
            on_start_movement: Signal::new("SimpleMover start"),
            on_stop_movement: Signal::new("SimpleMover stop"),
        }
    }

    #[must_use]
    pub fn with_max_speed(mut self, speed: f32) -> Self {
        self.max_speed = speed;
        self
    }

    #[must_use]
    pub fn with_acceleration(mut self, acceleration: f32) -> Self {
        self.acceleration = acceleration;
        self
    }

    #[must_use]
    pub fn with_direction(mut self, direction: MoveDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Start moving as soon as the behaviour is initialized
    #[must_use]
    pub fn with_move_on_start(mut self, move_on_start: bool) -> Self {
        self.move_on_start = move_on_start;
        self
    }

    /// Begin accelerating
    pub fn start_movement(&mut self, ctx: &mut EngineContext) {
        self.moving = true;
        self.on_start_movement.emit(&());
        ctx.events.push(GameEvent::MovementStarted { entity: self.owner });
    }

    /// Begin decelerating
    pub fn stop_movement(&mut self, ctx: &mut EngineContext) {
        self.moving = false;
        self.on_stop_movement.emit(&());
        ctx.events.push(GameEvent::MovementStopped { entity: self.owner });
    }

    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Current speed in units per second
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }
}

impl Behaviour for SimpleMover {
    fn name(&self) -> &'static str {
        "SimpleMover"
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        if self.move_on_start {
            self.start_movement(ctx);
        }
    }

    fn update(&mut self, ctx: &mut EngineContext) {
        if !ctx.world.is_active(self.owner) {
            return;
        }
        let dt = ctx.time.delta_seconds();
        self.speed = if self.moving {
            (self.speed + self.acceleration * dt).min(self.max_speed)
        } else {
            (self.speed - self.acceleration * dt).max(0.0)
        };

        if self.speed > 0.0
            && let Ok(mut transform) = ctx.world.get_mut::<Transform>(self.owner)
        {
            transform.translate_local(self.direction.local_axis() * self.speed * dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use glam::Quat;

    use super::*;

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert!(a.abs_diff_eq(b, 1e-4), "{a} != {b}");
    }

    #[test]
    fn test_ramps_up_and_down() {
        let mut ctx = EngineContext::new();
        let owner = ctx.world.spawn((Transform::new(),));
        let mut mover = SimpleMover::new(owner)
            .with_max_speed(2.0)
            .with_acceleration(4.0)
            .with_move_on_start(true);
        mover.init(&mut ctx);

        ctx.step_seconds(0.25);
        mover.update(&mut ctx);
        assert_eq!(mover.speed(), 1.0);
        ctx.step_seconds(0.25);
        mover.update(&mut ctx);
        ctx.step_seconds(0.25);
        mover.update(&mut ctx);
        assert_eq!(mover.speed(), 2.0, "Clamped to max speed");

        // 1.0 * 0.25 + 2.0 * 0.25 + 2.0 * 0.25 along -Z
        assert_vec_eq(ctx.world.transform(owner).unwrap().position, Vec3::new(0.0, 0.0, -1.25));

        mover.stop_movement(&mut ctx);
        for _ in 0..4 {
            ctx.step_seconds(0.25);
            mover.update(&mut ctx);
        }
        assert_eq!(mover.speed(), 0.0);
        assert!(!mover.is_moving());
    }

    #[test]
    fn test_directions_are_local() {
        let cases = [
            (MoveDirection::Forward, Vec3::NEG_X),
            (MoveDirection::Left, Vec3::Z),
            (MoveDirection::Back, Vec3::X),
            (MoveDirection::Down, Vec3::NEG_Y),
        ];
        for (direction, expected) in cases {
            let mut ctx = EngineContext::new();
            // Turned left a quarter, so forward points to -X
            let owner = ctx.world.spawn((Transform::from_position_rotation(
                Vec3::ZERO,
                Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            ),));
            let mut mover = SimpleMover::new(owner)
                .with_max_speed(1.0)
                .with_acceleration(100.0)
                .with_direction(direction);
            mover.start_movement(&mut ctx);

            ctx.step_seconds(1.0);
            mover.update(&mut ctx);
            assert_vec_eq(ctx.world.transform(owner).unwrap().position, expected);
        }
    }

    #[test]
    fn test_start_and_stop_notify() {
        let mut ctx = EngineContext::new();
        let owner = ctx.world.spawn((Transform::new(),));
        let mut mover = SimpleMover::new(owner);
        let starts = Rc::new(Cell::new(0));
        let stops = Rc::new(Cell::new(0));
        let (s, t) = (Rc::clone(&starts), Rc::clone(&stops));
        mover.on_start_movement.connect_infallible(move |_| s.set(s.get() + 1));
        mover.on_stop_movement.connect_infallible(move |_| t.set(t.get() + 1));

        mover.init(&mut ctx);
        assert_eq!(starts.get(), 0, "move_on_start is off by default");

        mover.start_movement(&mut ctx);
        mover.stop_movement(&mut ctx);
        assert_eq!((starts.get(), stops.get()), (1, 1));
        let kinds: Vec<_> = ctx.events.pending().cloned().collect();
        assert_eq!(
            kinds,
            vec![
                GameEvent::MovementStarted { entity: owner },
                GameEvent::MovementStopped { entity: owner },
            ]
        );
    }
}
