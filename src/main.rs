//! Headless demo: a turret fires pooled bullets while a drone flies
//! through a gate

use behaviours::physics::RigidBodyHandle;
use behaviours::prelude::*;

const BULLET_SPEED: f32 = 12.0;
const BULLET_RANGE: f32 = 25.0;

/// Demo game wiring the behaviours together
struct DemoGame {
    behaviours: Behaviours,
    spawner: Option<PooledSpawner>,
    drone: Option<(Entity, RigidBodyHandle)>,
}

impl DemoGame {
    fn new() -> Self {
        Self {
            behaviours: Behaviours::new(),
            spawner: None,
            drone: None,
        }
    }

    /// Move live bullets and hand back the ones out of range
    fn update_bullets(&mut self, ctx: &mut EngineContext) {
        let Some(spawner) = self.spawner.as_mut() else {
            return;
        };
        let owner = spawner.owner();
        let dt = ctx.time.delta_seconds();

        let mut spent = Vec::new();
        for (entity, (pooled_by, active, transform)) in ctx
            .world
            .query_mut::<(&PooledBy, &Active, &mut Transform)>()
        {
            if pooled_by.0 != owner || !active.0 {
                continue;
            }
            let step = transform.forward() * BULLET_SPEED * dt;
            transform.translate(step);
            if transform.position.length() > BULLET_RANGE {
                spent.push(entity);
            }
        }

        for bullet in spent {
            spawner.release(ctx, bullet);
        }
    }

    /// Keep the drone's collider where its transform is
    fn sync_drone(&self, ctx: &mut EngineContext) {
        if let Some((drone, body)) = self.drone
            && let Some(transform) = ctx.world.transform(drone)
        {
            ctx.physics.set_position(body, transform.position);
        }
    }
}

impl Game for DemoGame {
    fn init(&mut self, ctx: &mut EngineContext) {
        log::info!("Demo game initialized!");

        // Turret with a pooled bullet spawner and a sight line towards the wall
        let turret = ctx.world.spawn((
            Name::new("Turret"),
            Transform::from_position(Vec3::new(0.0, 1.0, 0.0)),
        ));
        let config = SpawnerConfig::new(Prefab::new("Bullet").with_tag("Projectile"), 0.25)
            .with_prewarm(8)
            .with_max_retained(16)
            .with_start_on_init(true);
        let mut spawner = PooledSpawner::pooled(turret, config);
        spawner.init(ctx);
        self.spawner = Some(spawner);

        let wall = ctx.world.spawn((
            Name::new("Wall"),
            Transform::from_position(Vec3::new(0.0, 1.0, -30.0)),
        ));
        let wall_body = ctx
            .physics
            .create_static_body(Vec3::new(0.0, 1.0, -30.0), Quat::IDENTITY);
        ctx.physics
            .add_box_collider(wall_body, wall, Vec3::new(5.0, 5.0, 0.5), LayerMask::layer(1));

        let mut sight = RaycastTrigger::new(turret).with_layer_mask(LayerMask::layer(1));
        sight.on_hit.connect_infallible(|hit| {
            log::info!("Turret sees {:?} at {:.1}m", hit.entity, hit.distance);
        });
        self.behaviours.add(sight);

        // Drone flying forward through a gate
        let drone = ctx.world.spawn((
            Name::new("Drone"),
            Transform::from_position(Vec3::new(4.0, 1.0, 0.0)),
            Tags::new(["Drone"]),
        ));
        let drone_body = ctx
            .physics
            .create_kinematic_body(Vec3::new(4.0, 1.0, 0.0), Quat::IDENTITY);
        ctx.physics
            .add_sphere_collider(drone_body, drone, 0.5, LayerMask::layer(0));
        self.drone = Some((drone, drone_body));
        self.behaviours.add(
            SimpleMover::new(drone)
                .with_max_speed(3.0)
                .with_acceleration(1.5)
                .with_move_on_start(true),
        );

        let gate = ctx.world.spawn((
            Name::new("Gate"),
            Transform::from_position(Vec3::new(4.0, 1.0, -10.0)),
        ));
        let mut trigger = ColliderTrigger::new(gate, Vec3::splat(2.0))
            .with_tag("Drone")
            .with_trigger_only_once(true);
        trigger.on_triggered.connect_infallible(|entity| {
            log::info!("{entity:?} passed the gate");
        });
        self.behaviours.add(trigger);

        // Camera rig trailing the drone, and a bobbing pickup
        let rig = ctx.world.spawn((Name::new("CameraRig"), Transform::new()));
        self.behaviours.add(
            FollowWorldPosition::new(rig)
                .with_target(drone)
                .with_axes(true, false, true)
                .with_offset(Vec3::new(0.0, 0.0, 6.0)),
        );

        let pickup = ctx.world.spawn((
            Name::new("Pickup"),
            Transform::from_position(Vec3::new(-3.0, 0.5, -5.0)),
        ));
        self.behaviours
            .add(FloatUpAndDown::new(pickup).with_speed(1.5).with_magnitude(0.25));

        ctx.physics.update_queries();
    }

    fn update(&mut self, ctx: &mut EngineContext) {
        for event in ctx.events.iter() {
            match event {
                GameEvent::ColliderTriggered { trigger, other } => {
                    log::debug!("Trigger {trigger:?} entered by {other:?}");
                }
                GameEvent::MovementStarted { entity } => {
                    log::debug!("{entity:?} started moving");
                }
                _ => {}
            }
        }

        if let Some(spawner) = self.spawner.as_mut() {
            spawner.update(ctx);
        }
        self.update_bullets(ctx);
        self.sync_drone(ctx);
        self.behaviours.update(ctx);

        if ctx.time.frame() % 60 == 0 {
            for line in ctx.debug.get_all_lines() {
                log::info!("{line}");
            }
        }
    }

    fn shutdown(&mut self, ctx: &mut EngineContext) {
        if let Some(mut spawner) = self.spawner.take() {
            log::info!("Spawned {} bullets in total", spawner.spawned());
            spawner.on_destroy(ctx);
        }
        self.behaviours.destroy_all(ctx);
    }
}

fn main() {
    let config = EngineConfig::default()
        .with_title("Behaviours Demo")
        .with_target_fps(60)
        .with_max_frames(600);

    let game = DemoGame::new();
    let engine = Engine::new(config, game);

    if let Err(e) = engine.run() {
        eprintln!("Engine error: {}", e);
    }
}
