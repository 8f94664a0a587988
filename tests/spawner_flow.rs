//! Drives pooled spawners through the engine loop end to end.

use behaviours::pool::PoolStats;
use behaviours::prelude::*;

/// Fires every half second and returns each item one second after it appeared
struct Shooter {
    config: SpawnerConfig,
    spawner: Option<PooledSpawner>,
    live: Vec<(Entity, u64)>,
    history: Vec<PoolStats>,
    quit_after: Option<u64>,
}

impl Shooter {
    fn new(config: SpawnerConfig) -> Self {
        Self {
            config,
            spawner: None,
            live: Vec::new(),
            history: Vec::new(),
            quit_after: None,
        }
    }

    fn spawner(&self) -> &PooledSpawner {
        self.spawner.as_ref().unwrap()
    }
}

impl Game for Shooter {
    fn init(&mut self, ctx: &mut EngineContext) {
        let owner = ctx.world.spawn((
            Name::new("Turret"),
            Transform::from_position(Vec3::new(0.0, 2.0, 0.0)),
        ));
        let mut spawner = PooledSpawner::pooled(owner, self.config.clone());
        spawner.init(ctx);
        self.spawner = Some(spawner);
    }

    fn update(&mut self, ctx: &mut EngineContext) {
        let spawner = self.spawner.as_mut().unwrap();
        spawner.update(ctx);

        let frame = ctx.time.frame();
        for event in ctx.events.pending() {
            if let GameEvent::ItemSpawned { item, .. } = event {
                self.live.push((*item, frame));
            }
        }

        let (expired, live): (Vec<_>, Vec<_>) = self
            .live
            .drain(..)
            .partition(|&(_, born)| frame - born >= 10);
        self.live = live;
        for (item, _) in expired {
            spawner.release(ctx, item);
        }

        self.history.push(spawner.pool().stats());

        if let Some(limit) = self.quit_after
            && spawner.spawned() >= limit
        {
            ctx.quit();
        }
    }
}

fn engine(game: Shooter) -> Engine<Shooter> {
    // 100ms frames
    Engine::new(EngineConfig::default().with_target_fps(10), game)
}

#[test]
fn test_pool_reaches_steady_state() {
    let config = SpawnerConfig::new(Prefab::new("Bullet"), 0.5)
        .with_prewarm(2)
        .with_max_retained(4)
        .with_start_on_init(true);
    let mut engine = engine(Shooter::new(config));

    engine.run_frames(60);

    let game = engine.game();
    assert_eq!(game.spawner().spawned(), 12);

    let stats = game.spawner().pool().stats();
    assert_eq!(stats.created, 3, "Two prewarmed plus one while both were out");
    assert_eq!(stats.destroyed, 0);

    for stats in &game.history {
        assert_eq!(stats.all(), stats.active + stats.idle);
        assert!(stats.idle <= 4);
        assert!(stats.active <= 3);
    }

    let active_in_world = engine
        .context()
        .world
        .query::<(&PooledBy, &Active)>()
        .iter()
        .filter(|(_, (_, active))| active.0)
        .count();
    assert_eq!(active_in_world, stats.active);
}

#[test]
fn test_ron_config_drives_engine_until_quit() {
    let config = SpawnerConfig::from_ron_str(
        r#"(
            template: Some((name: "Coin", tags: ["Pickup"])),
            spawn_interval_seconds: 0.5,
            start_on_init: true,
        )"#,
    )
    .unwrap();
    let mut shooter = Shooter::new(config);
    shooter.quit_after = Some(5);
    let mut engine = engine(shooter);

    engine.run_frames(1_000);

    assert_eq!(engine.context().time.frame(), 25);
    assert!(engine.context().should_quit());
    assert_eq!(engine.game().spawner().spawned(), 5);

    let coins = engine
        .context()
        .world
        .query::<&Tags>()
        .iter()
        .filter(|(_, tags)| tags.contains("Pickup"))
        .count();
    assert_eq!(coins, engine.game().spawner().pool().count_all());
}
