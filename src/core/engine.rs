//! Core Engine struct and main game loop
//!
//! The engine is headless: it owns the scene state and ticks it at a fixed
//! rate. Rendering and windowing belong to the embedding application.

use std::time::{Duration, Instant};

use crate::core::debug::DebugInfo;
use crate::core::{EventQueue, Time, Timers};
use crate::ecs::World;
use crate::physics::Physics;

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Name used in log output
    pub title: String,
    /// Fixed update rate
    pub target_fps: u32,
    /// Stop after this many frames (`None` runs until `quit()`)
    pub max_frames: Option<u64>,
    /// Sleep between frames to match wall-clock time
    pub realtime: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: String::from("Engine"),
            target_fps: 60,
            max_frames: None,
            realtime: false,
        }
    }
}

impl EngineConfig {
    /// Create a new config with a title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set target FPS (clamped to at least 1)
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps.max(1);
        self
    }

    /// Stop after a fixed number of frames
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Enable or disable wall-clock pacing
    pub fn with_realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    /// Duration of one fixed step
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.target_fps.max(1)
    }
}

/// Game trait that users implement
pub trait Game: 'static {
    /// Called once when the engine starts
    fn init(&mut self, engine: &mut EngineContext);

    /// Called every frame for game logic updates
    fn update(&mut self, engine: &mut EngineContext);

    /// Called when the game is shutting down
    fn shutdown(&mut self, _engine: &mut EngineContext) {}
}

/// Context passed to game callbacks and behaviours
pub struct EngineContext {
    /// Time tracking
    pub time: Time,
    /// ECS world
    pub world: World,
    /// Physics queries
    pub physics: Physics,
    /// Repeating timers
    pub timers: Timers,
    /// Events emitted by behaviours
    pub events: EventQueue,
    /// Debug information and stats
    pub debug: DebugInfo,
    /// Should the engine quit
    should_quit: bool,
}

impl EngineContext {
    /// Create a context with an empty world
    pub fn new() -> Self {
        Self {
            time: Time::new(),
            world: World::new(),
            physics: Physics::new(),
            timers: Timers::new(),
            events: EventQueue::new(),
            debug: DebugInfo::new(),
            should_quit: false,
        }
    }

    /// Begin a new frame lasting `delta`.
    ///
    /// Advances time, fires due timers, refreshes physics and makes last
    /// frame's events readable. Call before updating behaviours.
    pub fn step(&mut self, delta: Duration) {
        self.time.advance(delta);
        self.timers.tick(delta);
        self.physics.step(delta.as_secs_f32());
        self.events.swap();
        self.debug.record_frame(delta);
    }

    /// Convenience for `step` with seconds.
    ///
    /// Negative or NaN deltas count as zero. A delta too large for a
    /// `Duration` is logged and skipped.
    pub fn step_seconds(&mut self, seconds: f32) {
        match Duration::try_from_secs_f32(seconds.max(0.0)) {
            Ok(delta) => self.step(delta),
            Err(e) => log::warn!("Skipping frame with delta of {seconds} seconds: {e}"),
        }
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Check if engine should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Main engine struct
pub struct Engine<G: Game> {
    config: EngineConfig,
    game: G,
    context: EngineContext,
}

impl<G: Game> Engine<G> {
    /// Create a new engine with the given game
    pub fn new(config: EngineConfig, game: G) -> Self {
        Self {
            config,
            game,
            context: EngineContext::new(),
        }
    }

    /// Access the context, e.g. to inspect state after `run_frames`
    pub fn context(&self) -> &EngineContext {
        &self.context
    }

    /// Access the game
    pub fn game(&self) -> &G {
        &self.game
    }

    /// Run the engine until the game quits or `max_frames` is reached
    pub fn run(mut self) -> Result<(), Box<dyn std::error::Error>> {
        // A logger may already be installed by the embedding application
        let _ = env_logger::try_init();
        log::info!("Starting engine: {}", self.config.title);

        self.game.init(&mut self.context);
        log::info!("Engine initialized successfully");

        let frame = self.config.frame_duration();
        loop {
            let frame_start = Instant::now();

            if !self.tick(frame) {
                break;
            }

            if self.config.realtime
                && let Some(remaining) = frame.checked_sub(frame_start.elapsed())
            {
                std::thread::sleep(remaining);
            }
        }

        self.game.shutdown(&mut self.context);
        log::info!(
            "Engine stopped after {} frames",
            self.context.time.frame()
        );
        Ok(())
    }

    /// Initialize the game and run a fixed number of frames without pacing.
    pub fn run_frames(&mut self, frames: u64) {
        if self.context.time.frame() == 0 {
            self.game.init(&mut self.context);
        }
        let frame = self.config.frame_duration();
        for _ in 0..frames {
            if !self.tick(frame) {
                break;
            }
        }
    }

    /// Advance one frame. Returns `false` once the engine should stop.
    fn tick(&mut self, frame: Duration) -> bool {
        self.context.step(frame);
        self.game.update(&mut self.context);

        if self.context.should_quit() {
            log::info!("Quit requested, shutting down");
            return false;
        }

        self.config
            .max_frames
            .is_none_or(|max| self.context.time.frame() < max)
    }
}
