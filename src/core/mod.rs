//! Core engine module
//!
//! Contains the headless Engine, the per-frame context and the building
//! blocks behaviours rely on: time, timers, signals and events.

mod behaviour;
mod debug;
mod engine;
mod events;
mod signal;
mod time;
mod timer;

pub use behaviour::{Behaviour, Behaviours};
pub use debug::{DebugInfo, FrameStats};
pub use engine::{Engine, EngineConfig, EngineContext, Game};
pub use events::{EventQueue, GameEvent};
pub use signal::{ListenerError, ListenerId, ListenerResult, Signal};
pub use time::Time;
pub use timer::{TimerHandle, Timers};
