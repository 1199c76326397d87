//! Asteroid dodger: a single-player arcade shooter.
//!
//! The library is the game itself, with no I/O: entities, spawning,
//! collisions and the per-frame `Simulation`. Front ends plug in through the
//! `InputSource`, `Renderer` and `UiSink` traits.

pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod input;
pub mod physics;
pub mod render;
pub mod spawner;

pub use compute::{PerformanceMonitor, Simulation, TickEvents};
pub use config::GameConfig;
pub use error::ConfigError;
pub use geometry::Bounds;
