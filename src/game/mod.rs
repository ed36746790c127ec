//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O, timer or rendering
//! dependencies. Operations report how ticking should continue through
//! [`Schedule`], so the event loop that owns the timer stays outside the core.

pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod snapshot;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::GameConfig;
pub use engine::{GameEngine, Schedule, StepInfo, StepResult};
pub use error::GameError;
pub use snapshot::{Cell, RenderSnapshot};
pub use state::{CollisionType, GameState, Position, RunState, Snake};
