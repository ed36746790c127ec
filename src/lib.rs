//! Grid Snake - classic single-player Snake in the terminal
//!
//! This library provides:
//! - Core game logic with a fixed-tick state machine (game module)
//! - Keyboard mapping (input module)
//! - TUI rendering (render module)
//! - Session statistics (metrics module)
//! - The interactive event loop and its tick timer (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
