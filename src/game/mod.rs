//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Drawing goes through the [`Surface`] trait so any front end can display it.

pub mod config;
pub mod direction;
pub mod engine;
pub mod state;
pub mod surface;

// Re-export commonly used types
pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{InputOutcome, StepInfo, StepResult};
pub use state::{CollisionType, GameState, Position, RunState, Snake};
pub use surface::{DrawCommand, Paint, PixelRect, Surface};
