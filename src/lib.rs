//! Tile Snake - the classic grid snake game in the terminal
//!
//! This library provides:
//! - Core game logic and the drawing contract (game module)
//! - A start/stop tick source (timer module)
//! - Keyboard mapping (input module)
//! - ratatui rendering (render module)
//! - The interactive terminal driver (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod timer;
