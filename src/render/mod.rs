pub mod board;
pub mod renderer;

pub use board::{BoardWidget, BufferSurface};
pub use renderer::Renderer;
