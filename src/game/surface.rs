//! Drawing contract between the game and whatever displays it.

/// Axis-aligned rectangle in surface pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// What a filled rectangle depicts; the surface picks the actual color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Paint {
    Snake,
    Fruit,
}

/// A target that can fill rectangles
pub trait Surface {
    fn fill_rect(&mut self, rect: PixelRect, paint: Paint);
}

/// One recorded `fill_rect` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCommand {
    pub rect: PixelRect,
    pub paint: Paint,
}

impl Surface for Vec<DrawCommand> {
    fn fill_rect(&mut self, rect: PixelRect, paint: Paint) {
        self.push(DrawCommand { rect, paint });
    }
}
