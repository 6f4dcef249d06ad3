use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Widget},
};

use crate::game::{GameState, Paint, PixelRect, Surface};

/// Terminal columns used for one grid cell; a cell is one row tall
const COLUMNS_PER_CELL: u32 = 2;

const SNAKE_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const FRUIT_STYLE: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);
const EMPTY_STYLE: Style = Style::new().fg(Color::DarkGray);

fn paint_style(paint: Paint) -> Style {
    match paint {
        Paint::Snake => SNAKE_STYLE,
        Paint::Fruit => FRUIT_STYLE,
    }
}

/// [`Surface`] writing into a ratatui buffer, clipped to `area`
///
/// Pixel rectangles are converted back to cells by dividing by the tile size.
pub struct BufferSurface<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    tile_size: u32,
}

impl<'a> BufferSurface<'a> {
    pub fn new(buf: &'a mut Buffer, area: Rect, tile_size: u32) -> Self {
        let area = area.intersection(buf.area);
        Self {
            buf,
            area,
            tile_size: tile_size.max(1),
        }
    }

    fn put(&mut self, column: u32, row: u32, symbol: &str, style: Style) {
        let x = u32::from(self.area.x) + column;
        let y = u32::from(self.area.y) + row;
        if x < u32::from(self.area.right()) && y < u32::from(self.area.bottom()) {
            self.buf[(x as u16, y as u16)].set_symbol(symbol).set_style(style);
        }
    }
}

impl Surface for BufferSurface<'_> {
    fn fill_rect(&mut self, rect: PixelRect, paint: Paint) {
        let style = paint_style(paint);
        let first_col = rect.x / self.tile_size;
        let first_row = rect.y / self.tile_size;
        let end_col = rect.x.saturating_add(rect.width).div_ceil(self.tile_size);
        let end_row = rect.y.saturating_add(rect.height).div_ceil(self.tile_size);

        for row in first_row..end_row {
            if row >= u32::from(self.area.height) {
                break;
            }
            for col in first_col..end_col {
                let column = col.saturating_mul(COLUMNS_PER_CELL);
                if column >= u32::from(self.area.width) {
                    break;
                }
                for offset in 0..COLUMNS_PER_CELL {
                    self.put(column + offset, row, "█", style);
                }
            }
        }
    }
}

/// The bordered playing field
pub struct BoardWidget<'a> {
    state: &'a GameState,
}

impl<'a> BoardWidget<'a> {
    pub fn new(state: &'a GameState) -> Self {
        Self { state }
    }

    /// Terminal size the board wants, border included
    pub fn size(state: &GameState) -> (u16, u16) {
        let width = (state.grid_width() as u32)
            .saturating_mul(COLUMNS_PER_CELL)
            .saturating_add(2);
        let height = (state.grid_height() as u32).saturating_add(2);
        (
            width.min(u32::from(u16::MAX)) as u16,
            height.min(u32::from(u16::MAX)) as u16,
        )
    }
}

impl Widget for BoardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::White))
            .title(" Snake ");
        let inner = block.inner(area);
        block.render(area, buf);

        let mut surface = BufferSurface::new(buf, inner, self.state.tile_size());

        let rows = (self.state.grid_height() as u32).min(u32::from(inner.height));
        let columns = (self.state.grid_width() as u32).min(u32::from(inner.width));
        for row in 0..rows {
            for col in 0..columns {
                surface.put(col * COLUMNS_PER_CELL, row, "·", EMPTY_STYLE);
                surface.put(col * COLUMNS_PER_CELL + 1, row, " ", EMPTY_STYLE);
            }
        }

        self.state.render(&mut surface);
    }
}
