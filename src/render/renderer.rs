use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::board::BoardWidget;
use crate::game::{GameState, RunState};
use crate::metrics::GameMetrics;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(state, metrics), chunks[0]);

        let (board_width, board_height) = BoardWidget::size(state);
        let board_area = centered(chunks[1], board_width, board_height);
        frame.render_widget(BoardWidget::new(state), board_area);

        match state.run_state() {
            RunState::NotStarted => {
                let hint = centered(chunks[1], 30, 3);
                frame.render_widget(Clear, hint);
                frame.render_widget(self.render_start_hint(), hint);
            }
            RunState::Running => {}
            RunState::GameOver | RunState::BoardFull => {
                let panel = centered(chunks[1], 32, 8);
                frame.render_widget(Clear, panel);
                frame.render_widget(self.render_game_over(state), panel);
            }
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_stats(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Length: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.snake().len().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Fruit: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.fruits_eaten().to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM))
    }

    fn render_start_hint(&self) -> Paragraph<'_> {
        Paragraph::new(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled("an arrow key", Style::default().fg(Color::Cyan)),
            Span::styled(" to start", Style::default().fg(Color::Gray)),
        ]))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
    }

    fn render_game_over(&self, state: &GameState) -> Paragraph<'_> {
        let (title, color) = match state.run_state() {
            RunState::BoardFull => ("BOARD FULL", Color::Green),
            _ => ("GAME OVER", Color::Red),
        };

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Length: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.snake().len().to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Press any key to exit",
                Style::default().fg(Color::Gray),
            )]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::TOP))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// A `width` x `height` rectangle centered in `area`, shrunk to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
