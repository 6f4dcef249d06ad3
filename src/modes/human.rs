use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, info};

use crate::game::{Direction, GameConfig, GameState, InputOutcome, RunState, StepResult};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;
use crate::timer::Ticker;

/// Keyboard-driven game in the terminal
///
/// Owns the only [`GameState`]; ticks, key presses and redraws are all
/// handled on one task, one at a time.
pub struct HumanMode {
    state: GameState,
    ticker: Ticker,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let state = GameState::new(&config).context("Failed to set up game")?;

        Ok(Self {
            state,
            ticker: Ticker::new(config.tick_interval()),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        info!(
            length = self.state.snake().len(),
            fruits = self.state.fruits_eaten(),
            state = ?self.state.run_state(),
            "session ended"
        );

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick; only fires while the game is running
                _ = self.ticker.tick() => {
                    let result = self.state.tick();
                    self.on_step(&result);
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };

        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        // The result screen closes on any key
        if self.state.run_state().is_terminal() {
            self.should_quit = true;
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Turn(direction) => self.turn(direction),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    fn turn(&mut self, direction: Direction) {
        if self.state.handle_direction_input(direction) == InputOutcome::Started {
            self.ticker.start();
            self.metrics.on_game_start();
            debug!(period = ?self.ticker.period(), "tick source started");
        }
    }

    fn on_step(&mut self, result: &StepResult) {
        if !result.terminated() {
            return;
        }

        self.ticker.stop();
        self.metrics.on_game_end();

        match result.run_state {
            RunState::BoardFull => info!(
                length = self.state.snake().len(),
                time = %self.metrics.format_time(),
                "board filled"
            ),
            _ => info!(
                collision = ?result.info.collision_type,
                length = self.state.snake().len(),
                time = %self.metrics.format_time(),
                "snake crashed"
            ),
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
