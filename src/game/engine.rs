use rand::Rng;
use tracing::{debug, info, trace};

use super::{
    direction::Direction,
    state::{CollisionType, GameState, Position, RunState},
    surface::{Paint, PixelRect, Surface},
};

/// Information about a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepInfo {
    /// Whether the snake ate the fruit this step
    pub ate_fruit: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of a game tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    /// Run state after the tick
    pub run_state: RunState,
    pub info: StepInfo,
}

impl StepResult {
    /// Whether this tick ended the game; the tick source should stop
    pub fn terminated(&self) -> bool {
        self.run_state.is_terminal()
    }
}

/// What a direction key press did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Reversal, or the game is already over
    Ignored,
    /// Direction accepted while running
    Turned,
    /// First direction input; the tick source should start
    Started,
}

impl GameState {
    /// Request a new heading
    pub fn handle_direction_input(&mut self, direction: Direction) -> InputOutcome {
        if self.run_state.is_terminal() {
            return InputOutcome::Ignored;
        }

        let reversal = self.snake.direction.is_opposite(direction);
        if reversal {
            trace!(current = ?self.snake.direction, requested = ?direction, "reversal ignored");
        } else {
            self.snake.direction = direction;
        }

        // The first direction key starts the game, even a reversal
        if self.run_state == RunState::NotStarted {
            self.run_state = RunState::Running;
            info!(direction = ?self.snake.direction, "game started");
            return InputOutcome::Started;
        }

        if reversal {
            InputOutcome::Ignored
        } else {
            InputOutcome::Turned
        }
    }

    /// Advance the snake by one cell
    pub fn tick(&mut self) -> StepResult {
        if self.run_state != RunState::Running {
            return StepResult {
                run_state: self.run_state,
                info: StepInfo {
                    ate_fruit: false,
                    collision_type: None,
                },
            };
        }

        let new_head = self.snake.head().moved_in_direction(self.snake.direction);
        self.snake.push_head(new_head);

        // Growth is decided before the collision check
        let ate_fruit = self.fruit == Some(new_head);
        if ate_fruit {
            self.fruits_eaten += 1;
            debug!(length = self.snake.len(), "fruit eaten");
            self.place_fruit();
        } else {
            self.snake.pop_tail();
        }

        self.steps += 1;
        let collision_type = self.check_collision();

        StepResult {
            run_state: self.run_state,
            info: StepInfo {
                ate_fruit,
                collision_type,
            },
        }
    }

    /// Put the fruit on a uniformly random free cell
    ///
    /// When the snake covers the whole grid there is no such cell: the fruit
    /// is removed and the game ends as [`RunState::BoardFull`].
    pub fn place_fruit(&mut self) -> Option<Position> {
        if self.free_cells() == 0 {
            self.fruit = None;
            self.run_state = RunState::BoardFull;
            info!(length = self.snake.len(), "board full");
            return None;
        }

        let fruit = loop {
            let x = self.rng.gen_range(0..self.grid_width) as i32;
            let y = self.rng.gen_range(0..self.grid_height) as i32;
            let pos = Position::new(x, y);

            if !self.snake.contains(pos) {
                break pos;
            }
        };

        debug!(x = fruit.x, y = fruit.y, "fruit placed");
        self.fruit = Some(fruit);
        Some(fruit)
    }

    /// Check the current head against the walls and the rest of the body
    pub(crate) fn check_collision(&mut self) -> Option<CollisionType> {
        let head = self.snake.head();

        let collision = if !self.is_in_bounds(head) {
            CollisionType::Wall
        } else if self.snake.collides_with_body(head) {
            CollisionType::SelfCollision
        } else {
            return None;
        };

        self.run_state = RunState::GameOver;
        info!(
            ?collision,
            x = head.x,
            y = head.y,
            length = self.snake.len(),
            "game over"
        );
        Some(collision)
    }

    /// Draw the snake and the fruit, one tile per cell
    ///
    /// Cells outside the grid (a head that just hit a wall) are skipped.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        for segment in self.snake.segments() {
            if let Some(rect) = self.tile_rect(segment) {
                surface.fill_rect(rect, Paint::Snake);
            }
        }

        if let Some(rect) = self.fruit.and_then(|fruit| self.tile_rect(fruit)) {
            surface.fill_rect(rect, Paint::Fruit);
        }
    }

    /// Pixel rectangle covered by a cell
    pub fn tile_rect(&self, pos: Position) -> Option<PixelRect> {
        if !self.is_in_bounds(pos) {
            return None;
        }

        Some(PixelRect {
            x: (pos.x as u32).saturating_mul(self.tile_size),
            y: (pos.y as u32).saturating_mul(self.tile_size),
            width: self.tile_size,
            height: self.tile_size,
        })
    }
}
