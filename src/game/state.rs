use anyhow::{Result, ensure};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{HashSet, VecDeque};

use super::config::GameConfig;
use super::direction::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    /// Body segments, with head at the front
    body: VecDeque<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a one-cell snake
    pub fn new(head: Position, direction: Direction) -> Self {
        Self {
            body: VecDeque::from([head]),
            direction,
        }
    }

    /// Create a snake from explicit segments, head first
    pub fn from_body(
        body: impl IntoIterator<Item = Position>,
        direction: Direction,
    ) -> Result<Self> {
        let body: VecDeque<Position> = body.into_iter().collect();
        ensure!(!body.is_empty(), "snake needs at least one segment");

        let mut seen = HashSet::with_capacity(body.len());
        for pos in &body {
            ensure!(seen.insert(*pos), "snake segment {:?} appears twice", pos);
        }

        Ok(Self { body, direction })
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Segments from head to tail
    pub fn segments(&self) -> impl Iterator<Item = Position> + '_ {
        self.body.iter().copied()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body.iter().skip(1).any(|&segment| segment == pos)
    }

    pub(crate) fn push_head(&mut self, head: Position) {
        self.body.push_front(head);
    }

    pub(crate) fn pop_tail(&mut self) {
        if self.body.len() > 1 {
            self.body.pop_back();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; a snake keeps at least its head
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Lifecycle of one game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Waiting for the first direction key
    NotStarted,
    Running,
    /// The snake hit a wall or itself
    GameOver,
    /// The snake covers every cell; nowhere left to place fruit
    BoardFull,
}

impl RunState {
    /// No transition leaves a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::GameOver | RunState::BoardFull)
    }
}

/// Complete game state
///
/// Owns the snake, the fruit and the fruit RNG. The driver calls
/// [`GameState::tick`] on every timer firing and
/// [`GameState::handle_direction_input`] for every mapped key press.
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) snake: Snake,
    pub(crate) fruit: Option<Position>,
    pub(crate) run_state: RunState,
    pub(crate) grid_width: usize,
    pub(crate) grid_height: usize,
    pub(crate) tile_size: u32,
    pub(crate) fruits_eaten: u32,
    pub(crate) steps: u32,
    pub(crate) rng: StdRng,
}

impl GameState {
    /// Fresh game: one-cell snake at the grid center heading right, fruit placed
    pub fn new(config: &GameConfig) -> Result<Self> {
        config.validate()?;

        let center = Position::new(
            (config.grid_width / 2) as i32,
            (config.grid_height / 2) as i32,
        );
        let mut state = Self::empty(config, Snake::new(center, Direction::Right));
        state.place_fruit();

        Ok(state)
    }

    /// Game set up from an explicit layout, still waiting for its first input
    pub fn from_parts(config: &GameConfig, snake: Snake, fruit: Position) -> Result<Self> {
        config.validate()?;

        let state = Self::empty(config, snake);
        for segment in state.snake.segments() {
            ensure!(
                state.is_in_bounds(segment),
                "snake segment {:?} is outside the {}x{} grid",
                segment,
                state.grid_width,
                state.grid_height
            );
        }
        ensure!(
            state.is_in_bounds(fruit),
            "fruit {:?} is outside the {}x{} grid",
            fruit,
            state.grid_width,
            state.grid_height
        );
        ensure!(
            !state.is_occupied_by_snake(fruit),
            "fruit {:?} lies on the snake",
            fruit
        );

        Ok(Self {
            fruit: Some(fruit),
            ..state
        })
    }

    fn empty(config: &GameConfig, snake: Snake) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            snake,
            fruit: None,
            run_state: RunState::NotStarted,
            grid_width: config.grid_width,
            grid_height: config.grid_height,
            tile_size: config.tile_size,
            fruits_eaten: 0,
            steps: 0,
            rng,
        }
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    /// Current fruit; `None` once the board is full
    pub fn fruit(&self) -> Option<Position> {
        self.fruit
    }

    pub fn direction(&self) -> Direction {
        self.snake.direction
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn fruits_eaten(&self) -> u32 {
        self.fruits_eaten
    }

    /// Ticks executed while running
    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn grid_width(&self) -> usize {
        self.grid_width
    }

    pub fn grid_height(&self) -> usize {
        self.grid_height
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && (pos.x as usize) < self.grid_width
            && pos.y >= 0
            && (pos.y as usize) < self.grid_height
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.contains(pos)
    }

    /// Cells not covered by the snake
    pub fn free_cells(&self) -> usize {
        let occupied = self
            .snake
            .segments()
            .filter(|&segment| self.is_in_bounds(segment))
            .count();
        self.grid_width
            .saturating_mul(self.grid_height)
            .saturating_sub(occupied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.moved_by(0, 1), Position::new(5, 6));
        assert_eq!(pos.moved_in_direction(Direction::Up), Position::new(5, 4));
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right);
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(snake.tail(), Position::new(5, 5));
    }

    #[test]
    fn test_snake_from_body() {
        let snake = Snake::from_body(
            [(5, 5), (5, 6), (5, 7)].map(Position::from),
            Direction::Up,
        )
        .unwrap();
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(snake.tail(), Position::new(5, 7));

        assert!(Snake::from_body(Vec::new(), Direction::Up).is_err());
        assert!(Snake::from_body([(1, 1), (1, 1)].map(Position::from), Direction::Up).is_err());
    }

    #[test]
    fn test_collision_detection() {
        let snake = Snake::from_body(
            [(5, 5), (4, 5), (3, 5)].map(Position::from),
            Direction::Right,
        )
        .unwrap();
        assert!(!snake.collides_with_body(Position::new(5, 5))); // head
        assert!(snake.collides_with_body(Position::new(4, 5))); // body
        assert!(!snake.collides_with_body(Position::new(10, 10))); // empty
    }

    #[test]
    fn test_pop_tail_keeps_head() {
        let mut snake = Snake::new(Position::new(1, 1), Direction::Right);
        snake.pop_tail();
        assert_eq!(snake.len(), 1);
    }

    #[test]
    fn test_new_game_layout() {
        let state = GameState::new(&GameConfig::default().with_seed(1)).unwrap();

        assert_eq!(state.run_state(), RunState::NotStarted);
        assert_eq!(state.direction(), Direction::Right);
        assert_eq!(state.snake().len(), 1);
        assert_eq!(state.snake().head(), Position::new(10, 10));

        let fruit = state.fruit().unwrap();
        assert!(state.is_in_bounds(fruit));
        assert_ne!(fruit, state.snake().head());
    }

    #[test]
    fn test_new_game_rejects_invalid_config() {
        assert!(GameState::new(&GameConfig::new(1, 1)).is_err());
    }

    #[test]
    fn test_from_parts_validation() {
        let config = GameConfig::new(10, 10);
        let snake = || Snake::new(Position::new(5, 5), Direction::Right);

        assert!(GameState::from_parts(&config, snake(), Position::new(1, 1)).is_ok());
        assert!(GameState::from_parts(&config, snake(), Position::new(5, 5)).is_err());
        assert!(GameState::from_parts(&config, snake(), Position::new(10, 1)).is_err());

        let outside = Snake::new(Position::new(-1, 0), Direction::Right);
        assert!(GameState::from_parts(&config, outside, Position::new(1, 1)).is_err());
    }

    #[test]
    fn test_bounds_checking() {
        let state = GameState::new(&GameConfig::new(20, 20).with_seed(3)).unwrap();

        assert!(state.is_in_bounds(Position::new(0, 0)));
        assert!(state.is_in_bounds(Position::new(19, 19)));
        assert!(!state.is_in_bounds(Position::new(-1, 0)));
        assert!(!state.is_in_bounds(Position::new(20, 0)));
        assert!(!state.is_in_bounds(Position::new(0, 20)));
        assert_eq!(state.free_cells(), 399);
    }

    #[test]
    fn test_free_cells_saturates_on_huge_grid() {
        let mut state = GameState::new(&GameConfig::small().with_seed(3)).unwrap();
        state.grid_width = usize::MAX;
        state.grid_height = 2;

        assert_eq!(state.free_cells(), usize::MAX - 1);
    }
}
