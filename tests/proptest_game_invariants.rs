//! Property-based invariant tests for the game state machine.
//!
//! Verifies:
//! 1. Each running tick moves the head by exactly the current direction's delta
//! 2. Length grows by one exactly on ticks that eat the fruit
//! 3. The fruit never sits on the snake while the game is live
//! 4. A reversal request never changes the direction
//! 5. After a terminal state, ticks and inputs change nothing

use proptest::prelude::*;
use tile_snake::game::{Direction, GameConfig, GameState, InputOutcome, Position, RunState};

// ── Strategy helpers ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Op {
    Turn(Direction),
    Tick,
}

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Right),
        Just(Direction::Down),
        Just(Direction::Left),
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => arb_direction().prop_map(Op::Turn),
        3 => Just(Op::Tick),
    ]
}

fn arb_config() -> impl Strategy<Value = GameConfig> {
    (2usize..=12, 2usize..=12, any::<u64>())
        .prop_map(|(width, height, seed)| GameConfig::new(width, height).with_seed(seed))
}

fn snapshot(state: &GameState) -> (Vec<Position>, Option<Position>, Direction) {
    (
        state.snake().segments().collect(),
        state.fruit(),
        state.direction(),
    )
}

// ── Properties ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn tick_moves_head_by_direction_delta(
        config in arb_config(),
        ops in prop::collection::vec(arb_op(), 1..200),
    ) {
        let mut state = GameState::new(&config).unwrap();

        for op in ops {
            match op {
                Op::Turn(direction) => {
                    state.handle_direction_input(direction);
                }
                Op::Tick => {
                    let running = state.run_state() == RunState::Running;
                    let head = state.snake().head();
                    let (dx, dy) = state.direction().delta();

                    state.tick();

                    if running {
                        prop_assert_eq!(state.snake().head(), head.moved_by(dx, dy));
                    } else {
                        prop_assert_eq!(state.snake().head(), head);
                    }
                }
            }
        }
    }

    #[test]
    fn length_grows_only_when_fruit_is_eaten(
        config in arb_config(),
        ops in prop::collection::vec(arb_op(), 1..200),
    ) {
        let mut state = GameState::new(&config).unwrap();

        for op in ops {
            match op {
                Op::Turn(direction) => {
                    state.handle_direction_input(direction);
                }
                Op::Tick => {
                    let running = state.run_state() == RunState::Running;
                    let len = state.snake().len();
                    let fruit = state.fruit();
                    let next = state.snake().head().moved_in_direction(state.direction());

                    let result = state.tick();

                    let should_eat = running && fruit == Some(next);
                    prop_assert_eq!(result.info.ate_fruit, should_eat);
                    let expected = if should_eat { len + 1 } else { len };
                    prop_assert_eq!(state.snake().len(), expected);
                }
            }
        }
    }

    #[test]
    fn fruit_never_on_snake(
        config in arb_config(),
        ops in prop::collection::vec(arb_op(), 1..300),
    ) {
        let mut state = GameState::new(&config).unwrap();
        prop_assert!(state.fruit().is_some_and(|fruit| !state.is_occupied_by_snake(fruit)));

        for op in ops {
            match op {
                Op::Turn(direction) => {
                    state.handle_direction_input(direction);
                }
                Op::Tick => {
                    let ate = state.tick().info.ate_fruit;
                    if ate && state.run_state() != RunState::BoardFull {
                        let fruit = state.fruit();
                        prop_assert!(fruit.is_some());
                        prop_assert!(fruit.is_some_and(|fruit| state.is_in_bounds(fruit)));
                        prop_assert!(fruit.is_some_and(|fruit| !state.is_occupied_by_snake(fruit)));
                    }
                }
            }
        }
    }

    #[test]
    fn reversal_never_changes_direction(
        config in arb_config(),
        ops in prop::collection::vec(arb_op(), 1..200),
    ) {
        let mut state = GameState::new(&config).unwrap();

        for op in ops {
            match op {
                Op::Turn(direction) => {
                    let before = state.direction();
                    let was_running = state.run_state() == RunState::Running;
                    let outcome = state.handle_direction_input(direction);
                    if before.is_opposite(direction) {
                        prop_assert_eq!(state.direction(), before);
                        if was_running {
                            prop_assert_eq!(outcome, InputOutcome::Ignored);
                        }
                    }
                }
                Op::Tick => {
                    state.tick();
                }
            }
        }
    }

    #[test]
    fn terminal_state_is_frozen(
        config in arb_config(),
        ops in prop::collection::vec(arb_op(), 1..300),
        after in prop::collection::vec(arb_op(), 1..50),
    ) {
        let mut state = GameState::new(&config).unwrap();

        for op in ops {
            if state.run_state().is_terminal() {
                break;
            }
            match op {
                Op::Turn(direction) => {
                    state.handle_direction_input(direction);
                }
                Op::Tick => {
                    state.tick();
                }
            }
        }

        // Drive straight until the game ends if the random ops did not
        state.handle_direction_input(state.direction());
        while !state.run_state().is_terminal() {
            state.tick();
        }

        let terminal = state.run_state();
        let frozen = snapshot(&state);

        for op in after {
            match op {
                Op::Turn(direction) => {
                    prop_assert_eq!(state.handle_direction_input(direction), InputOutcome::Ignored);
                }
                Op::Tick => {
                    let result = state.tick();
                    prop_assert!(!result.info.ate_fruit);
                    prop_assert_eq!(result.info.collision_type, None);
                }
            }
            prop_assert_eq!(state.run_state(), terminal);
            prop_assert_eq!(snapshot(&state), frozen.clone());
        }
    }
}
