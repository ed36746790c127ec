use super::{
    action::Direction,
    config::GameConfig,
    error::{GameError, Result},
    snapshot::RenderSnapshot,
    state::{CollisionType, GameState, Position, RunState, Snake},
};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info};

/// What the caller should do with its tick timer after an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Arm the timer to call `tick` once after this delay, replacing any armed tick
    TickAfter(Duration),
    /// Disarm the timer
    Cancel,
    /// Leave the timer as it is
    Keep,
}

/// Information about a step
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// False when the tick arrived outside `Running` and was dropped
    pub applied: bool,
    /// Run state after the step
    pub run_state: RunState,
    /// How to re-arm the tick timer
    pub schedule: Schedule,
    /// Additional information about the step
    pub info: StepInfo,
}

impl StepResult {
    fn ignored(run_state: RunState) -> Self {
        Self {
            applied: false,
            run_state,
            schedule: Schedule::Keep,
            info: StepInfo::default(),
        }
    }

    /// Whether the game has ended (lost or won)
    pub fn terminated(&self) -> bool {
        self.run_state.is_terminal()
    }
}

/// The game engine that owns the state and handles all game logic.
///
/// The engine never sleeps or touches a timer; every operation that affects
/// ticking returns a [`Schedule`] for the caller to act on.
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
    state: GameState,
}

impl GameEngine {
    /// Create a new game engine with the given configuration, seeded from the OS
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a game engine whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Start from a hand-built state instead of the centred layout.
    ///
    /// The state's own grid size is used for play; `config` supplies timing and
    /// the layout used by later restarts.
    pub fn with_state(config: GameConfig, state: GameState, seed: u64) -> Result<Self> {
        if state.grid_width == 0 || state.grid_height == 0 {
            return Err(GameError::EmptyGrid {
                width: state.grid_width,
                height: state.grid_height,
            });
        }
        if state.snake.is_empty() {
            return Err(GameError::EmptySnake);
        }
        if let Some(pos) = state.snake.body.iter().find(|p| !state.is_in_bounds(**p)) {
            return Err(GameError::SegmentOffGrid { x: pos.x, y: pos.y });
        }
        let mut seen = HashSet::with_capacity(state.snake.len());
        if let Some(pos) = state.snake.body.iter().find(|p| !seen.insert(**p)) {
            return Err(GameError::DuplicateSegment { x: pos.x, y: pos.y });
        }
        let food = state.food;
        if !state.is_in_bounds(food) || state.is_occupied_by_snake(food) {
            return Err(GameError::FoodMisplaced {
                x: food.x,
                y: food.y,
            });
        }

        Ok(Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            state,
        })
    }

    fn with_rng(config: GameConfig, mut rng: StdRng) -> Result<Self> {
        config.validate()?;

        let state = initial_state(&config, &mut rng);
        info!(
            width = config.grid_width,
            height = config.grid_height,
            "game created"
        );

        Ok(Self { config, rng, state })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn run_state(&self) -> RunState {
        self.state.run_state
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    /// Current tick interval
    pub fn speed(&self) -> Duration {
        self.state.speed
    }

    /// Copy of what should be on screen right now
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::from_state(&self.state)
    }

    /// Request a new direction for the next tick.
    ///
    /// Ignored unless running, and ignored when it would reverse the committed
    /// direction. Returns whether the request became the pending direction.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.state.run_state != RunState::Running {
            return false;
        }
        if self.state.snake.direction.is_opposite(direction) {
            debug!(?direction, "reversal rejected");
            return false;
        }

        self.state.pending_direction = direction;
        debug!(?direction, "pending direction set");
        true
    }

    /// Flip between running and paused. No effect once the game has ended.
    pub fn toggle_pause(&mut self) -> Schedule {
        match self.state.run_state {
            RunState::Running => {
                self.state.run_state = RunState::Paused;
                info!(score = self.state.score, "paused");
                Schedule::Cancel
            }
            RunState::Paused => {
                self.state.run_state = RunState::Running;
                info!(score = self.state.score, "resumed");
                // Resume moving right away, as if the pause never interrupted the loop
                Schedule::TickAfter(Duration::ZERO)
            }
            RunState::GameOver | RunState::Won => Schedule::Keep,
        }
    }

    /// Reset to the centred starting layout and start running.
    ///
    /// The first tick of the new game is due immediately.
    pub fn restart(&mut self) -> Schedule {
        self.state = initial_state(&self.config, &mut self.rng);
        info!("game restarted");
        Schedule::TickAfter(Duration::ZERO)
    }

    /// Execute one step of the game
    pub fn tick(&mut self) -> StepResult {
        if self.state.run_state != RunState::Running {
            return StepResult::ignored(self.state.run_state);
        }

        let state = &mut self.state;

        // Commit the buffered direction
        state.snake.direction = state.pending_direction;

        let new_head = state.snake.head().moved_in_direction(state.snake.direction);

        if let Some(collision_type) = check_collision(state, new_head) {
            state.run_state = RunState::GameOver;
            info!(
                score = state.score,
                ?collision_type,
                head = %new_head,
                "game over"
            );

            return StepResult {
                applied: true,
                run_state: RunState::GameOver,
                schedule: Schedule::Cancel,
                info: StepInfo {
                    ate_food: false,
                    collision_type: Some(collision_type),
                },
            };
        }

        state.snake.push_head(new_head);

        let ate_food = new_head == state.food;
        if ate_food {
            state.score += 1;
            state.speed = self.config.speed_for_score(state.score);
            debug!(score = state.score, speed_ms = state.speed.as_millis() as u64, "food eaten");

            let next_food = if state.snake.len() == state.cell_count() {
                None
            } else {
                place_food(
                    &mut self.rng,
                    &state.snake,
                    state.grid_width,
                    state.grid_height,
                )
            };

            match next_food {
                Some(food) => state.food = food,
                None => {
                    state.run_state = RunState::Won;
                    info!(score = state.score, "board filled, game won");

                    return StepResult {
                        applied: true,
                        run_state: RunState::Won,
                        schedule: Schedule::Cancel,
                        info: StepInfo {
                            ate_food: true,
                            collision_type: None,
                        },
                    };
                }
            }
        } else {
            state.snake.pop_tail();
        }

        StepResult {
            applied: true,
            run_state: RunState::Running,
            schedule: Schedule::TickAfter(state.speed),
            info: StepInfo {
                ate_food,
                collision_type: None,
            },
        }
    }
}

/// Build the centred starting layout for the configured grid
fn initial_state(config: &GameConfig, rng: &mut StdRng) -> GameState {
    let center_x = (config.grid_width / 2) as i32;
    let center_y = (config.grid_height / 2) as i32;

    let snake = Snake::new(
        Position::new(center_x, center_y),
        Direction::Right,
        config.initial_snake_length,
    );

    let food = place_food(rng, &snake, config.grid_width, config.grid_height);

    let mut state = GameState::new(
        snake,
        food.unwrap_or(Position::new(center_x, center_y)),
        config.grid_width,
        config.grid_height,
        config.initial_speed(),
    );
    // Only reachable when the starting snake already covers the grid
    if food.is_none() {
        state.run_state = RunState::Won;
    }
    state
}

/// Check if the new head position causes a collision
fn check_collision(state: &GameState, pos: Position) -> Option<CollisionType> {
    if !state.is_in_bounds(pos) {
        return Some(CollisionType::Wall);
    }

    if state.snake.blocks(pos) {
        return Some(CollisionType::SelfCollision);
    }

    None
}

/// Pick a uniformly random cell not covered by the snake.
///
/// Rejection sampling first; after `width * height` misses the empty cells are
/// listed and one is chosen directly. Returns `None` only on a full grid.
fn place_food<R: Rng + ?Sized>(
    rng: &mut R,
    snake: &Snake,
    width: usize,
    height: usize,
) -> Option<Position> {
    for _ in 0..width * height {
        let x = rng.gen_range(0..width) as i32;
        let y = rng.gen_range(0..height) as i32;
        let pos = Position::new(x, y);

        if !snake.occupies(pos) {
            return Some(pos);
        }
    }

    let empty: Vec<Position> = (0..height)
        .flat_map(|y| (0..width).map(move |x| Position::new(x as i32, y as i32)))
        .filter(|pos| !snake.occupies(*pos))
        .collect();

    empty.choose(rng).copied()
}
