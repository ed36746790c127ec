use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::action::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
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

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Committed direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = vec![head];

        // Add initial body segments behind the head
        let (dx, dy) = direction.delta();
        let (back_dx, back_dy) = (-dx, -dy);

        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_by(back_dx, back_dy));
        }

        Self { body, direction }
    }

    /// Build a snake from explicit segments, head first
    pub fn from_segments(body: Vec<Position>, direction: Direction) -> Self {
        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Check whether moving the head onto `pos` runs into the body.
    ///
    /// The current tail is excluded: it vacates on a tick that eats nothing,
    /// and a tick that eats cannot target it because food is never on the snake.
    pub fn blocks(&self, pos: Position) -> bool {
        self.body[..self.body.len() - 1].contains(&pos)
    }

    /// Check if position is occupied by any segment
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Put a new head in front, growing by one
    pub fn push_head(&mut self, head: Position) {
        self.body.insert(0, head);
    }

    /// Drop the tail segment
    pub fn pop_tail(&mut self) -> Option<Position> {
        self.body.pop()
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
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

/// Whether the game accepts ticks and input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Running,
    Paused,
    GameOver,
    Won,
}

impl RunState {
    /// Game over or won: nothing happens until a restart
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::GameOver | RunState::Won)
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// Most recent accepted direction request, committed at the next tick
    pub pending_direction: Direction,
    pub food: Position,
    pub grid_width: usize,
    pub grid_height: usize,
    pub score: u32,
    /// Current tick interval
    pub speed: Duration,
    pub run_state: RunState,
}

impl GameState {
    /// Create a new running game state
    pub fn new(
        snake: Snake,
        food: Position,
        grid_width: usize,
        grid_height: usize,
        speed: Duration,
    ) -> Self {
        let pending_direction = snake.direction;
        Self {
            snake,
            pending_direction,
            food,
            grid_width,
            grid_height,
            score: 0,
            speed,
            run_state: RunState::Running,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.occupies(pos)
    }

    /// Total number of cells on the grid
    pub fn cell_count(&self) -> usize {
        self.grid_width * self.grid_height
    }

    /// Text for the status line, depending on the run state
    pub fn status_text(&self) -> String {
        let score = self.score;
        match self.run_state {
            RunState::Running => {
                format!("Score: {score} — Arrows/WASD move, Space pause, R restart")
            }
            RunState::Paused => format!("Score: {score} — Paused (press Space to resume)"),
            RunState::GameOver => format!("Game Over! Final score: {score} (press R to restart)"),
            RunState::Won => format!("You win! Final score: {score} (press R to restart)"),
        }
    }
}
