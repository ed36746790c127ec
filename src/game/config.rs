use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::{GameError, Result};

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,

    // Timing
    /// Tick interval at score 0, in milliseconds
    pub initial_speed_ms: u64,
    /// How much faster each point makes the game, in milliseconds
    pub speed_decay_per_point_ms: u64,
    /// Fastest allowed tick interval, in milliseconds
    pub min_speed_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 30,
            grid_height: 20,
            initial_snake_length: 3,
            initial_speed_ms: 120,
            speed_decay_per_point_ms: 2,
            min_speed_ms: 60,
        }
    }
}

impl GameConfig {
    /// Create a configuration with a custom grid size.
    ///
    /// The binary always plays on the default grid; other sizes exist for tests
    /// and embedding.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Total number of cells on the grid
    pub fn cell_count(&self) -> usize {
        self.grid_width * self.grid_height
    }

    /// Tick interval for a given score: `max(min, initial - score * decay)`
    pub fn speed_for_score(&self, score: u32) -> Duration {
        let decay = self.speed_decay_per_point_ms.saturating_mul(score as u64);
        let ms = self
            .initial_speed_ms
            .saturating_sub(decay)
            .max(self.min_speed_ms);
        Duration::from_millis(ms)
    }

    /// Tick interval right after a restart
    pub fn initial_speed(&self) -> Duration {
        self.speed_for_score(0)
    }

    /// Check that a centred starting snake fits and leaves room for food
    pub fn validate(&self) -> Result<()> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(GameError::EmptyGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        if self.initial_snake_length == 0 {
            return Err(GameError::EmptySnake);
        }
        // Body trails left of the head at width / 2.
        if self.initial_snake_length > self.grid_width / 2 + 1 {
            return Err(GameError::SnakeDoesNotFit {
                length: self.initial_snake_length,
                width: self.grid_width,
            });
        }
        if self.initial_snake_length >= self.cell_count() {
            return Err(GameError::NoRoomForFood {
                width: self.grid_width,
                height: self.grid_height,
                length: self.initial_snake_length,
            });
        }
        Ok(())
    }
}
