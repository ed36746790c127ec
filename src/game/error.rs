use thiserror::Error;

/// Reasons a game cannot be set up with a given configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("initial snake of length {length} does not fit left of the centre of a {width}-wide grid")]
    SnakeDoesNotFit { length: usize, width: usize },
    #[error("initial snake must have at least one segment")]
    EmptySnake,
    #[error("a {width}x{height} grid leaves no room for food next to a snake of length {length}")]
    NoRoomForFood {
        width: usize,
        height: usize,
        length: usize,
    },
    #[error("snake segment ({x}, {y}) lies outside the grid")]
    SegmentOffGrid { x: i32, y: i32 },
    #[error("snake covers ({x}, {y}) more than once")]
    DuplicateSegment { x: i32, y: i32 },
    #[error("food at ({x}, {y}) must be on the grid and off the snake")]
    FoodMisplaced { x: i32, y: i32 },
}

pub type Result<T> = core::result::Result<T, GameError>;
