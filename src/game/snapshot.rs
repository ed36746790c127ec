use super::state::{GameState, Position, RunState};

/// What a single grid cell shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Head,
    Body,
    Food,
}

/// Read-only copy of everything the presentation layer needs to draw a frame
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot {
    pub grid_width: usize,
    pub grid_height: usize,
    /// Snake cells, head first
    pub snake: Vec<Position>,
    pub food: Position,
    pub score: u32,
    pub status: String,
    pub run_state: RunState,
}

impl RenderSnapshot {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            grid_width: state.grid_width,
            grid_height: state.grid_height,
            snake: state.snake.body.clone(),
            food: state.food,
            score: state.score,
            status: state.status_text(),
            run_state: state.run_state,
        }
    }

    /// Snake cells paired with a flag marking the head
    pub fn segments(&self) -> impl DoubleEndedIterator<Item = (Position, bool)> + '_ {
        self.snake.iter().enumerate().map(|(i, pos)| (*pos, i == 0))
    }

    /// Rasterize into rows of cells, `grid[y][x]`.
    ///
    /// Snake segments are painted over the food, so after a win the head
    /// covers the last food cell.
    pub fn grid(&self) -> Vec<Vec<Cell>> {
        let mut grid = vec![vec![Cell::Empty; self.grid_width]; self.grid_height];

        let mut paint = |pos: Position, cell: Cell| {
            if pos.x >= 0 && pos.y >= 0 {
                if let Some(slot) = grid
                    .get_mut(pos.y as usize)
                    .and_then(|row| row.get_mut(pos.x as usize))
                {
                    *slot = cell;
                }
            }
        };

        paint(self.food, Cell::Food);
        // Tail to head so the head is painted last
        for (pos, is_head) in self.segments().rev() {
            paint(pos, if is_head { Cell::Head } else { Cell::Body });
        }

        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Snake};
    use std::time::Duration;

    fn snapshot() -> RenderSnapshot {
        let state = GameState::new(
            Snake::new(Position::new(2, 1), Direction::Right, 3),
            Position::new(4, 2),
            5,
            3,
            Duration::from_millis(120),
        );
        RenderSnapshot::from_state(&state)
    }

    #[test]
    fn test_snapshot_copies_state() {
        let snap = snapshot();
        assert_eq!(snap.snake[0], Position::new(2, 1));
        assert_eq!(snap.snake.len(), 3);
        assert_eq!(snap.food, Position::new(4, 2));
        assert_eq!(snap.run_state, RunState::Running);
        assert!(snap.status.starts_with("Score: 0"));
    }

    #[test]
    fn test_segments_flag_head_only() {
        let snap = snapshot();
        let flags: Vec<bool> = snap.segments().map(|(_, is_head)| is_head).collect();
        assert_eq!(flags, vec![true, false, false]);
    }

    #[test]
    fn test_grid_rasterization() {
        let grid = snapshot().grid();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0].len(), 5);

        assert_eq!(grid[1][2], Cell::Head);
        assert_eq!(grid[1][1], Cell::Body);
        assert_eq!(grid[1][0], Cell::Body);
        assert_eq!(grid[2][4], Cell::Food);
        assert_eq!(grid[0][0], Cell::Empty);
    }

    #[test]
    fn test_head_covers_food() {
        let mut snap = snapshot();
        snap.food = Position::new(2, 1);
        assert_eq!(snap.grid()[1][2], Cell::Head);
    }
}
