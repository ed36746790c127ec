use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Cell, RenderSnapshot, RunState};
use crate::metrics::GameMetrics;

/// Terminal columns per grid cell when nothing else is configured
pub const DEFAULT_CELL_WIDTH: u16 = 2;

pub struct Renderer {
    cell_width: u16,
}

impl Renderer {
    pub fn new(cell_width: u16) -> Self {
        Self {
            cell_width: cell_width.max(1),
        }
    }

    pub fn cell_width(&self) -> u16 {
        self.cell_width
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &RenderSnapshot, metrics: &GameMetrics) {
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Game area
            Constraint::Length(3), // Status line
        ])
        .areas(frame.area());

        frame.render_widget(self.render_stats(snapshot, metrics), header);

        // Fixed-size board, centred in the game area
        let board_width = snapshot.grid_width as u16 * self.cell_width + 2;
        let board_height = snapshot.grid_height as u16 + 2;
        let [column] = Layout::horizontal([Constraint::Length(board_width)])
            .flex(Flex::Center)
            .areas(body);
        let [board] = Layout::vertical([Constraint::Length(board_height)])
            .flex(Flex::Center)
            .areas(column);

        frame.render_widget(self.render_grid(snapshot), board);
        frame.render_widget(self.render_status(snapshot), footer);
    }

    fn render_grid(&self, snapshot: &RenderSnapshot) -> Paragraph<'_> {
        let width = self.cell_width as usize;

        let lines: Vec<Line> = snapshot
            .grid()
            .into_iter()
            .map(|row| {
                let spans: Vec<Span> = row
                    .into_iter()
                    .map(|cell| match cell {
                        Cell::Head => Span::styled(
                            "█".repeat(width),
                            Style::default()
                                .fg(Color::LightGreen)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Cell::Body => {
                            Span::styled("▓".repeat(width), Style::default().fg(Color::Green))
                        }
                        Cell::Food => Span::styled(
                            format!("{:<width$}", "●"),
                            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                        ),
                        Cell::Empty => Span::styled(
                            format!("{:<width$}", "·"),
                            Style::default().fg(Color::DarkGray),
                        ),
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(border_color(snapshot.run_state)))
                .title(" Snake ")
                .title_bottom(" Q quit "),
        )
    }

    fn render_stats(&self, snapshot: &RenderSnapshot, metrics: &GameMetrics) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                metrics.best_score.max(snapshot.score).to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_status(&self, snapshot: &RenderSnapshot) -> Paragraph<'_> {
        let style = match snapshot.run_state {
            RunState::Running => Style::default().fg(Color::Gray),
            RunState::Paused => Style::default().fg(Color::Yellow),
            RunState::GameOver => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            RunState::Won => Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        };

        Paragraph::new(Line::from(Span::styled(snapshot.status.clone(), style)))
            .alignment(Alignment::Center)
    }
}

fn border_color(run_state: RunState) -> Color {
    match run_state {
        RunState::Running => Color::White,
        RunState::Paused => Color::Yellow,
        RunState::GameOver => Color::Red,
        RunState::Won => Color::Green,
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameState, Position, Snake};
    use ratatui::{Terminal, backend::TestBackend};
    use std::time::Duration;

    fn snapshot(run_state: RunState) -> RenderSnapshot {
        let mut state = GameState::new(
            Snake::new(Position::new(5, 3), Direction::Right, 3),
            Position::new(8, 1),
            10,
            6,
            Duration::from_millis(120),
        );
        state.score = 3;
        state.run_state = run_state;
        RenderSnapshot::from_state(&state)
    }

    fn draw(renderer: &Renderer, snapshot: &RenderSnapshot) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|frame| renderer.render(frame, snapshot, &GameMetrics::new()))
            .unwrap();

        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_status_line_is_drawn() {
        let text = draw(&Renderer::default(), &snapshot(RunState::GameOver));
        assert!(text.contains("Game Over! Final score: 3 (press R to restart)"));

        let text = draw(&Renderer::default(), &snapshot(RunState::Won));
        assert!(text.contains("You win! Final score: 3 (press R to restart)"));
    }

    #[test]
    fn test_board_cells_are_drawn() {
        let text = draw(&Renderer::new(2), &snapshot(RunState::Running));
        assert!(text.contains("▓▓▓▓██"));
        assert_eq!(text.matches('●').count(), 1);
        assert!(text.contains("Score: "));
    }

    #[test]
    fn test_cell_width_has_floor() {
        assert_eq!(Renderer::new(0).cell_width(), 1);
        assert_eq!(Renderer::default().cell_width(), DEFAULT_CELL_WIDTH);
    }
}
