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

use super::timer::{TickHandle, TickTimer};
use crate::game::{GameEngine, RunState, Schedule};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

pub struct HumanMode {
    engine: GameEngine,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    timer: TickTimer,
    /// The tick this mode armed last; fired ticks with another handle are stale
    pending_tick: Option<TickHandle>,
    should_quit: bool,
    needs_redraw: bool,
}

impl HumanMode {
    pub fn new(engine: GameEngine, renderer: Renderer) -> Self {
        let first_tick = match engine.run_state() {
            RunState::Running => Schedule::TickAfter(engine.speed()),
            _ => Schedule::Keep,
        };

        let mut mode = Self {
            engine,
            metrics: GameMetrics::new(),
            renderer,
            input_handler: InputHandler::new(),
            timer: TickTimer::new(),
            pending_tick: None,
            should_quit: false,
            needs_redraw: true,
        };
        mode.schedule(first_tick);
        mode
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
            games_played = self.metrics.games_played,
            best_score = self.metrics.best_score,
            "session finished"
        );
        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Keeps the play clock in the header moving between ticks
        let mut clock_timer = interval(Duration::from_secs(1));

        loop {
            if self.needs_redraw {
                let snapshot = self.engine.snapshot();
                self.metrics.update();
                terminal
                    .draw(|frame| {
                        self.renderer.render(frame, &snapshot, &self.metrics);
                    })
                    .context("Failed to draw frame")?;
                self.needs_redraw = false;
            }

            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => {
                            return Err(err).context("Failed to read terminal event");
                        }
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                handle = self.timer.fired() => {
                    self.on_fired(handle);
                }

                _ = clock_timer.tick() => {
                    if self.engine.run_state() == RunState::Running {
                        self.needs_redraw = true;
                    }
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
        match event {
            // Only process key press events, not release
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let action = self.input_handler.handle_key_event(key);
                self.handle_action(action);
            }
            Event::Resize(..) => self.needs_redraw = true,
            _ => {}
        }
    }

    fn handle_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Turn(direction) => {
                self.engine.set_direction(direction);
            }
            KeyAction::TogglePause => {
                let schedule = self.engine.toggle_pause();
                self.schedule(schedule);
                match self.engine.run_state() {
                    RunState::Paused => self.metrics.on_pause(),
                    RunState::Running => self.metrics.on_resume(),
                    _ => {}
                }
                self.needs_redraw = true;
            }
            KeyAction::Restart => self.reset_game(),
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }
    }

    /// Arm, cancel or keep the next tick as the engine asked
    fn schedule(&mut self, schedule: Schedule) {
        match schedule {
            Schedule::TickAfter(delay) => self.pending_tick = Some(self.timer.arm(delay)),
            Schedule::Cancel => {
                if let Some(handle) = self.pending_tick.take() {
                    self.timer.cancel(handle);
                }
            }
            Schedule::Keep => {}
        }
    }

    fn on_fired(&mut self, handle: TickHandle) {
        if self.pending_tick != Some(handle) {
            debug!(?handle, "stale tick ignored");
            return;
        }
        self.pending_tick = None;
        self.on_tick();
    }

    fn on_tick(&mut self) {
        let result = self.engine.tick();
        if !result.applied {
            debug!(run_state = ?result.run_state, "tick dropped");
            return;
        }

        self.schedule(result.schedule);

        // Track game over
        if result.terminated() {
            self.metrics.on_game_end(self.engine.score());
        }

        self.needs_redraw = true;
    }

    fn reset_game(&mut self) {
        // Drop any armed tick before the layout changes
        self.schedule(Schedule::Cancel);
        let schedule = self.engine.restart();
        self.schedule(schedule);
        self.metrics.on_game_start();
        self.needs_redraw = true;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameConfig, GameState, Position, Snake};

    fn mode_about_to_crash() -> HumanMode {
        let config = GameConfig::default();
        let state = GameState::new(
            Snake::new(Position::new(29, 10), Direction::Right, 3),
            Position::new(0, 0),
            30,
            20,
            config.initial_speed(),
        );
        let engine = GameEngine::with_state(config, state, 1).unwrap();
        HumanMode::new(engine, Renderer::default())
    }

    #[test]
    fn test_game_initialization() {
        let engine = GameEngine::with_seed(GameConfig::default(), 1).unwrap();
        let mode = HumanMode::new(engine, Renderer::default());

        assert_eq!(mode.engine.run_state(), RunState::Running);
        assert_eq!(mode.engine.score(), 0);
        assert!(mode.timer.is_armed());
        assert!(mode.needs_redraw);
    }

    #[test]
    fn test_game_over_disarms_timer() {
        let mut mode = mode_about_to_crash();

        mode.on_tick();

        assert_eq!(mode.engine.run_state(), RunState::GameOver);
        assert!(!mode.timer.is_armed());
        assert_eq!(mode.metrics.games_played, 1);
    }

    #[test]
    fn test_game_reset() {
        let mut mode = mode_about_to_crash();
        mode.on_tick();
        mode.needs_redraw = false;

        mode.handle_action(KeyAction::Restart);

        assert_eq!(mode.engine.run_state(), RunState::Running);
        assert_eq!(mode.engine.score(), 0);
        assert_eq!(mode.engine.state().snake.head(), Position::new(15, 10));
        assert!(mode.timer.is_armed());
        assert!(mode.needs_redraw);
    }

    #[test]
    fn test_pause_toggles_timer() {
        let mut mode = mode_about_to_crash();

        mode.handle_action(KeyAction::TogglePause);
        assert_eq!(mode.engine.run_state(), RunState::Paused);
        assert!(!mode.timer.is_armed());
        assert!(mode.metrics.running_since.is_none());

        // A stale tick while paused changes nothing
        mode.on_tick();
        assert_eq!(mode.engine.state().snake.head(), Position::new(29, 10));

        mode.handle_action(KeyAction::TogglePause);
        assert_eq!(mode.engine.run_state(), RunState::Running);
        assert!(mode.timer.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_ticks_immediately() {
        let mut mode = mode_about_to_crash();
        mode.on_tick();

        mode.handle_action(KeyAction::Restart);
        let start = tokio::time::Instant::now();
        let handle = mode.timer.fired().await;

        assert_eq!(start.elapsed(), Duration::ZERO);
        mode.on_fired(handle);
        assert_eq!(mode.engine.state().snake.head(), Position::new(16, 10));
    }

    #[test]
    fn test_stale_tick_is_ignored() {
        let mut mode = mode_about_to_crash();
        let before_restart = mode.pending_tick.unwrap();

        mode.handle_action(KeyAction::Restart);
        let current = mode.pending_tick.unwrap();
        assert_ne!(before_restart, current);

        mode.on_fired(before_restart);
        assert_eq!(mode.engine.state().snake.head(), Position::new(15, 10));
        assert_eq!(mode.pending_tick, Some(current));

        mode.on_fired(current);
        assert_eq!(mode.engine.state().snake.head(), Position::new(16, 10));
    }

    #[test]
    fn test_turn_is_forwarded() {
        let mut mode = mode_about_to_crash();

        mode.handle_action(KeyAction::Turn(Direction::Up));
        mode.on_tick();

        assert_eq!(mode.engine.run_state(), RunState::Running);
        assert_eq!(mode.engine.state().snake.head(), Position::new(29, 9));
    }

    #[test]
    fn test_quit() {
        let mut mode = mode_about_to_crash();
        mode.handle_action(KeyAction::Quit);
        assert!(mode.should_quit);
    }
}
