use std::time::{Duration, Instant};

/// Per-session play statistics. Nothing here outlives the process.
pub struct GameMetrics {
    /// Start of the current unpaused stretch, `None` while paused or stopped
    pub running_since: Option<Instant>,
    /// Play time banked from earlier stretches of this game
    pub banked_time: Duration,
    pub elapsed_time: Duration,
    pub best_score: u32,
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            running_since: Some(Instant::now()),
            banked_time: Duration::ZERO,
            elapsed_time: Duration::ZERO,
            best_score: 0,
            games_played: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.banked_time
            + self
                .running_since
                .map(|since| since.elapsed())
                .unwrap_or(Duration::ZERO);
    }

    pub fn on_game_start(&mut self) {
        self.running_since = Some(Instant::now());
        self.banked_time = Duration::ZERO;
        self.elapsed_time = Duration::ZERO;
    }

    /// Stop the clock, keeping the time played so far
    pub fn on_pause(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.banked_time += since.elapsed();
        }
        self.update();
    }

    pub fn on_resume(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    pub fn on_game_end(&mut self, final_score: u32) {
        self.on_pause();
        self.games_played += 1;
        if final_score > self.best_score {
            self.best_score = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
