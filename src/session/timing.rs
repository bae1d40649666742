use ahash::AHashMap;
use std::time::{Duration, Instant};

/// Wall-clock accounting for a session.
///
/// Elapsed time excludes paused spans: `elapsed = (paused_at || now)
/// - started - total_paused`. Per-question time accumulates additively
/// across revisits.
#[derive(Debug, Clone)]
pub struct TimeTracker {
    started: Instant,
    paused_at: Option<Instant>,
    total_paused: Duration,
    per_question: AHashMap<String, Duration>,
    active_question: Option<(String, Instant)>,
}

impl TimeTracker {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            paused_at: None,
            total_paused: Duration::ZERO,
            per_question: AHashMap::new(),
            active_question: None,
        }
    }

    /// Pausing twice is a no-op; the first pause instant stands.
    pub fn pause(&mut self) {
        if self.paused_at.is_none() {
            self.paused_at = Some(Instant::now());
        }
    }

    /// Resuming while running is a no-op.
    pub fn resume(&mut self) {
        if let Some(paused_at) = self.paused_at.take() {
            self.total_paused += paused_at.elapsed();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Active (non-paused) time since the tracker started.
    pub fn elapsed(&self) -> Duration {
        let end = self.paused_at.unwrap_or_else(Instant::now);
        end.duration_since(self.started)
            .checked_sub(self.total_paused)
            .unwrap_or(Duration::ZERO)
    }

    /// Marks `question_id` as the question being viewed, closing out the
    /// time of the previously active one.
    pub fn enter_question(&mut self, question_id: impl Into<String>) {
        self.close_active();
        self.active_question = Some((question_id.into(), Instant::now()));
    }

    /// Closes out the active question without opening a new one.
    pub fn leave_question(&mut self) {
        self.close_active();
    }

    /// Total accumulated time on a question, including the in-progress span
    /// when it is the active one.
    pub fn time_on_question(&self, question_id: &str) -> Duration {
        let accumulated = self
            .per_question
            .get(question_id)
            .copied()
            .unwrap_or(Duration::ZERO);
        match &self.active_question {
            Some((active_id, since)) if active_id == question_id => accumulated + since.elapsed(),
            _ => accumulated,
        }
    }

    fn close_active(&mut self) {
        if let Some((question_id, since)) = self.active_question.take() {
            *self.per_question.entry(question_id).or_default() += since.elapsed();
        }
    }
}
