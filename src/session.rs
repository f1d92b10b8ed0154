use std::collections::BTreeSet;
use std::time::SystemTime;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::config::ConfigurationError;
use crate::diff;
use crate::metrics;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ValueEnum, strum_macros::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Mode {
    /// a rolling stream of words drawn from the word corpus
    WordStream,
    /// one fixed passage, finished when fully typed
    FixedPassage,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Idle,
    Active,
    Finished,
}

/// The text being typed against. Regenerated per session, never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Words(Vec<String>),
    Passage(String),
}

impl Target {
    pub fn mode(&self) -> Mode {
        match self {
            Target::Words(_) => Mode::WordStream,
            Target::Passage(_) => Mode::FixedPassage,
        }
    }
}

/// One typing attempt from reset to Finished. All mutable session state
/// lives here; the diff and metrics modules are pure functions over it.
#[derive(Debug)]
pub struct Session {
    pub target: Target,
    pub cursor_word_index: usize,
    pub current_input: String,
    pub error_positions: BTreeSet<usize>,
    pub phase: Phase,
    pub started_at: Option<SystemTime>,
    pub duration_secs: u64,
    pub time_remaining: u64,
    pub wpm_history: Vec<u64>,
    // Characters and errors locked in by committed words, so accuracy
    // covers the whole session and not just the word under the cursor.
    committed_chars: usize,
    committed_errors: usize,
}

/// Read-only view handed to the presentation layer. The engine issues no
/// rendering calls itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub wpm: u64,
    pub accuracy: u8,
    pub time_remaining: u64,
    pub error_positions: BTreeSet<usize>,
    pub cursor_word_index: usize,
    pub current_input: String,
    pub wpm_history: Vec<u64>,
}

impl Session {
    pub fn new(target: Target, duration_secs: u64) -> Result<Self, ConfigurationError> {
        if duration_secs == 0 {
            return Err(ConfigurationError::NonPositiveDuration);
        }
        Ok(Self {
            target,
            cursor_word_index: 0,
            current_input: String::new(),
            error_positions: BTreeSet::new(),
            phase: Phase::Idle,
            started_at: None,
            duration_secs,
            time_remaining: duration_secs,
            wpm_history: Vec::new(),
            committed_chars: 0,
            committed_errors: 0,
        })
    }

    pub fn mode(&self) -> Mode {
        self.target.mode()
    }

    /// The comparison unit the input is diffed against: the word under the
    /// cursor in word-stream mode (empty once past the last word), or the
    /// whole passage.
    pub fn current_unit(&self) -> &str {
        match &self.target {
            Target::Words(words) => words
                .get(self.cursor_word_index)
                .map(String::as_str)
                .unwrap_or(""),
            Target::Passage(passage) => passage.as_str(),
        }
    }

    /// Full-value update from the input control. Each event carries the
    /// complete current string, so deletions and pastes need no special
    /// casing: the correctness map is recomputed from scratch every time.
    /// Inert once the session is Finished.
    pub fn accept_input(&mut self, value: &str) {
        if self.phase == Phase::Finished {
            return;
        }
        if self.phase == Phase::Idle {
            if value.is_empty() {
                return;
            }
            // First keystroke: the clock starts here, not at creation,
            // so wpm reflects the true typing rate.
            self.phase = Phase::Active;
            self.started_at = Some(SystemTime::now());
        }

        match self.mode() {
            Mode::WordStream => {
                if let Some(attempt) = diff::committed_word(value) {
                    let errors = diff::error_positions(attempt, self.current_unit());
                    self.committed_chars += attempt.chars().count();
                    self.committed_errors += errors.len();
                    self.cursor_word_index += 1;
                    self.current_input.clear();
                    self.error_positions.clear();
                } else {
                    self.error_positions = diff::error_positions(value, self.current_unit());
                    self.current_input = value.to_string();
                }
            }
            Mode::FixedPassage => {
                self.error_positions = diff::error_positions(value, self.current_unit());
                self.current_input = value.to_string();
                // Typing the full passage ends the session, correct or not.
                if self.current_input.chars().count() >= self.unit_len() {
                    self.finish();
                }
            }
        }
    }

    /// One-second countdown step. Inert unless Active; the terminal
    /// transition fires exactly once, and the countdown never goes
    /// negative.
    pub fn on_clock_tick(&mut self) {
        if self.phase != Phase::Active {
            return;
        }
        if self.time_remaining > 0 {
            self.time_remaining -= 1;
        }
        if self.time_remaining == 0 {
            self.finish();
        }
    }

    /// One-second WPM sample using state at this instant. Inert unless
    /// Active, so no sample lands after the terminal transition.
    pub fn on_sampler_tick(&mut self) {
        if self.phase != Phase::Active {
            return;
        }
        let wpm = self.wpm();
        self.wpm_history.push(wpm);
    }

    fn finish(&mut self) {
        self.phase = Phase::Finished;
    }

    fn unit_len(&self) -> usize {
        self.current_unit().chars().count()
    }

    pub fn total_typed(&self) -> usize {
        self.committed_chars + self.current_input.chars().count()
    }

    pub fn error_count(&self) -> usize {
        self.committed_errors + self.error_positions.len()
    }

    pub fn correct_chars(&self) -> usize {
        self.total_typed().saturating_sub(self.error_count())
    }

    pub fn accuracy(&self) -> u8 {
        metrics::accuracy_pct(self.correct_chars(), self.total_typed())
    }

    /// Seconds since the first keystroke. Before the session starts this
    /// falls back to the countdown delta, which is only meaningful for
    /// display.
    pub fn elapsed_secs(&self) -> f64 {
        match self.started_at {
            Some(at) => at.elapsed().map(|d| d.as_secs_f64()).unwrap_or(0.0),
            None => (self.duration_secs - self.time_remaining) as f64,
        }
    }

    pub fn wpm(&self) -> u64 {
        metrics::words_per_minute(self.correct_chars(), self.elapsed_secs())
    }

    pub fn peak_wpm(&self) -> u64 {
        self.wpm_history.iter().copied().max().unwrap_or(0)
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn has_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            wpm: self.wpm(),
            accuracy: self.accuracy(),
            time_remaining: self.time_remaining,
            error_positions: self.error_positions.clone(),
            cursor_word_index: self.cursor_word_index,
            current_input: self.current_input.clone(),
            wpm_history: self.wpm_history.clone(),
        }
    }
}
