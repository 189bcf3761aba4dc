//! Typewriter printing: reveals a paragraph a few characters at a time.
//!
//! The task is a resumable state machine driven by the owner's tick. Each time
//! it runs it adds `rate * elapsed` to a fractional character budget, appends
//! one character per whole unit, then suspends for `1 / rate` seconds no matter
//! how many characters went out. A large gap between runs therefore prints a
//! burst followed by a single ordinary pause.

use crate::text_policy::char_at;

/// Receives the progressively growing visible text.
pub trait TextSink {
    fn clear_text(&mut self);
    /// Returns `false` when the sink is full.
    fn push_char(&mut self, ch: char) -> bool;
    fn set_text(&mut self, text: &str);
}

impl<const N: usize> TextSink for heapless::String<N> {
    fn clear_text(&mut self) {
        self.clear();
    }

    fn push_char(&mut self, ch: char) -> bool {
        self.push(ch).is_ok()
    }

    fn set_text(&mut self, text: &str) {
        self.clear();
        for ch in text.chars() {
            if self.push(ch).is_err() {
                break;
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Phase {
    Idle,
    Printing,
    /// Everything is out; one last pause before reporting completion.
    Trailing,
    Done,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PrintStep {
    /// Not running (never started, finished or cancelled).
    Idle,
    Suspended,
    Printed { appended: u16 },
    /// Reported exactly once per run.
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrintTask {
    phase: Phase,
    cursor: usize,
    printed: u16,
    budget: f32,
    last_run_ms: u64,
    resume_at_ms: u64,
}

impl Default for PrintTask {
    fn default() -> Self {
        Self::idle()
    }
}

impl PrintTask {
    pub const fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            cursor: 0,
            printed: 0,
            budget: 0.0,
            last_run_ms: 0,
            resume_at_ms: 0,
        }
    }

    /// Clears the sink and runs the first step right away. The budget starts
    /// at one character, so the first character shows immediately. Empty
    /// text finishes here, without a trailing pause.
    pub fn start<S: TextSink>(
        &mut self,
        text: &str,
        rate_cps: f32,
        now_ms: u64,
        sink: &mut S,
    ) -> PrintStep {
        sink.clear_text();
        *self = Self {
            phase: Phase::Printing,
            cursor: 0,
            printed: 0,
            budget: 1.0,
            last_run_ms: now_ms,
            resume_at_ms: now_ms,
        };
        if text.is_empty() {
            self.phase = Phase::Done;
            return PrintStep::Finished;
        }
        self.step(text, rate_cps, now_ms, sink)
    }

    /// `text` and `rate_cps` are re-read on every step; the text must be the
    /// one the task was started with.
    pub fn step<S: TextSink>(
        &mut self,
        text: &str,
        rate_cps: f32,
        now_ms: u64,
        sink: &mut S,
    ) -> PrintStep {
        match self.phase {
            Phase::Idle | Phase::Done => PrintStep::Idle,
            _ if now_ms < self.resume_at_ms => PrintStep::Suspended,
            Phase::Trailing => {
                self.phase = Phase::Done;
                PrintStep::Finished
            }
            Phase::Printing => {
                let elapsed_ms = now_ms.saturating_sub(self.last_run_ms);
                self.budget += rate_cps * elapsed_ms as f32 / 1_000.0;
                self.last_run_ms = now_ms;

                let mut appended = 0u16;
                while self.budget >= 1.0 {
                    let Some((ch, next)) = char_at(text, self.cursor) else {
                        break;
                    };
                    if !sink.push_char(ch) {
                        self.cursor = text.len();
                        break;
                    }
                    self.cursor = next;
                    self.budget -= 1.0;
                    appended += 1;
                }

                self.printed = self.printed.saturating_add(appended);
                if self.cursor >= text.len() {
                    self.phase = Phase::Trailing;
                }
                self.resume_at_ms = now_ms.saturating_add(step_delay_ms(rate_cps));
                PrintStep::Printed { appended }
            }
        }
    }

    /// Stops immediately. Returns whether the task was still running.
    pub fn cancel(&mut self) -> bool {
        let was_running = self.is_running();
        if was_running {
            self.phase = Phase::Done;
        }
        was_running
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Printing | Phase::Trailing)
    }

    pub fn printed_chars(&self) -> u16 {
        self.printed
    }

    pub fn resume_at_ms(&self) -> u64 {
        self.resume_at_ms
    }
}

/// Pause between runs: `1 / rate` seconds in whole milliseconds, at least 1.
pub fn step_delay_ms(rate_cps: f32) -> u64 {
    ((1_000.0 / rate_cps) as u64).max(1)
}
