use log::debug;

use crate::{content::FloatRef, settings::SharedValues};

/// Advances a fixed delay after the paragraph finished printing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimerTriggered {
    delay_s: FloatRef,
    advance_at_ms: Option<u64>,
}

impl TimerTriggered {
    pub const fn new(delay_s: FloatRef) -> Self {
        Self {
            delay_s,
            advance_at_ms: None,
        }
    }

    pub fn advance_at_ms(&self) -> Option<u64> {
        self.advance_at_ms
    }

    pub(super) fn schedule(&mut self, now_ms: u64, shared: &SharedValues) {
        let delay_ms = (self.delay_s.seconds(shared) * 1_000.0) as u64;
        let at = now_ms.saturating_add(delay_ms);
        self.advance_at_ms = Some(at);
        debug!("strategy: timer armed delay_ms={} at_ms={}", delay_ms, at);
    }

    pub(super) fn cancel(&mut self) {
        self.advance_at_ms = None;
    }

    pub(super) fn poll(&mut self, now_ms: u64) -> bool {
        match self.advance_at_ms {
            Some(at) if now_ms >= at => {
                self.advance_at_ms = None;
                true
            }
            _ => false,
        }
    }
}
