use super::{InputEvent, InputProvider};

/// Input source that never reports anything, for timer/trigger-only dialogue.
#[derive(Default, Debug, Clone, Copy)]
pub struct MockInput;

impl MockInput {
    pub const fn new() -> Self {
        Self
    }
}

impl InputProvider for MockInput {
    type Error = core::convert::Infallible;

    fn poll_event(&mut self, _now_ms: u64) -> Result<Option<InputEvent>, Self::Error> {
        Ok(None)
    }
}

/// Replays timestamped events once the clock reaches them.
#[derive(Debug, Clone)]
pub struct ScriptedInput<'a> {
    events: &'a [(u64, InputEvent)],
    cursor: usize,
}

impl<'a> ScriptedInput<'a> {
    pub const fn new(events: &'a [(u64, InputEvent)]) -> Self {
        Self { events, cursor: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.events.len().saturating_sub(self.cursor)
    }
}

impl InputProvider for ScriptedInput<'_> {
    type Error = core::convert::Infallible;

    fn poll_event(&mut self, now_ms: u64) -> Result<Option<InputEvent>, Self::Error> {
        let Some(&(at_ms, event)) = self.events.get(self.cursor) else {
            return Ok(None);
        };
        if at_ms > now_ms {
            return Ok(None);
        }
        self.cursor = self.cursor.saturating_add(1);
        Ok(Some(event))
    }
}
