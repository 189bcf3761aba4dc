use crate::input::{KeyCode, KeyEdges};

/// First press fast-forwards, the press after printing finished advances.
/// Which of the two happens is decided by the owner from the finish flag,
/// not by counting presses.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InputTriggered {
    key: KeyCode,
}

impl InputTriggered {
    pub const fn new(key: KeyCode) -> Self {
        Self { key }
    }

    pub fn key(&self) -> KeyCode {
        self.key
    }

    pub(super) fn poll(&self, keys: &KeyEdges) -> bool {
        keys.newly_pressed(self.key)
    }
}
