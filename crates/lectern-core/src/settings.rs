//! Shared tunables and their persistence abstraction.

pub const SHARED_SLOTS: usize = 8;

/// Index into the window's [`SharedValues`] table.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct SharedSlot(pub u8);

/// Values many paragraphs can reference at once, e.g. a global text speed.
/// Changes are observed by running print tasks on their next step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SharedValues {
    values: [f32; SHARED_SLOTS],
}

impl SharedValues {
    pub const fn new() -> Self {
        Self {
            values: [0.0; SHARED_SLOTS],
        }
    }

    pub fn get(&self, slot: SharedSlot) -> Option<f32> {
        self.values.get(slot.0 as usize).copied()
    }

    /// Returns `false` when the slot does not exist.
    pub fn set(&mut self, slot: SharedSlot, value: f32) -> bool {
        match self.values.get_mut(slot.0 as usize) {
            Some(current) => {
                *current = value;
                true
            }
            None => false,
        }
    }

    pub fn with(mut self, slot: SharedSlot, value: f32) -> Self {
        let _ = self.set(slot, value);
        self
    }
}

impl Default for SharedValues {
    fn default() -> Self {
        Self::new()
    }
}

/// User-tunable settings that should survive restarts.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PersistedSettings {
    pub shared: SharedValues,
}

impl PersistedSettings {
    pub const fn new(shared: SharedValues) -> Self {
        Self { shared }
    }
}

/// Abstract settings persistence backend.
pub trait SettingsStore {
    type Error;

    fn load(&mut self) -> Result<Option<PersistedSettings>, Self::Error>;
    fn save(&mut self, settings: &PersistedSettings) -> Result<(), Self::Error>;
}
