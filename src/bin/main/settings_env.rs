use std::{env, fmt};

use lectern_core::{
    content::sample::TEXT_SPEED_SLOT,
    settings::{PersistedSettings, SettingsStore, SharedValues},
};
use log::info;

pub(super) const TEXT_SPEED_VAR: &str = "LECTERN_TEXT_SPEED";

#[derive(Clone, Debug, PartialEq)]
pub(super) enum EnvSettingsError {
    InvalidTextSpeed(String),
}

impl fmt::Display for EnvSettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTextSpeed(raw) => {
                write!(f, "{}={:?} is not a positive number", TEXT_SPEED_VAR, raw)
            }
        }
    }
}

/// Settings seeded from the environment. Saved values replace the seed for
/// the rest of the process.
#[derive(Debug, Default)]
pub(super) struct EnvSettingsStore {
    saved: Option<PersistedSettings>,
}

impl EnvSettingsStore {
    pub(super) fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for EnvSettingsStore {
    type Error = EnvSettingsError;

    fn load(&mut self) -> Result<Option<PersistedSettings>, Self::Error> {
        if let Some(saved) = self.saved {
            return Ok(Some(saved));
        }
        let Ok(raw) = env::var(TEXT_SPEED_VAR) else {
            return Ok(None);
        };
        parse_text_speed(&raw).map(|speed| {
            Some(PersistedSettings::new(
                SharedValues::new().with(TEXT_SPEED_SLOT, speed),
            ))
        })
    }

    fn save(&mut self, settings: &PersistedSettings) -> Result<(), Self::Error> {
        self.saved = Some(*settings);
        info!(
            "settings: saved text_speed={:?}",
            settings.shared.get(TEXT_SPEED_SLOT)
        );
        Ok(())
    }
}

fn parse_text_speed(raw: &str) -> Result<f32, EnvSettingsError> {
    match raw.trim().parse::<f32>() {
        Ok(speed) if speed.is_finite() && speed > 0.0 => Ok(speed),
        _ => Err(EnvSettingsError::InvalidTextSpeed(raw.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_speed_must_be_positive() {
        assert_eq!(parse_text_speed(" 45 "), Ok(45.0));
        assert!(parse_text_speed("0").is_err());
        assert!(parse_text_speed("fast").is_err());
        assert!(parse_text_speed("inf").is_err());
    }

    #[test]
    fn saved_settings_shadow_the_environment() {
        let mut store = EnvSettingsStore::new();
        let settings = PersistedSettings::new(SharedValues::new().with(TEXT_SPEED_SLOT, 12.0));

        store.save(&settings).expect("in-memory save");

        assert_eq!(store.load(), Ok(Some(settings)));
    }
}
