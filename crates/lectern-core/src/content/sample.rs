use super::{AdvancePolicy, Cue, FloatRef, Paragraph, Sequence, Speaker, WindowLayout};
use crate::{
    error::ConfigError,
    input::KeyCode,
    render::{PortraitId, Rgb},
    settings::SharedSlot,
    trigger::TriggerId,
};

/// Shared slot holding the global text speed used by the sample.
pub const TEXT_SPEED_SLOT: SharedSlot = SharedSlot(0);
pub const DEFAULT_TEXT_SPEED_CPS: f32 = 30.0;
/// Raised by the host once "someone knocks".
pub const KNOCK_TRIGGER: TriggerId = TriggerId(1);
pub const ADVANCE_KEY: KeyCode = KeyCode::Char('z');

pub const CUE_MUSIC_IN: Cue = Cue(1);
pub const CUE_MUSIC_OUT: Cue = Cue(2);
pub const CUE_DOOR_SFX: Cue = Cue(3);

/// Default sample text used by the demo player.
pub const DON_QUIJOTE_PARAGRAPHS: [&str; 4] = [
    "En un lugar de la Mancha, de cuyo nombre no quiero acordarme, no ha mucho tiempo que vivía un \
hidalgo de los de lanza en astillero.",
    "Frisaba la edad de nuestro hidalgo con los cincuenta años; era de complexión recia, seco de \
carnes, enjuto de rostro.",
    "Llaman a la puerta. Será el cura, o maese Nicolás, que viene a ver los libros.",
    "Pues, ¿qué haremos, señor? Vuestra merced mande, que yo le seguiré.",
];

/// Four paragraphs exercising every advancement policy: key press, timer,
/// external trigger, key press.
pub fn default_don_quijote_sequence() -> Result<Sequence, ConfigError> {
    let rate = FloatRef::Shared(TEXT_SPEED_SLOT);
    let narrator = Speaker::new("Narrador", Rgb::WHITE, PortraitId(0))?;
    let sancho = Speaker::new("Sancho", Rgb::new(0xe8, 0xb0, 0x4a), PortraitId(2))?;

    Sequence::new()
        .with_layout(WindowLayout::FULL)
        .on_open(CUE_MUSIC_IN)?
        .on_close(CUE_MUSIC_OUT)?
        .with_paragraph(
            Paragraph::new(
                DON_QUIJOTE_PARAGRAPHS[0],
                rate,
                AdvancePolicy::Input { key: ADVANCE_KEY },
            )?
            .with_speaker(narrator.clone()),
        )?
        .with_paragraph(
            Paragraph::new(
                DON_QUIJOTE_PARAGRAPHS[1],
                rate,
                AdvancePolicy::Timer {
                    delay_s: FloatRef::Constant(1.5),
                },
            )?
            .with_speaker(narrator),
        )?
        .with_paragraph(
            Paragraph::new(
                DON_QUIJOTE_PARAGRAPHS[2],
                FloatRef::Constant(45.0),
                AdvancePolicy::Event {
                    trigger: Some(KNOCK_TRIGGER),
                },
            )?
            .on_start_printing(CUE_DOOR_SFX)?,
        )?
        .with_paragraph(
            Paragraph::new(
                DON_QUIJOTE_PARAGRAPHS[3],
                rate,
                AdvancePolicy::Input { key: ADVANCE_KEY },
            )?
            .with_speaker(sancho),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_sequence_builds_with_every_policy() {
        let sequence = default_don_quijote_sequence().unwrap();
        assert_eq!(sequence.len(), 4);
        assert_eq!(sequence.layout(), Some(WindowLayout::FULL));

        let kinds: [&str; 4] = core::array::from_fn(|i| {
            sequence.paragraph(i as u16).unwrap().policy().as_str()
        });
        assert_eq!(kinds, ["input", "timer", "event", "input"]);
        assert!(sequence.paragraph(2).unwrap().speaker().is_none());
    }
}
