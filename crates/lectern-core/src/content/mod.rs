//! Dialogue content: paragraphs, speakers, advancement policies and sequences.

pub mod sample;

use heapless::Vec;

use crate::{
    error::ConfigError,
    input::KeyCode,
    render::{PortraitId, Rgb},
    settings::{SharedSlot, SharedValues},
    text_policy::{
        MAX_PARAGRAPH_CHARS, MAX_SPEAKER_NAME_CHARS, ParagraphText, SpeakerName, bounded_text,
    },
    trigger::TriggerId,
};

pub const MAX_CUES: usize = 4;
pub const MAX_SEQUENCE_PARAGRAPHS: usize = 32;

/// Host-defined callback identity. Invoking a cue list means emitting one
/// [`crate::window::DialogueEvent::Cue`] per entry, in order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Cue(pub u16);

pub type CueList = Vec<Cue, MAX_CUES>;

/// A float that is either fixed per paragraph or read from a shared slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FloatRef {
    Constant(f32),
    Shared(SharedSlot),
}

impl FloatRef {
    /// Raw value; unknown shared slots read as `0.0`.
    pub fn resolve(self, shared: &SharedValues) -> f32 {
        match self {
            Self::Constant(value) => value,
            Self::Shared(slot) => shared.get(slot).unwrap_or(0.0),
        }
    }

    /// Characters per second, floored at `min_cps`.
    pub fn rate_cps(self, shared: &SharedValues, min_cps: f32) -> f32 {
        let value = self.resolve(shared);
        if value.is_finite() && value >= min_cps {
            value
        } else {
            min_cps
        }
    }

    /// Seconds, floored at zero.
    pub fn seconds(self, shared: &SharedValues) -> f32 {
        let value = self.resolve(shared);
        if value.is_finite() && value > 0.0 {
            value
        } else {
            0.0
        }
    }
}

/// How a paragraph moves on. Exactly one policy is live per paragraph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AdvancePolicy {
    /// Advance when an external trigger is raised. `None` is a content bug
    /// that is reported at load; the paragraph then never auto-advances.
    Event { trigger: Option<TriggerId> },
    /// First press fast-forwards, the press after printing finished advances.
    Input { key: KeyCode },
    /// Advance `delay_s` seconds after printing finished.
    Timer { delay_s: FloatRef },
}

impl AdvancePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Event { .. } => "event",
            Self::Input { .. } => "input",
            Self::Timer { .. } => "timer",
        }
    }
}

/// Display identity of whoever speaks a paragraph.
#[derive(Clone, Debug, PartialEq)]
pub struct Speaker {
    name: SpeakerName,
    color: Rgb,
    portrait: PortraitId,
}

impl Speaker {
    pub fn new(name: &str, color: Rgb, portrait: PortraitId) -> Result<Self, ConfigError> {
        Ok(Self {
            name: bounded_text(name, MAX_SPEAKER_NAME_CHARS)?,
            color,
            portrait,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn portrait(&self) -> PortraitId {
        self.portrait
    }
}

/// One screen of dialogue text.
#[derive(Clone, Debug, PartialEq)]
pub struct Paragraph {
    text: ParagraphText,
    print_rate: FloatRef,
    speaker: Option<Speaker>,
    policy: AdvancePolicy,
    on_start_printing: CueList,
    on_finish_printing: CueList,
}

impl Paragraph {
    pub fn new(text: &str, print_rate: FloatRef, policy: AdvancePolicy) -> Result<Self, ConfigError> {
        if let FloatRef::Constant(rate) = print_rate
            && !(rate.is_finite() && rate > 0.0)
        {
            return Err(ConfigError::NonPositiveRate);
        }
        if let AdvancePolicy::Timer {
            delay_s: FloatRef::Constant(delay),
        } = policy
            && !(delay.is_finite() && delay >= 0.0)
        {
            return Err(ConfigError::InvalidDelay);
        }

        Ok(Self {
            text: bounded_text(text, MAX_PARAGRAPH_CHARS)?,
            print_rate,
            speaker: None,
            policy,
            on_start_printing: Vec::new(),
            on_finish_printing: Vec::new(),
        })
    }

    pub fn with_speaker(mut self, speaker: Speaker) -> Self {
        self.speaker = Some(speaker);
        self
    }

    pub fn on_start_printing(mut self, cue: Cue) -> Result<Self, ConfigError> {
        push_cue(&mut self.on_start_printing, cue)?;
        Ok(self)
    }

    pub fn on_finish_printing(mut self, cue: Cue) -> Result<Self, ConfigError> {
        push_cue(&mut self.on_finish_printing, cue)?;
        Ok(self)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn print_rate(&self) -> FloatRef {
        self.print_rate
    }

    pub fn speaker(&self) -> Option<&Speaker> {
        self.speaker.as_ref()
    }

    pub fn policy(&self) -> &AdvancePolicy {
        &self.policy
    }

    pub fn start_cues(&self) -> &[Cue] {
        &self.on_start_printing
    }

    pub fn finish_cues(&self) -> &[Cue] {
        &self.on_finish_printing
    }
}

/// Which optional elements the window presenting a sequence has.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WindowLayout {
    pub title_slot: bool,
    pub portrait_slot: bool,
}

impl WindowLayout {
    pub const FULL: Self = Self {
        title_slot: true,
        portrait_slot: true,
    };
    pub const BODY_ONLY: Self = Self {
        title_slot: false,
        portrait_slot: false,
    };
}

/// Ordered paragraphs shown one at a time in a single window.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Sequence {
    layout: Option<WindowLayout>,
    paragraphs: Vec<Paragraph, MAX_SEQUENCE_PARAGRAPHS>,
    on_open: CueList,
    on_close: CueList,
}

impl Sequence {
    pub const fn new() -> Self {
        Self {
            layout: None,
            paragraphs: Vec::new(),
            on_open: Vec::new(),
            on_close: Vec::new(),
        }
    }

    pub fn with_layout(mut self, layout: WindowLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn push(&mut self, paragraph: Paragraph) -> Result<(), ConfigError> {
        self.paragraphs
            .push(paragraph)
            .map_err(|_| ConfigError::CapacityExceeded)
    }

    pub fn with_paragraph(mut self, paragraph: Paragraph) -> Result<Self, ConfigError> {
        self.push(paragraph)?;
        Ok(self)
    }

    pub fn on_open(mut self, cue: Cue) -> Result<Self, ConfigError> {
        push_cue(&mut self.on_open, cue)?;
        Ok(self)
    }

    pub fn on_close(mut self, cue: Cue) -> Result<Self, ConfigError> {
        push_cue(&mut self.on_close, cue)?;
        Ok(self)
    }

    pub fn layout(&self) -> Option<WindowLayout> {
        self.layout
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn paragraph(&self, index: u16) -> Option<&Paragraph> {
        self.paragraphs.get(index as usize)
    }

    pub fn len(&self) -> u16 {
        self.paragraphs.len() as u16
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    pub fn open_cues(&self) -> &[Cue] {
        &self.on_open
    }

    pub fn close_cues(&self) -> &[Cue] {
        &self.on_close
    }
}

fn push_cue(list: &mut CueList, cue: Cue) -> Result<(), ConfigError> {
    list.push(cue).map_err(|_| ConfigError::CapacityExceeded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_rate_must_be_positive() {
        let policy = AdvancePolicy::Input {
            key: KeyCode::Confirm,
        };
        assert_eq!(
            Paragraph::new("hola", FloatRef::Constant(0.0), policy),
            Err(ConfigError::NonPositiveRate)
        );
        assert_eq!(
            Paragraph::new("hola", FloatRef::Constant(f32::NAN), policy),
            Err(ConfigError::NonPositiveRate)
        );
        assert!(Paragraph::new("hola", FloatRef::Shared(SharedSlot(0)), policy).is_ok());
    }

    #[test]
    fn negative_timer_delay_is_rejected() {
        let policy = AdvancePolicy::Timer {
            delay_s: FloatRef::Constant(-1.0),
        };
        assert_eq!(
            Paragraph::new("hola", FloatRef::Constant(10.0), policy),
            Err(ConfigError::InvalidDelay)
        );
    }

    #[test]
    fn shared_rate_is_floored_at_minimum() {
        let shared = SharedValues::new().with(SharedSlot(1), -3.0);
        assert_eq!(FloatRef::Shared(SharedSlot(1)).rate_cps(&shared, 0.01), 0.01);
        assert_eq!(FloatRef::Constant(25.0).rate_cps(&shared, 0.01), 25.0);
        assert_eq!(FloatRef::Shared(SharedSlot(1)).seconds(&shared), 0.0);
    }

    #[test]
    fn cue_lists_are_bounded() {
        let mut paragraph = Paragraph::new(
            "hola",
            FloatRef::Constant(10.0),
            AdvancePolicy::Event { trigger: None },
        )
        .unwrap();
        for cue in 0..MAX_CUES as u16 {
            paragraph = paragraph.on_finish_printing(Cue(cue)).unwrap();
        }
        assert_eq!(
            paragraph.on_finish_printing(Cue(99)),
            Err(ConfigError::CapacityExceeded)
        );
    }

    #[test]
    fn sequence_keeps_insertion_order() {
        let policy = AdvancePolicy::Input {
            key: KeyCode::Confirm,
        };
        let sequence = Sequence::new()
            .with_paragraph(Paragraph::new("uno", FloatRef::Constant(10.0), policy).unwrap())
            .unwrap()
            .with_paragraph(Paragraph::new("dos", FloatRef::Constant(10.0), policy).unwrap())
            .unwrap();

        assert_eq!(sequence.len(), 2);
        assert_eq!(sequence.paragraph(0).map(Paragraph::text), Some("uno"));
        assert_eq!(sequence.paragraph(1).map(Paragraph::text), Some("dos"));
        assert!(sequence.paragraph(2).is_none());
        assert!(sequence.layout().is_none());
    }
}
