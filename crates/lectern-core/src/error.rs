//! Error taxonomy shared by the window, strategies and content builders.

use core::fmt;

/// Content or wiring mistakes. The affected feature degrades; playback goes on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// The sequence has no window layout, so no window can be opened for it.
    MissingWindowLayout,
    /// An event-triggered paragraph has no trigger to subscribe to.
    MissingTrigger { paragraph: u16 },
    EmptySequence,
    /// Paragraph or speaker text exceeds its character bound.
    TextTooLong { chars: usize },
    /// A constant print rate is zero, negative or not finite.
    NonPositiveRate,
    /// A constant timer delay is negative or not finite.
    InvalidDelay,
    /// A bounded list (paragraphs, cues, listeners, bus registrations) is full.
    CapacityExceeded,
    /// The listener id is the one the window registers for itself.
    ReservedListener,
}

/// Contract violations by the caller.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StateError {
    AlreadyInitialized,
    NotActive,
    WindowClosed,
    StrategyRebound { bound: u16, requested: u16 },
    StrategyUnbound,
    NoActiveParagraph,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DialogueError {
    Configuration(ConfigError),
    InvalidState(StateError),
    /// The input provider failed while being polled.
    Input,
}

pub type DialogueResult<T> = Result<T, DialogueError>;

impl From<ConfigError> for DialogueError {
    fn from(value: ConfigError) -> Self {
        Self::Configuration(value)
    }
}

impl From<StateError> for DialogueError {
    fn from(value: StateError) -> Self {
        Self::InvalidState(value)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingWindowLayout => write!(f, "window layout unset, cannot play dialogue"),
            Self::MissingTrigger { paragraph } => {
                write!(f, "trigger unset for paragraph {}", paragraph)
            }
            Self::EmptySequence => write!(f, "sequence has no paragraphs"),
            Self::TextTooLong { chars } => write!(f, "text too long ({} chars)", chars),
            Self::NonPositiveRate => write!(f, "print rate must be positive"),
            Self::InvalidDelay => write!(f, "timer delay must be finite and non-negative"),
            Self::CapacityExceeded => write!(f, "capacity exceeded"),
            Self::ReservedListener => write!(f, "listener id is reserved by the window"),
        }
    }
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyInitialized => write!(f, "window already initialized"),
            Self::NotActive => write!(f, "window is not active"),
            Self::WindowClosed => write!(f, "window already closed"),
            Self::StrategyRebound { bound, requested } => write!(
                f,
                "strategy bound to paragraph {} cannot rebind to {}",
                bound, requested
            ),
            Self::StrategyUnbound => write!(f, "strategy is not bound to a paragraph"),
            Self::NoActiveParagraph => write!(f, "no active paragraph"),
        }
    }
}

impl fmt::Display for DialogueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(err) => write!(f, "configuration error: {}", err),
            Self::InvalidState(err) => write!(f, "invalid state: {}", err),
            Self::Input => write!(f, "input provider failed"),
        }
    }
}
