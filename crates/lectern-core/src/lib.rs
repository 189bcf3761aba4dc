#![cfg_attr(not(test), no_std)]

//! Linear dialogue windows: typewriter printing plus pluggable per-paragraph
//! advancement (external trigger, key press or timer).

pub mod content;
pub mod error;
pub mod input;
pub mod print;
pub mod render;
pub mod settings;
pub mod strategy;
pub mod text_policy;
pub mod trigger;
pub mod window;

pub use content::{AdvancePolicy, Cue, FloatRef, Paragraph, Sequence, Speaker, WindowLayout};
pub use error::{ConfigError, DialogueError, StateError};
pub use window::{DialogueConfig, DialogueEvent, TickResult, Window, WindowState, play_sequence};
