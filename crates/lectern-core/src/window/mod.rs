//! Dialogue window state machine: paragraph cursor, strategy binding and
//! typewriter printing for one sequence.

use heapless::{Deque, Vec};
use log::{debug, error, info, warn};

use crate::{
    content::{Cue, Paragraph, Sequence},
    error::{ConfigError, DialogueError, StateError},
    input::{InputProvider, KeyEdges},
    print::{PrintStep, PrintTask, TextSink},
    render::{DialogueView, Presenter, SlotView, TitleView, present_view},
    settings::{PersistedSettings, SharedSlot, SharedValues},
    strategy::{ListenerId, MAX_LISTENERS, Signal, SignalBatch, Strategy, TickContext},
    text_policy::{ParagraphText, preview_compact, progress_label},
    trigger::{SubscriberId, TriggerBus},
};

/// Listener identity the window registers on every strategy it binds.
pub const WINDOW_LISTENER: ListenerId = ListenerId(0);
pub const EVENT_QUEUE_LEN: usize = 32;
const MAX_OBSERVERS: usize = MAX_LISTENERS - 1;
const DEFAULT_MIN_PRINT_RATE_CPS: f32 = 0.01;
const LOG_PREVIEW_BYTES: usize = 112;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickResult {
    NoRender,
    RenderRequested,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DialogueConfig {
    /// Floor applied to shared print rates.
    pub min_print_rate_cps: f32,
    /// Identity used when registering on the trigger bus. Windows sharing a
    /// bus must each use a different one.
    pub subscriber: SubscriberId,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            min_print_rate_cps: DEFAULT_MIN_PRINT_RATE_CPS,
            subscriber: SubscriberId(0),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WindowState {
    Uninitialized,
    Active { paragraph: u16, printed: bool },
    Closed { exhausted: bool },
}

/// Everything the host is told about, drained with [`Window::poll_event`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DialogueEvent {
    Opened,
    StartedPrinting { paragraph: u16 },
    FinishedPrinting { paragraph: u16 },
    /// One entry of an open/close/start/finish callback list.
    Cue(Cue),
    /// A strategy signal addressed to a host-registered listener.
    Signal { listener: ListenerId, signal: Signal },
    Closed { exhausted: bool },
    Fault(DialogueError),
}

pub struct Window<'a, IN, B>
where
    IN: InputProvider,
    B: TriggerBus,
{
    sequence: Option<&'a Sequence>,
    input: IN,
    bus: B,
    config: DialogueConfig,
    shared: SharedValues,
    state: WindowState,
    cursor: Option<u16>,
    strategy: Strategy,
    print: PrintTask,
    body: ParagraphText,
    observers: Vec<ListenerId, MAX_OBSERVERS>,
    events: Deque<DialogueEvent, EVENT_QUEUE_LEN>,
    keys: KeyEdges,
    activations: u16,
    pending_redraw: bool,
    dropped_events: u32,
}

/// Opens a window for `sequence` and starts its first paragraph.
///
/// A sequence without a window layout never starts; the error is logged and
/// returned to the caller.
pub fn play_sequence<'a, IN, B>(
    sequence: &'a Sequence,
    input: IN,
    bus: B,
    config: DialogueConfig,
    shared: SharedValues,
    now_ms: u64,
) -> Result<Window<'a, IN, B>, DialogueError>
where
    IN: InputProvider,
    B: TriggerBus,
{
    let mut window = Window::new(input, bus, config).with_shared(shared);
    window.initialize(sequence, now_ms)?;
    Ok(window)
}

include!("view.rs");
include!("runtime.rs");
include!("signals.rs");
