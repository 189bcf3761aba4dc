//! Advancement strategies: decide when the bound paragraph fast-forwards and
//! when the window moves on to the next one.
//!
//! A [`Strategy`] is bound to one paragraph at a time and driven through
//! `load` → (`notify_*`, `tick`)* → `unload`. Signals are not delivered from
//! inside the strategy; `tick` returns them as a [`SignalBatch`] addressed to
//! every registered listener, so the owner can finish reacting to one
//! strategy before touching the next.

mod event;
mod input;
mod timer;

pub use event::EventTriggered;
pub use input::InputTriggered;
pub use timer::TimerTriggered;

use heapless::Vec;
use log::{debug, warn};

use crate::{
    content::AdvancePolicy,
    error::{ConfigError, DialogueError, StateError},
    input::KeyEdges,
    settings::SharedValues,
    trigger::{SubscriberId, TriggerBus},
};

pub const MAX_LISTENERS: usize = 4;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ListenerId(pub u16);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Signal {
    /// Show the whole paragraph text now.
    FastForward,
    /// Move on to the next paragraph.
    Advance,
}

pub type SignalBatch = Vec<(ListenerId, Signal), MAX_LISTENERS>;

/// What a strategy may look at during one scheduler tick.
#[derive(Clone, Copy, Debug)]
pub struct TickContext<'t> {
    pub now_ms: u64,
    pub keys: &'t KeyEdges,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Variant {
    Unbound,
    Event(EventTriggered),
    Input(InputTriggered),
    Timer(TimerTriggered),
}

#[derive(Clone, Debug)]
pub struct Strategy {
    target: Option<u16>,
    variant: Variant,
    loaded: bool,
    has_started_printing: bool,
    has_finished_printing: bool,
    advance_already_signaled: bool,
    listeners: Vec<ListenerId, MAX_LISTENERS>,
}

impl Default for Strategy {
    fn default() -> Self {
        Self::unbound()
    }
}

impl Strategy {
    pub const fn unbound() -> Self {
        Self {
            target: None,
            variant: Variant::Unbound,
            loaded: false,
            has_started_printing: false,
            has_finished_printing: false,
            advance_already_signaled: false,
            listeners: Vec::new(),
        }
    }

    /// Binds to `paragraph`. Binding again to the same paragraph is a no-op.
    pub fn bind(&mut self, paragraph: u16, policy: &AdvancePolicy) -> Result<(), StateError> {
        match self.target {
            Some(bound) if bound == paragraph => Ok(()),
            Some(bound) => Err(StateError::StrategyRebound {
                bound,
                requested: paragraph,
            }),
            None => {
                self.variant = match *policy {
                    AdvancePolicy::Event { trigger } => Variant::Event(EventTriggered::new(trigger)),
                    AdvancePolicy::Input { key } => Variant::Input(InputTriggered::new(key)),
                    AdvancePolicy::Timer { delay_s } => Variant::Timer(TimerTriggered::new(delay_s)),
                };
                self.target = Some(paragraph);
                self.reset_flags();
                debug!(
                    "strategy: bound paragraph={} policy={}",
                    paragraph,
                    policy.as_str()
                );
                Ok(())
            }
        }
    }

    /// Back to the unbound default, listeners included.
    pub fn unbind(&mut self) {
        if self.loaded {
            warn!(
                "strategy: unbinding paragraph {:?} while still loaded",
                self.target
            );
        }
        *self = Self::unbound();
    }

    /// Called when the bound paragraph becomes current. A missing trigger is
    /// returned as a configuration error, but the strategy still counts as
    /// loaded so that the paired `unload` stays valid.
    pub fn load<B: TriggerBus>(
        &mut self,
        bus: &mut B,
        subscriber: SubscriberId,
    ) -> Result<(), DialogueError> {
        let Some(paragraph) = self.target else {
            return Err(StateError::StrategyUnbound.into());
        };
        if self.loaded {
            warn!("strategy: paragraph {} loaded twice; unloading first", paragraph);
            self.unload(bus, subscriber);
        }

        self.reset_flags();
        self.loaded = true;
        if let Variant::Event(event) = &mut self.variant {
            event.subscribe(bus, subscriber, paragraph)?;
        }
        Ok(())
    }

    /// Inverse of `load`. Safe after a failed subscription and when not loaded.
    pub fn unload<B: TriggerBus>(&mut self, bus: &mut B, subscriber: SubscriberId) {
        if !self.loaded {
            return;
        }

        match &mut self.variant {
            Variant::Event(event) => event.unsubscribe(bus, subscriber),
            Variant::Timer(timer) => timer.cancel(),
            Variant::Input(_) | Variant::Unbound => {}
        }
        self.loaded = false;
        self.reset_flags();
    }

    pub fn add_listener(&mut self, listener: ListenerId) -> Result<(), ConfigError> {
        if self.listeners.contains(&listener) {
            return Ok(());
        }
        self.listeners
            .push(listener)
            .map_err(|_| ConfigError::CapacityExceeded)
    }

    pub fn remove_listener(&mut self, listener: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|registered| *registered != listener);
        self.listeners.len() != before
    }

    /// Returns `true` when the paragraph's start callbacks should run.
    /// At most once per load.
    pub fn notify_start_printing(&mut self) -> bool {
        if !self.loaded || self.has_started_printing {
            return false;
        }
        self.has_started_printing = true;
        true
    }

    /// Returns `true` when the paragraph's finish callbacks should run.
    /// Repeated calls are silent no-ops; the timer variant also starts its
    /// countdown here, once.
    pub fn notify_finish_printing(&mut self, now_ms: u64, shared: &SharedValues) -> bool {
        if !self.loaded || self.has_finished_printing {
            return false;
        }
        self.has_finished_printing = true;

        if let Variant::Timer(timer) = &mut self.variant {
            timer.schedule(now_ms, shared);
        }
        true
    }

    /// Polls the variant's trigger source once and returns the signals it fired.
    pub fn tick<B: TriggerBus>(
        &mut self,
        ctx: &TickContext<'_>,
        bus: &mut B,
        subscriber: SubscriberId,
    ) -> SignalBatch {
        let mut batch = SignalBatch::new();
        if !self.loaded {
            return batch;
        }

        let finished = self.has_finished_printing;
        let fired = match &mut self.variant {
            Variant::Unbound => None,
            Variant::Event(event) => event.poll(bus, subscriber).then_some(Signal::Advance),
            Variant::Input(input) => input.poll(ctx.keys).then_some(if finished {
                Signal::Advance
            } else {
                Signal::FastForward
            }),
            Variant::Timer(timer) => timer.poll(ctx.now_ms).then_some(Signal::Advance),
        };

        match fired {
            Some(Signal::FastForward) => self.signal_fast_forward(&mut batch),
            Some(Signal::Advance) => self.signal_advance(&mut batch),
            None => {}
        }
        batch
    }

    /// Unconditional: every call reaches every listener.
    fn signal_fast_forward(&self, batch: &mut SignalBatch) {
        for &listener in self.listeners.iter() {
            let _ = batch.push((listener, Signal::FastForward));
        }
    }

    /// At most once per load, even with no listener registered.
    fn signal_advance(&mut self, batch: &mut SignalBatch) {
        if !self.advance_already_signaled {
            for &listener in self.listeners.iter() {
                let _ = batch.push((listener, Signal::Advance));
            }
        }
        self.advance_already_signaled = true;
    }

    fn reset_flags(&mut self) {
        self.has_started_printing = false;
        self.has_finished_printing = false;
        self.advance_already_signaled = false;
    }

    pub fn target(&self) -> Option<u16> {
        self.target
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn has_finished_printing(&self) -> bool {
        self.has_finished_printing
    }

    pub fn advance_signaled(&self) -> bool {
        self.advance_already_signaled
    }

    pub fn listeners(&self) -> &[ListenerId] {
        &self.listeners
    }

    pub fn policy_name(&self) -> &'static str {
        match self.variant {
            Variant::Unbound => "unbound",
            Variant::Event(_) => "event",
            Variant::Input(_) => "input",
            Variant::Timer(_) => "timer",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        content::FloatRef,
        input::{InputEvent, KeyCode},
        trigger::{LocalTriggerBus, TriggerId},
    };

    const WINDOW: ListenerId = ListenerId(0);
    const OBSERVER: ListenerId = ListenerId(9);
    const SUB: SubscriberId = SubscriberId(1);
    const BELL: TriggerId = TriggerId(3);
    const Z: KeyCode = KeyCode::Char('z');

    fn new_bus() -> LocalTriggerBus {
        LocalTriggerBus::new()
    }

    fn loaded(policy: AdvancePolicy, bus: &mut LocalTriggerBus) -> Strategy {
        let mut strategy = Strategy::unbound();
        strategy.bind(0, &policy).unwrap();
        strategy.add_listener(WINDOW).unwrap();
        strategy.load(bus, SUB).unwrap();
        strategy
    }

    fn press(key: KeyCode) -> KeyEdges {
        let mut keys = KeyEdges::new();
        keys.begin_tick();
        keys.apply(InputEvent::Pressed(key));
        keys.apply(InputEvent::Released(key));
        keys
    }

    #[test]
    fn rebinding_to_another_paragraph_is_rejected() {
        let policy = AdvancePolicy::Input { key: Z };
        let mut strategy = Strategy::unbound();
        strategy.bind(2, &policy).unwrap();
        strategy.bind(2, &policy).unwrap();

        assert_eq!(
            strategy.bind(3, &policy),
            Err(StateError::StrategyRebound {
                bound: 2,
                requested: 3
            })
        );

        strategy.unbind();
        assert_eq!(strategy.target(), None);
        strategy.bind(3, &policy).unwrap();
    }

    #[test]
    fn load_requires_binding() {
        let mut bus = new_bus();
        let mut strategy = Strategy::unbound();
        assert_eq!(
            strategy.load(&mut bus, SUB),
            Err(DialogueError::InvalidState(StateError::StrategyUnbound))
        );
        strategy.unload(&mut bus, SUB);
        assert!(!strategy.is_loaded());
    }

    #[test]
    fn finish_notification_is_reported_once() {
        let mut bus = new_bus();
        let shared = SharedValues::new();
        let mut strategy = loaded(AdvancePolicy::Input { key: Z }, &mut bus);

        assert!(strategy.notify_finish_printing(0, &shared));
        assert!(!strategy.notify_finish_printing(5, &shared));
        assert!(strategy.has_finished_printing());
    }

    #[test]
    fn input_press_fast_forwards_then_advances() {
        let mut bus = new_bus();
        let shared = SharedValues::new();
        let mut strategy = loaded(AdvancePolicy::Input { key: Z }, &mut bus);
        let keys = press(Z);
        let ctx = TickContext {
            now_ms: 0,
            keys: &keys,
        };

        let first = strategy.tick(&ctx, &mut bus, SUB);
        assert_eq!(first.as_slice(), &[(WINDOW, Signal::FastForward)]);
        let again = strategy.tick(&ctx, &mut bus, SUB);
        assert_eq!(again.as_slice(), &[(WINDOW, Signal::FastForward)]);
        assert!(!strategy.advance_signaled());

        strategy.notify_finish_printing(0, &shared);
        let advance = strategy.tick(&ctx, &mut bus, SUB);
        assert_eq!(advance.as_slice(), &[(WINDOW, Signal::Advance)]);
        assert!(strategy.tick(&ctx, &mut bus, SUB).is_empty());
    }

    #[test]
    fn other_keys_are_ignored() {
        let mut bus = new_bus();
        let mut strategy = loaded(AdvancePolicy::Input { key: Z }, &mut bus);
        let keys = press(KeyCode::Space);
        let ctx = TickContext {
            now_ms: 0,
            keys: &keys,
        };
        assert!(strategy.tick(&ctx, &mut bus, SUB).is_empty());
    }

    #[test]
    fn duplicate_trigger_raises_advance_once() {
        let mut bus = new_bus();
        let mut strategy = loaded(
            AdvancePolicy::Event {
                trigger: Some(BELL),
            },
            &mut bus,
        );
        strategy.add_listener(OBSERVER).unwrap();
        assert!(bus.is_registered(BELL, SUB));

        bus.raise(BELL);
        bus.raise(BELL);
        let keys = KeyEdges::new();
        let ctx = TickContext {
            now_ms: 0,
            keys: &keys,
        };
        let batch = strategy.tick(&ctx, &mut bus, SUB);
        assert_eq!(
            batch.as_slice(),
            &[(WINDOW, Signal::Advance), (OBSERVER, Signal::Advance)]
        );

        bus.raise(BELL);
        assert!(strategy.tick(&ctx, &mut bus, SUB).is_empty());

        strategy.unload(&mut bus, SUB);
        assert!(!bus.is_registered(BELL, SUB));
    }

    #[test]
    fn missing_trigger_is_reported_but_stays_loaded() {
        let mut bus = new_bus();
        let mut strategy = Strategy::unbound();
        strategy
            .bind(4, &AdvancePolicy::Event { trigger: None })
            .unwrap();

        assert_eq!(
            strategy.load(&mut bus, SUB),
            Err(DialogueError::Configuration(ConfigError::MissingTrigger {
                paragraph: 4
            }))
        );
        assert!(strategy.is_loaded());
        strategy.unload(&mut bus, SUB);
        assert!(!strategy.is_loaded());
        assert!(bus.is_empty());
    }

    #[test]
    fn timer_advances_after_delay_from_finish() {
        let mut bus = new_bus();
        let shared = SharedValues::new();
        let mut strategy = loaded(
            AdvancePolicy::Timer {
                delay_s: FloatRef::Constant(1.0),
            },
            &mut bus,
        );
        let keys = KeyEdges::new();
        let at = |now_ms| TickContext {
            now_ms,
            keys: &keys,
        };

        assert!(strategy.tick(&at(5_000), &mut bus, SUB).is_empty());
        strategy.notify_finish_printing(200, &shared);
        strategy.notify_finish_printing(900, &shared);
        assert!(strategy.tick(&at(1_199), &mut bus, SUB).is_empty());
        assert_eq!(
            strategy.tick(&at(1_200), &mut bus, SUB).as_slice(),
            &[(WINDOW, Signal::Advance)]
        );
        assert!(strategy.tick(&at(2_500), &mut bus, SUB).is_empty());
    }

    #[test]
    fn unload_cancels_pending_timer_and_resets_flags() {
        let mut bus = new_bus();
        let shared = SharedValues::new();
        let mut strategy = loaded(
            AdvancePolicy::Timer {
                delay_s: FloatRef::Constant(0.5),
            },
            &mut bus,
        );
        strategy.notify_finish_printing(0, &shared);
        strategy.unload(&mut bus, SUB);
        assert!(!strategy.has_finished_printing());

        strategy.load(&mut bus, SUB).unwrap();
        let keys = KeyEdges::new();
        let ctx = TickContext {
            now_ms: 10_000,
            keys: &keys,
        };
        assert!(strategy.tick(&ctx, &mut bus, SUB).is_empty());
    }

    #[test]
    fn listeners_are_removed_symmetrically() {
        let mut strategy = Strategy::unbound();
        strategy.add_listener(WINDOW).unwrap();
        strategy.add_listener(WINDOW).unwrap();
        strategy.add_listener(OBSERVER).unwrap();
        assert_eq!(strategy.listeners(), &[WINDOW, OBSERVER]);

        assert!(strategy.remove_listener(WINDOW));
        assert!(!strategy.remove_listener(WINDOW));
        assert_eq!(strategy.listeners(), &[OBSERVER]);
    }
}
