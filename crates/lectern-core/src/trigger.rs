//! One-shot broadcast triggers that event-triggered paragraphs wait on.

use core::cell::RefCell;

use heapless::Vec;
use log::debug;

pub const MAX_BUS_REGISTRATIONS: usize = 16;

/// Identity of a named game-side trigger.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct TriggerId(pub u16);

/// Identity of whoever registered on the bus (one per window).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct SubscriberId(pub u16);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TriggerBusError {
    Full,
}

/// Register/unregister against named triggers and collect raises.
///
/// Raises are fan-in only: a raise reaches the subscribers registered at that
/// moment and is lost for everyone else.
pub trait TriggerBus {
    type Error;

    fn register(&mut self, trigger: TriggerId, subscriber: SubscriberId) -> Result<(), Self::Error>;

    /// Unknown registrations are ignored.
    fn unregister(&mut self, trigger: TriggerId, subscriber: SubscriberId);

    /// Pops one pending raise addressed to `subscriber`.
    fn take_raised(&mut self, subscriber: SubscriberId) -> Option<TriggerId>;
}

impl<T: TriggerBus + ?Sized> TriggerBus for &mut T {
    type Error = T::Error;

    fn register(&mut self, trigger: TriggerId, subscriber: SubscriberId) -> Result<(), Self::Error> {
        (**self).register(trigger, subscriber)
    }

    fn unregister(&mut self, trigger: TriggerId, subscriber: SubscriberId) {
        (**self).unregister(trigger, subscriber);
    }

    fn take_raised(&mut self, subscriber: SubscriberId) -> Option<TriggerId> {
        (**self).take_raised(subscriber)
    }
}

/// Shares one bus between several windows on the same scheduler. Every window
/// needs its own [`SubscriberId`], otherwise they drain each other's raises.
///
/// Panics if the host keeps the cell borrowed while a window ticks.
impl<T: TriggerBus + ?Sized> TriggerBus for &RefCell<T> {
    type Error = T::Error;

    fn register(&mut self, trigger: TriggerId, subscriber: SubscriberId) -> Result<(), Self::Error> {
        self.borrow_mut().register(trigger, subscriber)
    }

    fn unregister(&mut self, trigger: TriggerId, subscriber: SubscriberId) {
        self.borrow_mut().unregister(trigger, subscriber);
    }

    fn take_raised(&mut self, subscriber: SubscriberId) -> Option<TriggerId> {
        self.borrow_mut().take_raised(subscriber)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Registration {
    trigger: TriggerId,
    subscriber: SubscriberId,
    pending: u8,
}

/// In-memory bus for single-scheduler hosts.
#[derive(Clone, Debug, Default)]
pub struct LocalTriggerBus<const N: usize = MAX_BUS_REGISTRATIONS> {
    registrations: Vec<Registration, N>,
}

impl<const N: usize> LocalTriggerBus<N> {
    pub const fn new() -> Self {
        Self {
            registrations: Vec::new(),
        }
    }

    /// Raises `trigger` and returns how many subscribers heard it.
    pub fn raise(&mut self, trigger: TriggerId) -> usize {
        let mut heard = 0usize;
        for registration in self.registrations.iter_mut() {
            if registration.trigger == trigger {
                registration.pending = registration.pending.saturating_add(1);
                heard += 1;
            }
        }
        debug!("trigger: raised id={} listeners={}", trigger.0, heard);
        heard
    }

    pub fn listener_count(&self, trigger: TriggerId) -> usize {
        self.registrations
            .iter()
            .filter(|registration| registration.trigger == trigger)
            .count()
    }

    pub fn is_registered(&self, trigger: TriggerId, subscriber: SubscriberId) -> bool {
        self.registrations
            .iter()
            .any(|r| r.trigger == trigger && r.subscriber == subscriber)
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl<const N: usize> TriggerBus for LocalTriggerBus<N> {
    type Error = TriggerBusError;

    fn register(&mut self, trigger: TriggerId, subscriber: SubscriberId) -> Result<(), Self::Error> {
        if self.is_registered(trigger, subscriber) {
            return Ok(());
        }

        self.registrations
            .push(Registration {
                trigger,
                subscriber,
                pending: 0,
            })
            .map_err(|_| TriggerBusError::Full)
    }

    fn unregister(&mut self, trigger: TriggerId, subscriber: SubscriberId) {
        self.registrations
            .retain(|r| !(r.trigger == trigger && r.subscriber == subscriber));
    }

    fn take_raised(&mut self, subscriber: SubscriberId) -> Option<TriggerId> {
        let registration = self
            .registrations
            .iter_mut()
            .find(|r| r.subscriber == subscriber && r.pending > 0)?;
        registration.pending -= 1;
        Some(registration.trigger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOOR: TriggerId = TriggerId(7);
    const WINDOW: SubscriberId = SubscriberId(1);

    #[test]
    fn raise_without_listeners_is_lost() {
        let mut bus = LocalTriggerBus::<4>::new();
        assert_eq!(bus.raise(DOOR), 0);

        bus.register(DOOR, WINDOW).unwrap();
        assert_eq!(bus.take_raised(WINDOW), None);
    }

    #[test]
    fn raises_are_queued_per_subscriber() {
        let mut bus = LocalTriggerBus::<4>::new();
        bus.register(DOOR, WINDOW).unwrap();
        bus.register(DOOR, SubscriberId(2)).unwrap();

        assert_eq!(bus.listener_count(DOOR), 2);
        assert_eq!(bus.raise(DOOR), 2);
        assert_eq!(bus.raise(DOOR), 2);

        assert_eq!(bus.take_raised(WINDOW), Some(DOOR));
        assert_eq!(bus.take_raised(WINDOW), Some(DOOR));
        assert_eq!(bus.take_raised(WINDOW), None);
        assert_eq!(bus.take_raised(SubscriberId(2)), Some(DOOR));
    }

    #[test]
    fn unregister_drops_pending_raises() {
        let mut bus = LocalTriggerBus::<4>::new();
        bus.register(DOOR, WINDOW).unwrap();
        bus.raise(DOOR);
        bus.unregister(DOOR, WINDOW);

        assert!(bus.is_empty());
        assert_eq!(bus.take_raised(WINDOW), None);
        bus.unregister(DOOR, WINDOW);
    }

    #[test]
    fn full_bus_reports_error() {
        let mut bus = LocalTriggerBus::<1>::new();
        bus.register(DOOR, WINDOW).unwrap();
        bus.register(DOOR, WINDOW).unwrap();
        assert_eq!(bus.listener_count(DOOR), 1);
        assert_eq!(
            bus.register(TriggerId(8), WINDOW),
            Err(TriggerBusError::Full)
        );
    }
}
