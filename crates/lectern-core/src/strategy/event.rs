use log::{debug, error};

use crate::{
    error::ConfigError,
    trigger::{SubscriberId, TriggerBus, TriggerId},
};

/// Advances when the configured trigger is raised.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EventTriggered {
    trigger: Option<TriggerId>,
    subscribed: bool,
}

impl EventTriggered {
    pub const fn new(trigger: Option<TriggerId>) -> Self {
        Self {
            trigger,
            subscribed: false,
        }
    }

    pub(super) fn subscribe<B: TriggerBus>(
        &mut self,
        bus: &mut B,
        subscriber: SubscriberId,
        paragraph: u16,
    ) -> Result<(), ConfigError> {
        let Some(trigger) = self.trigger else {
            error!(
                "strategy: trigger unset for paragraph {}, cannot subscribe",
                paragraph
            );
            return Err(ConfigError::MissingTrigger { paragraph });
        };

        if bus.register(trigger, subscriber).is_err() {
            error!(
                "strategy: trigger bus refused registration paragraph={} trigger={}",
                paragraph, trigger.0
            );
            return Err(ConfigError::CapacityExceeded);
        }

        self.subscribed = true;
        debug!(
            "strategy: subscribed paragraph={} trigger={}",
            paragraph, trigger.0
        );
        Ok(())
    }

    pub(super) fn unsubscribe<B: TriggerBus>(&mut self, bus: &mut B, subscriber: SubscriberId) {
        if let (true, Some(trigger)) = (self.subscribed, self.trigger) {
            bus.unregister(trigger, subscriber);
        }
        self.subscribed = false;
    }

    /// Drains every pending raise; any number of them counts as one.
    pub(super) fn poll<B: TriggerBus>(&mut self, bus: &mut B, subscriber: SubscriberId) -> bool {
        if !self.subscribed {
            return false;
        }

        let mut raised = false;
        while let Some(trigger) = bus.take_raised(subscriber) {
            raised |= Some(trigger) == self.trigger;
        }
        raised
    }
}
