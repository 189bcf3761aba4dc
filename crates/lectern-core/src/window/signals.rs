impl<'a, IN, B> Window<'a, IN, B>
where
    IN: InputProvider,
    B: TriggerBus,
{
    /// Next queued event, oldest first.
    pub fn poll_event(&mut self) -> Option<DialogueEvent> {
        self.events.pop_front()
    }

    /// Registers a host observer. It is attached to the bound strategy right
    /// away and to every strategy bound afterwards.
    pub fn add_listener(&mut self, listener: ListenerId) -> Result<(), DialogueError> {
        if listener == WINDOW_LISTENER {
            return Err(ConfigError::ReservedListener.into());
        }
        if !self.observers.contains(&listener) {
            self.observers
                .push(listener)
                .map_err(|_| ConfigError::CapacityExceeded)?;
        }
        if self.strategy.target().is_some() {
            self.strategy.add_listener(listener)?;
        }
        Ok(())
    }

    /// The window's own registration is never removed this way.
    pub fn remove_listener(&mut self, listener: ListenerId) -> bool {
        if listener == WINDOW_LISTENER {
            return false;
        }
        let before = self.observers.len();
        self.observers.retain(|observer| *observer != listener);
        self.strategy.remove_listener(listener);
        self.observers.len() != before
    }

    /// Delivers a strategy batch. Window-addressed signals only apply to the
    /// activation that produced them.
    fn dispatch(&mut self, batch: SignalBatch, now_ms: u64) {
        let generation = self.activations;
        for (listener, signal) in batch {
            if listener != WINDOW_LISTENER {
                self.emit(DialogueEvent::Signal { listener, signal });
                continue;
            }

            if generation != self.activations || !self.is_active() {
                debug!("window: dropping stale {:?} signal", signal);
                continue;
            }

            let applied = match signal {
                Signal::FastForward => self.fast_forward(now_ms),
                Signal::Advance => self.advance(now_ms),
            };
            if let Err(err) = applied {
                self.report(err);
            }
        }
    }

    fn emit(&mut self, event: DialogueEvent) {
        if self.events.is_full() {
            self.events.pop_front();
            self.dropped_events = self.dropped_events.saturating_add(1);
            warn!(
                "window: event queue full, dropped oldest (total={})",
                self.dropped_events
            );
        }
        let _ = self.events.push_back(event);
    }

    fn emit_cues(&mut self, cues: &[Cue]) {
        for &cue in cues {
            self.emit(DialogueEvent::Cue(cue));
        }
    }

    fn report(&mut self, err: DialogueError) {
        match err {
            DialogueError::Configuration(_) => error!("window: {}", err),
            DialogueError::InvalidState(_) | DialogueError::Input => warn!("window: {}", err),
        }
        self.emit(DialogueEvent::Fault(err));
    }
}
