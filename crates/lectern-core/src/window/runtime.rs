impl<'a, IN, B> Window<'a, IN, B>
where
    IN: InputProvider,
    B: TriggerBus,
{
    /// Records `sequence`, fires its open callbacks once and activates the
    /// first paragraph.
    pub fn initialize(&mut self, sequence: &'a Sequence, now_ms: u64) -> Result<(), DialogueError> {
        if !matches!(self.state, WindowState::Uninitialized) {
            warn!("window: initialize called in state {:?}", self.state);
            return Err(StateError::AlreadyInitialized.into());
        }
        if sequence.layout().is_none() {
            error!("window: layout unset for sequence, cannot play dialogue");
            return Err(ConfigError::MissingWindowLayout.into());
        }
        if sequence.is_empty() {
            error!("window: sequence has no paragraphs, cannot play dialogue");
            return Err(ConfigError::EmptySequence.into());
        }

        self.sequence = Some(sequence);
        info!("window: opened paragraphs={}", sequence.len());
        self.emit(DialogueEvent::Opened);
        self.emit_cues(sequence.open_cues());
        self.assign_cursor(0, now_ms);
        Ok(())
    }

    pub fn tick(&mut self, now_ms: u64) -> TickResult {
        if self.is_active() {
            self.process_inputs(now_ms);

            let ctx = TickContext {
                now_ms,
                keys: &self.keys,
            };
            let batch = self
                .strategy
                .tick(&ctx, &mut self.bus, self.config.subscriber);
            self.dispatch(batch, now_ms);

            self.step_printing(now_ms);
        }

        if self.pending_redraw {
            self.pending_redraw = false;
            TickResult::RenderRequested
        } else {
            TickResult::NoRender
        }
    }

    /// Stops printing, shows the whole paragraph and reports completion
    /// (once, even after natural completion).
    pub fn fast_forward(&mut self, now_ms: u64) -> Result<(), DialogueError> {
        self.ensure_active()?;
        let paragraph = self
            .current_paragraph()
            .ok_or(StateError::NoActiveParagraph)?;

        if self.print.cancel() {
            debug!("window: fast-forward paragraph={:?}", self.cursor);
        }
        self.body.set_text(paragraph.text());
        self.pending_redraw = true;
        self.finish_printing(now_ms);
        Ok(())
    }

    /// Moves to the next paragraph, closing the window past the last one.
    pub fn advance(&mut self, now_ms: u64) -> Result<(), DialogueError> {
        self.ensure_active()?;
        let Some(current) = self.cursor else {
            return Err(StateError::NoActiveParagraph.into());
        };
        if self.strategy.target().is_none() {
            warn!("window: advance without a bound strategy paragraph={}", current);
            return Err(StateError::StrategyUnbound.into());
        }

        self.assign_cursor(current.saturating_add(1), now_ms);
        Ok(())
    }

    /// Fires the close callbacks and tears the window down. `exhausted` tells
    /// whether the sequence ran out or the close was forced.
    pub fn close(&mut self, exhausted: bool) -> Result<(), DialogueError> {
        match self.state {
            WindowState::Uninitialized => Err(StateError::NotActive.into()),
            WindowState::Closed { .. } => Err(StateError::WindowClosed.into()),
            WindowState::Active { .. } => {
                self.detach_strategy();
                self.print.cancel();
                self.cursor = None;
                self.finish_close(exhausted);
                Ok(())
            }
        }
    }

    fn ensure_active(&self) -> Result<(), StateError> {
        match self.state {
            WindowState::Active { .. } => Ok(()),
            WindowState::Closed { .. } => Err(StateError::WindowClosed),
            WindowState::Uninitialized => Err(StateError::NotActive),
        }
    }

    fn process_inputs(&mut self, now_ms: u64) {
        self.keys.begin_tick();
        loop {
            match self.input.poll_event(now_ms) {
                Ok(Some(event)) => self.keys.apply(event),
                Ok(None) => break,
                Err(_) => {
                    self.report(DialogueError::Input);
                    break;
                }
            }
        }
    }

    /// Cursor assignment: the previous strategy is fully unloaded before the
    /// next one loads.
    fn assign_cursor(&mut self, next: u16, now_ms: u64) {
        if self.strategy.target().is_some() {
            self.detach_strategy();
        }
        self.print.cancel();

        let Some(paragraph) = self.sequence.and_then(|sequence| sequence.paragraph(next)) else {
            self.cursor = None;
            self.finish_close(true);
            return;
        };

        self.cursor = Some(next);
        self.state = WindowState::Active {
            paragraph: next,
            printed: false,
        };
        self.activations = self.activations.saturating_add(1);

        let mut progress = [0u8; 12];
        let mut preview = [0u8; LOG_PREVIEW_BYTES];
        debug!(
            "window: paragraph {} policy={} text=\"{}\"",
            progress_label(
                next.saturating_add(1),
                self.sequence.map_or(0, Sequence::len),
                &mut progress
            ),
            paragraph.policy().as_str(),
            preview_compact(paragraph.text(), &mut preview)
        );

        self.attach_strategy(next, paragraph);
        self.start_printing(next, paragraph, now_ms);
    }

    fn attach_strategy(&mut self, index: u16, paragraph: &Paragraph) {
        if let Err(err) = self.strategy.bind(index, paragraph.policy()) {
            self.report(err.into());
            return;
        }

        let mut registered = self.strategy.add_listener(WINDOW_LISTENER);
        for &observer in self.observers.iter() {
            registered = registered.and(self.strategy.add_listener(observer));
        }
        if let Err(err) = registered {
            self.report(err.into());
        }

        if let Err(err) = self.strategy.load(&mut self.bus, self.config.subscriber) {
            self.report(err);
        }
    }

    fn detach_strategy(&mut self) {
        self.strategy.unload(&mut self.bus, self.config.subscriber);
        self.strategy.remove_listener(WINDOW_LISTENER);
        for &observer in self.observers.iter() {
            self.strategy.remove_listener(observer);
        }
        self.strategy.unbind();
    }

    fn start_printing(&mut self, index: u16, paragraph: &Paragraph, now_ms: u64) {
        if self.strategy.notify_start_printing() {
            self.emit(DialogueEvent::StartedPrinting { paragraph: index });
            self.emit_cues(paragraph.start_cues());
        }

        let rate = self.print_rate(paragraph);
        let first = self.print.start(paragraph.text(), rate, now_ms, &mut self.body);
        self.pending_redraw = true;
        if first == PrintStep::Finished {
            self.finish_printing(now_ms);
        }
    }

    fn step_printing(&mut self, now_ms: u64) {
        if !self.is_active() {
            return;
        }
        let Some(paragraph) = self.current_paragraph() else {
            return;
        };

        let rate = self.print_rate(paragraph);
        match self.print.step(paragraph.text(), rate, now_ms, &mut self.body) {
            PrintStep::Idle | PrintStep::Suspended => {}
            PrintStep::Printed { appended } => {
                if appended > 0 {
                    self.pending_redraw = true;
                }
            }
            PrintStep::Finished => self.finish_printing(now_ms),
        }
    }

    fn finish_printing(&mut self, now_ms: u64) {
        let Some(index) = self.cursor else {
            return;
        };
        let Some(paragraph) = self.current_paragraph() else {
            return;
        };

        if self.strategy.notify_finish_printing(now_ms, &self.shared) {
            debug!("window: paragraph {} printed", index.saturating_add(1));
            self.state = WindowState::Active {
                paragraph: index,
                printed: true,
            };
            self.emit(DialogueEvent::FinishedPrinting { paragraph: index });
            self.emit_cues(paragraph.finish_cues());
        }
    }

    fn finish_close(&mut self, exhausted: bool) {
        self.state = WindowState::Closed { exhausted };
        self.pending_redraw = true;
        info!(
            "window: closed exhausted={} activations={}",
            exhausted, self.activations
        );
        self.emit(DialogueEvent::Closed { exhausted });
        if let Some(sequence) = self.sequence {
            self.emit_cues(sequence.close_cues());
        }
    }

    fn print_rate(&self, paragraph: &Paragraph) -> f32 {
        paragraph
            .print_rate()
            .rate_cps(&self.shared, self.config.min_print_rate_cps)
    }
}
