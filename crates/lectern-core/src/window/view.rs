impl<'a, IN, B> Window<'a, IN, B>
where
    IN: InputProvider,
    B: TriggerBus,
{
    pub fn new(input: IN, bus: B, mut config: DialogueConfig) -> Self {
        if !(config.min_print_rate_cps.is_finite() && config.min_print_rate_cps > 0.0) {
            config.min_print_rate_cps = DEFAULT_MIN_PRINT_RATE_CPS;
        }

        Self {
            sequence: None,
            input,
            bus,
            config,
            shared: SharedValues::new(),
            state: WindowState::Uninitialized,
            cursor: None,
            strategy: Strategy::unbound(),
            print: PrintTask::idle(),
            body: ParagraphText::new(),
            observers: Vec::new(),
            events: Deque::new(),
            keys: KeyEdges::new(),
            activations: 0,
            pending_redraw: false,
            dropped_events: 0,
        }
    }

    pub fn with_shared(mut self, shared: SharedValues) -> Self {
        self.shared = shared;
        self
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, WindowState::Active { .. })
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, WindowState::Closed { .. })
    }

    pub fn current_index(&self) -> Option<u16> {
        self.cursor
    }

    pub fn current_paragraph(&self) -> Option<&'a Paragraph> {
        let sequence = self.sequence?;
        sequence.paragraph(self.cursor?)
    }

    /// Number of paragraphs activated so far.
    pub fn activations(&self) -> u16 {
        self.activations
    }

    /// Text currently visible in the body slot.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn is_printing(&self) -> bool {
        self.print.is_running()
    }

    pub fn input_mut(&mut self) -> &mut IN {
        &mut self.input
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn dropped_events(&self) -> u32 {
        self.dropped_events
    }

    pub fn shared_value(&self, slot: SharedSlot) -> Option<f32> {
        self.shared.get(slot)
    }

    /// Running print tasks pick the new value up on their next step.
    pub fn set_shared_value(&mut self, slot: SharedSlot, value: f32) -> bool {
        self.shared.set(slot, value)
    }

    pub fn persisted_settings(&self) -> PersistedSettings {
        PersistedSettings::new(self.shared)
    }

    pub fn import_settings(&mut self, settings: PersistedSettings) {
        self.shared = settings.shared;
    }

    pub fn with_view<F>(&self, f: F)
    where
        F: FnOnce(DialogueView<'_>),
    {
        let layout = self.sequence.and_then(Sequence::layout);
        let speaker = self.current_paragraph().and_then(Paragraph::speaker);
        let showing = self.is_active();

        let title = match (layout, speaker) {
            (Some(layout), _) if !layout.title_slot => SlotView::Absent,
            (None, _) => SlotView::Absent,
            (Some(_), Some(speaker)) if showing => SlotView::Shown(TitleView {
                name: speaker.name(),
                color: speaker.color(),
            }),
            (Some(_), _) => SlotView::Hidden,
        };
        let portrait = match (layout, speaker) {
            (Some(layout), _) if !layout.portrait_slot => SlotView::Absent,
            (None, _) => SlotView::Absent,
            (Some(_), Some(speaker)) if showing => SlotView::Shown(speaker.portrait()),
            (Some(_), _) => SlotView::Hidden,
        };

        f(DialogueView {
            title,
            portrait,
            body: if showing { self.body.as_str() } else { "" },
            paragraph: self.cursor.map_or(0, |index| index.saturating_add(1)),
            paragraph_total: self.sequence.map_or(0, Sequence::len),
            printed: matches!(self.state, WindowState::Active { printed: true, .. }),
        });
    }

    /// Pushes the current view to the host presentation surface.
    pub fn present<P: Presenter>(&self, presenter: &mut P) {
        self.with_view(|view| present_view(&view, presenter));
    }
}
