use penguin_post::{
    AudioSink, CardConfig, CardInput, DeliverySequencer, EventRecord, FixedTimestep, FrameBuffer,
    InputQueue, ProtocolLayout,
};

/// Wires the sequencer to a frame loop.
///
/// The host pushes inputs between frames and calls [`CardRunner::tick`] once
/// per animation frame. After each tick the shared [`FrameBuffer`] holds the
/// frame, readable through [`CardRunner::buffer_ptr`].
pub struct CardRunner<A: AudioSink> {
    sequencer: DeliverySequencer<A>,
    input: InputQueue,
    timestep: FixedTimestep,
    buffer: FrameBuffer,
    /// Events raised during the current tick, stamped with the card clock.
    events: Vec<EventRecord>,
}

impl<A: AudioSink> CardRunner<A> {
    pub fn new(config: CardConfig, audio: A) -> Self {
        let timestep = FixedTimestep::new(config.fixed_dt);
        let buffer = FrameBuffer::new(ProtocolLayout::from_config(&config));
        let mut runner = Self {
            sequencer: DeliverySequencer::new(config, audio),
            input: InputQueue::new(),
            timestep,
            buffer,
            events: Vec::with_capacity(8),
        };
        runner.publish();
        runner
    }

    pub fn push_input(&mut self, event: CardInput) {
        self.input.push(event);
    }

    /// Apply queued inputs, run the fixed steps covering `dt`, then publish the frame.
    pub fn tick(&mut self, dt: f32) {
        if !self.sequencer.is_mounted() {
            self.input.drain();
            return;
        }

        self.events.clear();
        for event in self.input.drain() {
            self.sequencer.handle(event);
        }
        self.collect_events();

        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            self.sequencer.tick(self.timestep.dt());
            self.collect_events();
        }

        self.publish();
    }

    fn collect_events(&mut self) {
        let at = self.sequencer.clock() as f32;
        self.events.extend(self.sequencer.drain_events().into_iter().map(|e| e.to_record(at)));
    }

    fn publish(&mut self) {
        let frame = self.sequencer.frame();
        self.buffer.write(&frame, &self.events);
    }

    /// Cancel every timer. The runner ignores ticks and inputs afterwards.
    pub fn unmount(&mut self) {
        self.sequencer.unmount();
        self.input.drain();
    }

    /// Replace the config and restart the card from Idle.
    /// A malformed config is logged and ignored.
    pub fn load_config(&mut self, json: &str) -> bool {
        match CardConfig::from_json(json) {
            Ok(config) => {
                self.timestep = FixedTimestep::new(config.fixed_dt);
                self.buffer = FrameBuffer::new(ProtocolLayout::from_config(&config));
                self.sequencer.reset(config);
                self.input.drain();
                self.events.clear();
                self.publish();
                true
            }
            Err(e) => {
                log::warn!("card config rejected: {}", e);
                false
            }
        }
    }

    pub fn sequencer(&self) -> &DeliverySequencer<A> {
        &self.sequencer
    }

    // ---- Pointer accessors for shared buffer reads ----

    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.ptr()
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.buffer.len() as u32
    }

    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn max_particles(&self) -> u32 {
        self.buffer.layout().max_particles as u32
    }

    pub fn max_events(&self) -> u32 {
        self.buffer.layout().max_events as u32
    }

    // ---- State accessors ----

    pub fn opened(&self) -> bool {
        self.sequencer.state().opened
    }

    pub fn jumping(&self) -> bool {
        self.sequencer.state().jumping
    }

    pub fn penguin_visible(&self) -> bool {
        self.sequencer.state().penguin_visible
    }

    pub fn returning(&self) -> bool {
        self.sequencer.state().returning
    }

    pub fn phase(&self) -> u32 {
        self.sequencer.phase() as u8 as u32
    }
}
