//! The delivery state machine.
//!
//! ```text
//! Idle --activate--> Jumping --jump done--> Delivered --close--> Closing
//!   ^                                                               |
//!   +---- 750 ms ---- Returning <------- letter fully removed -------+
//! ```
//!
//! Everything is advanced from [`DeliverySequencer::tick`]. Exactly one
//! [`PenguinDriver`] moves the penguin at a time: the jump sequence while
//! jumping, the drop-in sequence while returning, and a spring toward the
//! idle or perched pose otherwise.

pub mod choreography;
pub mod state;

pub use choreography::{Gesture, PenguinDriver};
pub use state::{Phase, SequenceState};

use state::CardTimer;

use crate::api::config::CardConfig;
use crate::api::types::{CardEvent, TimerId};
use crate::core::timers::TimerQueue;
use crate::extensions::pose::Pose;
use crate::extensions::spring::PoseSpring;
use crate::input::queue::CardInput;
use crate::renderer::frame::CardFrame;
use crate::systems::audio::{AudioSink, ChimeEnvelope, SilentSink, play_chime};
use crate::systems::particles::{Particle, ParticleEmitter};
use crate::systems::presence::{LetterPose, LetterPresence, PresenceStatus};

pub struct DeliverySequencer<A: AudioSink = SilentSink> {
    config: CardConfig,
    state: SequenceState,
    phase: Phase,
    driver: PenguinDriver,
    gesture: Gesture,
    emitter: ParticleEmitter,
    letter: LetterPresence,
    timers: TimerQueue<CardTimer>,
    /// The only recurring timer. Cancelled before any replacement is scheduled.
    trail_timer: Option<TimerId>,
    return_timer: Option<TimerId>,
    chime: ChimeEnvelope,
    audio: A,
    events: Vec<CardEvent>,
    mounted: bool,
}

impl DeliverySequencer<SilentSink> {
    /// A sequencer with no audio output.
    pub fn silent(config: CardConfig) -> Self {
        Self::new(config, SilentSink)
    }
}

impl<A: AudioSink> DeliverySequencer<A> {
    pub fn new(config: CardConfig, audio: A) -> Self {
        let driver = PenguinDriver::Spring(PoseSpring::resting(config.penguin_spring, Pose::IDLE));
        let emitter = ParticleEmitter::new(config.seed, config.particle_lifetime);
        let letter = LetterPresence::new(config.letter_spring, config.flap_duration);
        Self {
            state: SequenceState::default(),
            phase: Phase::Idle,
            driver,
            gesture: Gesture::default(),
            emitter,
            letter,
            timers: TimerQueue::new(),
            trail_timer: None,
            return_timer: None,
            chime: ChimeEnvelope::default(),
            audio,
            events: Vec::new(),
            mounted: true,
            config,
        }
    }

    pub fn with_chime(mut self, chime: ChimeEnvelope) -> Self {
        self.chime = chime;
        self
    }

    // ---- Inputs ----

    /// Route one input. Returns whether it changed anything.
    pub fn handle(&mut self, input: CardInput) -> bool {
        match input {
            CardInput::Activate => self.activate(),
            CardInput::Close => self.close(),
            CardInput::LetterExitComplete => self.letter_exit_complete(),
            CardInput::Hover(on) => self.set_gesture(Gesture { hovered: on, ..self.gesture }),
            CardInput::Press(on) => self.set_gesture(Gesture { pressed: on, ..self.gesture }),
        }
    }

    /// The penguin was clicked. Ignored while the letter is open, mid-jump,
    /// while the penguin is hidden, and after unmount.
    pub fn activate(&mut self) -> bool {
        if !self.mounted || self.state.opened || self.state.jumping || !self.state.penguin_visible {
            log::debug!("activate ignored in {}", self.phase.name());
            return false;
        }

        self.cancel_trail();
        // Clicked during the drop-in: the jump takes over the penguin.
        if let Some(id) = self.return_timer.take() {
            self.timers.cancel(id);
            self.state.returning = false;
        }

        self.state.jumping = true;
        self.phase = Phase::Jumping;
        self.driver = PenguinDriver::Sequence(choreography::jump(self.config.jump_duration));

        self.spawn_particles(self.config.burst_count);
        play_chime(&mut self.audio, &self.chime);
        self.trail_timer = Some(self.timers.schedule_every(self.config.trail_interval, CardTimer::Trail));

        self.events.push(CardEvent::JumpStarted);
        log::info!("card: jumping");
        true
    }

    /// The close control was clicked. Only meaningful while the letter is open.
    pub fn close(&mut self) -> bool {
        if !self.mounted || !self.state.opened {
            return false;
        }
        self.state.opened = false;
        self.phase = Phase::Closing;
        self.letter.hide();
        self.refresh_pose();
        self.events.push(CardEvent::LetterClosed);
        log::info!("card: closing");
        true
    }

    /// The host's renderer reports the letter panel fully removed.
    /// Equivalent to the built-in panel presence finishing its exit.
    pub fn letter_exit_complete(&mut self) -> bool {
        if !self.mounted || self.phase != Phase::Closing {
            return false;
        }
        self.letter.force_remove();
        self.enter_returning();
        true
    }

    fn set_gesture(&mut self, gesture: Gesture) -> bool {
        if !self.mounted || self.gesture == gesture {
            return false;
        }
        self.gesture = gesture;
        true
    }

    // ---- Frame ----

    /// Advance everything by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        if !self.mounted || !dt.is_finite() || dt <= 0.0 {
            return;
        }

        // The trail is cancelled before timers advance, so no trail tick can
        // land after the jump. The open delay is measured from the advanced clock.
        let jump_done = self.driver.tick(dt) && self.phase == Phase::Jumping;
        if jump_done {
            self.cancel_trail();
        }

        for (_, timer) in self.timers.advance(dt) {
            self.on_timer(timer);
        }

        if jump_done {
            self.finish_jump();
        }

        self.emitter.tick(dt);

        if self.letter.tick(dt) && self.phase == Phase::Closing {
            self.enter_returning();
        }
    }

    /// Start over from Idle under a new config. Works after unmount too.
    pub fn reset(&mut self, config: CardConfig) {
        self.timers.clear();
        self.trail_timer = None;
        self.return_timer = None;
        self.state = SequenceState::default();
        self.phase = Phase::Idle;
        self.driver = PenguinDriver::Spring(PoseSpring::resting(config.penguin_spring, Pose::IDLE));
        self.gesture = Gesture::default();
        self.emitter = ParticleEmitter::new(config.seed, config.particle_lifetime);
        self.letter = LetterPresence::new(config.letter_spring, config.flap_duration);
        self.events.clear();
        self.mounted = true;
        self.config = config;
        log::info!("card: reset");
    }

    /// Tear down: cancel every timer and stop reacting to input or ticks.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.timers.clear();
        self.trail_timer = None;
        self.return_timer = None;
        log::info!("card: unmounted");
    }

    // ---- Transitions ----

    fn finish_jump(&mut self) {
        self.state.jumping = false;
        self.state.penguin_visible = false;
        self.phase = Phase::Delivered;
        self.timers.schedule_once(self.config.open_delay, CardTimer::OpenLetter);
        self.refresh_pose();
        self.events.push(CardEvent::JumpFinished);
        log::info!("card: delivered");
    }

    fn open_letter(&mut self) {
        if self.phase != Phase::Delivered || self.state.opened {
            return;
        }
        self.state.opened = true;
        self.letter.show();
        self.refresh_pose();
        self.events.push(CardEvent::LetterOpened);
        log::info!("card: letter open");
    }

    fn enter_returning(&mut self) {
        self.state.penguin_visible = true;
        self.state.returning = true;
        self.phase = Phase::Returning;
        if let Some(id) = self.return_timer.take() {
            self.timers.cancel(id);
        }
        self.return_timer = Some(self.timers.schedule_once(self.config.return_duration, CardTimer::ReturnSettled));
        self.refresh_pose();
        self.events.push(CardEvent::PenguinReturning);
        log::info!("card: returning");
    }

    fn finish_return(&mut self) {
        self.return_timer = None;
        self.state.returning = false;
        self.phase = Phase::Idle;
        self.refresh_pose();
        self.events.push(CardEvent::PenguinIdle);
        log::info!("card: idle");
    }

    fn on_timer(&mut self, timer: CardTimer) {
        match timer {
            CardTimer::Trail => {
                if self.phase == Phase::Jumping {
                    self.spawn_particles(self.config.trail_count);
                }
            }
            CardTimer::ClearParticles => self.emitter.clear(),
            CardTimer::OpenLetter => self.open_letter(),
            CardTimer::ReturnSettled => self.finish_return(),
        }
    }

    /// Pick the penguin's driver from the current flags. The jump owns the
    /// penguin until it completes, so this does nothing while jumping.
    fn refresh_pose(&mut self) {
        if self.state.jumping {
            return;
        }
        if self.state.returning {
            self.driver = PenguinDriver::Sequence(choreography::settle(self.config.return_duration));
            return;
        }
        let target = if self.state.opened { Pose::PERCHED } else { Pose::IDLE };
        let from = match &mut self.driver {
            PenguinDriver::Spring(spring) => {
                spring.retarget(target);
                return;
            }
            PenguinDriver::Sequence(seq) => seq.pose(),
        };
        self.driver = PenguinDriver::Spring(PoseSpring::new(self.config.penguin_spring, from, target));
    }

    // ---- Helpers ----

    fn cancel_trail(&mut self) {
        if let Some(id) = self.trail_timer.take() {
            self.timers.cancel(id);
        }
    }

    /// Spawn a batch and give it its own clear timer.
    fn spawn_particles(&mut self, count: usize) {
        if self.emitter.spawn(count) > 0 {
            self.timers.schedule_once(self.config.particle_lifetime, CardTimer::ClearParticles);
        }
    }

    // ---- Accessors ----

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn driver(&self) -> &PenguinDriver {
        &self.driver
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Penguin pose for this frame, or None while hidden.
    pub fn penguin_pose(&self) -> Option<Pose> {
        if !self.state.penguin_visible {
            return None;
        }
        let pose = self.driver.pose();
        if self.phase == Phase::Idle {
            Some(self.gesture.apply(pose))
        } else {
            Some(pose)
        }
    }

    pub fn particles(&self) -> &[Particle] {
        self.emitter.particles()
    }

    pub fn particles_visible(&self) -> bool {
        self.emitter.is_visible()
    }

    pub fn letter_pose(&self) -> Option<LetterPose> {
        self.letter.pose()
    }

    pub fn letter_status(&self) -> PresenceStatus {
        self.letter.status()
    }

    pub fn trail_active(&self) -> bool {
        self.trail_timer.is_some_and(|id| self.timers.is_live(id))
    }

    /// Number of scheduled timers (recurring and one-shot).
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Seconds on the card's clock.
    pub fn clock(&self) -> f64 {
        self.timers.now()
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Take the events raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<CardEvent> {
        std::mem::take(&mut self.events)
    }

    /// Snapshot for rendering.
    pub fn frame(&self) -> CardFrame {
        CardFrame::capture(self)
    }
}

impl<A: AudioSink> Drop for DeliverySequencer<A> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::audio::AudioError;

    const STEP: f32 = 1.0 / 60.0;

    #[derive(Default)]
    struct CountingSink {
        plays: usize,
    }

    impl AudioSink for CountingSink {
        fn play(&mut self, _envelope: &ChimeEnvelope) -> Result<(), AudioError> {
            self.plays += 1;
            Ok(())
        }
    }

    fn run<A: AudioSink>(seq: &mut DeliverySequencer<A>, seconds: f32) {
        let steps = (seconds / STEP).round() as usize;
        for _ in 0..steps {
            seq.tick(STEP);
        }
    }

    fn sequencer() -> DeliverySequencer<CountingSink> {
        DeliverySequencer::new(CardConfig::default(), CountingSink::default())
    }

    #[test]
    fn starts_idle_with_penguin_shown() {
        let seq = sequencer();
        assert_eq!(seq.phase(), Phase::Idle);
        assert_eq!(seq.state(), SequenceState::default());
        assert_eq!(seq.penguin_pose(), Some(Pose::IDLE));
        assert!(seq.letter_pose().is_none());
    }

    #[test]
    fn activate_enters_jump_with_side_effects() {
        let mut seq = sequencer();
        assert!(seq.activate());
        assert_eq!(seq.phase(), Phase::Jumping);
        assert!(seq.state().jumping);
        assert_eq!(seq.particles().len(), 6);
        assert_eq!(seq.audio().plays, 1);
        assert!(seq.trail_active());
        assert!(seq.driver().is_sequence());
        assert_eq!(seq.drain_events(), vec![CardEvent::JumpStarted]);
    }

    #[test]
    fn second_activate_mid_jump_is_ignored() {
        let mut seq = sequencer();
        seq.activate();
        run(&mut seq, 0.2);
        assert!(!seq.activate());
        assert_eq!(seq.audio().plays, 1);
    }

    #[test]
    fn letter_opens_only_after_jump_and_delay() {
        let mut seq = sequencer();
        seq.activate();

        run(&mut seq, 0.85);
        assert!(!seq.state().opened);
        assert!(seq.state().jumping);

        run(&mut seq, 0.05);
        assert_eq!(seq.phase(), Phase::Delivered);
        assert!(!seq.state().jumping);
        assert!(!seq.state().penguin_visible);
        assert!(!seq.state().opened, "letter waits for the open delay");
        assert!(!seq.trail_active());

        run(&mut seq, 0.05);
        assert!(seq.state().opened);
        assert!(seq.letter_pose().is_some());
    }

    #[test]
    fn bad_frame_times_are_ignored() {
        let mut seq = sequencer();
        seq.activate();
        seq.tick(f32::NAN);
        seq.tick(-1.0);
        seq.tick(f32::INFINITY);
        assert_eq!(seq.clock(), 0.0);

        run(&mut seq, 1.0);
        assert!(!seq.state().jumping);
        assert!(!seq.trail_active());
        assert!(seq.state().opened);
    }

    #[test]
    fn letter_waits_full_open_delay_after_jump() {
        let mut seq = sequencer();
        seq.activate();
        let mut finished_at = None;
        let mut opened_at = None;
        for _ in 0..120 {
            seq.tick(STEP);
            for event in seq.drain_events() {
                match event {
                    CardEvent::JumpFinished => finished_at = Some(seq.clock()),
                    CardEvent::LetterOpened => opened_at = Some(seq.clock()),
                    _ => {}
                }
            }
        }
        let (finished, opened) = (finished_at.unwrap(), opened_at.unwrap());
        let delay = CardConfig::default().open_delay as f64;
        assert!(opened - finished >= delay - 1e-4, "opened {:.4}s after the jump", opened - finished);
    }

    #[test]
    fn jumping_and_opened_never_overlap() {
        let mut seq = sequencer();
        seq.activate();
        for _ in 0..120 {
            seq.tick(STEP);
            let s = seq.state();
            assert!(!(s.jumping && s.opened));
        }
    }

    #[test]
    fn trail_spawns_once_per_interval_then_stops() {
        let mut seq = sequencer();
        seq.activate();
        // Burst at 0, trail at 0.35 and 0.70; the clear at 0.9 empties everything.
        run(&mut seq, 0.34);
        assert_eq!(seq.particles().len(), 6);
        run(&mut seq, 0.02);
        assert_eq!(seq.particles().len(), 7);
        run(&mut seq, 0.35);
        assert_eq!(seq.particles().len(), 8);

        // Past the jump: no trail spawns ever again.
        run(&mut seq, 0.25);
        assert!(!seq.trail_active());
        for _ in 0..120 {
            let before = seq.particles().len();
            seq.tick(STEP);
            assert!(seq.particles().len() <= before);
        }
        assert!(seq.particles().is_empty());
        assert!(!seq.particles_visible());
    }

    #[test]
    fn clicks_while_open_do_nothing() {
        let mut seq = sequencer();
        seq.activate();
        run(&mut seq, 1.0);
        assert!(seq.state().opened);
        seq.drain_events();

        let before = seq.state();
        assert!(!seq.activate());
        assert_eq!(seq.state(), before);
        assert_eq!(seq.audio().plays, 1);
        assert!(seq.drain_events().is_empty());
    }

    #[test]
    fn perched_pose_while_letter_open() {
        let mut seq = sequencer();
        seq.activate();
        run(&mut seq, 2.5);
        match seq.driver() {
            PenguinDriver::Spring(s) => assert_eq!(s.target(), Pose::PERCHED),
            other => panic!("expected spring driver, got {:?}", other),
        }
    }

    #[test]
    fn close_then_presence_exit_returns_penguin() {
        let mut seq = sequencer();
        seq.activate();
        run(&mut seq, 2.0);
        let plays = seq.audio().plays;

        assert!(seq.close());
        assert!(!seq.state().opened);
        assert_eq!(seq.phase(), Phase::Closing);
        assert!(!seq.state().penguin_visible);

        let mut saw_returning = false;
        for _ in 0..300 {
            seq.tick(STEP);
            if seq.phase() == Phase::Returning {
                saw_returning = true;
                break;
            }
        }
        assert!(saw_returning, "letter exit never completed");
        assert!(seq.state().penguin_visible);
        assert!(seq.state().returning);
        assert!(seq.driver().is_sequence());

        run(&mut seq, 0.8);
        assert!(!seq.state().returning);
        assert_eq!(seq.phase(), Phase::Idle);
        assert_eq!(seq.audio().plays, plays, "no chime on the way back");
    }

    #[test]
    fn host_exit_callback_is_idempotent() {
        let mut seq = sequencer();
        seq.activate();
        run(&mut seq, 2.0);
        seq.close();
        assert!(seq.letter_exit_complete());
        assert!(!seq.letter_exit_complete());
        assert_eq!(seq.phase(), Phase::Returning);
        assert!(seq.letter_pose().is_none());
        // The built-in presence must not fire a second transition.
        run(&mut seq, 0.3);
        assert_eq!(seq.phase(), Phase::Returning);
    }

    #[test]
    fn exit_callback_outside_closing_is_ignored() {
        let mut seq = sequencer();
        assert!(!seq.letter_exit_complete());
        assert!(!seq.close());
        assert_eq!(seq.phase(), Phase::Idle);
    }

    #[test]
    fn activate_during_return_hands_penguin_to_jump() {
        let mut seq = sequencer();
        seq.activate();
        run(&mut seq, 2.0);
        seq.close();
        seq.letter_exit_complete();
        run(&mut seq, 0.2);

        assert!(seq.activate());
        assert!(!seq.state().returning);
        // The stale return timer must not yank the phase back to Idle mid-jump.
        run(&mut seq, 0.7);
        assert_eq!(seq.phase(), Phase::Jumping);
        assert!(seq.state().jumping);
    }

    #[test]
    fn unmount_silences_everything() {
        let mut seq = sequencer();
        seq.activate();
        run(&mut seq, 0.2);
        assert!(seq.pending_timers() > 0);

        seq.unmount();
        assert_eq!(seq.pending_timers(), 0);
        assert!(!seq.trail_active());

        let particles = seq.particles().len();
        let state = seq.state();
        run(&mut seq, 2.0);
        assert_eq!(seq.particles().len(), particles);
        assert_eq!(seq.state(), state);
        assert!(!seq.activate());
    }

    #[test]
    fn gesture_applies_only_when_idle() {
        let mut seq = sequencer();
        assert!(seq.handle(CardInput::Hover(true)));
        assert!(!seq.handle(CardInput::Hover(true)));
        let pose = seq.penguin_pose().unwrap();
        assert_eq!(pose.y, -4.0);

        seq.activate();
        let pose = seq.penguin_pose().unwrap();
        assert_eq!(pose.y, 0.0, "jump pose is not overlaid");
    }

    #[test]
    fn reset_returns_to_idle_with_new_timings() {
        let mut seq = sequencer();
        seq.activate();
        run(&mut seq, 0.3);
        seq.unmount();

        let config = CardConfig { jump_duration: 0.5, ..CardConfig::default() };
        seq.reset(config);
        assert!(seq.is_mounted());
        assert_eq!(seq.phase(), Phase::Idle);
        assert!(seq.particles().is_empty());
        assert_eq!(seq.pending_timers(), 0);

        seq.activate();
        run(&mut seq, 0.55);
        assert_eq!(seq.phase(), Phase::Delivered);
    }

    #[test]
    fn silent_audio_does_not_block_delivery() {
        let mut seq = DeliverySequencer::silent(CardConfig::default());
        assert!(seq.activate());
        run(&mut seq, 1.0);
        assert!(seq.state().opened);
    }
}
