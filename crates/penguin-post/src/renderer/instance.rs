use bytemuck::{Pod, Zeroable};

use crate::api::types::EventRecord;
use crate::bridge::protocol::{self, ProtocolLayout};
use crate::extensions::pose::Pose;
use crate::systems::presence::LetterPose;

use super::frame::{CardFrame, ParticleView};

/// Penguin record in the shared buffer: 8 floats = 32 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PenguinInstance {
    pub x: f32,
    pub y: f32,
    /// Degrees.
    pub rotate: f32,
    pub scale: f32,
    pub opacity: f32,
    /// 1.0 when mounted, 0.0 when hidden.
    pub visible: f32,
    pub _pad: [f32; 2],
}

impl PenguinInstance {
    pub const FLOATS: usize = 8;

    pub fn from_pose(pose: Option<Pose>) -> Self {
        match pose {
            Some(p) => Self {
                x: p.x,
                y: p.y,
                rotate: p.rotate,
                scale: p.scale,
                opacity: p.opacity,
                visible: 1.0,
                _pad: [0.0; 2],
            },
            None => Self::default(),
        }
    }
}

/// Particle record: 8 floats = 32 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub opacity: f32,
    pub scale: f32,
    /// Index into the palette (0..4).
    pub color: f32,
    pub _pad: [f32; 2],
}

impl ParticleInstance {
    pub const FLOATS: usize = 8;
}

impl From<&ParticleView> for ParticleInstance {
    fn from(p: &ParticleView) -> Self {
        Self {
            x: p.position.x,
            y: p.position.y,
            size: p.size,
            opacity: p.opacity,
            scale: p.scale,
            color: p.color.index() as f32,
            _pad: [0.0; 2],
        }
    }
}

/// Letter panel record: 4 floats = 16 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct LetterInstance {
    pub y: f32,
    pub opacity: f32,
    /// Flap rotation in degrees.
    pub flap: f32,
    /// 1.0 when mounted.
    pub mounted: f32,
}

impl LetterInstance {
    pub const FLOATS: usize = 4;

    pub fn from_pose(pose: Option<LetterPose>) -> Self {
        match pose {
            Some(p) => Self { y: p.y, opacity: p.opacity, flap: p.flap, mounted: 1.0 },
            None => Self::default(),
        }
    }
}

/// Flat f32 buffer the host reads through a pointer after every tick.
pub struct FrameBuffer {
    layout: ProtocolLayout,
    data: Vec<f32>,
    frame_counter: u32,
}

impl FrameBuffer {
    pub fn new(layout: ProtocolLayout) -> Self {
        let mut data = vec![0.0; layout.buffer_total_floats];
        data[protocol::HEADER_PROTOCOL_VERSION] = protocol::PROTOCOL_VERSION;
        data[protocol::HEADER_MAX_PARTICLES] = layout.max_particles as f32;
        data[protocol::HEADER_MAX_EVENTS] = layout.max_events as f32;
        Self { layout, data, frame_counter: 0 }
    }

    pub fn layout(&self) -> &ProtocolLayout {
        &self.layout
    }

    /// Write a frame and its events. Overflowing particles or events are dropped.
    pub fn write(&mut self, frame: &CardFrame, events: &[EventRecord]) {
        self.frame_counter = self.frame_counter.wrapping_add(1);

        let penguin = PenguinInstance::from_pose(frame.penguin);
        let at = self.layout.penguin_offset;
        self.data[at..at + PenguinInstance::FLOATS].copy_from_slice(bytemuck::cast_slice(&[penguin]));

        let letter = LetterInstance::from_pose(frame.letter);
        let at = self.layout.letter_offset;
        self.data[at..at + LetterInstance::FLOATS].copy_from_slice(bytemuck::cast_slice(&[letter]));

        let particles: Vec<ParticleInstance> = frame
            .particles
            .iter()
            .take(self.layout.max_particles)
            .map(ParticleInstance::from)
            .collect();
        let at = self.layout.particle_offset;
        let floats: &[f32] = bytemuck::cast_slice(&particles);
        self.data[at..at + floats.len()].copy_from_slice(floats);

        let events = &events[..events.len().min(self.layout.max_events)];
        let at = self.layout.event_offset;
        let floats: &[f32] = bytemuck::cast_slice(events);
        self.data[at..at + floats.len()].copy_from_slice(floats);

        if frame.particles.len() > particles.len() {
            log::debug!("frame buffer: dropped {} particles", frame.particles.len() - particles.len());
        }

        self.data[protocol::HEADER_FRAME_COUNTER] = self.frame_counter as f32;
        self.data[protocol::HEADER_PHASE] = frame.phase as u8 as f32;
        self.data[protocol::HEADER_FLAGS] = frame.state.bits() as f32;
        self.data[protocol::HEADER_PARTICLE_COUNT] = particles.len() as f32;
        self.data[protocol::HEADER_EVENT_COUNT] = events.len() as f32;
        self.data[protocol::HEADER_CLOCK] = frame.clock as f32;
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::CardConfig;
    use crate::api::types::CardEvent;
    use crate::sequencer::DeliverySequencer;

    #[test]
    fn record_sizes() {
        assert_eq!(std::mem::size_of::<PenguinInstance>(), PenguinInstance::FLOATS * 4);
        assert_eq!(std::mem::size_of::<ParticleInstance>(), ParticleInstance::FLOATS * 4);
        assert_eq!(std::mem::size_of::<LetterInstance>(), LetterInstance::FLOATS * 4);
    }

    #[test]
    fn hidden_poses_zero_out() {
        assert_eq!(PenguinInstance::from_pose(None).visible, 0.0);
        assert_eq!(LetterInstance::from_pose(None).mounted, 0.0);
        assert_eq!(PenguinInstance::from_pose(Some(Pose::IDLE)).scale, 1.0);
    }

    #[test]
    fn writes_header_and_records() {
        let mut seq = DeliverySequencer::silent(CardConfig::default());
        seq.activate();
        let events: Vec<EventRecord> = seq.drain_events().into_iter().map(|e| e.to_record(0.0)).collect();

        let mut buf = FrameBuffer::new(ProtocolLayout::new(4, 2));
        buf.write(&seq.frame(), &events);
        let data = buf.as_slice();

        assert_eq!(data[protocol::HEADER_PROTOCOL_VERSION], protocol::PROTOCOL_VERSION);
        assert_eq!(data[protocol::HEADER_FRAME_COUNTER], 1.0);
        assert_eq!(data[protocol::HEADER_PHASE], 1.0);
        // Six particles spawned, capacity four.
        assert_eq!(data[protocol::HEADER_PARTICLE_COUNT], 4.0);
        assert_eq!(data[protocol::HEADER_EVENT_COUNT], 1.0);

        let layout = buf.layout().clone();
        assert_eq!(data[layout.penguin_offset + 5], 1.0);
        assert_eq!(data[layout.letter_offset + 3], 0.0);
        assert_eq!(data[layout.event_offset], CardEvent::JumpStarted as u32 as f32);
    }
}
