use bytemuck::{Pod, Zeroable};

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u32);

/// Notable moments in a delivery, reported to the host once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum CardEvent {
    /// The penguin started its jump.
    JumpStarted = 1,
    /// The jump finished and the penguin was hidden.
    JumpFinished = 2,
    /// The letter panel opened.
    LetterOpened = 3,
    /// The close control was used.
    LetterClosed = 4,
    /// The letter panel finished leaving and the penguin is dropping back in.
    PenguinReturning = 5,
    /// The penguin is back at rest.
    PenguinIdle = 6,
}

impl CardEvent {
    /// Wire record for the shared frame buffer.
    pub fn to_record(self, at: f32) -> EventRecord {
        EventRecord { kind: self as u32 as f32, at }
    }
}

/// An event as written into the frame buffer: kind plus the card clock in seconds.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct EventRecord {
    pub kind: f32,
    pub at: f32,
}

impl EventRecord {
    pub const FLOATS: usize = 2;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_record_layout() {
        assert_eq!(std::mem::size_of::<EventRecord>(), EventRecord::FLOATS * 4);
        let rec = CardEvent::LetterOpened.to_record(1.25);
        assert_eq!(rec.kind, 3.0);
        assert_eq!(rec.at, 1.25);
    }
}
