/// Where the card is in the delivery cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Phase {
    /// Penguin visible at rest, letter closed.
    #[default]
    Idle = 0,
    /// Jump sequence playing, trail particles flowing.
    Jumping,
    /// Penguin hidden; letter open (or about to open after the short delay).
    Delivered,
    /// Letter closed by the user, panel still leaving.
    Closing,
    /// Penguin dropping back in.
    Returning,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Jumping => "jumping",
            Phase::Delivered => "delivered",
            Phase::Closing => "closing",
            Phase::Returning => "returning",
        }
    }
}

/// The four flags the card renders from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceState {
    /// Letter panel shown.
    pub opened: bool,
    /// Penguin mid-jump.
    pub jumping: bool,
    /// Penguin mounted.
    pub penguin_visible: bool,
    /// Drop-in animation playing.
    pub returning: bool,
}

impl SequenceState {
    /// Bit-packed flags for the frame buffer header.
    pub fn bits(&self) -> u32 {
        (self.opened as u32)
            | (self.jumping as u32) << 1
            | (self.penguin_visible as u32) << 2
            | (self.returning as u32) << 3
    }
}

impl Default for SequenceState {
    fn default() -> Self {
        Self {
            opened: false,
            jumping: false,
            penguin_visible: true,
            returning: false,
        }
    }
}

/// Timers the sequencer schedules on its queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CardTimer {
    /// Recurring trail particle while jumping.
    Trail,
    /// Empty the particle collection.
    ClearParticles,
    /// Open the letter after the post-jump pause.
    OpenLetter,
    /// Clear `returning` once the drop-in has played.
    ReturnSettled,
}
