/// User and host input the card understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardInput {
    /// The penguin was clicked.
    Activate,
    /// The letter's close control was clicked.
    Close,
    /// The host's renderer finished removing the letter panel.
    LetterExitComplete,
    /// Pointer entered (true) or left (false) the penguin.
    Hover(bool),
    /// Pointer pressed (true) or released (false) on the penguin.
    Press(bool),
}

/// A queue of input events.
/// JS pushes events between frames; the runner drains them at the start of each tick.
#[derive(Debug)]
pub struct InputQueue {
    events: Vec<CardInput>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(8),
        }
    }

    pub fn push(&mut self, event: CardInput) {
        self.events.push(event);
    }

    /// Drain all pending events in arrival order.
    pub fn drain(&mut self) -> Vec<CardInput> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardInput> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
