//! The four confetti colours.

/// Particle colour, cycled by index within a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ParticleColor {
    Sunflower = 0,
    Mint,
    Ocean,
    Coral,
}

impl ParticleColor {
    pub const PALETTE: [ParticleColor; 4] = [Self::Sunflower, Self::Mint, Self::Ocean, Self::Coral];

    /// Colour for the `i`-th particle of a batch.
    pub fn cycle(i: usize) -> Self {
        Self::PALETTE[i % Self::PALETTE.len()]
    }

    pub fn hex(self) -> &'static str {
        match self {
            Self::Sunflower => "#FFD166",
            Self::Mint => "#06D6A0",
            Self::Ocean => "#118AB2",
            Self::Coral => "#EF476F",
        }
    }

    /// Linear RGB in [0, 1].
    pub fn rgb(self) -> [f32; 3] {
        let (r, g, b) = match self {
            Self::Sunflower => (0xFF, 0xD1, 0x66),
            Self::Mint => (0x06, 0xD6, 0xA0),
            Self::Ocean => (0x11, 0x8A, 0xB2),
            Self::Coral => (0xEF, 0x47, 0x6F),
        };
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}
