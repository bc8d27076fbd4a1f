pub mod frame;
pub mod instance;

pub use frame::{CardFrame, ParticleView};
pub use instance::{FrameBuffer, LetterInstance, ParticleInstance, PenguinInstance};
