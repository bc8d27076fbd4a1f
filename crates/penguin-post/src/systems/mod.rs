pub mod audio;
pub mod particles;
pub mod presence;
