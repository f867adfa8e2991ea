pub mod adjust;
pub mod frame;
pub mod loader;
pub mod sample;
