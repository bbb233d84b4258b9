pub mod format;
pub mod frame;
pub mod preview;
