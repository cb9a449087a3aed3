//! Core conversion modules

pub mod delta;
pub mod dtm;
pub mod pulses;

// Re-export main entry points
pub use delta::{grid_midpoint, midpoint, rebase};
pub use dtm::convert_dtm;
pub use pulses::convert_pulses;
