//! Generation constants organized by domain.
//!
//! Centralizing magic numbers makes tuning easier and documents intent.

mod cave;
mod dungeon;
mod limits;

pub use cave::*;
pub use dungeon::*;
pub use limits::*;
