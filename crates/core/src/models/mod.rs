//! Data models for RandoBot

mod build;
mod race;
mod role;

pub use build::*;
pub use race::*;
pub use role::*;
