//! CLI command handling

pub mod invoke;
pub mod serve;

pub use invoke::*;
pub use serve::*;
