// src/lib.rs

pub mod config;
pub mod core;

// Re-export
pub use crate::core::dispatcher::Dispatcher;
pub use crate::core::errors::FlushError;
pub use crate::core::outcome::{BatchResult, InvalidationOutcome};
pub use crate::core::template::Mode;
