// src/core/mod.rs

//! The central module containing the dispatcher logic and data structures of cacheflush.

pub mod dispatcher;
pub mod endpoint;
pub mod errors;
pub mod outcome;
pub mod template;
pub mod transport;

pub use dispatcher::Dispatcher;
pub use errors::FlushError;
pub use outcome::{BatchResult, InvalidationOutcome, TransportError};
