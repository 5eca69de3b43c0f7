//! Observability for the cart widget.
//!
//! This crate provides:
//! - `StructuredLogger` - Structured logging with component context
//! - `LogSink` - Output seam: `tracing` natively, the browser console on
//!   `wasm32`, memory in tests

mod logging;
mod sink;

pub use logging::*;
pub use sink::*;
