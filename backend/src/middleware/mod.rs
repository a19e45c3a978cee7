//! Request middleware.
//!
//! Request lifecycle concerns that sit in front of every handler;
//! currently only trace-id propagation.

pub mod trace;

pub use trace::Trace;
