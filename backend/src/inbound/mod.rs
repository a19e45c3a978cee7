//! Inbound adapters that translate external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! HTTP handlers live under [`http`]; the submission workflow, the
//! confirmation view, and the administrative probes are all HTTP surfaces.

pub mod http;
