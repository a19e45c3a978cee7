//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing
//! concrete implementations of the domain port traits:
//!
//! - **rest**: the hosted record store, reached over its REST dialect
//! - **storage**: the hosted object store (bucket uploads and listings)
//! - **memory**: in-process doubles for tests and credential-less runs
//!
//! Adapters are thin translators that convert between domain types and
//! wire representations. They contain no business logic, no caching, and
//! no retries: every operation is a single round trip and failures surface
//! immediately.

pub mod memory;
pub mod rest;
pub mod storage;
