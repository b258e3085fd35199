//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing concrete
//! implementations of domain port traits:
//!
//! - **persistence**: the Redis-backed key-value store and an in-memory
//!   equivalent used by tests and local runs without a Redis instance.
//! - **blob**: filesystem-backed image storage plus an in-memory double.
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod blob;
pub mod persistence;
