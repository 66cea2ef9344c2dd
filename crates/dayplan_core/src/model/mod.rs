//! Domain model for the task lifecycle core.
//!
//! # Responsibility
//! - Define templates, instances and the info value they share.
//! - Keep construction-time validation next to the data it guards.
//!
//! # Invariants
//! - Every record is identified by a stable `TaskId`.
//! - Overdue status is derived on read, never stored.

pub mod goal;
pub mod info;
pub mod task;
