//! Core services layered over repositories.
//!
//! # Responsibility
//! - Wrap repository calls with timing and status logging.
//! - Keep callers decoupled from storage details.

pub mod snapshot_service;
