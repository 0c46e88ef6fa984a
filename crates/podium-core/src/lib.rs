//! Core domain model for podium.
//!
//! This crate defines the roster data model (persons, instruments, raw
//! assignments and reconciled links), the name parser and nickname rules,
//! the identity reconciler, the SQLite schema, and the report views built
//! on top of it.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod model;
pub mod names;
pub mod reconcile;
pub mod report;
pub mod schema;

pub use error::{Error, Result};
