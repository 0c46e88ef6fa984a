//! Load and reconcile pipeline for podium.
//!
//! Reads the instrument, name, and assignment sources, rebuilds the roster
//! database from them, and regenerates the person/instrument links. The
//! load and reconcile steps are treadle `Stage` implementations wired so
//! that reconciliation only runs over a fully committed store.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod backup;
pub mod config;
pub mod error;
pub mod load;
pub mod pipeline;
pub mod reconcile;
pub mod source;
pub mod work_item;

pub use config::Config;
pub use error::{EtlError, EtlResult};
pub use load::{rebuild_database, LoadStage, LoadSummary};
pub use pipeline::{build_pipeline, build_reconcile_pipeline, run_workflow};
pub use reconcile::{reconcile_database, ReconcileStage, ReconcileSummary};
pub use source::SourcePaths;
pub use work_item::RosterRun;
