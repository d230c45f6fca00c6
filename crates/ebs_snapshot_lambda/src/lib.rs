//! AWS-oriented adapters and handlers for EBS snapshot creation and cleanup.
//!
//! This crate owns runtime integration details (Lambda handlers and the EC2
//! adapter) and re-exports the provider-agnostic primitives from
//! `ebs_snapshot_core` under a single runtime module boundary.

pub mod adapters;
pub mod handlers;

pub mod runtime {
    pub use ebs_snapshot_core::{config, inventory, retention, selection, tags};
}
