//! Provider-agnostic EBS snapshot lifecycle primitives.
//!
//! This crate owns tag matching, inventory shapes, configuration parsing, and
//! the selection/retention rules shared by the creator and reaper handlers. It
//! intentionally excludes AWS SDK and Lambda runtime concerns.

pub mod config;
pub mod inventory;
pub mod retention;
pub mod selection;
pub mod tags;
