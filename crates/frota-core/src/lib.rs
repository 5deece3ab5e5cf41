//! frota-core - Shared types for the fleet-management client
//!
//! This crate provides the data models exchanged with the fleet backend and
//! the derived-statistics helpers the dashboard surfaces are built on.

pub mod models;
pub mod stats;

pub use models::*;
