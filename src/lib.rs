//! Storage and REST API for Figma files and their nodes.
//!
//! Files and nodes are kept in SQLite through sea-orm. Records are only
//! ever built from the typed inputs in [`figma::types`].

pub mod api;
pub mod config;
pub mod error;
pub mod figma;
