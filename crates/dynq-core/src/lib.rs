//! # dynq-core
//!
//! Core types shared by the dynq query engine.
//!
//! This crate provides the foundational building blocks used by `dynq-queries`:
//! - The query error taxonomy and result alias
//! - Pagination directives
//! - The materialized query result
//! - Configuration and tracing bootstrap

pub mod error;
pub mod result;
pub mod pagination;
pub mod config;
pub mod telemetry;

pub use error::*;
pub use result::*;
pub use pagination::*;
