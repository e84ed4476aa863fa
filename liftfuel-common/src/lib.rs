//! # Liftfuel Common Library
//!
//! Shared code for the liftfuel ingest binaries including:
//! - Database initialization, models and queries
//! - Canonical chain registry and location lookup
//! - Configuration loading
//! - Common error types

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
