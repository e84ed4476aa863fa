//! Database models and queries

pub mod init;
pub mod locations;
pub mod models;
pub mod registry;

pub use init::*;
pub use locations::*;
pub use models::*;
pub use registry::*;
