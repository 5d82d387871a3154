//! service-core: Shared infrastructure for the SMS gateway services.
pub mod config;
pub mod error;
pub mod observability;
