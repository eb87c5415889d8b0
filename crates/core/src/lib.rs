//! Core types and shared functionality for the devconnect client.
//!
//! This crate provides:
//! - In-memory TTL cache with approximate-LFU eviction
//! - Unified error types
//! - Layered configuration
//! - The platform data model and client-side validation

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod validation;

pub use cache::{CacheConfig, CacheStats, KeyValueCache};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
