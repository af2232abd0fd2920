//! Incubator Admin Backend Library
//!
//! This library provides the read-only data-access layer and HTTP routes
//! for the incubator admin dashboard: overview counts, recent news and
//! events, and paginated startup and user listings over PostgreSQL
//! (SQLite for local fixtures).

pub mod config;
pub mod dal;
pub mod db;
pub mod error;
pub mod http;
pub mod models;

pub use config::Config;
pub use dal::Dal;
pub use error::{DalError, DalResult};
