//! Database plumbing under the data-access layer.
//!
//! - Connection pool construction and scoped acquisition
//! - Identifier sanitization
//! - Statement construction and execution
//! - Row decoding into normalized records

pub mod executor;
pub mod identifier;
pub mod pool;
pub mod types;

pub use identifier::sanitize_identifier;
pub use pool::{DbPool, with_pg_connection, with_sqlite_connection};
pub use types::RowToRecord;
