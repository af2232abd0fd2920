//! SQL identifier sanitization.
//!
//! Table and column names come from deployment configuration, not user
//! input, but they are interpolated directly into query text because
//! identifiers cannot be bound as parameters. Every name must pass through
//! [`sanitize_identifier`] before it reaches a statement; a name that fails
//! resolves to "absent" and the caller skips the table or column entirely.

/// Validate a table or column name for direct interpolation into SQL.
///
/// Accepts non-empty names made of ASCII letters, digits, and underscores;
/// anything else returns `None`.
pub fn sanitize_identifier(name: &str) -> Option<&str> {
    if name.is_empty() {
        return None;
    }
    name.bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_')
        .then_some(name)
}
