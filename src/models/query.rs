//! Query-related data models.
//!
//! This module defines the types flowing between the HTTP handlers and the
//! data-access layer: field specifications for building SELECT lists,
//! sort directions, and the paginated/partial result shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::db::identifier::sanitize_identifier;

/// Default and maximum page sizes for the startups listing.
pub const STARTUPS_DEFAULT_LIMIT: u32 = 50;
pub const STARTUPS_MAX_LIMIT: u32 = 200;

/// Default and maximum page sizes for the users listing.
pub const USERS_DEFAULT_LIMIT: u32 = 10;
pub const USERS_MAX_LIMIT: u32 = 100;

/// Row bound for the "recent N" dashboard widgets.
pub const RECENT_LIMIT: u32 = 3;

/// One output row, already normalized: dates are ISO-8601 strings, NULL
/// scalars are type-appropriate defaults. Driver-native values never
/// appear here.
pub type Record = serde_json::Map<String, JsonValue>;

/// Logical shape of a selected column, driving NULL defaults and date
/// normalization when a row is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// NULL decodes to 0
    Integer,
    /// NULL decodes to the given placeholder (usually "")
    Text { empty: &'static str },
    /// Decodes to an RFC 3339 string; NULL stays null
    Timestamp,
    /// Best-effort passthrough (ids, nullable URLs); NULL stays null
    Opaque,
}

/// A column selected by a listing, with its output alias.
///
/// `column` is the physical name; `None` selects a NULL literal so the
/// output shape stays stable when a column is not configured.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub alias: &'static str,
    pub column: Option<String>,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn integer(alias: &'static str, column: impl Into<String>) -> Self {
        Self {
            alias,
            column: Some(column.into()),
            kind: FieldKind::Integer,
        }
    }

    pub fn text(alias: &'static str, column: impl Into<String>) -> Self {
        Self::text_or(alias, Some(column.into()), "")
    }

    pub fn text_or(alias: &'static str, column: Option<String>, empty: &'static str) -> Self {
        Self {
            alias,
            column,
            kind: FieldKind::Text { empty },
        }
    }

    pub fn timestamp(alias: &'static str, column: impl Into<String>) -> Self {
        Self {
            alias,
            column: Some(column.into()),
            kind: FieldKind::Timestamp,
        }
    }

    pub fn opaque(alias: &'static str, column: Option<String>) -> Self {
        Self {
            alias,
            column,
            kind: FieldKind::Opaque,
        }
    }

    /// SELECT-list expression for this field. The physical column is
    /// sanitized here as well; a name that fails becomes a NULL literal,
    /// never query text.
    pub fn select_expr(&self) -> String {
        match self.column.as_deref().and_then(sanitize_identifier) {
            Some(column) => format!("{} AS {}", column, self.alias),
            None => format!("NULL AS {}", self.alias),
        }
    }
}

/// Sort direction for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Parse a caller-supplied direction; anything but "asc" means
    /// descending.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A fully resolved listing: target table, selected fields, ordering, and
/// the operator limit cap. Built fresh per request from configuration.
#[derive(Debug, Clone)]
pub struct ListSpec {
    /// Raw table name; sanitized again at the operation boundary.
    pub table: Option<String>,
    pub fields: Vec<FieldSpec>,
    /// Resolved order column; an unsanitizable name drops the ORDER BY.
    pub order_column: Option<String>,
    pub direction: SortDirection,
    /// Upper bound applied to any caller-supplied limit.
    pub max_limit: u32,
}

/// One page of records plus the unfiltered total.
///
/// `total` reflects the table at count time and may be stale relative to
/// `items` under concurrent writes; no snapshot is taken across the two
/// queries.
#[derive(Debug, Clone, Serialize)]
pub struct QueryPage {
    pub items: Vec<Record>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub partial: bool,
}

impl QueryPage {
    /// The empty shape returned when the query could not run.
    pub fn unavailable(page: u32, limit: u32) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page,
            limit,
            partial: true,
        }
    }
}

/// A bounded "recent N" listing without a total.
#[derive(Debug, Clone, Serialize)]
pub struct TopList {
    pub items: Vec<Record>,
    pub partial: bool,
}

impl TopList {
    pub fn unavailable() -> Self {
        Self {
            items: Vec::new(),
            partial: true,
        }
    }
}

/// Result of a table count; `partial` means the value did not come from a
/// live query.
#[derive(Debug, Clone, Copy)]
pub struct CountOutcome {
    pub count: i64,
    pub partial: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_expr_aliases_column() {
        let field = FieldSpec::text("name", "display_name");
        assert_eq!(field.select_expr(), "display_name AS name");
    }

    #[test]
    fn test_select_expr_null_placeholder_when_absent() {
        let field = FieldSpec::text_or("status", None, "");
        assert_eq!(field.select_expr(), "NULL AS status");
    }

    #[test]
    fn test_select_expr_null_placeholder_when_unsanitizable() {
        // Even if a bad name reaches a FieldSpec, it never reaches SQL.
        let field = FieldSpec::text("name", "name; DROP TABLE users");
        assert_eq!(field.select_expr(), "NULL AS name");
    }

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!(SortDirection::parse("asc"), SortDirection::Asc);
        assert_eq!(SortDirection::parse("ASC"), SortDirection::Asc);
        assert_eq!(SortDirection::parse("desc"), SortDirection::Desc);
        assert_eq!(SortDirection::parse("sideways"), SortDirection::Desc);
    }

    #[test]
    fn test_unavailable_shapes() {
        let page = QueryPage::unavailable(2, 50);
        assert!(page.partial);
        assert_eq!(page.total, 0);
        assert_eq!(page.page, 2);
        assert!(page.items.is_empty());

        let top = TopList::unavailable();
        assert!(top.partial && top.items.is_empty());
    }
}
