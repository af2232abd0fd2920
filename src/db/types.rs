//! Row decoding at the DAL boundary.
//!
//! Driver-native values are converted to plain JSON the moment a row
//! leaves sqlx: timestamps become RFC 3339 strings and NULL scalars become
//! the defaults their [`FieldKind`] prescribes (0 for integers, a
//! placeholder for text). Nothing downstream of this module ever sees a
//! driver value type.
//!
//! Decoding is lenient by design: a column whose physical type does not
//! match its declared kind degrades to the kind's default rather than
//! failing the whole row, mirroring how the dashboard treats missing data.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value as JsonValue;
use sqlx::Row;
use sqlx::postgres::PgRow;
use sqlx::sqlite::SqliteRow;

use crate::models::query::{FieldKind, FieldSpec, Record};

/// Canonical textual form for timestamps crossing the boundary.
fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Trait for converting database rows into normalized records.
pub trait RowToRecord {
    fn to_record(&self, fields: &[FieldSpec]) -> Record;
}

macro_rules! impl_row_to_record {
    ($row:ty) => {
        impl RowToRecord for $row {
            fn to_record(&self, fields: &[FieldSpec]) -> Record {
                let mut record = Record::new();
                for field in fields {
                    let alias = field.alias;
                    let value = match field.kind {
                        FieldKind::Integer => {
                            let n = self
                                .try_get::<Option<i64>, _>(alias)
                                .or_else(|_| {
                                    self.try_get::<Option<i32>, _>(alias)
                                        .map(|v| v.map(i64::from))
                                })
                                .or_else(|_| {
                                    self.try_get::<Option<i16>, _>(alias)
                                        .map(|v| v.map(i64::from))
                                })
                                .ok()
                                .flatten();
                            JsonValue::from(n.unwrap_or(0))
                        }
                        FieldKind::Text { empty } => {
                            let s = self.try_get::<Option<String>, _>(alias).ok().flatten();
                            JsonValue::from(s.unwrap_or_else(|| empty.to_string()))
                        }
                        FieldKind::Timestamp => {
                            if let Ok(v) = self.try_get::<Option<DateTime<Utc>>, _>(alias) {
                                v.map(|dt| JsonValue::from(format_timestamp(dt)))
                                    .unwrap_or(JsonValue::Null)
                            } else if let Ok(v) = self.try_get::<Option<NaiveDateTime>, _>(alias) {
                                v.map(|naive| {
                                    let utc = DateTime::from_naive_utc_and_offset(naive, Utc);
                                    JsonValue::from(format_timestamp(utc))
                                })
                                .unwrap_or(JsonValue::Null)
                            } else if let Ok(v) = self.try_get::<Option<String>, _>(alias) {
                                v.map(JsonValue::from).unwrap_or(JsonValue::Null)
                            } else {
                                JsonValue::Null
                            }
                        }
                        FieldKind::Opaque => {
                            if let Ok(Some(n)) = self.try_get::<Option<i64>, _>(alias) {
                                JsonValue::from(n)
                            } else if let Ok(Some(s)) = self.try_get::<Option<String>, _>(alias) {
                                JsonValue::from(s)
                            } else {
                                JsonValue::Null
                            }
                        }
                    };
                    record.insert(alias.to_string(), value);
                }
                record
            }
        }
    };
}

impl_row_to_record!(PgRow);
impl_row_to_record!(SqliteRow);
