//! Data models for the admin backend.
//!
//! This module re-exports the model types used throughout the application.

pub mod entities;
pub mod query;

// Re-export commonly used types
pub use entities::{
    OverviewSpec, OverviewTarget, overview_spec, recent_events_spec, recent_news_spec,
    startups_list_spec, users_list_spec,
};
pub use query::{
    CountOutcome, FieldKind, FieldSpec, ListSpec, QueryPage, RECENT_LIMIT, Record, SortDirection,
    STARTUPS_DEFAULT_LIMIT, STARTUPS_MAX_LIMIT, TopList, USERS_DEFAULT_LIMIT, USERS_MAX_LIMIT,
};
