//! Per-entity listing specifications.
//!
//! Each dashboard endpoint resolves its physical table and column names
//! from configuration here, fresh per request. Column overrides that fail
//! sanitization fall back to the default name; table names that fail have
//! no fallback and make the endpoint answer partial.

use crate::config::{Config, resolve_column, resolve_optional_column, resolve_table};
use crate::models::query::{
    FieldSpec, ListSpec, RECENT_LIMIT, SortDirection, STARTUPS_MAX_LIMIT, USERS_MAX_LIMIT,
};

/// One overview tile: the table to count and the static value served when
/// a live count cannot run.
#[derive(Debug, Clone)]
pub struct OverviewTarget {
    pub table: Option<String>,
    pub fallback: i64,
}

#[derive(Debug, Clone)]
pub struct OverviewSpec {
    pub startups: OverviewTarget,
    pub investors: OverviewTarget,
    pub events: OverviewTarget,
    pub users: OverviewTarget,
}

/// Overview counts: startups/investors/events tables must be configured
/// explicitly; users defaults to the platform's `users` table.
pub fn overview_spec(config: &Config) -> OverviewSpec {
    let entities = &config.entities;
    let fallbacks = &config.fallback_counts;
    OverviewSpec {
        startups: OverviewTarget {
            table: resolve_table(entities.startups_table.as_deref(), None),
            fallback: fallbacks.startups_count,
        },
        investors: OverviewTarget {
            table: resolve_table(entities.investors_table.as_deref(), None),
            fallback: fallbacks.investors_count,
        },
        events: OverviewTarget {
            table: resolve_table(entities.events_table.as_deref(), None),
            fallback: fallbacks.events_count,
        },
        users: OverviewTarget {
            table: resolve_table(entities.users_table.as_deref(), Some("users")),
            fallback: fallbacks.users_count,
        },
    }
}

/// Paginated startups listing. `order_by` is an external sort key checked
/// against a fixed allow-list; unknown keys sort by join date.
pub fn startups_list_spec(config: &Config, order_by: &str, direction: SortDirection) -> ListSpec {
    let entities = &config.entities;
    let name = resolve_column(entities.startups_name_column.as_deref(), "name");
    let sector = resolve_column(entities.startups_sector_column.as_deref(), "sector");
    let stage = resolve_column(entities.startups_stage_column.as_deref(), "stage");
    let location = resolve_column(entities.startups_location_column.as_deref(), "location");
    let logo = resolve_column(entities.startups_logo_column.as_deref(), "logo");
    let status = resolve_optional_column(entities.startups_status_column.as_deref());
    let join_date = resolve_column(entities.startups_join_column.as_deref(), "join_date");

    let order_column = match order_by {
        "id" => "id".to_string(),
        "name" => name.clone(),
        "sector" => sector.clone(),
        "stage" => stage.clone(),
        "location" => location.clone(),
        _ => join_date.clone(),
    };

    ListSpec {
        table: resolve_table(entities.startups_table.as_deref(), Some("startups")),
        fields: vec![
            FieldSpec::opaque("id", Some("id".to_string())),
            FieldSpec::text("name", name),
            FieldSpec::text("sector", sector),
            FieldSpec::text("stage", stage),
            FieldSpec::text("location", location),
            FieldSpec::opaque("logo", Some(logo)),
            FieldSpec::text_or("status", status, ""),
            FieldSpec::timestamp("join_date", join_date),
        ],
        order_column: Some(order_column),
        direction,
        max_limit: STARTUPS_MAX_LIMIT,
    }
}

/// Users listing, always ordered by name ascending.
pub fn users_list_spec(config: &Config) -> ListSpec {
    let entities = &config.entities;
    let name = resolve_column(entities.users_name_column.as_deref(), "name");
    let email = resolve_column(entities.users_email_column.as_deref(), "email");
    let role = resolve_column(entities.users_role_column.as_deref(), "role");

    ListSpec {
        table: resolve_table(entities.users_table.as_deref(), Some("users")),
        order_column: Some(name.clone()),
        fields: vec![
            FieldSpec::opaque("id", Some("id".to_string())),
            FieldSpec::text("name", name),
            FieldSpec::text("email", email),
            FieldSpec::text("role", role),
        ],
        direction: SortDirection::Asc,
        max_limit: USERS_MAX_LIMIT,
    }
}

/// Three newest news posts by creation time.
pub fn recent_news_spec(config: &Config) -> ListSpec {
    let entities = &config.entities;
    let title = resolve_column(entities.news_title_column.as_deref(), "title");
    let status = resolve_column(entities.news_status_column.as_deref(), "status");
    let created = resolve_column(entities.news_created_column.as_deref(), "created_at");
    let views = resolve_column(entities.news_views_column.as_deref(), "views");

    ListSpec {
        table: resolve_table(entities.news_table.as_deref(), None),
        order_column: Some(created.clone()),
        fields: vec![
            FieldSpec::opaque("id", Some("id".to_string())),
            FieldSpec::text_or("title", Some(title), "(untitled)"),
            FieldSpec::text_or("status", Some(status), "draft"),
            FieldSpec::timestamp("created_at", created),
            FieldSpec::integer("views", views),
        ],
        direction: SortDirection::Desc,
        max_limit: RECENT_LIMIT,
    }
}

/// Three newest events. Recency is by id descending, matching how the
/// dashboard has always ranked them.
pub fn recent_events_spec(config: &Config) -> ListSpec {
    let entities = &config.entities;
    let title = resolve_column(entities.events_title_column.as_deref(), "title");
    let status = resolve_column(entities.events_status_column.as_deref(), "status");
    let created = resolve_column(entities.events_created_column.as_deref(), "created_at");
    let attendees = resolve_column(entities.events_attendees_column.as_deref(), "attendees");

    ListSpec {
        table: resolve_table(entities.events_table.as_deref(), None),
        order_column: Some("id".to_string()),
        fields: vec![
            FieldSpec::opaque("id", Some("id".to_string())),
            FieldSpec::text_or("title", Some(title), "(untitled)"),
            FieldSpec::text_or("status", Some(status), "planning"),
            FieldSpec::timestamp("created_at", created),
            FieldSpec::integer("attendees", attendees),
        ],
        direction: SortDirection::Desc,
        max_limit: RECENT_LIMIT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config_with(args: &[&str]) -> Config {
        let mut argv = vec!["incubator-admin"];
        argv.extend_from_slice(args);
        Config::parse_from(argv)
    }

    #[test]
    fn test_startups_defaults() {
        let spec = startups_list_spec(&config_with(&[]), "", SortDirection::Desc);
        assert_eq!(spec.table.as_deref(), Some("startups"));
        assert_eq!(spec.order_column.as_deref(), Some("join_date"));
        // Unconfigured status column becomes a NULL placeholder.
        let status = spec.fields.iter().find(|f| f.alias == "status").unwrap();
        assert_eq!(status.select_expr(), "NULL AS status");
    }

    #[test]
    fn test_startups_order_allow_list() {
        let config = config_with(&["--startups-name-column", "company_name"]);
        let spec = startups_list_spec(&config, "name", SortDirection::Asc);
        assert_eq!(spec.order_column.as_deref(), Some("company_name"));

        // Unknown keys fall back to the join-date default.
        let spec = startups_list_spec(&config, "password", SortDirection::Asc);
        assert_eq!(spec.order_column.as_deref(), Some("join_date"));
    }

    #[test]
    fn test_bad_table_override_resolves_absent() {
        let config = config_with(&["--startups-table", "startups; DROP TABLE x"]);
        let spec = startups_list_spec(&config, "", SortDirection::Desc);
        assert_eq!(spec.table, None);
    }

    #[test]
    fn test_news_requires_configured_table() {
        let spec = recent_news_spec(&config_with(&[]));
        assert_eq!(spec.table, None);

        let spec = recent_news_spec(&config_with(&["--news-table", "news_posts"]));
        assert_eq!(spec.table.as_deref(), Some("news_posts"));
    }

    #[test]
    fn test_users_sorted_by_name_ascending() {
        let spec = users_list_spec(&config_with(&[]));
        assert_eq!(spec.table.as_deref(), Some("users"));
        assert_eq!(spec.order_column.as_deref(), Some("name"));
        assert_eq!(spec.direction, SortDirection::Asc);
    }

    #[test]
    fn test_overview_tables() {
        let config = config_with(&["--startups-table", "startups", "--startups-count", "120"]);
        let spec = overview_spec(&config);
        assert_eq!(spec.startups.table.as_deref(), Some("startups"));
        assert_eq!(spec.startups.fallback, 120);
        assert_eq!(spec.investors.table, None);
        assert_eq!(spec.users.table.as_deref(), Some("users"));
    }
}
