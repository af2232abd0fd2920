//! Admin API route handlers.
//!
//! Handlers parse request parameters, resolve the entity spec, call the
//! DAL, and serialize the result. Every route answers 200 with a
//! well-formed body; the only failure signal the dashboard sees is
//! `partial: true`.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use crate::dal::Dal;
use crate::models::entities;
use crate::models::query::{
    CountOutcome, QueryPage, RECENT_LIMIT, Record, STARTUPS_DEFAULT_LIMIT, SortDirection, TopList,
    USERS_DEFAULT_LIMIT,
};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /health - liveness probe
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub startups: i64,
    pub investors: i64,
    pub events: i64,
    pub users: i64,
    pub partial: bool,
}

/// GET /api/admin/overview - four independent entity counts.
///
/// A count that could not run live is replaced by its configured static
/// fallback and flips the partial flag.
pub async fn overview(State(dal): State<Arc<Dal>>) -> Json<OverviewResponse> {
    let spec = entities::overview_spec(dal.config());
    let (startups, investors, events, users) = tokio::join!(
        dal.count(spec.startups.table.as_deref()),
        dal.count(spec.investors.table.as_deref()),
        dal.count(spec.events.table.as_deref()),
        dal.count(spec.users.table.as_deref()),
    );

    let mut partial = false;
    let mut resolve = |outcome: CountOutcome, fallback: i64| {
        if outcome.partial {
            partial = true;
            fallback
        } else {
            outcome.count
        }
    };
    let startups = resolve(startups, spec.startups.fallback);
    let investors = resolve(investors, spec.investors.fallback);
    let events = resolve(events, spec.events.fallback);
    let users = resolve(users, spec.users.fallback);

    Json(OverviewResponse {
        startups,
        investors,
        events,
        users,
        partial,
    })
}

/// GET /api/admin/recent-news - three newest posts.
pub async fn recent_news(State(dal): State<Arc<Dal>>) -> Json<TopList> {
    let spec = entities::recent_news_spec(dal.config());
    Json(dal.list_top(&spec, RECENT_LIMIT).await)
}

/// GET /api/admin/recent-events - three newest events.
pub async fn recent_events(State(dal): State<Arc<Dal>>) -> Json<TopList> {
    let spec = entities::recent_events_spec(dal.config());
    Json(dal.list_top(&spec, RECENT_LIMIT).await)
}

#[derive(Debug, Deserialize)]
pub struct StartupsParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub order_by: Option<String>,
    pub order_dir: Option<String>,
}

/// GET /api/admin/startups - paginated, sortable startup listing.
pub async fn startups(
    State(dal): State<Arc<Dal>>,
    Query(params): Query<StartupsParams>,
) -> Json<QueryPage> {
    let direction = params
        .order_dir
        .as_deref()
        .map(SortDirection::parse)
        .unwrap_or_default();
    let spec = entities::startups_list_spec(
        dal.config(),
        params.order_by.as_deref().unwrap_or(""),
        direction,
    );
    let page = dal
        .list_page(
            &spec,
            params.page.unwrap_or(1),
            params.limit.unwrap_or(STARTUPS_DEFAULT_LIMIT),
        )
        .await;
    Json(page)
}

#[derive(Debug, Deserialize)]
pub struct UsersParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<Record>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub partial: bool,
}

/// GET /api/admin/users - paginated user listing, name ascending.
pub async fn users(
    State(dal): State<Arc<Dal>>,
    Query(params): Query<UsersParams>,
) -> Json<UsersResponse> {
    let spec = entities::users_list_spec(dal.config());
    let page = dal
        .list_page(
            &spec,
            params.page.unwrap_or(1),
            params.limit.unwrap_or(USERS_DEFAULT_LIMIT),
        )
        .await;
    Json(UsersResponse {
        users: page.items,
        total: page.total,
        page: page.page,
        limit: page.limit,
        partial: page.partial,
    })
}
