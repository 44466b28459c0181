use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics::counter;
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::config::{MatchMode, SearchSettings, TermJoin};
use crate::ingest::dates::parse_date;
use crate::project::{project_all, RecordView};
use crate::search::{self, parse_terms, search_with};
use crate::store::RecordStore;

#[derive(Clone)]
pub struct AppState {
    pub store: RecordStore,
}

impl AppState {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/records", get(search_records))
        .route("/api/search", get(search_records))
        .route("/api/records/{source}", get(records_by_source))
        .route("/api/policies", get(list_policies))
        .route("/api/names", get(list_names))
        .route("/api/sources", get(list_sources))
        .route("/admin/reload", post(admin_reload))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
struct SearchResp<'a> {
    success: bool,
    count: usize,
    results: Vec<RecordView<'a>>,
}

fn error_response(status: StatusCode, msg: impl Into<String>) -> Response {
    let body = json!({ "success": false, "error": msg.into() });
    (status, Json(body)).into_response()
}

/// Build a query from `q`, `source`, `from`, `to`, `join` and `mode` params,
/// plus the field filters `date` (substring), `names` and `policies` (comma lists).
/// `join`/`mode` fall back to the configured defaults.
fn build_query(
    params: &HashMap<String, String>,
    defaults: &SearchSettings,
) -> anyhow::Result<search::Query> {
    let param = |k: &str| params.get(k).map(|v| v.trim()).filter(|v| !v.is_empty());

    let date_param = |k: &str| -> anyhow::Result<_> {
        match param(k) {
            Some(raw) => parse_date(raw)
                .map(Some)
                .ok_or_else(|| anyhow::anyhow!("unrecognized date in '{k}': {raw}")),
            None => Ok(None),
        }
    };

    let join = param("join")
        .map(str::parse::<TermJoin>)
        .transpose()?
        .unwrap_or(defaults.join);
    let mode = param("mode")
        .map(str::parse::<MatchMode>)
        .transpose()?
        .unwrap_or(defaults.match_mode);

    let mut query = search::Query::terms(param("q").map(parse_terms).unwrap_or_default())
        .join(join)
        .mode(mode)
        .between(date_param("from")?, date_param("to")?)
        .names(param("names").map(parse_terms).unwrap_or_default())
        .policies(param("policies").map(parse_terms).unwrap_or_default());
    if let Some(source) = param("source") {
        query = query.source(source);
    }
    if let Some(date) = param("date") {
        query = query.date_contains(date);
    }
    Ok(query)
}

fn respond_with_matches(state: &AppState, query: &search::Query) -> Response {
    let cfg = state.store.config();
    let records = state.store.records();
    let found = search_with(&records, query, &cfg.sources);

    counter!("search_requests_total").increment(1);
    counter!("search_results_total").increment(found.len() as u64);
    tracing::debug!(
        target: "search",
        terms = query.terms.len(),
        source = ?query.source,
        hits = found.len(),
        "search served"
    );

    let results = project_all(&found, &cfg);
    Json(SearchResp {
        success: true,
        count: results.len(),
        results,
    })
    .into_response()
}

async fn search_records(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    match build_query(&params, &state.store.config().search) {
        Ok(query) => respond_with_matches(&state, &query),
        Err(e) => error_response(StatusCode::BAD_REQUEST, format!("{e:#}")),
    }
}

async fn records_by_source(State(state): State<AppState>, Path(source): Path<String>) -> Response {
    let query = search::Query::default().source(source);
    respond_with_matches(&state, &query)
}

async fn list_policies(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<serde_json::Value> {
    let records = state.store.records();
    let policies = match params.get("source").map(|s| s.trim()).filter(|s| !s.is_empty()) {
        Some(source) => {
            search::list_distinct_policies_for(&records, &state.store.config().sources, source)
        }
        None => search::list_distinct_policies(&records),
    };
    Json(json!({ "policies": policies }))
}

async fn list_names(State(state): State<AppState>) -> Json<serde_json::Value> {
    let records = state.store.records();
    Json(json!({ "names": search::list_distinct_names(&records) }))
}

#[derive(serde::Serialize)]
struct SourceOut {
    name: String,
    aliases: Vec<String>,
    records: usize,
    missing: bool,
}

async fn list_sources(State(state): State<AppState>) -> Json<Vec<SourceOut>> {
    let records = state.store.records();
    let report = state.store.report();
    let out = state
        .store
        .config()
        .sources
        .iter()
        .map(|d| SourceOut {
            name: d.name.clone(),
            aliases: d.aliases.clone(),
            records: records.iter().filter(|r| d.answers_to(&r.source)).count(),
            missing: report.for_source(&d.name).is_some_and(|s| s.missing),
        })
        .collect();
    Json(out)
}

async fn admin_reload(State(state): State<AppState>) -> Response {
    let store = state.store.clone();
    match tokio::task::spawn_blocking(move || store.reload()).await {
        Ok(Ok(report)) => Json(json!({ "success": true, "report": report })).into_response(),
        Ok(Err(e)) => {
            tracing::warn!(target: "store", error = ?e, "reload failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}"))
        }
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}
