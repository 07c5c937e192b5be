use std::fmt::Write as _;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use chrono::Utc;
use gridlot_shared::Region;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::state::{AppState, ObservabilitySnapshot};

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Clients revalidate the region snapshot on every launch, so it is served
/// with `no-cache` plus an ETag rather than a max-age.
const REGIONS_CACHE_CONTROL: &str = "no-cache";

/// Serve the pre-serialized region snapshot — no map clone, no
/// re-serialization per request.
pub async fn get_regions(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    state.observability.record_regions_request();
    let (etag, json): (String, Arc<Bytes>) = {
        let snapshot = state.regions.read().await;
        (snapshot.etag.clone(), Arc::clone(&snapshot.snapshot_json))
    };

    if if_none_match_matches(&headers, &etag) {
        state.observability.record_regions_not_modified();
        return not_modified_response(REGIONS_CACHE_CONTROL, Some(etag.as_str()));
    }

    json_bytes_response((*json).clone(), REGIONS_CACHE_CONTROL, Some(etag.as_str()))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AppendSummary {
    pub stored: usize,
    pub total: usize,
}

/// Accepts a batch of regions and upserts them by origin. Re-sending a batch
/// after a lost response stores the same set again, so retries are safe.
pub async fn append_regions(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AppendSummary>, StatusCode> {
    state.observability.record_append_request();

    let batch: Vec<Region> = match serde_json::from_slice(&body) {
        Ok(batch) => batch,
        Err(e) => {
            warn!(error = %e, "rejecting region append with undecodable body");
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    if batch.is_empty() {
        let total = state.regions.read().await.regions.len();
        return Ok(Json(AppendSummary { stored: 0, total }));
    }

    let (stored, total) = state.upsert_regions(batch).await;
    state.observability.record_regions_upserted(stored as u64);
    info!(stored, total, "appended region batch");
    Ok(Json(AppendSummary { stored, total }))
}

pub async fn delete_region(
    State(state): State<AppState>,
    Path((x, y)): Path<(i32, i32)>,
) -> Result<Json<Region>, StatusCode> {
    state.observability.record_removal_request();
    match state.remove_region(x, y).await {
        Some(removed) => {
            info!(x, y, owner = %removed.owner, "removed region");
            Ok(Json(removed))
        }
        None => Err(StatusCode::NOT_FOUND),
    }
}

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let region_count = state.regions.read().await.regions.len();
    let revision = state.revision.load(Ordering::Acquire);
    let uptime_secs = Utc::now()
        .signed_duration_since(state.started_at)
        .num_seconds();
    let observability = state.observability.snapshot();
    Json(serde_json::json!({
        "status": "ok",
        "regions": region_count,
        "revision": revision,
        "uptime_secs": uptime_secs,
        "data_path": state.data_path.display().to_string(),
        "observability": {
            "regions_requests_total": observability.regions_requests_total,
            "regions_not_modified_total": observability.regions_not_modified_total,
            "append_requests_total": observability.append_requests_total,
            "regions_upserted_total": observability.regions_upserted_total,
            "removal_requests_total": observability.removal_requests_total,
            "persist_failures_total": observability.persist_failures_total,
            "snapshots_persisted_total": observability.snapshots_persisted_total,
        }
    }))
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let region_count = state.regions.read().await.regions.len();
    let revision = state.revision.load(Ordering::Acquire);
    let observability = state.observability.snapshot();

    let body = render_prometheus_metrics(region_count, revision, observability);

    (
        [
            (header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-store"),
        ],
        body,
    )
}

fn render_prometheus_metrics(
    region_count: usize,
    revision: u64,
    observability: ObservabilitySnapshot,
) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "# HELP gridlot_regions Current number of owned regions."
    );
    let _ = writeln!(body, "# TYPE gridlot_regions gauge");
    let _ = writeln!(body, "gridlot_regions {region_count}");

    let _ = writeln!(
        body,
        "# HELP gridlot_revision Mutations accepted since startup."
    );
    let _ = writeln!(body, "# TYPE gridlot_revision counter");
    let _ = writeln!(body, "gridlot_revision {revision}");

    let _ = writeln!(
        body,
        "# HELP gridlot_regions_requests_total Total region snapshot requests."
    );
    let _ = writeln!(body, "# TYPE gridlot_regions_requests_total counter");
    let _ = writeln!(
        body,
        "gridlot_regions_requests_total {}",
        observability.regions_requests_total
    );

    let _ = writeln!(
        body,
        "# HELP gridlot_regions_not_modified_total Total snapshot requests answered 304."
    );
    let _ = writeln!(body, "# TYPE gridlot_regions_not_modified_total counter");
    let _ = writeln!(
        body,
        "gridlot_regions_not_modified_total {}",
        observability.regions_not_modified_total
    );

    let _ = writeln!(
        body,
        "# HELP gridlot_append_requests_total Total region append requests."
    );
    let _ = writeln!(body, "# TYPE gridlot_append_requests_total counter");
    let _ = writeln!(
        body,
        "gridlot_append_requests_total {}",
        observability.append_requests_total
    );

    let _ = writeln!(
        body,
        "# HELP gridlot_regions_upserted_total Total regions stored via append."
    );
    let _ = writeln!(body, "# TYPE gridlot_regions_upserted_total counter");
    let _ = writeln!(
        body,
        "gridlot_regions_upserted_total {}",
        observability.regions_upserted_total
    );

    let _ = writeln!(
        body,
        "# HELP gridlot_removal_requests_total Total region removal requests."
    );
    let _ = writeln!(body, "# TYPE gridlot_removal_requests_total counter");
    let _ = writeln!(
        body,
        "gridlot_removal_requests_total {}",
        observability.removal_requests_total
    );

    let _ = writeln!(
        body,
        "# HELP gridlot_persist_failures_total Total failures while persisting the snapshot."
    );
    let _ = writeln!(body, "# TYPE gridlot_persist_failures_total counter");
    let _ = writeln!(
        body,
        "gridlot_persist_failures_total {}",
        observability.persist_failures_total
    );

    let _ = writeln!(
        body,
        "# HELP gridlot_snapshots_persisted_total Total snapshots written to disk."
    );
    let _ = writeln!(body, "# TYPE gridlot_snapshots_persisted_total counter");
    let _ = writeln!(
        body,
        "gridlot_snapshots_persisted_total {}",
        observability.snapshots_persisted_total
    );

    body
}

fn json_bytes_response(body: Bytes, cache_control: &'static str, etag: Option<&str>) -> Response {
    let mut response = Response::new(Body::from(body));
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_control),
    );
    if let Some(etag) = etag
        && let Ok(etag_header) = HeaderValue::from_str(etag)
    {
        headers.insert(header::ETAG, etag_header);
    }
    response
}

fn not_modified_response(cache_control: &'static str, etag: Option<&str>) -> Response {
    let mut response = StatusCode::NOT_MODIFIED.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_control),
    );
    if let Some(etag) = etag
        && let Ok(etag_header) = HeaderValue::from_str(etag)
    {
        headers.insert(header::ETAG, etag_header);
    }
    response
}

fn normalize_etag(candidate: &str) -> &str {
    candidate.strip_prefix("W/").unwrap_or(candidate).trim()
}

fn if_none_match_matches(headers: &HeaderMap, etag: &str) -> bool {
    let Some(value) = headers.get(header::IF_NONE_MATCH) else {
        return false;
    };
    let Ok(raw) = value.to_str() else {
        return false;
    };

    raw.split(',').any(|candidate| {
        let candidate = candidate.trim();
        candidate == "*" || normalize_etag(candidate) == normalize_etag(etag)
    })
}
