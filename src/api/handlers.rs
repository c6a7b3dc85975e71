use super::AppState;
use super::models::{
    ErrorResponse, SnapshotResponse, ThresholdOption, ThresholdRequest, ThresholdsResponse,
};
use crate::display;
use crate::models::{RankedEntry, VolumeThreshold};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl ToString) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

/// GET /health: simple liveness check
pub async fn health() -> &'static str {
    "OK"
}

/// GET /snapshot: latest ranked list plus staleness info
pub async fn get_snapshot(State(state): State<AppState>) -> Json<SnapshotResponse> {
    let snapshot = state.handle.snapshot();
    let scheduler_state = state.handle.state();

    Json(SnapshotResponse {
        count: snapshot.count(),
        title: display::status_title(&snapshot, scheduler_state),
        state: scheduler_state,
        snapshot: (*snapshot).clone(),
    })
}

/// GET /entries/{asset}: one ranked entry (e.g. BTC)
pub async fn get_entry(
    State(state): State<AppState>,
    Path(asset): Path<String>,
) -> Result<Json<RankedEntry>, StatusCode> {
    state
        .handle
        .snapshot()
        .find(&asset)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// POST /entries/{asset}/open: same as clicking the menu row
pub async fn open_entry(
    State(state): State<AppState>,
    Path(asset): Path<String>,
) -> Result<StatusCode, ApiError> {
    let snapshot = state.handle.snapshot();
    let entry = snapshot
        .find(&asset)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("{asset} is not listed")))?;

    state
        .presenter
        .on_select(entry)
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e))?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /thresholds: the selectable minimum volumes
pub async fn get_thresholds(State(state): State<AppState>) -> Json<ThresholdsResponse> {
    let current = state.handle.threshold();
    let options = VolumeThreshold::ALL
        .into_iter()
        .map(|value| ThresholdOption {
            value,
            usd: value.usd(),
            selected: value == current,
        })
        .collect();

    Json(ThresholdsResponse { current, options })
}

/// PUT /threshold: change the minimum volume and refetch
pub async fn put_threshold(
    State(state): State<AppState>,
    Json(body): Json<ThresholdRequest>,
) -> Result<StatusCode, ApiError> {
    let threshold: VolumeThreshold = body
        .threshold
        .parse()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;

    state.handle.set_threshold(threshold);
    state.handle.refresh_now();

    Ok(StatusCode::NO_CONTENT)
}

/// POST /refresh: run a cycle now
pub async fn post_refresh(State(state): State<AppState>) -> StatusCode {
    state.handle.refresh_now();
    StatusCode::ACCEPTED
}
