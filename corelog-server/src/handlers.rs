use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, info};

use crate::error::ServerResult;
use crate::models::{AppendResponse, HealthResponse, RecordResponse};
use crate::state::AppState;

/// Handler for `POST /records`. The request body is appended as-is.
pub async fn append_record(
    State(state): State<AppState>,
    body: Bytes,
) -> ServerResult<Json<AppendResponse>> {
    debug!(len = body.len(), "received append request");
    let offset = state.log.append(body.to_vec())?;
    info!(offset, "record appended");
    Ok(Json(AppendResponse { offset }))
}

/// Handler for `GET /records/:offset`.
pub async fn read_record(
    State(state): State<AppState>,
    Path(offset): Path<u64>,
) -> ServerResult<Json<RecordResponse>> {
    debug!(offset, "received read request");
    let record = state.log.read(offset)?;
    Ok(Json(RecordResponse {
        offset: record.offset,
        value_base64: STANDARD.encode(record.value),
    }))
}

/// Handler for `GET /healthz`.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        lowest_offset: state.log.lowest_offset(),
        highest_offset: state.log.highest_offset(),
    })
}
