use serde::{Deserialize, Serialize};

/// Response body for `POST /records`.
#[derive(Debug, Serialize)]
pub struct AppendResponse {
    pub offset: u64,
}

/// Response body for `GET /records/:offset`. `value` is base64-encoded so
/// arbitrary bytes survive a JSON response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordResponse {
    pub offset: u64,
    pub value_base64: String,
}

/// Response body for `GET /healthz`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub lowest_offset: u64,
    pub highest_offset: u64,
}
