// src/connectors/messages.rs
use serde::Deserialize;

/// Time-series payload from the TwelveData REST endpoint. Prices arrive as
/// strings; an error response replaces `values` with code/message fields.
#[derive(Debug, Deserialize)]
pub struct TimeSeriesResponse {
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub code: Option<i64>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub values: Option<Vec<RawBar>>,
}

#[derive(Debug, Deserialize)]
pub struct RawBar {
    pub datetime: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
}
