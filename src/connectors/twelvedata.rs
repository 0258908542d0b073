// src/connectors/twelvedata.rs
use crate::connectors::messages::{RawBar, TimeSeriesResponse};
use crate::connectors::traits::MarketData;
use crate::error::DataError;
use crate::types::Bar;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use tracing::debug;

pub struct TwelveDataClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl TwelveDataClient {
    pub fn new(http: Client, api_key: String, base_url: String) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl MarketData for TwelveDataClient {
    async fn fetch_bars(
        &self,
        symbol: &str,
        interval_minutes: u32,
        count: usize,
    ) -> Result<Vec<Bar>, DataError> {
        let url = format!("{}/time_series", self.base_url);
        debug!("Fetching {count} {interval_minutes}min bars for {symbol}");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("symbol", symbol.to_string()),
                ("interval", interval_label(interval_minutes)),
                ("outputsize", count.to_string()),
                ("apikey", self.api_key.clone()),
            ])
            .send()
            .await?;

        let payload = response
            .json::<TimeSeriesResponse>()
            .await
            .map_err(|e| DataError::Malformed(e.to_string()))?;

        parse_time_series(payload)
    }
}

fn interval_label(minutes: u32) -> String {
    match minutes {
        60 => "1h".to_string(),
        120 => "2h".to_string(),
        240 => "4h".to_string(),
        m => format!("{m}min"),
    }
}

/// Turns a raw payload into an oldest-first bar series. The provider sends
/// newest first and reports errors in-band via `status`.
pub fn parse_time_series(payload: TimeSeriesResponse) -> Result<Vec<Bar>, DataError> {
    if payload.status.as_deref() == Some("error") {
        let detail = payload
            .message
            .unwrap_or_else(|| format!("provider code {}", payload.code.unwrap_or_default()));
        return Err(DataError::Provider(detail));
    }

    let values = payload
        .values
        .ok_or_else(|| DataError::Malformed("response carries no values".to_string()))?;

    let mut bars = Vec::with_capacity(values.len());
    for raw in &values {
        bars.push(parse_bar(raw)?);
    }
    bars.reverse();
    Ok(bars)
}

fn parse_bar(raw: &RawBar) -> Result<Bar, DataError> {
    // Intraday payloads carry a time component, daily ones only a date.
    let naive = NaiveDateTime::parse_from_str(&raw.datetime, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| {
            chrono::NaiveDate::parse_from_str(&raw.datetime, "%Y-%m-%d")
                .map(|d| d.and_hms_opt(0, 0, 0).unwrap())
        })
        .map_err(|e| DataError::Malformed(format!("bad datetime {:?}: {e}", raw.datetime)))?;

    Ok(Bar {
        timestamp: naive.and_utc(),
        open: parse_price("open", &raw.open)?,
        high: parse_price("high", &raw.high)?,
        low: parse_price("low", &raw.low)?,
        close: parse_price("close", &raw.close)?,
    })
}

fn parse_price(field: &str, value: &str) -> Result<f64, DataError> {
    value
        .parse::<f64>()
        .map_err(|_| DataError::Malformed(format!("bad {field} value {value:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> TimeSeriesResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parses_and_reverses_to_oldest_first() {
        let response = payload(
            r#"{
                "status": "ok",
                "values": [
                    {"datetime": "2025-06-02 10:30:00", "open": "1.1010", "high": "1.1030", "low": "1.1000", "close": "1.1020"},
                    {"datetime": "2025-06-02 10:00:00", "open": "1.1000", "high": "1.1015", "low": "1.0990", "close": "1.1010"}
                ]
            }"#,
        );
        let bars = parse_time_series(response).unwrap();
        assert_eq!(bars.len(), 2);
        assert!(bars[0].timestamp < bars[1].timestamp);
        assert!((bars[0].close - 1.1010).abs() < 1e-9);
        assert!((bars[1].close - 1.1020).abs() < 1e-9);
    }

    #[test]
    fn provider_error_payload_maps_to_provider_error() {
        let response = payload(
            r#"{"code": 401, "message": "invalid api key", "status": "error"}"#,
        );
        match parse_time_series(response) {
            Err(DataError::Provider(detail)) => assert!(detail.contains("invalid api key")),
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[test]
    fn missing_values_is_malformed() {
        let response = payload(r#"{"status": "ok"}"#);
        assert!(matches!(
            parse_time_series(response),
            Err(DataError::Malformed(_))
        ));
    }

    #[test]
    fn unparseable_price_is_malformed() {
        let response = payload(
            r#"{
                "values": [
                    {"datetime": "2025-06-02 10:00:00", "open": "x", "high": "1.1", "low": "1.0", "close": "1.05"}
                ]
            }"#,
        );
        assert!(matches!(
            parse_time_series(response),
            Err(DataError::Malformed(_))
        ));
    }

    #[test]
    fn daily_datetime_format_is_accepted() {
        let response = payload(
            r#"{
                "values": [
                    {"datetime": "2025-06-02", "open": "1.1", "high": "1.2", "low": "1.0", "close": "1.15"}
                ]
            }"#,
        );
        assert_eq!(parse_time_series(response).unwrap().len(), 1);
    }

    #[test]
    fn interval_labels_match_provider_convention() {
        assert_eq!(interval_label(30), "30min");
        assert_eq!(interval_label(60), "1h");
        assert_eq!(interval_label(240), "4h");
    }
}
