use crate::error::{DataError, NotifyError};
use crate::types::Bar;
use async_trait::async_trait;

#[async_trait]
pub trait MarketData: Send + Sync {
    /// Recent bars for `symbol`, ordered oldest to newest.
    async fn fetch_bars(
        &self,
        symbol: &str,
        interval_minutes: u32,
        count: usize,
    ) -> Result<Vec<Bar>, DataError>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Best-effort one-way text delivery; callers log failures and move on.
    async fn notify(&self, text: &str) -> Result<(), NotifyError>;
}
