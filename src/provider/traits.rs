use crate::provider::errors::ProviderError;
use crate::provider::models::MinuteBar;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetches per-minute bars for one fetch window.
    /// The window span must stay within the provider's maximum span;
    /// passing a wider window is a caller bug, not a runtime condition.
    async fn fetch_minute_bars(
        &self,
        symbol: &str,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<MinuteBar>, ProviderError>;

    /// Checks whether the symbol denotes an actively tradable instrument
    async fn validate_symbol(&self, symbol: &str) -> Result<bool, ProviderError>;
}
