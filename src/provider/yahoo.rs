use crate::env_config::models::app_setting::AppSettings;
use crate::provider::errors::ProviderError;
use crate::provider::models::{bars_from_chart, ChartResponse, MinuteBar};
use crate::provider::traits::MarketDataProvider;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Market data provider backed by the public chart endpoint.
/// Returns per-minute close prices and answers symbol validation probes.
pub struct YahooProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooProvider {
    pub fn new(settings: &Arc<AppSettings>) -> Result<Self, ProviderError> {
        let provider_config = &settings.app_config.provider;

        // The chart endpoint rejects requests without a browser user agent
        let client = reqwest::Client::builder()
            .user_agent(provider_config.user_agent.clone())
            .timeout(Duration::from_secs(provider_config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: provider_config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_chart(
        &self,
        symbol: &str,
        params: &str,
    ) -> Result<Vec<MinuteBar>, ProviderError> {
        let url = format!("{}/v8/finance/chart/{}?{}", self.base_url, symbol, params);

        debug!("Requesting chart data: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        // Error payloads for bad symbols arrive with a non-success status,
        // so decode the body first and fall back to the status code
        match response.json::<ChartResponse>().await {
            Ok(payload) => bars_from_chart(symbol, payload),
            Err(_) if !status.is_success() => Err(ProviderError::Upstream {
                message: format!("HTTP {} from chart endpoint", status),
            }),
            Err(e) => Err(ProviderError::Network(e)),
        }
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    async fn fetch_minute_bars(
        &self,
        symbol: &str,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<MinuteBar>, ProviderError> {
        let params = format!(
            "interval=1m&includePrePost=false&period1={}&period2={}",
            window_start.timestamp(),
            window_end.timestamp()
        );

        let bars = self.fetch_chart(symbol, &params).await?;

        info!(
            "Fetched {} minute bars for {} from {} to {}",
            bars.len(),
            symbol,
            window_start.format("%Y-%m-%d %H:%M:%S"),
            window_end.format("%Y-%m-%d %H:%M:%S")
        );

        Ok(bars)
    }

    async fn validate_symbol(&self, symbol: &str) -> Result<bool, ProviderError> {
        debug!("Validating symbol '{}' against provider", symbol);

        // A daily one-bar probe is enough to tell a live instrument apart
        match self.fetch_chart(symbol, "interval=1d&range=1d").await {
            Ok(_) => Ok(true),
            Err(ProviderError::SymbolNotFound(_)) | Err(ProviderError::NoData { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
