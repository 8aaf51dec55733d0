use crate::db::postgres::models::stock::Stock;
use crate::db::postgres::repository::stock_repository::TraitStockRepository;
use crate::provider::traits::MarketDataProvider;
use crate::services::quotes::errors::SyncError;
use std::sync::Arc;
use tracing::{debug, info};

/// Разрешает тикеры во внутренние записи stocks, регистрируя новые
/// валидные символы при первой встрече
pub struct TickerRegistry {
    stocks: Arc<dyn TraitStockRepository + Send + Sync>,
    provider: Arc<dyn MarketDataProvider>,
}

impl TickerRegistry {
    pub fn new(
        stocks: Arc<dyn TraitStockRepository + Send + Sync>,
        provider: Arc<dyn MarketDataProvider>,
    ) -> Self {
        Self { stocks, provider }
    }

    /// Возвращает запись stocks для символа.
    ///
    /// Известные символы возвращаются без обращения к провайдеру. Неизвестные
    /// сначала проверяются у провайдера; подтвержденные регистрируются с
    /// пустым watermark, остальные проваливаются с UnknownTicker.
    pub async fn resolve(&self, symbol: &str) -> Result<Stock, SyncError> {
        let ticker = symbol.trim().to_uppercase();

        if let Some(stock) = self.stocks.find_by_ticker(&ticker).await? {
            return Ok(stock);
        }

        debug!("Ticker '{}' not in store, validating with provider", ticker);

        if !self.provider.validate_symbol(&ticker).await? {
            return Err(SyncError::UnknownTicker(ticker));
        }

        match self.stocks.insert(&ticker).await? {
            Some(id) => {
                info!("Registered new ticker '{}' with id {}", ticker, id);
                Ok(Stock {
                    id,
                    ticker,
                    last_update: None,
                })
            }
            None => {
                // Конкурирующая вставка выиграла гонку на unique(ticker) —
                // перечитываем существующую запись вместо ошибки
                debug!("Concurrent insert won for '{}', re-reading row", ticker);
                self.stocks
                    .find_by_ticker(&ticker)
                    .await?
                    .ok_or(SyncError::Store(sqlx::Error::RowNotFound))
            }
        }
    }
}
