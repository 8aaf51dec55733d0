use crate::db::postgres::repository::quote_repository::{QuoteInsert, TraitQuoteRepository};
use crate::db::postgres::repository::stock_repository::TraitStockRepository;
use crate::provider::models::MinuteBar;
use crate::services::quotes::errors::SyncError;
use crate::services::quotes::models::SyncSummary;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Идемпотентное сохранение котировок одного чанка с продвижением watermark
pub struct QuoteStore {
    stocks: Arc<dyn TraitStockRepository + Send + Sync>,
    quotes: Arc<dyn TraitQuoteRepository + Send + Sync>,
}

impl QuoteStore {
    pub fn new(
        stocks: Arc<dyn TraitStockRepository + Send + Sync>,
        quotes: Arc<dyn TraitQuoteRepository + Send + Sync>,
    ) -> Self {
        Self { stocks, quotes }
    }

    /// Сохраняет бары одного чанка. Существующие пары (stock, timestamp)
    /// пропускаются; проигранная гонка на вставке считается таким же
    /// пропуском. После чанка watermark продвигается до максимального
    /// вставленного timestamp, только вперед.
    pub async fn persist_chunk(
        &self,
        stock_id: i32,
        bars: &[MinuteBar],
    ) -> Result<SyncSummary, SyncError> {
        let started = Instant::now();

        let mut summary = SyncSummary::default();
        let mut max_inserted: Option<DateTime<Utc>> = None;

        for bar in bars {
            if self.quotes.find(stock_id, bar.timestamp).await?.is_some() {
                summary.skipped += 1;
                continue;
            }

            // Цена хранится как текст ровно с двумя знаками после запятой
            let price = format!("{:.2}", bar.close);

            match self.quotes.insert(stock_id, &price, bar.timestamp).await? {
                QuoteInsert::Inserted => {
                    summary.inserted += 1;
                    if max_inserted.map_or(true, |max| bar.timestamp > max) {
                        max_inserted = Some(bar.timestamp);
                    }
                }
                QuoteInsert::AlreadyExists => summary.skipped += 1,
            }
        }

        // Watermark двигается только если в этом чанке что-то вставлено
        if let Some(timestamp) = max_inserted {
            self.stocks.update_last_update(stock_id, timestamp).await?;
        }

        debug!(
            "persist_chunk latency for stock_id {}: {:.2}ms ({} bars)",
            stock_id,
            started.elapsed().as_secs_f64() * 1000.0,
            bars.len()
        );

        Ok(summary)
    }
}
