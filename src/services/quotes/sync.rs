// File: src/services/quotes/sync.rs
use crate::app_state::models::AppState;
use crate::provider::traits::MarketDataProvider;
use crate::services::quotes::errors::SyncError;
use crate::services::quotes::models::{RunSummary, SyncSummary, TickerReport};
use crate::services::quotes::planner::{plan_chunks, ChunkWindow};
use crate::services::quotes::registry::TickerRegistry;
use crate::services::quotes::store::QuoteStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

pub struct QuotesSyncService {
    tickers: Vec<String>,
    provider: Arc<dyn MarketDataProvider>,
    registry: TickerRegistry,
    store: QuoteStore,
}

impl QuotesSyncService {
    pub fn new(app_state: Arc<AppState>) -> Self {
        let provider = app_state.provider.clone();
        let stocks = app_state.postgres_service.repository_stock.clone();
        let quotes = app_state.postgres_service.repository_quote.clone();

        Self {
            tickers: app_state
                .settings
                .app_config
                .quotes_updater
                .tickers
                .clone(),
            registry: TickerRegistry::new(stocks.clone(), provider.clone()),
            store: QuoteStore::new(stocks, quotes),
            provider,
        }
    }

    /// Запускает полную синхронизацию котировок для всех настроенных тикеров.
    ///
    /// Окна загрузки планируются один раз и общие для всех тикеров. Сбой
    /// одного тикера не прерывает остальные; наружу уходит только
    /// недопустимая конфигурация и потеря соединения с базой.
    pub async fn run(
        &self,
        reference: DateTime<Utc>,
        lookback_days: u32,
    ) -> Result<RunSummary, SyncError> {
        // Планирование окон; недопустимый lookback фатален до первого тикера
        let windows = plan_chunks(reference, lookback_days)?;

        info!(
            "Starting quotes sync with {}-day lookback: {} tickers, {} windows per ticker",
            lookback_days,
            self.tickers.len(),
            windows.len()
        );

        let mut summary = RunSummary::default();

        // Обработка каждого тикера последовательно
        for (index, ticker) in self.tickers.iter().enumerate() {
            info!(
                "Processing ticker {}/{}: {}",
                index + 1,
                self.tickers.len(),
                ticker
            );

            match self.sync_ticker(ticker, &windows).await {
                Ok(report) => {
                    if report.is_success() {
                        info!(
                            "{}: Inserted {} quotes, Skipped {} (already present)",
                            report.ticker, report.summary.inserted, report.summary.skipped
                        );
                    }
                    summary.reports.push(report);
                }
                Err(e) => {
                    // Сюда доходит только потеря соединения с хранилищем
                    error!("Aborting run while processing ticker {}: {}", ticker, e);
                    return Err(e);
                }
            }
        }

        info!(
            "Completed quotes sync: {} inserted, {} skipped, {} tickers failed",
            summary.totals().inserted,
            summary.totals().skipped,
            summary.failed_count()
        );

        Ok(summary)
    }

    /// Прогоняет один тикер через resolve -> fetch -> persist.
    /// Возвращает Err только при потере соединения с базой.
    async fn sync_ticker(
        &self,
        ticker: &str,
        windows: &[ChunkWindow],
    ) -> Result<TickerReport, SyncError> {
        let ticker_start = Instant::now();

        // Разрешение тикера во внутреннюю запись
        let stock = match self.registry.resolve(ticker).await {
            Ok(stock) => stock,
            Err(e) if e.is_connection_lost() => return Err(e),
            Err(e) => {
                warn!("Failed to resolve ticker {}: {}", ticker, e);
                return Ok(TickerReport::failed(
                    ticker.to_string(),
                    SyncSummary::default(),
                    e.to_string(),
                ));
            }
        };

        let mut total = SyncSummary::default();

        // Окна идут от старых к новым, чтобы watermark рос монотонно
        for window in windows {
            debug!(
                "Fetching {} from {} to {}",
                stock.ticker,
                window.start.format("%Y-%m-%d %H:%M:%S"),
                window.end.format("%Y-%m-%d %H:%M:%S")
            );

            let bars = match self
                .provider
                .fetch_minute_bars(&stock.ticker, window.start, window.end)
                .await
            {
                Ok(bars) => bars,
                Err(e) => {
                    // Сбой провайдера или пустой период — пропускаем окно,
                    // остальные окна этого тикера продолжаем
                    warn!(
                        "Skipping window {} - {} for {}: {}",
                        window.start.format("%Y-%m-%d"),
                        window.end.format("%Y-%m-%d"),
                        stock.ticker,
                        e
                    );
                    continue;
                }
            };

            if bars.is_empty() {
                debug!("No bars for {} in this window, skipping", stock.ticker);
                continue;
            }

            match self.store.persist_chunk(stock.id, &bars).await {
                Ok(chunk) => total.add(chunk),
                Err(e) if e.is_connection_lost() => return Err(e),
                Err(e) => {
                    // Сбой хранилища фатален для остатка этого тикера,
                    // но не для всего запуска
                    error!("Store failure for {}: {}", stock.ticker, e);
                    return Ok(TickerReport::failed(stock.ticker.clone(), total, e.to_string()));
                }
            }
        }

        debug!(
            "Ticker {} processed in {:.2}ms",
            stock.ticker,
            ticker_start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(TickerReport::succeeded(stock.ticker.clone(), total))
    }
}
