use crate::db::postgres::connection::PostgresConnection;
use crate::db::postgres::models::stock::Stock;
use async_trait::async_trait;
use sqlx::types::chrono::{DateTime, Utc};
use sqlx::Error as SqlxError;
use std::sync::Arc;
use tracing::{debug, error, info};

#[async_trait]
pub trait TraitStockRepository {
    /// Looks up a stock record by its ticker symbol
    async fn find_by_ticker(&self, ticker: &str) -> Result<Option<Stock>, SqlxError>;

    /// Inserts a new stock record with a null watermark.
    /// Returns None when a concurrent insert already created the row (unique ticker).
    async fn insert(&self, ticker: &str) -> Result<Option<i32>, SqlxError>;

    /// Advances the watermark for a stock. The value is only written when it is
    /// strictly greater than the stored one, so the watermark never regresses.
    /// Returns true when a row was actually updated.
    async fn update_last_update(
        &self,
        stock_id: i32,
        timestamp: DateTime<Utc>,
    ) -> Result<bool, SqlxError>;
}

pub struct StructStockRepository {
    connection: Arc<PostgresConnection>,
}

impl StructStockRepository {
    pub fn new(connection: Arc<PostgresConnection>) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl TraitStockRepository for StructStockRepository {
    async fn find_by_ticker(&self, ticker: &str) -> Result<Option<Stock>, SqlxError> {
        let pool = self.connection.get_pool();

        debug!("Fetching stock for ticker: {}", ticker);

        let result = sqlx::query_as::<_, Stock>(
            r#"SELECT id, ticker, "lastUpdate"
               FROM stocks
               WHERE ticker = $1"#,
        )
        .bind(ticker)
        .fetch_optional(pool)
        .await;

        match &result {
            Ok(Some(stock)) => debug!("Found stock for ticker {}: id={}", ticker, stock.id),
            Ok(None) => debug!("No stock found for ticker: {}", ticker),
            Err(e) => error!("Error fetching stock for ticker {}: {}", ticker, e),
        }

        result
    }

    async fn insert(&self, ticker: &str) -> Result<Option<i32>, SqlxError> {
        let pool = self.connection.get_pool();

        debug!("Inserting stock record for ticker: {}", ticker);

        let result = sqlx::query_scalar::<_, i32>(
            "INSERT INTO stocks (ticker)
             VALUES ($1)
             ON CONFLICT (ticker) DO NOTHING
             RETURNING id",
        )
        .bind(ticker)
        .fetch_optional(pool)
        .await;

        match &result {
            Ok(Some(id)) => info!("Inserted new stock record for ticker {} with id {}", ticker, id),
            Ok(None) => debug!("Stock record for ticker {} already exists", ticker),
            Err(e) => error!("Error inserting stock for ticker {}: {}", ticker, e),
        }

        result
    }

    async fn update_last_update(
        &self,
        stock_id: i32,
        timestamp: DateTime<Utc>,
    ) -> Result<bool, SqlxError> {
        let pool = self.connection.get_pool();

        debug!(
            "Updating lastUpdate for stock_id: {}, new value: {}",
            stock_id, timestamp
        );

        let result = sqlx::query(
            r#"UPDATE stocks
               SET "lastUpdate" = $2
               WHERE id = $1
                 AND ("lastUpdate" IS NULL OR "lastUpdate" < $2)"#,
        )
        .bind(stock_id)
        .bind(timestamp)
        .execute(pool)
        .await;

        match result {
            Ok(pg_result) => {
                let updated = pg_result.rows_affected() > 0;
                if updated {
                    debug!("Updated lastUpdate for stock_id: {}", stock_id);
                } else {
                    debug!(
                        "lastUpdate for stock_id {} already at or past {}, not updated",
                        stock_id, timestamp
                    );
                }
                Ok(updated)
            }
            Err(e) => {
                error!("Error updating lastUpdate for stock_id {}: {}", stock_id, e);
                Err(e)
            }
        }
    }
}
