use crate::db::postgres::connection::PostgresConnection;
use crate::db::postgres::models::quote::Quote;
use async_trait::async_trait;
use sqlx::types::chrono::{DateTime, Utc};
use sqlx::Error as SqlxError;
use std::sync::Arc;
use tracing::{debug, error};

/// Outcome of a quote insert attempt. The unique(stock, timestamp) constraint
/// turns a duplicate insert into AlreadyExists instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteInsert {
    Inserted,
    AlreadyExists,
}

#[async_trait]
pub trait TraitQuoteRepository {
    /// Looks up a quote by its (stock, timestamp) key
    async fn find(
        &self,
        stock_id: i32,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<Quote>, SqlxError>;

    /// Inserts one quote. A conflict on the (stock, timestamp) unique key is
    /// reported as QuoteInsert::AlreadyExists, not as an error.
    async fn insert(
        &self,
        stock_id: i32,
        price: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<QuoteInsert, SqlxError>;
}

pub struct StructQuoteRepository {
    connection: Arc<PostgresConnection>,
}

impl StructQuoteRepository {
    pub fn new(connection: Arc<PostgresConnection>) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl TraitQuoteRepository for StructQuoteRepository {
    async fn find(
        &self,
        stock_id: i32,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<Quote>, SqlxError> {
        let pool = self.connection.get_pool();

        let result = sqlx::query_as::<_, Quote>(
            r#"SELECT id, stock, price, "timestamp"
               FROM quotes
               WHERE stock = $1 AND "timestamp" = $2"#,
        )
        .bind(stock_id)
        .bind(timestamp)
        .fetch_optional(pool)
        .await;

        if let Err(e) = &result {
            error!(
                "Error checking quote existence for stock_id {} at {}: {}",
                stock_id, timestamp, e
            );
        }

        result
    }

    async fn insert(
        &self,
        stock_id: i32,
        price: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<QuoteInsert, SqlxError> {
        let pool = self.connection.get_pool();

        let result = sqlx::query(
            r#"INSERT INTO quotes (stock, price, "timestamp")
               VALUES ($1, $2, $3)
               ON CONFLICT (stock, "timestamp") DO NOTHING"#,
        )
        .bind(stock_id)
        .bind(price)
        .bind(timestamp)
        .execute(pool)
        .await;

        match result {
            Ok(pg_result) => {
                if pg_result.rows_affected() > 0 {
                    Ok(QuoteInsert::Inserted)
                } else {
                    debug!(
                        "Quote for stock_id {} at {} already present, skipping",
                        stock_id, timestamp
                    );
                    Ok(QuoteInsert::AlreadyExists)
                }
            }
            Err(e) => {
                error!(
                    "Error inserting quote for stock_id {} at {}: {}",
                    stock_id, timestamp, e
                );
                Err(e)
            }
        }
    }
}
