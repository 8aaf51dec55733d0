use sqlx::types::chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Represents a row in the quotes table: one minute-bar price point
#[derive(Debug, Clone, FromRow)]
pub struct Quote {
    pub id: i64,

    /// Owning stocks.id
    pub stock: i32,

    /// Price as text with exactly two fractional digits (schema: price varchar)
    pub price: String,

    pub timestamp: DateTime<Utc>,
}
