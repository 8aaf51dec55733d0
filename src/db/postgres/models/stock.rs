use sqlx::types::chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Represents a row in the stocks table
#[derive(Debug, Clone, FromRow)]
pub struct Stock {
    /// Surrogate identity assigned by the store on first registration
    pub id: i32,

    /// Ticker symbol, unique and case-normalized
    pub ticker: String,

    /// Watermark: timestamp of the most recent synchronized quote, null until the first sync
    #[sqlx(rename = "lastUpdate")]
    pub last_update: Option<DateTime<Utc>>,
}
