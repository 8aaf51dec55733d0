use thiserror::Error;

/// Errors reported by the market data provider collaborator
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The symbol is unknown to the provider
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The provider returned no result payload for the requested window
    #[error("No data for symbol {symbol}")]
    NoData { symbol: String },

    /// The provider answered with an error payload or an unexpected status
    #[error("Provider error: {message}")]
    Upstream { message: String },

    /// Transport-level failure talking to the provider
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
