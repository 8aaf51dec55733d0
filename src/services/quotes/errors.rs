use crate::provider::errors::ProviderError;
use thiserror::Error;

/// Ошибки конвейера синхронизации котировок
#[derive(Error, Debug)]
pub enum SyncError {
    /// Недопустимый горизонт загрузки; фатально для всего запуска
    #[error("Lookback days must be between 1 and 28, got {0}")]
    InvalidConfiguration(u32),

    /// Символ не зарегистрирован и не подтвержден провайдером; фатально только для этого тикера
    #[error("Unknown ticker: {0}")]
    UnknownTicker(String),

    /// Сбой запроса к провайдеру; окно или тикер пропускаются
    #[error("Provider request failed: {0}")]
    Provider(#[from] ProviderError),

    /// Сбой операции с хранилищем
    #[error("Store operation failed: {0}")]
    Store(#[from] sqlx::Error),
}

impl SyncError {
    /// True when the underlying store connection is unusable and the whole
    /// run has to stop instead of moving on to the next ticker.
    pub fn is_connection_lost(&self) -> bool {
        match self {
            SyncError::Store(e) => matches!(
                e,
                sqlx::Error::Io(_)
                    | sqlx::Error::Tls(_)
                    | sqlx::Error::Protocol(_)
                    | sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
            ),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_closed_is_connection_lost() {
        assert!(SyncError::Store(sqlx::Error::PoolClosed).is_connection_lost());
        assert!(SyncError::Store(sqlx::Error::PoolTimedOut).is_connection_lost());
    }

    #[test]
    fn test_row_level_store_error_is_not_connection_lost() {
        assert!(!SyncError::Store(sqlx::Error::RowNotFound).is_connection_lost());
    }

    #[test]
    fn test_non_store_errors_are_not_connection_lost() {
        assert!(!SyncError::UnknownTicker("ZZZZ".to_string()).is_connection_lost());
        assert!(!SyncError::InvalidConfiguration(0).is_connection_lost());
    }
}
