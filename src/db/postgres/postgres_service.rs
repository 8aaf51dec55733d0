use crate::db::postgres::repository::quote_repository::TraitQuoteRepository;
use crate::db::postgres::repository::stock_repository::TraitStockRepository;

use crate::db::postgres::{
    connection::PostgresConnection,
    repository::quote_repository::StructQuoteRepository,
    repository::stock_repository::StructStockRepository,
};
use crate::env_config::models::app_setting::AppSettings;
use std::sync::Arc;
use tracing::{error, info};

pub struct PostgresService {
    // Connection
    pub connection: Arc<PostgresConnection>,

    // Operational repositories (PostgreSQL)
    pub repository_stock: Arc<dyn TraitStockRepository + Send + Sync>,
    pub repository_quote: Arc<dyn TraitQuoteRepository + Send + Sync>,
}

impl PostgresService {
    pub async fn new(settings: &Arc<AppSettings>) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Initializing PostgreSQL service components");

        // Initialize PostgreSQL connection
        info!("Creating PostgreSQL connection");
        let postgres_connection = match PostgresConnection::new(settings.clone()).await {
            Ok(conn) => {
                info!("PostgreSQL connection established successfully");
                Arc::new(conn)
            }
            Err(e) => {
                error!("Failed to establish PostgreSQL connection: {}", e);
                return Err(Box::new(e));
            }
        };

        // Initialize repositories
        info!("Initializing repositories");

        let stock_repository = Arc::new(StructStockRepository::new(postgres_connection.clone()))
            as Arc<dyn TraitStockRepository + Send + Sync>;

        let quote_repository = Arc::new(StructQuoteRepository::new(postgres_connection.clone()))
            as Arc<dyn TraitQuoteRepository + Send + Sync>;

        info!("PostgreSQL service initialized successfully");
        Ok(Self {
            connection: postgres_connection,
            repository_stock: stock_repository,
            repository_quote: quote_repository,
        })
    }
}
