
mod app_state;
mod db;
mod env_config;
mod logger;
mod provider;
mod services;


use app_state::models::AppState;
use chrono::Utc;
use clap::Parser;
use db::postgres::postgres_service::PostgresService;
use env_config::models::{app_config::AppConfig, app_env::AppEnv, app_setting::AppSettings};
use provider::traits::MarketDataProvider;
use provider::yahoo::YahooProvider;
use services::quotes::models::RunSummary;
use services::quotes::sync::QuotesSyncService;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Разовая синхронизация минутных котировок в PostgreSQL
#[derive(Parser, Debug)]
#[command(
    name = "quotes-sync",
    about = "Fetch intraday minute quotes for the configured tickers and store them in PostgreSQL"
)]
struct Cli {
    /// Number of days to look back for quotes (1-28)
    #[arg(short = 'd', long = "days", default_value_t = 28)]
    days: u32,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Инициализация приложения
    let settings: Arc<AppSettings> = Arc::new(initialize_application());

    // Подключение к базе данных
    let postgres_service = initialize_database_connection(settings.clone()).await;

    // Клиент провайдера котировок
    let provider: Arc<dyn MarketDataProvider> = match YahooProvider::new(&settings) {
        Ok(provider) => {
            info!("Market data provider client initialized");
            Arc::new(provider)
        }
        Err(e) => {
            error!("Failed to initialize market data provider: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Создание глобального состояния приложения
    let app_state: Arc<AppState> = Arc::new(AppState::new(
        settings,
        Arc::new(postgres_service),
        provider,
    ));

    // Запуск синхронизации до завершения
    let sync_service = QuotesSyncService::new(app_state);

    match sync_service.run(Utc::now(), cli.days).await {
        Ok(summary) => {
            report_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Fatal error during quotes sync: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Инициализирует настройки и логирование приложения
fn initialize_application() -> AppSettings {
    // Загрузка переменных окружения и конфигурации
    let environment = AppEnv::new();
    let config = AppConfig::new(&environment.env);
    let app_settings = AppSettings {
        app_config: config,
        app_env: environment,
    };

    // Настройка логирования с уровнем и форматом из конфигурации
    logger::init_logger(
        &app_settings.app_config.log.level,
        &app_settings.app_config.log.format,
    )
    .expect("Failed to initialize logger");

    info!("Starting Quotes Sync application...");
    info!("Current environment: {}", app_settings.app_env.env);

    // Добавление подробного логирования в режиме разработки
    if app_settings.app_env.is_local() {
        info!("Running in local development mode");
        debug!("Configuration details: {:#?}", app_settings);
    } else {
        info!("Running in production mode");
    }

    app_settings
}

/// Устанавливает соединение с базой данных
async fn initialize_database_connection(settings: Arc<AppSettings>) -> PostgresService {
    info!("Initializing database connection...");

    match PostgresService::new(&settings).await {
        Ok(service) => {
            info!("PostgreSQL connection established successfully");
            service
        }
        Err(err) => {
            error!("Failed to connect to PostgreSQL: {}", err);
            panic!("Cannot continue without PostgreSQL connection");
        }
    }
}

/// Выводит итоговую сводку по каждому тикеру
fn report_summary(summary: &RunSummary) {
    info!("==================================================");
    info!("Quotes Sync Summary");
    info!("==================================================");

    for report in &summary.reports {
        match &report.failure {
            None => info!(
                "{}: {} inserted, {} skipped",
                report.ticker, report.summary.inserted, report.summary.skipped
            ),
            Some(reason) => error!("{}: FAILED - {}", report.ticker, reason),
        }
    }

    let totals = summary.totals();
    info!("==================================================");
    info!(
        "Total: {} inserted, {} skipped, {} of {} tickers failed",
        totals.inserted,
        totals.skipped,
        summary.failed_count(),
        summary.reports.len()
    );
}
