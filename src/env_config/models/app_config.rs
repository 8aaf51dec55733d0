use serde::Deserialize;
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub log: LogConfig,
    pub postgres: PostgresConfig,
    pub provider: ProviderConfig,
    pub quotes_updater: QuotesUpdaterConfig,

}
#[derive(Debug, Deserialize)]
pub struct QuotesUpdaterConfig {
    /// Статический список тикеров для синхронизации
    pub tickers: Vec<String>,
}
#[derive(Debug, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout: u64,
    pub user_agent: String,
}
#[derive(Debug, Deserialize)]
pub struct PostgresConfig {
    pub timeout: u64,
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime: u64,
    pub idle_timeout: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parses_from_toml() {
        let raw = r#"
            [log]
            level = "info"
            format = "plain"

            [postgres]
            timeout = 5
            max_connections = 5
            min_connections = 1
            max_lifetime = 1800
            idle_timeout = 600

            [provider]
            base_url = "https://query1.finance.yahoo.com"
            timeout = 10
            user_agent = "Mozilla/5.0"

            [quotes_updater]
            tickers = ["AAPL", "MSFT"]
        "#;

        let config: AppConfig = toml::from_str(raw).expect("config must parse");
        assert_eq!(config.log.level, "info");
        assert_eq!(config.postgres.max_connections, 5);
        assert_eq!(config.quotes_updater.tickers, vec!["AAPL", "MSFT"]);
    }
}
