use super::models::{app_config::AppConfig, app_env::Env};
use std::fs;

impl AppConfig {
    pub fn new(env: &Env) -> AppConfig {
        let path = format!("config/{}.toml", env);

        let content = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read config file {}: {}", path, e));

        toml::from_str(&content)
            .unwrap_or_else(|e| panic!("Failed to parse config file {}: {}", path, e))
    }
}
