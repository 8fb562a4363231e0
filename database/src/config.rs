use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

pub struct StoreConfig {
    pub url: String,
    pub pool_size: u32,
}

impl StoreConfig {
    /// Resolution order: explicit CLI argument, then `DATABASE_URL`, then
    /// a yaml-provided url, then an in-memory store.
    pub fn from_cli_or_env_or_yaml(cli_arg: Option<String>, yaml_config: Option<String>) -> Self {
        let url = if let Some(arg) = cli_arg {
            arg
        } else if let Ok(env) = std::env::var("DATABASE_URL") {
            env
        } else if let Some(yaml) = yaml_config {
            yaml
        } else {
            "sqlite::memory:".to_string()
        };

        Self { url, pool_size: 20 }
    }

    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            pool_size: 5,
        }
    }

    pub async fn create_pool(&self) -> Result<SqlitePool, sqlx::Error> {
        if self.url == "sqlite::memory:" {
            return SqlitePoolOptions::new()
                .max_connections(self.pool_size)
                .connect(&self.url)
                .await;
        }
        SqlitePoolOptions::new()
            .max_connections(self.pool_size)
            .connect_with(
                SqliteConnectOptions::new()
                    .filename(&self.url)
                    .create_if_missing(true),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_argument_wins() {
        let config = StoreConfig::from_cli_or_env_or_yaml(
            Some("scores.db".to_string()),
            Some("ignored.db".to_string()),
        );
        assert_eq!(config.url, "scores.db");
    }

    #[test]
    fn test_yaml_used_when_no_cli_or_env() {
        if std::env::var("DATABASE_URL").is_err() {
            let config =
                StoreConfig::from_cli_or_env_or_yaml(None, Some("from_yaml.db".to_string()));
            assert_eq!(config.url, "from_yaml.db");
        }
    }

    #[test]
    fn test_defaults_to_in_memory() {
        if std::env::var("DATABASE_URL").is_err() {
            let config = StoreConfig::from_cli_or_env_or_yaml(None, None);
            assert_eq!(config.url, "sqlite::memory:");
        }
    }
}
