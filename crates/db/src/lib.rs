use std::fmt;

use sqlx::{
    Error, Pool, Postgres,
    postgres::{PgConnectOptions, PgPoolOptions},
};

pub mod models;

const DEFAULT_DB_NAME: &str = "postgres";
const DEFAULT_DB_USER: &str = "postgres";
const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Channel the user/project triggers publish on; the payload is the table name
pub const REGISTRY_NOTIFY_CHANNEL: &str = "registry_event";

/// Connection options for the intake database.
///
/// Every field comes from a named environment variable so that no host or
/// credential is compiled into the binary.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub name: String,
    pub user: String,
    pub password: Option<String>,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        let name = std::env::var("INTAKE_DB_NAME").unwrap_or_else(|_| DEFAULT_DB_NAME.to_string());
        let user = std::env::var("INTAKE_DB_USER").unwrap_or_else(|_| DEFAULT_DB_USER.to_string());
        let password = std::env::var("INTAKE_DB_PASSWORD")
            .ok()
            .filter(|p| !p.is_empty());
        let host = std::env::var("INTAKE_DB_HOST").unwrap_or_else(|_| DEFAULT_DB_HOST.to_string());
        let port = std::env::var("INTAKE_DB_PORT")
            .ok()
            .and_then(|p| p.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_DB_PORT);
        let max_connections = std::env::var("INTAKE_DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        Self {
            name,
            user,
            password,
            host,
            port,
            max_connections,
        }
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.name);

        match &self.password {
            Some(password) => options.password(password),
            None => options,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_DB_NAME.to_string(),
            user: DEFAULT_DB_USER.to_string(),
            password: None,
            host: DEFAULT_DB_HOST.to_string(),
            port: DEFAULT_DB_PORT,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

// Keeps the password out of logs.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

#[derive(Clone)]
pub struct DBService {
    pub pool: Pool<Postgres>,
}

impl DBService {
    /// Connect to PostgreSQL and run the embedded migrations
    pub async fn new(config: &DatabaseConfig) -> Result<DBService, Error> {
        tracing::debug!(
            "Connecting to postgres at {}:{} (database {})",
            config.host,
            config.port,
            config.name
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(config.connect_options())
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(DBService { pool })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DatabaseConfig::default();
        assert_eq!(config.name, "postgres");
        assert_eq!(config.user, "postgres");
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5432);
        assert!(config.password.is_none());
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = DatabaseConfig {
            password: Some("hunter2".to_string()),
            ..DatabaseConfig::default()
        };

        let printed = format!("{:?}", config);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("***"));
    }

    #[test]
    fn test_triggers_publish_on_registry_channel() {
        let migration = include_str!("../migrations/20240301000100_registry_notify.sql");
        assert!(migration.contains(&format!("pg_notify('{}'", REGISTRY_NOTIFY_CHANNEL)));
    }

    #[test]
    fn test_connect_options_carry_fields() {
        let config = DatabaseConfig {
            name: "intake".to_string(),
            user: "intake_user".to_string(),
            password: None,
            host: "db.internal".to_string(),
            port: 6543,
            max_connections: 2,
        };

        let options = config.connect_options();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "intake_user");
        assert_eq!(options.get_database(), Some("intake"));
    }
}
