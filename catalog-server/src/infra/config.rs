//! Environment-driven runtime configuration.
//!
//! The database URL is assembled from the same variables the service has
//! always used: `DB_USER`, `DB_PASS`, `DB_NAME`, plus either `DB_HOST` (a
//! Unix socket directory, preferred when set) or `DB_HOSTNAME`/`DB_PORT`
//! for TCP.

use std::env;
use std::time::Duration;

use catalog_core::PublishSettings;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub publish: PublishSettings,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub user: String,
    pub password: String,
    pub name: String,
    /// Unix socket directory; takes precedence over TCP when set.
    pub socket: Option<String>,
    pub hostname: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                user: "catalog-service-user".to_string(),
                password: String::new(),
                name: "catalog-service".to_string(),
                socket: None,
                hostname: "127.0.0.1".to_string(),
                port: 5432,
            },
            publish: PublishSettings::default(),
        }
    }
}

impl Config {
    /// Reads configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let database = DatabaseConfig {
            user: env_or("DB_USER", defaults.database.user),
            password: env_or("DB_PASS", defaults.database.password),
            name: env_or("DB_NAME", defaults.database.name),
            socket: env::var("DB_HOST").ok().filter(|s| !s.is_empty()),
            hostname: env_or("DB_HOSTNAME", defaults.database.hostname),
            port: env_parsed("DB_PORT", defaults.database.port),
        };

        let publish = PublishSettings {
            work_delay: Duration::from_millis(env_parsed(
                "PUBLISH_WORK_DELAY_MS",
                defaults.publish.work_delay.as_millis() as u64,
            )),
            job_timeout: Duration::from_secs(env_parsed(
                "PUBLISH_JOB_TIMEOUT_SECS",
                defaults.publish.job_timeout.as_secs(),
            )),
            max_in_flight: env_parsed(
                "PUBLISH_MAX_IN_FLIGHT",
                defaults.publish.max_in_flight,
            ),
        };

        Self {
            server: ServerConfig {
                host: env_or("SERVER_HOST", defaults.server.host),
                port: env_parsed("SERVER_PORT", defaults.server.port),
            },
            database,
            publish,
        }
    }
}

impl DatabaseConfig {
    /// Postgres connection URL. Unix socket form when `socket` is set
    /// (Cloud SQL style), TCP otherwise.
    pub fn url(&self) -> String {
        match &self.socket {
            Some(socket) => format!(
                "postgres://{}:{}@/{}?host={}",
                self.user, self.password, self.name, socket
            ),
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.user, self.password, self.hostname, self.port, self.name
            ),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    env::var(key).unwrap_or(default)
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
