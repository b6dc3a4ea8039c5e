use std::net::SocketAddr;

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl DbConfig {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_owned(),
            max_connections: env_or("DB_POOL_MAX", 10),
            acquire_timeout_secs: env_or("DB_ACQUIRE_TIMEOUT", 3),
        }
    }

    /// `None` when `DATABASE_URL` is unset or empty.
    pub fn from_env() -> Option<Self> {
        std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(|url| Self::new(&url))
    }
}

/// Process configuration, read from the environment (and `.env` when the
/// binaries load it first). Unparseable values fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database: Option<DbConfig>,
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database: DbConfig::from_env(),
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_owned()),
            port: env_or("PORT", 5000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_owned()),
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn socket_addr_joins_host_and_port() {
        let config = Config {
            database: None,
            host: "0.0.0.0".to_owned(),
            port: 8080,
            log_level: "info".to_owned(),
        };
        assert_eq!(config.socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn bad_hosts_are_reported() {
        let config = Config {
            database: None,
            host: "not a host".to_owned(),
            port: 1,
            log_level: "info".to_owned(),
        };
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn db_config_keeps_url() {
        let config = DbConfig::new("postgres://localhost/cocktails");
        assert_eq!(config.url, "postgres://localhost/cocktails");
        assert!(config.max_connections >= 1);
    }
}
