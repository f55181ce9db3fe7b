use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "tracker.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    FSError(#[from] std::io::Error),
    #[error(transparent)]
    SerdeError(#[from] toml::de::Error),
    #[error("invalid listen address `{0}`")]
    ListenAddr(String),
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://tracker.db".to_string(),
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    /// Every connection to an in-memory SQLite database opens a fresh, empty
    /// database, so these URLs must be served by a single connection.
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_hosts: Vec<String>,
    pub database: DatabaseConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            cors_hosts: Vec::new(),
            database: DatabaseConfig::default(),
        }
    }
}

impl Config {
    /// Loads the configuration file, then applies `DATABASE_URL` and
    /// `LISTEN_ADDR` from the environment.
    ///
    /// Without an explicit path, `tracker.toml` is read when it exists and the
    /// built-in defaults are used otherwise.
    pub fn parse(path: Option<&Path>) -> Result<Self, ConfigError> {
        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None if default_path.exists() => Self::from_file(default_path)?,
            None => Self::default(),
        };

        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config_text = fs::read_to_string(path)?;

        Ok(toml::from_str(config_text.as_str())?)
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(addr) = lookup("LISTEN_ADDR") {
            self.listen_addr = addr;
        }

        self
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listen_addr
            .parse()
            .map_err(|_| ConfigError::ListenAddr(self.listen_addr.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.listen_addr, "0.0.0.0:3000");
        assert!(config.cors_hosts.is_empty());
        assert_eq!(config.database.max_connections, 5);
        assert!(!config.database.is_in_memory());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
cors_hosts = ["http://localhost:5173"]

[database]
url = "sqlite::memory:"
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();

        assert_eq!(config.listen_addr, "0.0.0.0:3000");
        assert_eq!(config.cors_hosts, vec!["http://localhost:5173".to_string()]);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.database.max_connections, 5);
        assert!(config.database.is_in_memory());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        let path = dir.path().join("absent.toml");

        let result = Config::parse(Some(path.as_path()));

        assert!(matches!(result, Err(ConfigError::FSError(_))));
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "listen_addr = ").unwrap();

        assert!(matches!(
            Config::from_file(file.path()),
            Err(ConfigError::SerdeError(_))
        ));
    }

    #[test]
    fn test_environment_overrides() {
        let config = Config::default().with_overrides(|key| match key {
            "DATABASE_URL" => Some("sqlite://other.db".to_string()),
            _ => None,
        });

        assert_eq!(config.database.url, "sqlite://other.db");
        assert_eq!(config.listen_addr, "0.0.0.0:3000");

        let config = Config::default().with_overrides(|key| match key {
            "LISTEN_ADDR" => Some("127.0.0.1:8080".to_string()),
            _ => None,
        });

        assert_eq!(config.listen_addr, "127.0.0.1:8080");
        assert_eq!(config.socket_addr().unwrap().port(), 8080);
        assert_eq!(config.database.url, "sqlite://tracker.db");
    }

    // The only test that changes the working directory.
    #[test]
    fn test_parse_reads_default_path() {
        let dir = tempfile::tempdir().unwrap();
        let previous = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();

        let without_file = Config::parse(None);
        fs::write(
            DEFAULT_CONFIG_PATH,
            "cors_hosts = [\"http://localhost:5173\"]\n\n[database]\nmax_connections = 2\n",
        )
        .unwrap();
        let with_file = Config::parse(None);

        std::env::set_current_dir(previous).unwrap();

        let without_file = without_file.unwrap();
        assert!(without_file.cors_hosts.is_empty());
        assert_eq!(without_file.database.max_connections, 5);

        let with_file = with_file.unwrap();
        assert_eq!(with_file.cors_hosts, vec!["http://localhost:5173".to_string()]);
        assert_eq!(with_file.database.max_connections, 2);
    }

    #[test]
    fn test_socket_addr() {
        let mut config = Config::default();
        assert_eq!(config.socket_addr().unwrap().port(), 3000);

        config.listen_addr = "localhost".to_string();
        assert!(matches!(
            config.socket_addr(),
            Err(ConfigError::ListenAddr(_))
        ));
    }
}
