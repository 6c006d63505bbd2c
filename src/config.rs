//! Configuration handling for the application.

use clap::Parser;

/// Default base URL of the Figma REST API.
pub const DEFAULT_FIGMA_API_URL: &str = "https://api.figma.com";

/// REST service storing Figma files and their nodes.
#[derive(Parser, Debug, Clone)]
#[command(name = "figma-store")]
#[command(about = "REST service storing Figma files and their nodes in SQLite")]
pub struct Config {
    /// Server listen address (host or IP)
    #[arg(long, env = "LISTEN_ADDR", default_value = "127.0.0.1")]
    pub listen_addr: String,

    /// Server listen port
    #[arg(long, env = "LISTEN_PORT", default_value_t = 8000)]
    pub listen_port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Path to the SQLite database file
    #[arg(long, env = "DB_PATH", default_value = "figma-store.db")]
    pub db_path: String,

    /// Figma personal access token, required for syncing files
    #[arg(long, env = "FIGMA_TOKEN")]
    pub figma_token: Option<String>,

    /// Base URL of the Figma REST API
    #[arg(long, env = "FIGMA_API_URL", default_value = DEFAULT_FIGMA_API_URL)]
    pub figma_api_url: String,
}

impl Config {
    /// SQLite connection URL for `db_path`, creating the file if missing.
    pub fn database_url(&self) -> String {
        sqlite_url(&self.db_path)
    }

    /// `host:port` the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.listen_addr, self.listen_port)
    }
}

/// Build a read-write-create SQLite URL for a database file path.
pub fn sqlite_url(db_path: &str) -> String {
    format!("sqlite:{}?mode=rwc", db_path)
}

/// Create the parent directory of a database file if it does not exist.
pub fn ensure_db_dir(db_path: &str) -> std::io::Result<()> {
    let db_path = std::path::Path::new(db_path);
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse_from(["figma-store"]);
        assert_eq!(config.bind_addr(), "127.0.0.1:8000");
        assert_eq!(config.database_url(), "sqlite:figma-store.db?mode=rwc");
        assert_eq!(config.figma_api_url, DEFAULT_FIGMA_API_URL);
    }

    #[test]
    fn test_overrides() {
        let config = Config::parse_from([
            "figma-store",
            "--listen-port",
            "9100",
            "--db-path",
            "/tmp/x.db",
            "--figma-token",
            "tok",
        ]);
        assert_eq!(config.bind_addr(), "127.0.0.1:9100");
        assert_eq!(config.database_url(), "sqlite:/tmp/x.db?mode=rwc");
        assert_eq!(config.figma_token.as_deref(), Some("tok"));
    }
}
