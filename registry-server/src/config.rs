//! Server configuration - flags with environment fallbacks
//!
//! Every option can be given as a flag or through its environment
//! variable. `.env` files are loaded first (see [`load_dotenv`]) and never
//! override variables that are already set.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::{debug, info};

use crate::db::{DbConfig, UniqueKeys};
use crate::http::ServerConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "student-registry", version, about = "Student registration HTTP server")]
pub struct Config {
    /// MySQL host
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,

    /// MySQL port
    #[arg(long, env = "DB_PORT", default_value_t = 3306)]
    pub db_port: u16,

    /// MySQL user
    #[arg(long, env = "DB_USER", default_value = "root")]
    pub db_user: String,

    /// MySQL password
    #[arg(long, env = "DB_PASSWORD", default_value = "", hide_env_values = true)]
    pub db_password: String,

    /// Database holding the registrations table
    #[arg(long, env = "DB_NAME", default_value = "student_db")]
    pub db_name: String,

    /// Upper bound on pooled connections
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 10)]
    pub db_max_connections: u32,

    /// Seconds a request waits for a free connection
    #[arg(long, env = "DB_ACQUIRE_TIMEOUT_SECS", default_value_t = 30)]
    pub db_acquire_timeout_secs: u64,

    /// Do not create the registrations table at startup
    #[arg(long = "skip-schema", env = "DB_SKIP_SCHEMA")]
    pub skip_schema: bool,

    /// Unique constraints: `,` between constraints, `+` inside a composite one
    #[arg(long, env = "REGISTRATION_UNIQUE_KEYS", default_value = "student_id,email")]
    pub unique_keys: UniqueKeys,

    /// Address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to bind the HTTP server to
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Directory served for `/` and static assets
    #[arg(long, env = "PUBLIC_DIR", default_value = "public")]
    pub public_dir: PathBuf,

    /// Enable debug logging (unless RUST_LOG is set)
    #[arg(long)]
    pub debug: bool,
}

impl Config {
    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            database: self.db_name.clone(),
            max_connections: self.db_max_connections,
            acquire_timeout: Duration::from_secs(self.db_acquire_timeout_secs),
            unique_keys: self.unique_keys.clone(),
        }
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: SocketAddr::new(self.host, self.port),
            public_dir: self.public_dir.clone(),
        }
    }
}

/// Load environment variables from `.env` in the current directory, if any.
///
/// Runs before tracing is initialised, so the outcome is returned for
/// [`log_dotenv`] to report once logging is up.
pub fn load_dotenv() -> Result<PathBuf, dotenvy::Error> {
    dotenvy::dotenv()
}

pub fn log_dotenv(loaded: &Result<PathBuf, dotenvy::Error>) {
    match loaded {
        Ok(path) => info!("Loaded configuration from {}", path.display()),
        Err(e) => debug!("No .env file loaded: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "student-registry",
            "--db-host",
            "db.internal",
            "--port",
            "8080",
            "--unique-keys",
            "student_id+email",
            "--skip-schema",
        ])
        .expect("flags should parse");

        assert_eq!(config.db_host, "db.internal");
        assert_eq!(config.server_config().bind_addr.port(), 8080);
        assert!(config.skip_schema);

        let db = config.db_config();
        assert_eq!(db.unique_keys.constraints(), &[vec!["student_id", "email"]]);
    }

    #[test]
    fn invalid_unique_keys_are_rejected() {
        let result = Config::try_parse_from(["student-registry", "--unique-keys", "password"]);
        assert!(result.is_err());
    }
}
