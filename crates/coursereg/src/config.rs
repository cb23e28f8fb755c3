/// Server configuration, read from the environment
use std::path::PathBuf;
use thiserror::Error;

pub const DB_PATH_VAR: &str = "COURSEREG_DB_PATH";
pub const TERM_VAR: &str = "COURSEREG_TERM";
pub const ADDRESS_VAR: &str = "COURSEREG_ADDRESS";
pub const PORT_VAR: &str = "COURSEREG_PORT";
pub const SEED_FILE_VAR: &str = "COURSEREG_SEED_FILE";

const DEFAULT_TERM: &str = "fall2025";
const DEFAULT_ADDRESS: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set. Nothing can be served without it.
    #[error("Please define the {name} environment variable")]
    Missing { name: &'static str },

    #[error("Invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// SQLite file holding the course catalogue
    pub db_path: PathBuf,
    /// Term (collection) whose courses are listed
    pub term: String,
    pub address: String,
    pub port: u16,
    /// JSON course documents imported when the term has no data yet
    pub seed_file: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source. Empty values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let db_path = get(DB_PATH_VAR)
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing { name: DB_PATH_VAR })?;

        let port = match get(PORT_VAR) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: PORT_VAR,
                message: format!("{raw:?} ({e})"),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            db_path,
            term: get(TERM_VAR).unwrap_or_else(|| DEFAULT_TERM.to_string()),
            address: get(ADDRESS_VAR).unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
            port,
            seed_file: get(SEED_FILE_VAR).map(PathBuf::from),
        })
    }
}
