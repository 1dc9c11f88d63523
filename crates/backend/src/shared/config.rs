use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Dashboard sessions untouched for this long are dropped
    #[serde(default = "default_session_idle_minutes")]
    pub session_idle_minutes: i64,
}

fn default_session_idle_minutes() -> i64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            session_idle_minutes: default_session_idle_minutes(),
        }
    }
}

/// Where the fact table comes from
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    #[default]
    Generated,
    Csv,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    #[serde(default)]
    pub source: DataSourceKind,
    #[serde(default = "default_seed")]
    pub seed: u64,
    pub csv_path: Option<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: DataSourceKind::Generated,
            seed: default_seed(),
            csv_path: None,
        }
    }
}

fn default_seed() -> u64 {
    42
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: "target/logs".to_string(),
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000
session_idle_minutes = 30

[data]
source = "generated"
seed = 42

[logging]
dir = "target/logs"
"#;

/// Environment variable with an explicit path to the config file
pub const CONFIG_ENV_VAR: &str = "SALES_DASHBOARD_CONFIG";

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Path from `SALES_DASHBOARD_CONFIG`
/// 2. Next to the executable (for production)
/// 3. Current working directory
/// 4. Falls back to embedded default config
///
/// Runs before the tracing subscriber exists, so the chosen origin is returned
/// alongside the config for the caller to log.
pub fn load_config() -> anyhow::Result<(Config, String)> {
    if let Ok(explicit) = std::env::var(CONFIG_ENV_VAR) {
        let config = read_config(Path::new(&explicit))?;
        return Ok((config, explicit));
    }

    for candidate in candidate_paths() {
        if candidate.exists() {
            let config = read_config(&candidate)?;
            return Ok((config, candidate.display().to_string()));
        }
    }

    let config = parse_config(DEFAULT_CONFIG)?;
    Ok((config, "embedded default".to_string()))
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            paths.push(exe_dir.join("config.toml"));
        }
    }
    paths.push(PathBuf::from("config.toml"));
    paths
}

fn read_config(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("cannot read config {}: {e}", path.display()))?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    if config.data.source == DataSourceKind::Csv && config.data.csv_path.is_none() {
        anyhow::bail!("data.source = \"csv\" requires data.csv_path");
    }
    Ok(config)
}

/// Resolve a configured path.
/// Relative paths are resolved against the executable directory when the file
/// exists there, otherwise against the current directory.
pub fn resolve_path(configured: &str) -> PathBuf {
    let path = Path::new(configured);

    if path.is_absolute() {
        return path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let resolved_path = exe_dir.join(path);
            if resolved_path.exists() {
                return resolved_path;
            }
        }
    }

    PathBuf::from(configured)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.data.source, DataSourceKind::Generated);
        assert_eq!(config.data.seed, 42);
        assert_eq!(config.logging.dir, "target/logs");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = parse_config("[data]\nseed = 7\n").unwrap();
        assert_eq!(config.data.seed, 7);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.session_idle_minutes, 30);

        let config = parse_config("[server]\nhost = \"127.0.0.1\"\nport = 8080\n").unwrap();
        assert_eq!(config.server.session_idle_minutes, 30);
    }

    #[test]
    fn test_csv_source_requires_path() {
        assert!(parse_config("[data]\nsource = \"csv\"\n").is_err());
        let config = parse_config("[data]\nsource = \"csv\"\ncsv_path = \"sales.csv\"\n").unwrap();
        assert_eq!(config.data.csv_path.as_deref(), Some("sales.csv"));
    }

    #[test]
    fn test_absolute_path_kept() {
        let abs = if cfg!(windows) { "C:\\data\\sales.csv" } else { "/data/sales.csv" };
        assert_eq!(resolve_path(abs), PathBuf::from(abs));
    }
}
