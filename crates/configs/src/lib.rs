use anyhow::Result;
use anyhow::anyhow;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub datasource: DataSourceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_acquire_timeout() -> u64 { 30 }

/// Which data source(s) the menu service reads from. Fixed at startup,
/// never reloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Read-only JSON snapshot only.
    FileOnly,
    /// Embedded database only.
    #[default]
    DbOnly,
    /// Database results first, then file results.
    Combined,
}

impl std::str::FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "file_only" | "file" => Ok(Strategy::FileOnly),
            "db_only" | "db" => Ok(Strategy::DbOnly),
            "combined" | "both" => Ok(Strategy::Combined),
            other => Err(anyhow!("unknown datasource strategy: {other}")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataSourceConfig {
    #[serde(default)]
    pub strategy: Strategy,
    /// Permanent read-only snapshot served by the file adapter.
    #[serde(default = "default_snapshot_file")]
    pub snapshot_file: String,
    /// Seeds the database once at startup when the store is empty.
    #[serde(default = "default_seed_file")]
    pub seed_file: String,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            snapshot_file: default_snapshot_file(),
            seed_file: default_seed_file(),
        }
    }
}

fn default_snapshot_file() -> String { "data/restaurants.json".into() }
fn default_seed_file() -> String { "data/restaurants-seed.json".into() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load config.toml (or an empty default when absent), apply env
    /// overrides and validate. Only a missing file falls back to the
    /// defaults; an unreadable or malformed file fails startup.
    pub fn load_and_validate() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let mut cfg = match std::fs::read_to_string(&path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| anyhow!("invalid config {path}: {e}"))?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
            Err(e) => return Err(anyhow!("cannot read config {path}: {e}")),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.datasource.normalize_from_env()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if self.worker_threads.unwrap_or(0) == 0 {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// Fill the URL from DATABASE_URL when the TOML left it empty; fall
    /// back to the bundled embedded database.
    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
        if self.url.trim().is_empty() {
            self.url = "sqlite://data/menu.db?mode=rwc".to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.url.to_lowercase().starts_with("sqlite:") {
            return Err(anyhow!("database.url must be a sqlite:// URL"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database.acquire_timeout_secs must be a positive number of seconds"));
        }
        Ok(())
    }
}

impl DataSourceConfig {
    /// DATASOURCE_STRATEGY overrides the TOML value.
    pub fn normalize_from_env(&mut self) -> Result<()> {
        if let Ok(raw) = std::env::var("DATASOURCE_STRATEGY") {
            self.strategy = raw.parse()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_defaults_to_db_only() {
        let cfg = DataSourceConfig::default();
        assert_eq!(cfg.strategy, Strategy::DbOnly);
    }

    #[test]
    fn strategy_parses_all_variants() {
        assert_eq!("file_only".parse::<Strategy>().unwrap(), Strategy::FileOnly);
        assert_eq!("DB_ONLY".parse::<Strategy>().unwrap(), Strategy::DbOnly);
        assert_eq!("both".parse::<Strategy>().unwrap(), Strategy::Combined);
        assert!("h2".parse::<Strategy>().is_err());
    }

    #[test]
    fn toml_round_trip() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9090

            [datasource]
            strategy = "combined"
            snapshot_file = "data/menu-snapshot.json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.datasource.strategy, Strategy::Combined);
        assert_eq!(cfg.datasource.snapshot_file, "data/menu-snapshot.json");
        assert_eq!(cfg.datasource.seed_file, "data/restaurants-seed.json");
    }

    #[test]
    fn load_and_validate_rejects_malformed_file_but_defaults_when_absent() {
        // A present-but-invalid file must fail startup, not silently
        // fall back to the defaults.
        let dir = std::env::temp_dir().join(format!("configs_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let bad = dir.join("bad-config.toml");
        std::fs::write(&bad, "[datasource]\nstrategy = \"h2\"\n").unwrap();
        std::env::set_var("CONFIG_PATH", &bad);
        let err = AppConfig::load_and_validate().unwrap_err();
        assert!(err.to_string().contains("invalid config"));

        // An absent file keeps the defaults.
        std::env::set_var("CONFIG_PATH", dir.join("no-such-config.toml"));
        let cfg = AppConfig::load_and_validate().unwrap();
        assert_eq!(cfg.datasource.strategy, Strategy::DbOnly);

        std::env::remove_var("CONFIG_PATH");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn database_validation_rejects_non_sqlite() {
        let cfg = DatabaseConfig { url: "postgres://x/y".into(), ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn database_validation_rejects_bad_pool_sizes() {
        let cfg = DatabaseConfig {
            url: "sqlite::memory:".into(),
            max_connections: 1,
            min_connections: 5,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
