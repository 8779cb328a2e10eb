//! Runtime configuration, read from TOML.
//!
//! ```toml
//! database = "~/dictionaries/cedict.db"
//! page-size = 50
//! log-filter = "zhdict=debug"
//! ```

use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// SQLite dictionary; a leading `~` is expanded.
    pub database: PathBuf,
    /// Entries per page for new queries.
    pub page_size: u32,
    /// `tracing` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            page_size: DEFAULT_PAGE_SIZE,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config at {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        ensure!(config.page_size > 0, "page-size must be greater than zero");
        config.database = expand_tilde(&config.database);
        Ok(config)
    }
}

fn default_database() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("zhdict")
        .join("cedict.db")
}

/// Expand a leading `~` to the home directory; other paths are unchanged.
fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        check!(config == Config::default());
        check!(config.page_size == 50);
        check!(config.log_filter == "info");
        check!(config.database.ends_with("zhdict/cedict.db"));
    }

    #[test]
    fn test_kebab_case_fields() {
        let config = Config::from_toml(
            r#"
            database = "/tmp/dict.db"
            page-size = 20
            log-filter = "zhdict=trace"
            "#,
        )
        .unwrap();
        check!(config.database == Path::new("/tmp/dict.db"));
        check!(config.page_size == 20);
        check!(config.log_filter == "zhdict=trace");
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let_assert!(Err(error) = Config::from_toml("page-size = 0"));
        check!(error.to_string().contains("page-size"));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        check!(Config::from_toml("pagesize = 10").is_err());
    }

    #[test]
    fn test_tilde_expansion() {
        let config = Config::from_toml(r#"database = "~/dict.db""#).unwrap();
        if let Some(home) = dirs::home_dir() {
            check!(config.database == home.join("dict.db"));
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let_assert!(Err(error) = Config::load(&dir.path().join("absent.toml")));
        check!(error.to_string().contains("Failed to read config"));
    }
}
