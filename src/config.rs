use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "songbook")]
#[command(about = "Runs the songbook service", long_about = None)]
pub struct Cli {
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<String>,
}

pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".songbook")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.yaml")
}

#[derive(Debug, Deserialize, Clone)]
pub struct App {
    database: String,
    port: u16,
    #[serde(default)]
    pub turso_url: Option<String>,
    #[serde(default)]
    pub turso_auth_token: Option<String>,
    #[serde(default = "default_sync_interval")]
    pub sync_interval_seconds: u64,
}

fn default_sync_interval() -> u64 {
    60
}

impl App {
    pub fn get_db(&self) -> &str {
        &self.database
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    /// Turso replication settings, present only when both halves are set.
    pub fn replica(&self) -> Option<(&str, &str)> {
        let url = self.turso_url.as_deref().filter(|s| !s.is_empty())?;
        let token = self.turso_auth_token.as_deref().filter(|s| !s.is_empty())?;
        Some((url, token))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Enrichment {
    /// Full URL of the song detail endpoint, e.g. `http://api.example.com/info`.
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub app: App,
    pub enrichment: Enrichment,
}

impl Config {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml_str = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Config::from_yaml(&yaml_str)
    }

    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        let yaml_with_env = Config::substitute_env_vars(yaml_str)?;
        let config: Config = serde_yaml::from_str(&yaml_with_env)?;
        Ok(config)
    }

    /// Expands `${VAR}` and `${VAR:-default}`. A variable with no default
    /// that is not set is an error.
    fn substitute_env_vars(yaml_str: &str) -> Result<String> {
        let mut result = yaml_str.to_string();
        let mut offset = 0;

        while let Some(start) = result[offset..].find("${") {
            let actual_start = offset + start;
            let Some(end) = result[actual_start..].find('}') else {
                break;
            };
            let var_name = &result[actual_start + 2..actual_start + end];

            let env_value = match var_name.split_once(":-") {
                Some((actual_var, default_val)) => {
                    env::var(actual_var).unwrap_or_else(|_| default_val.to_string())
                }
                None => env::var(var_name)
                    .with_context(|| format!("couldn't find {} in environment", var_name))?,
            };

            result.replace_range(actual_start..actual_start + end + 1, &env_value);
            offset = actual_start + env_value.len();
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CONFIG: &str = r#"
app:
  database: songs.db
  port: 8080
enrichment:
  url: http://api.example.com/info
"#;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CONFIG.as_bytes()).unwrap();

        let cfg = Config::new(file.path()).unwrap();
        assert_eq!(cfg.app.get_db(), "songs.db");
        assert_eq!(cfg.app.get_port(), 8080);
        assert_eq!(cfg.app.sync_interval_seconds, 60);
        assert!(cfg.app.replica().is_none());
        assert_eq!(cfg.enrichment.url, "http://api.example.com/info");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::new(dir.path().join("nope.yaml")).is_err());
    }

    #[test]
    fn test_default_values_are_substituted() {
        let yaml = r#"
app:
  database: ${SONGBOOK_TEST_UNSET_DB:-library.db}
  port: ${SONGBOOK_TEST_UNSET_PORT:-9000}
  turso_url: ${SONGBOOK_TEST_UNSET_TURSO:-}
enrichment:
  url: http://localhost/info
"#;
        let cfg = Config::from_yaml(yaml).unwrap();
        assert_eq!(cfg.app.get_db(), "library.db");
        assert_eq!(cfg.app.get_port(), 9000);
        assert!(cfg.app.replica().is_none());
    }

    #[test]
    fn test_unset_variable_without_default_is_fatal() {
        let yaml = r#"
app:
  database: songs.db
  port: ${SONGBOOK_TEST_DEFINITELY_UNSET_PORT}
enrichment:
  url: http://localhost/info
"#;
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("SONGBOOK_TEST_DEFINITELY_UNSET_PORT"));
    }

    #[test]
    fn test_replica_needs_both_settings() {
        let mut app = Config::from_yaml(CONFIG).unwrap().app;
        app.turso_url = Some("libsql://songs.turso.io".to_string());
        assert!(app.replica().is_none());

        app.turso_auth_token = Some("token".to_string());
        assert_eq!(app.replica(), Some(("libsql://songs.turso.io", "token")));
    }
}
