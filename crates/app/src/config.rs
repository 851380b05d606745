//! Runtime configuration.
//!
//! Values resolve with priority: CLI flag > environment (including `.env`) >
//! `config.toml` > built-in default.

use std::fmt;
use std::path::Path;

use aid_core::model::{AiSettings, AiSettingsDraft, AiSettingsError};
use serde::Deserialize;

pub const CONFIG_FILE: &str = "config.toml";
pub const DEFAULT_DB_URL: &str = "sqlite://firstaid.sqlite3";

pub const ENV_DB_URL: &str = "FIRSTAID_DB_URL";
pub const ENV_API_KEY: &str = "FIRSTAID_AI_API_KEY";
pub const ENV_BASE_URL: &str = "FIRSTAID_AI_BASE_URL";
pub const ENV_MODEL: &str = "FIRSTAID_AI_MODEL";

// ==================== File format ====================

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    storage: Option<StorageConfig>,
    ai: Option<AiConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct StorageConfig {
    db_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AiConfig {
    base_url: Option<String>,
    text_model: Option<String>,
    chat_model: Option<String>,
    image_model: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    Read(std::io::Error),
    Parse(toml::de::Error),
    Ai(AiSettingsError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read(err) => write!(f, "could not read {CONFIG_FILE}: {err}"),
            ConfigError::Parse(err) => write!(f, "invalid {CONFIG_FILE}: {err}"),
            ConfigError::Ai(err) => write!(f, "invalid AI settings: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ==================== Resolved configuration ====================

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_url: String,
    pub ai: AiSettings,
}

/// Load `.env` and `config.toml` from the working directory and resolve.
///
/// # Errors
///
/// Returns `ConfigError` if `config.toml` exists but cannot be read or
/// parsed, or if the AI settings are invalid.
pub fn load(cli_db_url: Option<String>) -> Result<AppConfig, ConfigError> {
    let _ = dotenvy::dotenv();
    let file = read_file(Path::new(CONFIG_FILE))?;
    resolve(file, |name| std::env::var(name).ok(), cli_db_url)
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            tracing::debug!(path = %path.display(), "loaded config file");
            toml::from_str(&contents).map_err(ConfigError::Parse)
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
        Err(err) => Err(ConfigError::Read(err)),
    }
}

/// Merge the sources into a final configuration.
///
/// # Errors
///
/// Returns `ConfigError::Ai` if the merged AI settings fail validation.
pub fn resolve(
    file: FileConfig,
    env: impl Fn(&str) -> Option<String>,
    cli_db_url: Option<String>,
) -> Result<AppConfig, ConfigError> {
    let storage = file.storage.unwrap_or_default();
    let ai = file.ai.unwrap_or_default();

    let db_url = cli_db_url
        .or_else(|| env(ENV_DB_URL))
        .or(storage.db_url)
        .unwrap_or_else(|| DEFAULT_DB_URL.to_owned());

    let ai = AiSettingsDraft {
        api_key: env(ENV_API_KEY),
        api_base_url: env(ENV_BASE_URL).or(ai.base_url),
        text_model: env(ENV_MODEL).or(ai.text_model),
        chat_model: ai.chat_model,
        image_model: ai.image_model,
    }
    .validate()
    .map_err(ConfigError::Ai)?;

    Ok(AppConfig {
        db_url: normalize_sqlite_url(db_url),
        ai,
    })
}

/// Turn relative `sqlite:` paths into absolute `sqlite://` URLs.
#[must_use]
pub fn normalize_sqlite_url(raw: String) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_owned();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aid_core::model::{DEFAULT_API_BASE_URL, DEFAULT_CHAT_MODEL, DEFAULT_TEXT_MODEL};
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    fn file(raw: &str) -> FileConfig {
        toml::from_str(raw).unwrap()
    }

    #[test]
    fn defaults_apply_without_sources() {
        let config = resolve(FileConfig::default(), env_from(&[]), None).unwrap();
        assert_eq!(config.db_url, DEFAULT_DB_URL);
        assert_eq!(config.ai.api_key(), None);
        assert_eq!(config.ai.api_base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(config.ai.text_model(), DEFAULT_TEXT_MODEL);
        assert_eq!(config.ai.chat_model(), DEFAULT_CHAT_MODEL);
    }

    #[test]
    fn cli_beats_env_beats_file() {
        let toml = file("[storage]\ndb_url = \"sqlite://file.db\"\n");
        let env = env_from(&[(ENV_DB_URL, "sqlite://env.db")]);
        let config = resolve(toml, &env, Some("sqlite://cli.db".into())).unwrap();
        assert_eq!(config.db_url, "sqlite://cli.db");

        let toml = file("[storage]\ndb_url = \"sqlite://file.db\"\n");
        let config = resolve(toml, &env, None).unwrap();
        assert_eq!(config.db_url, "sqlite://env.db");

        let toml = file("[storage]\ndb_url = \"sqlite://file.db\"\n");
        let config = resolve(toml, env_from(&[]), None).unwrap();
        assert_eq!(config.db_url, "sqlite://file.db");
    }

    #[test]
    fn ai_section_and_env_overrides() {
        let toml = file(
            "[ai]\nbase_url = \"https://proxy.example.org/v1/\"\ntext_model = \"file-model\"\nchat_model = \"chat-x\"\n",
        );
        let env = env_from(&[(ENV_API_KEY, "secret"), (ENV_MODEL, "env-model")]);
        let config = resolve(toml, env, None).unwrap();
        assert_eq!(config.ai.api_key(), Some("secret"));
        assert_eq!(config.ai.api_base_url(), "https://proxy.example.org/v1");
        assert_eq!(config.ai.text_model(), "env-model");
        assert_eq!(config.ai.chat_model(), "chat-x");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let env = env_from(&[(ENV_BASE_URL, "not a url")]);
        let err = resolve(FileConfig::default(), env, None).unwrap_err();
        assert!(matches!(err, ConfigError::Ai(_)));
    }

    #[test]
    fn memory_and_absolute_urls_are_kept() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url("sqlite:/tmp/a.db".into()),
            "sqlite:///tmp/a.db"
        );
    }
}
