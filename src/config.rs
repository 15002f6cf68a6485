use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Resolved settings: where the database lives and which theme the TUI uses.
/// Sources, lowest to highest precedence: built-in defaults, `config.toml`
/// in the platform config directory, `APPTRACK_*` environment variables.
#[derive(Debug, Clone)]
pub struct Settings {
    pub db_path: PathBuf,
    pub theme: String,
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    db_path: Option<PathBuf>,
    theme: Option<String>,
}

const DEFAULT_THEME: &str = "tokyo-night";

impl Settings {
    pub fn load() -> Result<Self> {
        let file = match config_file_path() {
            Some(path) if path.exists() => parse_file(&path)?,
            _ => FileSettings::default(),
        };
        let env_db = std::env::var("APPTRACK_DB_PATH").ok();
        let env_theme = std::env::var("APPTRACK_THEME").ok();
        Ok(Self::resolve(file, env_db, env_theme))
    }

    fn resolve(file: FileSettings, env_db: Option<String>, env_theme: Option<String>) -> Self {
        let db_path = env_db
            .map(PathBuf::from)
            .or(file.db_path)
            .unwrap_or_else(default_db_path);
        let theme = env_theme
            .or(file.theme)
            .unwrap_or_else(|| DEFAULT_THEME.to_string());
        Settings { db_path, theme }
    }
}

fn parse_file(path: &Path) -> Result<FileSettings> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("invalid config file {}", path.display()))
}

fn config_file_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "apptrack")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn default_db_path() -> PathBuf {
    // XDG data directory or fallback to the working directory
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "apptrack") {
        proj_dirs.data_dir().join("apptrack.db")
    } else {
        PathBuf::from("apptrack.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_when_nothing_is_set() {
        let settings = Settings::resolve(FileSettings::default(), None, None);
        assert_eq!(settings.theme, DEFAULT_THEME);
        assert!(settings.db_path.ends_with("apptrack.db"));
    }

    #[test]
    fn env_overrides_file() {
        let file = FileSettings {
            db_path: Some(PathBuf::from("/tmp/file.db")),
            theme: Some("gruvbox".to_string()),
        };
        let settings = Settings::resolve(
            file,
            Some("/tmp/env.db".to_string()),
            Some("nord".to_string()),
        );
        assert_eq!(settings.db_path, PathBuf::from("/tmp/env.db"));
        assert_eq!(settings.theme, "nord");
    }

    #[test]
    fn file_values_apply_without_env() {
        let file = FileSettings {
            db_path: Some(PathBuf::from("/tmp/file.db")),
            theme: None,
        };
        let settings = Settings::resolve(file, None, None);
        assert_eq!(settings.db_path, PathBuf::from("/tmp/file.db"));
        assert_eq!(settings.theme, DEFAULT_THEME);
    }

    #[test]
    fn parses_toml_config() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "db_path = \"/tmp/jobs.db\"\ntheme = \"nord\"").unwrap();
        let file = parse_file(tmp.path()).unwrap();
        assert_eq!(file.db_path, Some(PathBuf::from("/tmp/jobs.db")));
        assert_eq!(file.theme, Some("nord".to_string()));
    }

    #[test]
    fn rejects_malformed_toml() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "db_path = [not toml").unwrap();
        assert!(parse_file(tmp.path()).is_err());
    }
}
