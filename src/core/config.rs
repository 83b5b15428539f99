use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Model requested when neither the config file nor the endpoint default
/// applies.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Optional settings file, read from the platform config directory.
/// Everything has a default, so a missing file is a valid configuration.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    /// Model requested from the chat endpoint.
    pub model: Option<String>,
    /// Base URL for the chat endpoint; `OPENAI_BASE_URL` wins over this.
    pub base_url: Option<String>,
    /// Directory conversation records are kept in.
    pub data_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Config, Box<dyn std::error::Error>> {
        Self::load_from_path(&Self::config_path()?)
    }

    pub fn load_from_path(config_path: &PathBuf) -> Result<Config, Box<dyn std::error::Error>> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    /// Where conversation records live: the configured `data_dir`, or a
    /// `conversations` directory under the platform data dir.
    pub fn conversations_dir(&self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        Ok(Self::project_dirs()?.data_dir().join("conversations"))
    }

    fn config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    fn project_dirs() -> Result<ProjectDirs, Box<dyn std::error::Error>> {
        ProjectDirs::from("org", "permacommons", "causerie")
            .ok_or_else(|| "could not determine a home directory for configuration".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_defaults() {
        let temp_dir = TempDir::new().expect("temp dir");
        let config_path = temp_dir.path().join("nonexistent_config.toml");

        let config = Config::load_from_path(&config_path).expect("load should succeed");

        assert_eq!(config.model, None);
        assert_eq!(config.base_url, None);
        assert_eq!(config.model(), DEFAULT_MODEL);
    }

    #[test]
    fn settings_load_from_toml() {
        let temp_dir = TempDir::new().expect("temp dir");
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            "model = \"gpt-4o-mini\"\nbase_url = \"https://example.test/v1\"\ndata_dir = \"/tmp/causerie-records\"\n",
        )
        .expect("write config");

        let config = Config::load_from_path(&config_path).expect("load should succeed");

        assert_eq!(config.model(), "gpt-4o-mini");
        assert_eq!(config.base_url.as_deref(), Some("https://example.test/v1"));
        assert_eq!(
            config.conversations_dir().expect("dir should resolve"),
            PathBuf::from("/tmp/causerie-records")
        );
    }

    #[test]
    fn unknown_keys_are_tolerated() {
        let temp_dir = TempDir::new().expect("temp dir");
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "model = \"gpt-4o\"\ntheme = \"dark\"\n").expect("write");

        let config = Config::load_from_path(&config_path).expect("load should succeed");
        assert_eq!(config.model(), "gpt-4o");
    }
}
