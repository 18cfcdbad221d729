use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_IDENTITY: &str = "Saichakradhar4705";
pub const DEFAULT_API_HOST: &str = "https://api.github.com";
pub const DEFAULT_DATE_FORMAT: &str = "[month padding:none]/[day padding:none]/[year]";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FolioConfig {
    #[serde(default = "default_identity")]
    pub identity: String,
    #[serde(default)]
    pub api_host: Option<String>,
    #[serde(default = "default_palette")]
    pub default_palette: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            identity: default_identity(),
            api_host: None,
            default_palette: default_palette(),
            date_format: default_date_format(),
        }
    }
}

fn default_identity() -> String {
    DEFAULT_IDENTITY.to_string()
}

fn default_palette() -> String {
    crate::palette::DEFAULT_PALETTE.to_string()
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

impl FolioConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path).context("read config")?;
        let config = serde_json::from_str(&data).context("parse config")?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("create config directory")?;
        }
        let data = serde_json::to_string_pretty(self).context("serialize config")?;
        fs::write(path, data).context("write config")?;
        Ok(())
    }

    pub fn api_host(&self) -> &str {
        self.api_host.as_deref().unwrap_or(DEFAULT_API_HOST)
    }
}

fn project_dirs() -> anyhow::Result<ProjectDirs> {
    ProjectDirs::from("com", "folio", "folio").context("resolve project dirs")
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.json"))
}

pub fn default_preferences_path() -> anyhow::Result<PathBuf> {
    Ok(project_dirs()?.data_local_dir().join("preferences.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = FolioConfig::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, FolioConfig::default());
        assert_eq!(config.api_host(), DEFAULT_API_HOST);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"identity":"octocat"}"#).unwrap();
        let config = FolioConfig::load(&path).unwrap();
        assert_eq!(config.identity, "octocat");
        assert_eq!(config.default_palette, "red");
        assert_eq!(config.date_format, DEFAULT_DATE_FORMAT);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = FolioConfig {
            api_host: Some("http://localhost:9000".to_string()),
            ..FolioConfig::default()
        };
        config.save(&path).unwrap();
        let loaded = FolioConfig::load(&path).unwrap();
        assert_eq!(loaded.api_host(), "http://localhost:9000");
    }
}
