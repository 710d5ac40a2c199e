use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub db_path: Option<String>,
    pub song_data_dir: Option<String>,
    pub log_data_dir: Option<String>,
    pub file_extension: Option<String>,
    /// "abort" or "skip"
    pub on_parse_error: Option<String>,
    pub reset_schema: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn loads_partial_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("etl.toml");
        std::fs::write(
            &path,
            "db_path = \"/tmp/warehouse.db\"\non_parse_error = \"skip\"\n",
        )
        .unwrap();

        let config = FileConfig::load(&path).unwrap();
        assert_eq!(config.db_path.as_deref(), Some("/tmp/warehouse.db"));
        assert_eq!(config.on_parse_error.as_deref(), Some("skip"));
        assert_eq!(config.song_data_dir, None);
        assert_eq!(config.reset_schema, None);
    }

    #[test]
    fn rejects_unknown_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("etl.toml");
        std::fs::write(&path, "port = 3001\n").unwrap();

        assert!(FileConfig::load(&path).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(FileConfig::load(&dir.path().join("missing.toml")).is_err());
    }
}
