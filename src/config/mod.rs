mod file_config;

pub use file_config::FileConfig;

use anyhow::{bail, Result};
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "sparkify.db";
pub const DEFAULT_SONG_DATA_DIR: &str = "data/song_data";
pub const DEFAULT_LOG_DATA_DIR: &str = "data/log_data";
pub const DEFAULT_FILE_EXTENSION: &str = "json";

/// What the pipeline does with a file whose content cannot be loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseErrorPolicy {
    /// Stop the whole run at the first bad file.
    #[default]
    Abort,
    /// Roll back the bad file and continue with the next one.
    Skip,
}

impl ParseErrorPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "abort" => Some(ParseErrorPolicy::Abort),
            "skip" => Some(ParseErrorPolicy::Skip),
            _ => None,
        }
    }
}

/// CLI arguments that can be used for config resolution.
/// Every field left unset falls back to the TOML file, then to the defaults.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub song_data_dir: Option<PathBuf>,
    pub log_data_dir: Option<PathBuf>,
    pub skip_bad_files: bool,
    pub reset_schema: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EtlConfig {
    pub db_path: PathBuf,
    pub song_data_dir: PathBuf,
    pub log_data_dir: PathBuf,
    /// Extension of the data files, without the leading dot.
    pub file_extension: String,
    pub on_parse_error: ParseErrorPolicy,
    pub reset_schema: bool,
}

impl Default for EtlConfig {
    fn default() -> Self {
        EtlConfig {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            song_data_dir: PathBuf::from(DEFAULT_SONG_DATA_DIR),
            log_data_dir: PathBuf::from(DEFAULT_LOG_DATA_DIR),
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            on_parse_error: ParseErrorPolicy::Abort,
            reset_schema: false,
        }
    }
}

impl EtlConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();
        let defaults = EtlConfig::default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .unwrap_or(defaults.db_path);
        let song_data_dir = file
            .song_data_dir
            .map(PathBuf::from)
            .or_else(|| cli.song_data_dir.clone())
            .unwrap_or(defaults.song_data_dir);
        let log_data_dir = file
            .log_data_dir
            .map(PathBuf::from)
            .or_else(|| cli.log_data_dir.clone())
            .unwrap_or(defaults.log_data_dir);

        let file_extension = file
            .file_extension
            .map(|e| e.trim_start_matches('.').to_string())
            .unwrap_or(defaults.file_extension);
        if file_extension.is_empty() {
            bail!("file_extension must not be empty");
        }

        let on_parse_error = match file.on_parse_error {
            Some(s) => match ParseErrorPolicy::parse(&s) {
                Some(policy) => policy,
                None => bail!("Unknown on_parse_error policy \"{}\", expected abort or skip", s),
            },
            None if cli.skip_bad_files => ParseErrorPolicy::Skip,
            None => defaults.on_parse_error,
        };

        let reset_schema = file.reset_schema.unwrap_or(cli.reset_schema);

        Ok(EtlConfig {
            db_path,
            song_data_dir,
            log_data_dir,
            file_extension,
            on_parse_error,
            reset_schema,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_cli_or_file_values() {
        let config = EtlConfig::resolve(&CliConfig::default(), None).unwrap();
        assert_eq!(config, EtlConfig::default());
        assert_eq!(config.song_data_dir, PathBuf::from("data/song_data"));
        assert_eq!(config.log_data_dir, PathBuf::from("data/log_data"));
        assert_eq!(config.on_parse_error, ParseErrorPolicy::Abort);
    }

    #[test]
    fn cli_values_override_defaults() {
        let cli = CliConfig {
            db_path: Some(PathBuf::from("/tmp/cli.db")),
            skip_bad_files: true,
            reset_schema: true,
            ..CliConfig::default()
        };
        let config = EtlConfig::resolve(&cli, None).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/cli.db"));
        assert_eq!(config.on_parse_error, ParseErrorPolicy::Skip);
        assert!(config.reset_schema);
        assert_eq!(config.song_data_dir, PathBuf::from(DEFAULT_SONG_DATA_DIR));
    }

    #[test]
    fn file_values_override_cli() {
        let cli = CliConfig {
            db_path: Some(PathBuf::from("/tmp/cli.db")),
            skip_bad_files: true,
            reset_schema: true,
            ..CliConfig::default()
        };
        let file = FileConfig {
            db_path: Some("/tmp/file.db".to_string()),
            log_data_dir: Some("/data/logs".to_string()),
            file_extension: Some(".ndjson".to_string()),
            on_parse_error: Some("Abort".to_string()),
            reset_schema: Some(false),
            ..FileConfig::default()
        };
        let config = EtlConfig::resolve(&cli, Some(file)).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/file.db"));
        assert_eq!(config.log_data_dir, PathBuf::from("/data/logs"));
        assert_eq!(config.file_extension, "ndjson");
        assert_eq!(config.on_parse_error, ParseErrorPolicy::Abort);
        assert!(!config.reset_schema);
    }

    #[test]
    fn rejects_unknown_policy() {
        let file = FileConfig {
            on_parse_error: Some("retry".to_string()),
            ..FileConfig::default()
        };
        assert!(EtlConfig::resolve(&CliConfig::default(), Some(file)).is_err());
    }

    #[test]
    fn rejects_empty_extension() {
        let file = FileConfig {
            file_extension: Some(".".to_string()),
            ..FileConfig::default()
        };
        assert!(EtlConfig::resolve(&CliConfig::default(), Some(file)).is_err());
    }
}
