use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::MruConfig;
use crate::ops::classify::WeekStart;

/// Error type for reading and editing config.toml
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not parse config.toml: {0}")]
    DocumentError(#[from] toml_edit::TomlError),
    #[error("unknown config key: {0} (expected max-size or week-start)")]
    UnknownKey(String),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// The config file that sits next to a store file.
pub fn config_path_for(store_path: &Path) -> PathBuf {
    store_path
        .parent()
        .map(|dir| dir.join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

/// Read the config, returning both the parsed config and the raw
/// toml_edit document for round-trip-safe editing. A missing file yields
/// defaults and an empty document.
pub fn read_config(path: &Path) -> Result<(MruConfig, toml_edit::DocumentMut), ConfigError> {
    if !path.exists() {
        return Ok((MruConfig::default(), toml_edit::DocumentMut::new()));
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config: MruConfig = toml::from_str(&text)?;
    validate(&config)?;
    let doc: toml_edit::DocumentMut = text.parse()?;
    Ok((config, doc))
}

/// Load the effective config: file values, then environment overrides.
pub fn load_config(path: &Path) -> Result<MruConfig, ConfigError> {
    let (mut config, _doc) = read_config(path)?;
    if let Ok(raw) = std::env::var("MRU_MAX_SIZE") {
        config.list.max_size = parse_max_size(&raw)?;
    }
    Ok(config)
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(path: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(path, doc.to_string()).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Set one `[list]` key in the document. Accepts `max-size`/`max_size` and
/// `week-start`/`week_start`.
pub fn set_value(doc: &mut toml_edit::DocumentMut, key: &str, value: &str) -> Result<(), ConfigError> {
    if !doc.contains_key("list") {
        doc["list"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    match key.replace('-', "_").as_str() {
        "max_size" => {
            let size = parse_max_size(value)?;
            doc["list"]["max_size"] = toml_edit::value(size as i64);
        }
        "week_start" => {
            let start = parse_week_start(value)?;
            let name = match start {
                WeekStart::Monday => "monday",
                WeekStart::Sunday => "sunday",
            };
            doc["list"]["week_start"] = toml_edit::value(name);
        }
        _ => return Err(ConfigError::UnknownKey(key.to_string())),
    }
    Ok(())
}

fn validate(config: &MruConfig) -> Result<(), ConfigError> {
    if config.list.max_size == 0 {
        return Err(ConfigError::InvalidValue {
            key: "max_size".into(),
            value: "0".into(),
        });
    }
    Ok(())
}

fn parse_max_size(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n >= 1 && n <= i64::MAX as usize => Ok(n),
        _ => Err(ConfigError::InvalidValue {
            key: "max_size".into(),
            value: raw.to_string(),
        }),
    }
}

fn parse_week_start(raw: &str) -> Result<WeekStart, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "monday" | "mon" => Ok(WeekStart::Monday),
        "sunday" | "sun" => Ok(WeekStart::Sunday),
        _ => Err(ConfigError::InvalidValue {
            key: "week_start".into(),
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_config() -> &'static str {
        r#"# recent files
[list]
max_size = 12 # keep it short
week_start = "monday"
"#
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let (config, doc) = read_config(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(config, MruConfig::default());
        assert!(doc.to_string().is_empty());
    }

    #[test]
    fn test_round_trip_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, sample_config()).unwrap();

        let (config, doc) = read_config(&path).unwrap();
        assert_eq!(config.list.max_size, 12);
        write_config(&path, &doc).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), sample_config());
    }

    #[test]
    fn test_set_value_preserves_comments() {
        let mut doc: toml_edit::DocumentMut = sample_config().parse().unwrap();
        set_value(&mut doc, "week-start", "Sunday").unwrap();
        let result = doc.to_string();
        assert!(result.contains("# recent files"));
        assert!(result.contains("week_start = \"sunday\""));
        let config: MruConfig = toml::from_str(&result).unwrap();
        assert_eq!(config.list.week_start, WeekStart::Sunday);
        assert_eq!(config.list.max_size, 12);
    }

    #[test]
    fn test_set_value_on_empty_document() {
        let mut doc = toml_edit::DocumentMut::new();
        set_value(&mut doc, "max_size", "30").unwrap();
        let config: MruConfig = toml::from_str(&doc.to_string()).unwrap();
        assert_eq!(config.list.max_size, 30);
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let mut doc = toml_edit::DocumentMut::new();
        assert!(matches!(
            set_value(&mut doc, "max-size", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            set_value(&mut doc, "week-start", "friday"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            set_value(&mut doc, "colour", "blue"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_zero_max_size_in_file_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[list]\nmax_size = 0\n").unwrap();
        assert!(read_config(&path).is_err());
    }

    #[test]
    fn test_config_path_sits_next_to_store() {
        let p = config_path_for(Path::new("/home/ann/.config/mru/recent.toml"));
        assert_eq!(p, PathBuf::from("/home/ann/.config/mru/config.toml"));
    }
}
