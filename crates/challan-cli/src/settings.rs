use std::path::Path;

use thiserror::Error;

use challan_generate::LiveConfig;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Live-mode settings: built-in constants, optionally overridden by a TOML
/// file.
pub fn load_live_config(path: Option<&Path>) -> Result<LiveConfig, SettingsError> {
    let Some(path) = path else {
        return Ok(LiveConfig::default());
    };
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config: LiveConfig = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn temp_file(label: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "challan_settings_{label}_{}.toml",
            uuid::Uuid::new_v4()
        ));
        std::fs::write(&path, contents).expect("write settings");
        path
    }

    #[test]
    fn no_path_yields_defaults() {
        let config = load_live_config(None).expect("defaults");
        assert_eq!(config, LiveConfig::default());
    }

    #[test]
    fn file_overrides_selected_keys() {
        let path = temp_file("override", "records_per_interval = 2\nfont_size = 18\n");
        let config = load_live_config(Some(&path)).expect("load settings");
        assert_eq!(config.records_per_interval, 2);
        assert_eq!(config.font_size, 18);
        assert_eq!(config.run_minutes, 30);
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = std::env::temp_dir().join("challan_settings_absent.toml");
        let result = load_live_config(Some(&path));
        assert!(matches!(result, Err(SettingsError::Io { .. })));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = temp_file("bad", "run_minutes = \"soon\"\n");
        let result = load_live_config(Some(&path));
        assert!(matches!(result, Err(SettingsError::Toml(_))));
    }
}
