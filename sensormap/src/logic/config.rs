use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Host settings. Sources, lowest priority first: built-in defaults, the
/// TOML config file, `SENSORMAP_*` environment variables, command-line flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Address to bind
    pub host: String,
    /// Port to bind (default: 3040)
    pub port: u16,
    /// Readings JSON file served at /api/sensors (supports `~`)
    pub readings_path: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3040,
            readings_path: "~/.local/share/sensormap/readings.json".to_string(),
        }
    }
}

impl HostConfig {
    /// `<config dir>/sensormap/config.toml` for the current user.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "example", "sensormap").map(|pd| pd.config_dir().join("config.toml"))
    }

    /// Parse a config file. Keys left out keep their defaults.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let expanded = shellexpand::tilde(path).into_owned();
        let contents = std::fs::read_to_string(&expanded)
            .with_context(|| format!("failed to read config file {}", expanded))?;
        toml::from_str(&contents).with_context(|| format!("invalid config file {}", expanded))
    }

    /// An explicitly named file must exist; the default location is optional.
    pub fn load(explicit: Option<&str>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path.to_string_lossy()),
            _ => Ok(Self::default()),
        }
    }

    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Unparseable values are ignored.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("SENSORMAP_IP") {
            self.host = val;
        }
        if let Some(val) = lookup("SENSORMAP_PORT") {
            if let Ok(parsed) = val.parse() {
                self.port = parsed;
            }
        }
        if let Some(val) = lookup("SENSORMAP_READINGS") {
            self.readings_path = val;
        }
    }

    pub fn apply_args(&mut self, host: Option<String>, port: Option<u16>, readings_path: Option<String>) {
        if let Some(val) = host {
            self.host = val;
        }
        if let Some(val) = port {
            self.port = val;
        }
        if let Some(val) = readings_path {
            self.readings_path = val;
        }
    }

    pub fn readings_file(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.readings_path).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_config_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "port = 8080").unwrap();

        let config = HostConfig::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.readings_path, HostConfig::default().readings_path);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(HostConfig::load(Some("/nonexistent/sensormap/config.toml")).is_err());
    }

    #[test]
    fn test_invalid_config_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();

        let err = HostConfig::from_file(file.path().to_str().unwrap()).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid config file"));
    }

    #[test]
    fn test_precedence_file_env_args() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "host = \"0.0.0.0\"\nport = 8080\nreadings_path = \"/srv/file.json\"").unwrap();
        let mut config = HostConfig::from_file(file.path().to_str().unwrap()).unwrap();

        let env: HashMap<&str, &str> = [("SENSORMAP_PORT", "9090"), ("SENSORMAP_READINGS", "/srv/env.json")]
            .into_iter()
            .collect();
        config.apply_env_from(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9090);
        assert_eq!(config.readings_path, "/srv/env.json");

        config.apply_args(None, Some(7070), Some("/srv/flag.json".to_string()));
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 7070);
        assert_eq!(config.readings_path, "/srv/flag.json");
    }

    #[test]
    fn test_bad_env_port_is_ignored() {
        let mut config = HostConfig::default();
        config.apply_env_from(|key| (key == "SENSORMAP_PORT").then(|| "lots".to_string()));
        assert_eq!(config.port, 3040);
    }

    #[test]
    fn test_readings_file_expands_tilde() {
        let config = HostConfig {
            readings_path: "/tmp/readings.json".to_string(),
            ..HostConfig::default()
        };
        assert_eq!(config.readings_file(), PathBuf::from("/tmp/readings.json"));
        assert!(!HostConfig::default().readings_file().starts_with("~"));
    }
}
