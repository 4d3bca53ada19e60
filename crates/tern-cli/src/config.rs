//! TOML configuration for the tern CLI.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration, parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Coordinator tuning.
    pub engine: EngineSection,
    /// Demo-mode tuning.
    pub demo: DemoSection,
    /// Logging configuration.
    pub log: LogSection,
}

/// `[engine]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    /// Poll interval in milliseconds while waiting for inclusion.
    pub poll_interval_ms: Option<u64>,
}

/// `[demo]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DemoSection {
    /// How often the demo's in-process sequencer runs, in milliseconds.
    pub sequence_interval_ms: Option<u64>,
    /// How many records the demo submits.
    pub records: Option<usize>,
}

/// `[log]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Log level filter (e.g. `"info"`, `"debug"`, `"warn"`).
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl CliConfig {
    /// Load config from a TOML file, or use defaults if no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => {
                let content = std::fs::read_to_string(p)?;
                let config: CliConfig = toml::from_str(&content)?;
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse config from a TOML string (used in tests).
    #[cfg(test)]
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Effective poll interval (config value or 1 s default).
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.engine.poll_interval_ms.unwrap_or(1_000))
    }

    /// Effective demo sequencer cadence (config value or 500 ms default).
    pub fn sequence_interval(&self) -> Duration {
        Duration::from_millis(self.demo.sequence_interval_ms.unwrap_or(500))
    }

    /// Effective demo record count (config value or 1).
    pub fn demo_records(&self) -> usize {
        self.demo.records.unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[engine]
poll_interval_ms = 250

[demo]
sequence_interval_ms = 100
records = 3

[log]
level = "debug"
"#;

        let config = CliConfig::from_toml(toml).unwrap();
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.sequence_interval(), Duration::from_millis(100));
        assert_eq!(config.demo_records(), 3);
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = CliConfig::from_toml("").unwrap();
        assert_eq!(config.poll_interval(), Duration::from_millis(1_000));
        assert_eq!(config.sequence_interval(), Duration::from_millis(500));
        assert_eq!(config.demo_records(), 1);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[engine]
poll_interval_ms = 50
"#;
        let config = CliConfig::from_toml(toml).unwrap();
        assert_eq!(config.poll_interval(), Duration::from_millis(50));
        // Unspecified sections get defaults.
        assert_eq!(config.demo_records(), 1);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tern.toml");
        std::fs::write(
            &path,
            r#"
[log]
level = "trace"
"#,
        )
        .unwrap();

        let config = CliConfig::load(Some(&path)).unwrap();
        assert_eq!(config.log.level, "trace");
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = CliConfig::load(None).unwrap();
        assert_eq!(config.poll_interval(), Duration::from_millis(1_000));
    }
}
