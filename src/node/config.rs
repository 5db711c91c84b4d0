use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use crate::utils::LogFormat;

pub const CONFIG_FILE: &str = "ballotchain.toml";

/// Node configuration, read from `<data_dir>/ballotchain.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NodeConfig {
    pub bind_addr: String,
    pub default_difficulty: u32,
    pub max_difficulty: u32,
    pub log_level: String,
    pub log_format: LogFormat,
    /// When set, admin routes require an HMAC token derived from this secret.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_token: Option<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5001".into(),
            default_difficulty: 2,
            max_difficulty: 6,
            log_level: "info".into(),
            log_format: LogFormat::Human,
            admin_token: None,
        }
    }
}

impl NodeConfig {
    pub fn path_in(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE)
    }

    /// Load a TOML config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let cfg: NodeConfig = toml::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Config from the data dir, or defaults when no file exists.
    pub fn load_or_default(data_dir: &Path) -> Result<Self> {
        let path = Self::path_in(data_dir);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), text).with_context(|| format!("writing {}", path.as_ref().display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.default_difficulty <= self.max_difficulty,
            "default_difficulty ({}) exceeds max_difficulty ({})",
            self.default_difficulty,
            self.max_difficulty
        );
        anyhow::ensure!(
            self.max_difficulty <= crate::consensus::MAX_DIFFICULTY,
            "max_difficulty must be at most {}",
            crate::consensus::MAX_DIFFICULTY
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_partial_files() {
        let cfg: NodeConfig = toml::from_str("default_difficulty = 3\nlog_format = \"json\"").unwrap();
        assert_eq!(cfg.default_difficulty, 3);
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert_eq!(cfg.bind_addr, "127.0.0.1:5001");
        assert_eq!(cfg.max_difficulty, 6);
        assert!(cfg.admin_token.is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = NodeConfig::path_in(dir.path());
        let cfg = NodeConfig { admin_token: Some("k".into()), ..NodeConfig::default() };
        cfg.save(&path).unwrap();
        assert_eq!(NodeConfig::load(&path).unwrap(), cfg);
        assert_eq!(NodeConfig::load_or_default(dir.path()).unwrap(), cfg);
    }

    #[test]
    fn missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(NodeConfig::load_or_default(dir.path()).unwrap(), NodeConfig::default());
    }

    #[test]
    fn rejects_inverted_difficulty_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "default_difficulty = 5\nmax_difficulty = 2\n").unwrap();
        assert!(NodeConfig::load(&path).is_err());
    }
}
