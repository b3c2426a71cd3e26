use anyhow::{Context, Result};
use directories::BaseDirs;
use std::path::PathBuf;

/// Environment variable naming the configuration file
pub const CONFIG_PATH_ENV: &str = "PINGCLI_CONFIG";

/// Where the configuration file lives, and whether the user chose it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    pub path: PathBuf,
    /// Supplied by flag or environment; a missing file is then an error
    /// instead of being created
    pub explicit: bool,
}

impl ConfigLocation {
    /// Resolve from the `--config` flag, then `PINGCLI_CONFIG`, then the default path
    pub fn resolve(flag: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = flag {
            return Ok(Self::explicit(path));
        }

        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::explicit(PathBuf::from(path)));
        }

        Self::default_location()
    }

    /// ~/.pingcli/config.yaml
    pub fn default_location() -> Result<Self> {
        let base_dirs = BaseDirs::new().context("Failed to determine home directory")?;
        let path = base_dirs.home_dir().join(".pingcli").join("config.yaml");
        Ok(Self {
            path,
            explicit: false,
        })
    }

    pub fn explicit(path: PathBuf) -> Self {
        Self {
            path,
            explicit: true,
        }
    }
}
