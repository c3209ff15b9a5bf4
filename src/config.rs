use crate::inspector::DEFAULT_EXPAND_DEPTH;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 7878;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DoctreeConfig {
    /// Snapshot file to inspect when none is given on the command line
    pub document: Option<String>,
    /// Levels expanded when the tree is opened
    pub expand_depth: Option<usize>,
    /// Port of the HTTP view
    pub port: Option<u16>,
}

impl DoctreeConfig {
    pub fn expand_depth(&self) -> usize {
        self.expand_depth.unwrap_or(DEFAULT_EXPAND_DEPTH)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("doctree.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<DoctreeConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: DoctreeConfig = toml::from_str(&contents)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &DoctreeConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}
