//! TOML configuration file read by the command-line adapter.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use loop_quest_world::config::GameConfig;
use serde::Deserialize;

/// Autoplay overrides stored next to the game configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct AutoplayFile {
    pub(crate) turns: Option<u32>,
    pub(crate) frame_ms: Option<u64>,
}

/// Parsed configuration file: game sections plus an optional `[autoplay]` table.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub(crate) struct ConfigFile {
    #[serde(default)]
    pub(crate) autoplay: AutoplayFile,
    #[serde(flatten)]
    pub(crate) game: GameConfig,
}

impl ConfigFile {
    /// Parses and validates a configuration document.
    pub(crate) fn parse(source: &str) -> Result<Self> {
        let file: Self = toml::from_str(source).context("configuration is not valid TOML")?;
        file.game.validate().context("configuration was refused")?;
        Ok(file)
    }
}

/// Loads the configuration at `path`, or the defaults when no path is given.
pub(crate) fn load(path: Option<&Path>) -> Result<ConfigFile> {
    let Some(path) = path else {
        return Ok(ConfigFile::default());
    };
    let shown = path.display();
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration from {shown}"))?;
    ConfigFile::parse(&source).with_context(|| format!("in {shown}"))
}
