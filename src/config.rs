use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

static DEFAULT_SOURCE: &str = "https://bookings.example.com/v1/bookings";

/// Settings read from `<config dir>/bookcal/config.toml`.  A missing file
/// means defaults; a file that fails to parse is a startup error.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub(crate) struct Config {
    /// URL the booking set is fetched from
    pub(crate) source: String,
    /// Bookable slot labels, in display order
    pub(crate) slots: Vec<String>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            source: DEFAULT_SOURCE.to_string(),
            slots: ["10:00", "12:00", "14:00", "16:00"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Config {
    pub(crate) fn load(path_override: Option<&Path>) -> anyhow::Result<Config> {
        let path = match path_override {
            Some(p) => Some(p.to_path_buf()),
            None => default_path(),
        };
        let Some(path) = path else {
            debug!("no config directory; using defaults");
            return Ok(Config::default());
        };
        if !path.exists() {
            debug!(path = %path.display(), "no config file; using defaults");
            return Ok(Config::default());
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
    }
}

fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("bookcal").join("config.toml"))
}
