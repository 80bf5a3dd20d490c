use crate::error::{Error, Result};
use crate::muted_error;
use serde::Deserialize;
use std::fs::read_to_string;
use std::path::Path;

/// Session behaviour settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Ask for breakpoint and stack refresh after a file is opened explicitly.
    pub refresh_on_open: bool,
    /// Bring a view to front when the debugee stops in its file.
    pub activate_on_stop: bool,
    /// Dump every incoming record into the trace log.
    pub trace_records: bool,
    /// Maximum length of a view title.
    pub title_width: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            refresh_on_open: true,
            activate_on_stop: true,
            trace_records: false,
            title_width: 40,
        }
    }
}

impl SessionConfig {
    const DEFAULT_PATH: &'static str = ".config/mi-session/config.toml";

    /// Parse configuration from a TOML document.
    pub fn from_toml(data: &str) -> Result<Self> {
        Ok(toml::de::from_str(data)?)
    }

    /// Load configuration from file.
    /// Without an explicit path, `$HOME/.config/mi-session/config.toml` is used,
    /// and if it can't be read the default configuration is returned.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let data =
                    read_to_string(path).map_err(|e| Error::ConfigRead(path.to_path_buf(), e))?;
                Self::from_toml(&data)
            }
            None => {
                let data = home::home_dir()
                    .map(|home| home.join(Self::DEFAULT_PATH))
                    .and_then(|path| muted_error!(read_to_string(path)));
                match data {
                    Some(data) => Self::from_toml(&data),
                    None => Ok(Self::default()),
                }
            }
        }
    }
}
