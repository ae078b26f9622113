use std::{
    env, io,
    path::{Path, PathBuf},
};

use machi_core::utils::{read_text, FromIoError};
use serde::Deserialize;
use thiserror::Error;
use toml::Table;

pub const CONFIG_PATH_VAR: &str = "MACHI_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "machi.toml";

/// A typed view over one `[section]` of the configuration file.
pub trait ConfigSection: for<'a> Deserialize<'a> + Default {
    fn section_name() -> &'static str;
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    FailedToParse(#[from] toml::de::Error),
    #[error("Invalid config section `[{section}]`: {source}")]
    InvalidSection {
        section: &'static str,
        source: toml::de::Error,
    },
    #[error("Could not read config file `{path}`: {source}")]
    Io { path: String, source: io::Error },
}

impl FromIoError for ConfigError {
    fn io_err<P: AsRef<Path>>(path: P, err: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_string_lossy().into(),
            source: err,
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Parsed configuration document.
#[derive(Debug, Default, Clone)]
pub struct Config {
    table: Table,
}

impl Config {
    pub fn parse(source: &str) -> ConfigResult<Self> {
        Ok(Self {
            table: source.parse()?,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        Self::parse(&read_text::<_, ConfigError>(path)?)
    }

    /// Loads the file named by `MACHI_CONFIG_PATH`, or `machi.toml`.
    pub fn load_default() -> ConfigResult<Self> {
        Self::load(Self::default_path())
    }

    pub fn default_path() -> PathBuf {
        env::var_os(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// A missing section yields `C::default()`. Fields missing from a
    /// present section are up to the section's serde defaults.
    pub fn section<C: ConfigSection>(&self) -> ConfigResult<C> {
        match self.table.get(C::section_name()) {
            Some(value) => {
                value
                    .clone()
                    .try_into()
                    .map_err(|source| ConfigError::InvalidSection {
                        section: C::section_name(),
                        source,
                    })
            }
            None => Ok(Default::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use anyhow::Result;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(default)]
    struct Audio {
        volume: f32,
        muted: bool,
    }

    impl Default for Audio {
        fn default() -> Self {
            Self {
                volume: 0.5,
                muted: false,
            }
        }
    }

    impl ConfigSection for Audio {
        fn section_name() -> &'static str {
            "audio"
        }
    }

    #[test]
    fn missing_section_yields_default() -> Result<()> {
        let config = Config::parse("[video]\nwidth = 10")?;
        assert_eq!(config.section::<Audio>()?, Audio::default());
        Ok(())
    }

    #[test]
    fn partial_section_keeps_field_defaults() -> Result<()> {
        let config = Config::parse("[audio]\nmuted = true")?;
        assert_eq!(
            config.section::<Audio>()?,
            Audio {
                volume: 0.5,
                muted: true
            }
        );
        Ok(())
    }

    #[test]
    fn wrong_type_reports_section() -> Result<()> {
        let config = Config::parse("[audio]\nvolume = \"loud\"")?;
        let err = config.section::<Audio>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSection { section: "audio", .. }));
        Ok(())
    }

    #[test]
    fn malformed_document_fails_to_parse() {
        assert!(matches!(
            Config::parse("[audio"),
            Err(ConfigError::FailedToParse(_))
        ));
    }

    #[test]
    fn loads_from_file() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "[audio]\nvolume = 1.0")?;

        let config = Config::load(file.path())?;
        assert_eq!(config.section::<Audio>()?.volume, 1.0);
        Ok(())
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            Config::load("no/such/machi.toml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
