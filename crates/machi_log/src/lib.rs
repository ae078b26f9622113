use std::{fmt::Display, str::FromStr};

use serde::Deserialize;

pub mod escape_code;
pub mod log_target;
pub mod logger;
pub mod logger_builder;

mod macros;

pub use log_target::{FileTarget, LogTarget, MemoryTarget, TerminalTarget};
pub use logger::Logger;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Fatal,
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format!("{self:?}").to_uppercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLogLevelError(pub String);

impl Display for ParseLogLevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown log level `{}`", self.0)
    }
}

impl std::error::Error for ParseLogLevelError {}

impl FromStr for LogLevel {
    type Err = ParseLogLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            _ => Err(ParseLogLevelError(s.to_string())),
        }
    }
}

/// A single record, already formatted, on its way to the targets.
pub struct Log {
    pub label: &'static str,
    pub level: LogLevel,
    pub message: String,
}

#[cfg(test)]
mod test {
    use crate::{LogLevel, Logger, MemoryTarget};

    #[test]
    fn should_log_through_every_macro() {
        let target = MemoryTarget::default();
        let logger = Logger::builder()
            .with_label("Render")
            .with_target(target.clone())
            .with_min_level(LogLevel::Trace)
            .build();

        crate::trace!(logger, "Format: {}", "some string");
        crate::debug!(logger, "Format: {}", "some string");
        crate::info!(logger, "Format: {}", "some string");
        crate::warning!(logger, "Format: {}", "some string");
        crate::error!(logger, "Format: {}", "some string");
        crate::fatal!(logger, "Format: {}", "some string");

        let lines = target.lines();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].ends_with("[Render] TRACE: Format: some string"));
        assert!(lines[5].ends_with("[Render] FATAL: Format: some string"));
    }

    #[test]
    fn should_parse_levels() {
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!("INFO".parse::<LogLevel>(), Ok(LogLevel::Info));
        assert!("loud".parse::<LogLevel>().is_err());
    }
}
