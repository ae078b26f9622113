use std::sync::{Arc, Mutex};

use chrono::Local;

use crate::{
    escape_code::{level_color, RESET},
    log_target::LogTarget,
    logger_builder::{LoggerBuilder, NoLabel, NoTargets},
    Log, LogLevel,
};

pub(crate) struct LogSinks {
    pub(crate) min_level: LogLevel,
    pub(crate) targets: Vec<Box<dyn LogTarget + Send>>,
}

impl LogSinks {
    fn write(&mut self, log: Log) {
        let Log {
            label,
            level,
            message,
        } = log;

        if level < self.min_level {
            return;
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");

        let msg = format!(
            "{timestamp} [{label}] {level_color}{level}{RESET}: {message}",
            level_color = level_color(level),
        );

        let msg_no_color = format!("{timestamp} [{label}] {level}: {message}");

        for log_target in self.targets.iter_mut() {
            if log_target.supports_color() {
                log_target.write(&msg, level);
            } else {
                log_target.write(&msg_no_color, level);
            }
        }
    }
}

/// Explicitly constructed logging context.
///
/// Cloning is cheap and every clone writes to the same targets. Components
/// take a `Logger` at construction and usually derive their own label from
/// it with [`Logger::scoped`].
#[derive(Clone)]
pub struct Logger {
    label: &'static str,
    sinks: Option<Arc<Mutex<LogSinks>>>,
}

impl Logger {
    pub fn builder() -> LoggerBuilder<NoTargets, NoLabel> {
        LoggerBuilder::<NoTargets, NoLabel>::new()
    }

    pub(crate) fn from_parts(label: &'static str, sinks: LogSinks) -> Self {
        Self {
            label,
            sinks: Some(Arc::new(Mutex::new(sinks))),
        }
    }

    /// A logger that drops everything.
    pub fn disabled() -> Self {
        Self {
            label: "",
            sinks: None,
        }
    }

    /// Same targets, different label.
    pub fn scoped(&self, label: &'static str) -> Self {
        Self {
            label,
            sinks: self.sinks.clone(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn min_level(&self) -> Option<LogLevel> {
        self.sinks
            .as_ref()
            .map(|sinks| sinks.lock().unwrap_or_else(|err| err.into_inner()).min_level)
    }

    pub fn set_min_level(&self, level: LogLevel) {
        if let Some(sinks) = self.sinks.as_ref() {
            sinks.lock().unwrap_or_else(|err| err.into_inner()).min_level = level;
        }
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        self.min_level().is_some_and(|min| level >= min)
    }

    pub fn log(&self, level: LogLevel, message: String) {
        let Some(sinks) = self.sinks.as_ref() else {
            return;
        };

        sinks
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .write(Log {
                label: self.label,
                level,
                message,
            });
    }

    pub fn flush(&self) {
        if let Some(sinks) = self.sinks.as_ref() {
            sinks
                .lock()
                .unwrap_or_else(|err| err.into_inner())
                .targets
                .iter_mut()
                .for_each(|target| target.flush());
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("label", &self.label)
            .field("min_level", &self.min_level())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{info, warning, LogLevel, Logger, MemoryTarget};

    fn memory_logger(min_level: LogLevel) -> (Logger, MemoryTarget) {
        let target = MemoryTarget::default();
        let logger = Logger::builder()
            .with_label("Engine")
            .with_target(target.clone())
            .with_min_level(min_level)
            .build();
        (logger, target)
    }

    #[test]
    fn should_filter_below_min_level() {
        let (logger, target) = memory_logger(LogLevel::Warn);

        info!(logger, "not shown");
        warning!(logger, "shown {}", 1);

        let lines = target.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("[Engine] WARN: shown 1"));
    }

    #[test]
    fn scoped_logger_shares_targets() {
        let (logger, target) = memory_logger(LogLevel::Info);
        let shader_logger = logger.scoped("Shader");

        info!(shader_logger, "compiled");
        logger.set_min_level(LogLevel::Error);
        info!(shader_logger, "hidden");

        assert_eq!(target.lines().len(), 1);
        assert!(target.contains("[Shader] INFO: compiled"));
    }

    #[test]
    fn color_is_not_written_to_plain_targets() {
        let (logger, target) = memory_logger(LogLevel::Trace);

        info!(logger, "plain");

        assert!(!target.lines()[0].contains('\x1b'));
    }

    #[test]
    fn disabled_logger_accepts_nothing() {
        let logger = Logger::disabled();
        assert!(!logger.enabled(LogLevel::Fatal));
        info!(logger, "ignored");
    }
}
