use std::marker::PhantomData;

use machi_core::builder::BuilderTypeState;

use crate::{
    log_target::LogTarget,
    logger::{LogSinks, Logger},
    LogLevel,
};

pub struct HasTargets;

pub struct NoTargets;

pub struct HasLabel;

pub struct NoLabel;

impl BuilderTypeState for HasTargets {}

impl BuilderTypeState for NoTargets {}

impl BuilderTypeState for HasLabel {}

impl BuilderTypeState for NoLabel {}

pub struct LoggerBuilder<T: BuilderTypeState, L: BuilderTypeState> {
    targets: Vec<Box<dyn LogTarget + Send>>,
    label: &'static str,
    min_level: LogLevel,
    _phantom: PhantomData<(T, L)>,
}

impl LoggerBuilder<NoTargets, NoLabel> {
    pub fn new() -> Self {
        LoggerBuilder {
            targets: Vec::new(),
            label: "",
            min_level: LogLevel::default(),
            _phantom: PhantomData,
        }
    }
}

impl Default for LoggerBuilder<NoTargets, NoLabel> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: BuilderTypeState, L: BuilderTypeState> LoggerBuilder<T, L> {
    pub fn with_label(self, label: &'static str) -> LoggerBuilder<T, HasLabel> {
        LoggerBuilder {
            targets: self.targets,
            label,
            min_level: self.min_level,
            _phantom: PhantomData,
        }
    }

    pub fn with_target<Target>(mut self, target: Target) -> LoggerBuilder<HasTargets, L>
    where
        Target: LogTarget + Send + 'static,
    {
        self.targets.push(Box::new(target));

        LoggerBuilder {
            targets: self.targets,
            label: self.label,
            min_level: self.min_level,
            _phantom: PhantomData,
        }
    }

    pub fn with_min_level(self, level: LogLevel) -> Self {
        Self {
            min_level: level,
            ..self
        }
    }
}

impl LoggerBuilder<HasTargets, HasLabel> {
    pub fn build(self) -> Logger {
        Logger::from_parts(
            self.label,
            LogSinks {
                min_level: self.min_level,
                targets: self.targets,
            },
        )
    }
}
