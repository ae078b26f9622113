/// Logs through an explicit [`Logger`](crate::Logger). The message is only
/// formatted when the logger accepts `level`.
#[macro_export]
macro_rules! log {
    ($logger: expr, $log_level: expr, $($args:tt)*) => {{
        let logger: &$crate::Logger = &$logger;
        let level: $crate::LogLevel = $log_level;
        if logger.enabled(level) {
            logger.log(level, format!($($args)*));
        }
    }};
}

#[macro_export]
macro_rules! trace {
    ($logger: expr, $($args:tt)*) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($args)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($logger: expr, $($args:tt)*) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($args)*)
    };
}

#[macro_export]
macro_rules! info {
    ($logger: expr, $($args:tt)*) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($args)*)
    };
}

#[macro_export]
macro_rules! warning {
    ($logger: expr, $($args:tt)*) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($args)*)
    };
}

#[macro_export]
macro_rules! error {
    ($logger: expr, $($args:tt)*) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($args)*)
    };
}

#[macro_export]
macro_rules! fatal {
    ($logger: expr, $($args:tt)*) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($args)*)
    };
}
