use crate::LogLevel;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const MAGENTA: &str = "\x1b[35m";
pub const GRAY: &str = "\x1b[90m";

pub fn level_color(level: LogLevel) -> String {
    match level {
        LogLevel::Trace => GRAY.to_string(),
        LogLevel::Debug => BLUE.to_string(),
        LogLevel::Info => GREEN.to_string(),
        LogLevel::Warn => YELLOW.to_string(),
        LogLevel::Error => RED.to_string(),
        LogLevel::Fatal => format!("{BOLD}{MAGENTA}"),
    }
}
