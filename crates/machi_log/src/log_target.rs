use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    path::PathBuf,
    sync::{Arc, Mutex},
};

use crate::LogLevel;

/// A destination for formatted log lines.
pub trait LogTarget {
    fn write(&mut self, message: &str, level: LogLevel);

    fn supports_color(&self) -> bool {
        false
    }

    fn flush(&mut self) {}
}

/// Writes to stdout, or to stderr for `Error` and above.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalTarget {
    pub no_color: bool,
}

impl LogTarget for TerminalTarget {
    fn write(&mut self, message: &str, level: LogLevel) {
        if level >= LogLevel::Error {
            let _ = writeln!(io::stderr().lock(), "{message}");
        } else {
            let _ = writeln!(io::stdout().lock(), "{message}");
        }
    }

    fn supports_color(&self) -> bool {
        !self.no_color
    }
}

/// Appends to a file. The file and its parent directories are created on the
/// first write, so a logger can be configured before the path exists.
#[derive(Debug)]
pub struct FileTarget {
    path: PathBuf,
    file: Option<File>,
    failed: bool,
}

impl FileTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
            failed: false,
        }
    }

    fn open(&mut self) -> io::Result<&mut File> {
        let file = match self.file.take() {
            Some(file) => file,
            None => {
                if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }

                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.path)?
            }
        };

        Ok(self.file.insert(file))
    }
}

impl LogTarget for FileTarget {
    fn write(&mut self, message: &str, _level: LogLevel) {
        if self.failed {
            return;
        }

        let result = self.open().and_then(|file| writeln!(file, "{message}"));

        if let Err(err) = result {
            // Reported once, then the target goes quiet.
            self.failed = true;
            eprintln!(
                "Could not write log file `{}`: {err}",
                self.path.display()
            );
        }
    }

    fn flush(&mut self) {
        if let Some(file) = self.file.as_mut() {
            let _ = file.flush();
        }
    }
}

/// Keeps lines in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct MemoryTarget {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryTarget {
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }

    pub fn clear(&self) {
        self.lines
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .clear();
    }
}

impl LogTarget for MemoryTarget {
    fn write(&mut self, message: &str, _level: LogLevel) {
        self.lines
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use super::*;

    #[test]
    fn file_target_creates_parent_dirs_and_appends() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("log").join("engine.log");

        let mut target = FileTarget::new(&path);
        target.write("first", LogLevel::Info);
        target.write("second", LogLevel::Warn);
        target.flush();

        let contents = std::fs::read_to_string(&path)?;
        assert_eq!(contents, "first\nsecond\n");

        Ok(())
    }

    #[test]
    fn memory_target_clones_share_lines() {
        let target = MemoryTarget::default();
        let mut writer = target.clone();

        writer.write("hello", LogLevel::Info);

        assert_eq!(target.lines(), vec!["hello".to_string()]);
        assert!(target.contains("hell"));
    }
}
