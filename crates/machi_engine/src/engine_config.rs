use std::path::PathBuf;

use machi_config::ConfigSection;
use machi_log::{FileTarget, LogLevel, Logger, TerminalTarget};
use machi_window::WindowConfig;
use nalgebra_glm::{UVec2, Vec4};
use serde::Deserialize;

/// Engine settings, read from the `[engine]` section of the configuration
/// file. Every field falls back to its default when missing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub fullscreen: bool,
    pub vsync: bool,

    /// Mirrors log output into `log_file`.
    pub enable_logging: bool,
    pub log_file: PathBuf,
    pub log_level: LogLevel,

    /// Frame rate cap. `0` disables the limiter.
    pub target_fps: f32,
    pub show_fps_in_title: bool,

    pub clear_color: [f32; 4],
    pub enable_depth_test: bool,
    pub enable_blending: bool,
    pub msaa_samples: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_title: "Machi Engine".into(),
            window_width: 1024,
            window_height: 768,
            fullscreen: false,
            vsync: true,
            enable_logging: true,
            log_file: "engine.log".into(),
            log_level: LogLevel::Info,
            target_fps: 60.0,
            show_fps_in_title: true,
            clear_color: [0.2, 0.3, 0.3, 1.0],
            enable_depth_test: true,
            enable_blending: false,
            msaa_samples: 4,
        }
    }
}

impl ConfigSection for EngineConfig {
    fn section_name() -> &'static str {
        "engine"
    }
}

impl EngineConfig {
    pub fn window_size(&self) -> UVec2 {
        UVec2::new(self.window_width, self.window_height)
    }

    pub fn clear_color(&self) -> Vec4 {
        Vec4::from(self.clear_color)
    }

    pub fn window_config(&self) -> WindowConfig {
        let mut window = if self.fullscreen {
            WindowConfig::fullscreen_window(self.window_title.clone(), self.window_size())
        } else {
            WindowConfig::normal_window(self.window_title.clone(), self.window_size())
        };
        window.vsync = self.vsync;
        window.samples = self.msaa_samples;
        window
    }

    /// Root logger for an engine built from this config: the terminal,
    /// plus `log_file` when file logging is enabled.
    pub fn build_logger(&self, label: &'static str) -> Logger {
        let builder = Logger::builder()
            .with_label(label)
            .with_target(TerminalTarget::default())
            .with_min_level(self.log_level);

        if self.enable_logging {
            builder.with_target(FileTarget::new(&self.log_file)).build()
        } else {
            builder.build()
        }
    }
}

#[cfg(test)]
mod tests {
    use machi_config::Config;
    use machi_log::info;

    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = EngineConfig::default();

        assert_eq!(config.window_size(), UVec2::new(1024, 768));
        assert!(config.vsync);
        assert!(config.enable_depth_test);
        assert!(!config.enable_blending);
        assert_eq!(config.msaa_samples, 4);
        assert_eq!(config.clear_color(), Vec4::new(0.2, 0.3, 0.3, 1.0));
    }

    #[test]
    fn reads_the_engine_section() -> anyhow::Result<()> {
        let config = Config::parse(
            r#"
            [engine]
            window_title = "Demo"
            window_width = 640
            vsync = false
            log_level = "debug"
            clear_color = [0.0, 0.0, 0.0, 1.0]
            "#,
        )?;

        let engine = config.section::<EngineConfig>()?;

        assert_eq!(engine.window_title, "Demo");
        assert_eq!(engine.window_size(), UVec2::new(640, 768));
        assert!(!engine.vsync);
        assert_eq!(engine.log_level, LogLevel::Debug);
        assert_eq!(engine.clear_color, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(engine.msaa_samples, 4);

        Ok(())
    }

    #[test]
    fn missing_section_gives_defaults() -> anyhow::Result<()> {
        let config = Config::parse("[other]\nvalue = 1")?;
        assert_eq!(config.section::<EngineConfig>()?, EngineConfig::default());
        Ok(())
    }

    #[test]
    fn window_config_carries_display_settings() {
        let config = EngineConfig {
            fullscreen: true,
            vsync: false,
            msaa_samples: 8,
            ..Default::default()
        };

        let window = config.window_config();

        assert!(window.fullscreen);
        assert!(!window.vsync);
        assert_eq!(window.samples, 8);
        assert_eq!(window.title, "Machi Engine");
    }

    #[test]
    fn file_logging_follows_the_config() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let log_file = dir.path().join("engine.log");
        let config = EngineConfig {
            log_file: log_file.clone(),
            ..Default::default()
        };

        let logger = config.build_logger("Test");
        info!(logger, "written to disk");
        logger.flush();

        let contents = std::fs::read_to_string(&log_file)?;
        assert!(contents.contains("[Test] INFO: written to disk"));

        Ok(())
    }
}
