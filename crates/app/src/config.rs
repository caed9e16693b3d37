//! Application configuration: defaults, environment, builder overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use tui_stage_core::Theme;

use crate::types::{BLANK, DEFAULT_FPS, DEFAULT_STATIC_REFRESH_MS, MAX_FPS};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("frame rate {0} out of range (1..={max})", max = MAX_FPS)]
    InvalidFps(u32),

    #[error("cannot read theme {path}: {source}")]
    ThemeRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed theme {path}: {source}")]
    ThemeParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub fps: u32,
    pub background_char: char,
    pub log_path: Option<PathBuf>,
    pub theme_path: Option<PathBuf>,
    pub static_refresh_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            background_char: BLANK,
            log_path: None,
            theme_path: None,
            static_refresh_ms: DEFAULT_STATIC_REFRESH_MS,
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    let s = s.trim().to_string();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

impl AppConfig {
    /// Create from `TUI_STAGE_*` environment variables. Invalid values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// [`Self::from_env`] over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let fps = lookup("TUI_STAGE_FPS")
            .and_then(|s| s.trim().parse().ok())
            .filter(|fps| (1..=MAX_FPS).contains(fps))
            .unwrap_or(defaults.fps);

        let background_char = lookup("TUI_STAGE_BG_CHAR")
            .and_then(|s| {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => None,
                }
            })
            .unwrap_or(defaults.background_char);

        let log_path = lookup("TUI_STAGE_LOG_PATH").and_then(non_empty).map(PathBuf::from);
        let theme_path = lookup("TUI_STAGE_THEME_PATH").and_then(non_empty).map(PathBuf::from);

        let static_refresh_ms = lookup("TUI_STAGE_STATIC_REFRESH_MS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.static_refresh_ms);

        Self {
            fps,
            background_char,
            log_path,
            theme_path,
            static_refresh_ms,
        }
    }

    pub fn with_fps(mut self, fps: u32) -> Result<Self, ConfigError> {
        if !(1..=MAX_FPS).contains(&fps) {
            return Err(ConfigError::InvalidFps(fps));
        }
        self.fps = fps;
        Ok(self)
    }

    pub fn with_background_char(mut self, ch: char) -> Self {
        self.background_char = ch;
        self
    }

    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    pub fn with_theme_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.theme_path = Some(path.into());
        self
    }

    pub fn with_static_refresh_ms(mut self, ms: u64) -> Self {
        self.static_refresh_ms = ms;
        self
    }

    /// Time between frame ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }

    /// The configured theme, or the built-in one when no path is set.
    pub fn load_theme(&self) -> Result<Theme, ConfigError> {
        match &self.theme_path {
            Some(path) => load_theme_file(path),
            None => Ok(Theme::default()),
        }
    }
}

fn load_theme_file(path: &Path) -> Result<Theme, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::ThemeRead {
        path: path.to_path_buf(),
        source,
    })?;
    Theme::from_json(&json).map_err(|source| ConfigError::ThemeParse {
        path: path.to_path_buf(),
        source,
    })
}
