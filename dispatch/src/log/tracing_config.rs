// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::ops::Add;
use tracing_core::LevelFilter;

pub const DEFAULT_LOG_FILE_NAME: &str = "dispatch_log.txt";

/// Configure the tracing logging to suit your needs. You can display the logs to a:
/// 1. file,
/// 2. stdout or stderr,
/// 3. both.
///
/// This configuration also allows you to set the log level. Logging is disabled when
/// `level_filter` is [`LevelFilter::OFF`] or `writer_config` is [`WriterConfig::None`].
///
/// Anything that converts [`Into<TracingConfig>`] can be passed to
/// [`crate::try_initialize_logging_global()`], and configs can be combined with `+`:
///
/// ```
/// use r3bl_dispatch::{DisplayPreference, TracingConfig, WriterConfig};
/// use tracing_core::LevelFilter;
///
/// let config = TracingConfig::from(LevelFilter::TRACE)
///     + TracingConfig::from(DisplayPreference::Stderr);
/// assert_eq!(config.level_filter, LevelFilter::TRACE);
/// assert_eq!(
///     config.writer_config,
///     WriterConfig::DisplayAndFile(DisplayPreference::Stderr, "dispatch_log.txt".into())
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TracingConfig {
    pub writer_config: WriterConfig,
    pub level_filter: LevelFilter,
}

/// Where to write the logs. The `String` is the path of the log file, eg:
/// `/tmp/dispatch_log.txt` or `dispatch_log.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriterConfig {
    None,
    Display(DisplayPreference),
    File(String),
    DisplayAndFile(DisplayPreference, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPreference {
    Stdout,
    Stderr,
}

impl TracingConfig {
    pub fn new_display(preferred_display: DisplayPreference) -> Self {
        Self::from(preferred_display)
    }

    pub fn new_file(filename: Option<String>) -> Self {
        Self::from(WriterConfig::File(
            filename.unwrap_or_else(|| DEFAULT_LOG_FILE_NAME.to_string()),
        ))
    }

    pub fn get_writer_config(&self) -> WriterConfig { self.writer_config.clone() }

    pub fn get_level_filter(&self) -> LevelFilter { self.level_filter }

    pub fn is_disabled(&self) -> bool {
        self.level_filter == LevelFilter::OFF || self.writer_config == WriterConfig::None
    }
}

impl From<tracing::Level> for TracingConfig {
    fn from(level: tracing::Level) -> Self { Self::from(LevelFilter::from_level(level)) }
}

impl From<LevelFilter> for TracingConfig {
    fn from(level_filter: LevelFilter) -> Self {
        Self {
            level_filter,
            writer_config: WriterConfig::File(DEFAULT_LOG_FILE_NAME.to_string()),
        }
    }
}

impl From<DisplayPreference> for TracingConfig {
    fn from(preferred_display: DisplayPreference) -> Self {
        Self {
            level_filter: LevelFilter::DEBUG,
            writer_config: WriterConfig::Display(preferred_display),
        }
    }
}

impl From<WriterConfig> for TracingConfig {
    fn from(writer_config: WriterConfig) -> Self {
        Self {
            level_filter: LevelFilter::DEBUG,
            writer_config,
        }
    }
}

/// The more verbose level wins, writer configs are merged with [`WriterConfig`]'s `+`.
impl Add<TracingConfig> for TracingConfig {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            level_filter: self.level_filter.max(rhs.level_filter),
            writer_config: self.writer_config + rhs.writer_config,
        }
    }
}

/// Display and file settings are merged. When both sides have the same kind of setting,
/// the right hand side wins.
impl Add<WriterConfig> for WriterConfig {
    type Output = Self;

    fn add(self, rhs: WriterConfig) -> Self::Output {
        use WriterConfig::{Display, DisplayAndFile, File, None};

        match (self, rhs) {
            (None, it) | (it, None) => it,
            (Display(_), Display(display)) => Display(display),
            (File(_), File(file)) => File(file),
            (Display(display), File(file))
            | (File(file), Display(display))
            | (DisplayAndFile(_, file), Display(display))
            | (DisplayAndFile(display, _), File(file))
            | (Display(_) | File(_) | DisplayAndFile(..), DisplayAndFile(display, file)) => {
                DisplayAndFile(display, file)
            }
        }
    }
}
