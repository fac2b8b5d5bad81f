use anyhow::{Context, Result};
use log::{LevelFilter, Log, Metadata, Record};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Logger that writes to a rotating file and echoes important records to stderr
struct TurnosLogger {
    file_writer: Arc<Mutex<RollingFileAppender>>,
    file_level: LevelFilter,
    stderr_level: LevelFilter,
}

impl Log for TurnosLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.file_level || metadata.level() <= self.stderr_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level = record.level();
        let timestamp = chrono::Local::now();

        if level <= self.file_level
            && let Ok(mut writer) = self.file_writer.lock()
        {
            let _ = writeln!(
                writer,
                "{} [{}] {}: {}",
                timestamp.format("%Y-%m-%d %H:%M:%S"),
                level,
                record.target(),
                record.args()
            );
        }

        if level <= self.stderr_level {
            eprintln!("[{}] {}", level, record.args());
        }
    }

    fn flush(&self) {
        if let Ok(mut writer) = self.file_writer.lock() {
            let _ = writer.flush();
        }
    }
}

/// Parse log level string to LevelFilter
pub fn parse_level(level_str: &str) -> LevelFilter {
    match level_str.trim().to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Install the file logger as the global `log` backend
pub fn init_logger(log_file_path: &Path, file_level: &str, stderr_level: &str) -> Result<()> {
    let parent = log_file_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Invalid log file path {:?}", log_file_path))?;
    fs::create_dir_all(parent).context("Failed to create log directory")?;

    // tracing-appender rotates by time only, so keep a few days of files
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(3)
        .filename_prefix(
            log_file_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("turnos"),
        )
        .filename_suffix(
            log_file_path
                .extension()
                .and_then(|s| s.to_str())
                .unwrap_or("log"),
        )
        .build(parent)
        .context("Failed to create rotating file appender")?;

    let file_level = parse_level(file_level);
    let stderr_level = parse_level(stderr_level);

    let logger = TurnosLogger {
        file_writer: Arc::new(Mutex::new(file_appender)),
        file_level,
        stderr_level,
    };

    log::set_boxed_logger(Box::new(logger)).context("Failed to set global logger")?;
    log::set_max_level(file_level.max(stderr_level));

    Ok(())
}
