//! Ping log sink.
//!
//! [`LogSink`] appends one `<timestamp> - <LEVEL> - <message>` line per record
//! to a log file and mirrors every record to `tracing` for the console. Each
//! line is flushed as soon as it is written, so an interrupted run still
//! leaves the history of the probes that completed.
//!
//! Write failures are swallowed: logging never aborts probing.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Local};

/// Default log file path.
pub const DEFAULT_LOG_PATH: &str = "ping.log";

/// Timestamp layout at the start of every log line.
const LINE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only, line-oriented log writer.
///
/// The writer sits behind a mutex so the sink can be shared by reference and
/// lines never interleave.
pub struct LogSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl LogSink {
    /// Open (or create) a log file in append mode.
    ///
    /// # Errors
    /// Returns the I/O error if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self::from_writer(file))
    }

    /// Wrap an arbitrary writer.
    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.record(LogLevel::Info, message.as_ref());
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.record(LogLevel::Warning, message.as_ref());
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.record(LogLevel::Error, message.as_ref());
    }

    /// Write one record. Never fails.
    pub fn record(&self, level: LogLevel, message: &str) {
        let message = fold_lines(message);

        match level {
            LogLevel::Info => tracing::info!("{message}"),
            LogLevel::Warning => tracing::warn!("{message}"),
            LogLevel::Error => tracing::error!("{message}"),
        }

        let line = format_line(Local::now(), level, &message);
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        if let Err(e) = writer
            .write_all(line.as_bytes())
            .and_then(|()| writer.flush())
        {
            tracing::debug!(error = %e, "Dropped ping log line");
        }
    }

    /// Flush buffered output. Called once at shutdown.
    pub fn flush(&self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

impl fmt::Debug for LogSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogSink").finish_non_exhaustive()
    }
}

/// Render a complete log line, including the trailing newline.
pub fn format_line(now: DateTime<Local>, level: LogLevel, message: &str) -> String {
    format!(
        "{} - {} - {}\n",
        now.format(LINE_TIMESTAMP_FORMAT),
        level,
        fold_lines(message)
    )
}

/// Collapse multi-line text (such as raw ping output) into a single line.
///
/// Blank lines are dropped and the rest are trimmed and joined with ` | `.
pub fn fold_lines(text: &str) -> String {
    if !text.contains(['\n', '\r']) {
        return text.trim().to_string();
    }
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::other("disk full"))
        }
    }

    #[test]
    fn test_format_line_layout() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let line = format_line(now, LogLevel::Error, "Ping to HQ at 10.0.0.1 timed out.");
        assert_eq!(
            line,
            "2024-03-09 07:05:01,000 - ERROR - Ping to HQ at 10.0.0.1 timed out.\n"
        );
    }

    #[test]
    fn test_fold_lines() {
        assert_eq!(fold_lines("single"), "single");
        assert_eq!(
            fold_lines("\nPinging 10.0.0.1\r\n\r\nReply from 10.0.0.1\n  Average = 12ms\n"),
            "Pinging 10.0.0.1 | Reply from 10.0.0.1 | Average = 12ms"
        );
    }

    #[test]
    fn test_record_writes_one_line_per_call() {
        let buf = SharedBuf::default();
        let sink = LogSink::from_writer(buf.clone());

        sink.info("first\nwith detail");
        sink.error("second");
        sink.warn("third");

        let contents = buf.contents();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with(" - INFO - first | with detail"));
        assert!(lines[1].ends_with(" - ERROR - second"));
        assert!(lines[2].ends_with(" - WARNING - third"));
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let sink = LogSink::from_writer(BrokenWriter);
        sink.error("nobody will read this");
        sink.flush();
    }

    #[test]
    fn test_open_appends_across_sinks() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ping.log");

        LogSink::open(&path).unwrap().info("run one");
        LogSink::open(&path).unwrap().info("run two");

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("run one"));
        assert!(lines[1].ends_with("run two"));
    }

    #[test]
    fn test_open_fails_for_missing_directory() {
        let dir = tempdir().unwrap();
        let result = LogSink::open(dir.path().join("no/such/dir/ping.log"));
        assert!(result.is_err());
    }
}
