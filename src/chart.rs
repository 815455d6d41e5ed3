//! Visualization sink.
//!
//! Renders a [`Report`] as a horizontal bar chart (green for reachable, red
//! for unreachable, one bar per target in report order), optionally saves it
//! as `ping_results_<YYYYMMDD_HHMMSS>.png` and shows it in a window.

mod render;
mod text;
mod window;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use image::{ImageFormat, RgbImage};
use thiserror::Error;

use crate::logging::LogSink;
use crate::report::Report;

pub use render::{
    AXIS_LABEL, CHART_TITLE, CHART_WIDTH, FAILURE_COLOR, Rect, SUCCESS_COLOR, bar_label, bar_rect,
    chart_height, render, status_color,
};
pub use window::{MAX_WINDOW_HEIGHT, show, to_argb_buffer, window_size};

/// Prefix of saved chart files.
pub const CHART_FILE_PREFIX: &str = "ping_results_";

/// Errors from saving or displaying a chart.
#[derive(Debug, Error)]
pub enum ChartError {
    /// PNG encoding failed.
    #[error("failed to encode chart image: {0}")]
    Image(#[from] image::ImageError),

    /// Output directory could not be prepared.
    #[error("chart I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No window could be opened or updated.
    #[error("failed to open chart window: {0}")]
    Window(String),
}

/// What to do with the rendered chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartOptions {
    /// Write a timestamped PNG.
    pub save: bool,
    /// Open a window.
    pub show: bool,
    /// Directory for saved charts.
    pub output_dir: PathBuf,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            save: false,
            show: true,
            output_dir: PathBuf::from("."),
        }
    }
}

/// File name for a chart saved at `now`.
pub fn chart_file_name(now: DateTime<Local>) -> String {
    format!("{}{}.png", CHART_FILE_PREFIX, now.format("%Y%m%d_%H%M%S"))
}

/// Write `image` as a PNG into `dir`, creating the directory if needed.
///
/// # Errors
/// Returns `ChartError` if the directory or file cannot be written.
pub fn save(image: &RgbImage, dir: impl AsRef<Path>) -> Result<PathBuf, ChartError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let path = dir.join(chart_file_name(Local::now()));
    image.save_with_format(&path, ImageFormat::Png)?;
    Ok(path)
}

/// Render the report and hand it to the configured outputs.
///
/// Saving is logged to the ping log (`Graph saved to ...` on success). A
/// window that cannot be opened is logged as a warning. Returns the saved
/// path.
pub fn publish(report: &Report, options: &ChartOptions, log: &LogSink) -> Option<PathBuf> {
    let image = render(report);
    let mut saved = None;

    if options.save {
        match save(&image, &options.output_dir) {
            Ok(path) => {
                log.info(format!("Graph saved to {}", path.display()));
                saved = Some(path);
            }
            Err(e) => log.error(format!("Failed to save graph: {e}")),
        }
    }

    if options.show {
        // Blocks until the window is closed.
        if let Err(e) = show(&image, CHART_TITLE) {
            log_display_failure(log, &e);
        }
    }

    saved
}

/// A chart that cannot be shown is recorded as a warning; the run goes on.
fn log_display_failure(log: &LogSink, error: &ChartError) {
    log.warn(format!("Failed to display graph: {error}"));
}
