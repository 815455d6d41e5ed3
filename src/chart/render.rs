//! Rasterizes a [`Report`] as a horizontal status bar chart.

use image::{Rgb, RgbImage};

use super::text::{Typeface, bundled};
use crate::probe::ProbeOutcome;
use crate::report::Report;

// =============================================================================
// Layout
// =============================================================================

/// Chart title.
pub const CHART_TITLE: &str = "Ping Results per Department";

/// X-axis label.
pub const AXIS_LABEL: &str = "Ping Status";

pub const CHART_WIDTH: u32 = 900;

const MARGIN_X: u32 = 60;
const TITLE_TOP: u32 = 20;
const TITLE_SIZE: f32 = 28.0;
const LEGEND_TOP: u32 = 64;
const LEGEND_SWATCH: (u32, u32) = (32, 8);
const PLOT_TOP: u32 = 100;
const ROW_HEIGHT: u32 = 84;
const ROW_GAP: u32 = 16;
const AXIS_BAND: u32 = 60;
const TEXT_SIZE: f32 = 18.0;
const MIN_TEXT_SIZE: f32 = 11.0;
const LINE_SPACING: u32 = 6;

// =============================================================================
// Colors
// =============================================================================

pub const SUCCESS_COLOR: Rgb<u8> = Rgb([0, 128, 0]);
pub const FAILURE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const FRAME: Rgb<u8> = Rgb([51, 51, 51]);
const INK: Rgb<u8> = Rgb([0, 0, 0]);
const BAR_TEXT: Rgb<u8> = Rgb([255, 255, 255]);

/// Pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn center(&self) -> (u32, u32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// Image height needed for `rows` bars.
pub fn chart_height(rows: usize) -> u32 {
    PLOT_TOP + plot_height(rows) + AXIS_BAND
}

fn plot_height(rows: usize) -> u32 {
    rows as u32 * (ROW_HEIGHT + ROW_GAP) + ROW_GAP
}

/// Rectangle of the bar in row `index`, counted from the top.
pub fn bar_rect(index: usize) -> Rect {
    Rect {
        x: MARGIN_X,
        y: PLOT_TOP + ROW_GAP + index as u32 * (ROW_HEIGHT + ROW_GAP),
        width: CHART_WIDTH - 2 * MARGIN_X,
        height: ROW_HEIGHT,
    }
}

/// Bar color for an outcome.
pub fn status_color(outcome: &ProbeOutcome) -> Rgb<u8> {
    if outcome.succeeded {
        SUCCESS_COLOR
    } else {
        FAILURE_COLOR
    }
}

/// Text drawn on an outcome's bar, top to bottom.
pub fn bar_label(outcome: &ProbeOutcome) -> [String; 3] {
    [
        outcome.target.name.clone(),
        outcome.timestamp.clone(),
        format!("Avg RTT: {}", outcome.average_rtt),
    ]
}

/// Draw the chart: one full-width bar per outcome, first outcome on top.
pub fn render(report: &Report) -> RgbImage {
    let typeface = bundled();
    let height = chart_height(report.len());
    let mut image = RgbImage::from_pixel(CHART_WIDTH, height, BACKGROUND);

    draw_centered(&mut image, typeface, CHART_WIDTH / 2, TITLE_TOP, CHART_TITLE, TITLE_SIZE, INK);
    draw_legend(&mut image, typeface);

    let plot = Rect {
        x: MARGIN_X - 1,
        y: PLOT_TOP,
        width: CHART_WIDTH - 2 * MARGIN_X + 2,
        height: plot_height(report.len()),
    };
    stroke_rect(&mut image, plot, FRAME);

    for (index, outcome) in report.iter().enumerate() {
        let bar = bar_rect(index);
        fill_rect(&mut image, bar, status_color(outcome));
        draw_bar_label(&mut image, typeface, bar, &bar_label(outcome));
    }

    draw_centered(
        &mut image,
        typeface,
        CHART_WIDTH / 2,
        plot.y + plot.height + AXIS_BAND / 3,
        AXIS_LABEL,
        TEXT_SIZE,
        INK,
    );

    image
}

/// Lines are shrunk to fit the bar, and only cut short when even the
/// smallest size is too wide.
fn draw_bar_label(image: &mut RgbImage, typeface: &Typeface, bar: Rect, lines: &[String]) {
    let line_height = typeface.line_height(TEXT_SIZE).ceil() as u32;
    let count = lines.len() as u32;
    let block = count * line_height + count.saturating_sub(1) * LINE_SPACING;
    let max_width = (bar.width - 2 * LINE_SPACING) as f32;
    let (center_x, center_y) = bar.center();
    let mut y = center_y.saturating_sub(block / 2);

    for line in lines {
        let size = typeface.fit_size(line, max_width, TEXT_SIZE, MIN_TEXT_SIZE);
        let line = typeface.ellipsize(line, max_width, size);
        let slack = (typeface.line_height(TEXT_SIZE) - typeface.line_height(size)) / 2.0;
        draw_centered(image, typeface, center_x, y + slack as u32, &line, size, BAR_TEXT);
        y += line_height + LINE_SPACING;
    }
}

/// Legend centred above the plot: a swatch and label per status.
fn draw_legend(image: &mut RgbImage, typeface: &Typeface) {
    let entries = [(SUCCESS_COLOR, "Successful"), (FAILURE_COLOR, "Failed")];
    let (swatch_w, swatch_h) = LEGEND_SWATCH;
    let gap = 10;
    let entry_gap = 30;

    let label_width = |label: &str| typeface.text_width(label, TEXT_SIZE).ceil() as u32;
    let total: u32 = entries
        .iter()
        .map(|(_, label)| swatch_w + gap + label_width(label))
        .sum::<u32>()
        + entry_gap * (entries.len() as u32 - 1);

    let text_h = typeface.line_height(TEXT_SIZE).ceil() as u32;
    let mut x = (CHART_WIDTH - total) / 2;
    for (color, label) in entries {
        fill_rect(
            image,
            Rect {
                x,
                y: LEGEND_TOP + text_h.saturating_sub(swatch_h) / 2,
                width: swatch_w,
                height: swatch_h,
            },
            color,
        );
        x += swatch_w + gap;
        typeface.draw(image, x as f32, LEGEND_TOP as f32, label, TEXT_SIZE, INK);
        x += label_width(label) + entry_gap;
    }
}

fn draw_centered(
    image: &mut RgbImage,
    typeface: &Typeface,
    center_x: u32,
    y: u32,
    text: &str,
    size: f32,
    color: Rgb<u8>,
) {
    let x = center_x as f32 - typeface.text_width(text, size) / 2.0;
    typeface.draw(image, x, y as f32, text, size, color);
}

/// Set a pixel if it lies inside the image.
fn put_pixel_clipped(image: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x < 0 || y < 0 || x >= i64::from(image.width()) || y >= i64::from(image.height()) {
        return;
    }
    image.put_pixel(x as u32, y as u32, color);
}

fn fill_rect(image: &mut RgbImage, rect: Rect, color: Rgb<u8>) {
    for y in rect.y..rect.y + rect.height {
        for x in rect.x..rect.x + rect.width {
            put_pixel_clipped(image, x as i64, y as i64, color);
        }
    }
}

fn stroke_rect(image: &mut RgbImage, rect: Rect, color: Rgb<u8>) {
    let right = (rect.x + rect.width - 1) as i64;
    let bottom = (rect.y + rect.height - 1) as i64;
    for x in rect.x as i64..=right {
        put_pixel_clipped(image, x, rect.y as i64, color);
        put_pixel_clipped(image, x, bottom, color);
    }
    for y in rect.y as i64..=bottom {
        put_pixel_clipped(image, rect.x as i64, y, color);
        put_pixel_clipped(image, right, y, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Target;

    fn outcome(name: &str, succeeded: bool) -> ProbeOutcome {
        let target = Target::new(name, "10.0.0.1");
        if succeeded {
            ProbeOutcome::success(target, "Reply from", "2024-05-01 09:30:00", Some("12ms".into()))
        } else {
            ProbeOutcome::failure(target, "Ping timed out", "2024-05-01 09:30:05")
        }
    }

    /// Color just inside the bar's top-left corner, clear of any text.
    fn bar_color(image: &RgbImage, index: usize) -> Rgb<u8> {
        let bar = bar_rect(index);
        *image.get_pixel(bar.x + 2, bar.y + 2)
    }

    #[test]
    fn test_render_rows_follow_report_order() {
        let report: Report = vec![
            outcome("HQ", true),
            outcome("Branch", false),
            outcome("Depot", true),
        ]
        .into_iter()
        .collect();

        let image = render(&report);

        assert_eq!(image.width(), CHART_WIDTH);
        assert_eq!(image.height(), chart_height(3));
        assert_eq!(bar_color(&image, 0), SUCCESS_COLOR);
        assert_eq!(bar_color(&image, 1), FAILURE_COLOR);
        assert_eq!(bar_color(&image, 2), SUCCESS_COLOR);
        assert!(bar_rect(0).y < bar_rect(1).y);
    }

    fn bar_pixels(image: &RgbImage, index: usize) -> Vec<Rgb<u8>> {
        let bar = bar_rect(index);
        (bar.y..bar.y + bar.height)
            .flat_map(|y| (bar.x..bar.x + bar.width).map(move |x| (x, y)))
            .map(|(x, y)| *image.get_pixel(x, y))
            .collect()
    }

    fn single_bar(name: &str) -> RgbImage {
        let report: Report = vec![outcome(name, true)].into_iter().collect();
        render(&report)
    }

    #[test]
    fn test_render_annotates_bars() {
        let image = single_bar("HQ");
        assert!(bar_pixels(&image, 0).iter().any(|p| *p != SUCCESS_COLOR));
    }

    #[test]
    fn test_bar_names_keep_case_and_accents() {
        assert_ne!(bar_pixels(&single_bar("Sales"), 0), bar_pixels(&single_bar("SALES"), 0));
        assert_ne!(bar_pixels(&single_bar("Zürich"), 0), bar_pixels(&single_bar("Z?rich"), 0));
    }

    #[test]
    fn test_long_name_stays_inside_bar() {
        let name = "Research and Development Laboratory, North Campus Building 7, Floor 3";
        let image = single_bar(name);
        let bar = bar_rect(0);

        // Columns just outside the bar stay background.
        for y in bar.y..bar.y + bar.height {
            assert_eq!(*image.get_pixel(bar.x - 2, y), BACKGROUND);
            assert_eq!(*image.get_pixel(bar.x + bar.width + 2, y), BACKGROUND);
        }
    }

    #[test]
    fn test_render_empty_report() {
        let image = render(&Report::new());
        assert_eq!(image.height(), chart_height(0));

        // Legend swatches are still drawn.
        let legend_has_green = image.pixels().any(|p| *p == SUCCESS_COLOR);
        let legend_has_red = image.pixels().any(|p| *p == FAILURE_COLOR);
        assert!(legend_has_green && legend_has_red);
    }

    #[test]
    fn test_bar_label() {
        let label = bar_label(&outcome("HQ", true));
        assert_eq!(label, ["HQ", "2024-05-01 09:30:00", "Avg RTT: 12ms"]);

        let label = bar_label(&outcome("Branch", false));
        assert_eq!(label[2], "Avg RTT: N/A");
    }

    #[test]
    fn test_chart_height_grows_per_row() {
        assert_eq!(chart_height(2) - chart_height(1), ROW_HEIGHT + ROW_GAP);
    }
}
