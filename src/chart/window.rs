//! Interactive chart window.

use image::RgbImage;
use minifb::{Key, ScaleMode, Window, WindowOptions};

use super::ChartError;

const TARGET_FPS: usize = 30;

/// Largest initial window height. Taller charts are scaled down to fit and
/// the window can be resized.
pub const MAX_WINDOW_HEIGHT: usize = 900;

/// Show `image` in a window and block until it is closed or Escape is
/// pressed.
///
/// # Errors
/// Returns `ChartError::Window` if no window can be opened (for example on a
/// machine without a display).
pub fn show(image: &RgbImage, title: &str) -> Result<(), ChartError> {
    let width = image.width() as usize;
    let height = image.height() as usize;
    let buffer = to_argb_buffer(image);

    let (window_width, window_height) = window_size(width, height);
    let options = WindowOptions {
        resize: true,
        scale_mode: ScaleMode::AspectRatioStretch,
        ..WindowOptions::default()
    };

    let mut window = Window::new(title, window_width, window_height, options)
        .map_err(|e| ChartError::Window(e.to_string()))?;
    window.set_target_fps(TARGET_FPS);

    while window.is_open() && !window.is_key_down(Key::Escape) {
        window
            .update_with_buffer(&buffer, width, height)
            .map_err(|e| ChartError::Window(e.to_string()))?;
    }

    Ok(())
}

/// Initial window size for a chart of `width` x `height` pixels, shrunk
/// with its aspect ratio kept when taller than [`MAX_WINDOW_HEIGHT`].
pub fn window_size(width: usize, height: usize) -> (usize, usize) {
    if height <= MAX_WINDOW_HEIGHT {
        return (width, height);
    }
    let scaled_width = (width * MAX_WINDOW_HEIGHT / height).max(1);
    (scaled_width, MAX_WINDOW_HEIGHT)
}

/// Pack RGB pixels as `0RGB` words, row-major, as the window expects.
pub fn to_argb_buffer(image: &RgbImage) -> Vec<u32> {
    image
        .pixels()
        .map(|pixel| {
            let [r, g, b] = pixel.0;
            (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
        })
        .collect()
}
