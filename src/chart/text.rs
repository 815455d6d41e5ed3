//! Anti-aliased label rendering onto the chart raster.
//!
//! Glyphs are rasterized with `ab_glyph` from the fonts egui ships in
//! `epaint_default_fonts`: Ubuntu Light for text, then Hack and Noto Emoji as
//! fallbacks for characters the primary face lacks.

use std::sync::OnceLock;

use ab_glyph::{Font, FontRef, Glyph, GlyphId, InvalidFont, PxScale, ScaleFont, point};
use image::{Rgb, RgbImage};

/// Appended to labels that are cut short.
pub const ELLIPSIS: char = '\u{2026}';

/// An ordered set of font faces. The first face sets the line metrics; each
/// character is drawn with the first face that has a glyph for it.
pub struct Typeface {
    faces: Vec<FontRef<'static>>,
}

impl Typeface {
    /// Parse a primary face and its fallbacks.
    ///
    /// # Errors
    /// Returns `InvalidFont` if any face is not a usable TrueType/OpenType
    /// font.
    pub fn new(primary: &'static [u8], fallbacks: &[&'static [u8]]) -> Result<Self, InvalidFont> {
        let faces = std::iter::once(primary)
            .chain(fallbacks.iter().copied())
            .map(FontRef::try_from_slice)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { faces })
    }

    /// Whether some face has a real glyph for `c`.
    pub fn covers(&self, c: char) -> bool {
        self.faces.iter().any(|face| face.glyph_id(c).0 != 0)
    }

    /// Width of `text` in pixels at `size`.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        self.layout(text, size).1
    }

    /// Height of one line in pixels at `size`.
    pub fn line_height(&self, size: f32) -> f32 {
        self.faces[0].as_scaled(PxScale::from(size)).height()
    }

    /// Largest size up to `size` at which `text` fits in `max_width`, but
    /// never below `min_size`.
    pub fn fit_size(&self, text: &str, max_width: f32, size: f32, min_size: f32) -> f32 {
        let width = self.text_width(text, size);
        if width <= max_width || width <= 0.0 {
            return size;
        }
        (size * max_width / width).clamp(min_size.min(size), size)
    }

    /// Cut `text` and append an ellipsis until it fits in `max_width`.
    pub fn ellipsize(&self, text: &str, max_width: f32, size: f32) -> String {
        if self.text_width(text, size) <= max_width {
            return text.to_string();
        }
        let mut kept: Vec<char> = text.chars().collect();
        while kept.pop().is_some() {
            let candidate: String = kept.iter().copied().chain([ELLIPSIS]).collect();
            if self.text_width(&candidate, size) <= max_width {
                return candidate;
            }
        }
        ELLIPSIS.to_string()
    }

    /// Draw `text` with the top of its line box at `top` and its left edge
    /// at `x`, blending by glyph coverage. Pixels outside the image are
    /// skipped.
    pub fn draw(&self, image: &mut RgbImage, x: f32, top: f32, text: &str, size: f32, color: Rgb<u8>) {
        let baseline = top + self.faces[0].as_scaled(PxScale::from(size)).ascent();
        let (glyphs, _) = self.layout(text, size);

        for (face_index, mut glyph) in glyphs {
            glyph.position = point(x + glyph.position.x, baseline);
            let Some(outlined) = self.faces[face_index].outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i64 + i64::from(gx);
                let py = bounds.min.y as i64 + i64::from(gy);
                blend_pixel(image, px, py, color, coverage);
            });
        }
    }

    /// Face used for `c`, falling back to the primary face's missing glyph.
    fn resolve(&self, c: char) -> (usize, GlyphId) {
        self.faces
            .iter()
            .enumerate()
            .map(|(index, face)| (index, face.glyph_id(c)))
            .find(|(_, id)| id.0 != 0)
            .unwrap_or_else(|| (0, self.faces[0].glyph_id(c)))
    }

    /// Glyphs on a baseline at y = 0, starting at x = 0, and the total
    /// advance.
    fn layout(&self, text: &str, size: f32) -> (Vec<(usize, Glyph)>, f32) {
        let scale = PxScale::from(size);
        let mut glyphs = Vec::with_capacity(text.len());
        let mut caret = 0.0;
        let mut previous: Option<(usize, GlyphId)> = None;

        for c in text.chars() {
            let (face_index, id) = self.resolve(c);
            let face = self.faces[face_index].as_scaled(scale);
            if let Some((previous_face, previous_id)) = previous {
                if previous_face == face_index {
                    caret += face.kern(previous_id, id);
                }
            }
            glyphs.push((face_index, id.with_scale_and_position(scale, point(caret, 0.0))));
            caret += face.h_advance(id);
            previous = Some((face_index, id));
        }

        (glyphs, caret)
    }
}

/// The fonts bundled with the crate, parsed once.
pub fn bundled() -> &'static Typeface {
    static BUNDLED: OnceLock<Typeface> = OnceLock::new();

    BUNDLED.get_or_init(|| {
        Typeface::new(
            epaint_default_fonts::UBUNTU_LIGHT,
            &[
                epaint_default_fonts::HACK_REGULAR,
                epaint_default_fonts::NOTO_EMOJI_REGULAR,
            ],
        )
        .expect("failed to parse bundled fonts")
    })
}

fn blend_pixel(image: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= i64::from(image.width()) || y >= i64::from(image.height()) {
        return;
    }
    let coverage = coverage.clamp(0.0, 1.0);
    if coverage == 0.0 {
        return;
    }
    let pixel = image.get_pixel_mut(x as u32, y as u32);
    for (dst, src) in pixel.0.iter_mut().zip(color.0) {
        *dst = (f32::from(*dst) * (1.0 - coverage) + f32::from(src) * coverage).round() as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INK: Rgb<u8> = Rgb([0, 0, 0]);
    const PAPER: Rgb<u8> = Rgb([255, 255, 255]);

    fn drawn(text: &str) -> RgbImage {
        let mut image = RgbImage::from_pixel(200, 40, PAPER);
        bundled().draw(&mut image, 4.0, 4.0, text, 20.0, INK);
        image
    }

    #[test]
    fn test_draw_sets_pixels() {
        let image = drawn("HQ");
        assert!(image.pixels().any(|p| *p != PAPER));
        assert!(drawn("").pixels().all(|p| *p == PAPER));
    }

    #[test]
    fn test_case_is_preserved() {
        assert_ne!(drawn("Sales"), drawn("SALES"));
        assert_ne!(drawn("hq"), drawn("HQ"));
    }

    #[test]
    fn test_non_ascii_names_render_their_own_glyphs() {
        let typeface = bundled();
        assert!(typeface.covers('ü'));
        assert!(typeface.covers('é'));
        assert_ne!(drawn("Zürich"), drawn("Z?rich"));
        assert_ne!(drawn("Zürich"), drawn("Zurich"));
    }

    #[test]
    fn test_text_width() {
        let typeface = bundled();
        assert_eq!(typeface.text_width("", 18.0), 0.0);
        let short = typeface.text_width("HQ", 18.0);
        let long = typeface.text_width("HQ Annex", 18.0);
        assert!(short > 0.0);
        assert!(long > short);
        assert!(typeface.text_width("HQ", 36.0) > short);
        assert!(typeface.line_height(18.0) > 0.0);
    }

    #[test]
    fn test_fit_size_shrinks_long_text() {
        let typeface = bundled();
        assert_eq!(typeface.fit_size("HQ", 500.0, 18.0, 10.0), 18.0);

        let name = "Research and Development Laboratory, North Campus Building 7";
        let size = typeface.fit_size(name, 300.0, 18.0, 10.0);
        assert!(size < 18.0);
        assert!(size >= 10.0);
    }

    #[test]
    fn test_ellipsize() {
        let typeface = bundled();
        assert_eq!(typeface.ellipsize("HQ", 500.0, 18.0), "HQ");

        let cut = typeface.ellipsize("Research and Development", 80.0, 18.0);
        assert!(cut.ends_with(ELLIPSIS));
        assert!(cut.starts_with("Res"));
        assert!(typeface.text_width(&cut, 18.0) <= 80.0);
    }

    #[test]
    fn test_draw_clips_at_edges() {
        let mut image = RgbImage::from_pixel(4, 4, PAPER);
        bundled().draw(&mut image, -6.0, -6.0, "WWW", 24.0, INK);
        bundled().draw(&mut image, 2.0, 2.0, "WWW", 24.0, INK);
    }
}
