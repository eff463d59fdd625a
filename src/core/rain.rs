use crate::constants::{AMBIENT_FONT_SIZE_PX, AMBIENT_GLYPHS, AMBIENT_WRAP_CHANCE};
use rand::seq::SliceRandom;
use rand::Rng;

/// Drawing target for the ambient glyph rain. The browser implements this on
/// top of a 2D canvas context; tests record the calls.
pub trait GlyphSurface {
    /// Dim everything drawn so far so older glyphs leave a trail.
    fn fade(&mut self, width: f64, height: f64);
    fn draw_glyph(&mut self, glyph: char, x: f64, y: f64);
}

/// Column model for the ambient background.
///
/// The canvas is split into fixed-width columns and every column owns one fall
/// counter (in rows). A field is never patched in place: when the canvas
/// changes size a new field is built.
#[derive(Clone, Debug)]
pub struct RainField {
    width: f64,
    height: f64,
    column_width: f64,
    drops: Vec<u32>,
    glyphs: Vec<char>,
}

impl RainField {
    pub fn new(width: f64, height: f64, column_width: f64) -> Self {
        let width = sanitize(width);
        let height = sanitize(height);
        let column_width = if column_width.is_finite() && column_width >= 1.0 {
            column_width
        } else {
            1.0
        };
        let column_count = (width / column_width).floor() as usize;
        Self {
            width,
            height,
            column_width,
            drops: vec![1; column_count],
            glyphs: AMBIENT_GLYPHS.chars().collect(),
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[inline]
    pub fn column_width(&self) -> f64 {
        self.column_width
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.drops.len()
    }

    #[inline]
    pub fn drop_positions(&self) -> &[u32] {
        &self.drops
    }

    /// Draw one frame: fade, then one random glyph per column at its current
    /// offset, then advance every column. A column past the bottom edge
    /// restarts at the top only with a small per-frame chance, so columns
    /// drift apart over time.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R, surface: &mut dyn GlyphSurface) {
        surface.fade(self.width, self.height);
        for (i, drop) in self.drops.iter_mut().enumerate() {
            let glyph = self.glyphs.choose(rng).copied().unwrap_or('0');
            let x = i as f64 * self.column_width;
            let y = *drop as f64 * AMBIENT_FONT_SIZE_PX;
            surface.draw_glyph(glyph, x, y);
            if y > self.height && rng.gen_bool(AMBIENT_WRAP_CHANCE) {
                *drop = 0;
            }
            *drop = drop.saturating_add(1);
        }
    }
}

#[inline]
fn sanitize(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}
