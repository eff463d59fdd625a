//! Ambient background scene: sizing, reconciliation and paced drawing.

use super::pacing::FramePacer;
use super::profile::CapabilityProfile;
use super::rain::{GlyphSurface, RainField};
use crate::constants::{AMBIENT_HEIGHT_BUFFER_PX, AMBIENT_HEIGHT_NOISE_PX};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Pixel size the canvas backing store should take.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Reduced motion: nothing is drawn, ever.
    Disabled,
    /// Under the frame budget; the caller still reschedules.
    Skipped,
    Drawn,
}

/// Document height is the largest of the available measurements
/// (`scrollHeight`, `offsetHeight`, `clientHeight` of body and root).
pub fn document_height(measurements: &[f64]) -> f64 {
    measurements
        .iter()
        .copied()
        .filter(|m| m.is_finite() && *m > 0.0)
        .fold(0.0, f64::max)
}

/// Canvas height required to cover a document of `document_height`.
#[inline]
pub fn covering_height(document_height: f64) -> f64 {
    document_height.max(0.0) + AMBIENT_HEIGHT_BUFFER_PX
}

/// Height the canvas is built at: coverage plus the noise slack, so growth
/// smaller than the slack needs no rebuild.
#[inline]
pub fn target_height(document_height: f64) -> f64 {
    (covering_height(document_height) + AMBIENT_HEIGHT_NOISE_PX).ceil()
}

pub struct AmbientScene {
    pacer: Option<FramePacer>,
    column_width: f64,
    field: RainField,
    rng: StdRng,
    frames_drawn: u64,
}

impl AmbientScene {
    pub fn new(profile: &CapabilityProfile, viewport_width: f64, document_height: f64) -> Self {
        Self::with_rng(profile, viewport_width, document_height, StdRng::from_entropy())
    }

    pub fn with_seed(
        profile: &CapabilityProfile,
        viewport_width: f64,
        document_height: f64,
        seed: u64,
    ) -> Self {
        Self::with_rng(
            profile,
            viewport_width,
            document_height,
            StdRng::seed_from_u64(seed),
        )
    }

    fn with_rng(
        profile: &CapabilityProfile,
        viewport_width: f64,
        document_height: f64,
        rng: StdRng,
    ) -> Self {
        let column_width = profile.ambient_column_width();
        Self {
            pacer: profile.ambient_fps().map(FramePacer::from_fps),
            column_width,
            field: RainField::new(
                viewport_width.floor(),
                target_height(document_height),
                column_width,
            ),
            rng,
            frames_drawn: 0,
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.pacer.is_some()
    }

    #[inline]
    pub fn field(&self) -> &RainField {
        &self.field
    }

    #[inline]
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn canvas_size(&self) -> CanvasSize {
        CanvasSize {
            width: self.field.width() as u32,
            height: self.field.height() as u32,
        }
    }

    pub fn frame_interval_ms(&self) -> Option<f64> {
        self.pacer.as_ref().map(FramePacer::interval_ms)
    }

    /// Re-measure against the current viewport width and document height.
    ///
    /// Returns the new canvas size when the field was rebuilt. The height is
    /// left alone while it stays between coverage and coverage plus twice the
    /// noise slack, so small mutations in either direction do not thrash. Any
    /// width change or shortfall in coverage rebuilds.
    pub fn reconcile(&mut self, viewport_width: f64, document_height: f64) -> Option<CanvasSize> {
        let width = viewport_width.max(0.0).floor();
        let needed = covering_height(document_height).ceil();
        let target = target_height(document_height);
        let current = self.field.height();
        let width_changed = width != self.field.width();
        let short = needed > current;
        let surplus = current - target > AMBIENT_HEIGHT_NOISE_PX;
        if !(width_changed || short || surplus) {
            return None;
        }
        log::debug!(
            "[ambient] reconcile {}x{} -> {}x{}",
            self.field.width(),
            current,
            width,
            target
        );
        self.field = RainField::new(width, target, self.column_width);
        Some(self.canvas_size())
    }

    /// Offer one animation-frame callback to the scene.
    pub fn frame(&mut self, now_ms: f64, surface: &mut dyn GlyphSurface) -> FrameOutcome {
        let Some(pacer) = self.pacer.as_mut() else {
            return FrameOutcome::Disabled;
        };
        if !pacer.should_draw(now_ms) {
            return FrameOutcome::Skipped;
        }
        self.field.step(&mut self.rng, surface);
        self.frames_drawn += 1;
        FrameOutcome::Drawn
    }
}
