//! Device capability snapshot and the tuning derived from it.
//!
//! A [`CapabilityProfile`] is computed once per page from raw [`DeviceSignals`]
//! and then shared read-only by every presentation component. Probing the
//! browser lives behind [`CapabilityDetector`] so tests can substitute a fixed
//! profile.

use crate::constants::{
    AMBIENT_COLUMN_WIDTH_CONSTRAINED_PX, AMBIENT_COLUMN_WIDTH_PX, AMBIENT_FPS,
    AMBIENT_FPS_CONSTRAINED, LOW_END_MAX_CORES, MOBILE_BREAKPOINT_PX, SLOW_EFFECTIVE_TYPES,
};

/// Raw signals read from the environment. Every field is optional; a missing
/// signal means "unconstrained".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeviceSignals {
    pub viewport_width: Option<f64>,
    pub hardware_concurrency: Option<u32>,
    pub prefers_reduced_motion: Option<bool>,
    pub effective_type: Option<String>,
    pub save_data: Option<bool>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CapabilityProfile {
    pub is_mobile: bool,
    pub is_low_end_device: bool,
    pub prefers_reduced_motion: bool,
    pub is_slow_connection: bool,
}

impl CapabilityProfile {
    pub fn from_signals(signals: &DeviceSignals) -> Self {
        let is_mobile = signals
            .viewport_width
            .filter(|w| w.is_finite() && *w > 0.0)
            .map(|w| w < MOBILE_BREAKPOINT_PX)
            .unwrap_or(false);
        // Browsers report 0 when they hide the value.
        let is_low_end_device = signals
            .hardware_concurrency
            .filter(|c| *c > 0)
            .map(|c| c <= LOW_END_MAX_CORES)
            .unwrap_or(false);
        let is_slow_connection = signals.save_data.unwrap_or(false)
            || signals
                .effective_type
                .as_deref()
                .map(|t| SLOW_EFFECTIVE_TYPES.contains(&t))
                .unwrap_or(false);
        Self {
            is_mobile,
            is_low_end_device,
            prefers_reduced_motion: signals.prefers_reduced_motion.unwrap_or(false),
            is_slow_connection,
        }
    }

    /// Mobile or low-end hardware; both get the cheaper animation settings.
    #[inline]
    pub fn is_constrained(&self) -> bool {
        self.is_mobile || self.is_low_end_device
    }

    /// Frame budget for the ambient canvas, `None` when it must not run at all.
    pub fn ambient_fps(&self) -> Option<f64> {
        if self.prefers_reduced_motion {
            None
        } else if self.is_constrained() {
            Some(AMBIENT_FPS_CONSTRAINED)
        } else {
            Some(AMBIENT_FPS)
        }
    }

    pub fn ambient_column_width(&self) -> f64 {
        if self.is_constrained() {
            AMBIENT_COLUMN_WIDTH_CONSTRAINED_PX
        } else {
            AMBIENT_COLUMN_WIDTH_PX
        }
    }
}

/// Source of the per-page capability profile.
pub trait CapabilityDetector {
    fn detect(&self) -> CapabilityProfile;
}

/// A fixed profile detects as itself.
impl CapabilityDetector for CapabilityProfile {
    fn detect(&self) -> CapabilityProfile {
        *self
    }
}

impl CapabilityDetector for DeviceSignals {
    fn detect(&self) -> CapabilityProfile {
        CapabilityProfile::from_signals(self)
    }
}
