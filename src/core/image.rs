//! Load state and quality selection for deferred images.

use super::profile::CapabilityProfile;
use crate::constants::{
    IMAGE_FALLBACK_MS, IMAGE_QUALITY_HIGH, IMAGE_QUALITY_LOW, IMAGE_QUALITY_MEDIUM,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImageQuality {
    /// Highest tier unless the device or network calls for less.
    #[default]
    Auto,
    Low,
    Medium,
    High,
}

impl ImageQuality {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    /// Explicit tiers are honoured verbatim; `Auto` is capped to `Medium` on
    /// slow connections and mobile devices.
    pub fn resolve(self, profile: &CapabilityProfile) -> Self {
        match self {
            Self::Auto if profile.is_slow_connection || profile.is_mobile => Self::Medium,
            Self::Auto => Self::High,
            explicit => explicit,
        }
    }

    pub fn percent(self) -> u8 {
        match self {
            Self::Low => IMAGE_QUALITY_LOW,
            Self::Medium => IMAGE_QUALITY_MEDIUM,
            Self::Auto | Self::High => IMAGE_QUALITY_HIGH,
        }
    }
}

/// Append the tier as a `q` query parameter, keeping any fragment last.
pub fn quality_url(src: &str, quality: ImageQuality) -> String {
    let (base, fragment) = match src.find('#') {
        Some(i) => src.split_at(i),
        None => (src, ""),
    };
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}q={}{fragment}", quality.percent())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadTrigger {
    Priority,
    Intersection,
    FallbackTimeout,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImagePhase {
    Placeholder,
    Loading,
    Loaded,
    Errored,
}

impl ImagePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Placeholder => "placeholder",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::Errored => "error",
        }
    }
}

/// Per-image load state. `near_viewport` only ever goes false -> true and
/// `loaded`/`errored` are mutually exclusive terminal states.
#[derive(Clone, Debug)]
pub struct ImageLoadState {
    registered_at_ms: f64,
    near_viewport: bool,
    trigger: Option<LoadTrigger>,
    loaded: bool,
    errored: bool,
}

impl ImageLoadState {
    pub fn register(priority: bool, now_ms: f64) -> Self {
        let mut state = Self {
            registered_at_ms: now_ms,
            near_viewport: false,
            trigger: None,
            loaded: false,
            errored: false,
        };
        if priority {
            state.begin(LoadTrigger::Priority);
        }
        state
    }

    #[inline]
    pub fn is_near_viewport(&self) -> bool {
        self.near_viewport
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[inline]
    pub fn has_errored(&self) -> bool {
        self.errored
    }

    #[inline]
    pub fn trigger(&self) -> Option<LoadTrigger> {
        self.trigger
    }

    pub fn phase(&self) -> ImagePhase {
        if self.loaded {
            ImagePhase::Loaded
        } else if self.errored {
            ImagePhase::Errored
        } else if self.near_viewport {
            ImagePhase::Loading
        } else {
            ImagePhase::Placeholder
        }
    }

    /// Time at which the fallback fires if no visibility signal came first.
    #[inline]
    pub fn fallback_deadline_ms(&self) -> f64 {
        self.registered_at_ms + IMAGE_FALLBACK_MS
    }

    /// Milliseconds from `now_ms` until the fallback deadline, never negative.
    #[inline]
    pub fn fallback_delay_ms(&self, now_ms: f64) -> f64 {
        (self.fallback_deadline_ms() - now_ms).max(0.0)
    }

    /// Mark the image near the viewport. Returns true only for the call that
    /// performs the transition; that caller starts the fetch.
    pub fn begin(&mut self, trigger: LoadTrigger) -> bool {
        if self.near_viewport {
            return false;
        }
        self.near_viewport = true;
        self.trigger = Some(trigger);
        true
    }

    /// Fire the fallback if its deadline has passed.
    pub fn poll_fallback(&mut self, now_ms: f64) -> bool {
        now_ms >= self.fallback_deadline_ms() && self.begin(LoadTrigger::FallbackTimeout)
    }

    pub fn mark_loaded(&mut self) -> bool {
        if !self.near_viewport || self.loaded || self.errored {
            return false;
        }
        self.loaded = true;
        true
    }

    pub fn mark_errored(&mut self) -> bool {
        if !self.near_viewport || self.loaded || self.errored {
            return false;
        }
        self.errored = true;
        true
    }
}
