use crate::constants::REVEAL_DEFAULT_THRESHOLD;

const RATIO_TOLERANCE: f64 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealOptions {
    /// Fraction of the region that must intersect, in `[0, 1]`.
    pub threshold: f64,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            threshold: REVEAL_DEFAULT_THRESHOLD,
        }
    }
}

impl RevealOptions {
    pub fn clamped_threshold(&self) -> f64 {
        if self.threshold.is_finite() {
            self.threshold.clamp(0.0, 1.0)
        } else {
            REVEAL_DEFAULT_THRESHOLD
        }
    }

    /// Whether an intersection report meets the threshold. Observers report
    /// any overlap as intersecting, including the initial report on
    /// `observe`, so the ratio decides. Ratios reported at a threshold
    /// crossing can land a hair below it.
    pub fn is_met(&self, is_intersecting: bool, ratio: f64) -> bool {
        let threshold = self.clamped_threshold();
        is_intersecting && (threshold == 0.0 || ratio + RATIO_TOLERANCE >= threshold)
    }
}

/// One-shot visibility latch for an observed region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RevealState {
    has_fired: bool,
}

impl RevealState {
    #[inline]
    pub fn has_fired(&self) -> bool {
        self.has_fired
    }

    /// Feed an intersection report. Returns true exactly once, on the report
    /// that flips the region to visible; later reports are ignored.
    pub fn observe(&mut self, is_intersecting: bool) -> bool {
        if self.has_fired || !is_intersecting {
            return false;
        }
        self.has_fired = true;
        true
    }

    /// Feed a report carrying the visible ratio; fires only once the
    /// threshold in `options` is met.
    pub fn observe_ratio(
        &mut self,
        is_intersecting: bool,
        ratio: f64,
        options: &RevealOptions,
    ) -> bool {
        self.observe(options.is_met(is_intersecting, ratio))
    }

    /// Fire without an intersection report (reduced motion collapses straight
    /// to the final state).
    pub fn force(&mut self) -> bool {
        self.observe(true)
    }
}

/// Work waiting for a region to be revealed. Items deferred after the release
/// are handed straight back to the caller to run at once.
#[derive(Debug)]
pub struct RevealQueue<T> {
    released: bool,
    items: Vec<T>,
}

impl<T> Default for RevealQueue<T> {
    fn default() -> Self {
        Self {
            released: false,
            items: Vec::new(),
        }
    }
}

impl<T> RevealQueue<T> {
    pub fn with(items: Vec<T>) -> Self {
        Self {
            released: false,
            items,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Queue `item`, or return it if the queue was already released.
    pub fn defer(&mut self, item: T) -> Option<T> {
        if self.released {
            return Some(item);
        }
        self.items.push(item);
        None
    }

    /// Hand over everything queued, in order. Later calls return nothing.
    pub fn release(&mut self) -> Vec<T> {
        self.released = true;
        std::mem::take(&mut self.items)
    }
}
