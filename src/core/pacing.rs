/// Self-pacing gate that decouples the drawn frame rate from the rate at
/// which the host delivers animation frames.
#[derive(Clone, Debug)]
pub struct FramePacer {
    interval_ms: f64,
    last_frame_ms: Option<f64>,
}

impl FramePacer {
    pub fn from_fps(fps: f64) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 { fps } else { 1.0 };
        Self {
            interval_ms: 1000.0 / fps,
            last_frame_ms: None,
        }
    }

    #[inline]
    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Returns true when a frame should be drawn at `now_ms`.
    ///
    /// The first call always draws. Afterwards the remainder of the elapsed
    /// time is carried over so the average rate stays on budget even when the
    /// host's callbacks do not line up with the interval.
    pub fn should_draw(&mut self, now_ms: f64) -> bool {
        match self.last_frame_ms {
            None => {
                self.last_frame_ms = Some(now_ms);
                true
            }
            Some(last) => {
                let elapsed = now_ms - last;
                if elapsed < self.interval_ms {
                    return false;
                }
                self.last_frame_ms = Some(now_ms - elapsed % self.interval_ms);
                true
            }
        }
    }
}

/// Coalesces bursts of change notifications into at most one expensive
/// re-measure per interval. The first change after a quiet period is served
/// immediately; changes inside the interval stay pending until it ends.
#[derive(Clone, Debug)]
pub struct MeasureThrottle {
    interval_ms: f64,
    pending: bool,
    last_ms: Option<f64>,
}

impl MeasureThrottle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(0.0),
            pending: false,
            last_ms: None,
        }
    }

    #[inline]
    pub fn mark(&mut self) {
        self.pending = true;
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Returns true when a pending re-measure is due at `now_ms`, and consumes it.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        if !self.pending {
            return false;
        }
        if let Some(last) = self.last_ms {
            if now_ms - last < self.interval_ms {
                return false;
            }
        }
        self.pending = false;
        self.last_ms = Some(now_ms);
        true
    }
}
