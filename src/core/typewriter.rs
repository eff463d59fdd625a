//! Scramble-typewriter state machine.
//!
//! `Scrambling -> Done` when scrambling is on, `Revealing -> Done` otherwise.
//! Progress is a function of elapsed time since the first tick of the current
//! run, never of the number of ticks, so variable frame rates only change how
//! many intermediate states are observed.

use super::profile::CapabilityProfile;
use super::scramble::Scrambler;
use crate::constants::{TYPEWRITER_MIN_SPEED_MS, TYPEWRITER_SCRAMBLE_MS, TYPEWRITER_SPEED_MS};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TypewriterOptions {
    /// Milliseconds per revealed character.
    pub speed_ms: f64,
    pub scramble_on_mount: bool,
    pub scramble_duration_ms: f64,
}

impl Default for TypewriterOptions {
    fn default() -> Self {
        Self {
            speed_ms: TYPEWRITER_SPEED_MS,
            scramble_on_mount: false,
            scramble_duration_ms: TYPEWRITER_SCRAMBLE_MS,
        }
    }
}

/// Options after device adaptation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TypewriterTiming {
    pub speed_ms: f64,
    pub scramble_ms: Option<f64>,
    /// Skip animation entirely and show the final text on the first tick.
    pub instant: bool,
}

impl TypewriterTiming {
    pub fn resolve(options: &TypewriterOptions, profile: &CapabilityProfile) -> Self {
        let mut speed_ms = positive_or(options.speed_ms, TYPEWRITER_SPEED_MS);
        let mut scramble_ms = positive_or(options.scramble_duration_ms, TYPEWRITER_SCRAMBLE_MS);
        if profile.is_constrained() {
            speed_ms = (speed_ms / 2.0).max(TYPEWRITER_MIN_SPEED_MS);
            scramble_ms /= 2.0;
        }
        let instant = profile.prefers_reduced_motion;
        Self {
            speed_ms,
            scramble_ms: (options.scramble_on_mount && !instant).then_some(scramble_ms),
            instant,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypewriterPhase {
    Scrambling,
    Revealing,
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    Continue,
    Done,
}

pub struct Typewriter {
    source: Vec<char>,
    source_text: String,
    displayed: String,
    phase: TypewriterPhase,
    start_ms: Option<f64>,
    timing: TypewriterTiming,
    generation: u64,
    scrambler: Scrambler,
    rng: StdRng,
}

impl Typewriter {
    pub fn new(text: &str, timing: TypewriterTiming) -> Self {
        Self::with_rng(text, timing, StdRng::from_entropy())
    }

    pub fn with_seed(text: &str, timing: TypewriterTiming, seed: u64) -> Self {
        Self::with_rng(text, timing, StdRng::seed_from_u64(seed))
    }

    fn with_rng(text: &str, timing: TypewriterTiming, rng: StdRng) -> Self {
        let mut tw = Self {
            source: Vec::new(),
            source_text: String::new(),
            displayed: String::new(),
            phase: TypewriterPhase::Revealing,
            start_ms: None,
            timing,
            generation: 0,
            scrambler: Scrambler::new(),
            rng,
        };
        tw.reset(text);
        tw
    }

    #[inline]
    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    #[inline]
    pub fn displayed_text(&self) -> &str {
        &self.displayed
    }

    #[inline]
    pub fn phase(&self) -> TypewriterPhase {
        self.phase
    }

    #[inline]
    pub fn timing(&self) -> TypewriterTiming {
        self.timing
    }

    #[inline]
    pub fn start_ms(&self) -> Option<f64> {
        self.start_ms
    }

    /// Identifies the current run. Anything scheduled for an older run must
    /// stop instead of ticking.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start over with new text. Returns the new run's generation.
    pub fn restart(&mut self, text: &str) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.reset(text);
        self.generation
    }

    fn reset(&mut self, text: &str) {
        self.source = text.chars().collect();
        self.source_text = text.to_owned();
        self.start_ms = None;
        if self.timing.scramble_ms.is_some() {
            self.phase = TypewriterPhase::Scrambling;
            self.render_scramble(0);
        } else {
            self.phase = TypewriterPhase::Revealing;
            self.displayed.clear();
        }
    }

    /// Advance to `now_ms`. Returns [`Tick::Done`] once the final text is shown;
    /// further ticks are no-ops.
    pub fn tick(&mut self, now_ms: f64) -> Tick {
        if self.phase == TypewriterPhase::Done {
            return Tick::Done;
        }
        let start = *self.start_ms.get_or_insert(now_ms);
        let elapsed = (now_ms - start).max(0.0);
        let len = self.source.len();

        if self.timing.instant || len == 0 {
            return self.finish();
        }

        match (self.phase, self.timing.scramble_ms) {
            (TypewriterPhase::Scrambling, Some(duration)) => {
                let p = if duration > 0.0 {
                    (elapsed / duration).min(1.0)
                } else {
                    1.0
                };
                if p >= 1.0 {
                    return self.finish();
                }
                // Index i is settled once p * len > i.
                let settled = ((p * len as f64).ceil() as usize).min(len);
                self.render_scramble(settled);
                Tick::Continue
            }
            _ => {
                let shown = ((elapsed / self.timing.speed_ms).floor() as usize).saturating_add(1);
                if shown >= len {
                    return self.finish();
                }
                self.displayed.clear();
                self.displayed.extend(&self.source[..shown]);
                Tick::Continue
            }
        }
    }

    fn render_scramble(&mut self, settled: usize) {
        self.displayed.clear();
        for (i, &ch) in self.source.iter().enumerate() {
            if i < settled {
                self.displayed.push(ch);
            } else {
                let sub = self.scrambler.substitute(ch, &mut self.rng);
                self.displayed.push(sub);
            }
        }
    }

    fn finish(&mut self) -> Tick {
        self.displayed.clone_from(&self.source_text);
        self.phase = TypewriterPhase::Done;
        Tick::Done
    }
}

#[inline]
fn positive_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        fallback
    }
}
