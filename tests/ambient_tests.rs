// Host-side tests for frame pacing, the glyph-rain column model and the
// ambient scene's sizing rules.

use folio_motion::constants::{
    AMBIENT_FONT_SIZE_PX, AMBIENT_HEIGHT_BUFFER_PX, AMBIENT_HEIGHT_NOISE_PX,
};
use folio_motion::core::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Default)]
struct Recorder {
    fades: usize,
    glyphs: Vec<(char, f64, f64)>,
}

impl GlyphSurface for Recorder {
    fn fade(&mut self, _width: f64, _height: f64) {
        self.fades += 1;
    }

    fn draw_glyph(&mut self, glyph: char, x: f64, y: f64) {
        self.glyphs.push((glyph, x, y));
    }
}

#[test]
fn pacer_skips_frames_under_budget() {
    let mut p = FramePacer::from_fps(30.0);
    assert!((p.interval_ms() - 33.333).abs() < 0.01);
    assert!(p.should_draw(0.0));
    assert!(!p.should_draw(10.0));
    assert!(p.should_draw(34.0));
    assert!(!p.should_draw(60.0));
    assert!(p.should_draw(67.0));
}

#[test]
fn pacer_holds_budget_under_faster_callbacks() {
    let mut p = FramePacer::from_fps(30.0);
    let drawn = (0..=60)
        .filter(|i| p.should_draw(*i as f64 * 1000.0 / 60.0))
        .count();
    assert!((29..=31).contains(&drawn), "drew {drawn} frames in one second");
}

#[test]
fn pacer_rejects_nonsense_fps() {
    assert_eq!(FramePacer::from_fps(0.0).interval_ms(), 1000.0);
    assert_eq!(FramePacer::from_fps(f64::NAN).interval_ms(), 1000.0);
}

#[test]
fn field_partitions_width_into_columns() {
    let field = RainField::new(100.0, 200.0, 20.0);
    assert_eq!(field.column_count(), 5);
    assert_eq!(field.drop_positions(), &[1, 1, 1, 1, 1]);

    assert_eq!(RainField::new(99.0, 200.0, 20.0).column_count(), 4);
    assert_eq!(RainField::new(0.0, 200.0, 20.0).column_count(), 0);
    assert_eq!(RainField::new(f64::NAN, 200.0, 20.0).column_count(), 0);
}

#[test]
fn step_draws_one_glyph_per_column_then_advances() {
    let mut field = RainField::new(100.0, 200.0, 20.0);
    let mut rng = StdRng::seed_from_u64(1);
    let mut rec = Recorder::default();
    field.step(&mut rng, &mut rec);

    assert_eq!(rec.fades, 1);
    assert_eq!(rec.glyphs.len(), 5);
    for (i, (_, x, y)) in rec.glyphs.iter().enumerate() {
        assert_eq!(*x, i as f64 * 20.0);
        assert_eq!(*y, AMBIENT_FONT_SIZE_PX);
    }
    assert_eq!(field.drop_positions(), &[2, 2, 2, 2, 2]);
}

#[test]
fn columns_wrap_eventually_and_desynchronise() {
    let mut field = RainField::new(200.0, 3.0 * AMBIENT_FONT_SIZE_PX, 20.0);
    let mut rng = StdRng::seed_from_u64(99);
    let mut rec = Recorder::default();
    let mut wrapped = vec![false; field.column_count()];
    let mut prev = field.drop_positions().to_vec();
    for _ in 0..5000 {
        field.step(&mut rng, &mut rec);
        for (i, (&now, &before)) in field.drop_positions().iter().zip(&prev).enumerate() {
            if now < before {
                assert_eq!(now, 1, "a wrapped column restarts at the top");
                wrapped[i] = true;
            }
        }
        prev = field.drop_positions().to_vec();
    }
    assert!(wrapped.iter().all(|w| *w), "every column should wrap at some point");
    let first = field.drop_positions()[0];
    assert!(field.drop_positions().iter().any(|d| *d != first));
}

#[test]
fn columns_above_the_bottom_never_wrap() {
    let mut field = RainField::new(60.0, 10_000.0, 20.0);
    let mut rng = StdRng::seed_from_u64(3);
    let mut rec = Recorder::default();
    for step in 0..100u32 {
        field.step(&mut rng, &mut rec);
        assert!(field.drop_positions().iter().all(|d| *d == step + 2));
    }
}

#[test]
fn throttle_serves_first_change_then_coalesces() {
    let mut t = MeasureThrottle::new(200.0);
    assert!(!t.poll(0.0), "nothing to measure yet");
    t.mark();
    assert!(t.poll(10.0));
    assert!(!t.is_pending());

    // A burst inside the interval collapses into one trailing measure.
    for now in [20.0, 30.0, 100.0] {
        t.mark();
        assert!(!t.poll(now));
    }
    assert!(t.is_pending());
    assert!(!t.poll(209.0));
    assert!(t.poll(210.0));
    assert!(!t.poll(500.0));
}

#[test]
fn throttle_measures_once_per_interval_under_constant_churn() {
    let mut t = MeasureThrottle::new(200.0);
    let mut measured = 0;
    for i in 0..60 {
        t.mark();
        if t.poll(i as f64 * 1000.0 / 60.0) {
            measured += 1;
        }
    }
    assert!((4..=5).contains(&measured), "measured {measured} times in one second");
}

#[test]
fn document_height_takes_largest_measurement() {
    assert_eq!(document_height(&[100.0, 2500.0, 800.0, f64::NAN, -1.0]), 2500.0);
    assert_eq!(document_height(&[]), 0.0);
}

#[test]
fn scene_covers_document_plus_buffer() {
    let profile = CapabilityProfile::default();
    let scene = AmbientScene::with_seed(&profile, 1000.0, 2000.0, 1);
    let size = scene.canvas_size();
    assert_eq!(size.width, 1000);
    assert_eq!(
        size.height as f64,
        2000.0 + AMBIENT_HEIGHT_BUFFER_PX + AMBIENT_HEIGHT_NOISE_PX
    );
    assert_eq!(scene.field().column_count(), 50);
}

#[test]
fn reconcile_keeps_coverage_after_every_change() {
    let profile = CapabilityProfile::default();
    let mut scene = AmbientScene::with_seed(&profile, 1000.0, 900.0, 1);
    for height in [900.0, 2500.0, 2520.0, 2500.0, 2490.5, 4000.0, 1200.0, 1210.0, 600.0] {
        scene.reconcile(1000.0, height);
        let covered = scene.canvas_size().height as f64;
        assert!(
            covered >= height + AMBIENT_HEIGHT_BUFFER_PX,
            "{covered} does not cover {height}"
        );
    }
}

#[test]
fn reconcile_ignores_small_changes_in_either_direction() {
    let profile = CapabilityProfile::default();
    let mut scene = AmbientScene::with_seed(&profile, 1000.0, 2500.0, 1);
    assert_eq!(scene.canvas_size().height, 2650);
    assert_eq!(scene.reconcile(1000.0, 2500.0), None);
    assert_eq!(scene.reconcile(1000.0, 2501.0), None);
    // Still covered exactly.
    assert_eq!(scene.reconcile(1000.0, 2550.0), None);
    // Past the slack: rebuild with fresh slack.
    let size = scene.reconcile(1000.0, 2551.0).map(|s| s.height);
    assert_eq!(size, Some(2701));
    // Shrinking by less than the slack is noise.
    assert_eq!(scene.reconcile(1000.0, 2501.0), None);
    assert_eq!(scene.canvas_size().height, 2701);
    // Large shrink gives the space back.
    let size = scene.reconcile(1000.0, 1500.0).map(|s| s.height);
    assert_eq!(size, Some(1650));
}

#[test]
fn one_pixel_growth_keeps_columns_running() {
    let profile = CapabilityProfile::default();
    let mut scene = AmbientScene::with_seed(&profile, 1000.0, 2000.0, 1);
    let mut rec = Recorder::default();
    for i in 0..10 {
        assert_eq!(scene.frame(i as f64 * 40.0, &mut rec), FrameOutcome::Drawn);
    }
    assert!(scene.field().drop_positions().iter().all(|&d| d == 11));

    assert_eq!(scene.reconcile(1000.0, 2001.0), None);
    assert!(scene.field().drop_positions().iter().all(|&d| d == 11));
}

#[test]
fn reconcile_redistributes_columns_on_width_change() {
    let profile = CapabilityProfile::default();
    let mut scene = AmbientScene::with_seed(&profile, 1000.0, 1000.0, 1);
    let size = scene.reconcile(500.0, 1000.0);
    assert_eq!(size.map(|s| s.width), Some(500));
    assert_eq!(scene.field().column_count(), 25);
}

#[test]
fn constrained_profile_uses_wider_columns_and_lower_budget() {
    let profile = CapabilityProfile {
        is_low_end_device: true,
        ..Default::default()
    };
    let scene = AmbientScene::with_seed(&profile, 960.0, 1000.0, 1);
    assert_eq!(scene.field().column_width(), 32.0);
    assert_eq!(scene.field().column_count(), 30);
    let interval = scene.frame_interval_ms().unwrap_or_default();
    assert!((interval - 1000.0 / 15.0).abs() < 1e-9);
}

#[test]
fn reduced_motion_draws_nothing() {
    let profile = CapabilityProfile {
        prefers_reduced_motion: true,
        ..Default::default()
    };
    let mut scene = AmbientScene::with_seed(&profile, 1000.0, 2000.0, 1);
    assert!(!scene.is_enabled());
    let mut rec = Recorder::default();
    for i in 0..120 {
        assert_eq!(scene.frame(i as f64 * 16.7, &mut rec), FrameOutcome::Disabled);
    }
    assert_eq!(rec.fades, 0);
    assert!(rec.glyphs.is_empty());
    assert_eq!(scene.frames_drawn(), 0);
}

#[test]
fn frame_draws_only_on_budget() {
    let profile = CapabilityProfile::default();
    let mut scene = AmbientScene::with_seed(&profile, 100.0, 100.0, 1);
    let mut rec = Recorder::default();
    assert_eq!(scene.frame(0.0, &mut rec), FrameOutcome::Drawn);
    assert_eq!(scene.frame(16.0, &mut rec), FrameOutcome::Skipped);
    assert_eq!(scene.frame(34.0, &mut rec), FrameOutcome::Drawn);
    assert_eq!(scene.frames_drawn(), 2);
    assert_eq!(rec.fades, 2);
    assert_eq!(rec.glyphs.len(), 2 * scene.field().column_count());
}
