// Host-side tests for the scramble-typewriter state machine.

use folio_motion::core::*;

fn timing(speed_ms: f64, scramble: bool, profile: &CapabilityProfile) -> TypewriterTiming {
    TypewriterTiming::resolve(
        &TypewriterOptions {
            speed_ms,
            scramble_on_mount: scramble,
            scramble_duration_ms: 1000.0,
        },
        profile,
    )
}

fn reduced_motion() -> CapabilityProfile {
    CapabilityProfile {
        prefers_reduced_motion: true,
        ..Default::default()
    }
}

#[test]
fn reveal_sequence_for_short_text() {
    let t = timing(50.0, false, &CapabilityProfile::default());
    let mut tw = Typewriter::with_seed("Hi", t, 1);
    assert_eq!(tw.displayed_text(), "");
    assert_eq!(tw.phase(), TypewriterPhase::Revealing);

    assert_eq!(tw.tick(1000.0), Tick::Continue);
    assert_eq!(tw.displayed_text(), "H");
    assert_eq!(tw.tick(1049.0), Tick::Continue);
    assert_eq!(tw.displayed_text(), "H");
    assert_eq!(tw.tick(1050.0), Tick::Done);
    assert_eq!(tw.displayed_text(), "Hi");
    assert_eq!(tw.phase(), TypewriterPhase::Done);

    assert_eq!(tw.tick(9000.0), Tick::Done);
    assert_eq!(tw.displayed_text(), "Hi");
}

#[test]
fn progress_follows_elapsed_time_not_tick_count() {
    let t = timing(50.0, false, &CapabilityProfile::default());
    let mut sparse = Typewriter::with_seed("portfolio", t, 1);
    let mut dense = Typewriter::with_seed("portfolio", t, 1);
    sparse.tick(0.0);
    sparse.tick(220.0);
    for i in 0..=22 {
        dense.tick(i as f64 * 10.0);
    }
    assert_eq!(sparse.displayed_text(), dense.displayed_text());
    assert_eq!(sparse.displayed_text(), "portf");
}

#[test]
fn reduced_motion_shows_final_text_on_first_tick() {
    for scramble in [false, true] {
        let t = timing(50.0, scramble, &reduced_motion());
        assert!(t.instant);
        assert_eq!(t.scramble_ms, None);
        let mut tw = Typewriter::with_seed("Software engineer", t, 3);
        assert_eq!(tw.tick(0.0), Tick::Done);
        assert_eq!(tw.displayed_text(), "Software engineer");
    }
}

#[test]
fn constrained_devices_halve_speed_and_scramble() {
    let mobile = CapabilityProfile {
        is_mobile: true,
        ..Default::default()
    };
    let t = timing(50.0, true, &mobile);
    assert_eq!(t.speed_ms, 25.0);
    assert_eq!(t.scramble_ms, Some(500.0));

    // Halving is floored.
    let t = timing(15.0, false, &mobile);
    assert_eq!(t.speed_ms, 10.0);

    let t = timing(50.0, true, &CapabilityProfile::default());
    assert_eq!(t.speed_ms, 50.0);
    assert_eq!(t.scramble_ms, Some(1000.0));
}

#[test]
fn invalid_options_fall_back_to_defaults() {
    let t = TypewriterTiming::resolve(
        &TypewriterOptions {
            speed_ms: -5.0,
            scramble_on_mount: true,
            scramble_duration_ms: f64::NAN,
        },
        &CapabilityProfile::default(),
    );
    assert_eq!(t.speed_ms, 50.0);
    assert_eq!(t.scramble_ms, Some(1000.0));
}

#[test]
fn scramble_settles_left_to_right_and_never_regresses() {
    let text = "hello world";
    let source: Vec<char> = text.chars().collect();
    let t = timing(50.0, true, &CapabilityProfile::default());
    let mut tw = Typewriter::with_seed(text, t, 7);
    assert_eq!(tw.phase(), TypewriterPhase::Scrambling);
    assert_eq!(tw.displayed_text().chars().count(), source.len());

    let mut settled_before = 0usize;
    let mut now = 0.0;
    loop {
        let tick = tw.tick(now);
        let shown: Vec<char> = tw.displayed_text().chars().collect();
        assert_eq!(shown.len(), source.len());
        assert_eq!(shown[5], ' ', "space must stay a space");
        if tick == Tick::Done {
            break;
        }
        let p = now / 1000.0;
        let settled = ((p * source.len() as f64).ceil() as usize).min(source.len());
        assert!(settled >= settled_before);
        assert_eq!(&shown[..settled], &source[..settled], "settled prefix changed at {now}");
        for i in settled..source.len() {
            if source[i] != ' ' {
                assert_ne!(shown[i], source[i], "unsettled index {i} shows the real char");
            }
        }
        settled_before = settled;
        now += 37.0;
    }
    assert_eq!(tw.displayed_text(), text);
    assert_eq!(tw.phase(), TypewriterPhase::Done);
}

#[test]
fn done_always_matches_source() {
    let profile = CapabilityProfile::default();
    for text in ["", "a", "Rust & WebAssembly", "日本語 テキスト", "  spaced  "] {
        for scramble in [false, true] {
            let mut tw = Typewriter::with_seed(text, timing(20.0, scramble, &profile), 11);
            let mut now = 0.0;
            while tw.tick(now) == Tick::Continue {
                now += 16.0;
                assert!(now < 60_000.0, "never finished: {text:?}");
            }
            assert_eq!(tw.displayed_text(), text);
        }
    }
}

#[test]
fn restart_resets_state_and_bumps_generation() {
    let t = timing(50.0, false, &CapabilityProfile::default());
    let mut tw = Typewriter::with_seed("first", t, 1);
    tw.tick(0.0);
    tw.tick(100.0);
    assert_eq!(tw.displayed_text(), "fir");
    let before = tw.generation();

    let generation = tw.restart("next");
    assert_eq!(generation, before + 1);
    assert_eq!(tw.generation(), generation);
    assert_eq!(tw.source_text(), "next");
    assert_eq!(tw.displayed_text(), "");
    assert_eq!(tw.start_ms(), None);

    // The new run's clock starts at its own first tick.
    tw.tick(5000.0);
    assert_eq!(tw.displayed_text(), "n");
}

#[test]
fn restart_with_scramble_starts_scrambling_again() {
    let t = timing(50.0, true, &CapabilityProfile::default());
    let mut tw = Typewriter::with_seed("abc", t, 1);
    assert_eq!(tw.tick(0.0), Tick::Continue);
    assert_eq!(tw.tick(2000.0), Tick::Done);
    tw.restart("xyz");
    assert_eq!(tw.phase(), TypewriterPhase::Scrambling);
    assert_eq!(tw.displayed_text().chars().count(), 3);
}

#[test]
fn scrambler_uses_adjacent_keys() {
    let s = Scrambler::new();
    let near = s.neighbours_of('a');
    for k in ['q', 'w', 's', 'z', 'x'] {
        assert!(near.contains(&k), "{k} should neighbour a");
    }
    assert!(!near.contains(&'a'));
    let upper = s.neighbours_of('A');
    assert!(upper.iter().all(|c| c.is_ascii_uppercase()));
    assert!(s.neighbours_of('5').contains(&'4'));
}

#[test]
fn scrambler_substitutes() {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    let s = Scrambler::new();
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..200 {
        assert_eq!(s.substitute(' ', &mut rng), ' ');
        let g = s.substitute('g', &mut rng);
        assert!(s.neighbours_of('g').contains(&g));
        let other = s.substitute('é', &mut rng);
        assert!(other.is_ascii_lowercase());
    }
}
