// Host-side tests for capability profiling.

use folio_motion::core::*;

#[test]
fn missing_signals_mean_unconstrained() {
    let p = CapabilityProfile::from_signals(&DeviceSignals::default());
    assert_eq!(p, CapabilityProfile::default());
    assert!(!p.is_constrained());
    assert_eq!(p.ambient_fps(), Some(30.0));
}

#[test]
fn narrow_viewports_are_mobile() {
    let sig = |w: f64| DeviceSignals {
        viewport_width: Some(w),
        ..Default::default()
    };
    assert!(CapabilityProfile::from_signals(&sig(375.0)).is_mobile);
    assert!(CapabilityProfile::from_signals(&sig(767.0)).is_mobile);
    assert!(!CapabilityProfile::from_signals(&sig(768.0)).is_mobile);
    assert!(!CapabilityProfile::from_signals(&sig(0.0)).is_mobile);
}

#[test]
fn few_cores_is_low_end() {
    let sig = |c: u32| DeviceSignals {
        hardware_concurrency: Some(c),
        ..Default::default()
    };
    assert!(CapabilityProfile::from_signals(&sig(2)).is_low_end_device);
    assert!(CapabilityProfile::from_signals(&sig(4)).is_low_end_device);
    assert!(!CapabilityProfile::from_signals(&sig(8)).is_low_end_device);
    // Hidden value.
    assert!(!CapabilityProfile::from_signals(&sig(0)).is_low_end_device);
}

#[test]
fn slow_connections() {
    let sig = |t: &str| DeviceSignals {
        effective_type: Some(t.to_string()),
        ..Default::default()
    };
    assert!(CapabilityProfile::from_signals(&sig("2g")).is_slow_connection);
    assert!(CapabilityProfile::from_signals(&sig("slow-2g")).is_slow_connection);
    assert!(!CapabilityProfile::from_signals(&sig("4g")).is_slow_connection);
    let save_data = DeviceSignals {
        effective_type: Some("4g".into()),
        save_data: Some(true),
        ..Default::default()
    };
    assert!(CapabilityProfile::from_signals(&save_data).is_slow_connection);
}

#[test]
fn reduced_motion_disables_ambient() {
    let p = CapabilityProfile::from_signals(&DeviceSignals {
        prefers_reduced_motion: Some(true),
        viewport_width: Some(400.0),
        ..Default::default()
    });
    assert!(p.prefers_reduced_motion);
    assert_eq!(p.ambient_fps(), None);
}

#[test]
fn constrained_tuning() {
    let p = CapabilityProfile {
        is_mobile: true,
        ..Default::default()
    };
    assert!(p.is_constrained());
    assert_eq!(p.ambient_fps(), Some(15.0));
    assert!(p.ambient_column_width() > CapabilityProfile::default().ambient_column_width());
}

#[test]
fn detectors_are_substitutable() {
    fn tuned(detector: &dyn CapabilityDetector) -> Option<f64> {
        detector.detect().ambient_fps()
    }
    let fixed = CapabilityProfile {
        is_low_end_device: true,
        ..Default::default()
    };
    assert_eq!(tuned(&fixed), Some(15.0));
    assert_eq!(fixed.detect(), fixed);

    let signals = DeviceSignals {
        hardware_concurrency: Some(16),
        ..Default::default()
    };
    assert_eq!(tuned(&signals), Some(30.0));
}
