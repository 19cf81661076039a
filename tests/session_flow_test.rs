//! End-to-end capture session tests


use mask_fit::{
    config::Config,
    fixtures::SyntheticFace,
    session::{Advisory, CaptureSession, Phase, SessionEvent},
};
use test_helpers::{feed, feed_until_past, reach_front_scan, small_config};

#[test]
fn test_phases_advance_in_order() {
    let mut session = CaptureSession::new(small_config()).unwrap();
    let mut phases = vec![session.phase()];
    session.start().unwrap();
    phases.push(session.phase());

    let frontal = SyntheticFace::frontal();
    let turned = SyntheticFace::profile(24.0, -6.0);
    for _ in 0..200 {
        if session.is_complete() {
            break;
        }
        let face = match session.phase() {
            Phase::GuideTurnSide | Phase::ScanningProfile => &turned,
            _ => &frontal,
        };
        session.advance_timer(std::time::Duration::from_millis(250));
        feed(&mut session, face).unwrap();
        if phases.last() != Some(&session.phase()) {
            phases.push(session.phase());
        }
    }

    assert_eq!(
        phases,
        vec![
            Phase::Idle,
            Phase::GuideCheck,
            Phase::Countdown,
            Phase::ScanningFront,
            Phase::GuideTurnSide,
            Phase::ScanningProfile,
            Phase::Complete,
        ]
    );
}

#[test]
fn test_phase_changes_are_single_steps() {
    let mut session = CaptureSession::new(small_config()).unwrap();
    session.start().unwrap();
    reach_front_scan(&mut session, &SyntheticFace::frontal()).unwrap();
    let reports = feed_until_past(&mut session, &SyntheticFace::frontal(), Phase::ScanningFront, 50).unwrap();

    let changes: Vec<_> = reports
        .iter()
        .flat_map(|r| &r.events)
        .filter_map(|e| match e {
            SessionEvent::PhaseChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(changes, vec![(Phase::ScanningFront, Phase::GuideTurnSide)]);
    assert_eq!(reports.len(), 5);
}

#[test]
fn test_frozen_scale_is_used_for_profile_frames() {
    let mut session = CaptureSession::new(small_config()).unwrap();
    session.start().unwrap();

    // Front scan at 4 px/mm freezes 0.25 mm/px
    let front = SyntheticFace::frontal();
    reach_front_scan(&mut session, &front).unwrap();
    feed_until_past(&mut session, &front, Phase::ScanningFront, 50).unwrap();
    let frozen = session.state().frozen_scale_factor().unwrap();
    assert!((frozen - 0.25).abs() < 1e-9);

    // Profile frames taken closer to the camera (5 px/mm): a 24 mm tip offset
    // spans 120 px, which the frozen scale reads as 30 mm
    let closer = SyntheticFace::profile(24.0, 0.0).with_px_per_mm(5.0);
    feed_until_past(&mut session, &closer, Phase::GuideTurnSide, 50).unwrap();
    feed_until_past(&mut session, &closer, Phase::ScanningProfile, 50).unwrap();
    assert!(session.is_complete());

    for record in session.state().profile_buffer().records() {
        assert_eq!(record.nose_height_mm, 30.0);
    }
    assert_eq!(session.state().frozen_scale_factor(), Some(frozen));

    let result = session.final_results().unwrap();
    assert_eq!(result.profile.nose_height_mm, 30.0);
    assert!((result.front.scale_factor_mm_per_px - frozen).abs() < 1e-12);
}

#[test]
fn test_incomplete_session_has_no_results() {
    let mut session = CaptureSession::new(small_config()).unwrap();
    assert!(session.final_results().is_none());

    session.start().unwrap();
    reach_front_scan(&mut session, &SyntheticFace::frontal()).unwrap();
    for _ in 0..4 {
        feed(&mut session, &SyntheticFace::frontal()).unwrap();
    }
    assert_eq!(session.phase(), Phase::ScanningFront);
    assert_eq!(session.state().scan_progress(), 80);
    assert!(session.final_results().is_none());

    // Never turning the head keeps the session in side guidance
    feed(&mut session, &SyntheticFace::frontal()).unwrap();
    for _ in 0..20 {
        feed(&mut session, &SyntheticFace::frontal()).unwrap();
    }
    assert_eq!(session.phase(), Phase::GuideTurnSide);
    assert!(!session.state().profile_buffer().is_full());
    assert!(session.final_results().is_none());
}

#[test]
fn test_reset_allows_a_fresh_capture() {
    let mut session = CaptureSession::new(small_config()).unwrap();
    session.start().unwrap();
    reach_front_scan(&mut session, &SyntheticFace::frontal()).unwrap();
    feed(&mut session, &SyntheticFace::frontal()).unwrap();

    session.reset();
    assert_eq!(session.phase(), Phase::Idle);
    assert_eq!(session.state().stability_counter(), 0);
    assert!(session.state().front_buffer().is_empty());
    assert_eq!(session.state().frozen_scale_factor(), None);

    session.start().unwrap();
    assert_eq!(session.phase(), Phase::GuideCheck);
}

#[test]
fn test_long_face_raises_advisory() {
    let mut session = CaptureSession::new(small_config()).unwrap();
    session.start().unwrap();

    let long_face = SyntheticFace {
        face_length_mm: 300.0,
        ..SyntheticFace::frontal()
    };
    reach_front_scan(&mut session, &long_face).unwrap();
    feed_until_past(&mut session, &long_face, Phase::ScanningFront, 50).unwrap();
    let turned = SyntheticFace::profile(24.0, 0.0);
    feed_until_past(&mut session, &turned, Phase::GuideTurnSide, 50).unwrap();
    feed_until_past(&mut session, &turned, Phase::ScanningProfile, 50).unwrap();

    let result = session.final_results().unwrap();
    assert_eq!(
        result.advisories,
        vec![Advisory::FaceLengthOutOfRange {
            measured_mm: 300.0,
            ceiling_mm: 280.0
        }]
    );
}

#[test]
fn test_default_config_takes_ninety_frames_per_scan() {
    let mut session = CaptureSession::new(Config::default()).unwrap();
    session.start().unwrap();
    let face = SyntheticFace::frontal();
    reach_front_scan(&mut session, &face).unwrap();
    let reports = feed_until_past(&mut session, &face, Phase::ScanningFront, 200).unwrap();
    assert_eq!(reports.len(), 90);

    let progress: Vec<u8> = reports.iter().map(|r| r.scan_progress).collect();
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(progress.last(), Some(&100));
}
