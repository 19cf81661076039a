//! Capture session state machine.
//!
//! A session walks `Idle → GuideCheck → Countdown → ScanningFront →
//! GuideTurnSide → ScanningProfile → Complete`. [`SessionState::step`] is the
//! whole transition function: it consumes one input (a frame or elapsed
//! countdown time) and returns the events it produced, with no presentation
//! side effects. [`CaptureSession`] is the thin owner callers drive frame by
//! frame; it never advances on its own.

use crate::{
    buffer::ScanBuffer,
    calibration::Gender,
    config::Config,
    landmarks::{FaceLandmarks, LandmarkFrame},
    measurement::{measure_frontal, measure_profile, FrontalMeasurement, ProfileMeasurement},
    pose::{PoseCheck, PoseValidator},
    Error, Result,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Session phases in the order they are visited
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Before `start`; owned by the surrounding UI (questionnaire, intro)
    Idle,
    GuideCheck,
    Countdown,
    ScanningFront,
    GuideTurnSide,
    ScanningProfile,
    Complete,
}

/// What the user should do next, for the UI to phrase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Guidance {
    FaceNotFound,
    FaceTooFar,
    LookStraight,
    TurnHead,
    Hold,
}

/// Observable outcome of one transition step
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    PhaseChanged { from: Phase, to: Phase },
    Stability { count: u32, target: u32 },
    Guidance(Guidance),
    CountdownTick { remaining: Duration },
    ScanProgress { phase: Phase, percent: u8 },
    ScaleFrozen { mm_per_px: f64 },
    /// The input does not apply to the current phase
    Ignored,
}

/// One detector frame
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub landmarks: &'a LandmarkFrame,
    pub width: u32,
    pub height: u32,
    /// Used to pick the assumed IPD during the frontal phases
    pub gender_hint: Option<Gender>,
}

impl<'a> Frame<'a> {
    #[must_use]
    pub fn new(landmarks: &'a LandmarkFrame, width: u32, height: u32) -> Self {
        Self {
            landmarks,
            width,
            height,
            gender_hint: None,
        }
    }

    #[must_use]
    pub fn with_gender_hint(mut self, gender: Option<Gender>) -> Self {
        self.gender_hint = gender;
        self
    }
}

/// Input to a transition step
#[derive(Debug, Clone, Copy)]
pub enum SessionInput<'a> {
    Frame(Frame<'a>),
    /// Time elapsed on the caller-owned countdown timer
    TimerElapsed(Duration),
}

/// Non-fatal warnings attached to a finished capture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// Likely over-measured because of camera distance or angle; remeasure
    FaceLengthOutOfRange { measured_mm: f64, ceiling_mm: f64 },
}

/// Averaged measurements of a completed session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureResult {
    pub front: FrontalMeasurement,
    pub profile: ProfileMeasurement,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<Advisory>,
}

/// All mutable state of one capture
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    phase: Phase,
    stability_counter: u32,
    countdown_remaining: Duration,
    front_buffer: ScanBuffer<FrontalMeasurement>,
    profile_buffer: ScanBuffer<ProfileMeasurement>,
    frozen_scale_factor: Option<f64>,
    last_pose: Option<PoseCheck>,
}

impl SessionState {
    /// Fresh state in [`Phase::Idle`]
    ///
    /// # Panics
    ///
    /// Panics if `config.capture.scan_frames` is zero
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            phase: Phase::Idle,
            stability_counter: 0,
            countdown_remaining: config.capture.countdown(),
            front_buffer: ScanBuffer::new(config.capture.scan_frames),
            profile_buffer: ScanBuffer::new(config.capture.scan_frames),
            frozen_scale_factor: None,
            last_pose: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn stability_counter(&self) -> u32 {
        self.stability_counter
    }

    #[must_use]
    pub fn countdown_remaining(&self) -> Duration {
        self.countdown_remaining
    }

    #[must_use]
    pub fn front_buffer(&self) -> &ScanBuffer<FrontalMeasurement> {
        &self.front_buffer
    }

    #[must_use]
    pub fn profile_buffer(&self) -> &ScanBuffer<ProfileMeasurement> {
        &self.profile_buffer
    }

    #[must_use]
    pub fn frozen_scale_factor(&self) -> Option<f64> {
        self.frozen_scale_factor
    }

    /// Pose verdict of the most recent frame with a face
    #[must_use]
    pub fn last_pose(&self) -> Option<PoseCheck> {
        self.last_pose
    }

    /// Progress of the active scan, or 0 outside the scan phases
    #[must_use]
    pub fn scan_progress(&self) -> u8 {
        match self.phase {
            Phase::ScanningFront => self.front_buffer.progress(),
            Phase::ScanningProfile => self.profile_buffer.progress(),
            Phase::GuideTurnSide => 100,
            _ => 0,
        }
    }

    /// Leave [`Phase::Idle`] for [`Phase::GuideCheck`]
    ///
    /// # Errors
    ///
    /// Returns [`Error::Precondition`] if the session was already started
    pub fn start(&mut self) -> Result<Vec<SessionEvent>> {
        if self.phase != Phase::Idle {
            return Err(Error::Precondition(format!(
                "Session already started (phase {:?})",
                self.phase
            )));
        }
        let mut events = Vec::new();
        self.transition(Phase::GuideCheck, &mut events);
        Ok(events)
    }

    /// Apply one input and return the events it produced.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The frame is malformed (zero dimensions, non-normalized points)
    /// - An internal precondition is violated (profile scan without a frozen scale)
    pub fn step(&mut self, input: SessionInput<'_>, config: &Config) -> Result<Vec<SessionEvent>> {
        let mut events = Vec::new();
        match input {
            SessionInput::TimerElapsed(elapsed) => self.on_timer(elapsed, config, &mut events),
            SessionInput::Frame(frame) => self.on_frame(&frame, config, &mut events)?,
        }
        Ok(events)
    }

    fn on_timer(&mut self, elapsed: Duration, config: &Config, events: &mut Vec<SessionEvent>) {
        if self.phase != Phase::Countdown {
            events.push(SessionEvent::Ignored);
            return;
        }
        self.countdown_remaining = self.countdown_remaining.saturating_sub(elapsed);
        events.push(SessionEvent::CountdownTick {
            remaining: self.countdown_remaining,
        });
        if self.countdown_remaining.is_zero() {
            self.front_buffer.clear();
            self.countdown_remaining = config.capture.countdown();
            self.transition(Phase::ScanningFront, events);
        }
    }

    fn on_frame(&mut self, frame: &Frame<'_>, config: &Config, events: &mut Vec<SessionEvent>) -> Result<()> {
        if matches!(self.phase, Phase::Idle | Phase::Countdown | Phase::Complete) {
            events.push(SessionEvent::Ignored);
            return Ok(());
        }

        let Some(face) = FaceLandmarks::from_frame(frame.landmarks, frame.width, frame.height)? else {
            self.on_no_face(events);
            return Ok(());
        };

        let validator = PoseValidator::new(config.pose);
        let pose = validator.check(&face);
        self.last_pose = Some(pose);

        match self.phase {
            Phase::GuideCheck => self.guide_check(&face, pose, frame.gender_hint, config, events),
            Phase::ScanningFront => self.scan_front(&face, frame.gender_hint, config, events)?,
            Phase::GuideTurnSide => self.guide_turn_side(pose, config, events),
            Phase::ScanningProfile => self.scan_profile(&face, events)?,
            Phase::Idle | Phase::Countdown | Phase::Complete => {}
        }
        Ok(())
    }

    /// Missing face is a soft failure: guidance phases lose their streak
    fn on_no_face(&mut self, events: &mut Vec<SessionEvent>) {
        debug!("No face in frame during {:?}", self.phase);
        self.last_pose = None;
        if matches!(self.phase, Phase::GuideCheck | Phase::GuideTurnSide) {
            self.stability_counter = 0;
        }
        events.push(SessionEvent::Guidance(Guidance::FaceNotFound));
    }

    fn guide_check(
        &mut self,
        face: &FaceLandmarks,
        pose: PoseCheck,
        gender: Option<Gender>,
        config: &Config,
        events: &mut Vec<SessionEvent>,
    ) {
        let calibratable = measure_frontal(face, gender, &config.calibration).is_some();
        let guidance = if !calibratable {
            Some(Guidance::FaceNotFound)
        } else if !pose.front_facing {
            Some(Guidance::LookStraight)
        } else if !pose.size_valid {
            Some(Guidance::FaceTooFar)
        } else {
            None
        };

        let target = config.capture.front_stability_frames;
        if let Some(guidance) = guidance {
            debug!("Front guide rejected frame: {guidance:?} (yaw {:.1}°)", pose.yaw_deg);
            self.stability_counter = 0;
            events.push(SessionEvent::Guidance(guidance));
            events.push(SessionEvent::Stability { count: 0, target });
            return;
        }

        self.stability_counter += 1;
        events.push(SessionEvent::Guidance(Guidance::Hold));
        events.push(SessionEvent::Stability {
            count: self.stability_counter.min(target),
            target,
        });

        if self.stability_counter >= target {
            self.stability_counter = 0;
            self.countdown_remaining = config.capture.countdown();
            self.transition(Phase::Countdown, events);
        }
    }

    fn scan_front(
        &mut self,
        face: &FaceLandmarks,
        gender: Option<Gender>,
        config: &Config,
        events: &mut Vec<SessionEvent>,
    ) -> Result<()> {
        let Some(measurement) = measure_frontal(face, gender, &config.calibration) else {
            events.push(SessionEvent::Guidance(Guidance::FaceNotFound));
            return Ok(());
        };
        self.front_buffer.add(measurement)?;
        events.push(SessionEvent::ScanProgress {
            phase: Phase::ScanningFront,
            percent: self.front_buffer.progress(),
        });

        if self.front_buffer.is_full() {
            let average = self.front_buffer.average().ok_or_else(|| {
                Error::Precondition("Front buffer full but has no average".to_string())
            })?;
            let scale = average.scale_factor_mm_per_px;
            info!("Front scan complete, scale frozen at {scale:.5} mm/px");
            self.frozen_scale_factor = Some(scale);
            self.stability_counter = 0;
            events.push(SessionEvent::ScaleFrozen { mm_per_px: scale });
            events.push(SessionEvent::Guidance(Guidance::TurnHead));
            self.transition(Phase::GuideTurnSide, events);
        }
        Ok(())
    }

    fn guide_turn_side(&mut self, pose: PoseCheck, config: &Config, events: &mut Vec<SessionEvent>) {
        let target = config.capture.side_stability_frames;
        if !pose.profile_facing {
            self.stability_counter = 0;
            events.push(SessionEvent::Guidance(Guidance::TurnHead));
            events.push(SessionEvent::Stability { count: 0, target });
            return;
        }

        self.stability_counter += 1;
        events.push(SessionEvent::Guidance(Guidance::Hold));
        events.push(SessionEvent::Stability {
            count: self.stability_counter.min(target),
            target,
        });

        if self.stability_counter >= target {
            self.stability_counter = 0;
            self.profile_buffer.clear();
            self.transition(Phase::ScanningProfile, events);
        }
    }

    fn scan_profile(&mut self, face: &FaceLandmarks, events: &mut Vec<SessionEvent>) -> Result<()> {
        let scale = self.frozen_scale_factor.ok_or_else(|| {
            Error::Precondition("Profile scan started without a frozen scale factor".to_string())
        })?;
        self.profile_buffer.add(measure_profile(face, scale))?;
        events.push(SessionEvent::ScanProgress {
            phase: Phase::ScanningProfile,
            percent: self.profile_buffer.progress(),
        });

        if self.profile_buffer.is_full() {
            self.transition(Phase::Complete, events);
        }
        Ok(())
    }

    fn transition(&mut self, to: Phase, events: &mut Vec<SessionEvent>) {
        let from = self.phase;
        info!("Capture phase {from:?} -> {to:?}");
        self.phase = to;
        events.push(SessionEvent::PhaseChanged { from, to });
    }

    /// Averaged results of a completed capture.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Precondition`] if the session is not complete or a
    /// buffer is not full.
    pub fn capture_result(&self, config: &Config) -> Result<CaptureResult> {
        if self.phase != Phase::Complete {
            return Err(Error::Precondition(format!(
                "Results requested in phase {:?}",
                self.phase
            )));
        }
        let front = self
            .front_buffer
            .average()
            .ok_or_else(|| Error::Precondition("Front buffer is not full".to_string()))?;
        let profile = self
            .profile_buffer
            .average()
            .ok_or_else(|| Error::Precondition("Profile buffer is not full".to_string()))?;

        let mut advisories = Vec::new();
        let validator = PoseValidator::new(config.pose);
        if !validator.is_face_length_in_range(front.face_length_mm) {
            warn!(
                "Face length {:.1} mm exceeds {:.1} mm; remeasure recommended",
                front.face_length_mm, config.pose.max_face_length_mm
            );
            advisories.push(Advisory::FaceLengthOutOfRange {
                measured_mm: front.face_length_mm,
                ceiling_mm: config.pose.max_face_length_mm,
            });
        }

        Ok(CaptureResult {
            front,
            profile,
            advisories,
        })
    }
}

/// Per-input status for the UI
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub phase: Phase,
    pub stability_counter: u32,
    pub scan_progress: u8,
    /// `None` when the input carried no face
    pub pose: Option<PoseCheck>,
    pub events: Vec<SessionEvent>,
}

/// One capture, driven by the caller one input at a time
#[derive(Debug, Clone)]
pub struct CaptureSession {
    config: Config,
    state: SessionState,
}

impl CaptureSession {
    /// Create a session in [`Phase::Idle`]
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the configuration is invalid
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let state = SessionState::new(&config);
        Ok(Self { config, state })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state.phase() == Phase::Complete
    }

    /// Begin guiding the user toward a frontal pose
    ///
    /// # Errors
    ///
    /// Returns [`Error::Precondition`] if already started
    pub fn start(&mut self) -> Result<FrameReport> {
        let events = self.state.start()?;
        Ok(self.report(events, false))
    }

    /// Feed one detector frame
    ///
    /// # Errors
    ///
    /// See [`SessionState::step`]
    pub fn process_frame(&mut self, frame: Frame<'_>) -> Result<FrameReport> {
        let events = self.state.step(SessionInput::Frame(frame), &self.config)?;
        let has_face = !frame.landmarks.is_empty();
        Ok(self.report(events, has_face))
    }

    /// Advance the countdown by time measured on the caller's timer
    pub fn advance_timer(&mut self, elapsed: Duration) -> FrameReport {
        let mut events = Vec::new();
        self.state.on_timer(elapsed, &self.config, &mut events);
        self.report(events, false)
    }

    /// Averaged front and profile measurements, available only once complete
    #[must_use]
    pub fn final_results(&self) -> Option<CaptureResult> {
        if !self.is_complete() {
            return None;
        }
        match self.state.capture_result(&self.config) {
            Ok(result) => Some(result),
            Err(e) => {
                warn!("Completed session has no results: {e}");
                None
            }
        }
    }

    /// Discard buffers, counters and the frozen scale; return to [`Phase::Idle`]
    pub fn reset(&mut self) {
        debug!("Resetting capture session from {:?}", self.state.phase());
        self.state = SessionState::new(&self.config);
    }

    fn report(&self, events: Vec<SessionEvent>, has_face: bool) -> FrameReport {
        FrameReport {
            phase: self.state.phase(),
            stability_counter: self.state.stability_counter(),
            scan_progress: self.state.scan_progress(),
            pose: if has_face { self.state.last_pose() } else { None },
            events,
        }
    }
}
