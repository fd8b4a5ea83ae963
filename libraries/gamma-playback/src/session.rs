//! The single active playback session

use crate::types::{SessionMode, SessionToken};
use chrono::{DateTime, Utc};
use gamma_core::{AudioHandle, Track};
use std::time::Duration;
use tokio::time::Instant;

/// Runtime record of the loaded track
///
/// Exists only while a handle is loaded and playing (or paused); the
/// controller holds at most one.
#[derive(Debug, Clone)]
pub(crate) struct PlaybackSession {
    pub token: SessionToken,
    pub track: Track,
    pub handle: AudioHandle,
    pub mode: SessionMode,
    pub started_at: Instant,
    pub started_at_wall: DateTime<Utc>,
    /// Fixed when the trial begins; set only for `PlayingTrial`
    pub trial_deadline: Option<Instant>,
    pub paused: bool,
}

impl PlaybackSession {
    pub(crate) fn start(
        token: SessionToken,
        track: Track,
        handle: AudioHandle,
        mode: SessionMode,
        trial_duration: Duration,
    ) -> Self {
        let started_at = Instant::now();
        Self {
            token,
            track,
            handle,
            mode,
            started_at,
            started_at_wall: Utc::now(),
            trial_deadline: (mode == SessionMode::PlayingTrial)
                .then(|| started_at + trial_duration),
            paused: false,
        }
    }

    pub(crate) fn trial_remaining(&self, now: Instant) -> Option<Duration> {
        self.trial_deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Convert a trial into full playback
    pub(crate) fn upgrade(&mut self, token: SessionToken) {
        self.token = token;
        self.mode = SessionMode::PlayingFull;
        self.trial_deadline = None;
    }

    /// Convert full playback of a gated track into a trial ending at `deadline`
    pub(crate) fn downgrade(&mut self, token: SessionToken, deadline: Instant) {
        self.token = token;
        self.mode = SessionMode::PlayingTrial;
        self.trial_deadline = Some(deadline);
    }
}
