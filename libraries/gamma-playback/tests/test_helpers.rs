//! Test helpers and fakes for controller integration tests
//!
//! The fake engine tracks which handles are loaded so tests can assert that
//! at most one sound ever exists, no matter how requests interleave.

#![allow(dead_code)]

use async_trait::async_trait;
use gamma_core::{
    AudioEngine, AudioHandle, AudioMode, Catalog, GammaError, GroupId, NotificationPresenter,
    NowPlayingNotification, SharedEntitlement, Track, TrackGroup, TrackId,
};
use gamma_playback::{
    Collaborators, ControllerConfig, ControllerEvent, ControllerHandle, PlaybackSessionController,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;

/// Free-tier track in the fixture catalog
pub const BROWN: &str = "brown-noise";
/// Gated track in the fixture catalog
pub const WHITE: &str = "white-noise";
/// Second gated track in the fixture catalog
pub const PINK: &str = "pink-noise";
/// Free track whose asset the fake engine refuses to load
pub const MISSING: &str = "missing-noise";

/// Calls observed by the fake engine, in order
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    SetAudioMode(AudioMode),
    Load(TrackId),
    Play(AudioHandle),
    Pause(AudioHandle),
    Stop(AudioHandle),
    Unload(AudioHandle),
    SetVolume(AudioHandle, f32),
}

#[derive(Debug, Default)]
struct EngineState {
    next_handle: u64,
    loaded: HashMap<AudioHandle, TrackId>,
    playing: HashSet<AudioHandle>,
    volumes: HashMap<AudioHandle, f32>,
    calls: Vec<EngineCall>,
    max_loaded: usize,
    fail_play: bool,
    fail_volume: bool,
    fail_pause: bool,
    fail_stop: bool,
}

/// In-memory audio engine
#[derive(Debug, Default)]
pub struct FakeEngine {
    state: Mutex<EngineState>,
    load_delay: Mutex<Option<Duration>>,
}

impl FakeEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every load take this long (virtual time)
    pub fn set_load_delay(&self, delay: Duration) {
        *self.load_delay.lock().unwrap() = Some(delay);
    }

    pub fn fail_play(&self, fail: bool) {
        self.state.lock().unwrap().fail_play = fail;
    }

    pub fn fail_volume(&self, fail: bool) {
        self.state.lock().unwrap().fail_volume = fail;
    }

    pub fn fail_pause(&self, fail: bool) {
        self.state.lock().unwrap().fail_pause = fail;
    }

    pub fn fail_stop(&self, fail: bool) {
        self.state.lock().unwrap().fail_stop = fail;
    }

    /// Handles currently loaded
    pub fn loaded_count(&self) -> usize {
        self.state.lock().unwrap().loaded.len()
    }

    /// Highest number of simultaneously loaded handles ever observed
    pub fn max_loaded(&self) -> usize {
        self.state.lock().unwrap().max_loaded
    }

    /// Track of the handle that is loaded and playing, if any
    pub fn playing_track(&self) -> Option<TrackId> {
        let state = self.state.lock().unwrap();
        state
            .playing
            .iter()
            .find_map(|handle| state.loaded.get(handle).cloned())
    }

    /// Handle currently loaded for `track_id`
    pub fn handle_of(&self, track_id: &str) -> Option<AudioHandle> {
        let state = self.state.lock().unwrap();
        state
            .loaded
            .iter()
            .find(|(_, id)| id.as_str() == track_id)
            .map(|(handle, _)| *handle)
    }

    pub fn volume_of(&self, handle: AudioHandle) -> Option<f32> {
        self.state.lock().unwrap().volumes.get(&handle).copied()
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count_calls(&self, matches: impl Fn(&EngineCall) -> bool) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| matches(c))
            .count()
    }
}

#[async_trait]
impl AudioEngine for FakeEngine {
    async fn set_audio_mode(&self, mode: AudioMode) -> gamma_core::Result<()> {
        self.state
            .lock()
            .unwrap()
            .calls
            .push(EngineCall::SetAudioMode(mode));
        Ok(())
    }

    async fn load(&self, track: &Track) -> gamma_core::Result<AudioHandle> {
        let delay = *self.load_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock().unwrap();
        state.calls.push(EngineCall::Load(track.id.clone()));
        if track.asset.is_empty() {
            return Err(GammaError::AssetMissing(track.id.clone()));
        }

        state.next_handle += 1;
        let handle = AudioHandle::new(state.next_handle);
        state.loaded.insert(handle, track.id.clone());
        state.max_loaded = state.max_loaded.max(state.loaded.len());
        Ok(handle)
    }

    async fn play(&self, handle: AudioHandle) -> gamma_core::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(EngineCall::Play(handle));
        if state.fail_play {
            return Err(GammaError::engine("play rejected"));
        }
        if !state.loaded.contains_key(&handle) {
            return Err(GammaError::engine(format!("unknown handle {}", handle)));
        }
        state.playing.insert(handle);
        Ok(())
    }

    async fn pause(&self, handle: AudioHandle) -> gamma_core::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(EngineCall::Pause(handle));
        if state.fail_pause {
            return Err(GammaError::engine("pause rejected"));
        }
        state.playing.remove(&handle);
        Ok(())
    }

    async fn stop(&self, handle: AudioHandle) -> gamma_core::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(EngineCall::Stop(handle));
        state.playing.remove(&handle);
        if state.fail_stop {
            return Err(GammaError::engine("stop rejected"));
        }
        Ok(())
    }

    async fn unload(&self, handle: AudioHandle) -> gamma_core::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(EngineCall::Unload(handle));
        state.playing.remove(&handle);
        state.volumes.remove(&handle);
        state.loaded.remove(&handle);
        Ok(())
    }

    async fn set_volume(&self, handle: AudioHandle, volume: f32) -> gamma_core::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(EngineCall::SetVolume(handle, volume));
        if state.fail_volume {
            return Err(GammaError::engine("volume rejected"));
        }
        state.volumes.insert(handle, volume);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct PresenterState {
    denied: bool,
    revoked: bool,
    permission_requests: usize,
    visible: Option<NowPlayingNotification>,
    shown: Vec<NowPlayingNotification>,
    dismissals: usize,
}

/// Notification presenter keeping the single visible notification in memory
#[derive(Debug, Default)]
pub struct FakePresenter {
    state: Mutex<PresenterState>,
}

impl FakePresenter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Presenter whose permission prompt is declined
    pub fn denied() -> Arc<Self> {
        let presenter = Self::default();
        presenter.state.lock().unwrap().denied = true;
        Arc::new(presenter)
    }

    /// Permission granted at startup but revoked later in system settings
    pub fn revoke(&self) {
        self.state.lock().unwrap().revoked = true;
    }

    pub fn visible(&self) -> Option<NowPlayingNotification> {
        self.state.lock().unwrap().visible.clone()
    }

    pub fn shown(&self) -> Vec<NowPlayingNotification> {
        self.state.lock().unwrap().shown.clone()
    }

    pub fn dismissals(&self) -> usize {
        self.state.lock().unwrap().dismissals
    }

    pub fn permission_requests(&self) -> usize {
        self.state.lock().unwrap().permission_requests
    }
}

#[async_trait]
impl NotificationPresenter for FakePresenter {
    async fn request_permission(&self) -> gamma_core::Result<bool> {
        let mut state = self.state.lock().unwrap();
        state.permission_requests += 1;
        Ok(!state.denied)
    }

    async fn show(&self, notification: NowPlayingNotification) -> gamma_core::Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.denied || state.revoked {
            return Err(GammaError::PermissionDenied);
        }
        state.shown.push(notification.clone());
        state.visible = Some(notification);
        Ok(())
    }

    async fn dismiss_all(&self) -> gamma_core::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.visible = None;
        state.dismissals += 1;
        Ok(())
    }
}

/// Catalog with one free track, two gated tracks and one unloadable track
pub fn fixture_catalog() -> Arc<Catalog> {
    let group = GroupId::new("sleep-aid-anxiety");
    let catalog = Catalog::new(vec![TrackGroup {
        id: group.clone(),
        title: "Sleep Aid & Anxiety".to_string(),
        tracks: vec![
            Track::new(BROWN, "Brown Noise", group.clone(), "brown.mp3").with_entitlement(false),
            Track::new(WHITE, "White Noise", group.clone(), "white.mp3"),
            Track::new(PINK, "Pink Noise", group.clone(), "pink.mp3"),
            Track::new(MISSING, "Missing Noise", group, "").with_entitlement(false),
        ],
    }])
    .expect("fixture catalog is valid");
    Arc::new(catalog)
}

/// A running controller wired to fakes
pub struct Harness {
    pub handle: ControllerHandle,
    pub engine: Arc<FakeEngine>,
    pub presenter: Arc<FakePresenter>,
    pub entitlement: SharedEntitlement,
    pub events: broadcast::Receiver<ControllerEvent>,
}

impl Harness {
    /// Controller for a non-member with default configuration
    pub async fn new() -> Self {
        Self::with(false, FakePresenter::new(), ControllerConfig::default()).await
    }

    /// Controller for a pro member
    pub async fn pro() -> Self {
        Self::with(true, FakePresenter::new(), ControllerConfig::default()).await
    }

    pub async fn with(
        is_pro_member: bool,
        presenter: Arc<FakePresenter>,
        config: ControllerConfig,
    ) -> Self {
        init_tracing();
        let engine = FakeEngine::new();
        let entitlement = SharedEntitlement::new(is_pro_member);
        let handle = PlaybackSessionController::spawn(
            fixture_catalog(),
            Collaborators {
                engine: engine.clone(),
                notifications: presenter.clone(),
                entitlement: Arc::new(entitlement.clone()),
            },
            config,
        )
        .expect("Failed to spawn controller");
        let events = handle.subscribe();

        // Wait for startup (audio mode, permission prompt) to finish
        handle.snapshot().await.expect("controller is running");

        Self {
            handle,
            engine,
            presenter,
            entitlement,
            events,
        }
    }

    /// Drain every event emitted so far
    pub fn drain_events(&mut self) -> Vec<ControllerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}

/// Count paywall prompts in a list of events
pub fn paywall_count(events: &[ControllerEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, ControllerEvent::PaywallRequested { .. }))
        .count()
}

/// Let virtual time pass; timers due in that window fire and are processed
pub async fn advance(duration: Duration) {
    tokio::time::sleep(duration).await;
}

/// Install a test subscriber once; `RUST_LOG` controls verbosity
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
