//! Playback session controller - core orchestration
//!
//! A single tokio task owns the session slot, the sleep timer, the volume and
//! both timers. Every request arrives as a `Command` on one queue and is
//! handled to completion, including all awaited engine and notification calls,
//! before the next one is read. That serializes taps: a second tap waits until
//! the first one's stop/unload/load/play sequence is done.
//!
//! Timer fires come back through the same queue carrying the token (trial) or
//! generation (sleep timer) they were armed with, and are dropped when stale.

use crate::config::ControllerConfig;
use crate::error::{PlaybackError, Result};
use crate::events::ControllerEvent;
use crate::handle::ControllerHandle;
use crate::session::PlaybackSession;
use crate::sleep_timer::SleepTimer;
use crate::timer::TimerSlot;
use crate::types::{NotificationAction, SessionMode, SessionSnapshot, SessionToken, StopReason};
use crate::volume::Volume;
use gamma_core::{
    AudioEngine, AudioHandle, Catalog, EntitlementProvider, GammaError, NotificationPresenter,
    NotificationVariant, NowPlayingNotification, Track, TrackId,
};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Platform services the controller drives
#[derive(Clone)]
pub struct Collaborators {
    pub engine: Arc<dyn AudioEngine>,
    pub notifications: Arc<dyn NotificationPresenter>,
    pub entitlement: Arc<dyn EntitlementProvider>,
}

/// Requests processed by the controller task
#[derive(Debug)]
pub(crate) enum Command {
    Tap {
        track_id: TrackId,
        reply: oneshot::Sender<Result<SessionSnapshot>>,
    },
    Stop {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    SetVolume {
        volume: f32,
        reply: oneshot::Sender<Result<SessionSnapshot>>,
    },
    EnableSleepTimer {
        minutes: u32,
        reply: oneshot::Sender<Result<SessionSnapshot>>,
    },
    DisableSleepTimer {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    NotificationAction(NotificationAction),
    TrackFinished(AudioHandle),
    EntitlementChanged,
    TrialExpired {
        token: SessionToken,
    },
    SleepTimerFired {
        generation: u64,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Owner of the single playback slot
pub struct PlaybackSessionController {
    catalog: Arc<Catalog>,
    engine: Arc<dyn AudioEngine>,
    notifications: Arc<dyn NotificationPresenter>,
    entitlement: Arc<dyn EntitlementProvider>,
    config: ControllerConfig,

    session: Option<PlaybackSession>,
    token: SessionToken,
    volume: Volume,
    sleep_timer: SleepTimer,
    trial_timer: TimerSlot,
    sleep_timer_task: TimerSlot,
    notifications_enabled: bool,

    commands: mpsc::WeakSender<Command>,
    events: broadcast::Sender<ControllerEvent>,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl PlaybackSessionController {
    /// Start the controller task and return a handle to it
    ///
    /// Must be called from within a tokio runtime. The audio mode is applied
    /// and notification permission requested before the first command runs.
    ///
    /// # Errors
    /// `PlaybackError::Config` if the configuration is invalid
    pub fn spawn(
        catalog: Arc<Catalog>,
        collaborators: Collaborators,
        config: ControllerConfig,
    ) -> Result<ControllerHandle> {
        config.validate()?;

        let (command_tx, command_rx) = mpsc::channel(config.command_capacity);
        let (event_tx, _) = broadcast::channel(config.event_capacity);
        let volume = Volume::new(config.default_volume);
        let (snapshot_tx, snapshot_rx) = watch::channel(SessionSnapshot::idle(volume.level()));

        let controller = Self {
            catalog,
            engine: collaborators.engine,
            notifications: collaborators.notifications,
            entitlement: collaborators.entitlement,
            config,
            session: None,
            token: SessionToken::default(),
            volume,
            sleep_timer: SleepTimer::new(),
            trial_timer: TimerSlot::new("trial"),
            sleep_timer_task: TimerSlot::new("sleep"),
            notifications_enabled: true,
            commands: command_tx.downgrade(),
            events: event_tx.clone(),
            snapshots: snapshot_tx,
        };

        tokio::spawn(controller.run(command_rx));

        Ok(ControllerHandle::new(command_tx, event_tx, snapshot_rx))
    }

    async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        self.initialize().await;

        while let Some(command) = commands.recv().await {
            if let Command::Shutdown { reply } = command {
                self.teardown().await;
                let _ = reply.send(());
                return;
            }
            self.dispatch(command).await;
        }

        // Every handle was dropped
        self.teardown().await;
    }

    async fn initialize(&mut self) {
        if let Err(e) = self.engine.set_audio_mode(self.config.audio_mode).await {
            warn!("Failed to apply audio mode: {}", e);
        }

        match self.notifications.request_permission().await {
            Ok(true) => {}
            Ok(false) => self.notifications_unavailable(),
            Err(e) => {
                warn!("Notification permission request failed: {}", e);
                self.notifications_unavailable();
            }
        }

        self.publish();
    }

    async fn dispatch(&mut self, command: Command) {
        match command {
            Command::Tap { track_id, reply } => {
                let result = self.tap(track_id).await.map(|()| self.snapshot());
                let _ = reply.send(result);
            }
            Command::Stop { reply } => {
                self.end_session(StopReason::UserStopped).await;
                let _ = reply.send(self.snapshot());
            }
            Command::SetVolume { volume, reply } => {
                let result = self.set_volume(volume).await.map(|()| self.snapshot());
                let _ = reply.send(result);
            }
            Command::EnableSleepTimer { minutes, reply } => {
                let result = self.enable_sleep_timer(minutes).map(|()| self.snapshot());
                let _ = reply.send(result);
            }
            Command::DisableSleepTimer { reply } => {
                self.disable_sleep_timer();
                let _ = reply.send(self.snapshot());
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            Command::NotificationAction(action) => self.notification_action(action).await,
            Command::TrackFinished(handle) => self.track_finished(handle).await,
            Command::EntitlementChanged => self.entitlement_changed().await,
            Command::TrialExpired { token } => self.trial_expired(token).await,
            Command::SleepTimerFired { generation } => self.sleep_timer_fired(generation).await,
            Command::Shutdown { reply } => {
                // Handled in run(); kept exhaustive
                self.teardown().await;
                let _ = reply.send(());
            }
        }
    }

    // ===== Transitions =====

    async fn tap(&mut self, track_id: TrackId) -> Result<()> {
        let track = self
            .catalog
            .track(&track_id)
            .cloned()
            .ok_or_else(|| PlaybackError::UnknownTrack(track_id.clone()))?;

        let current = self.session.as_ref().map(|s| s.track.id.clone());
        match current {
            Some(current) if current == track_id => {
                self.end_session(StopReason::UserStopped).await;
                Ok(())
            }
            Some(_) => {
                self.end_session(StopReason::Switched).await;
                self.start_session(track).await
            }
            None => self.start_session(track).await,
        }
    }

    async fn start_session(&mut self, track: Track) -> Result<()> {
        let mode = SessionMode::for_track(&track, self.entitlement.is_pro_member());

        let handle = match self.engine.load(&track).await {
            Ok(handle) => handle,
            Err(e) => {
                error!("Failed to load {}: {}", track.id, e);
                self.emit(ControllerEvent::PlaybackFailed {
                    track_id: track.id.clone(),
                    message: e.to_string(),
                });
                self.publish();
                return Err(PlaybackError::LoadFailed {
                    track_id: track.id,
                    reason: e.to_string(),
                });
            }
        };

        if let Err(e) = self.begin_playback(handle).await {
            error!("Failed to start {}: {}", track.id, e);
            self.release(handle).await;
            self.emit(ControllerEvent::PlaybackFailed {
                track_id: track.id.clone(),
                message: e.to_string(),
            });
            self.publish();
            return Err(PlaybackError::Audio(e.to_string()));
        }

        self.token = self.token.next();
        let session = PlaybackSession::start(
            self.token,
            track,
            handle,
            mode,
            self.config.trial_duration(),
        );
        let track_id = session.track.id.clone();

        if let Some(deadline) = session.trial_deadline {
            self.trial_timer.schedule_at(
                deadline,
                self.commands.clone(),
                Command::TrialExpired { token: self.token },
            );
        }
        self.session = Some(session);

        if self.sleep_timer.is_pending() {
            self.arm_sleep_timer(Instant::now());
        }

        self.show_notification().await;

        info!("Playing {} ({:?}, token {})", track_id, mode, self.token);
        self.emit(ControllerEvent::SessionStarted {
            track_id,
            mode,
            token: self.token,
        });
        self.publish();
        Ok(())
    }

    async fn begin_playback(&self, handle: AudioHandle) -> gamma_core::Result<()> {
        self.engine.set_volume(handle, self.volume.level()).await?;
        self.engine.play(handle).await
    }

    /// Stop and release the active session, if any
    ///
    /// Timers are cancelled before any engine call. Engine and notification
    /// failures are logged; the slot is empty afterwards regardless.
    async fn end_session(&mut self, reason: StopReason) -> Option<TrackId> {
        self.trial_timer.cancel();
        let session = self.session.take()?;

        let sleep_timer_was_enabled = self.sleep_timer.disable();
        self.sleep_timer_task.cancel();
        self.token = self.token.next();

        if let Err(e) = self.engine.stop(session.handle).await {
            warn!("Failed to stop {}: {}", session.track.id, e);
        }
        self.release(session.handle).await;
        self.dismiss_notifications().await;

        info!("Stopped {} ({:?})", session.track.id, reason);
        if sleep_timer_was_enabled {
            self.emit(ControllerEvent::SleepTimerChanged {
                enabled: false,
                duration_minutes: None,
            });
        }
        self.emit(ControllerEvent::SessionEnded {
            track_id: session.track.id.clone(),
            reason,
        });
        self.publish();
        Some(session.track.id)
    }

    /// Roll back to idle after an engine failure on the active session
    async fn fail_session(&mut self, error: &GammaError) {
        if let Some(track_id) = self.end_session(StopReason::Failure).await {
            self.emit(ControllerEvent::PlaybackFailed {
                track_id,
                message: error.to_string(),
            });
        }
    }

    async fn release(&self, handle: AudioHandle) {
        if let Err(e) = self.engine.unload(handle).await {
            warn!("Failed to unload handle {}: {}", handle, e);
        }
    }

    async fn trial_expired(&mut self, token: SessionToken) {
        let current = self
            .session
            .as_ref()
            .is_some_and(|s| s.token == token && s.mode == SessionMode::PlayingTrial);
        if !current {
            debug!("Ignoring stale trial timer (token {})", token);
            return;
        }

        if let Some(track_id) = self.end_session(StopReason::TrialExpired).await {
            info!("Trial of {} expired", track_id);
            self.emit(ControllerEvent::PaywallRequested { track_id });
        }
    }

    async fn entitlement_changed(&mut self) {
        let is_pro_member = self.entitlement.is_pro_member();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let mode = SessionMode::for_track(&session.track, is_pro_member);
        if mode == session.mode {
            return;
        }

        self.trial_timer.cancel();
        self.token = self.token.next();
        let track_id = session.track.id.clone();

        if mode == SessionMode::PlayingFull {
            session.upgrade(self.token);
            info!("Upgraded {} to full playback", track_id);
            self.show_notification().await;
            self.emit(ControllerEvent::SessionUpgraded { track_id });
        } else {
            // A lapsed subscription turns a gated session into a fresh trial
            let deadline = Instant::now() + self.config.trial_duration();
            session.downgrade(self.token, deadline);
            self.trial_timer.schedule_at(
                deadline,
                self.commands.clone(),
                Command::TrialExpired { token: self.token },
            );
            info!("Downgraded {} to trial playback", track_id);
            self.show_notification().await;
            self.emit(ControllerEvent::SessionDowngraded { track_id });
        }
        self.publish();
    }

    async fn track_finished(&mut self, handle: AudioHandle) {
        let replay = self
            .session
            .as_ref()
            .is_some_and(|s| s.handle == handle && !s.paused);
        if !replay {
            debug!("Ignoring finish of stale handle {}", handle);
            return;
        }

        debug!("Replaying handle {}", handle);
        if let Err(e) = self.engine.play(handle).await {
            warn!("Loop replay failed: {}", e);
            self.fail_session(&e).await;
        }
    }

    async fn notification_action(&mut self, action: NotificationAction) {
        let Some(session) = self.session.as_ref() else {
            debug!("Ignoring {:?} with no active session", action);
            return;
        };
        if &session.track.id != action.track_id() {
            debug!("Ignoring {:?} for a session that already changed", action);
            return;
        }
        let handle = session.handle;
        let track_id = session.track.id.clone();

        match action {
            NotificationAction::Pause { .. } if !session.paused => {
                if let Err(e) = self.engine.pause(handle).await {
                    warn!("Pause failed: {}", e);
                    self.fail_session(&e).await;
                    return;
                }
                self.set_paused(true);
                self.show_notification().await;
                self.emit(ControllerEvent::Paused { track_id });
                self.publish();
            }
            NotificationAction::Play { .. } if session.paused => {
                if let Err(e) = self.engine.play(handle).await {
                    warn!("Resume failed: {}", e);
                    self.fail_session(&e).await;
                    return;
                }
                self.set_paused(false);
                self.show_notification().await;
                self.emit(ControllerEvent::Resumed { track_id });
                self.publish();
            }
            _ => debug!("{:?} matches current state, nothing to do", action),
        }
    }

    fn set_paused(&mut self, paused: bool) {
        if let Some(session) = self.session.as_mut() {
            session.paused = paused;
        }
    }

    async fn set_volume(&mut self, volume: f32) -> Result<()> {
        let level = self.volume.set_level(volume)?;

        if let Some(handle) = self.session.as_ref().map(|s| s.handle) {
            if let Err(e) = self.engine.set_volume(handle, level).await {
                warn!("Volume change failed: {}", e);
                self.fail_session(&e).await;
                return Err(PlaybackError::Audio(e.to_string()));
            }
        }

        self.emit(ControllerEvent::VolumeChanged { volume: level });
        self.publish();
        Ok(())
    }

    // ===== Sleep timer =====

    fn enable_sleep_timer(&mut self, minutes: u32) -> Result<()> {
        self.sleep_timer.enable(minutes, &self.config.sleep_timer)?;
        self.sleep_timer_task.cancel();

        if self.session.is_some() {
            self.arm_sleep_timer(Instant::now());
        }

        info!("Sleep timer set to {} minutes", minutes);
        self.emit(ControllerEvent::SleepTimerChanged {
            enabled: true,
            duration_minutes: Some(minutes),
        });
        self.publish();
        Ok(())
    }

    fn arm_sleep_timer(&mut self, now: Instant) {
        if let Some((deadline, generation)) = self.sleep_timer.arm(now) {
            self.sleep_timer_task.schedule_at(
                deadline,
                self.commands.clone(),
                Command::SleepTimerFired { generation },
            );
        }
    }

    fn disable_sleep_timer(&mut self) {
        self.sleep_timer_task.cancel();
        if self.sleep_timer.disable() {
            info!("Sleep timer disabled");
            self.emit(ControllerEvent::SleepTimerChanged {
                enabled: false,
                duration_minutes: None,
            });
            self.publish();
        }
    }

    async fn sleep_timer_fired(&mut self, generation: u64) {
        if !self.sleep_timer.is_current(generation) {
            debug!("Ignoring stale sleep timer (generation {})", generation);
            return;
        }

        info!("Sleep timer elapsed");
        // Ending the session also disables the timer
        if self.end_session(StopReason::SleepTimer).await.is_none() {
            self.disable_sleep_timer();
        }
    }

    // ===== Notifications =====

    async fn show_notification(&mut self) {
        if !self.notifications_enabled {
            return;
        }
        let Some(session) = self.session.as_ref() else {
            return;
        };

        let settings = &self.config.notification;
        let (title, variant) = if session.paused {
            (settings.paused_title.clone(), NotificationVariant::Paused)
        } else if session.mode == SessionMode::PlayingTrial {
            (
                format!("{}{}", settings.title, settings.trial_suffix),
                NotificationVariant::Trial,
            )
        } else {
            (settings.title.clone(), NotificationVariant::Full)
        };

        let notification = NowPlayingNotification {
            title,
            body: session.track.display_name.clone(),
            track_id: session.track.id.clone(),
            sticky: true,
            variant,
        };

        match self.notifications.show(notification).await {
            Ok(()) => {}
            Err(e) if e.is_permission_denied() => self.notifications_unavailable(),
            Err(e) => warn!("Failed to show notification: {}", e),
        }
    }

    async fn dismiss_notifications(&self) {
        if !self.notifications_enabled {
            return;
        }
        if let Err(e) = self.notifications.dismiss_all().await {
            warn!("Failed to dismiss notifications: {}", e);
        }
    }

    fn notifications_unavailable(&mut self) {
        if !self.notifications_enabled {
            return;
        }
        warn!("Notification permission denied; continuing without now-playing notification");
        self.notifications_enabled = false;
        self.emit(ControllerEvent::NotificationsUnavailable);
    }

    // ===== Teardown & state =====

    async fn teardown(&mut self) {
        self.trial_timer.cancel();
        self.sleep_timer_task.cancel();
        self.end_session(StopReason::Shutdown).await;
        self.sleep_timer.disable();
        self.publish();
        info!("Playback controller shut down");
    }

    fn snapshot(&self) -> SessionSnapshot {
        let now = Instant::now();
        let mut snapshot = SessionSnapshot::idle(self.volume.level());
        snapshot.token = self.token;
        snapshot.sleep_timer = self.sleep_timer.snapshot(now);
        snapshot.notifications_enabled = self.notifications_enabled;

        if let Some(session) = &self.session {
            snapshot.mode = session.mode;
            snapshot.track_id = Some(session.track.id.clone());
            snapshot.paused = session.paused;
            snapshot.started_at = Some(session.started_at_wall);
            snapshot.trial_remaining = session.trial_remaining(now);
        }
        snapshot
    }

    fn emit(&self, event: ControllerEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }
}
