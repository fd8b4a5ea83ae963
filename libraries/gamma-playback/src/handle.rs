//! Cloneable front door to the controller task

use crate::controller::Command;
use crate::error::{PlaybackError, Result};
use crate::events::ControllerEvent;
use crate::types::{NotificationAction, SessionSnapshot};
use gamma_core::{AudioHandle, TrackId};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::debug;

/// Handle to a running `PlaybackSessionController`
///
/// Requests are queued and processed one at a time in arrival order. When the
/// last handle is dropped the controller tears down the active session.
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<ControllerEvent>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

impl ControllerHandle {
    pub(crate) fn new(
        commands: mpsc::Sender<Command>,
        events: broadcast::Sender<ControllerEvent>,
        snapshots: watch::Receiver<SessionSnapshot>,
    ) -> Self {
        Self {
            commands,
            events,
            snapshots,
        }
    }

    /// Toggle `track_id`: stop it if it is playing, otherwise switch to it
    ///
    /// # Errors
    /// - `UnknownTrack` if the catalog has no such track
    /// - `LoadFailed` / `Audio` if the engine could not start it (the
    ///   controller is idle afterwards)
    pub async fn tap(&self, track_id: impl Into<TrackId>) -> Result<SessionSnapshot> {
        let track_id = track_id.into();
        self.request(|reply| Command::Tap { track_id, reply }).await?
    }

    /// Stop whatever is playing
    pub async fn stop(&self) -> Result<SessionSnapshot> {
        self.request(|reply| Command::Stop { reply }).await
    }

    /// Set the volume for the current and all later sessions
    ///
    /// Finite values are clamped to 0.0 - 1.0.
    pub async fn set_volume(&self, volume: f32) -> Result<SessionSnapshot> {
        self.request(|reply| Command::SetVolume { volume, reply }).await?
    }

    /// Enable the sleep timer
    ///
    /// Counts down from now if something is playing, otherwise from the next
    /// session start.
    pub async fn enable_sleep_timer(&self, minutes: u32) -> Result<SessionSnapshot> {
        self.request(|reply| Command::EnableSleepTimer { minutes, reply }).await?
    }

    /// Disable the sleep timer
    pub async fn disable_sleep_timer(&self) -> Result<SessionSnapshot> {
        self.request(|reply| Command::DisableSleepTimer { reply }).await
    }

    /// Current state, after every previously queued request has been handled
    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Deliver a pause/play action from the now-playing notification
    pub async fn notification_action(&self, action: NotificationAction) -> Result<()> {
        self.send(Command::NotificationAction(action)).await
    }

    /// Report that the engine reached the end of `handle`'s sample
    pub async fn track_finished(&self, handle: AudioHandle) -> Result<()> {
        self.send(Command::TrackFinished(handle)).await
    }

    /// Report a change in subscription status
    pub async fn entitlement_changed(&self) -> Result<()> {
        self.send(Command::EntitlementChanged).await
    }

    /// Stop playback, cancel timers and end the controller task
    pub async fn shutdown(&self) -> Result<()> {
        self.request(|reply| Command::Shutdown { reply }).await
    }

    /// Subscribe to controller events
    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    /// Watch the latest published snapshot
    pub fn watch(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Latest published snapshot without waiting for queued requests
    pub fn current(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Whether the controller task is still accepting commands
    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.commands.send(command).await.map_err(|_| {
            debug!("Controller is gone, dropping command");
            PlaybackError::ControllerClosed
        })
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.send(command(reply)).await?;
        response.await.map_err(|_| PlaybackError::ControllerClosed)
    }
}
