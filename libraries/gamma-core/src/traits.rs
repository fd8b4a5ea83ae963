/// Collaborator traits for Gamma Noise
///
/// The playback controller is the only caller of `AudioEngine` and
/// `NotificationPresenter`. Platform glue implements these and routes
/// inbound events (notification actions, on-finish callbacks) back through
/// the controller's handle instead of calling the engine directly.
use crate::error::Result;
use crate::types::{AudioHandle, AudioMode, NowPlayingNotification, Track};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Audio engine trait
///
/// Every method is a suspension point; any of them may fail.
#[async_trait]
pub trait AudioEngine: Send + Sync {
    /// Apply the global audio session mode
    async fn set_audio_mode(&self, mode: AudioMode) -> Result<()>;

    /// Load a track as a looping sound
    ///
    /// # Errors
    /// `GammaError::AssetMissing` if the asset does not exist, or
    /// `GammaError::EngineRejected` if the engine refuses it
    async fn load(&self, track: &Track) -> Result<AudioHandle>;

    /// Start or resume playback
    async fn play(&self, handle: AudioHandle) -> Result<()>;

    /// Pause playback, keeping the handle loaded
    async fn pause(&self, handle: AudioHandle) -> Result<()>;

    /// Stop playback
    async fn stop(&self, handle: AudioHandle) -> Result<()>;

    /// Release the handle
    async fn unload(&self, handle: AudioHandle) -> Result<()>;

    /// Set the volume (0.0 = silent, 1.0 = full volume)
    async fn set_volume(&self, handle: AudioHandle, volume: f32) -> Result<()>;
}

/// System notification presenter
///
/// `show` replaces any notification previously shown by this presenter, so at
/// most one now-playing notification is visible.
#[async_trait]
pub trait NotificationPresenter: Send + Sync {
    /// Ask the OS for permission; returns whether it was granted
    async fn request_permission(&self) -> Result<bool>;

    /// Show (or replace) the now-playing notification
    ///
    /// # Errors
    /// `GammaError::PermissionDenied` if the user revoked permission
    async fn show(&self, notification: NowPlayingNotification) -> Result<()>;

    /// Dismiss every notification shown by the app
    async fn dismiss_all(&self) -> Result<()>;
}

/// Read side of the subscription status
///
/// The subscription SDK updates the value asynchronously; callers only read it.
pub trait EntitlementProvider: Send + Sync {
    /// Whether the user currently holds an active subscription
    fn is_pro_member(&self) -> bool;
}

/// Simple entitlement cell the SDK glue can push updates into
#[derive(Debug, Clone, Default)]
pub struct SharedEntitlement {
    pro: Arc<AtomicBool>,
}

impl SharedEntitlement {
    /// Create a cell with an initial status
    pub fn new(is_pro_member: bool) -> Self {
        Self {
            pro: Arc::new(AtomicBool::new(is_pro_member)),
        }
    }

    /// Record a new subscription status
    pub fn set_pro_member(&self, is_pro_member: bool) {
        self.pro.store(is_pro_member, Ordering::SeqCst);
    }
}

impl EntitlementProvider for SharedEntitlement {
    fn is_pro_member(&self) -> bool {
        self.pro.load(Ordering::SeqCst)
    }
}

/// Persistent key/value store of small flags used by the surrounding UI
#[async_trait]
pub trait FlagStore: Send + Sync {
    /// Read a value, `None` if never set
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_entitlement_clones_observe_updates() {
        let sdk_side = SharedEntitlement::new(false);
        let reader = sdk_side.clone();
        assert!(!reader.is_pro_member());

        sdk_side.set_pro_member(true);
        assert!(reader.is_pro_member());
    }
}
