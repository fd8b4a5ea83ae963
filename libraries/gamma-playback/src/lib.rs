//! Gamma Noise - Playback Session Control
//!
//! Owns the single active sound of the player and every rule around it.
//!
//! This crate provides:
//! - Tap-to-toggle: tapping the playing track stops it, tapping another switches
//! - Trial gate: gated tracks play for a fixed preview window for non-members,
//!   then stop and request the paywall exactly once
//! - Sleep timer: stops playback after a chosen number of minutes
//! - Session volume that carries over between tracks
//! - Now-playing notification kept in sync with the session, with pause/play
//!   actions routed back through the controller
//!
//! # Architecture
//!
//! The controller runs as one tokio task. `ControllerHandle` queues commands
//! and the task handles them strictly in order, so overlapping taps never
//! leave two sounds loaded. Timers post back into the same queue and carry
//! the session token or timer generation they were armed with; stale fires
//! are dropped.
//!
//! Platform audio and notifications are provided via the `gamma-core` traits.
//!
//! # Example
//!
//! ```rust,no_run
//! use gamma_core::Catalog;
//! use gamma_playback::{Collaborators, ControllerConfig, PlaybackSessionController};
//! use std::sync::Arc;
//!
//! # async fn run(collaborators: Collaborators) -> Result<(), Box<dyn std::error::Error>> {
//! let handle = PlaybackSessionController::spawn(
//!     Arc::new(Catalog::bundled()?),
//!     collaborators,
//!     ControllerConfig::default(),
//! )?;
//!
//! let mut events = handle.subscribe();
//! let snapshot = handle.tap("brown-noise").await?;
//! assert!(snapshot.mode.is_active());
//!
//! handle.enable_sleep_timer(30).await?;
//! while let Ok(event) = events.recv().await {
//!     println!("{:?}", event);
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod controller;
mod error;
mod events;
mod handle;
mod session;
mod sleep_timer;
mod timer;
pub mod types;
mod volume;

// Public exports
pub use config::{ControllerConfig, NotificationSettings, SleepTimerBounds};
pub use controller::{Collaborators, PlaybackSessionController};
pub use error::{PlaybackError, Result};
pub use events::ControllerEvent;
pub use handle::ControllerHandle;
pub use types::{
    NotificationAction, SessionMode, SessionSnapshot, SessionToken, SleepTimerSnapshot, StopReason,
};
