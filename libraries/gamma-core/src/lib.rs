//! Gamma Noise Core
//!
//! Platform-agnostic core types, collaborator traits and error handling for
//! the Gamma Noise ambient-noise player.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackGroup`, `Catalog`, ids and notification payloads
//! - **Collaborator Traits**: `AudioEngine`, `NotificationPresenter`,
//!   `EntitlementProvider`, `FlagStore`
//! - **Error Handling**: Unified `GammaError` and `Result` types
//!
//! Platform glue (expo-style audio players, system notifications, the
//! subscription SDK) implements the traits; `gamma-playback` drives them.
//!
//! # Example
//!
//! ```rust
//! use gamma_core::{Catalog, TrackId};
//!
//! let catalog = Catalog::bundled().unwrap();
//! let brown = catalog.track(&TrackId::new("brown-noise")).unwrap();
//! assert!(!brown.requires_entitlement);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{GammaError, Result};
pub use traits::{
    AudioEngine, EntitlementProvider, FlagStore, NotificationPresenter, SharedEntitlement,
};

pub use types::{
    AudioHandle, AudioMode, Catalog, GroupId, LegacyPolarity, NotificationVariant,
    NowPlayingNotification, Track, TrackGroup, TrackId,
};
