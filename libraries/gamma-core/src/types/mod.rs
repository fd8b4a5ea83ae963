mod audio;
mod catalog;
mod ids;
mod notification;
mod track;

pub use audio::{AudioHandle, AudioMode};
pub use catalog::{Catalog, LegacyPolarity};
pub use ids::{GroupId, TrackId};
pub use notification::{NotificationVariant, NowPlayingNotification};
pub use track::{Track, TrackGroup};
