//! Home-screen widget layer for FishWx
//!
//! Reads the weather and fishing-suitability snapshot the main application
//! leaves in a shared store, turns it into a localized visual tree, and keeps
//! placed widgets refreshed while the host allows it.

pub mod host;
pub mod keepalive;
pub mod locale;
pub mod presentation;
pub mod render;
pub mod scheduler;
pub mod snapshot;
pub mod store;
pub mod timeline;
pub mod types;

pub use types::*;
pub use host::{
    BroadcastAction, Clock, ManualClock, NotificationSink, ReceiverHandle, SystemClock, WidgetHost,
};
pub use keepalive::{
    GuardianSettings, KeepAliveGuardian, KeepAliveNotification, NotificationChannel,
};
pub use locale::{labels_for, resolve, LabelSet};
pub use render::{LaunchAction, VisualTree, WidgetRenderer};
pub use scheduler::{RefreshReport, RefreshScheduler, RefreshSettings, SchedulerState};
pub use snapshot::SnapshotReader;
pub use store::{JsonFileStore, MemoryStore, SharedStore};
pub use timeline::{Timeline, TimelineEntry, TimelineProvider};
