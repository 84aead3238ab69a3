//! What the widget layer needs from the platform hosting it.
//!
//! Android-style hosts implement [`WidgetHost`] over their widget manager and
//! [`NotificationSink`] over the notification service. Pull-style hosts that
//! only ask for timelines need neither.

use chrono::{DateTime, Local};
use fishwx_core::HostError;
use parking_lot::Mutex;

use crate::keepalive::{KeepAliveNotification, NotificationChannel};
use crate::render::VisualTree;
use crate::types::InstanceId;

const ACTION_TIME_TICK: &str = "android.intent.action.TIME_TICK";
const ACTION_TIME_CHANGED: &str = "android.intent.action.TIME_SET";
const ACTION_TIMEZONE_CHANGED: &str = "android.intent.action.TIMEZONE_CHANGED";
const ACTION_WIDGET_UPDATE: &str = "android.appwidget.action.APPWIDGET_UPDATE";

/// Broadcasts the scheduler reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BroadcastAction {
    TimeTick,
    TimeChanged,
    TimezoneChanged,
    WidgetUpdate,
    Other(String),
}

impl BroadcastAction {
    pub fn from_action(action: &str) -> Self {
        match action {
            ACTION_TIME_TICK => Self::TimeTick,
            ACTION_TIME_CHANGED => Self::TimeChanged,
            ACTION_TIMEZONE_CHANGED => Self::TimezoneChanged,
            ACTION_WIDGET_UPDATE => Self::WidgetUpdate,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_action(&self) -> &str {
        match self {
            Self::TimeTick => ACTION_TIME_TICK,
            Self::TimeChanged => ACTION_TIME_CHANGED,
            Self::TimezoneChanged => ACTION_TIMEZONE_CHANGED,
            Self::WidgetUpdate => ACTION_WIDGET_UPDATE,
            Self::Other(action) => action,
        }
    }

    /// True for broadcasts that only move the displayed clock.
    pub fn is_clock_change(&self) -> bool {
        matches!(self, Self::TimeTick | Self::TimeChanged | Self::TimezoneChanged)
    }

    /// Actions registered on activation.
    pub fn clock_actions() -> [BroadcastAction; 3] {
        [Self::TimeTick, Self::TimeChanged, Self::TimezoneChanged]
    }
}

/// Token for a registered broadcast receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReceiverHandle(pub u64);

/// Widget manager side of the host.
///
/// Every method is called on the host's UI context.
pub trait WidgetHost: Send + Sync {
    /// Instances of this provider currently placed
    fn instance_ids(&self) -> Vec<InstanceId>;

    /// Host-reported minimum width, in distance units
    fn min_width(&self, id: InstanceId) -> Option<u32>;

    /// Device locale as a language tag, e.g. `zh-CN`
    fn device_locale(&self) -> String;

    /// Replace what instance `tree.instance` displays.
    fn submit(&self, tree: &VisualTree) -> Result<(), HostError>;

    fn register_receiver(&self, actions: &[BroadcastAction]) -> Result<ReceiverHandle, HostError>;

    fn unregister_receiver(&self, handle: ReceiverHandle) -> Result<(), HostError>;
}

/// Persistent notification support, Android-style hosts only.
pub trait NotificationSink: Send + Sync {
    /// Create the channel. Hosts without channels may return `Ok` or `NotificationDenied`.
    fn create_channel(&self, channel: &NotificationChannel) -> Result<(), HostError>;

    fn post(&self, notification: &KeepAliveNotification) -> Result<(), HostError>;

    fn cancel(&self, id: i32) -> Result<(), HostError>;
}

/// Wall-clock source for the displayed time and launch tokens.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock that only moves when told to; for previews and tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Local>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Local>) {
        *self.now.lock() = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock()
    }
}
