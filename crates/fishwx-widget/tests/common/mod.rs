//! Recording fakes for the host platform.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use fishwx_core::HostError;
use fishwx_widget::{
    BroadcastAction, GuardianSettings, InstanceId, KeepAliveGuardian, KeepAliveNotification,
    ManualClock, MemoryStore, NotificationChannel, NotificationSink, ReceiverHandle,
    RefreshScheduler, RefreshSettings, VisualTree, WidgetHost, WidgetRenderer,
};
use parking_lot::Mutex;

#[derive(Default)]
pub struct RecordingHost {
    instances: Mutex<BTreeMap<InstanceId, u32>>,
    locale: Mutex<String>,
    submitted: Mutex<Vec<VisualTree>>,
    receivers: Mutex<HashSet<ReceiverHandle>>,
    next_receiver: AtomicU64,
    rejected: Mutex<HashSet<InstanceId>>,
    fail_register: AtomicBool,
    fail_unregister: AtomicBool,
}

impl RecordingHost {
    pub fn new(locale: &str) -> Arc<Self> {
        let host = Self::default();
        *host.locale.lock() = locale.to_string();
        Arc::new(host)
    }

    pub fn place(&self, id: i32, min_width: u32) {
        self.instances.lock().insert(InstanceId(id), min_width);
    }

    pub fn remove(&self, id: i32) {
        self.instances.lock().remove(&InstanceId(id));
    }

    pub fn resize(&self, id: i32, min_width: u32) {
        self.place(id, min_width);
    }

    pub fn reject_submits_for(&self, id: i32) {
        self.rejected.lock().insert(InstanceId(id));
    }

    pub fn fail_register(&self) {
        self.fail_register.store(true, Ordering::SeqCst);
    }

    pub fn fail_unregister(&self) {
        self.fail_unregister.store(true, Ordering::SeqCst);
    }

    pub fn submitted(&self) -> Vec<VisualTree> {
        self.submitted.lock().clone()
    }

    pub fn submit_count(&self) -> usize {
        self.submitted.lock().len()
    }

    pub fn last_for(&self, id: i32) -> Option<VisualTree> {
        self.submitted
            .lock()
            .iter()
            .rev()
            .find(|tree| tree.instance == InstanceId(id))
            .cloned()
    }

    pub fn registered_receivers(&self) -> usize {
        self.receivers.lock().len()
    }
}

impl WidgetHost for RecordingHost {
    fn instance_ids(&self) -> Vec<InstanceId> {
        self.instances.lock().keys().copied().collect()
    }

    fn min_width(&self, id: InstanceId) -> Option<u32> {
        self.instances.lock().get(&id).copied()
    }

    fn device_locale(&self) -> String {
        self.locale.lock().clone()
    }

    fn submit(&self, tree: &VisualTree) -> Result<(), HostError> {
        if self.rejected.lock().contains(&tree.instance) {
            return Err(HostError::SubmitRejected(tree.instance.0));
        }
        self.submitted.lock().push(tree.clone());
        Ok(())
    }

    fn register_receiver(&self, actions: &[BroadcastAction]) -> Result<ReceiverHandle, HostError> {
        assert!(!actions.is_empty());
        if self.fail_register.load(Ordering::SeqCst) {
            return Err(HostError::ServiceUnavailable("receiver".to_string()));
        }
        let handle = ReceiverHandle(self.next_receiver.fetch_add(1, Ordering::SeqCst));
        self.receivers.lock().insert(handle);
        Ok(handle)
    }

    fn unregister_receiver(&self, handle: ReceiverHandle) -> Result<(), HostError> {
        let removed = self.receivers.lock().remove(&handle);
        if self.fail_unregister.load(Ordering::SeqCst) || !removed {
            return Err(HostError::ReceiverNotRegistered);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    channels: Mutex<Vec<NotificationChannel>>,
    posted: Mutex<Vec<KeepAliveNotification>>,
    cancelled: Mutex<Vec<i32>>,
    deny_channel: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn deny_channel(&self) {
        self.deny_channel.store(true, Ordering::SeqCst);
    }

    pub fn posted(&self) -> Vec<KeepAliveNotification> {
        self.posted.lock().clone()
    }

    pub fn cancelled(&self) -> Vec<i32> {
        self.cancelled.lock().clone()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.lock().len()
    }
}

impl NotificationSink for RecordingNotifier {
    fn create_channel(&self, channel: &NotificationChannel) -> Result<(), HostError> {
        if self.deny_channel.load(Ordering::SeqCst) {
            return Err(HostError::NotificationDenied("channels unsupported".to_string()));
        }
        self.channels.lock().push(channel.clone());
        Ok(())
    }

    fn post(&self, notification: &KeepAliveNotification) -> Result<(), HostError> {
        self.posted.lock().push(notification.clone());
        Ok(())
    }

    fn cancel(&self, id: i32) -> Result<(), HostError> {
        self.cancelled.lock().push(id);
        Ok(())
    }
}

pub fn fixed_now() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 7, 11, 5, 42, 0).unwrap()
}

pub fn renderer() -> WidgetRenderer {
    WidgetRenderer::from_uri("fishingweather://home").unwrap()
}

/// Scheduler over `host` and `store` with a frozen clock and no guardian.
pub fn scheduler(
    host: &Arc<RecordingHost>,
    store: &Arc<MemoryStore>,
    clock: &Arc<ManualClock>,
) -> RefreshScheduler {
    RefreshScheduler::new(
        host.clone(),
        store.clone(),
        renderer(),
        RefreshSettings::default(),
        tokio::runtime::Handle::current(),
    )
    .with_clock(clock.clone())
}

pub fn guardian(host: &Arc<RecordingHost>, notifier: &Arc<RecordingNotifier>) -> KeepAliveGuardian {
    KeepAliveGuardian::new(
        host.clone(),
        notifier.clone(),
        GuardianSettings::default(),
        tokio::runtime::Handle::current(),
    )
}

/// Let spawned tasks run without moving the paused clock noticeably.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
