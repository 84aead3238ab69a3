//! Best-effort keep-alive presence while widgets are placed.
//!
//! Posts a silent ongoing notification and runs a slow self-check: if
//! instances remain it asks for a refresh, otherwise it takes the
//! notification down and ends. Nothing depends on it staying alive.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::host::{NotificationSink, WidgetHost};
use crate::locale::LabelSet;
use crate::types::RefreshTick;

pub const CHANNEL_ID: &str = "widget_keep_alive_channel";
pub const NOTIFICATION_ID: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Importance {
    Min,
    Low,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationChannel {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub importance: Importance,
    pub show_badge: bool,
    pub sound: bool,
    pub vibration: bool,
}

impl NotificationChannel {
    pub fn keep_alive() -> Self {
        Self {
            id: CHANNEL_ID,
            name: "Widget Keep Alive",
            description: "Keep widget alive service",
            importance: Importance::Low,
            show_badge: false,
            sound: false,
            vibration: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeepAliveNotification {
    pub id: i32,
    pub channel_id: &'static str,
    pub title: String,
    pub text: String,
    pub ongoing: bool,
    /// Service category, so the host groups it with foreground services
    pub service_category: bool,
}

impl KeepAliveNotification {
    pub fn new(labels: &LabelSet) -> Self {
        Self {
            id: NOTIFICATION_ID,
            channel_id: CHANNEL_ID,
            title: labels.title.to_string(),
            text: labels.service_running.to_string(),
            ongoing: true,
            service_category: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardianSettings {
    /// Delay before the first self-check
    pub initial_delay: Duration,
    /// Period between self-checks
    pub check_interval: Duration,
}

impl Default for GuardianSettings {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(60),
            check_interval: Duration::from_secs(300),
        }
    }
}

impl From<&fishwx_core::KeepAliveConfig> for GuardianSettings {
    fn from(config: &fishwx_core::KeepAliveConfig) -> Self {
        Self {
            initial_delay: Duration::from_secs(config.initial_delay_seconds),
            // interval() panics on a zero period
            check_interval: Duration::from_secs(config.check_interval_seconds.max(1)),
        }
    }
}

struct GuardianTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
    running: Arc<AtomicBool>,
}

impl Drop for GuardianTask {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}

pub struct KeepAliveGuardian {
    host: Arc<dyn WidgetHost>,
    notifier: Arc<dyn NotificationSink>,
    settings: GuardianSettings,
    runtime: tokio::runtime::Handle,
    task: Option<GuardianTask>,
}

impl KeepAliveGuardian {
    pub fn new(
        host: Arc<dyn WidgetHost>,
        notifier: Arc<dyn NotificationSink>,
        settings: GuardianSettings,
        runtime: tokio::runtime::Handle,
    ) -> Self {
        Self {
            host,
            notifier,
            settings,
            runtime,
            task: None,
        }
    }

    /// True while the self-check loop is alive.
    pub fn is_running(&self) -> bool {
        self.task
            .as_ref()
            .is_some_and(|task| task.running.load(Ordering::Acquire) && !task.handle.is_finished())
    }

    /// Post the notification and start the self-check loop.
    ///
    /// Calling this while already running does nothing. Refresh requests from
    /// the loop go to `ticks`, to be handled on the host's UI context.
    pub fn start(&mut self, labels: &LabelSet, ticks: Sender<RefreshTick>) {
        if self.is_running() {
            tracing::debug!("Keep-alive guardian already running");
            return;
        }
        // A loop that ended on its own leaves a finished task behind.
        self.task = None;

        if let Err(e) = self.notifier.create_channel(&NotificationChannel::keep_alive()) {
            tracing::warn!("Keep-alive channel not created: {}", e);
        }
        if let Err(e) = self.notifier.post(&KeepAliveNotification::new(labels)) {
            tracing::warn!("Keep-alive notification not posted: {}", e);
        }

        let cancel = CancellationToken::new();
        let running = Arc::new(AtomicBool::new(true));
        let handle = self.runtime.spawn(self_check_loop(
            self.host.clone(),
            self.notifier.clone(),
            self.settings,
            ticks,
            cancel.clone(),
            running.clone(),
        ));

        self.task = Some(GuardianTask {
            cancel,
            handle,
            running,
        });
        tracing::info!(
            "Keep-alive guardian started (self-check every {:?})",
            self.settings.check_interval
        );
    }

    /// Stop the loop and take the notification down. Idempotent.
    pub fn stop(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        task.running.store(false, Ordering::Release);
        drop(task);

        if let Err(e) = self.notifier.cancel(NOTIFICATION_ID) {
            tracing::debug!("Keep-alive notification already gone: {}", e);
        }
        tracing::info!("Keep-alive guardian stopped");
    }
}

impl Drop for KeepAliveGuardian {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn self_check_loop(
    host: Arc<dyn WidgetHost>,
    notifier: Arc<dyn NotificationSink>,
    settings: GuardianSettings,
    ticks: Sender<RefreshTick>,
    cancel: CancellationToken,
    running: Arc<AtomicBool>,
) {
    let start = tokio::time::Instant::now() + settings.initial_delay;
    let mut interval = tokio::time::interval_at(start, settings.check_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        let instances = host.instance_ids();
        if instances.is_empty() {
            tracing::info!("No widget instances left, keep-alive guardian exiting");
            if let Err(e) = notifier.cancel(NOTIFICATION_ID) {
                tracing::debug!("Keep-alive notification already gone: {}", e);
            }
            break;
        }

        tracing::debug!("{} widget instance(s) present, requesting refresh", instances.len());
        if ticks.send(RefreshTick).is_err() {
            tracing::debug!("Scheduler gone, keep-alive guardian exiting");
            break;
        }
    }

    running.store(false, Ordering::Release);
}
