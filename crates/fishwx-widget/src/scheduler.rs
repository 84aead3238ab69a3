//! When widget instances get redrawn.
//!
//! One scheduler serves every instance of a provider. It is `Inactive` until
//! the host reports a first placed instance, then owns a broadcast receiver,
//! a repeating clock timer and (optionally) the keep-alive guardian until the
//! last instance goes away. All host callbacks arrive on the host's UI
//! context; the timer only posts [`RefreshTick`]s, which the host drains with
//! [`RefreshScheduler::pump`] on that same context.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::host::{BroadcastAction, Clock, ReceiverHandle, SystemClock, WidgetHost};
use crate::keepalive::KeepAliveGuardian;
use crate::locale::{labels_for, resolve, LabelSet};
use crate::render::WidgetRenderer;
use crate::snapshot::SnapshotReader;
use crate::store::SharedStore;
use crate::types::{InstanceId, LayoutSize, RefreshTick, WidgetInstance};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSettings {
    pub tick_period: Duration,
    /// Minimum width for the large layout
    pub compact_width_threshold: u32,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_secs(60),
            compact_width_threshold: 250,
        }
    }
}

impl From<&fishwx_core::RefreshConfig> for RefreshSettings {
    fn from(config: &fishwx_core::RefreshConfig) -> Self {
        Self {
            tick_period: Duration::from_secs(config.tick_seconds.max(1)),
            compact_width_threshold: config.compact_width_threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Inactive,
    Active,
}

/// Outcome of one render batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub rendered: usize,
    pub failed: usize,
}

/// Repeating clock tick. Cancelled when dropped.
struct ClockTimer {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl ClockTimer {
    fn start(runtime: &tokio::runtime::Handle, period: Duration, ticks: Sender<RefreshTick>) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = runtime.spawn(async move {
            // First tick completes immediately so the clock is right on activation.
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        if ticks.send(RefreshTick).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Self { cancel, handle }
    }
}

impl Drop for ClockTimer {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}

/// Everything held while `Active`; released as a unit on deactivation.
struct ActiveResources {
    receiver: Option<ReceiverHandle>,
    timer: ClockTimer,
}

pub struct RefreshScheduler {
    host: Arc<dyn WidgetHost>,
    reader: SnapshotReader,
    renderer: WidgetRenderer,
    clock: Arc<dyn Clock>,
    settings: RefreshSettings,
    locale_override: Option<String>,
    runtime: tokio::runtime::Handle,
    guardian: Option<KeepAliveGuardian>,
    ticks_tx: Sender<RefreshTick>,
    ticks_rx: Receiver<RefreshTick>,
    active: Option<ActiveResources>,
}

impl RefreshScheduler {
    pub fn new(
        host: Arc<dyn WidgetHost>,
        store: Arc<dyn SharedStore>,
        renderer: WidgetRenderer,
        settings: RefreshSettings,
        runtime: tokio::runtime::Handle,
    ) -> Self {
        let (ticks_tx, ticks_rx) = mpsc::channel();
        Self {
            host,
            reader: SnapshotReader::new(store),
            renderer,
            clock: Arc::new(SystemClock),
            settings,
            locale_override: None,
            runtime,
            guardian: None,
            ticks_tx,
            ticks_rx,
            active: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_guardian(mut self, guardian: KeepAliveGuardian) -> Self {
        self.guardian = Some(guardian);
        self
    }

    /// Use this language tag instead of the host-reported locale.
    pub fn with_locale_override(mut self, tag: Option<String>) -> Self {
        self.locale_override = tag;
        self
    }

    pub fn state(&self) -> SchedulerState {
        if self.active.is_some() {
            SchedulerState::Active
        } else {
            SchedulerState::Inactive
        }
    }

    pub fn guardian_running(&self) -> bool {
        self.guardian.as_ref().is_some_and(KeepAliveGuardian::is_running)
    }

    /// Labels for the current device (or overridden) locale.
    pub fn labels(&self) -> &'static LabelSet {
        let lang = match &self.locale_override {
            Some(tag) => resolve(tag),
            None => resolve(&self.host.device_locale()),
        };
        labels_for(lang)
    }

    /// Host callback: the first instance of this provider was placed.
    pub fn on_enabled(&mut self) {
        self.activate();
    }

    /// Host callback: the last instance of this provider was removed.
    pub fn on_disabled(&mut self) {
        self.deactivate();
    }

    /// Host callback: redraw the given instances.
    ///
    /// Also re-activates a scheduler that lost its state to a process restart
    /// while instances stayed placed. Ids the host no longer reports as placed
    /// do not activate anything.
    pub fn on_update(&mut self, ids: &[InstanceId]) -> RefreshReport {
        if ids.is_empty() || !self.ensure_active("Update requested") {
            return RefreshReport::default();
        }

        let instances: Vec<_> = ids.iter().map(|id| self.instance_for(*id)).collect();
        self.refresh_instances(&instances)
    }

    /// Host callback: instance `id` was resized.
    ///
    /// Gated like [`Self::on_update`]: renders only once the scheduler is, or
    /// can become, active.
    pub fn on_options_changed(&mut self, id: InstanceId, min_width: u32) -> RefreshReport {
        if !self.ensure_active("Resize") {
            return RefreshReport::default();
        }

        let size = LayoutSize::from_min_width(min_width, self.settings.compact_width_threshold);
        tracing::debug!("Instance {} resized to width {} ({:?})", id, min_width, size);
        self.refresh_instances(&[WidgetInstance::new(id, size)])
    }

    /// Host callback: a broadcast reached the provider.
    pub fn on_broadcast(&mut self, action: &BroadcastAction) -> RefreshReport {
        match action {
            action if action.is_clock_change() => {
                if self.active.is_none() {
                    tracing::debug!("Ignoring {} while inactive", action.as_action());
                    return RefreshReport::default();
                }
                self.refresh_all()
            }
            BroadcastAction::WidgetUpdate => {
                let ids = self.host.instance_ids();
                if ids.is_empty() {
                    return RefreshReport::default();
                }
                self.on_update(&ids)
            }
            other => {
                tracing::debug!("Ignoring broadcast {}", other.as_action());
                RefreshReport::default()
            }
        }
    }

    /// Drain pending ticks from the timer and guardian.
    ///
    /// Any number of queued ticks collapses into one render pass. Ticks that
    /// arrive while inactive are discarded.
    pub fn pump(&mut self) -> RefreshReport {
        let pending = self.ticks_rx.try_iter().count();
        if pending == 0 {
            return RefreshReport::default();
        }
        if self.active.is_none() {
            tracing::debug!("Dropping {} tick(s) while inactive", pending);
            return RefreshReport::default();
        }

        tracing::debug!("Clock tick ({} pending)", pending);
        self.refresh_all()
    }

    /// Activate if needed and the host still reports placed instances.
    /// Returns whether the scheduler is active afterwards.
    fn ensure_active(&mut self, cause: &str) -> bool {
        if self.active.is_some() {
            return true;
        }
        if self.host.instance_ids().is_empty() {
            tracing::debug!("{} while inactive with nothing placed, ignoring", cause);
            return false;
        }

        tracing::info!("{} while inactive, re-activating", cause);
        self.activate();
        true
    }

    fn activate(&mut self) {
        if self.active.is_some() {
            return;
        }

        let receiver = match self
            .host
            .register_receiver(&BroadcastAction::clock_actions())
        {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!("Clock broadcast receiver not registered: {}", e);
                None
            }
        };

        let timer = ClockTimer::start(&self.runtime, self.settings.tick_period, self.ticks_tx.clone());

        let labels = self.labels();
        if let Some(guardian) = self.guardian.as_mut() {
            guardian.start(labels, self.ticks_tx.clone());
        }

        self.active = Some(ActiveResources { receiver, timer });
        tracing::info!(
            "Widget refresh active (tick every {:?})",
            self.settings.tick_period
        );
    }

    fn deactivate(&mut self) {
        if let Some(resources) = self.active.take() {
            if let Some(handle) = resources.receiver {
                if let Err(e) = self.host.unregister_receiver(handle) {
                    tracing::debug!("Ignoring receiver teardown error: {}", e);
                }
            }
            drop(resources.timer);
            tracing::info!("Widget refresh inactive");
        }

        if let Some(guardian) = self.guardian.as_mut() {
            guardian.stop();
        }

        // Ticks sent before the timer stopped must not render later.
        let discarded = self.ticks_rx.try_iter().count();
        if discarded > 0 {
            tracing::debug!("Discarded {} pending tick(s)", discarded);
        }
    }

    fn instance_for(&self, id: InstanceId) -> WidgetInstance {
        let width = self.host.min_width(id).unwrap_or(0);
        WidgetInstance::new(
            id,
            LayoutSize::from_min_width(width, self.settings.compact_width_threshold),
        )
    }

    fn refresh_all(&self) -> RefreshReport {
        let instances: Vec<_> = self
            .host
            .instance_ids()
            .into_iter()
            .map(|id| self.instance_for(id))
            .collect();
        self.refresh_instances(&instances)
    }

    /// read, render, submit for each instance. A failed submit is logged and
    /// does not stop the batch.
    fn refresh_instances(&self, instances: &[WidgetInstance]) -> RefreshReport {
        let labels = self.labels();
        let now = self.clock.now();
        let mut report = RefreshReport::default();

        for instance in instances {
            let snapshot = self.reader.read(labels);
            let tree = self.renderer.render(&snapshot, labels, *instance, now);
            match self.host.submit(&tree) {
                Ok(()) => report.rendered += 1,
                Err(e) => {
                    tracing::warn!("Instance {} not updated: {}", instance.id, e);
                    report.failed += 1;
                }
            }
        }

        report
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.deactivate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_config() {
        let config = fishwx_core::RefreshConfig {
            tick_seconds: 0,
            compact_width_threshold: 300,
        };
        let settings = RefreshSettings::from(&config);
        assert_eq!(settings.tick_period, Duration::from_secs(1));
        assert_eq!(settings.compact_width_threshold, 300);
    }

    #[test]
    fn test_default_settings() {
        let settings = RefreshSettings::default();
        assert_eq!(settings.tick_period, Duration::from_secs(60));
        assert_eq!(settings.compact_width_threshold, 250);
    }
}
