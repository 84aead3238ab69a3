use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use fishwx_core::{Config, HostError};
use fishwx_widget::{
    BroadcastAction, GuardianSettings, InstanceId, JsonFileStore, KeepAliveGuardian,
    KeepAliveNotification, LayoutSize, NotificationChannel, NotificationSink, ReceiverHandle,
    RefreshScheduler, RefreshSettings, TimelineProvider, VisualTree, WidgetHost, WidgetInstance,
    WidgetRenderer,
};
use parking_lot::Mutex;

/// Width the console pretends its single widget has.
const CONSOLE_WIDTH: u32 = 320;

/// Host that prints everything it is handed.
struct ConsoleHost {
    instances: Mutex<BTreeMap<InstanceId, u32>>,
    locale: String,
    next_receiver: AtomicU64,
}

impl ConsoleHost {
    fn new(locale: String) -> Self {
        Self {
            instances: Mutex::new(BTreeMap::new()),
            locale,
            next_receiver: AtomicU64::new(1),
        }
    }

    fn place(&self, id: InstanceId, min_width: u32) {
        self.instances.lock().insert(id, min_width);
    }
}

impl WidgetHost for ConsoleHost {
    fn instance_ids(&self) -> Vec<InstanceId> {
        self.instances.lock().keys().copied().collect()
    }

    fn min_width(&self, id: InstanceId) -> Option<u32> {
        self.instances.lock().get(&id).copied()
    }

    fn device_locale(&self) -> String {
        self.locale.clone()
    }

    fn submit(&self, tree: &VisualTree) -> Result<(), HostError> {
        let json = serde_json::to_string_pretty(tree)
            .map_err(|_| HostError::SubmitRejected(tree.instance.0))?;
        println!("{}", json);
        Ok(())
    }

    fn register_receiver(&self, actions: &[BroadcastAction]) -> Result<ReceiverHandle, HostError> {
        let handle = ReceiverHandle(self.next_receiver.fetch_add(1, Ordering::Relaxed));
        tracing::debug!("Receiver {:?} registered for {} action(s)", handle, actions.len());
        Ok(handle)
    }

    fn unregister_receiver(&self, handle: ReceiverHandle) -> Result<(), HostError> {
        tracing::debug!("Receiver {:?} unregistered", handle);
        Ok(())
    }
}

impl NotificationSink for ConsoleHost {
    fn create_channel(&self, channel: &NotificationChannel) -> Result<(), HostError> {
        tracing::debug!("Notification channel {} created", channel.id);
        Ok(())
    }

    fn post(&self, notification: &KeepAliveNotification) -> Result<(), HostError> {
        println!("[notification] {}: {}", notification.title, notification.text);
        Ok(())
    }

    fn cancel(&self, id: i32) -> Result<(), HostError> {
        println!("[notification {} cancelled]", id);
        Ok(())
    }
}

/// Locale from the usual POSIX variables, e.g. `en_US.UTF-8`.
fn system_locale() -> String {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

#[tokio::main]
async fn main() -> Result<()> {
    fishwx_core::init()?;

    let (config, _) = Config::load_validated()?;
    tracing::info!("Snapshot file: {}", config.store.path.display());

    if config.store.path.exists() {
        if let Err(e) = JsonFileStore::load(&config.store.path) {
            eprintln!("{}", e.user_message());
        }
    } else {
        println!("No weather data yet, showing placeholders");
    }

    let host = Arc::new(ConsoleHost::new(system_locale()));
    let store = Arc::new(JsonFileStore::new(&config.store.path));
    let renderer = WidgetRenderer::from_uri(&config.launch.uri)?;
    let runtime = tokio::runtime::Handle::current();

    let mut scheduler = RefreshScheduler::new(
        host.clone(),
        store.clone(),
        renderer.clone(),
        RefreshSettings::from(&config.refresh),
        runtime.clone(),
    )
    .with_locale_override(config.locale.override_tag.clone());

    if config.keep_alive.enabled {
        scheduler = scheduler.with_guardian(KeepAliveGuardian::new(
            host.clone(),
            host.clone(),
            GuardianSettings::from(&config.keep_alive),
            runtime,
        ));
    }

    let id = InstanceId(1);

    if std::env::args().skip(1).any(|arg| arg == "--timeline") {
        let provider = TimelineProvider::new(store, renderer, config.timeline.reload_minutes);
        let lang = scheduler.labels().lang;
        let instance = WidgetInstance::new(id, LayoutSize::Large);
        let now = chrono::Local::now();

        let json = if config.store.path.exists() {
            serde_json::to_string_pretty(&provider.timeline(lang, instance, now))?
        } else {
            serde_json::to_string_pretty(&provider.placeholder(lang, instance, now))?
        };
        println!("{}", json);
        return Ok(());
    }

    host.place(id, CONSOLE_WIDTH);
    scheduler.on_enabled();
    scheduler.on_update(&[id]);

    println!("FishWx widget running, Ctrl-C to stop");

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut ui_loop = tokio::time::interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ui_loop.tick() => {
                let report = scheduler.pump();
                if report.failed > 0 {
                    tracing::warn!("{} instance(s) failed to refresh", report.failed);
                }
            }
        }
    }

    scheduler.on_disabled();
    tracing::info!("FishWx widget stopped");

    Ok(())
}
