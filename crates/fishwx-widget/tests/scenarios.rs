//! End-to-end renders from store contents to submitted visual trees.

mod common;

use std::sync::Arc;

use common::{fixed_now, renderer, scheduler, RecordingHost};
use fishwx_widget::{
    Color, IconCategory, InstanceId, JsonFileStore, LayoutSize, ManualClock, MemoryStore,
    RefreshScheduler, RefreshSettings, SuitabilityLevel,
};

#[tokio::test]
async fn excellent_clear_day_on_large_widget() {
    let host = RecordingHost::new("zh-CN");
    host.place(1, 320);
    let store = Arc::new(MemoryStore::with_values([
        ("weatherCondition", "晴"),
        ("weatherCode", "113"),
        ("temperature", "24°C"),
        ("suitability", "非常适宜"),
        ("score", "14"),
        ("suitabilityLevel", "excellent"),
        ("location", "千岛湖"),
        ("pressure", "1016 hPa"),
    ]));
    let clock = Arc::new(ManualClock::new(fixed_now()));
    let mut scheduler = scheduler(&host, &store, &clock);

    scheduler.on_update(&[InstanceId(1)]);
    let tree = host.last_for(1).unwrap();

    assert_eq!(tree.layout, LayoutSize::Large);
    assert_eq!(tree.title, "钓鱼天气");
    assert_eq!(tree.icon.category, IconCategory::Clear);
    assert_eq!(tree.icon.resource, "ic_sunny");
    assert_eq!(tree.indicator.level, SuitabilityLevel::Excellent);
    assert_eq!(tree.indicator.tint, Color::GREEN);
    assert_eq!(tree.score, "评分: 14");
    assert_eq!(tree.suitability, "适宜性: 非常适宜");

    let details = tree.details.unwrap();
    assert_eq!(details.clock, "05:42");
    assert_eq!(details.location, "千岛湖");
    assert_eq!(details.pressure, "气压: 1016 hPa");
}

#[tokio::test]
async fn empty_store_on_english_compact_widget() {
    let host = RecordingHost::new("en-US");
    host.place(7, 180);
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(fixed_now()));
    let mut scheduler = scheduler(&host, &store, &clock);

    scheduler.on_update(&[InstanceId(7)]);
    let tree = host.last_for(7).unwrap();

    assert_eq!(tree.layout, LayoutSize::Compact);
    assert_eq!(tree.title, "Fishing Weather");
    assert_eq!(tree.condition, "Unknown");
    assert_eq!(tree.temperature, "--°C");
    assert_eq!(tree.suitability, "Unknown");
    assert_eq!(tree.score, "Score: --");
    assert_eq!(tree.icon.category, IconCategory::Unknown);
    assert_eq!(tree.indicator.level, SuitabilityLevel::Unknown);
    assert_eq!(tree.indicator.tint, Color::GRAY);
    assert!(tree.details.is_none());
}

#[tokio::test]
async fn partial_snapshot_never_renders_blank_fields() {
    let host = RecordingHost::new("zh-CN");
    host.place(1, 400);
    let store = Arc::new(MemoryStore::with_values([("temperature", "12°C")]));
    let clock = Arc::new(ManualClock::new(fixed_now()));
    let mut scheduler = scheduler(&host, &store, &clock);

    scheduler.on_update(&[InstanceId(1)]);
    let tree = host.last_for(1).unwrap();

    for field in [&tree.title, &tree.condition, &tree.temperature, &tree.suitability, &tree.score] {
        assert!(!field.is_empty());
    }
    let details = tree.details.unwrap();
    assert_eq!(details.location, "未知位置");
    assert_eq!(details.pressure, "气压: --");
    assert_eq!(tree.temperature, "12°C");
}

#[tokio::test]
async fn score_decides_level_when_level_key_is_missing() {
    let host = RecordingHost::new("en-GB");
    host.place(1, 180);
    let store = Arc::new(MemoryStore::with_values([
        ("weatherCondition", "Light rain"),
        ("score", "8.0"),
        ("suitability_en", "Fair"),
    ]));
    let clock = Arc::new(ManualClock::new(fixed_now()));
    let mut scheduler = scheduler(&host, &store, &clock);

    scheduler.on_update(&[InstanceId(1)]);
    let tree = host.last_for(1).unwrap();

    assert_eq!(tree.suitability, "Fair");
    assert_eq!(tree.icon.category, IconCategory::Rain);
    assert_eq!(tree.indicator.level, SuitabilityLevel::Good);
    assert_eq!(tree.indicator.tint, Color::LIGHT_GREEN);
}

#[tokio::test]
async fn store_changes_show_up_on_next_render() {
    let host = RecordingHost::new("zh-CN");
    host.place(1, 180);
    let store = Arc::new(MemoryStore::with_values([("score", "3"), ("weatherCode", "248")]));
    let clock = Arc::new(ManualClock::new(fixed_now()));
    let mut scheduler = scheduler(&host, &store, &clock);

    scheduler.on_update(&[InstanceId(1)]);
    let before = host.last_for(1).unwrap();
    assert_eq!(before.indicator.tint, Color::RED);
    assert_eq!(before.icon.category, IconCategory::Fog);

    store.set("score", "13");
    store.set("weatherCode", "116");
    scheduler.on_update(&[InstanceId(1)]);
    let after = host.last_for(1).unwrap();
    assert_eq!(after.indicator.tint, Color::GREEN);
    assert_eq!(after.icon.category, IconCategory::PartlyCloudy);
}

#[tokio::test]
async fn identical_inputs_render_identical_trees() {
    let host = RecordingHost::new("en-US");
    host.place(1, 300);
    let store = Arc::new(MemoryStore::with_values([
        ("weatherCode", "302"),
        ("score", "5"),
        ("suitabilityLevel", "moderate"),
    ]));
    let clock = Arc::new(ManualClock::new(fixed_now()));
    let mut scheduler = scheduler(&host, &store, &clock);

    scheduler.on_update(&[InstanceId(1)]);
    scheduler.on_update(&[InstanceId(1)]);

    let trees = host.submitted();
    assert_eq!(trees.len(), 2);
    assert_eq!(trees[0], trees[1]);
}

#[tokio::test]
async fn file_store_written_by_the_app_is_rendered() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("widget_data.json");
    std::fs::write(
        &path,
        r#"{
            "weatherCondition": "Overcast",
            "temperature": "16°C",
            "suitability_en": "Poor",
            "suitabilityLevel": "poor",
            "score": 2
        }"#,
    )
    .unwrap();

    let host = RecordingHost::new("en");
    host.place(1, 180);
    let clock = Arc::new(ManualClock::new(fixed_now()));
    let mut scheduler = RefreshScheduler::new(
        host.clone(),
        Arc::new(JsonFileStore::new(&path)),
        renderer(),
        RefreshSettings::default(),
        tokio::runtime::Handle::current(),
    )
    .with_clock(clock);

    scheduler.on_update(&[InstanceId(1)]);
    let tree = host.last_for(1).unwrap();

    assert_eq!(tree.condition, "Overcast");
    assert_eq!(tree.icon.category, IconCategory::PartlyCloudy);
    assert_eq!(tree.score, "Score: 2");
    assert_eq!(tree.indicator.tint, Color::RED);
}
