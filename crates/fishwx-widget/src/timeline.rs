//! Timelines for hosts that pull entries instead of accepting pushes.

use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::locale::{labels_for, LabelSet};
use crate::render::{VisualTree, WidgetRenderer};
use crate::snapshot::SnapshotReader;
use crate::store::SharedStore;
use crate::types::{Lang, SuitabilityLevel, WeatherSnapshot, WidgetInstance};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub date: DateTime<Local>,
    pub tree: VisualTree,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timeline {
    pub entries: Vec<TimelineEntry>,
    /// The host should ask for a new timeline at or after this instant
    pub reload_after: DateTime<Local>,
}

#[derive(Debug, Clone)]
pub struct TimelineProvider {
    reader: SnapshotReader,
    renderer: WidgetRenderer,
    reload_after: chrono::Duration,
}

impl TimelineProvider {
    pub fn new(store: Arc<dyn SharedStore>, renderer: WidgetRenderer, reload_minutes: u32) -> Self {
        Self {
            reader: SnapshotReader::new(store),
            renderer,
            reload_after: chrono::Duration::minutes(i64::from(reload_minutes.max(1))),
        }
    }

    /// One entry from the current snapshot.
    pub fn timeline(&self, lang: Lang, instance: WidgetInstance, now: DateTime<Local>) -> Timeline {
        let labels = labels_for(lang);
        let snapshot = self.reader.read(labels);
        let tree = self.renderer.render(&snapshot, labels, instance, now);

        Timeline {
            entries: vec![TimelineEntry { date: now, tree }],
            reload_after: now + self.reload_after,
        }
    }

    /// Fixed sample shown while the host has nothing to display yet.
    pub fn placeholder(&self, lang: Lang, instance: WidgetInstance, now: DateTime<Local>) -> VisualTree {
        let labels = labels_for(lang);
        self.renderer
            .render(&sample_snapshot(labels), labels, instance, now)
    }
}

fn sample_snapshot(labels: &LabelSet) -> WeatherSnapshot {
    let (condition, suitability) = match labels.lang {
        Lang::Default => ("晴天", "适宜"),
        Lang::En => ("Sunny", "Suitable"),
    };

    WeatherSnapshot {
        weather_condition: condition.to_string(),
        weather_code: "113".to_string(),
        temperature: "25°C".to_string(),
        suitability: suitability.to_string(),
        suitability_level: SuitabilityLevel::Good,
        score: "10".to_string(),
        location: labels.unknown_location.to_string(),
        pressure: labels.default_pressure.to_string(),
    }
}
