//! Builds the typed visual tree the host displays.

use chrono::{DateTime, Local};
use fishwx_core::ConfigError;
use serde::Serialize;
use url::Url;

use crate::locale::LabelSet;
use crate::presentation::{color_for, icon_category_for};
use crate::types::{
    Color, IconCategory, InstanceId, LayoutSize, SuitabilityLevel, WeatherSnapshot,
    WidgetInstance,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconView {
    pub category: IconCategory,
    pub resource: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndicatorView {
    pub level: SuitabilityLevel,
    pub tint: Color,
}

/// Extra rows shown only by the large layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailPanel {
    /// Local time, `HH:MM`
    pub clock: String,
    pub location: String,
    pub pressure: String,
}

/// Tap target covering the whole widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchAction {
    /// Deep link into the main application, with a `timestamp` query parameter
    pub uri: String,
    /// Per-instance request code so hosts never share one cached intent across instances
    pub request_code: i32,
    /// Render minute in epoch milliseconds
    pub freshness_token: i64,
    pub new_task: bool,
    pub clear_top: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisualTree {
    pub instance: InstanceId,
    pub layout: LayoutSize,
    pub title: String,
    pub icon: IconView,
    pub condition: String,
    pub temperature: String,
    pub suitability: String,
    pub indicator: IndicatorView,
    pub score: String,
    pub details: Option<DetailPanel>,
    pub launch: LaunchAction,
}

#[derive(Debug, Clone)]
pub struct WidgetRenderer {
    launch_uri: Url,
}

impl WidgetRenderer {
    pub fn new(launch_uri: Url) -> Self {
        Self { launch_uri }
    }

    pub fn from_uri(uri: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(uri)
            .map_err(|e| ConfigError::Invalid(format!("launch uri {}: {}", uri, e)))?;
        Ok(Self::new(url))
    }

    /// Pure function of its inputs. Only the minute of `now` is used, for the
    /// clock row and the launch token.
    pub fn render(
        &self,
        snapshot: &WeatherSnapshot,
        labels: &LabelSet,
        instance: WidgetInstance,
        now: DateTime<Local>,
    ) -> VisualTree {
        let category = icon_category_for(&snapshot.weather_code, &snapshot.weather_condition);
        let level = snapshot.suitability_level;

        let (suitability, details) = match instance.size {
            LayoutSize::Compact => (snapshot.suitability.clone(), None),
            LayoutSize::Large => (
                format!("{}{}", labels.level_prefix, snapshot.suitability),
                Some(DetailPanel {
                    clock: now.format("%H:%M").to_string(),
                    location: snapshot.location.clone(),
                    pressure: format!("{}{}", labels.pressure_prefix, snapshot.pressure),
                }),
            ),
        };

        VisualTree {
            instance: instance.id,
            layout: instance.size,
            title: labels.title.to_string(),
            icon: IconView {
                category,
                resource: category.resource_name(),
            },
            condition: snapshot.weather_condition.clone(),
            temperature: snapshot.temperature.clone(),
            suitability,
            indicator: IndicatorView {
                level,
                tint: color_for(level),
            },
            score: format!("{}{}", labels.score_prefix, snapshot.score),
            details,
            launch: self.launch_action(instance.id, now),
        }
    }

    fn launch_action(&self, id: InstanceId, now: DateTime<Local>) -> LaunchAction {
        let token = minute_millis(now);
        let mut uri = self.launch_uri.clone();
        uri.query_pairs_mut()
            .append_pair("timestamp", &token.to_string());

        LaunchAction {
            uri: uri.into(),
            request_code: id.0,
            freshness_token: token,
            new_task: true,
            clear_top: true,
        }
    }
}

/// Epoch milliseconds of the start of the minute containing `now`.
fn minute_millis(now: DateTime<Local>) -> i64 {
    now.timestamp().div_euclid(60) * 60_000
}
