//! Typed projection of the shared store.

use std::sync::Arc;

use crate::locale::LabelSet;
use crate::presentation::level_for_score;
use crate::store::SharedStore;
use crate::types::{Lang, SuitabilityLevel, WeatherSnapshot};

/// Key names the main application writes.
pub mod keys {
    pub const WEATHER_CONDITION: &str = "weatherCondition";
    pub const WEATHER_CODE: &str = "weatherCode";
    pub const TEMPERATURE: &str = "temperature";
    pub const SUITABILITY: &str = "suitability";
    pub const SUITABILITY_EN: &str = "suitability_en";
    pub const SUITABILITY_LEVEL: &str = "suitabilityLevel";
    pub const SCORE: &str = "score";
    pub const LOCATION: &str = "location";
    pub const PRESSURE: &str = "pressure";
}

/// Key holding the suitability text for a language.
pub fn suitability_key(lang: Lang) -> &'static str {
    match lang {
        Lang::Default => keys::SUITABILITY,
        Lang::En => keys::SUITABILITY_EN,
    }
}

#[derive(Clone)]
pub struct SnapshotReader {
    store: Arc<dyn SharedStore>,
}

impl SnapshotReader {
    pub fn new(store: Arc<dyn SharedStore>) -> Self {
        Self { store }
    }

    /// Read every field, substituting `labels` defaults for absent keys.
    ///
    /// The level comes from the level key when it names a tier, otherwise
    /// from the numeric score. An explicit `unknown` defers to the score.
    pub fn read(&self, labels: &LabelSet) -> WeatherSnapshot {
        let store = self.store.as_ref();

        let score = store.get_or(keys::SCORE, labels.default_score);
        let suitability_level = store
            .get(keys::SUITABILITY_LEVEL)
            .and_then(|raw| SuitabilityLevel::parse(&raw))
            .filter(|level| *level != SuitabilityLevel::Unknown)
            .unwrap_or_else(|| level_for_score(&score));

        WeatherSnapshot {
            weather_condition: store.get_or(keys::WEATHER_CONDITION, labels.unknown_condition),
            weather_code: store.get_or(keys::WEATHER_CODE, ""),
            temperature: store.get_or(keys::TEMPERATURE, labels.default_temperature),
            suitability: store.get_or(suitability_key(labels.lang), labels.unknown_suitability),
            suitability_level,
            score,
            location: store.get_or(keys::LOCATION, labels.unknown_location),
            pressure: store.get_or(keys::PRESSURE, labels.default_pressure),
        }
    }
}

impl std::fmt::Debug for SnapshotReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotReader").finish_non_exhaustive()
    }
}
