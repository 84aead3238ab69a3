//! Score, level and weather-code mapping for the widget surface.
//!
//! Everything here is total: malformed or missing input maps to the
//! `Unknown` level or icon, never to an error.

use crate::types::{Color, IconCategory, SuitabilityLevel};

/// Score at or above which conditions are excellent
pub const EXCELLENT_MIN_SCORE: f64 = 12.0;
/// Score at or above which conditions are good
pub const GOOD_MIN_SCORE: f64 = 8.0;
/// Score at or above which conditions are moderate
pub const MODERATE_MIN_SCORE: f64 = 4.0;

/// Keywords tried in order against the lowercased condition text; first hit wins.
const CONDITION_KEYWORDS: &[(&str, IconCategory)] = &[
    ("sunny", IconCategory::Clear),
    ("晴", IconCategory::Clear),
    ("cloud", IconCategory::PartlyCloudy),
    ("云", IconCategory::PartlyCloudy),
    ("overcast", IconCategory::PartlyCloudy),
    ("阴", IconCategory::PartlyCloudy),
    ("rain", IconCategory::Rain),
    ("雨", IconCategory::Rain),
    ("shower", IconCategory::Rain),
    ("fog", IconCategory::Fog),
    ("雾", IconCategory::Fog),
    ("mist", IconCategory::Fog),
];

/// Indicator color for a suitability tier
pub fn color_for(level: SuitabilityLevel) -> Color {
    match level {
        SuitabilityLevel::Excellent => Color::GREEN,
        SuitabilityLevel::Good => Color::LIGHT_GREEN,
        SuitabilityLevel::Moderate => Color::AMBER,
        SuitabilityLevel::Poor => Color::RED,
        SuitabilityLevel::Unknown => Color::GRAY,
    }
}

/// Tier for a raw score string, used when the main application did not
/// write a level.
///
/// Non-numeric, empty and non-finite input is `Unknown`, which is distinct
/// from `Poor`.
pub fn level_for_score(raw: &str) -> SuitabilityLevel {
    match raw.trim().parse::<f64>() {
        Ok(score) if score.is_finite() => level_for_value(score),
        _ => SuitabilityLevel::Unknown,
    }
}

pub fn level_for_value(score: f64) -> SuitabilityLevel {
    if score >= EXCELLENT_MIN_SCORE {
        SuitabilityLevel::Excellent
    } else if score >= GOOD_MIN_SCORE {
        SuitabilityLevel::Good
    } else if score >= MODERATE_MIN_SCORE {
        SuitabilityLevel::Moderate
    } else {
        SuitabilityLevel::Poor
    }
}

/// Icon for a snapshot. The code decides when present; the condition text is
/// only consulted when the code is empty.
pub fn icon_category_for(code: &str, condition: &str) -> IconCategory {
    let code = code.trim();
    if code.is_empty() {
        icon_category_for_condition(condition)
    } else {
        icon_category_for_code(code)
    }
}

/// Map a weather code from the main application's provider.
pub fn icon_category_for_code(code: &str) -> IconCategory {
    match code.trim() {
        "113" => IconCategory::Clear,
        "116" | "119" | "122" => IconCategory::PartlyCloudy,
        "143" | "248" | "260" => IconCategory::Fog,
        "176" | "293" | "296" | "299" | "302" | "308" | "353" | "356" => IconCategory::Rain,
        _ => IconCategory::Unknown,
    }
}

/// Keyword match against free-text condition, English or Chinese.
pub fn icon_category_for_condition(condition: &str) -> IconCategory {
    let condition = condition.to_lowercase();
    CONDITION_KEYWORDS
        .iter()
        .find(|(keyword, _)| condition.contains(keyword))
        .map(|(_, category)| *category)
        .unwrap_or(IconCategory::Unknown)
}
