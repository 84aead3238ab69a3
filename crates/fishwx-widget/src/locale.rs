//! Display language selection and the fixed label tables.

use crate::types::Lang;

/// Every literal the renderer may show, for one language.
///
/// A language is either fully covered here or not selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelSet {
    pub lang: Lang,
    pub title: &'static str,
    pub unknown_condition: &'static str,
    pub unknown_location: &'static str,
    pub unknown_suitability: &'static str,
    pub default_temperature: &'static str,
    pub default_score: &'static str,
    pub default_pressure: &'static str,
    pub score_prefix: &'static str,
    pub pressure_prefix: &'static str,
    pub level_prefix: &'static str,
    pub service_running: &'static str,
}

const DEFAULT_LABELS: LabelSet = LabelSet {
    lang: Lang::Default,
    title: "钓鱼天气",
    unknown_condition: "未知",
    unknown_location: "未知位置",
    unknown_suitability: "未知",
    default_temperature: "--°C",
    default_score: "--",
    default_pressure: "--",
    score_prefix: "评分: ",
    pressure_prefix: "气压: ",
    level_prefix: "适宜性: ",
    service_running: "小部件服务运行中",
};

const EN_LABELS: LabelSet = LabelSet {
    lang: Lang::En,
    title: "Fishing Weather",
    unknown_condition: "Unknown",
    unknown_location: "Unknown Location",
    unknown_suitability: "Unknown",
    default_temperature: "--°C",
    default_score: "--",
    default_pressure: "--",
    score_prefix: "Score: ",
    pressure_prefix: "Pressure: ",
    level_prefix: "Level: ",
    service_running: "Widget service is running",
};

/// `En` iff the primary language subtag is "en", case-insensitively.
///
/// Accepts BCP 47 (`en-US`) and POSIX (`en_US.UTF-8`) forms.
pub fn resolve(device_locale: &str) -> Lang {
    let primary = device_locale
        .trim()
        .split(['-', '_', '.', '@'])
        .next()
        .unwrap_or_default();

    if primary.eq_ignore_ascii_case("en") {
        Lang::En
    } else {
        Lang::Default
    }
}

pub fn labels_for(lang: Lang) -> &'static LabelSet {
    match lang {
        Lang::Default => &DEFAULT_LABELS,
        Lang::En => &EN_LABELS,
    }
}
