use serde::{Deserialize, Serialize};

/// Fishing suitability tier, as written by the main application's scoring engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SuitabilityLevel {
    Excellent,
    Good,
    Moderate,
    Poor,
    #[default]
    Unknown,
}

impl SuitabilityLevel {
    /// Parse the level key written by the main application.
    ///
    /// Returns `None` for anything outside the known vocabulary so callers can
    /// fall back to the numeric score.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "excellent" => Some(Self::Excellent),
            "good" => Some(Self::Good),
            "moderate" => Some(Self::Moderate),
            "poor" => Some(Self::Poor),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Ordering of the known tiers, poor lowest. `Unknown` has no rank.
    pub fn rank(self) -> Option<u8> {
        match self {
            Self::Poor => Some(0),
            Self::Moderate => Some(1),
            Self::Good => Some(2),
            Self::Excellent => Some(3),
            Self::Unknown => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Moderate => "moderate",
            Self::Poor => "poor",
            Self::Unknown => "unknown",
        }
    }
}

/// Icon families the widget can show for the current weather
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IconCategory {
    Clear,
    PartlyCloudy,
    Fog,
    Rain,
    #[default]
    Unknown,
}

impl IconCategory {
    /// Drawable the host should show for this category
    pub fn resource_name(self) -> &'static str {
        match self {
            Self::Clear => "ic_sunny",
            Self::PartlyCloudy => "ic_partly_cloudy",
            Self::Rain => "ic_rain",
            Self::Fog | Self::Unknown => "ic_weather_default",
        }
    }
}

/// 32-bit ARGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub const GREEN: Color = Color(0xFF4CAF50);
    pub const LIGHT_GREEN: Color = Color(0xFF8BC34A);
    pub const AMBER: Color = Color(0xFFFFC107);
    pub const RED: Color = Color(0xFFF44336);
    pub const GRAY: Color = Color(0xFF9E9E9E);

    pub fn argb(self) -> u32 {
        self.0
    }

    /// `#AARRGGBB` form used by hosts that take color strings
    pub fn to_hex(self) -> String {
        format!("#{:08X}", self.0)
    }
}

/// Display language variant. Exactly two are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    /// Chinese, the main application's primary language
    #[default]
    Default,
    En,
}

/// Host-assigned widget instance identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub i32);

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which of the two layouts an instance uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LayoutSize {
    #[default]
    Compact,
    Large,
}

impl LayoutSize {
    /// Widths strictly below `threshold` get the compact layout.
    pub fn from_min_width(min_width: u32, threshold: u32) -> Self {
        if min_width >= threshold {
            Self::Large
        } else {
            Self::Compact
        }
    }
}

/// A placed widget as seen at render time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetInstance {
    pub id: InstanceId,
    pub size: LayoutSize,
}

impl WidgetInstance {
    pub fn new(id: InstanceId, size: LayoutSize) -> Self {
        Self { id, size }
    }
}

/// One read of the shared store, every field resolved.
///
/// Text fields are display strings exactly as the main application wrote them,
/// or the localized default when the key was absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub weather_condition: String,
    /// Empty when the main application did not write a code
    pub weather_code: String,
    pub temperature: String,
    pub suitability: String,
    pub suitability_level: SuitabilityLevel,
    pub score: String,
    pub location: String,
    pub pressure: String,
}

/// Pulse that asks a scheduler to re-render every placed instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTick;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parse_known_values() {
        assert_eq!(SuitabilityLevel::parse("excellent"), Some(SuitabilityLevel::Excellent));
        assert_eq!(SuitabilityLevel::parse(" Good "), Some(SuitabilityLevel::Good));
        assert_eq!(SuitabilityLevel::parse("MODERATE"), Some(SuitabilityLevel::Moderate));
        assert_eq!(SuitabilityLevel::parse("poor"), Some(SuitabilityLevel::Poor));
        assert_eq!(SuitabilityLevel::parse("unknown"), Some(SuitabilityLevel::Unknown));
    }

    #[test]
    fn test_level_parse_rejects_other_text() {
        assert_eq!(SuitabilityLevel::parse(""), None);
        assert_eq!(SuitabilityLevel::parse("适宜"), None);
    }

    #[test]
    fn test_level_rank_order() {
        assert!(SuitabilityLevel::Excellent.rank() > SuitabilityLevel::Good.rank());
        assert!(SuitabilityLevel::Good.rank() > SuitabilityLevel::Moderate.rank());
        assert!(SuitabilityLevel::Moderate.rank() > SuitabilityLevel::Poor.rank());
        assert_eq!(SuitabilityLevel::Unknown.rank(), None);
    }

    #[test]
    fn test_icon_resource_names() {
        assert_eq!(IconCategory::Clear.resource_name(), "ic_sunny");
        assert_eq!(IconCategory::Fog.resource_name(), "ic_weather_default");
        assert_eq!(IconCategory::Unknown.resource_name(), "ic_weather_default");
    }

    #[test]
    fn test_color_hex() {
        assert_eq!(Color::GREEN.to_hex(), "#FF4CAF50");
        assert_eq!(Color::GRAY.argb(), 0xFF9E9E9E);
    }

    #[test]
    fn test_layout_threshold_is_inclusive() {
        assert_eq!(LayoutSize::from_min_width(249, 250), LayoutSize::Compact);
        assert_eq!(LayoutSize::from_min_width(250, 250), LayoutSize::Large);
        assert_eq!(LayoutSize::from_min_width(0, 250), LayoutSize::Compact);
    }
}
