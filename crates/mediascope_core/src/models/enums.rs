//! Core enums used throughout the pipeline.

use serde::{Deserialize, Serialize};

/// Kind of media asset, declared by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// Coarse color-temperature label estimated from mean channel values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorTemperature {
    /// Blue channel dominates.
    #[serde(rename = "Cool (Blue-ish)")]
    Cool,
    /// Red channel dominates.
    #[serde(rename = "Warm (Red-ish)")]
    Warm,
    /// No single dominant channel.
    Neutral,
    /// Could not be estimated.
    #[default]
    Unknown,
}

impl ColorTemperature {
    /// Get the display name for this label.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cool => "Cool (Blue-ish)",
            Self::Warm => "Warm (Red-ish)",
            Self::Neutral => "Neutral",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for ColorTemperature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Sharpness label derived from Laplacian variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SharpnessLabel {
    Sharp,
    Moderate,
    Blurry,
}

/// Overall quality label combining sharpness and noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityLabel {
    Good,
    Fair,
    Poor,
}

/// Motion intensity category from the sparse-flow summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MotionCategory {
    Low,
    Medium,
    High,
    /// No frame pair could be analyzed.
    #[default]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_kind_serializes_lowercase() {
        let json = serde_json::to_string(&MediaKind::Video).unwrap();
        assert_eq!(json, "\"video\"");
    }

    #[test]
    fn color_temperature_serializes_display_name() {
        let json = serde_json::to_string(&ColorTemperature::Cool).unwrap();
        assert_eq!(json, "\"Cool (Blue-ish)\"");
    }

    #[test]
    fn motion_category_serializes_plain_name() {
        let json = serde_json::to_string(&MotionCategory::Low).unwrap();
        assert_eq!(json, "\"Low\"");
    }
}
