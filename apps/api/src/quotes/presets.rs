use serde::Serialize;

use crate::quotes::prompts::DEFAULT_TONE;
use crate::quotes::request::{DEFAULT_COUNT, MAX_COUNT, MIN_COUNT};

/// Occasion categories offered as one-click choices.
pub const PRESET_CATEGORIES: &[&str] = &[
    "Happy Birthday",
    "Wedding",
    "Retirement",
    "Anniversary",
    "Congratulations",
    "Get Well Soon",
    "Thank You",
    "Farewell",
];

/// Tones offered by the form. The API accepts any tone text.
pub const PRESET_TONES: &[&str] = &[
    "sincere",
    "funny",
    "formal",
    "casual",
    "inspirational",
    "romantic",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Presets {
    pub categories: &'static [&'static str],
    pub tones: &'static [&'static str],
    pub default_tone: &'static str,
    pub default_count: usize,
    pub min_count: usize,
    pub max_count: usize,
}

pub fn presets() -> Presets {
    Presets {
        categories: PRESET_CATEGORIES,
        tones: PRESET_TONES,
        default_tone: DEFAULT_TONE,
        default_count: DEFAULT_COUNT,
        min_count: MIN_COUNT,
        max_count: MAX_COUNT,
    }
}
