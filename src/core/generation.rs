// src/core/generation.rs — Sampling parameters and the fixed safety policy

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

pub const TEMPERATURE_RANGE: RangeInclusive<f32> = 0.0..=1.0;
pub const TOP_P_RANGE: RangeInclusive<f32> = 0.0..=1.0;
pub const TOP_K_RANGE: RangeInclusive<u32> = 0..=100;
pub const MAX_OUTPUT_TOKENS_RANGE: RangeInclusive<u32> = 10..=2048;

/// Sampling parameters sent with every generation request.
///
/// Fields are private so every value passes through a clamping setter;
/// a config that is out of bounds cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            top_k: 40,
            max_output_tokens: 512,
        }
    }
}

impl GenerationConfig {
    pub fn new(temperature: f32, top_p: f32, top_k: u32, max_output_tokens: u32) -> Self {
        let mut c = Self::default();
        c.set_temperature(temperature);
        c.set_top_p(top_p);
        c.set_top_k(top_k);
        c.set_max_output_tokens(max_output_tokens);
        c
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn top_p(&self) -> f32 {
        self.top_p
    }

    pub fn top_k(&self) -> u32 {
        self.top_k
    }

    pub fn max_output_tokens(&self) -> u32 {
        self.max_output_tokens
    }

    /// Returns the value actually stored.
    pub fn set_temperature(&mut self, value: f32) -> f32 {
        self.temperature = clamp_f32(value, &TEMPERATURE_RANGE);
        self.temperature
    }

    pub fn set_top_p(&mut self, value: f32) -> f32 {
        self.top_p = clamp_f32(value, &TOP_P_RANGE);
        self.top_p
    }

    pub fn set_top_k(&mut self, value: u32) -> u32 {
        self.top_k = value.clamp(*TOP_K_RANGE.start(), *TOP_K_RANGE.end());
        self.top_k
    }

    pub fn set_max_output_tokens(&mut self, value: u32) -> u32 {
        self.max_output_tokens = value.clamp(
            *MAX_OUTPUT_TOKENS_RANGE.start(),
            *MAX_OUTPUT_TOKENS_RANGE.end(),
        );
        self.max_output_tokens
    }
}

impl fmt::Display for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "temperature={:.2} top_p={:.2} top_k={} max_output_tokens={}",
            self.temperature, self.top_p, self.top_k, self.max_output_tokens
        )
    }
}

/// NaN has no meaningful position on a slider; treat it as the minimum.
fn clamp_f32(value: f32, range: &RangeInclusive<f32>) -> f32 {
    if value.is_nan() {
        return *range.start();
    }
    value.clamp(*range.start(), *range.end())
}

// ─── Safety policy ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
}

impl HarmCategory {
    pub const ALL: [HarmCategory; 4] = [
        HarmCategory::DangerousContent,
        HarmCategory::SexuallyExplicit,
        HarmCategory::HateSpeech,
        HarmCategory::Harassment,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            HarmCategory::DangerousContent => "dangerous content",
            HarmCategory::SexuallyExplicit => "sexually explicit",
            HarmCategory::HateSpeech => "hate speech",
            HarmCategory::Harassment => "harassment",
        }
    }
}

/// Blocking thresholds, in the provider's numeric order (1..=4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockLowAndAbove,
    BlockMediumAndAbove,
    BlockOnlyHigh,
    BlockNone,
}

impl HarmBlockThreshold {
    pub fn level(&self) -> u8 {
        match self {
            HarmBlockThreshold::BlockLowAndAbove => 1,
            HarmBlockThreshold::BlockMediumAndAbove => 2,
            HarmBlockThreshold::BlockOnlyHigh => 3,
            HarmBlockThreshold::BlockNone => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

/// Content-filter thresholds applied to every request. Always carries all
/// four categories, each at the most permissive level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyPolicy {
    settings: [SafetySetting; 4],
}

impl Default for SafetyPolicy {
    fn default() -> Self {
        Self::permissive()
    }
}

impl SafetyPolicy {
    pub fn permissive() -> Self {
        Self {
            settings: HarmCategory::ALL.map(|category| SafetySetting {
                category,
                threshold: HarmBlockThreshold::BlockNone,
            }),
        }
    }

    pub fn settings(&self) -> &[SafetySetting] {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = GenerationConfig::default();
        assert_eq!(c.temperature(), 0.7);
        assert_eq!(c.top_p(), 0.9);
        assert_eq!(c.top_k(), 40);
        assert_eq!(c.max_output_tokens(), 512);
    }

    #[test]
    fn test_new_clamps_every_field() {
        let c = GenerationConfig::new(1.5, -0.5, 1000, 5000);
        assert_eq!(c.temperature(), 1.0);
        assert_eq!(c.top_p(), 0.0);
        assert_eq!(c.top_k(), 100);
        assert_eq!(c.max_output_tokens(), 2048);
    }

    #[test]
    fn test_max_tokens_lower_bound() {
        let mut c = GenerationConfig::default();
        assert_eq!(c.set_max_output_tokens(0), 10);
        assert_eq!(c.set_max_output_tokens(10), 10);
    }

    #[test]
    fn test_in_range_values_kept() {
        let c = GenerationConfig::new(0.25, 0.5, 0, 2048);
        assert_eq!(c.temperature(), 0.25);
        assert_eq!(c.top_p(), 0.5);
        assert_eq!(c.top_k(), 0);
        assert_eq!(c.max_output_tokens(), 2048);
    }

    #[test]
    fn test_non_finite_floats() {
        let mut c = GenerationConfig::default();
        assert_eq!(c.set_temperature(f32::NAN), 0.0);
        assert_eq!(c.set_temperature(f32::INFINITY), 1.0);
        assert_eq!(c.set_top_p(f32::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_bounds_hold_over_sweep() {
        for i in -50..150 {
            let v = i as f32 / 50.0;
            let c = GenerationConfig::new(v, v, (i * 10).max(0) as u32, (i * 30).max(0) as u32);
            assert!(TEMPERATURE_RANGE.contains(&c.temperature()));
            assert!(TOP_P_RANGE.contains(&c.top_p()));
            assert!(TOP_K_RANGE.contains(&c.top_k()));
            assert!(MAX_OUTPUT_TOKENS_RANGE.contains(&c.max_output_tokens()));
        }
    }

    #[test]
    fn test_display() {
        let c = GenerationConfig::default();
        assert_eq!(
            c.to_string(),
            "temperature=0.70 top_p=0.90 top_k=40 max_output_tokens=512"
        );
    }

    #[test]
    fn test_safety_policy_has_all_categories() {
        let p = SafetyPolicy::default();
        assert_eq!(p.settings().len(), 4);
        for category in HarmCategory::ALL {
            let s = p
                .settings()
                .iter()
                .find(|s| s.category == category)
                .unwrap();
            assert_eq!(s.threshold, HarmBlockThreshold::BlockNone);
            assert_eq!(s.threshold.level(), 4);
        }
    }

    #[test]
    fn test_safety_setting_wire_format() {
        let s = SafetySetting {
            category: HarmCategory::HateSpeech,
            threshold: HarmBlockThreshold::BlockNone,
        };
        let v = serde_json::to_value(s).unwrap();
        assert_eq!(v["category"], "HARM_CATEGORY_HATE_SPEECH");
        assert_eq!(v["threshold"], "BLOCK_NONE");
    }
}
