use log::{warn, Level};
use serde::Deserialize;
use web_sys::Document;

/// Id of the optional `<script type="application/json">` block that overrides the defaults.
pub const CONFIG_ELEMENT_ID: &str = "fx-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

/// Tunables for the landing page effects.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FxConfig {
    /// Max viewport width (px) at which the package grid turns into a carousel.
    pub carousel_breakpoint_px: u32,
    pub autoplay_interval_ms: u32,
    pub header_idle_ms: u32,
    pub swipe_tease_cooldown_ms: u32,
    /// Delay added per item for staggered hero/section entrances.
    pub stagger_step_ms: u32,
    pub thresholds: Thresholds,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub card: f64,
    pub hero: f64,
    pub section: f64,
    pub swipe_tease: f64,
    pub carousel: f64,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            carousel_breakpoint_px: 767,
            autoplay_interval_ms: 5_000,
            header_idle_ms: 2_000,
            swipe_tease_cooldown_ms: 1_200,
            stagger_step_ms: 90,
            thresholds: Thresholds::default(),
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            card: 0.2,
            hero: 0.35,
            section: 0.2,
            swipe_tease: 0.3,
            carousel: 0.6,
        }
    }
}

impl Thresholds {
    /// Observers reject thresholds outside `0..=1`.
    pub fn clamped(self) -> Self {
        let clamp = |value: f64| if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        Self {
            card: clamp(self.card),
            hero: clamp(self.hero),
            section: clamp(self.section),
            swipe_tease: clamp(self.swipe_tease),
            carousel: clamp(self.carousel),
        }
    }
}

impl FxConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(raw)?;
        config.thresholds = config.thresholds.clamped();
        Ok(config)
    }

    /// Reads the embedded override block, falling back to the defaults when it
    /// is absent or malformed.
    pub fn from_document(document: &Document) -> Self {
        let raw = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content());

        match raw {
            Some(raw) if !raw.trim().is_empty() => Self::from_json(&raw).unwrap_or_else(|e| {
                warn!("Ignoring malformed #{}: {}", CONFIG_ELEMENT_ID, e);
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    pub fn carousel_query(&self) -> String {
        format!("(max-width: {}px)", self.carousel_breakpoint_px)
    }

    pub fn stagger_delay(&self, index: usize) -> String {
        format!("{}ms", index as u64 * u64::from(self.stagger_step_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = FxConfig::from_json(r#"{"carousel_breakpoint_px": 480, "thresholds": {"hero": 0.5}}"#)
            .unwrap();

        assert_eq!(config.carousel_breakpoint_px, 480);
        assert_eq!(config.thresholds.hero, 0.5);
        assert_eq!(config.thresholds.card, 0.2);
        assert_eq!(config.autoplay_interval_ms, 5_000);
        assert_eq!(config.header_idle_ms, 2_000);
    }

    #[test]
    fn thresholds_are_clamped_into_observer_range() {
        let config = FxConfig::from_json(r#"{"thresholds": {"carousel": 1.5, "card": -0.2}}"#).unwrap();
        assert_eq!(config.thresholds.carousel, 1.0);
        assert_eq!(config.thresholds.card, 0.0);
        assert_eq!(config.thresholds.hero, 0.35);
    }

    #[cfg(debug_assertions)]
    #[test]
    fn debug_builds_log_at_debug() {
        assert_eq!(log_level(), Level::Debug);
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(FxConfig::from_json("{}").unwrap(), FxConfig::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(FxConfig::from_json("{carousel_breakpoint_px: }").is_err());
    }

    #[test]
    fn media_query_uses_breakpoint() {
        let config = FxConfig {
            carousel_breakpoint_px: 480,
            ..FxConfig::default()
        };
        assert_eq!(config.carousel_query(), "(max-width: 480px)");
    }

    #[test]
    fn stagger_delay_grows_per_index() {
        let config = FxConfig::default();
        assert_eq!(config.stagger_delay(0), "0ms");
        assert_eq!(config.stagger_delay(3), "270ms");
    }
}
