//! Page configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; a user `config.toml` in the site source directory overrides
//! any subset of keys.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [rotation]
//! interval_ms = 6000        # Featured review advances on this cadence
//!
//! [scroll]
//! threshold_px = 50.0       # Nav chrome turns solid once scrollY > threshold
//!
//! [reservation]
//! acknowledgement = "Thank you for your reservation request! Our team will contact you shortly."
//!
//! [particles]
//! count = 20                # Decorative particles drifting over the hero
//! seed = 42                 # Same seed, same particle field
//!
//! [colors]
//! background = "#0a0a0a"
//! surface = "#1a0a0a"
//! text = "#f5f5f5"
//! accent = "#d4af37"        # Gold: headings, active tabs, stars
//! brand = "#8b0000"         # Burgundy: buttons, borders, gradients
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse; override just the values you want:
//!
//! ```toml
//! [rotation]
//! interval_ms = 8000
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Page configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    /// Review rotation cadence.
    pub rotation: RotationConfig,
    /// Scroll-driven navigation chrome.
    pub scroll: ScrollConfig,
    /// Reservation form acknowledgement.
    pub reservation: ReservationConfig,
    /// Hero particle field.
    pub particles: ParticlesConfig,
    /// Brand palette.
    pub colors: ColorConfig,
}

impl PageConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rotation.interval_ms == 0 {
            return Err(ConfigError::Validation(
                "rotation.interval_ms must be greater than 0".into(),
            ));
        }
        if !self.scroll.threshold_px.is_finite() || self.scroll.threshold_px < 0.0 {
            return Err(ConfigError::Validation(
                "scroll.threshold_px must be a finite, non-negative number".into(),
            ));
        }
        if self.reservation.acknowledgement.trim().is_empty() {
            return Err(ConfigError::Validation(
                "reservation.acknowledgement must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RotationConfig {
    /// Milliseconds between featured-review advances.
    pub interval_ms: u64,
}

impl RotationConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self { interval_ms: 6000 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollConfig {
    /// Vertical offset (CSS px) past which the nav bar is drawn solid.
    /// The comparison is strict: exactly at the threshold is not scrolled.
    pub threshold_px: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self { threshold_px: 50.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReservationConfig {
    /// Message handed to the notification surface after submit.
    pub acknowledgement: String,
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            acknowledgement:
                "Thank you for your reservation request! Our team will contact you shortly."
                    .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParticlesConfig {
    pub count: usize,
    pub seed: u64,
}

impl Default for ParticlesConfig {
    fn default() -> Self {
        Self { count: 20, seed: 42 }
    }
}

/// Brand palette, emitted as CSS custom properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub background: String,
    /// Raised panels and the middle stop of the page gradient.
    pub surface: String,
    pub text: String,
    /// Gold highlight (headings, active tab, stars).
    pub accent: String,
    /// Burgundy (buttons, borders).
    pub brand: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: "#0a0a0a".to_string(),
            surface: "#1a0a0a".to_string(),
            text: "#f5f5f5".to_string(),
            accent: "#d4af37".to_string(),
            brand: "#8b0000".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(PageConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<PageConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PageConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(root: &Path) -> Result<PageConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# The Alchemist page configuration
# ================================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Review rotation
# ---------------------------------------------------------------------------
[rotation]
# Milliseconds between automatic advances of the featured review.
interval_ms = 6000

# ---------------------------------------------------------------------------
# Navigation chrome
# ---------------------------------------------------------------------------
[scroll]
# The nav bar switches to its solid style once the page is scrolled
# strictly past this many pixels.
threshold_px = 50.0

# ---------------------------------------------------------------------------
# Reservation form
# ---------------------------------------------------------------------------
[reservation]
# Shown to the visitor after a reservation request is submitted.
acknowledgement = "Thank you for your reservation request! Our team will contact you shortly."

# ---------------------------------------------------------------------------
# Hero particles
# ---------------------------------------------------------------------------
[particles]
count = 20
# The particle field is generated from this seed; identical seeds produce
# identical markup.
seed = 42

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors]
background = "#0a0a0a"
surface = "#1a0a0a"
text = "#f5f5f5"
accent = "#d4af37"     # Gold
brand = "#8b0000"      # Burgundy
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {background};
    --color-surface: {surface};
    --color-text: {text};
    --color-accent: {accent};
    --color-brand: {brand};
}}"#,
        background = colors.background,
        surface = colors.surface,
        text = colors.text,
        accent = colors.accent,
        brand = colors.brand,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_rotation_is_six_seconds() {
        let config = PageConfig::default();
        assert_eq!(config.rotation.interval(), Duration::from_millis(6000));
    }

    #[test]
    fn default_scroll_threshold_is_fifty() {
        assert_eq!(PageConfig::default().scroll.threshold_px, 50.0);
    }

    #[test]
    fn default_acknowledgement_matches_copy() {
        assert!(
            PageConfig::default()
                .reservation
                .acknowledgement
                .starts_with("Thank you for your reservation request!")
        );
    }

    #[test]
    fn default_config_validates() {
        assert!(PageConfig::default().validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[rotation]
interval_ms = 8000
"#;
        let config: PageConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.rotation.interval_ms, 8000);
        assert_eq!(config.scroll.threshold_px, 50.0);
        assert_eq!(config.colors.accent, "#d4af37");
    }

    #[test]
    fn unknown_keys_rejected() {
        let toml = r#"
[rotation]
interval = 8000
"#;
        let result: Result<PageConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn zero_interval_rejected() {
        let mut config = PageConfig::default();
        config.rotation.interval_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn negative_or_nan_threshold_rejected() {
        let mut config = PageConfig::default();
        config.scroll.threshold_px = -1.0;
        assert!(config.validate().is_err());
        config.scroll.threshold_px = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn blank_acknowledgement_rejected() {
        let mut config = PageConfig::default();
        config.reservation.acknowledgement = "   ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, PageConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r##"
[scroll]
threshold_px = 120.0

[colors]
accent = "#c0ffee"
"##,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.scroll.threshold_px, 120.0);
        assert_eq!(config.colors.accent, "#c0ffee");
        // Unspecified values should be defaults
        assert_eq!(config.colors.brand, "#8b0000");
        assert_eq!(config.rotation.interval_ms, 6000);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn load_config_validation_runs_after_merge() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[rotation]\ninterval_ms = 0\n",
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_deep_nested() {
        let base: toml::Value =
            toml::from_str("[colors]\naccent = \"#111\"\nbrand = \"#222\"").unwrap();
        let overlay: toml::Value = toml::from_str("[colors]\nbrand = \"#333\"").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["colors"]["accent"].as_str(), Some("#111"));
        assert_eq!(merged["colors"]["brand"].as_str(), Some("#333"));
    }

    #[test]
    fn stock_config_toml_parses_to_defaults() {
        let config: PageConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, PageConfig::default());
    }

    #[test]
    fn generate_css_includes_all_variables() {
        let css = generate_color_css(&ColorConfig::default());
        for var in [
            "--color-bg",
            "--color-surface",
            "--color-text",
            "--color-accent",
            "--color-brand",
        ] {
            assert!(css.contains(var), "missing {var}");
        }
        assert!(css.contains("#d4af37"));
    }
}
