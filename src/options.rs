//! Pipeline options and configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default locale used for segmentation and speech.
pub const DEFAULT_LOCALE: &str = "zh-CN";

/// Default number of characters per chunk when sentence segmentation is unavailable.
pub const DEFAULT_FALLBACK_CHUNK_SIZE: usize = 10;

/// Options for the document-to-speech pipeline.
///
/// Every field has a default, so a JSON configuration only needs to name
/// what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// BCP 47 locale used for sentence segmentation and every utterance
    pub locale: String,

    /// Scale at which page viewports are computed and rendered
    pub scale: f32,

    /// Physical pixels per logical pixel on the display
    pub device_pixel_ratio: f32,

    /// Speech rate shared by every utterance
    pub rate: f32,

    /// Range each utterance's pitch is sampled from
    pub pitch_range: PitchRange,

    /// Characters per chunk for the fixed-size fallback policy
    pub fallback_chunk_size: usize,

    /// Label of the start affordance when the document has no title
    pub start_label: String,
}

impl PipelineOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the locale.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Set the render scale.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Set the device pixel ratio.
    pub fn with_device_pixel_ratio(mut self, ratio: f32) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    /// Set the speech rate.
    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }

    /// Set the pitch range.
    pub fn with_pitch_range(mut self, min: f32, max: f32) -> Self {
        self.pitch_range = PitchRange { min, max };
        self
    }

    /// Set the fallback chunk size.
    pub fn with_fallback_chunk_size(mut self, size: usize) -> Self {
        self.fallback_chunk_size = size;
        self
    }

    /// Set the start affordance label.
    pub fn with_start_label(mut self, label: impl Into<String>) -> Self {
        self.start_label = label.into();
        self
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        if self.locale.trim().is_empty() {
            return Err(Error::InvalidOption("locale must not be empty".into()));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(Error::InvalidOption(format!(
                "scale must be positive, got {}",
                self.scale
            )));
        }
        if !(self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0) {
            return Err(Error::InvalidOption(format!(
                "device_pixel_ratio must be positive, got {}",
                self.device_pixel_ratio
            )));
        }
        if !(self.rate.is_finite() && self.rate > 0.0) {
            return Err(Error::InvalidOption(format!(
                "rate must be positive, got {}",
                self.rate
            )));
        }
        self.pitch_range.validate()?;
        if self.fallback_chunk_size == 0 {
            return Err(Error::InvalidOption(
                "fallback_chunk_size must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate options from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Read, parse and validate options from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            scale: 1.0,
            device_pixel_ratio: 1.0,
            rate: 2.0,
            pitch_range: PitchRange::default(),
            fallback_chunk_size: DEFAULT_FALLBACK_CHUNK_SIZE,
            start_label: "Start".to_string(),
        }
    }
}

/// Range a per-utterance pitch is drawn from.
///
/// Sampling is half-open (`min..max`); a range with `min == max` always
/// yields `min`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchRange {
    /// Lowest pitch
    pub min: f32,
    /// Upper bound of the pitch
    pub max: f32,
}

impl PitchRange {
    /// Width of the range.
    pub fn width(&self) -> f32 {
        self.max - self.min
    }

    fn validate(&self) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min < 0.0 {
            return Err(Error::InvalidOption(format!(
                "pitch range must be finite and non-negative, got {}..{}",
                self.min, self.max
            )));
        }
        if self.min > self.max {
            return Err(Error::InvalidOption(format!(
                "pitch range is inverted: {}..{}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

impl Default for PitchRange {
    fn default() -> Self {
        Self { min: 0.0, max: 2.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = PipelineOptions::default();
        assert_eq!(options.locale, "zh-CN");
        assert_eq!(options.scale, 1.0);
        assert_eq!(options.rate, 2.0);
        assert_eq!(options.pitch_range.width(), 2.0);
        assert_eq!(options.fallback_chunk_size, 10);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_options_builder() {
        let options = PipelineOptions::new()
            .with_locale("en-US")
            .with_scale(1.5)
            .with_device_pixel_ratio(2.0)
            .with_rate(1.0)
            .with_pitch_range(0.5, 1.5)
            .with_fallback_chunk_size(32)
            .with_start_label("Play");

        assert_eq!(options.locale, "en-US");
        assert_eq!(options.scale, 1.5);
        assert_eq!(options.device_pixel_ratio, 2.0);
        assert_eq!(options.pitch_range, PitchRange { min: 0.5, max: 1.5 });
        assert_eq!(options.fallback_chunk_size, 32);
        assert_eq!(options.start_label, "Play");
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(PipelineOptions::new().with_locale("  ").validate().is_err());
        assert!(PipelineOptions::new().with_scale(0.0).validate().is_err());
        assert!(PipelineOptions::new()
            .with_device_pixel_ratio(f32::NAN)
            .validate()
            .is_err());
        assert!(PipelineOptions::new().with_rate(-1.0).validate().is_err());
        assert!(PipelineOptions::new()
            .with_pitch_range(2.0, 1.0)
            .validate()
            .is_err());
        assert!(PipelineOptions::new()
            .with_fallback_chunk_size(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_degenerate_pitch_range_is_valid() {
        assert!(PipelineOptions::new()
            .with_pitch_range(1.0, 1.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let options =
            PipelineOptions::from_json_str(r#"{"locale": "ja-JP", "fallback_chunk_size": 20}"#)
                .unwrap();
        assert_eq!(options.locale, "ja-JP");
        assert_eq!(options.fallback_chunk_size, 20);
        assert_eq!(options.rate, 2.0);
    }

    #[test]
    fn test_from_json_invalid() {
        let err = PipelineOptions::from_json_str(r#"{"rate": 0}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidOption(_)));

        let err = PipelineOptions::from_json_str("not json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
