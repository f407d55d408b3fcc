//! Speech-side types derived from the aggregated text.

use serde::{Deserialize, Serialize};

/// Which segmentation policy produced a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentationPolicy {
    /// Locale-aware sentence boundaries
    Sentence,
    /// Fixed number of characters per chunk
    FixedSize,
}

/// A contiguous substring of the aggregated document text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// The chunk text
    pub text: String,

    /// Byte offset of the chunk in the aggregated text
    pub offset: usize,

    /// Policy that produced the chunk
    pub policy: SegmentationPolicy,
}

impl Chunk {
    /// Create a chunk.
    pub fn new(text: impl Into<String>, offset: usize, policy: SegmentationPolicy) -> Self {
        Self {
            text: text.into(),
            offset,
            policy,
        }
    }

    /// Byte offset one past the end of the chunk.
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    /// Number of characters in the chunk.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// A chunk bound to voice parameters, ready to be queued for playback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    /// Text to speak
    pub text: String,

    /// BCP 47 locale of the voice
    pub locale: String,

    /// Pitch, sampled once when the utterance was built
    pub pitch: f32,

    /// Speech rate
    pub rate: f32,
}

impl Utterance {
    /// Create an utterance with neutral voice parameters.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            locale: String::new(),
            pitch: 1.0,
            rate: 1.0,
        }
    }

    /// Set the locale.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Set the pitch.
    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }

    /// Set the rate.
    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_bounds() {
        let chunk = Chunk::new("第一条", 6, SegmentationPolicy::Sentence);
        assert_eq!(chunk.end(), 15);
        assert_eq!(chunk.char_count(), 3);
    }

    #[test]
    fn test_utterance_builder() {
        let utterance = Utterance::new("Hello.")
            .with_locale("en-US")
            .with_pitch(0.75)
            .with_rate(2.0);
        assert_eq!(utterance.text, "Hello.");
        assert_eq!(utterance.locale, "en-US");
        assert_eq!(utterance.pitch, 0.75);
        assert_eq!(utterance.rate, 2.0);
    }

    #[test]
    fn test_policy_serialization() {
        let json = serde_json::to_string(&SegmentationPolicy::FixedSize).unwrap();
        assert_eq!(json, "\"fixed_size\"");
    }
}
