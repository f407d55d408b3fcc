//! Splitting aggregated text into utterance-sized chunks.
//!
//! Two policies exist and exactly one is applied per pass:
//!
//! - **Sentence**: a [`SentenceSegmenter`] capability splits the text at
//!   sentence boundaries for the configured locale.
//! - **Fixed size**: the text is cut every `fallback_chunk_size` characters.
//!
//! The sentence policy is preferred. When the capability is absent, does
//! not support the locale, fails, or returns something that does not cover
//! the input exactly, the [`Segmenter`] falls back to fixed-size chunks.
//! That recovery is local: callers only ever see chunks.

use std::sync::Arc;

use unicode_segmentation::UnicodeSegmentation;

use crate::error::{Error, Result};
use crate::model::{Chunk, SegmentationPolicy};
use crate::options::PipelineOptions;

/// A locale-sensitive sentence boundary capability.
pub trait SentenceSegmenter: Send + Sync {
    /// Whether sentences can be found for `locale`.
    fn supports_locale(&self, locale: &str) -> bool;

    /// Split `text` into consecutive sentences.
    ///
    /// The returned pieces must concatenate back to `text`.
    fn segment<'t>(&self, text: &'t str, locale: &str) -> Result<Vec<&'t str>>;
}

/// Sentence boundaries from Unicode Standard Annex #29.
///
/// The rules are locale-independent; any well-formed locale tag is accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeSentenceSegmenter;

impl SentenceSegmenter for UnicodeSentenceSegmenter {
    fn supports_locale(&self, locale: &str) -> bool {
        is_well_formed_locale(locale)
    }

    fn segment<'t>(&self, text: &'t str, locale: &str) -> Result<Vec<&'t str>> {
        if !self.supports_locale(locale) {
            return Err(Error::Segmentation(format!(
                "malformed locale tag {locale:?}"
            )));
        }
        Ok(text.split_sentence_bounds().collect())
    }
}

/// Check the shape of a BCP 47 language tag such as `zh-CN` or `sr-Latn-RS`.
///
/// Only the structure is checked: a 2-3 or 5-8 letter language subtag
/// followed by alphanumeric subtags of 1-8 characters, separated by `-`.
pub fn is_well_formed_locale(tag: &str) -> bool {
    let mut subtags = tag.split('-');
    let language = match subtags.next() {
        Some(language) => language,
        None => return false,
    };
    let language_ok = matches!(language.len(), 2..=3 | 5..=8)
        && language.chars().all(|c| c.is_ascii_alphabetic());

    language_ok
        && subtags.all(|subtag| {
            (1..=8).contains(&subtag.len()) && subtag.chars().all(|c| c.is_ascii_alphanumeric())
        })
}

/// Splits text into chunks with a sentence policy and a fixed-size fallback.
#[derive(Clone)]
pub struct Segmenter {
    sentence: Option<Arc<dyn SentenceSegmenter>>,
    locale: String,
    fallback_chunk_size: usize,
}

impl Segmenter {
    /// Segmenter using UAX #29 sentences for `locale`.
    pub fn new(locale: impl Into<String>, fallback_chunk_size: usize) -> Self {
        Self {
            sentence: Some(Arc::new(UnicodeSentenceSegmenter)),
            locale: locale.into(),
            fallback_chunk_size,
        }
    }

    /// Segmenter configured from pipeline options.
    pub fn from_options(options: &PipelineOptions) -> Self {
        Self::new(options.locale.clone(), options.fallback_chunk_size)
    }

    /// Replace the sentence capability.
    pub fn with_sentence_segmenter(mut self, segmenter: Arc<dyn SentenceSegmenter>) -> Self {
        self.sentence = Some(segmenter);
        self
    }

    /// Remove the sentence capability, leaving only fixed-size chunking.
    pub fn without_sentence_segmenter(mut self) -> Self {
        self.sentence = None;
        self
    }

    /// Keep the sentence capability but change locale and fallback size.
    pub(crate) fn reconfigure(&mut self, options: &PipelineOptions) {
        self.locale = options.locale.clone();
        self.fallback_chunk_size = options.fallback_chunk_size;
    }

    /// The configured locale.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Characters per chunk under the fixed-size policy.
    pub fn fallback_chunk_size(&self) -> usize {
        self.fallback_chunk_size
    }

    /// Whether the sentence policy will be attempted.
    pub fn has_sentence_capability(&self) -> bool {
        self.sentence
            .as_ref()
            .is_some_and(|s| s.supports_locale(&self.locale))
    }

    /// Split `text` into an ordered, gap-free sequence of chunks.
    pub fn segment(&self, text: &str) -> Vec<Chunk> {
        if text.is_empty() {
            return Vec::new();
        }

        match self.sentence_chunks(text) {
            Ok(chunks) => chunks,
            Err(e) => {
                log::debug!(
                    "Sentence segmentation unavailable for {:?} ({}), using {}-character chunks",
                    self.locale,
                    e,
                    self.fallback_chunk_size
                );
                chunk_fixed_size(text, self.fallback_chunk_size)
            }
        }
    }

    fn sentence_chunks(&self, text: &str) -> Result<Vec<Chunk>> {
        let segmenter = self
            .sentence
            .as_ref()
            .ok_or_else(|| Error::Segmentation("no sentence segmenter".to_string()))?;
        if !segmenter.supports_locale(&self.locale) {
            return Err(Error::Segmentation(format!(
                "locale {:?} is not supported",
                self.locale
            )));
        }

        let pieces = segmenter.segment(text, &self.locale)?;
        let chunks = cover(text, &pieces)?;
        if chunks.is_empty() {
            log::warn!("Sentence segmenter returned no sentences for non-empty text");
            return Err(Error::Segmentation("no sentences returned".to_string()));
        }
        Ok(chunks)
    }
}

impl std::fmt::Debug for Segmenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Segmenter")
            .field("sentence", &self.sentence.is_some())
            .field("locale", &self.locale)
            .field("fallback_chunk_size", &self.fallback_chunk_size)
            .finish()
    }
}

/// Turn segmenter output into chunks, checking it tiles `text` exactly.
fn cover(text: &str, pieces: &[&str]) -> Result<Vec<Chunk>> {
    let mut chunks = Vec::with_capacity(pieces.len());
    let mut offset = 0;
    for piece in pieces.iter().filter(|p| !p.is_empty()) {
        if !text[offset..].starts_with(piece) {
            log::warn!("Sentence segmenter output diverges from the text at byte {offset}");
            return Err(Error::Segmentation(format!(
                "output does not match the text at byte {offset}"
            )));
        }
        chunks.push(Chunk::new(*piece, offset, SegmentationPolicy::Sentence));
        offset += piece.len();
    }
    if offset != text.len() {
        log::warn!(
            "Sentence segmenter covered {} of {} bytes",
            offset,
            text.len()
        );
        return Err(Error::Segmentation("output does not cover the text".to_string()));
    }
    Ok(chunks)
}

/// Cut `text` into chunks of `size` characters; the last may be shorter.
///
/// A `size` of zero is treated as one.
pub fn chunk_fixed_size(text: &str, size: usize) -> Vec<Chunk> {
    let size = size.max(1);
    let mut chunks = Vec::with_capacity(text.chars().count().div_ceil(size));
    let mut start = 0;
    for (index, (offset, _)) in text.char_indices().enumerate() {
        if index > 0 && index % size == 0 {
            chunks.push(Chunk::new(
                &text[start..offset],
                start,
                SegmentationPolicy::FixedSize,
            ));
            start = offset;
        }
    }
    if start < text.len() {
        chunks.push(Chunk::new(
            &text[start..],
            start,
            SegmentationPolicy::FixedSize,
        ));
    }
    chunks
}
