//! The document-to-speech pipeline.
//!
//! Stages, leaves first: page extraction, text aggregation, segmentation,
//! utterance building. [`Pipeline`] chains them with a revision-tracked
//! stage cache.

mod extract;
mod segment;
mod stages;
mod utterance;

pub use extract::{aggregate_text, extract_pages};
pub use segment::{
    chunk_fixed_size, is_well_formed_locale, Segmenter, SentenceSegmenter,
    UnicodeSentenceSegmenter,
};
pub use stages::{Pipeline, PlaybackPlan, StageRevisions};
pub use utterance::UtteranceBuilder;
