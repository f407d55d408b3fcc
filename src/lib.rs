//! # readaloud
//!
//! Document-to-speech playback pipeline for Rust.
//!
//! This library turns a paginated document into an ordered queue of
//! speakable utterances and ties playback to the rendering of its pages:
//! one user action renders every page and queues every sentence, teardown
//! cancels all speech.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use readaloud::source::memory::{MemorySource, MemorySurface};
//! use readaloud::{ReadAloud, SpeechEngine, Utterance};
//!
//! struct Printer;
//!
//! impl SpeechEngine for Printer {
//!     fn enqueue(&self, utterance: Utterance) {
//!         println!("[pitch {:.2}] {}", utterance.pitch, utterance.text);
//!     }
//!     fn cancel_all(&self) {}
//! }
//!
//! # async fn run() -> readaloud::Result<()> {
//! let mut session = ReadAloud::new()
//!     .with_locale("en-US")
//!     .open(&MemorySource::new(), b"First page.\x0CSecond page.", Arc::new(Printer))
//!     .await?;
//!
//! for layout in session.presentation().surfaces {
//!     session.attach_surface(layout.page_number, Arc::new(MemorySurface::new()));
//! }
//! if session.can_start() {
//!     session.start().await;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **Ordered concurrency**: pages and their text are fetched together and
//!   always assembled in page order
//! - **Sentence segmentation**: UAX #29 sentence boundaries, with a
//!   fixed-size fallback that never loses text
//! - **Stage cache**: each stage is recomputed only when its inputs change
//! - **Single start, guaranteed cancel**: the start transition happens at
//!   most once and teardown always silences the speech engine

pub mod error;
pub mod model;
pub mod options;
pub mod pipeline;
pub mod playback;
pub mod presentation;
pub mod session;
pub mod source;

// Re-export commonly used types
pub use error::{Error, Result};
pub use model::{Chunk, SegmentationPolicy, SurfaceLayout, TextItem, Transform, Utterance, Viewport};
pub use options::{PipelineOptions, PitchRange};
pub use pipeline::{
    Pipeline, PlaybackPlan, Segmenter, SentenceSegmenter, UnicodeSentenceSegmenter,
    UtteranceBuilder,
};
pub use playback::{
    PlaybackController, RenderSurfaces, SessionState, SpeechEngine, StartOutcome, StartReport,
};
pub use presentation::{PresentationState, StartAffordance};
pub use session::Session;
pub use source::{DocumentHandle, DocumentSource, PageProxy, PageRef, RenderRequest, RenderTarget};

use std::path::Path;
use std::sync::Arc;

/// Split text into chunks the way a pipeline with `options` would.
///
/// # Example
///
/// ```
/// use readaloud::{segment_text, PipelineOptions};
///
/// let chunks = segment_text("One. Two.", &PipelineOptions::new().with_locale("en"));
/// assert_eq!(chunks.len(), 2);
/// ```
pub fn segment_text(text: &str, options: &PipelineOptions) -> Vec<Chunk> {
    Segmenter::from_options(options).segment(text)
}

/// Open a document and return its aggregated text.
///
/// # Example
///
/// ```no_run
/// use readaloud::extract_text;
/// use readaloud::source::memory::MemorySource;
///
/// # async fn run() -> readaloud::Result<()> {
/// let text = extract_text(&MemorySource::new(), b"page one\x0Cpage two").await?;
/// assert_eq!(text, "page onepage two");
/// # Ok(())
/// # }
/// ```
pub async fn extract_text(source: &dyn DocumentSource, data: &[u8]) -> Result<String> {
    let handle = source.open(data).await?;
    let pages = pipeline::extract_pages(handle.as_ref()).await?;
    pipeline::aggregate_text(&pages).await
}

/// Builder for configuring and opening a playback session.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use readaloud::ReadAloud;
/// use readaloud::source::memory::MemorySource;
/// # use readaloud::{SpeechEngine, Utterance};
/// # struct Silent;
/// # impl SpeechEngine for Silent {
/// #     fn enqueue(&self, _: Utterance) {}
/// #     fn cancel_all(&self) {}
/// # }
///
/// # async fn run() -> readaloud::Result<()> {
/// let session = ReadAloud::new()
///     .with_locale("zh-CN")
///     .with_rate(2.0)
///     .with_pitch_range(0.0, 2.0)
///     .fixed_size_only()
///     .open(&MemorySource::new(), "第一条。".as_bytes(), Arc::new(Silent))
///     .await?;
/// assert!(session.can_start());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ReadAloud {
    options: PipelineOptions,
    sentence: SentencePolicy,
}

#[derive(Clone)]
enum SentencePolicy {
    Default,
    Disabled,
    Custom(Arc<dyn SentenceSegmenter>),
}

impl ReadAloud {
    /// Create a builder with default options.
    pub fn new() -> Self {
        Self {
            options: PipelineOptions::default(),
            sentence: SentencePolicy::Default,
        }
    }

    /// Create a builder from a JSON options file.
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new().with_options(PipelineOptions::from_json_file(path)?))
    }

    /// Replace all options.
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the locale.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.options = self.options.with_locale(locale);
        self
    }

    /// Set the speech rate.
    pub fn with_rate(mut self, rate: f32) -> Self {
        self.options = self.options.with_rate(rate);
        self
    }

    /// Set the pitch range.
    pub fn with_pitch_range(mut self, min: f32, max: f32) -> Self {
        self.options = self.options.with_pitch_range(min, max);
        self
    }

    /// Set the render scale.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.options = self.options.with_scale(scale);
        self
    }

    /// Set the device pixel ratio.
    pub fn with_device_pixel_ratio(mut self, ratio: f32) -> Self {
        self.options = self.options.with_device_pixel_ratio(ratio);
        self
    }

    /// Set the fallback chunk size.
    pub fn with_fallback_chunk_size(mut self, size: usize) -> Self {
        self.options = self.options.with_fallback_chunk_size(size);
        self
    }

    /// Set the start affordance label.
    pub fn with_start_label(mut self, label: impl Into<String>) -> Self {
        self.options = self.options.with_start_label(label);
        self
    }

    /// Use a custom sentence segmenter.
    pub fn with_sentence_segmenter(mut self, segmenter: Arc<dyn SentenceSegmenter>) -> Self {
        self.sentence = SentencePolicy::Custom(segmenter);
        self
    }

    /// Segment with fixed-size chunks only.
    pub fn fixed_size_only(mut self) -> Self {
        self.sentence = SentencePolicy::Disabled;
        self
    }

    /// The options this builder will use.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Build an empty pipeline.
    pub fn pipeline(self) -> Result<Pipeline> {
        let pipeline = Pipeline::new(self.options)?;
        Ok(match self.sentence {
            SentencePolicy::Default => pipeline,
            SentencePolicy::Disabled => pipeline.without_sentence_segmenter(),
            SentencePolicy::Custom(segmenter) => pipeline.with_sentence_segmenter(segmenter),
        })
    }

    /// Build an idle session with no document.
    pub fn session(self, engine: Arc<dyn SpeechEngine>) -> Result<Session> {
        Ok(Session::with_pipeline(self.pipeline()?, engine))
    }

    /// Build a session and load `data` into it.
    pub async fn open(
        self,
        source: &dyn DocumentSource,
        data: &[u8],
        engine: Arc<dyn SpeechEngine>,
    ) -> Result<Session> {
        let mut session = self.session(engine)?;
        session.load(source, data).await?;
        Ok(session)
    }
}

impl Default for ReadAloud {
    fn default() -> Self {
        Self::new()
    }
}
