//! Memoized pipeline stages.
//!
//! The pipeline is a chain of five stages:
//!
//! ```text
//! document ──▶ pages ──▶ text ──▶ chunks ──▶ utterances
//!                                   ▲            ▲
//!                                options ────────┘
//! ```
//!
//! Each stage keeps its value together with the revision of the inputs it
//! was computed from. [`Pipeline::refresh`] walks the chain in order and
//! recomputes exactly the stages whose inputs moved on, always as a whole.

use std::sync::Arc;

use crate::error::Result;
use crate::model::{Chunk, Utterance};
use crate::options::PipelineOptions;
use crate::source::{DocumentHandle, DocumentSource, PageRef};

use super::extract::{aggregate_text, extract_pages};
use super::segment::{Segmenter, SentenceSegmenter};
use super::utterance::UtteranceBuilder;

/// Revision pair a stage was computed from.
type InputKey = (u64, u64);

#[derive(Debug)]
struct Stage<T> {
    value: Option<Arc<T>>,
    revision: u64,
    computed_from: Option<InputKey>,
}

impl<T> Stage<T> {
    fn new() -> Self {
        Self {
            value: None,
            revision: 0,
            computed_from: None,
        }
    }

    fn is_fresh(&self, key: InputKey) -> bool {
        self.computed_from == Some(key)
    }

    fn store(&mut self, key: InputKey, value: Option<T>) {
        self.value = value.map(Arc::new);
        self.revision += 1;
        self.computed_from = Some(key);
    }
}

/// Output revision of every stage; a stage's revision changes each time it
/// is recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StageRevisions {
    /// Pages stage
    pub pages: u64,
    /// Aggregated text stage
    pub text: u64,
    /// Chunks stage
    pub chunks: u64,
    /// Utterances stage
    pub utterances: u64,
}

/// What the playback controller reads once when a session starts.
#[derive(Clone, Default)]
pub struct PlaybackPlan {
    /// Pages in page-number order
    pub pages: Arc<Vec<PageRef>>,
    /// Utterances in chunk order
    pub utterances: Arc<Vec<Utterance>>,
}

impl PlaybackPlan {
    /// Whether there is anything to play: at least one page and one utterance.
    pub fn is_playable(&self) -> bool {
        !self.pages.is_empty() && !self.utterances.is_empty()
    }
}

impl std::fmt::Debug for PlaybackPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackPlan")
            .field("pages", &self.pages.len())
            .field("utterances", &self.utterances.len())
            .finish()
    }
}

/// The document-to-utterances pipeline with its stage cache.
pub struct Pipeline {
    options: PipelineOptions,
    segmenter: Segmenter,
    builder: UtteranceBuilder,
    document: Option<Arc<dyn DocumentHandle>>,
    document_revision: u64,
    config_revision: u64,
    pages: Stage<Vec<PageRef>>,
    text: Stage<String>,
    chunks: Stage<Vec<Chunk>>,
    utterances: Stage<Vec<Utterance>>,
}

impl Pipeline {
    /// Create an empty pipeline.
    pub fn new(options: PipelineOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            segmenter: Segmenter::from_options(&options),
            builder: UtteranceBuilder::from_options(&options),
            options,
            document: None,
            document_revision: 0,
            config_revision: 0,
            pages: Stage::new(),
            text: Stage::new(),
            chunks: Stage::new(),
            utterances: Stage::new(),
        })
    }

    /// Replace the sentence capability used by the segmenter.
    pub fn with_sentence_segmenter(mut self, segmenter: Arc<dyn SentenceSegmenter>) -> Self {
        self.segmenter = self.segmenter.with_sentence_segmenter(segmenter);
        self.config_revision += 1;
        self
    }

    /// Segment with the fixed-size policy only.
    pub fn without_sentence_segmenter(mut self) -> Self {
        self.segmenter = self.segmenter.without_sentence_segmenter();
        self.config_revision += 1;
        self
    }

    /// Open `data` with `source` and recompute every stage.
    ///
    /// On failure the previous document is released and every stage is
    /// left empty.
    pub async fn load(&mut self, source: &dyn DocumentSource, data: &[u8]) -> Result<()> {
        match source.open(data).await {
            Ok(handle) => self.set_document(handle).await,
            Err(e) => {
                log::debug!("Document open failed: {}", e);
                self.install(None);
                self.refresh().await?;
                Err(e)
            }
        }
    }

    /// Read a file and load it.
    #[cfg(feature = "async")]
    pub async fn load_file<P: AsRef<std::path::Path>>(
        &mut self,
        source: &dyn DocumentSource,
        path: P,
    ) -> Result<()> {
        let data = tokio::fs::read(path).await?;
        self.load(source, &data).await
    }

    /// Install an opened document and recompute every stage.
    ///
    /// The handle stays installed when a page or text fetch fails; the
    /// failing stage and everything after it are left empty.
    pub async fn set_document(&mut self, handle: Arc<dyn DocumentHandle>) -> Result<()> {
        self.install(Some(handle));
        self.refresh().await
    }

    /// Change options; chunks and utterances are recomputed, pages and
    /// text are kept.
    pub async fn set_options(&mut self, options: PipelineOptions) -> Result<()> {
        options.validate()?;
        self.segmenter.reconfigure(&options);
        self.builder = UtteranceBuilder::from_options(&options);
        self.options = options;
        self.config_revision += 1;
        self.refresh().await
    }

    fn install(&mut self, handle: Option<Arc<dyn DocumentHandle>>) {
        self.document = handle;
        self.document_revision += 1;
    }

    /// Recompute every stale stage in dependency order.
    ///
    /// A failing stage leaves itself and everything downstream empty; the
    /// first failure is returned after the chain has been brought up to date.
    pub async fn refresh(&mut self) -> Result<()> {
        let mut failure = None;

        let key = (self.document_revision, 0);
        if !self.pages.is_fresh(key) {
            let pages = match self.document.clone() {
                Some(handle) => match extract_pages(handle.as_ref()).await {
                    Ok(pages) => Some(pages),
                    Err(e) => {
                        failure = Some(e);
                        None
                    }
                },
                None => None,
            };
            log::debug!("Recomputed pages stage");
            self.pages.store(key, pages);
        }

        let key = (self.pages.revision, 0);
        if !self.text.is_fresh(key) {
            let text = match self.pages.value.clone() {
                Some(pages) => match aggregate_text(&pages).await {
                    Ok(text) => Some(text),
                    Err(e) => {
                        failure.get_or_insert(e);
                        None
                    }
                },
                None => None,
            };
            log::debug!("Recomputed text stage");
            self.text.store(key, text);
        }

        let key = (self.text.revision, self.config_revision);
        if !self.chunks.is_fresh(key) {
            let chunks = self
                .text
                .value
                .as_deref()
                .map(|text| self.segmenter.segment(text));
            log::debug!("Recomputed chunks stage");
            self.chunks.store(key, chunks);
        }

        let key = (self.chunks.revision, self.config_revision);
        if !self.utterances.is_fresh(key) {
            let utterances = self
                .chunks
                .value
                .as_deref()
                .map(|chunks| self.builder.build(chunks));
            log::debug!("Recomputed utterances stage");
            self.utterances.store(key, utterances);
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Current options.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// The segmenter in use.
    pub fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }

    /// Whether a document is installed.
    pub fn has_document(&self) -> bool {
        self.document.is_some()
    }

    /// Title of the installed document, if it declares one.
    pub fn title(&self) -> Option<String> {
        self.document.as_ref().and_then(|doc| doc.title())
    }

    /// Pages in page-number order; empty until a document loads.
    pub fn pages(&self) -> &[PageRef] {
        self.pages.value.as_deref().map_or(&[][..], Vec::as_slice)
    }

    /// The aggregated text, if the document loaded.
    pub fn text(&self) -> Option<&str> {
        self.text.value.as_deref().map(String::as_str)
    }

    /// Chunks of the aggregated text.
    pub fn chunks(&self) -> &[Chunk] {
        self.chunks.value.as_deref().map_or(&[][..], Vec::as_slice)
    }

    /// Utterances, one per chunk.
    pub fn utterances(&self) -> &[Utterance] {
        self.utterances.value.as_deref().map_or(&[][..], Vec::as_slice)
    }

    /// Snapshot of pages and utterances for the playback controller.
    pub fn plan(&self) -> PlaybackPlan {
        PlaybackPlan {
            pages: self.pages.value.clone().unwrap_or_default(),
            utterances: self.utterances.value.clone().unwrap_or_default(),
        }
    }

    /// Output revision of every stage.
    pub fn revisions(&self) -> StageRevisions {
        StageRevisions {
            pages: self.pages.revision,
            text: self.text.revision,
            chunks: self.chunks.revision,
            utterances: self.utterances.revision,
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("options", &self.options)
            .field("segmenter", &self.segmenter)
            .field("has_document", &self.document.is_some())
            .field("revisions", &self.revisions())
            .finish()
    }
}
