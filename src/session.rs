//! A playback session: one document, one start, one teardown.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::options::PipelineOptions;
use crate::pipeline::Pipeline;
use crate::playback::{
    PlaybackController, RenderSurfaces, RenderTarget, SessionState, SpeechEngine, StartOutcome,
};
use crate::presentation::PresentationState;
use crate::source::DocumentSource;

/// Binds a [`Pipeline`], a [`PlaybackController`] and the page surfaces.
///
/// Dropping the session cancels all speech.
#[derive(Debug)]
pub struct Session {
    pipeline: Pipeline,
    controller: PlaybackController,
    surfaces: RenderSurfaces,
}

impl Session {
    /// Create an idle session with no document.
    pub fn new(engine: Arc<dyn SpeechEngine>, options: PipelineOptions) -> Result<Self> {
        let pipeline = Pipeline::new(options)?;
        Ok(Self::with_pipeline(pipeline, engine))
    }

    /// Create an idle session around an existing pipeline.
    pub fn with_pipeline(pipeline: Pipeline, engine: Arc<dyn SpeechEngine>) -> Self {
        let controller = PlaybackController::new(engine, pipeline.options());
        Self {
            pipeline,
            controller,
            surfaces: RenderSurfaces::new(),
        }
    }

    /// Create a session and load `data` into it.
    pub async fn open(
        source: &dyn DocumentSource,
        data: &[u8],
        engine: Arc<dyn SpeechEngine>,
        options: PipelineOptions,
    ) -> Result<Self> {
        let mut session = Self::new(engine, options)?;
        session.load(source, data).await?;
        Ok(session)
    }

    /// Load a document. Only allowed before the session starts.
    ///
    /// After a failed load the session stays idle with nothing to play.
    pub async fn load(&mut self, source: &dyn DocumentSource, data: &[u8]) -> Result<()> {
        if self.controller.state() != SessionState::Idle {
            return Err(Error::SessionStarted);
        }
        self.pipeline.load(source, data).await
    }

    /// Register the render target mounted for a page.
    pub fn attach_surface(&mut self, page_number: u32, target: Arc<dyn RenderTarget>) {
        if let Some(_previous) = self.surfaces.attach(page_number, target) {
            log::debug!("Replaced surface for page {}", page_number);
        }
    }

    /// Remove the render target of a page.
    pub fn detach_surface(&mut self, page_number: u32) {
        self.surfaces.detach(page_number);
    }

    /// Current presentation snapshot.
    pub fn presentation(&self) -> PresentationState {
        PresentationState::new(&self.pipeline, &self.controller)
    }

    /// Whether the start control should be offered.
    pub fn can_start(&self) -> bool {
        self.controller.can_start(&self.pipeline.plan())
    }

    /// Start playback with the pipeline's current pages and utterances.
    pub async fn start(&mut self) -> StartOutcome {
        let plan = self.pipeline.plan();
        self.controller.start(&plan, &self.surfaces).await
    }

    /// Cancel all speech. The session cannot start afterwards.
    pub fn teardown(&mut self) {
        self.controller.teardown();
    }

    /// Current playback state.
    pub fn state(&self) -> SessionState {
        self.controller.state()
    }

    /// The pipeline.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// The registered surfaces.
    pub fn surfaces(&self) -> &RenderSurfaces {
        &self.surfaces
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Utterance;
    use crate::source::memory::{MemorySource, MemorySurface};
    use futures::executor::block_on;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Queue {
        queued: Mutex<Vec<Utterance>>,
        cancels: Mutex<usize>,
    }

    impl SpeechEngine for Queue {
        fn enqueue(&self, utterance: Utterance) {
            self.queued.lock().unwrap().push(utterance);
        }

        fn cancel_all(&self) {
            self.queued.lock().unwrap().clear();
            *self.cancels.lock().unwrap() += 1;
        }
    }

    fn open(engine: Arc<Queue>, text: &str) -> Session {
        block_on(Session::open(
            &MemorySource::new(),
            text.as_bytes(),
            engine,
            PipelineOptions::default(),
        ))
        .unwrap()
    }

    #[test]
    fn test_start_renders_and_enqueues() {
        let engine = Arc::new(Queue::default());
        let mut session = open(engine.clone(), "第一条。\u{0C}第二条。");
        let surface = Arc::new(MemorySurface::new());
        session.attach_surface(1, surface.clone());

        let outcome = block_on(session.start());
        assert!(outcome.is_started());
        assert_eq!(session.state(), SessionState::Playing);
        assert_eq!(surface.render_count(), 1);
        assert_eq!(engine.queued.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_load_after_start_rejected() {
        let engine = Arc::new(Queue::default());
        let mut session = open(engine, "Hello.");
        block_on(session.start());

        let result = block_on(session.load(&MemorySource::new(), b"Other."));
        assert!(matches!(result, Err(Error::SessionStarted)));
        assert_eq!(session.pipeline().text(), Some("Hello."));
    }

    #[test]
    fn test_attach_and_detach_surface() {
        let mut session = open(Arc::new(Queue::default()), "Hi.");
        session.attach_surface(1, Arc::new(MemorySurface::new()));
        session.attach_surface(1, Arc::new(MemorySurface::new()));
        assert_eq!(session.surfaces().len(), 1);
        session.detach_surface(1);
        assert!(session.surfaces().is_empty());
    }

    #[test]
    fn test_teardown_blocks_start() {
        let engine = Arc::new(Queue::default());
        let mut session = open(engine.clone(), "Hi.");
        session.teardown();

        assert!(!session.can_start());
        assert!(!session.presentation().can_start());
        assert_eq!(block_on(session.start()), StartOutcome::TornDown);
        assert!(engine.queued.lock().unwrap().is_empty());
    }

    #[test]
    fn test_drop_cancels_speech() {
        let engine = Arc::new(Queue::default());
        let mut session = open(engine.clone(), "One. Two.");
        block_on(session.start());
        assert!(!engine.queued.lock().unwrap().is_empty());

        drop(session);
        assert!(engine.queued.lock().unwrap().is_empty());
        assert_eq!(*engine.cancels.lock().unwrap(), 1);
    }
}
