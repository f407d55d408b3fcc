//! The start/cancel lifecycle tying speech to page rendering.

use std::sync::Arc;
use std::task::Poll;

use futures::future::join_all;

use crate::model::Transform;
use crate::options::PipelineOptions;
use crate::pipeline::PlaybackPlan;
use crate::source::{PageRef, RenderRequest};

use super::{RenderSurfaces, SpeechEngine};

/// Playback state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Not started yet
    #[default]
    Idle,
    /// Started; terminal for the session
    Playing,
}

/// What a call to [`PlaybackController::start`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The session moved from Idle to Playing.
    Started(StartReport),
    /// The session was already Playing; nothing happened.
    AlreadyStarted,
    /// There are no pages or no utterances; nothing happened.
    Unavailable,
    /// The controller was torn down; nothing happened.
    TornDown,
}

impl StartOutcome {
    /// Whether this call performed the Idle to Playing transition.
    pub fn is_started(&self) -> bool {
        matches!(self, StartOutcome::Started(_))
    }
}

/// Work done by a successful start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StartReport {
    /// Pages drawn into their surface
    pub pages_rendered: usize,
    /// Pages without a usable surface or whose render failed
    pub pages_skipped: usize,
    /// Utterances handed to the speech engine
    pub utterances_enqueued: usize,
}

/// Drives the Idle to Playing transition and teardown.
///
/// Dropping a controller that was not torn down tears it down.
pub struct PlaybackController {
    engine: Arc<dyn SpeechEngine>,
    scale: f32,
    device_pixel_ratio: f32,
    state: SessionState,
    torn_down: bool,
}

impl PlaybackController {
    /// Create an idle controller speaking through `engine`.
    pub fn new(engine: Arc<dyn SpeechEngine>, options: &PipelineOptions) -> Self {
        Self {
            engine,
            scale: options.scale,
            device_pixel_ratio: options.device_pixel_ratio,
            state: SessionState::Idle,
            torn_down: false,
        }
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether teardown has run.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Render scale.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Device pixel ratio applied when rendering.
    pub fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    /// Whether starting `plan` would do anything; the start affordance is
    /// offered only when this holds.
    pub fn can_start(&self, plan: &PlaybackPlan) -> bool {
        !self.torn_down && self.state == SessionState::Idle && plan.is_playable()
    }

    /// Move from Idle to Playing: request a render of every page, then
    /// enqueue every utterance.
    ///
    /// Happens at most once per controller. Render requests are issued in
    /// page-number order into the surface registered for each page, and
    /// speech is enqueued without waiting for any render to finish. A page
    /// without a drawable surface, or whose render fails, is skipped. The
    /// returned future resolves once every render has settled; dropping it
    /// earlier leaves the speech queued.
    pub async fn start(&mut self, plan: &PlaybackPlan, surfaces: &RenderSurfaces) -> StartOutcome {
        if self.torn_down {
            return StartOutcome::TornDown;
        }
        if self.state == SessionState::Playing {
            log::debug!("Start ignored: session already playing");
            return StartOutcome::AlreadyStarted;
        }
        if !plan.is_playable() {
            log::debug!("Start ignored: nothing to play ({:?})", plan);
            return StartOutcome::Unavailable;
        }

        self.state = SessionState::Playing;
        log::info!(
            "Starting playback: {} pages, {} utterances",
            plan.pages.len(),
            plan.utterances.len()
        );

        let scale = self.scale;
        let transform = Transform::device_pixel(self.device_pixel_ratio);
        let mut renders = Box::pin(join_all(
            plan.pages
                .iter()
                .map(|page| render_page(page, surfaces, scale, transform)),
        ));
        // The first poll issues every request, in page order.
        let issued = futures::poll!(renders.as_mut());

        let mut report = StartReport::default();
        for utterance in plan.utterances.iter() {
            self.engine.enqueue(utterance.clone());
            report.utterances_enqueued += 1;
        }

        let rendered = match issued {
            Poll::Ready(rendered) => rendered,
            Poll::Pending => renders.await,
        };
        for ok in rendered {
            if ok {
                report.pages_rendered += 1;
            } else {
                report.pages_skipped += 1;
            }
        }

        StartOutcome::Started(report)
    }

    /// Cancel all queued and playing speech.
    ///
    /// Runs once; later calls do nothing.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.engine.cancel_all();
        log::info!("Playback torn down ({:?})", self.state);
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("scale", &self.scale)
            .field("device_pixel_ratio", &self.device_pixel_ratio)
            .field("state", &self.state)
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

async fn render_page(
    page: &PageRef,
    surfaces: &RenderSurfaces,
    scale: f32,
    transform: Transform,
) -> bool {
    let number = page.number();
    let target = match surfaces.get(number) {
        Some(target) if target.is_drawable() => target,
        Some(_) => {
            log::warn!("Skipping page {}: surface is not drawable", number);
            return false;
        }
        None => {
            log::warn!("Skipping page {}: no surface attached", number);
            return false;
        }
    };

    let request = RenderRequest {
        target: &**target,
        viewport: page.viewport(scale),
        transform,
    };
    match page.render(request).await {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Skipping page {}: {}", number, e);
            false
        }
    }
}
