//! What the presentation layer should show for a session.

use serde::Serialize;

use crate::model::SurfaceLayout;
use crate::pipeline::Pipeline;
use crate::playback::{PlaybackController, SessionState};

/// The click-to-start control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartAffordance {
    /// Text shown on the control
    pub label: String,
}

/// Snapshot of the presentation layer's inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationState {
    /// Present only while the session is Idle and has something to play
    pub start_affordance: Option<StartAffordance>,

    /// Whether the embedded raw document is shown; hidden until playback starts
    pub document_visible: bool,

    /// One surface per page, in page-number order
    pub surfaces: Vec<SurfaceLayout>,
}

impl PresentationState {
    /// Derive the presentation from a pipeline and its controller.
    pub fn new(pipeline: &Pipeline, controller: &PlaybackController) -> Self {
        let start_affordance = controller
            .can_start(&pipeline.plan())
            .then(|| StartAffordance {
                label: pipeline
                    .title()
                    .unwrap_or_else(|| pipeline.options().start_label.clone()),
            });

        let surfaces = pipeline
            .pages()
            .iter()
            .map(|page| {
                SurfaceLayout::new(
                    page.number(),
                    page.viewport(controller.scale()),
                    controller.device_pixel_ratio(),
                )
            })
            .collect();

        Self {
            start_affordance,
            document_visible: controller.state() == SessionState::Playing,
            surfaces,
        }
    }

    /// Whether the start control should be offered.
    pub fn can_start(&self) -> bool {
        self.start_affordance.is_some()
    }
}
