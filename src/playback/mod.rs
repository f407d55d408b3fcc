//! Playback: the speech engine seam, render-target registry, and the
//! controller that starts and tears down a session.

mod controller;
mod speech;
mod surfaces;

pub use controller::{PlaybackController, SessionState, StartOutcome, StartReport};
pub use speech::SpeechEngine;
pub use surfaces::RenderSurfaces;

pub use crate::source::RenderTarget;
