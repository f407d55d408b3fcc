//! Document collaborator abstraction layer.
//!
//! Provides a trait-based interface for document access, isolating the
//! concrete document library (a PDF renderer, an e-book reader, the
//! in-memory [`memory`] backend) from the playback pipeline. Every fetch is
//! an async operation; the pipeline never assumes when one completes.

pub mod memory;

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{TextItem, Transform, Viewport};

/// Shared reference to a fetched page.
pub type PageRef = Arc<dyn PageProxy>;

/// Opens raw document bytes into a [`DocumentHandle`].
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Open a document. Failures are document-load failures.
    async fn open(&self, data: &[u8]) -> Result<Arc<dyn DocumentHandle>>;
}

/// An opened document.
///
/// Owned by the pipeline for its lifetime and released by dropping it.
#[async_trait]
pub trait DocumentHandle: Send + Sync {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Fetch a page by number (1-indexed).
    async fn get_page(&self, number: u32) -> Result<PageRef>;

    /// Document title, if the document declares one.
    fn title(&self) -> Option<String> {
        None
    }
}

/// One page of an opened document.
#[async_trait]
pub trait PageProxy: Send + Sync {
    /// Page number (1-indexed), unique within the document.
    fn number(&self) -> u32;

    /// Fetch the page's text items in source order.
    async fn text_content(&self) -> Result<Vec<TextItem>>;

    /// The page's logical viewport at `scale`.
    fn viewport(&self, scale: f32) -> Viewport;

    /// Render the page into `request.target`.
    async fn render(&self, request: RenderRequest<'_>) -> Result<()>;
}

/// A surface a page can be rendered into.
///
/// Concrete document backends reach their own surface type through
/// [`RenderTarget::as_any`].
pub trait RenderTarget: Send + Sync {
    /// Whether the target currently has something to draw on.
    fn is_drawable(&self) -> bool {
        true
    }

    /// Downcasting hook for document backends.
    fn as_any(&self) -> &dyn Any;
}

/// Arguments of a single page render.
#[derive(Clone, Copy)]
pub struct RenderRequest<'a> {
    /// Surface to draw into
    pub target: &'a dyn RenderTarget,
    /// Viewport to draw
    pub viewport: Viewport,
    /// Transform applied while drawing
    pub transform: Transform,
}

impl std::fmt::Debug for RenderRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderRequest")
            .field("viewport", &self.viewport)
            .field("transform", &self.transform)
            .finish_non_exhaustive()
    }
}
