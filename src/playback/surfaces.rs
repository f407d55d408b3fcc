//! Registry of render targets by page number.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::source::RenderTarget;

/// Maps page numbers to the render target mounted for that page.
///
/// Populated by the presentation layer as surfaces mount; read once by the
/// playback controller when the session starts.
#[derive(Clone, Default)]
pub struct RenderSurfaces {
    targets: BTreeMap<u32, Arc<dyn RenderTarget>>,
}

impl RenderSurfaces {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the target for a page, returning the one it replaces.
    pub fn attach(
        &mut self,
        page_number: u32,
        target: Arc<dyn RenderTarget>,
    ) -> Option<Arc<dyn RenderTarget>> {
        self.targets.insert(page_number, target)
    }

    /// Remove the target for a page.
    pub fn detach(&mut self, page_number: u32) -> Option<Arc<dyn RenderTarget>> {
        self.targets.remove(&page_number)
    }

    /// The target for a page.
    pub fn get(&self, page_number: u32) -> Option<&Arc<dyn RenderTarget>> {
        self.targets.get(&page_number)
    }

    /// Page numbers with a target, ascending.
    pub fn page_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.targets.keys().copied()
    }

    /// Number of registered targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Check if no target is registered.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl std::fmt::Debug for RenderSurfaces {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.targets.keys()).finish()
    }
}
