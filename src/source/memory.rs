//! In-memory document backend.
//!
//! [`MemorySource`] opens UTF-8 plain text, one page per form-feed
//! (`\u{0C}`) separated section and one text item per line. Pages render
//! into [`MemorySurface`], which records every render it receives.

use std::any::Any;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::model::{TextItem, Transform, Viewport};

use super::{DocumentHandle, DocumentSource, PageProxy, PageRef, RenderRequest, RenderTarget};

/// Page separator in plain-text documents.
pub const PAGE_BREAK: char = '\u{0C}';

/// Opens plain UTF-8 text as a [`MemoryDocument`].
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    title: Option<String>,
}

impl MemorySource {
    /// Create a source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Title given to every document this source opens.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

#[async_trait]
impl DocumentSource for MemorySource {
    async fn open(&self, data: &[u8]) -> Result<Arc<dyn DocumentHandle>> {
        let text = std::str::from_utf8(data)
            .map_err(|e| Error::DocumentOpen(format!("document is not valid UTF-8: {e}")))?;
        let mut doc = MemoryDocument::from_text(text);
        doc.title = self.title.clone();
        log::debug!("Opened in-memory document with {} pages", doc.page_count());
        Ok(Arc::new(doc))
    }
}

/// A document held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    title: Option<String>,
    pages: Vec<Arc<MemoryPage>>,
}

impl MemoryDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Split plain text into pages at [`PAGE_BREAK`] and into items at line ends.
    ///
    /// Line terminators stay in the items, so aggregating the document
    /// reproduces `text` without its page breaks.
    pub fn from_text(text: &str) -> Self {
        let mut doc = Self::new();
        if text.is_empty() {
            return doc;
        }

        let mut sections: Vec<&str> = text.split(PAGE_BREAK).collect();
        if sections.len() > 1 && sections.last().is_some_and(|s| s.is_empty()) {
            sections.pop();
        }

        for (index, section) in sections.into_iter().enumerate() {
            let items = section.split_inclusive('\n').map(TextItem::from).collect();
            doc.add_page(MemoryPage::a4(index as u32 + 1).with_items(items));
        }
        doc
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: MemoryPage) {
        self.pages.push(Arc::new(page));
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[async_trait]
impl DocumentHandle for MemoryDocument {
    fn page_count(&self) -> u32 {
        MemoryDocument::page_count(self)
    }

    async fn get_page(&self, number: u32) -> Result<PageRef> {
        if number == 0 {
            return Err(Error::PageOutOfRange(number, self.page_count()));
        }
        self.pages
            .get((number - 1) as usize)
            .map(|page| Arc::clone(page) as PageRef)
            .ok_or(Error::PageOutOfRange(number, self.page_count()))
    }

    fn title(&self) -> Option<String> {
        self.title.clone()
    }
}

/// A single in-memory page.
#[derive(Debug, Clone)]
pub struct MemoryPage {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Text items in source order
    pub items: Vec<TextItem>,
}

impl MemoryPage {
    /// Create a new page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            items: Vec::new(),
        }
    }

    /// Create a new page with standard Letter size (8.5 x 11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Create a new page with standard A4 size (210 x 297 mm).
    pub fn a4(number: u32) -> Self {
        Self::new(number, 595.0, 842.0)
    }

    /// Replace the page's text items.
    pub fn with_items(mut self, items: Vec<TextItem>) -> Self {
        self.items = items;
        self
    }

    /// Append a text item.
    pub fn add_item(&mut self, item: impl Into<TextItem>) {
        self.items.push(item.into());
    }
}

#[async_trait]
impl PageProxy for MemoryPage {
    fn number(&self) -> u32 {
        self.number
    }

    async fn text_content(&self) -> Result<Vec<TextItem>> {
        Ok(self.items.clone())
    }

    fn viewport(&self, scale: f32) -> Viewport {
        Viewport::from_page_size(self.width, self.height, scale)
    }

    async fn render(&self, request: RenderRequest<'_>) -> Result<()> {
        let surface = request
            .target
            .as_any()
            .downcast_ref::<MemorySurface>()
            .ok_or_else(|| Error::Render {
                page: self.number,
                reason: "target is not a MemorySurface".to_string(),
            })?;
        surface.record(RenderRecord {
            page_number: self.number,
            viewport: request.viewport,
            transform: request.transform,
        });
        Ok(())
    }
}

/// One render received by a [`MemorySurface`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderRecord {
    /// Page that was drawn
    pub page_number: u32,
    /// Viewport it was drawn at
    pub viewport: Viewport,
    /// Transform it was drawn with
    pub transform: Transform,
}

/// A render target that keeps a log of what was drawn into it.
#[derive(Debug)]
pub struct MemorySurface {
    drawable: bool,
    renders: Mutex<Vec<RenderRecord>>,
}

impl MemorySurface {
    /// A drawable surface.
    pub fn new() -> Self {
        Self {
            drawable: true,
            renders: Mutex::new(Vec::new()),
        }
    }

    /// A surface with no drawing context.
    pub fn detached() -> Self {
        Self {
            drawable: false,
            renders: Mutex::new(Vec::new()),
        }
    }

    /// Every render received so far, oldest first.
    pub fn renders(&self) -> Vec<RenderRecord> {
        self.renders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of renders received so far.
    pub fn render_count(&self) -> usize {
        self.renders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn record(&self, record: RenderRecord) {
        self.renders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderTarget for MemorySurface {
    fn is_drawable(&self) -> bool {
        self.drawable
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_from_text_pages_and_items() {
        let doc = MemoryDocument::from_text("one\ntwo\u{0C}three");
        assert_eq!(doc.page_count(), 2);
        assert_eq!(
            doc.pages[0].items,
            vec![TextItem::new("one\n"), TextItem::new("two")]
        );
        assert_eq!(doc.pages[1].number, 2);
        assert_eq!(doc.pages[1].items, vec![TextItem::new("three")]);
    }

    #[test]
    fn test_from_text_trailing_page_break() {
        let doc = MemoryDocument::from_text("only\u{0C}");
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn test_from_text_empty() {
        let doc = MemoryDocument::from_text("");
        assert!(doc.is_empty());
    }

    #[test]
    fn test_open_rejects_invalid_utf8() {
        let result = block_on(MemorySource::new().open(&[0xFF, 0xFE, 0x00]));
        assert!(matches!(result, Err(Error::DocumentOpen(_))));
    }

    #[test]
    fn test_open_carries_title() {
        let handle = block_on(MemorySource::new().with_title("Manual").open(b"text")).unwrap();
        assert_eq!(handle.title(), Some("Manual".to_string()));
        assert_eq!(handle.page_count(), 1);
    }

    #[test]
    fn test_get_page_out_of_range() {
        let doc = MemoryDocument::from_text("a\u{0C}b");
        assert!(matches!(
            block_on(doc.get_page(0)),
            Err(Error::PageOutOfRange(0, 2))
        ));
        assert!(matches!(
            block_on(doc.get_page(3)),
            Err(Error::PageOutOfRange(3, 2))
        ));
        assert_eq!(block_on(doc.get_page(2)).unwrap().number(), 2);
    }

    #[test]
    fn test_render_records_into_surface() {
        let page = MemoryPage::letter(1);
        let surface = MemorySurface::new();
        let viewport = page.viewport(2.0);
        block_on(page.render(RenderRequest {
            target: &surface,
            viewport,
            transform: Transform::device_pixel(3.0),
        }))
        .unwrap();

        let renders = surface.renders();
        assert_eq!(renders.len(), 1);
        assert_eq!(renders[0].page_number, 1);
        assert_eq!(renders[0].viewport.dimensions(), (1224.0, 1584.0));
        assert_eq!(renders[0].transform.scale_x(), 3.0);
    }

    #[test]
    fn test_render_rejects_foreign_target() {
        struct Foreign;
        impl RenderTarget for Foreign {
            fn as_any(&self) -> &dyn Any {
                self
            }
        }

        let page = MemoryPage::a4(7);
        let result = block_on(page.render(RenderRequest {
            target: &Foreign,
            viewport: page.viewport(1.0),
            transform: Transform::IDENTITY,
        }));
        assert!(matches!(result, Err(Error::Render { page: 7, .. })));
    }
}
