//! Page-level types.

use serde::{Deserialize, Serialize};

/// One raw string reported by a page's text content, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextItem {
    /// Raw text of the item
    pub text: String,
}

impl TextItem {
    /// Create a text item.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl From<&str> for TextItem {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for TextItem {
    fn from(text: String) -> Self {
        Self { text }
    }
}

/// A page's renderable rectangle at a given scale, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Logical width
    pub width: f32,

    /// Logical height
    pub height: f32,

    /// Scale the viewport was computed at
    pub scale: f32,
}

impl Viewport {
    /// Viewport of a page whose unscaled size is `width` x `height`.
    pub fn from_page_size(width: f32, height: f32, scale: f32) -> Self {
        Self {
            width: width * scale,
            height: height * scale,
            scale,
        }
    }

    /// Get viewport dimensions as (width, height) tuple.
    pub fn dimensions(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Check if the viewport is in landscape orientation.
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

/// A 2D affine transform `[a, b, c, d, e, f]` applied when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform(pub [f32; 6]);

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Transform = Transform([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    /// Uniform scaling by the device pixel ratio, so a page drawn at its
    /// logical size fills a backing store of physical pixels.
    pub fn device_pixel(ratio: f32) -> Self {
        Transform([ratio, 0.0, 0.0, ratio, 0.0, 0.0])
    }

    /// Horizontal scale component.
    pub fn scale_x(&self) -> f32 {
        self.0[0]
    }

    /// Vertical scale component.
    pub fn scale_y(&self) -> f32 {
        self.0[3]
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Where and how large the presentation layer should mount a page's
/// render target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceLayout {
    /// 1-indexed page number the surface belongs to
    pub page_number: u32,

    /// Logical (CSS) width, equal to the viewport width
    pub logical_width: f32,

    /// Logical (CSS) height, equal to the viewport height
    pub logical_height: f32,

    /// Backing-store width in physical pixels
    pub physical_width: u32,

    /// Backing-store height in physical pixels
    pub physical_height: u32,
}

impl SurfaceLayout {
    /// Layout for a page viewport on a display with the given pixel ratio.
    ///
    /// Physical sizes are truncated to whole pixels.
    pub fn new(page_number: u32, viewport: Viewport, device_pixel_ratio: f32) -> Self {
        Self {
            page_number,
            logical_width: viewport.width,
            logical_height: viewport.height,
            physical_width: (viewport.width * device_pixel_ratio).max(0.0) as u32,
            physical_height: (viewport.height * device_pixel_ratio).max(0.0) as u32,
        }
    }
}
