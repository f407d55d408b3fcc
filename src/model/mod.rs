//! Data model shared by the pipeline stages and the playback controller.
//!
//! Page-side types ([`TextItem`], [`Viewport`], [`Transform`],
//! [`SurfaceLayout`]) describe what a document collaborator reports and
//! consumes. Speech-side types ([`Chunk`], [`Utterance`]) are what the
//! pipeline derives from the aggregated document text.

mod page;
mod utterance;

pub use page::{SurfaceLayout, TextItem, Transform, Viewport};
pub use utterance::{Chunk, SegmentationPolicy, Utterance};
