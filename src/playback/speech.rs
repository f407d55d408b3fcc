//! Speech engine collaborator.

use crate::model::Utterance;

/// A speech-synthesis engine with its own sequential playback queue.
///
/// The engine plays enqueued utterances one at a time in submission order.
/// Only the playback controller enqueues and only teardown cancels.
pub trait SpeechEngine: Send + Sync {
    /// Append an utterance to the playback queue. Fire-and-forget.
    fn enqueue(&self, utterance: Utterance);

    /// Discard every queued utterance and stop the one playing, if any.
    fn cancel_all(&self);
}
