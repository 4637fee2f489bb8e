// src/progress.rs
/// Lightweight progress reporting used by long-running operations
/// (cleaning, photo fetching, packaging). Frontends implement this to
/// surface status to users.
pub trait Progress {
    /// Called at the start with the total number of items (if known).
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one article made it onto a card with its photo.
    fn item_done(&mut self, _code: &str) {}

    /// Called when an article's photo could not be found.
    fn item_missed(&mut self, _code: &str, _reason: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
