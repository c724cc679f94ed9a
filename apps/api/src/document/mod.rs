// Text extraction: uploaded resume bytes → plain text.
// pdf-extract parsing is CPU-bound and must run inside tokio::task::spawn_blocking.

pub mod extract;

pub use extract::{extract_document, ExtractedDocument};
