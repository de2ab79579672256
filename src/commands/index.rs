//! Build-time content indexing

use anyhow::{Context, Result};

use crate::content::{ContentIndexer, IndexOutcome};
use crate::Folio;

/// Index the content directory into the aggregated artifact.
///
/// A missing content directory is not an error.
pub fn run(folio: &Folio) -> Result<IndexOutcome> {
    ContentIndexer::new(folio)
        .run()
        .with_context(|| format!("Failed to index {:?}", folio.content_dir))
}
