//! Remove the aggregated index

use anyhow::Result;
use std::fs;

use crate::Folio;

/// Delete the artifact so the API falls back to live scanning
pub fn run(folio: &Folio) -> Result<()> {
    if folio.index_path.exists() {
        fs::remove_file(&folio.index_path)?;
        tracing::info!("Deleted: {:?}", folio.index_path);
    } else {
        tracing::debug!("Nothing to clean at {:?}", folio.index_path);
    }

    Ok(())
}
