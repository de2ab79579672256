//! List indexed projects

use anyhow::Result;

use crate::content::{ContentIndexer, ProjectIndex};
use crate::Folio;

/// One line per project, newest first
pub fn format_listing(index: &ProjectIndex) -> Vec<String> {
    index
        .sorted_by_date()
        .into_iter()
        .map(|doc| {
            let date = doc
                .metadata
                .published_date()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "----------".to_string());
            format!("  {} - {} [{}]", date, doc.metadata.title, doc.slug)
        })
        .collect()
}

pub fn run(folio: &Folio) -> Result<()> {
    let index = ContentIndexer::new(folio).load()?;
    println!("Projects ({}):", index.len());
    for line in format_listing(&index) {
        println!("{}", line);
    }
    Ok(())
}
