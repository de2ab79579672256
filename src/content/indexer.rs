//! Content indexer - scans the project directory and writes the aggregated index

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{Document, ProjectIndex, ProjectMetadata};
use crate::error::{FolioError, Result};
use crate::Folio;

/// Result of an indexing run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOutcome {
    /// The content directory does not exist; nothing was written
    NoSource,
    /// The artifact was (re)written
    Written { path: PathBuf, count: usize },
}

/// Builds the aggregated index for a site
pub struct ContentIndexer<'a> {
    folio: &'a Folio,
}

impl<'a> ContentIndexer<'a> {
    pub fn new(folio: &'a Folio) -> Self {
        Self { folio }
    }

    /// Scan the content directory. A missing directory yields an empty index.
    pub fn scan(&self) -> Result<ProjectIndex> {
        scan_dir(
            &self.folio.content_dir,
            &self.folio.config.content_extensions,
        )
    }

    /// The written artifact when present, otherwise a live scan
    pub fn load(&self) -> Result<ProjectIndex> {
        if self.folio.index_path.is_file() {
            ProjectIndex::load(&self.folio.index_path)
        } else {
            self.scan()
        }
    }

    /// Scan and write the artifact, replacing any previous one wholesale
    pub fn run(&self) -> Result<IndexOutcome> {
        if !self.folio.content_dir.is_dir() {
            tracing::info!(
                "Content directory {:?} not found, nothing to index",
                self.folio.content_dir
            );
            return Ok(IndexOutcome::NoSource);
        }

        let index = self.scan()?;
        write_index(&index, &self.folio.index_path)?;

        tracing::info!(
            "Indexed {} projects into {:?}",
            index.len(),
            self.folio.index_path
        );

        Ok(IndexOutcome::Written {
            path: self.folio.index_path.clone(),
            count: index.len(),
        })
    }
}

/// Read every eligible file directly under `dir`, in file name order.
///
/// Any front-matter error aborts the scan.
pub fn scan_dir(dir: &Path, extensions: &[String]) -> Result<ProjectIndex> {
    if !dir.is_dir() {
        return Ok(ProjectIndex::default());
    }

    let mut posts = Vec::new();
    let mut seen = HashSet::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || !has_extension(path, extensions) {
            continue;
        }

        let doc = load_document(path)?;
        if !seen.insert(doc.slug.clone()) {
            return Err(FolioError::DuplicateSlug {
                slug: doc.slug,
                path: path.to_path_buf(),
            });
        }
        tracing::debug!("Indexed {:?} as '{}'", path, doc.slug);
        posts.push(doc);
    }

    Ok(ProjectIndex::new(posts))
}

/// Parse a single source file
pub fn load_document(path: &Path) -> Result<Document> {
    let raw = fs::read_to_string(path)?;
    let (metadata, body) =
        ProjectMetadata::parse(&raw).map_err(|source| FolioError::FrontMatter {
            path: path.to_path_buf(),
            source,
        })?;

    let slug = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    Ok(Document {
        slug,
        metadata,
        content: body.to_string(),
    })
}

/// Write the artifact through a sibling temp file and rename it into place
pub fn write_index(index: &ProjectIndex, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = index.to_json()?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, json)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.iter().any(|x| x == e))
        .unwrap_or(false)
}
