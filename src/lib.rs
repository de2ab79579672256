//! folio: portfolio content indexer, project delivery API and MDX renderer
//!
//! Project write-ups live as front-matter documents in a content directory.
//! The indexer aggregates them into a JSON artifact under the public
//! directory, the server delivers that artifact through `/api/projects`, and
//! the renderer turns each project body into styled HTML.

pub mod carousel;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod render;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The main application: configuration plus resolved paths
#[derive(Debug, Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Project source documents
    pub content_dir: PathBuf,
    /// Served-assets root
    pub public_dir: PathBuf,
    /// Aggregated index artifact
    pub index_path: PathBuf,
}

impl Folio {
    /// Create a new instance from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Build from an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let index_path = public_dir.join(&config.index_file);

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
            index_path,
        }
    }

    /// Rebuild the aggregated index
    pub fn index(&self) -> Result<content::IndexOutcome> {
        commands::index::run(self)
    }

    /// Remove the aggregated index
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
