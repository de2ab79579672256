//! Index, then serve

use anyhow::Result;

use crate::{server, Folio};

pub struct ServeOptions {
    pub ip: String,
    pub port: u16,
    /// Skip the indexing pass and serve whatever artifact exists
    pub skip_index: bool,
}

impl ServeOptions {
    /// Defaults from the site configuration
    pub fn from_config(folio: &Folio) -> Self {
        Self {
            ip: folio.config.server.ip.clone(),
            port: folio.config.server.port,
            skip_index: false,
        }
    }
}

pub async fn run(folio: Folio, options: ServeOptions) -> Result<()> {
    if !options.skip_index {
        tracing::info!("Indexing content...");
        folio.index()?;
    }

    tracing::info!("Starting server at http://{}:{}", options.ip, options.port);
    server::start(folio, &options.ip, options.port).await
}
