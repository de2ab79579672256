//! Content module - project documents, front-matter and the aggregated index

mod document;
mod frontmatter;
pub mod indexer;

pub use document::{Document, ProjectIndex};
pub use frontmatter::{ProjectMetadata, TeamMember};
pub use indexer::{ContentIndexer, IndexOutcome};
