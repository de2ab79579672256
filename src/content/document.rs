//! Project documents and the aggregated index

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::ProjectMetadata;
use crate::error::Result;

/// A project write-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Filename without extension
    pub slug: String,
    pub metadata: ProjectMetadata,
    /// Raw MDX body, rendered on demand
    pub content: String,
}

/// The aggregated `{ "posts": [...] }` artifact
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectIndex {
    pub posts: Vec<Document>,
}

impl ProjectIndex {
    pub fn new(posts: Vec<Document>) -> Self {
        Self { posts }
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn find(&self, slug: &str) -> Option<&Document> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    /// Drop every document whose slug is in `exclude`
    pub fn without(self, exclude: &[String]) -> Self {
        if exclude.is_empty() {
            return self;
        }
        let posts = self
            .posts
            .into_iter()
            .filter(|p| !exclude.iter().any(|e| e == &p.slug))
            .collect();
        Self { posts }
    }

    /// Documents newest first; undated documents keep their relative order at the end
    pub fn sorted_by_date(&self) -> Vec<&Document> {
        let mut sorted: Vec<_> = self.posts.iter().collect();
        sorted.sort_by(|a, b| {
            match (a.metadata.published_date(), b.metadata.published_date()) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
        });
        sorted
    }

    /// Pretty JSON with two-space indentation
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a previously written artifact
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
