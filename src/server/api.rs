//! `GET /api/projects`

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::fs;

use super::SharedState;
use crate::content::{indexer, ProjectIndex};
use crate::error::Result;
use crate::Folio;

/// Response body whenever anything goes wrong
pub const EMPTY_POSTS: &str = r#"{"posts":[]}"#;

#[derive(Debug, Default, Deserialize)]
pub struct ProjectsQuery {
    /// Comma-separated slugs
    pub exclude: Option<String>,
}

/// Split `a, b,,c` into `["a", "b", "c"]`
pub fn parse_exclude(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// JSON body for the projects endpoint.
///
/// A written artifact is checked to parse, then returned byte for byte;
/// `exclude` does not apply to it. Without one the content directory is scanned live and the
/// excluded slugs are dropped.
pub fn projects_payload(folio: &Folio, exclude: &[String]) -> Result<String> {
    if folio.index_path.is_file() {
        if !exclude.is_empty() {
            tracing::debug!("Serving artifact as-is, ignoring exclude={:?}", exclude);
        }
        let raw = fs::read_to_string(&folio.index_path)?;
        // A truncated or hand-edited artifact must not reach clients
        serde_json::from_str::<ProjectIndex>(&raw)?;
        return Ok(raw);
    }

    let index = indexer::scan_dir(&folio.content_dir, &folio.config.content_extensions)?
        .without(exclude);
    Ok(serde_json::to_string(&index)?)
}

/// Always 200; failures degrade to an empty list
pub async fn projects_handler(
    State(state): State<SharedState>,
    query: Option<Query<ProjectsQuery>>,
) -> Response {
    let exclude = parse_exclude(query.as_ref().and_then(|Query(q)| q.exclude.as_deref()));

    let task_state = state.clone();
    let result =
        tokio::task::spawn_blocking(move || projects_payload(&task_state.folio, &exclude)).await;

    let body = match result {
        Ok(Ok(body)) => body,
        Ok(Err(e)) => {
            tracing::warn!("Failed to load projects: {}", e);
            EMPTY_POSTS.to_string()
        }
        Err(e) => {
            tracing::warn!("Project loading task failed: {}", e);
            EMPTY_POSTS.to_string()
        }
    };

    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exclude() {
        assert_eq!(parse_exclude(None), Vec::<String>::new());
        assert_eq!(parse_exclude(Some("")), Vec::<String>::new());
        assert_eq!(parse_exclude(Some("a, b,,c ")), vec!["a", "b", "c"]);
    }
}
