//! Server-rendered pages and retired routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use super::{featured_slides, AppState, SharedState};
use crate::carousel::{Carousel, Slide};
use crate::content::{ContentIndexer, Document};
use crate::error::FolioError;
use crate::render::node::{escape_html, to_html};
use crate::render::{Element, Node, RenderContext};
use crate::Folio;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Client viewport width in CSS pixels
    pub vw: Option<u32>,
}

/// The RSS feed is retired
pub async fn rss_handler() -> StatusCode {
    StatusCode::NOT_FOUND
}

pub async fn legacy_experience_handler() -> Redirect {
    Redirect::temporary("/experience")
}

/// Full HTML document around rendered nodes. `path` is joined to
/// `base_url` for the canonical link.
fn page(folio: &Folio, path: &str, title: &str, description: &str, body: Vec<Node>) -> String {
    let full_title = if title.is_empty() {
        folio.config.title.clone()
    } else {
        format!("{} | {}", title, folio.config.title)
    };
    let canonical = format!("{}{}", folio.config.base_url.trim_end_matches('/'), path);
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{}</title><meta name=\"description\" content=\"{}\">\
         <link rel=\"canonical\" href=\"{}\"></head>\
         <body><main style=\"max-width:var(--responsive-width-l, 960px);margin:0 auto;padding:24px\">{}</main></body></html>",
        escape_html(&full_title),
        escape_html(description),
        escape_html(&canonical),
        to_html(&body)
    )
}

fn not_found(folio: &Folio, path: &str, message: &str) -> Response {
    let body = vec![Element::new("h1").text(message).into()];
    (
        StatusCode::NOT_FOUND,
        Html(page(folio, path, "Not found", "", body)),
    )
        .into_response()
}

/// `/work/:slug`
pub async fn project_handler(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
    query: Option<Query<PageQuery>>,
) -> Response {
    let vw = query.and_then(|Query(q)| q.vw);
    let path = format!("/work/{}", slug);

    let task_state = state.clone();
    let result = tokio::task::spawn_blocking(move || {
        let index = ContentIndexer::new(&task_state.folio).load()?;
        Ok::<_, FolioError>(
            index
                .find(&slug)
                .map(|doc| render_project(&task_state, doc, vw)),
        )
    })
    .await;

    match result {
        Ok(Ok(Some(html))) => Html(html).into_response(),
        Ok(Ok(None)) => not_found(&state.folio, &path, "Project not found"),
        Ok(Err(e)) => {
            tracing::warn!("Failed to load projects: {}", e);
            not_found(&state.folio, &path, "Project not found")
        }
        Err(e) => {
            tracing::warn!("Project page task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

/// Project page: header, image carousel, rendered body, team and link
pub fn render_project(state: &AppState, doc: &Document, vw: Option<u32>) -> String {
    let folio = &state.folio;
    let config = &folio.config.render;
    let meta = &doc.metadata;

    let ctx = RenderContext::new(config)
        .with_viewport(config, vw)
        .with_full_bleed_images(folio.config.wide_image_slugs.contains(&doc.slug));

    let mut body: Vec<Node> = vec![Element::new("h1").text(meta.title.as_str()).into()];
    if let Some(date) = meta.published_date() {
        body.push(
            Element::new("p")
                .attr("class", "published")
                .style("opacity", "0.7")
                .text(date.format("%B %-d, %Y").to_string())
                .into(),
        );
    }
    if !meta.summary.is_empty() {
        body.push(
            Element::new("p")
                .attr("class", "summary")
                .text(meta.summary.as_str())
                .into(),
        );
    }

    let slides = meta
        .images
        .iter()
        .filter(|src| !src.is_empty())
        .map(|src| Slide::image(src, &meta.title))
        .collect();
    body.extend(Carousel::new(slides).render());

    body.push(Node::Raw(state.renderer.render_html(&doc.content, &ctx)));

    if !meta.team.is_empty() {
        let members = meta.team.iter().map(|m| {
            let mut item = Element::new("li");
            if !m.avatar.is_empty() {
                item = item.child(
                    Element::new("img")
                        .attr("src", m.avatar.as_str())
                        .attr("alt", m.name.as_str())
                        .style("width", "24px")
                        .style("height", "24px")
                        .style("border-radius", "50%"),
                );
            }
            let name = match &m.linked_in {
                Some(url) if !url.is_empty() => Node::from(
                    Element::new("a")
                        .attr("href", url.as_str())
                        .attr("target", "_blank")
                        .attr("rel", "noopener noreferrer")
                        .text(m.name.as_str()),
                ),
                _ => Node::Text(m.name.clone()),
            };
            item = item.child(name);
            if let Some(role) = m.role.as_deref().filter(|r| !r.is_empty()) {
                item = item.text(format!(" ({})", role));
            }
            Node::from(item)
        });
        body.push(
            Element::new("ul")
                .attr("class", "team")
                .children(members)
                .into(),
        );
    }

    if !meta.link.is_empty() {
        body.push(
            Element::new("a")
                .attr("class", "project-link")
                .attr("href", meta.link.as_str())
                .attr("target", "_blank")
                .attr("rel", "noopener noreferrer")
                .text("View project")
                .into(),
        );
    }

    let path = format!("/work/{}", doc.slug);
    page(folio, &path, &meta.title, &meta.summary, body)
}

/// `/work`: rotating covers and the project list, newest first
pub async fn work_handler(State(state): State<SharedState>) -> Response {
    let task_state = state.clone();
    let loaded = match tokio::task::spawn_blocking(move || {
        ContentIndexer::new(&task_state.folio).load()
    })
    .await
    {
        Ok(Ok(index)) => Some(index),
        Ok(Err(e)) => {
            tracing::warn!("Failed to load projects: {}", e);
            None
        }
        Err(e) => {
            tracing::warn!("Project list task failed: {}", e);
            None
        }
    };

    let folio = &state.folio;
    let mut body: Vec<Node> = vec![Element::new("h1").text("Projects").into()];
    {
        // Follow re-indexing without restarting the ticker
        let mut featured = state.featured.lock().await;
        if let Some(index) = &loaded {
            if featured.set_slides(featured_slides(folio, index)) {
                tracing::debug!("Featured carousel now has {} slides", featured.len());
            }
        }
        body.extend(featured.render());
    }

    let index = loaded.unwrap_or_default();
    let cards = index
        .sorted_by_date()
        .into_iter()
        .filter(|doc| !folio.config.hidden_projects.contains(&doc.slug))
        .map(|doc| {
            Node::from(
                Element::new("li").child(
                    Element::new("a")
                        .attr("href", format!("/work/{}", doc.slug))
                        .text(doc.metadata.title.as_str()),
                ),
            )
        });
    body.push(
        Element::new("ul")
            .attr("class", "projects")
            .children(cards)
            .into(),
    );

    Html(page(folio, "/work", "Work", &folio.config.description, body)).into_response()
}

/// `/experience`: the timeline from the site configuration
pub async fn experience_handler(State(state): State<SharedState>) -> Html<String> {
    let folio = &state.folio;
    let mut body: Vec<Node> = vec![Element::new("h1").text("Experience").into()];

    for exp in &folio.config.experiences {
        let achievements = exp
            .achievements
            .iter()
            .map(|a| Node::from(Element::new("li").text(a.as_str())));
        body.push(
            Element::new("section")
                .attr("class", "experience")
                .style("margin-bottom", "32px")
                .child(Element::new("h2").text(exp.company.as_str()))
                .child(
                    Element::new("p")
                        .style("opacity", "0.7")
                        .text(exp.timeframe.as_str()),
                )
                .child(Element::new("p").text(exp.role.as_str()))
                .child(Element::new("ul").children(achievements))
                .into(),
        );
    }

    let person = folio.config.person.name();
    Html(page(folio, "/experience", "Experience", &person, body))
}

/// `/`: introduction, contact details and social links
pub async fn home_handler(State(state): State<SharedState>) -> Html<String> {
    let folio = &state.folio;
    let person = &folio.config.person;
    let name = person.name();

    let mut body: Vec<Node> = Vec::new();
    if !person.role.is_empty() {
        body.push(
            Element::new("p")
                .attr("class", "role")
                .style("opacity", "0.7")
                .text(person.role.as_str())
                .into(),
        );
    }
    let greeting = if name.is_empty() {
        folio.config.title.clone()
    } else {
        format!("Hi, I am {}", name)
    };
    body.push(Element::new("h1").text(greeting).into());

    let mut about = Element::new("section").attr("id", "about");
    if !person.avatar.is_empty() {
        about = about.child(
            Element::new("img")
                .attr("src", person.avatar.as_str())
                .attr("alt", name.as_str())
                .style("width", "100%")
                .style("max-width", "360px")
                .style("border-radius", "8px"),
        );
    }
    if !folio.config.description.is_empty() {
        about = about.child(Element::new("p").text(folio.config.description.as_str()));
    }
    body.push(about.into());

    let mut contact = Element::new("ul").attr("class", "contact");
    if !person.email.is_empty() {
        contact = contact.child(
            Element::new("li").child(
                Element::new("a")
                    .attr("href", format!("mailto:{}", person.email))
                    .text(person.email.as_str()),
            ),
        );
    }
    if !person.location.is_empty() {
        contact = contact.child(Element::new("li").text(person.location.as_str()));
    }
    if !person.languages.is_empty() {
        contact = contact.child(Element::new("li").text(person.languages.join(", ")));
    }
    for social in folio.config.social.iter().filter(|s| !s.link.is_empty()) {
        let label = if social.name.is_empty() {
            social.link.as_str()
        } else {
            social.name.as_str()
        };
        let mut link = Element::new("a")
            .attr("href", social.link.as_str())
            .attr("target", "_blank")
            .attr("rel", "noopener noreferrer");
        if !social.icon.is_empty() {
            link = link.attr("data-icon", social.icon.as_str());
        }
        contact = contact.child(Element::new("li").child(link.text(label)));
    }
    body.push(contact.into());

    Html(page(folio, "/", "", &folio.config.description, body))
}
