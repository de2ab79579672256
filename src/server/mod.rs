//! HTTP server: project API, project pages and static assets

pub mod api;
pub mod pages;

use anyhow::Result;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::carousel::{Carousel, CarouselTicker, Slide};
use crate::content::{ContentIndexer, ProjectIndex};
use crate::render::Renderer;
use crate::Folio;

/// Shared server state
pub struct AppState {
    pub folio: Folio,
    pub renderer: Renderer,
    /// Project covers rotating on the work page. The slides are refreshed
    /// from the index on every `/work` request. No route pauses it; the
    /// pause flag is for embedders driving the carousel directly.
    pub featured: Arc<Mutex<Carousel>>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(folio: Folio) -> Self {
        let renderer = Renderer::new(&folio.config.render);
        Self {
            folio,
            renderer,
            featured: Arc::new(Mutex::new(Carousel::default())),
        }
    }

    /// Replace the featured slides with the covers of visible projects
    pub async fn refresh_featured(&self, index: &ProjectIndex) {
        let slides = featured_slides(&self.folio, index);
        tracing::debug!("Featuring {} project covers", slides.len());
        *self.featured.lock().await = Carousel::new(slides);
    }
}

/// One slide per visible project that has a cover image, newest first
pub fn featured_slides(folio: &Folio, index: &ProjectIndex) -> Vec<Slide> {
    index
        .sorted_by_date()
        .into_iter()
        .filter(|doc| !folio.config.hidden_projects.contains(&doc.slug))
        .filter_map(|doc| {
            let cover = doc.metadata.cover()?;
            let mut slide = Slide::image(cover, &doc.metadata.title);
            slide.key = doc.slug.clone();
            Some(slide)
        })
        .collect()
}

/// All routes over the given state
pub fn router(state: SharedState) -> Router {
    let assets = ServeDir::new(&state.folio.public_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/", get(pages::home_handler))
        .route("/api/projects", get(api::projects_handler))
        .route("/api/rss", get(pages::rss_handler))
        .route("/experience", get(pages::experience_handler))
        .route("/experience-legacy", get(pages::legacy_experience_handler))
        .route("/work", get(pages::work_handler))
        .route("/work/:slug", get(pages::project_handler))
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server and run until it fails
pub async fn start(folio: Folio, ip: &str, port: u16) -> Result<()> {
    let period = Duration::from_millis(folio.config.carousel.interval_ms.max(1));
    let state = Arc::new(AppState::new(folio));

    match ContentIndexer::new(&state.folio).load() {
        Ok(index) => state.refresh_featured(&index).await,
        Err(e) => tracing::warn!("Could not load projects for the work page: {}", e),
    }
    // Rotation stops when the server future ends
    let _ticker = CarouselTicker::spawn(state.featured.clone(), period);

    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
