mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use common::{sample_site, write};
use folio::config::{Experience, PersonConfig, SiteConfig, SocialLink};
use folio::server::{featured_slides, router, AppState};
use folio::Folio;

async fn get(folio: &Folio, uri: &str) -> (StatusCode, String) {
    let app = router(Arc::new(AppState::new(folio.clone())));
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_project_page_renders_body() {
    let (_dir, folio) = sample_site();
    let (status, html) = get(&folio, "/work/alpha").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<title>Alpha Diffusion | Portfolio</title>"));
    assert!(html.contains(r#"id="models-and-metrics""#));
    assert!(html.contains(">FID ↓<"));
    assert!(html.contains(r#"aria-label="Go to slide 2""#));
    assert!(html.contains("Sam Lee"));
    assert!(html.contains("March 1, 2024"));
}

#[tokio::test]
async fn test_unknown_project_is_404() {
    let (_dir, folio) = sample_site();
    let (status, _) = get(&folio, "/work/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_wide_image_slugs_render_full_bleed() {
    let (dir, _) = sample_site();
    let config = SiteConfig {
        wide_image_slugs: vec!["delta".to_string()],
        ..Default::default()
    };
    let folio = Folio::with_config(dir.path().to_path_buf(), config);
    write(
        &folio.content_dir.join("delta.mdx"),
        "---\ntitle: Delta\n---\n<Image src=\"/d.png\" size=\"80\" />\n",
    );
    write(
        &folio.content_dir.join("eps.mdx"),
        "---\ntitle: Eps\n---\n<Image src=\"/e.png\" size=\"80\" />\n",
    );

    let (_, wide) = get(&folio, "/work/delta").await;
    assert!(wide.contains("width: 80vw"));
    let (_, narrow) = get(&folio, "/work/eps").await;
    assert!(narrow.contains("width: 80%"));
    assert!(!narrow.contains("80vw"));
}

#[tokio::test]
async fn test_work_page_hides_projects() {
    let (dir, _) = sample_site();
    let config = SiteConfig {
        hidden_projects: vec!["beta".to_string()],
        ..Default::default()
    };
    let folio = Folio::with_config(dir.path().to_path_buf(), config);
    let (status, html) = get(&folio, "/work").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"href="/work/alpha""#));
    assert!(!html.contains(r#"href="/work/beta""#));

    let slides = featured_slides(&folio, &folio::content::ContentIndexer::new(&folio).load().unwrap());
    let keys: Vec<_> = slides.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["alpha"]);
}

#[tokio::test]
async fn test_experience_page() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = SiteConfig {
        experiences: vec![Experience {
            company: "Acme".into(),
            timeframe: "2022 - Present".into(),
            role: "ML Engineer".into(),
            achievements: vec!["Shipped models".into()],
        }],
        ..Default::default()
    };
    let folio = Folio::with_config(dir.path().to_path_buf(), config);
    let (status, html) = get(&folio, "/experience").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<h2>Acme</h2>"));
    assert!(html.contains("<li>Shipped models</li>"));
}

#[tokio::test]
async fn test_static_files_are_served() {
    let (_dir, folio) = sample_site();
    write(&folio.public_dir.join("robots.txt"), "User-agent: *\n");
    let (status, body) = get(&folio, "/robots.txt").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "User-agent: *\n");
}

#[tokio::test]
async fn test_work_page_follows_reindex() {
    let (_dir, folio) = sample_site();
    let state = Arc::new(AppState::new(folio.clone()));
    let request = || Request::builder().uri("/work").body(Body::empty()).unwrap();

    let response = router(state.clone()).oneshot(request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.featured.lock().await.len(), 1);

    write(
        &folio.content_dir.join("delta.mdx"),
        "---\ntitle: Delta\npublishedAt: 2025-01-01\nimage: /d.png\n---\n",
    );
    let response = router(state.clone()).oneshot(request()).await.unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();

    let featured = state.featured.lock().await;
    assert_eq!(featured.len(), 2);
    assert_eq!(featured.current().unwrap().key, "alpha");
    assert!(html.contains(r#"aria-label="Go to slide 2""#));
    assert!(html.contains(r#"src="/d.png""#));
}

#[tokio::test]
async fn test_home_page_shows_contact_details() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = SiteConfig {
        base_url: "https://example.com/".into(),
        description: "Building ML systems".into(),
        person: PersonConfig {
            first_name: "Ada".into(),
            last_name: "Lane".into(),
            role: "ML Engineer".into(),
            avatar: "/images/avatar.jpg".into(),
            email: "ada@example.com".into(),
            location: "America/New_York".into(),
            languages: vec!["English".into(), "Hindi".into()],
        },
        social: vec![SocialLink {
            name: "GitHub".into(),
            icon: "github".into(),
            link: "https://github.com/ada".into(),
        }],
        ..Default::default()
    };
    let folio = Folio::with_config(dir.path().to_path_buf(), config);
    let (status, html) = get(&folio, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<h1>Hi, I am Ada Lane</h1>"));
    assert!(html.contains(r#"src="/images/avatar.jpg""#));
    assert!(html.contains(r#"<a href="mailto:ada@example.com">ada@example.com</a>"#));
    assert!(html.contains("<li>America/New_York</li>"));
    assert!(html.contains("<li>English, Hindi</li>"));
    assert!(html.contains(r#"href="https://github.com/ada""#));
    assert!(html.contains(r#"data-icon="github""#));
    assert!(html.contains(r#"<link rel="canonical" href="https://example.com/">"#));
}
