//! Site configuration (_config.yml)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{FolioError, Result};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub base_url: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,
    /// Aggregated index location, relative to `public_dir`
    pub index_file: String,
    pub content_extensions: Vec<String>,

    // Profile
    pub person: PersonConfig,
    pub social: Vec<SocialLink>,
    pub experiences: Vec<Experience>,

    // Projects
    pub hidden_projects: Vec<String>,
    pub wide_image_slugs: Vec<String>,

    pub render: RenderConfig,
    pub server: ServerConfig,
    pub carousel: CarouselConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            description: String::new(),
            base_url: "http://localhost:3000".to_string(),

            content_dir: "src/app/work/projects".to_string(),
            public_dir: "public".to_string(),
            index_file: "data/posts.json".to_string(),
            content_extensions: vec!["mdx".to_string()],

            person: PersonConfig::default(),
            social: Vec::new(),
            experiences: Vec::new(),

            hidden_projects: Vec::new(),
            wide_image_slugs: Vec::new(),

            render: RenderConfig::default(),
            server: ServerConfig::default(),
            carousel: CarouselConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|source| FolioError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonConfig {
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub avatar: String,
    pub email: String,
    /// Shown as written on the home page
    pub location: String,
    pub languages: Vec<String>,
}

impl PersonConfig {
    pub fn name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLink {
    pub name: String,
    pub icon: String,
    pub link: String,
}

/// One entry of the work experience timeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub company: String,
    pub timeframe: String,
    pub role: String,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

/// Renderer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub theme: ThemeMode,
    /// Viewport width at which tables widen their center columns
    pub wide_viewport_px: u32,
    pub center_widen_factor: f64,
    pub code_theme: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Dark,
            wide_viewport_px: 1200,
            center_widen_factor: 1.1,
            code_theme: "base16-ocean.dark".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    pub interval_ms: u64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self { interval_ms: 3000 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.content_dir, "src/app/work/projects");
        assert_eq!(config.index_file, "data/posts.json");
        assert_eq!(config.render.center_widen_factor, 1.1);
        assert_eq!(config.content_extensions, vec!["mdx"]);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Ketu's Portfolio
person:
  first_name: Ketu
  last_name: Patel
  role: AI/ML Engineer
wide_image_slugs:
  - AI-image-generation
render:
  theme: light
server:
  port: 8080
experiences:
  - company: General Motors
    timeframe: 2018 - 2022
    role: AI/ML Scientist
    achievements:
      - Built telemetry embeddings
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Ketu's Portfolio");
        assert_eq!(config.person.name(), "Ketu Patel");
        assert_eq!(config.wide_image_slugs, vec!["AI-image-generation"]);
        assert_eq!(config.render.theme, ThemeMode::Light);
        assert_eq!(config.render.wide_viewport_px, 1200);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.ip, "127.0.0.1");
        assert_eq!(config.experiences[0].achievements.len(), 1);
    }

    #[test]
    fn test_load_reports_path_on_bad_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "server: [unclosed").unwrap();
        let err = SiteConfig::load(&path).unwrap_err();
        assert!(matches!(err, FolioError::Config { .. }));
    }
}
