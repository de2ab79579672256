//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use folio::config::SiteConfig;
use folio::Folio;

pub const ALPHA: &str = r#"---
title: "Alpha Diffusion"
publishedAt: "2024-03-01"
summary: "Denoising diffusion for small images"
images:
  - "/images/alpha/1.png"
  - "/images/alpha/2.png"
tag: [ml, diffusion]
team:
  - name: "Sam Lee"
    avatar: "/images/avatar.jpg"
link: "https://example.com/alpha"
---

## Models & Metrics

<TechTable>
  <TechRow label="DDPM" dataset="CIFAR-10" fid="3.17" />
  <TechRow label="GAN" dataset="CIFAR-10" fid="8.7">Mode collapse risk</TechRow>
</TechTable>
"#;

pub const BETA: &str = r#"---
title: Beta
publishedAt: 2023-07-15
---

Body of beta.
"#;

pub const GAMMA: &str = "---\ntitle: Gamma\n---\nGamma body.\n";

/// A site in a temp dir with the given project files
pub fn site(files: &[(&str, &str)]) -> (TempDir, Folio) {
    let dir = TempDir::new().unwrap();
    let folio = Folio::with_config(dir.path().to_path_buf(), SiteConfig::default());
    fs::create_dir_all(&folio.content_dir).unwrap();
    for (name, content) in files {
        fs::write(folio.content_dir.join(name), content).unwrap();
    }
    (dir, folio)
}

/// Standard three-project site
pub fn sample_site() -> (TempDir, Folio) {
    site(&[("alpha.mdx", ALPHA), ("beta.mdx", BETA), ("gamma.mdx", GAMMA)])
}

pub fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
