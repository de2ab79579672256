//! Front-matter parsing

use serde::{Deserialize, Deserializer, Serialize};

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<ScalarString>()? {
                vec.push(item.0);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// A string field that also accepts numbers, booleans and null
struct ScalarString(String);

impl<'de> Deserialize<'de> for ScalarString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        use std::fmt;

        struct ScalarVisitor;

        impl<'de> Visitor<'de> for ScalarVisitor {
            type Value = ScalarString;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a scalar value")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(ScalarString(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(ScalarString(v))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(ScalarString(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(ScalarString(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(ScalarString(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(ScalarString(v.to_string()))
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(ScalarString(String::new()))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(ScalarString(String::new()))
            }
        }

        deserializer.deserialize_any(ScalarVisitor)
    }
}

fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    ScalarString::deserialize(deserializer).map(|s| s.0)
}

/// Treat an explicit `null` the same as a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A collaborator listed on a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamMember {
    #[serde(deserialize_with = "scalar_string")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub avatar: String,
    #[serde(rename = "linkedIn", skip_serializing_if = "Option::is_none")]
    pub linked_in: Option<String>,
}

/// Recognized project metadata. Every key is always present after parsing,
/// absent keys default to `""` or `[]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectMetadata {
    #[serde(deserialize_with = "scalar_string")]
    pub title: String,
    #[serde(rename = "publishedAt", deserialize_with = "scalar_string")]
    pub published_at: String,
    #[serde(deserialize_with = "scalar_string")]
    pub summary: String,
    #[serde(deserialize_with = "string_or_vec")]
    pub images: Vec<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub image: String,
    #[serde(deserialize_with = "string_or_vec")]
    pub tag: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub team: Vec<TeamMember>,
    #[serde(deserialize_with = "scalar_string")]
    pub link: String,
}

impl ProjectMetadata {
    /// Parse front-matter from content string
    /// Returns (metadata, remaining_content)
    ///
    /// Content without a `---` fenced block has default metadata and is
    /// returned whole. A fenced block that is not valid YAML is an error.
    pub fn parse(content: &str) -> Result<(Self, &str), serde_yaml::Error> {
        let Some((yaml, body)) = split_front_matter(content) else {
            return Ok((Self::default(), content));
        };

        if yaml.trim().is_empty() {
            return Ok((Self::default(), body));
        }

        let metadata: ProjectMetadata = serde_yaml::from_str(yaml)?;
        Ok((metadata, body))
    }

    /// Date used for ordering; unparseable dates sort last
    pub fn published_date(&self) -> Option<chrono::NaiveDate> {
        let s = self.published_at.trim();
        let date_part = s.get(..10).unwrap_or(s);
        chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
    }

    /// Cover image: `image`, else the first of `images`
    pub fn cover(&self) -> Option<&str> {
        Some(self.image.as_str())
            .filter(|i| !i.is_empty())
            .or_else(|| self.images.iter().map(String::as_str).find(|i| !i.is_empty()))
    }
}

/// Split a leading `---` block from the body.
/// Returns None when the content does not open with a front-matter fence
/// or the fence is never closed.
fn split_front_matter(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix('\u{feff}').unwrap_or(content);
    let rest = rest.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    // Empty block: closing fence on the very next line
    if let Some(after) = rest.strip_prefix("---") {
        return Some(("", trim_fence_line(after)));
    }

    let end_pos = rest.find("\n---")?;
    let yaml = &rest[..end_pos];
    let remaining = &rest[end_pos + 4..];
    Some((yaml, trim_fence_line(remaining)))
}

/// Drop the remainder of the closing fence line
fn trim_fence_line(s: &str) -> &str {
    match s.find('\n') {
        Some(pos) if s[..pos].trim().is_empty() => &s[pos + 1..],
        None if s.trim().is_empty() => "",
        _ => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: "Image Generation"
publishedAt: "2024-04-08"
summary: Diffusion models compared
images:
  - /images/projects/gen/cover-01.jpg
  - /images/projects/gen/cover-02.jpg
tag:
  - ml
  - vision
team:
  - name: Ketu Patel
    role: Engineer
    avatar: /images/avatar.jpg
    linkedIn: https://www.linkedin.com/in/ketu-patel/
link: https://github.com/patelketu059
---

## Overview

This is the content.
"#;

        let (fm, remaining) = ProjectMetadata::parse(content).unwrap();
        assert_eq!(fm.title, "Image Generation");
        assert_eq!(fm.published_at, "2024-04-08");
        assert_eq!(fm.images.len(), 2);
        assert_eq!(fm.tag, vec!["ml", "vision"]);
        assert_eq!(fm.team[0].name, "Ketu Patel");
        assert_eq!(fm.team[0].avatar, "/images/avatar.jpg");
        assert_eq!(fm.image, "");
        assert!(remaining.starts_with("\n## Overview"));
        assert!(remaining.contains("This is the content."));
    }

    #[test]
    fn test_missing_keys_default_to_empty() {
        let content = "---\ntitle: Only Title\n---\nBody";
        let (fm, body) = ProjectMetadata::parse(content).unwrap();
        assert_eq!(fm.title, "Only Title");
        assert_eq!(fm.published_at, "");
        assert_eq!(fm.summary, "");
        assert!(fm.images.is_empty());
        assert!(fm.tag.is_empty());
        assert!(fm.team.is_empty());
        assert_eq!(fm.link, "");
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_null_and_scalar_values() {
        let content = "---\ntitle: 2024\nimages:\ntag: solo\nteam:\nlink: ~\n---\n";
        let (fm, body) = ProjectMetadata::parse(content).unwrap();
        assert_eq!(fm.title, "2024");
        assert!(fm.images.is_empty());
        assert_eq!(fm.tag, vec!["solo"]);
        assert!(fm.team.is_empty());
        assert_eq!(fm.link, "");
        assert_eq!(body, "");
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Just a heading\n\ntext";
        let (fm, body) = ProjectMetadata::parse(content).unwrap();
        assert_eq!(fm, ProjectMetadata::default());
        assert_eq!(body, content);
    }

    #[test]
    fn test_empty_frontmatter() {
        let (fm, body) = ProjectMetadata::parse("---\n---\nBody").unwrap();
        assert_eq!(fm, ProjectMetadata::default());
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_malformed_frontmatter_is_error() {
        let content = "---\ntitle: [unclosed\n---\nBody";
        assert!(ProjectMetadata::parse(content).is_err());
    }

    #[test]
    fn test_serialized_key_order() {
        let json = serde_json::to_string(&ProjectMetadata::default()).unwrap();
        assert_eq!(
            json,
            r#"{"title":"","publishedAt":"","summary":"","images":[],"image":"","tag":[],"team":[],"link":""}"#
        );
    }

    #[test]
    fn test_published_date() {
        let fm = ProjectMetadata {
            published_at: "2024-04-08T10:00:00Z".to_string(),
            ..Default::default()
        };
        assert_eq!(
            fm.published_date(),
            chrono::NaiveDate::from_ymd_opt(2024, 4, 8)
        );
        assert_eq!(ProjectMetadata::default().published_date(), None);
    }

    #[test]
    fn test_cover() {
        let mut fm = ProjectMetadata {
            images: vec![String::new(), "/b.png".to_string()],
            ..Default::default()
        };
        assert_eq!(fm.cover(), Some("/b.png"));
        fm.image = "/a.png".to_string();
        assert_eq!(fm.cover(), Some("/a.png"));
        assert_eq!(ProjectMetadata::default().cover(), None);
    }
}
