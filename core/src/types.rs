//! Domain DTOs for the blog API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates.
//!
//! Categories are carried as typed tags, but anything the user typed that is
//! not one of the known tags survives as `BlogCategory::Other` so the create
//! payload passes it through unchanged.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A category tag attached to a blog post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlogCategory {
    Finance,
    Tech,
    Career,
    Education,
    Regulations,
    Lifestyle,
    /// A tag outside the known set, kept verbatim.
    Other(String),
}

impl BlogCategory {
    pub const KNOWN: [BlogCategory; 6] = [
        BlogCategory::Finance,
        BlogCategory::Tech,
        BlogCategory::Career,
        BlogCategory::Education,
        BlogCategory::Regulations,
        BlogCategory::Lifestyle,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            BlogCategory::Finance => "FINANCE",
            BlogCategory::Tech => "TECH",
            BlogCategory::Career => "CAREER",
            BlogCategory::Education => "EDUCATION",
            BlogCategory::Regulations => "REGULATIONS",
            BlogCategory::Lifestyle => "LIFESTYLE",
            BlogCategory::Other(tag) => tag,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, BlogCategory::Other(_))
    }
}

impl From<&str> for BlogCategory {
    fn from(tag: &str) -> Self {
        match tag {
            "FINANCE" => BlogCategory::Finance,
            "TECH" => BlogCategory::Tech,
            "CAREER" => BlogCategory::Career,
            "EDUCATION" => BlogCategory::Education,
            "REGULATIONS" => BlogCategory::Regulations,
            "LIFESTYLE" => BlogCategory::Lifestyle,
            other => BlogCategory::Other(other.to_string()),
        }
    }
}

impl From<String> for BlogCategory {
    fn from(tag: String) -> Self {
        match BlogCategory::from(tag.as_str()) {
            BlogCategory::Other(_) => BlogCategory::Other(tag),
            known => known,
        }
    }
}

impl From<BlogCategory> for String {
    fn from(category: BlogCategory) -> Self {
        match category {
            BlogCategory::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for BlogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single blog post returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    /// Never empty.
    #[serde(deserialize_with = "deserialize_categories")]
    pub category: Vec<BlogCategory>,
    pub description: String,
    /// ISO-8601 timestamp, kept as the server sent it.
    pub date: String,
    #[serde(default)]
    pub cover_image: String,
    pub content: String,
}

/// Request payload for creating a new blog: every `Blog` field except `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlog {
    pub title: String,
    pub category: Vec<BlogCategory>,
    pub description: String,
    pub date: String,
    pub cover_image: String,
    pub content: String,
}

impl CreateBlog {
    /// Attach a server-assigned id, producing the stored representation.
    pub fn into_blog(self, id: impl Into<String>) -> Blog {
        Blog {
            id: id.into(),
            title: self.title,
            category: self.category,
            description: self.description,
            date: self.date,
            cover_image: self.cover_image,
            content: self.content,
        }
    }
}

/// Join category tags for display, e.g. `FINANCE • TECH`.
pub fn join_categories(categories: &[BlogCategory]) -> String {
    categories
        .iter()
        .map(BlogCategory::as_str)
        .collect::<Vec<_>>()
        .join(" • ")
}

/// Accept string ids, and integer ids from servers that number their rows.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

fn deserialize_categories<'de, D>(deserializer: D) -> Result<Vec<BlogCategory>, D::Error>
where
    D: Deserializer<'de>,
{
    let categories = Vec::<BlogCategory>::deserialize(deserializer)?;
    if categories.is_empty() {
        return Err(serde::de::Error::invalid_length(0, &"at least one category"));
    }
    Ok(categories)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOG_JSON: &str = r#"{
        "id": "1",
        "title": "Future of Fintech",
        "category": ["FINANCE", "TECH"],
        "description": "Where payments are heading",
        "date": "2026-01-11T09:12:45.120Z",
        "coverImage": "https://images.pexels.com/photos/1.jpeg",
        "content": "Line one.\n\nLine two."
    }"#;

    #[test]
    fn blog_decodes_camel_case_fields() {
        let blog: Blog = serde_json::from_str(BLOG_JSON).unwrap();
        assert_eq!(blog.id, "1");
        assert_eq!(blog.category, vec![BlogCategory::Finance, BlogCategory::Tech]);
        assert_eq!(blog.cover_image, "https://images.pexels.com/photos/1.jpeg");
        assert_eq!(blog.content, "Line one.\n\nLine two.");
    }

    #[test]
    fn numeric_id_is_accepted_as_string() {
        let json = BLOG_JSON.replace(r#""id": "1""#, r#""id": 42"#);
        let blog: Blog = serde_json::from_str(&json).unwrap();
        assert_eq!(blog.id, "42");
    }

    #[test]
    fn missing_cover_image_defaults_to_empty() {
        let json = r#"{"id":"a","title":"t","category":["TECH"],"description":"d","date":"x","content":"c"}"#;
        let blog: Blog = serde_json::from_str(json).unwrap();
        assert!(blog.cover_image.is_empty());
    }

    #[test]
    fn missing_title_is_rejected() {
        let json = r#"{"id":"a","category":["TECH"],"description":"d","date":"x","content":"c"}"#;
        assert!(serde_json::from_str::<Blog>(json).is_err());
    }

    #[test]
    fn empty_category_list_is_rejected() {
        let json = BLOG_JSON.replace(r#"["FINANCE", "TECH"]"#, "[]");
        let err = serde_json::from_str::<Blog>(&json).unwrap_err();
        assert!(err.to_string().contains("at least one category"), "{err}");
    }

    #[test]
    fn unknown_category_is_preserved_verbatim() {
        let category: BlogCategory = serde_json::from_str(r#""finance""#).unwrap();
        assert_eq!(category, BlogCategory::Other("finance".to_string()));
        assert!(!category.is_known());
        assert_eq!(serde_json::to_string(&category).unwrap(), r#""finance""#);
    }

    #[test]
    fn create_payload_serializes_without_id() {
        let payload = CreateBlog {
            title: "Title".to_string(),
            category: vec![BlogCategory::Career],
            description: "Desc".to_string(),
            date: "2026-01-11T09:12:45.120Z".to_string(),
            cover_image: String::new(),
            content: "Body".to_string(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["category"], serde_json::json!(["CAREER"]));
        assert_eq!(json["coverImage"], "");
    }

    #[test]
    fn categories_join_with_bullet() {
        let joined = join_categories(&[BlogCategory::Finance, BlogCategory::from("custom")]);
        assert_eq!(joined, "FINANCE • custom");
    }
}
