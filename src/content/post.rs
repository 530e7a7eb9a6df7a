//! Post, author and comment records as returned by the content store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::block::Block;

/// A blog post
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    /// Document id
    #[serde(rename = "_id")]
    pub id: String,

    /// Creation timestamp
    #[serde(rename = "_createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(default, deserialize_with = "nullable")]
    pub title: String,

    #[serde(default, deserialize_with = "nullable")]
    pub description: String,

    /// Hero image
    #[serde(rename = "mainImage", default)]
    pub main_image: Option<ImageRef>,

    #[serde(default)]
    pub author: Option<Author>,

    #[serde(default)]
    pub slug: Option<Slug>,

    /// Rich-text body
    #[serde(default, deserialize_with = "nullable")]
    pub body: Vec<Block>,

    /// Approved comments only
    #[serde(default, deserialize_with = "nullable")]
    pub comments: Vec<Comment>,
}

impl Post {
    pub fn new(id: &str, slug: &str, title: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.to_string(),
            created_at,
            title: title.to_string(),
            description: String::new(),
            main_image: None,
            author: None,
            slug: Some(Slug {
                current: slug.to_string(),
            }),
            body: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// Current slug, if the post has one
    pub fn slug(&self) -> Option<&str> {
        self.slug
            .as_ref()
            .map(|s| s.current.as_str())
            .filter(|s| !s.is_empty())
    }
}

/// Post author, embedded by reference
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Author {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default)]
    pub image: Option<ImageRef>,
}

/// An approved visitor comment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub comment: String,
    #[serde(default, deserialize_with = "nullable")]
    pub approved: bool,
}

impl Comment {
    pub fn new(id: &str, name: &str, comment: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            comment: comment.to_string(),
            approved: true,
        }
    }
}

/// Slug wrapper (`{ current }`)
#[derive(Debug, Clone, Deserialize)]
pub struct Slug {
    #[serde(default, deserialize_with = "nullable")]
    pub current: String,
}

/// An image field pointing at an asset
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageRef {
    #[serde(default)]
    pub asset: Option<AssetRef>,
    #[serde(default)]
    pub alt: Option<String>,
}

/// Asset reference, either unresolved (`_ref`) or expanded (`url`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetRef {
    #[serde(rename = "_ref", default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Treat an explicit `null` like a missing field
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
