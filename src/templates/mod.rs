//! Built-in page templates using the Tera template engine
//!
//! Templates are embedded in the binary; the context structs below are what
//! they read.

use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::comments::{CommentInput, SubmissionState};
use crate::error::Result;
use crate::helpers::truncate;

/// Template renderer with the embedded post templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("post/layout.html")),
            ("post.html", include_str!("post/post.html")),
            ("not_found.html", include_str!("post/not_found.html")),
            ("index.html", include_str!("post/index.html")),
        ])?;

        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 160,
    };

    Ok(tera::Value::String(truncate(&s, length, None)))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub root: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub id: String,
    pub title: String,
    pub description: String,
    pub hero_image: Option<String>,
    pub author: AuthorData,
    pub published_at: String,
    pub published_at_iso: String,
    pub body_html: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorData {
    pub name: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentData {
    pub id: String,
    pub name: String,
    pub comment: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormData {
    pub state: SubmissionState,
    pub action: String,
    pub post_id: String,
    pub values: CommentInput,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostLink {
    pub slug: String,
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_load() {
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn test_truncate_filter() {
        let mut args = HashMap::new();
        args.insert("length".to_string(), tera::Value::from(8));
        let out = truncate_chars_filter(&tera::Value::from("Hello World"), &args).unwrap();
        assert_eq!(out, tera::Value::from("Hello..."));
    }
}
