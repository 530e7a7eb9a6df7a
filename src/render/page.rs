//! Full page composition: header, hero, body, byline, form and comments

use tera::Context;

use crate::comments::CommentForm;
use crate::config::{RendererConfig, SiteConfig};
use crate::content::Post;
use crate::error::Result;
use crate::helpers::{date_xml, encode_segment, full_url_for, post_path, published_at, url_for};
use crate::image::ImageUrlBuilder;
use crate::templates::{
    AuthorData, CommentData, FormData, PostData, PostLink, SiteData, TemplateRenderer,
};

use super::highlight::CodeHighlighter;
use super::portable_text::PortableTextRenderer;

const HERO_WIDTH: u32 = 2000;
const AVATAR_WIDTH: u32 = 80;

/// Renders post pages with the embedded templates
pub struct PageRenderer {
    site: SiteConfig,
    renderer_config: RendererConfig,
    images: ImageUrlBuilder,
    highlighter: CodeHighlighter,
    templates: TemplateRenderer,
}

impl PageRenderer {
    pub fn new(site: SiteConfig, renderer_config: RendererConfig) -> Result<Self> {
        Ok(Self {
            images: renderer_config.image_urls(),
            highlighter: CodeHighlighter::new(&site.highlight_theme),
            templates: TemplateRenderer::new()?,
            site,
            renderer_config,
        })
    }

    /// Render a post with the comment form in the given state
    pub fn render_post(&self, post: &Post, form: &CommentForm) -> Result<String> {
        let body_html =
            PortableTextRenderer::new(&self.renderer_config, &self.highlighter).render(&post.body);

        let author = post.author.clone().unwrap_or_default();
        let post_data = PostData {
            id: post.id.clone(),
            title: post.title.clone(),
            description: post.description.clone(),
            hero_image: post
                .main_image
                .as_ref()
                .and_then(|img| self.images.url_with_width(img, HERO_WIDTH)),
            author: AuthorData {
                name: author.name,
                image: author
                    .image
                    .as_ref()
                    .and_then(|img| self.images.url_with_width(img, AVATAR_WIDTH)),
            },
            published_at: published_at(&post.created_at, self.site.tz(), &self.site.date_format),
            published_at_iso: date_xml(&post.created_at),
            body_html,
        };

        let comments: Vec<CommentData> = post
            .comments
            .iter()
            .map(|c| CommentData {
                id: c.id.clone(),
                name: c.name.clone(),
                comment: c.comment.clone(),
            })
            .collect();

        let form_data = FormData {
            state: form.state(),
            action: post.slug().map(|s| post_path(&self.site, s)).unwrap_or_default(),
            post_id: form.post_id().to_string(),
            values: form.values().clone(),
            errors: form.errors().iter().map(|e| e.to_string()).collect(),
        };

        let mut context = self.base_context();
        context.insert("page_description", &post.description);
        if let Some(slug) = post.slug() {
            let canonical = full_url_for(&self.site, &format!("post/{}", encode_segment(slug)));
            context.insert("canonical", &canonical);
        }
        context.insert("post", &post_data);
        context.insert("comments", &comments);
        context.insert("form", &form_data);

        self.templates.render("post.html", &context)
    }

    /// Render the not-found page
    pub fn render_not_found(&self) -> Result<String> {
        self.templates.render("not_found.html", &self.base_context())
    }

    /// Render a list of post links
    pub fn render_index(&self, slugs: &[String]) -> Result<String> {
        let posts: Vec<PostLink> = slugs
            .iter()
            .map(|slug| PostLink {
                slug: slug.clone(),
                path: post_path(&self.site, slug),
            })
            .collect();

        let mut context = self.base_context();
        context.insert("posts", &posts);
        self.templates.render("index.html", &context)
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert(
            "site",
            &SiteData {
                title: self.site.title.clone(),
                root: url_for(&self.site, ""),
            },
        );
        context.insert("page_description", "");
        context.insert("canonical", "");
        context.insert("version", env!("CARGO_PKG_VERSION"));
        context
    }
}
