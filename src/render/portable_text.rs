//! Portable Text to HTML
//!
//! Each block type maps to a presentation rule. Unknown block types, styles
//! and marks take the default path: their text is kept, the wrapper is plain.

use serde_json::Value;

use crate::config::RendererConfig;
use crate::content::{Block, ImageRef, MarkDef, Span, TextBlock};
use crate::helpers::{html_escape, safe_href};
use crate::image::ImageUrlBuilder;

use super::highlight::CodeHighlighter;

const BODY_IMAGE_WIDTH: u32 = 1200;

/// Renders a post body
pub struct PortableTextRenderer<'a> {
    images: ImageUrlBuilder,
    highlighter: &'a CodeHighlighter,
}

/// An open list: its kind ("bullet", "number", ...) and nesting level
struct OpenList {
    kind: String,
    level: u32,
}

impl<'a> PortableTextRenderer<'a> {
    pub fn new(config: &RendererConfig, highlighter: &'a CodeHighlighter) -> Self {
        Self {
            images: config.image_urls(),
            highlighter,
        }
    }

    /// Render a sequence of blocks
    pub fn render(&self, blocks: &[Block]) -> String {
        let mut out = String::new();
        let mut lists: Vec<OpenList> = Vec::new();

        for block in blocks {
            match block {
                Block::Text(text) if text.list_item.is_some() => {
                    self.render_list_item(text, &mut lists, &mut out);
                }
                Block::Text(text) => {
                    close_lists(&mut lists, 0, &mut out);
                    out.push_str(&self.render_text_block(text));
                }
                Block::Image(image) => {
                    close_lists(&mut lists, 0, &mut out);
                    out.push_str(&self.render_image(image));
                }
                Block::Code(code) => {
                    close_lists(&mut lists, 0, &mut out);
                    out.push_str(
                        &self
                            .highlighter
                            .highlight(&code.code, code.language.as_deref()),
                    );
                }
                Block::Unknown { kind, raw } => {
                    close_lists(&mut lists, 0, &mut out);
                    out.push_str(&render_unknown(kind, raw));
                }
            }
        }

        close_lists(&mut lists, 0, &mut out);
        out
    }

    fn render_list_item(&self, block: &TextBlock, lists: &mut Vec<OpenList>, out: &mut String) {
        let kind = block.list_item.as_deref().unwrap_or("bullet");
        let level = block.list_level();

        close_lists(lists, level, out);
        if lists
            .last()
            .is_some_and(|top| top.level == level && top.kind != kind)
        {
            close_lists(lists, level - 1, out);
        }

        match lists.last() {
            Some(top) if top.level == level => out.push_str("</li>"),
            _ => {
                out.push_str(list_open_tag(kind));
                lists.push(OpenList {
                    kind: kind.to_string(),
                    level,
                });
            }
        }

        out.push_str(&format!(
            r#"<li class="{}">{}"#,
            list_item_class(kind),
            self.render_spans(&block.children, &block.mark_defs)
        ));
    }

    fn render_text_block(&self, block: &TextBlock) -> String {
        let inner = self.render_spans(&block.children, &block.mark_defs);
        match block.style.as_str() {
            "h1" => format!(r#"<h1 class="my-5 text-2xl font-bold">{}</h1>"#, inner),
            "h2" => format!(r#"<h2 class="my-5 text-xl font-bold">{}</h2>"#, inner),
            "h3" | "h4" | "h5" | "h6" => {
                format!("<{tag}>{}</{tag}>", inner, tag = block.style)
            }
            "blockquote" => format!("<blockquote>{}</blockquote>", inner),
            "normal" => format!("<p>{}</p>", inner),
            other => {
                tracing::debug!("Unknown block style {:?}, rendering as paragraph", other);
                format!("<p>{}</p>", inner)
            }
        }
    }

    fn render_spans(&self, spans: &[Span], mark_defs: &[MarkDef]) -> String {
        spans
            .iter()
            .map(|span| render_span(span, mark_defs))
            .collect()
    }

    fn render_image(&self, image: &ImageRef) -> String {
        match self.images.url_with_width(image, BODY_IMAGE_WIDTH) {
            Some(src) => format!(
                r#"<img class="my-5" src="{}" alt="{}">"#,
                html_escape(&src),
                html_escape(image.alt.as_deref().unwrap_or(""))
            ),
            None => {
                tracing::debug!("Skipping body image without a usable asset");
                String::new()
            }
        }
    }
}

fn render_span(span: &Span, mark_defs: &[MarkDef]) -> String {
    let mut open = String::new();
    let mut close = Vec::new();

    for mark in &span.marks {
        let tags = match mark_defs.iter().find(|def| &def.key == mark) {
            Some(def) => annotation_tags(def),
            None => decorator_tags(mark),
        };
        if let Some((start, end)) = tags {
            open.push_str(&start);
            close.push(end);
        }
    }

    let text = html_escape(&span.text).replace('\n', "<br/>");
    let close: String = close.into_iter().rev().collect();
    format!("{}{}{}", open, text, close)
}

fn annotation_tags(def: &MarkDef) -> Option<(String, String)> {
    match def.kind.as_str() {
        "link" => {
            let href = safe_href(def.href.as_deref().unwrap_or("#"));
            Some((
                format!(r#"<a href="{}" class="text-blue-500 hover:underline">"#, href),
                "</a>".to_string(),
            ))
        }
        _ => None,
    }
}

fn decorator_tags(mark: &str) -> Option<(String, String)> {
    let (start, end) = match mark {
        "strong" => ("<strong>", "</strong>"),
        "em" => ("<em>", "</em>"),
        "code" => ("<code>", "</code>"),
        "underline" => (r#"<span style="text-decoration: underline">"#, "</span>"),
        "strike-through" => ("<del>", "</del>"),
        _ => return None,
    };
    Some((start.to_string(), end.to_string()))
}

fn list_open_tag(kind: &str) -> &'static str {
    match kind {
        "number" => "<ol>",
        _ => "<ul>",
    }
}

fn list_close_tag(kind: &str) -> &'static str {
    match kind {
        "number" => "</ol>",
        _ => "</ul>",
    }
}

fn list_item_class(kind: &str) -> &'static str {
    match kind {
        "number" => "ml-4 list-decimal",
        _ => "ml-4 list-disc",
    }
}

/// Close every open list nested deeper than `level`
fn close_lists(lists: &mut Vec<OpenList>, level: u32, out: &mut String) {
    while lists.last().is_some_and(|top| top.level > level) {
        if let Some(list) = lists.pop() {
            out.push_str("</li>");
            out.push_str(list_close_tag(&list.kind));
        }
    }
}

/// Default path for block types without a rule
fn render_unknown(kind: &str, raw: &Value) -> String {
    tracing::debug!("No serializer for block type {:?}, using default", kind);

    let text = match raw.get("children").and_then(Value::as_array) {
        Some(children) => children
            .iter()
            .filter_map(|child| child.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join(""),
        None => raw
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    };

    format!(
        r#"<div data-block-type="{}">{}</div>"#,
        html_escape(kind),
        html_escape(&text)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{AssetRef, CodeBlock};

    fn config() -> RendererConfig {
        RendererConfig::new("abc123", "production").unwrap()
    }

    fn render(blocks: &[Block]) -> String {
        let highlighter = CodeHighlighter::default();
        PortableTextRenderer::new(&config(), &highlighter).render(blocks)
    }

    fn text(style: &str, content: &str) -> Block {
        Block::Text(TextBlock::new(style, vec![Span::plain(content)]))
    }

    fn item(kind: &str, level: u32, content: &str) -> Block {
        let mut block = TextBlock::new("normal", vec![Span::plain(content)]);
        block.list_item = Some(kind.to_string());
        block.level = Some(level);
        Block::Text(block)
    }

    #[test]
    fn test_headings_and_paragraphs() {
        let html = render(&[text("h1", "Title"), text("h2", "Sub"), text("normal", "Body")]);
        assert_eq!(
            html,
            r#"<h1 class="my-5 text-2xl font-bold">Title</h1><h2 class="my-5 text-xl font-bold">Sub</h2><p>Body</p>"#
        );
    }

    #[test]
    fn test_unknown_style_is_paragraph() {
        assert_eq!(render(&[text("fancy", "x")]), "<p>x</p>");
    }

    #[test]
    fn test_list_items_grouped() {
        let html = render(&[
            item("bullet", 1, "a"),
            item("bullet", 1, "b"),
            text("normal", "after"),
        ]);
        assert_eq!(
            html,
            r#"<ul><li class="ml-4 list-disc">a</li><li class="ml-4 list-disc">b</li></ul><p>after</p>"#
        );
    }

    #[test]
    fn test_nested_and_switching_lists() {
        let html = render(&[
            item("bullet", 1, "a"),
            item("bullet", 2, "a1"),
            item("bullet", 1, "b"),
            item("number", 1, "one"),
        ]);
        assert_eq!(
            html,
            concat!(
                r#"<ul><li class="ml-4 list-disc">a"#,
                r#"<ul><li class="ml-4 list-disc">a1</li></ul>"#,
                r#"</li><li class="ml-4 list-disc">b</li></ul>"#,
                r#"<ol><li class="ml-4 list-decimal">one</li></ol>"#
            )
        );
    }

    #[test]
    fn test_link_and_decorators() {
        let mut block = TextBlock::new(
            "normal",
            vec![
                Span::plain("See "),
                Span::marked("docs", &["lnk", "strong"]),
                Span::marked(" <now>", &["em", "sparkle"]),
            ],
        );
        block.mark_defs = vec![MarkDef {
            key: "lnk".to_string(),
            kind: "link".to_string(),
            href: Some("https://example.com".to_string()),
        }];

        let html = render(&[Block::Text(block)]);
        assert_eq!(
            html,
            r#"<p>See <a href="https://example.com" class="text-blue-500 hover:underline"><strong>docs</strong></a><em> &lt;now&gt;</em></p>"#
        );
    }

    #[test]
    fn test_unsafe_link_neutralized() {
        let mut block = TextBlock::new("normal", vec![Span::marked("x", &["k"])]);
        block.mark_defs = vec![MarkDef {
            key: "k".to_string(),
            kind: "link".to_string(),
            href: Some("javascript:alert(1)".to_string()),
        }];
        assert!(render(&[Block::Text(block)]).contains(r##"href="#""##));
    }

    #[test]
    fn test_unknown_block_type_uses_default() {
        let raw = serde_json::json!({
            "_type": "callout",
            "children": [{"_type": "span", "text": "Heads up"}]
        });
        let html = render(&[Block::Unknown {
            kind: "callout".to_string(),
            raw,
        }]);
        assert_eq!(html, r#"<div data-block-type="callout">Heads up</div>"#);

        let html = render(&[Block::Unknown {
            kind: String::new(),
            raw: serde_json::Value::Null,
        }]);
        assert_eq!(html, r#"<div data-block-type=""></div>"#);
    }

    #[test]
    fn test_image_block() {
        let image = ImageRef {
            asset: Some(AssetRef {
                reference: Some("image-abc-800x600-png".to_string()),
                url: None,
            }),
            alt: Some("A cat".to_string()),
        };
        let html = render(&[Block::Image(image), Block::Image(ImageRef::default())]);
        assert_eq!(
            html,
            r#"<img class="my-5" src="https://cdn.sanity.io/images/abc123/production/abc-800x600.png?w=1200" alt="A cat">"#
        );
    }

    #[test]
    fn test_code_block() {
        let html = render(&[Block::Code(CodeBlock {
            language: Some("rust".to_string()),
            code: "let x = 1;".to_string(),
        })]);
        assert!(html.contains("highlight rust"));
    }
}
