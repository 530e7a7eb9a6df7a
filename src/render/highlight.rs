//! Syntax highlighting for code blocks

use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::helpers::html_escape;

/// Code highlighter backed by syntect's bundled syntaxes and themes
pub struct CodeHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
}

impl CodeHighlighter {
    pub fn new(theme: &str) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
        }
    }

    /// Highlight a code block, falling back to an escaped `<pre>`
    pub fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.filter(|l| !l.is_empty()).unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next());

        let highlighted = theme.and_then(|theme| {
            highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()
        });

        match highlighted {
            Some(html) => format!(
                r#"<figure class="highlight {}">{}</figure>"#,
                html_escape(lang),
                html
            ),
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                html_escape(lang),
                html_escape(code)
            ),
        }
    }
}

impl Default for CodeHighlighter {
    fn default() -> Self {
        Self::new("base16-ocean.dark")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_known_language() {
        let highlighter = CodeHighlighter::default();
        let html = highlighter.highlight("fn main() {}", Some("rust"));
        assert!(html.starts_with(r#"<figure class="highlight rust">"#));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_unknown_language_uses_plain_text() {
        let highlighter = CodeHighlighter::new("no-such-theme");
        let html = highlighter.highlight("<b>x</b>", Some("nonsense-lang"));
        assert!(html.contains("&lt;b&gt;"));
    }
}
