//! Markdown rendering with syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::config::HighlightConfig;

/// Theme used when none is configured or the configured one is unknown
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Marker separating the excerpt from the rest of a post
const MORE_MARKER: &str = "<!-- more -->";

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme: Theme,
    line_numbers: bool,
    auto_detect: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options(DEFAULT_THEME, false, true)
    }

    /// Create from the `highlight` section of the site config
    pub fn from_config(config: &HighlightConfig) -> Self {
        Self::with_options(&config.theme, config.line_number, config.auto_detect)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool, auto_detect: bool) -> Self {
        let mut themes = ThemeSet::load_defaults().themes;
        let theme = match themes.remove(theme) {
            Some(t) => t,
            None => {
                tracing::warn!(
                    "Unknown highlight theme {:?}, falling back to {}",
                    theme,
                    DEFAULT_THEME
                );
                themes.remove(DEFAULT_THEME).unwrap_or_default()
            }
        };

        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
            line_numbers,
            auto_detect,
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let document = self.parse(markdown);
        let document = self.highlight_pass(document);

        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_output, document.into_iter());
        html_output
    }

    fn parse<'a>(&self, markdown: &'a str) -> Vec<Event<'a>> {
        // YAML metadata blocks stay disabled; front-matter is split off beforehand
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_DEFINITION_LIST
            | Options::ENABLE_GFM;
        Parser::new_ext(markdown, options).collect()
    }

    /// Replace every code block with pre-rendered HTML
    fn highlight_pass<'a>(&self, document: Vec<Event<'a>>) -> Vec<Event<'a>> {
        let mut events = Vec::with_capacity(document.len());
        let mut code_block: Option<(Option<String>, String)> = None;

        for event in document {
            if let Some((lang, code)) = code_block.as_mut() {
                match event {
                    Event::Text(text) => code.push_str(&text),
                    Event::End(TagEnd::CodeBlock) => {
                        let highlighted = self.highlight_code(code, lang.as_deref());
                        events.push(Event::Html(CowStr::from(highlighted)));
                        code_block = None;
                    }
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => fence_language(&info),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                event => events.push(event),
            }
        }

        events
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let syntax = match lang {
            Some(lang) => self.find_syntax(lang),
            None if self.auto_detect => self
                .syntax_set
                .find_syntax_by_first_line(code.lines().next().unwrap_or_default()),
            None => None,
        };

        let Some(syntax) = syntax else {
            if let Some(lang) = lang {
                tracing::debug!("No syntax for code fence language {:?}, rendering plain", lang);
            }
            return plain_code_block(code, lang);
        };

        let class = match lang {
            Some(lang) => lang.to_string(),
            None => syntax
                .file_extensions
                .first()
                .cloned()
                .unwrap_or_else(|| "text".to_string()),
        };
        match self.highlight_lines(code, syntax) {
            Some(lines) if self.line_numbers => add_line_numbers(&lines, &class),
            Some(lines) => format!(
                r#"<pre class="highlight"><code class="language-{}">{}</code></pre>"#,
                html_escape(&class),
                lines.concat()
            ),
            None => plain_code_block(code, lang),
        }
    }

    fn find_syntax(&self, lang: &str) -> Option<&SyntaxReference> {
        self.syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
    }

    /// One HTML fragment per source line, newlines included
    fn highlight_lines(&self, code: &str, syntax: &SyntaxReference) -> Option<Vec<String>> {
        let mut highlighter = HighlightLines::new(syntax, &self.theme);

        LinesWithEndings::from(code)
            .map(|line| {
                let regions = highlighter.highlight_line(line, &self.syntax_set).ok()?;
                styled_line_to_highlighted_html(&regions, IncludeBackground::No).ok()
            })
            .collect()
    }

    /// Split a Markdown body at the `<!-- more -->` marker
    /// Returns the trimmed excerpt when the marker is present
    pub fn split_excerpt(content: &str) -> Option<&str> {
        content
            .find(MORE_MARKER)
            .map(|pos| content[..pos].trim())
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// First token of a fence info string, e.g. `rust` from "rust,ignore"
fn fence_language(info: &str) -> Option<String> {
    info.split(|c: char| c.is_whitespace() || c == ',' || c == '{')
        .next()
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
}

/// Unhighlighted fallback
fn plain_code_block(code: &str, lang: Option<&str>) -> String {
    match lang {
        Some(lang) => format!(
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            html_escape(lang),
            html_escape(code)
        ),
        None => format!("<pre><code>{}</code></pre>", html_escape(code)),
    }
}

/// Add line numbers to highlighted code, one per source line
fn add_line_numbers(lines: &[String], lang: &str) -> String {
    let gutter = (1..=lines.len())
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre>{}</pre></td></tr></table></figure>"#,
        html_escape(lang),
        gutter,
        lines.concat()
    )
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
