//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::Cell;
use std::sync::Arc;

use anyhow::bail;
use zencomplete::autocomplete::SuggestionRequest;
use zencomplete::editor::{Editor, EditorId};
use zencomplete::snippets::{
    AbbreviationExpander, CssSnippet, ExpandOptions, RawSnippet, SnippetSource,
};
use zencomplete::syntax::Dialect;
use zencomplete::{AutocompleteProvider, Position};

/// Expansion stub: handles `>`-nested chains of plain element names plus a
/// small stylesheet table. Anything else is a parse failure.
pub struct FixtureExpander;

impl AbbreviationExpander for FixtureExpander {
    fn expand(&self, abbreviation: &str, options: &ExpandOptions) -> anyhow::Result<String> {
        if abbreviation.is_empty() || abbreviation.chars().any(char::is_whitespace) {
            bail!("malformed abbreviation: {abbreviation}");
        }
        if options.dialect.is_stylesheet() {
            return match abbreviation {
                "dib" => Ok("display: inline-block;".to_string()),
                "db" => Ok("display: block;".to_string()),
                "p10" => Ok("padding: 10px;".to_string()),
                _ => bail!("unknown stylesheet abbreviation: {abbreviation}"),
            };
        }
        if options.dialect == Dialect::Pug {
            // Pug shorthand is already its own expansion for simple elements
            return Ok(abbreviation.to_string());
        }
        if let Some((name, rest)) = abbreviation.split_once('[') {
            // Single attribute form: `a[href]`
            let Some(attr) = rest.strip_suffix(']') else {
                bail!("unbalanced attribute bracket: {abbreviation}");
            };
            if name.is_empty()
                || !name.chars().all(|c| c.is_ascii_alphanumeric())
                || !attr.chars().all(|c| c.is_ascii_alphanumeric())
            {
                bail!("unsupported abbreviation: {abbreviation}");
            }
            return Ok(format!(
                "<{name} {attr}=\"{}\">{}</{name}>",
                (options.field)(1, ""),
                (options.field)(2, "")
            ));
        }
        expand_chain(abbreviation, options)
    }
}

/// `ul>li` becomes:
///
/// ```text
/// <ul>
///     <li>${1}</li>
/// </ul>
/// ```
fn expand_chain(abbreviation: &str, options: &ExpandOptions) -> anyhow::Result<String> {
    let names: Vec<&str> = abbreviation.split('>').collect();
    if names
        .iter()
        .any(|name| name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()))
    {
        bail!("unsupported abbreviation: {abbreviation}");
    }

    let last = names.len() - 1;
    let mut lines: Vec<String> = Vec::new();
    for (depth, name) in names.iter().enumerate() {
        if depth == last {
            lines.push(format!(
                "{}<{}>{}</{}>",
                "\t".repeat(depth),
                name,
                (options.field)(1, ""),
                name
            ));
        } else {
            lines.push(format!("{}<{}>", "\t".repeat(depth), name));
        }
    }
    for depth in (0..last).rev() {
        lines.push(format!("{}</{}>", "\t".repeat(depth), names[depth]));
    }
    Ok(lines.join("\n"))
}

/// Snippet source with build counters for cache assertions.
#[derive(Default)]
pub struct FixtureSnippets {
    pub markup_builds: Cell<usize>,
    pub stylesheet_builds: Cell<usize>,
}

impl SnippetSource for FixtureSnippets {
    fn markup_snippets(&self, _dialect: Dialect) -> Vec<RawSnippet> {
        self.markup_builds.set(self.markup_builds.get() + 1);
        vec![
            RawSnippet::new("a", "a"),
            RawSnippet::new("bq", "blockquote"),
            RawSnippet::new("pic", "picture"),
        ]
    }

    fn stylesheet_snippets(&self, _dialect: Dialect) -> Vec<CssSnippet> {
        self.stylesheet_builds.set(self.stylesheet_builds.get() + 1);
        vec![
            CssSnippet::new(
                "d",
                "display",
                vec!["${1:block}".to_string(), "none".to_string()],
            ),
            CssSnippet::new("dib", "display: inline-block", vec![]),
            CssSnippet::new("dif", "display: inline-flex", vec![]),
            CssSnippet::new("fl", "float", vec!["left".to_string(), "right".to_string()]),
        ]
    }
}

/// Create an HTML editor with the cursor at the given position
pub fn html_editor(text: &str, line: usize, column: usize) -> Editor {
    let mut editor = Editor::new(EditorId(1), "text.html.basic", text);
    editor.set_cursor(Position::new(line, column));
    editor
}

/// Create a CSS editor with the cursor at the given position
pub fn css_editor(text: &str, line: usize, column: usize) -> Editor {
    let mut editor = Editor::new(EditorId(2), "source.css", text);
    editor.set_cursor(Position::new(line, column));
    editor
}

/// Provider over the fixture expander and a shared fixture source
pub fn provider_with(snippets: Arc<FixtureSnippets>) -> AutocompleteProvider {
    AutocompleteProvider::new(Arc::new(FixtureExpander), snippets)
}

pub fn provider() -> AutocompleteProvider {
    provider_with(Arc::new(FixtureSnippets::default()))
}

/// A completion request at the given position
pub fn request(line: usize, column: usize, activated_manually: bool) -> SuggestionRequest {
    SuggestionRequest {
        position: Position::new(line, column),
        activated_manually,
    }
}
