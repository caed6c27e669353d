//! Dialect detection from editor syntax scopes.
//!
//! Maps the scope descriptor at the cursor to the abbreviation dialect in
//! effect there, and gates contextual auto-activation.

use crate::editor::{scope_matches, Editor};

/// A markup or stylesheet language variant with its own snippet universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    // Markup family
    Html,
    Xml,
    Xsl,
    Haml,
    Pug,
    Slim,
    // Stylesheet family
    Css,
    Scss,
    Sass,
    Less,
    Stylus,
}

/// Scope selector → dialect, most specific selectors first so that
/// "source.css.scss" resolves before "source.css".
const SCOPE_MAP: &[(&str, Dialect)] = &[
    ("text.xml.xsl", Dialect::Xsl),
    ("source.css.scss", Dialect::Scss),
    ("source.css.less", Dialect::Less),
    ("text.html", Dialect::Html),
    ("text.xml", Dialect::Xml),
    ("text.haml", Dialect::Haml),
    ("source.haml", Dialect::Haml),
    ("source.pug", Dialect::Pug),
    ("text.jade", Dialect::Pug),
    ("text.slim", Dialect::Slim),
    ("source.slim", Dialect::Slim),
    ("source.scss", Dialect::Scss),
    ("source.less", Dialect::Less),
    ("source.sass", Dialect::Sass),
    ("source.stylus", Dialect::Stylus),
    ("source.css", Dialect::Css),
];

impl Dialect {
    /// Resolve a single scope name to a dialect.
    pub fn from_scope(scope: &str) -> Option<Dialect> {
        SCOPE_MAP
            .iter()
            .find(|(selector, _)| scope_matches(scope, selector))
            .map(|(_, dialect)| *dialect)
    }

    /// Whether this dialect uses the stylesheet completion strategy.
    pub fn is_stylesheet(&self) -> bool {
        matches!(
            self,
            Dialect::Css | Dialect::Scss | Dialect::Sass | Dialect::Less | Dialect::Stylus
        )
    }

    /// Registry key for this dialect ("html", "scss", ...)
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Html => "html",
            Dialect::Xml => "xml",
            Dialect::Xsl => "xsl",
            Dialect::Haml => "haml",
            Dialect::Pug => "pug",
            Dialect::Slim => "slim",
            Dialect::Css => "css",
            Dialect::Scss => "scss",
            Dialect::Sass => "sass",
            Dialect::Less => "less",
            Dialect::Stylus => "stylus",
        }
    }
}

/// Dialect in effect at the editor's cursor, or `None` when no known dialect
/// maps to the current scope (suggestions are then suppressed entirely).
///
/// The innermost matching scope wins, so embedded CSS inside an HTML
/// document resolves to the stylesheet dialect.
pub fn detect_syntax(editor: &Editor) -> Option<Dialect> {
    editor
        .scopes_at(editor.cursor())
        .iter()
        .rev()
        .find_map(|scope| Dialect::from_scope(scope))
}

/// Scopes in which abbreviation expansion is not meaningful and
/// auto-activation must stay quiet.
const AUTO_ACTIVATE_DENY: &[&str] = &["string.quoted", "comment", "meta.attribute-with-value"];

/// Whether the cursor context allows offering suggestions without an
/// explicit request. Evaluated before any marker work is done.
pub fn has_auto_activate_context(editor: &Editor) -> bool {
    !AUTO_ACTIVATE_DENY
        .iter()
        .any(|selector| editor.has_scope(selector))
}
