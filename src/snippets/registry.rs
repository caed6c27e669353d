//! Interfaces to the expansion-engine and snippet-registry collaborators.
//!
//! The abbreviation grammar, its expansion into snippet text, and the
//! per-dialect snippet registry live outside this crate. The engine consumes
//! them through these traits and treats every failure as "no match".

use crate::syntax::Dialect;
use anyhow::Result;

/// Renders a tab-stop field into snippet text.
pub type FieldRenderer = fn(usize, &str) -> String;

/// Field renderer producing host tab stops: `${1}` / `${1:placeholder}`.
pub fn snippet_field(index: usize, placeholder: &str) -> String {
    if placeholder.is_empty() {
        format!("${{{}}}", index)
    } else {
        format!("${{{}:{}}}", index, placeholder)
    }
}

/// Field renderer for plain-text previews: placeholder text or nothing.
pub fn plain_field(_index: usize, placeholder: &str) -> String {
    placeholder.to_string()
}

/// Context handed to the expansion engine.
#[derive(Clone, Copy)]
pub struct ExpandOptions {
    pub dialect: Dialect,
    pub field: FieldRenderer,
}

impl ExpandOptions {
    /// Options for insertion payloads: fields become host tab stops.
    pub fn for_insertion(dialect: Dialect) -> Self {
        Self {
            dialect,
            field: snippet_field,
        }
    }

    /// Options for preview text: fields collapse to their placeholder.
    pub fn for_preview(dialect: Dialect) -> Self {
        Self {
            dialect,
            field: plain_field,
        }
    }
}

impl std::fmt::Debug for ExpandOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpandOptions")
            .field("dialect", &self.dialect)
            .finish_non_exhaustive()
    }
}

/// The abbreviation grammar + expansion engine.
pub trait AbbreviationExpander {
    /// Expand abbreviation text into snippet text.
    ///
    /// A malformed abbreviation is an `Err`; callers catch it at the engine
    /// boundary and degrade to no-match.
    fn expand(&self, abbreviation: &str, options: &ExpandOptions) -> Result<String>;
}

/// A named snippet template from the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSnippet {
    pub key: String,
    pub value: String,
}

impl RawSnippet {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A stylesheet snippet resolved to its property and embedded keyword set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssSnippet {
    pub key: String,
    pub property: String,
    pub keywords: Vec<String>,
}

impl CssSnippet {
    pub fn new(key: impl Into<String>, property: impl Into<String>, keywords: Vec<String>) -> Self {
        Self {
            key: key.into(),
            property: property.into(),
            keywords,
        }
    }
}

/// The per-dialect snippet registry.
pub trait SnippetSource {
    /// Named snippets for a markup dialect, in registry order.
    fn markup_snippets(&self, dialect: Dialect) -> Vec<RawSnippet>;

    /// Resolved CSS snippets for a stylesheet dialect, in registry order.
    fn stylesheet_snippets(&self, dialect: Dialect) -> Vec<CssSnippet>;
}
