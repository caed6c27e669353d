//! Per-dialect snippet completion cache.
//!
//! Building a dialect's completion list means expanding every named snippet
//! for its preview text, which is far too slow to repeat per keystroke. The
//! cache builds each dialect's list once and hands out the memoized slice.
//!
//! The cache is owned by the autocomplete provider: created with the engine,
//! cleared explicitly when snippet definitions change or the engine shuts
//! down. It is not ambient global state.

use std::collections::HashMap;

use crate::snippets::registry::{AbbreviationExpander, ExpandOptions, SnippetSource};
use crate::snippets::user::UserSnippets;
use crate::syntax::Dialect;
use crate::util::strip_fields;

/// Hint attached to stylesheet completions whose value embeds keyword choices.
const KEYWORD_HINT: &str =
    "Contains embedded keywords. Type `-` or `:` and first embedded keyword letters for completion.";

/// One named-snippet completion, preview precomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetCompletion {
    pub name: String,
    pub preview: String,
    pub hint: Option<String>,
}

/// Memoized per-dialect completion lists.
#[derive(Debug, Default)]
pub struct CompletionCache {
    entries: HashMap<Dialect, Vec<SnippetCompletion>>,
}

impl CompletionCache {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The completion list for a dialect, building it on first request.
    pub fn completions(
        &mut self,
        dialect: Dialect,
        source: &dyn SnippetSource,
        expander: &dyn AbbreviationExpander,
        user: &UserSnippets,
    ) -> &[SnippetCompletion] {
        self.entries.entry(dialect).or_insert_with(|| {
            let completions = if dialect.is_stylesheet() {
                build_stylesheet_completions(dialect, source, user)
            } else {
                build_markup_completions(dialect, source, expander, user)
            };
            tracing::debug!(
                dialect = dialect.name(),
                count = completions.len(),
                "built snippet completion list"
            );
            completions
        })
    }

    pub fn is_cached(&self, dialect: Dialect) -> bool {
        self.entries.contains_key(&dialect)
    }

    /// Drop every cached list. Called when snippet definitions change and on
    /// engine shutdown.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn build_markup_completions(
    dialect: Dialect,
    source: &dyn SnippetSource,
    expander: &dyn AbbreviationExpander,
    user: &UserSnippets,
) -> Vec<SnippetCompletion> {
    let mut snippets = source.markup_snippets(dialect);
    for (name, template) in &user.markup {
        match snippets.iter_mut().find(|s| &s.key == name) {
            Some(existing) => existing.value = template.clone(),
            None => snippets.push(crate::snippets::registry::RawSnippet::new(
                name.as_str(),
                template.as_str(),
            )),
        }
    }

    let options = ExpandOptions::for_preview(dialect);
    snippets
        .into_iter()
        .map(|snippet| {
            let preview = match expander.expand(&snippet.value, &options) {
                Ok(expanded) => expanded,
                Err(e) => {
                    tracing::warn!(
                        dialect = dialect.name(),
                        snippet = %snippet.key,
                        "snippet preview expansion failed: {e}"
                    );
                    strip_fields(&snippet.value)
                }
            };
            SnippetCompletion {
                name: snippet.key,
                preview,
                hint: None,
            }
        })
        .collect()
}

fn build_stylesheet_completions(
    dialect: Dialect,
    source: &dyn SnippetSource,
    user: &UserSnippets,
) -> Vec<SnippetCompletion> {
    let mut completions: Vec<SnippetCompletion> = source
        .stylesheet_snippets(dialect)
        .into_iter()
        .map(|snippet| {
            if snippet.keywords.is_empty() {
                SnippetCompletion {
                    name: snippet.key,
                    preview: snippet.property,
                    hint: None,
                }
            } else {
                let keywords = strip_fields(&snippet.keywords.join(" | "));
                SnippetCompletion {
                    name: snippet.key,
                    preview: format!("{} {}", snippet.property, keywords),
                    hint: Some(KEYWORD_HINT.to_string()),
                }
            }
        })
        .collect();

    for (name, template) in &user.stylesheet {
        let preview = strip_fields(template);
        match completions.iter_mut().find(|c| &c.name == name) {
            Some(existing) => {
                existing.preview = preview;
                existing.hint = None;
            }
            None => completions.push(SnippetCompletion {
                name: name.clone(),
                preview,
                hint: None,
            }),
        }
    }

    completions
}

/// Entries whose name starts with `prefix`, in order. Ordinal and
/// case-sensitive; the empty prefix keeps everything.
pub fn filter_by_prefix<'a>(
    completions: &'a [SnippetCompletion],
    prefix: &str,
) -> Vec<&'a SnippetCompletion> {
    completions
        .iter()
        .filter(|c| c.name.starts_with(prefix))
        .collect()
}
