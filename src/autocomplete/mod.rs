//! Suggestion assembly and insertion reconciliation.
//!
//! [`AutocompleteProvider`] is the host-facing surface of the engine. The
//! host calls [`AutocompleteProvider::get_suggestions`] on each completion
//! request and [`AutocompleteProvider::on_inserted`] when a suggestion was
//! accepted; everything else (marker lifecycle, completion caching, dialect
//! resolution) hangs off those two handlers.
//!
//! Suggestion computation is side-effect-free except for bounded marker
//! creation, and it never returns an error: every failure inside degrades
//! to "offer no suggestion".

mod prefix;

pub use prefix::{
    get_prefix, is_markup_prefix_char, is_stylesheet_prefix_char, markup_prefix, stylesheet_prefix,
};

use std::sync::Arc;

use crate::buffer::{position_after, Position};
use crate::config::EngineConfig;
use crate::editor::{Editor, EditorId};
use crate::marker::{MarkerId, MarkerRegistry};
use crate::snippets::{
    filter_by_prefix, AbbreviationExpander, CompletionCache, SnippetSource, UserSnippets,
};
use crate::syntax::{detect_syntax, has_auto_activate_context, Dialect};
use crate::util::{first_field_offset, strip_fields};

/// What a suggestion is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    /// The abbreviation at the cursor, expanded
    Abbreviation,
    /// A named snippet from the dialect's registry
    NamedSnippet,
}

/// Rough size of an expansion, for display styling by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    Regular,
    Medium,
    Small,
}

impl SizeClass {
    /// Single-line expansions render at regular size, short multi-line ones
    /// medium, anything taller small.
    pub fn for_snippet(snippet: &str) -> Self {
        match snippet.split('\n').count() {
            1 => SizeClass::Regular,
            2 | 3 => SizeClass::Medium,
            _ => SizeClass::Small,
        }
    }
}

/// One completion offered to the host. Ephemeral, never persisted.
#[derive(Debug, Clone)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    /// Text shown in the completion list
    pub display_text: String,
    /// Text inserted on acceptance: the expanded snippet for abbreviation
    /// suggestions, the snippet name for named-snippet suggestions
    pub payload: String,
    /// The text the host should replace before the cursor
    pub replacement_prefix: String,
    /// Preview of the expansion, shown alongside the name
    pub right_label: Option<String>,
    /// Extra guidance for entries with embedded keyword choices
    pub hint: Option<String>,
    pub size_class: SizeClass,
    /// The marker behind an abbreviation suggestion
    pub marker: Option<MarkerId>,
}

/// A host completion request.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionRequest {
    /// Cursor position the request was made at
    pub position: Position,
    /// Whether the user invoked completion explicitly
    pub activated_manually: bool,
}

/// The engine's host-facing completion provider.
pub struct AutocompleteProvider {
    expander: Arc<dyn AbbreviationExpander>,
    snippets: Arc<dyn SnippetSource>,
    user_snippets: UserSnippets,
    registry: MarkerRegistry,
    cache: CompletionCache,
    config: EngineConfig,
}

impl AutocompleteProvider {
    pub fn new(expander: Arc<dyn AbbreviationExpander>, snippets: Arc<dyn SnippetSource>) -> Self {
        Self::with_config(expander, snippets, EngineConfig::default())
    }

    pub fn with_config(
        expander: Arc<dyn AbbreviationExpander>,
        snippets: Arc<dyn SnippetSource>,
        config: EngineConfig,
    ) -> Self {
        Self {
            expander,
            snippets,
            user_snippets: UserSnippets::default(),
            registry: MarkerRegistry::new(),
            cache: CompletionCache::new(),
            config,
        }
    }

    /// Install user snippet overrides. Cached completion lists are rebuilt
    /// on next use since their contents changed.
    pub fn set_user_snippets(&mut self, user_snippets: UserSnippets) {
        self.user_snippets = user_snippets;
        self.cache.clear();
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    pub fn markers(&self) -> &MarkerRegistry {
        &self.registry
    }

    pub fn markers_mut(&mut self) -> &mut MarkerRegistry {
        &mut self.registry
    }

    /// Forward a buffer-change notification to marker re-validation.
    pub fn on_buffer_changed(&mut self, editor: &mut Editor) {
        self.registry
            .handle_buffer_change(editor, self.expander.as_ref());
    }

    /// Forward an editor-disposal notification.
    pub fn on_editor_disposed(&mut self, editor: EditorId) {
        self.registry.editor_disposed(editor);
    }

    /// Drop cached completion lists (snippet definitions changed, or the
    /// engine is shutting down).
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Compute the suggestions for a completion request.
    ///
    /// Ordering: the expanded-abbreviation candidate first, then named
    /// snippets filtered to the prefix.
    pub fn get_suggestions(
        &mut self,
        editor: &mut Editor,
        request: &SuggestionRequest,
    ) -> Vec<Suggestion> {
        let Some(dialect) = detect_syntax(editor) else {
            return Vec::new();
        };
        let auto_activate = self.config.auto_activate && has_auto_activate_context(editor);
        let position = request.position;
        let prefix = if dialect.is_stylesheet() {
            stylesheet_prefix(editor, position)
        } else {
            markup_prefix(editor, position)
        };

        let mut result = Vec::new();

        if auto_activate || request.activated_manually {
            if let Some(suggestion) =
                self.expanded_abbreviation_suggestion(editor, position, dialect)
            {
                result.push(suggestion);
            }
        }

        // Named snippets for the prefix, but only with the caret in element
        // position (or anywhere in a stylesheet). Offering element snippets
        // inside attribute or text content would be noise.
        if (!prefix.is_empty() && auto_activate) || request.activated_manually {
            if dialect.is_stylesheet() || self.in_element_name_context(editor, &prefix, position) {
                result.extend(self.snippet_suggestions(editor, dialect, &prefix));
            }
        }

        result
    }

    /// The expanded-abbreviation candidate at the position: the existing
    /// marker if one covers it, otherwise a fresh mark attempt.
    ///
    /// Marking only ever happens inside a completion request the host chose
    /// to make, never in the buffer-change path, which keeps its cost
    /// bounded per request.
    fn expanded_abbreviation_suggestion(
        &mut self,
        editor: &mut Editor,
        position: Position,
        dialect: Dialect,
    ) -> Option<Suggestion> {
        let marker_id = match self.registry.find_marker(editor, Some(position)) {
            Some(marker) => marker.id(),
            None => self.registry.mark_abbreviation(
                editor,
                position,
                dialect,
                self.expander.as_ref(),
            )?,
        };

        let marker = self.registry.get(marker_id)?;
        let snippet = marker.snippet().to_string();
        let range = marker.range(editor)?;
        let replacement_prefix = editor.text_in_range(range);

        // Some dialects expand an abbreviation to itself (`li.item` in Pug);
        // suggesting a no-op replacement is noise.
        let stripped = strip_fields(&snippet);
        if stripped == replacement_prefix {
            return None;
        }

        Some(Suggestion {
            kind: SuggestionKind::Abbreviation,
            display_text: stripped,
            payload: snippet.clone(),
            replacement_prefix,
            right_label: None,
            hint: None,
            size_class: SizeClass::for_snippet(&snippet),
            marker: Some(marker_id),
        })
    }

    /// Named-snippet candidates for the prefix.
    fn snippet_suggestions(
        &mut self,
        editor: &Editor,
        dialect: Dialect,
        prefix: &str,
    ) -> Vec<Suggestion> {
        // Inside a property value only keyword completion makes sense, and
        // that is the host's domain.
        if dialect.is_stylesheet() && editor.has_scope("meta.property-value") {
            return Vec::new();
        }

        let completions = self.cache.completions(
            dialect,
            self.snippets.as_ref(),
            self.expander.as_ref(),
            &self.user_snippets,
        );
        filter_by_prefix(completions, prefix)
            .into_iter()
            .map(|completion| Suggestion {
                kind: SuggestionKind::NamedSnippet,
                display_text: completion.name.clone(),
                payload: completion.name.clone(),
                replacement_prefix: prefix.to_string(),
                right_label: Some(completion.preview.clone()),
                hint: completion.hint.clone(),
                size_class: SizeClass::Regular,
                marker: None,
            })
            .collect()
    }

    /// Whether the caret sits at an element-name boundary of the marked
    /// abbreviation: the prefix starts the abbreviation, or follows one of
    /// the element operators. Any other offset means the caret is inside
    /// attribute or text content.
    fn in_element_name_context(&self, editor: &Editor, prefix: &str, position: Position) -> bool {
        let Some(marker) = self.registry.find_marker(editor, None) else {
            return false;
        };
        let Some(range) = marker.range(editor) else {
            return false;
        };
        if position.line != range.start.line {
            return false;
        }

        let prefix_len = prefix.chars().count();
        if position.column < prefix_len + range.start.column {
            return false;
        }
        let offset = position.column - prefix_len - range.start.column;
        if offset == 0 {
            return true;
        }
        matches!(
            marker.abbreviation().chars().nth(offset - 1),
            Some('>' | '^' | '+' | '(' | ')')
        )
    }

    /// Reconcile an accepted suggestion with what the host actually did.
    ///
    /// Applies only to abbreviation suggestions with a live marker; a stale
    /// marker makes the whole call a no-op. When the marker's range end
    /// equals the trigger position the host already replaced the text and
    /// the marker is simply retired. Otherwise the host's replacement-prefix
    /// match failed to fire and the edit happens here: caret to the range
    /// end first, then one transaction that swaps the marker's range for the
    /// snippet, so undo restores both the abbreviation text and the caret.
    pub fn on_inserted(
        &mut self,
        editor: &mut Editor,
        suggestion: &Suggestion,
        trigger_position: Position,
    ) {
        let Some(marker_id) = suggestion.marker else {
            return;
        };
        let Some(marker) = self.registry.get(marker_id) else {
            tracing::debug!("acceptance for a destroyed marker, ignoring");
            return;
        };
        let snippet = marker.snippet().to_string();
        let Some(range) = marker.range(editor) else {
            self.registry.destroy(editor, marker_id);
            return;
        };

        if range.end == trigger_position {
            // The host performed the replacement itself
            self.registry.destroy(editor, marker_id);
            return;
        }

        tracing::debug!(%range, %trigger_position, "host skipped replacement, reconciling");
        editor.set_cursor(range.end);

        let inserted = strip_fields(&snippet);
        let caret_field = first_field_offset(&snippet);
        editor.transact(|editor| {
            editor.replace_range(range, &inserted);
            let caret = match caret_field {
                Some(offset) => {
                    let start = editor.buffer().position_to_offset(range.start);
                    editor.buffer().offset_to_position(start + offset)
                }
                None => position_after(range.start, &inserted),
            };
            editor.set_cursor(caret);
        });
        self.registry.destroy(editor, marker_id);
    }
}

impl std::fmt::Debug for AutocompleteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutocompleteProvider")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::EditorId;
    use crate::snippets::{CssSnippet, RawSnippet};
    use anyhow::bail;

    /// Wraps an abbreviation in a fake tag; Pug expands to itself.
    struct StubExpander;

    impl AbbreviationExpander for StubExpander {
        fn expand(
            &self,
            abbreviation: &str,
            options: &crate::snippets::ExpandOptions,
        ) -> anyhow::Result<String> {
            if abbreviation.is_empty()
                || abbreviation.chars().any(char::is_whitespace)
                || abbreviation.ends_with(&['>', '+', '^'][..])
            {
                bail!("malformed abbreviation: {abbreviation}");
            }
            if options.dialect == Dialect::Pug {
                return Ok(abbreviation.to_string());
            }
            let field = (options.field)(1, "");
            Ok(format!("<{abbreviation}>{field}</{abbreviation}>"))
        }
    }

    struct StubSnippets;

    impl SnippetSource for StubSnippets {
        fn markup_snippets(&self, _dialect: Dialect) -> Vec<RawSnippet> {
            vec![
                RawSnippet::new("a", "a[href]"),
                RawSnippet::new("bq", "blockquote"),
            ]
        }

        fn stylesheet_snippets(&self, _dialect: Dialect) -> Vec<CssSnippet> {
            vec![
                CssSnippet::new("dib", "display: inline-block", vec![]),
                CssSnippet::new("db", "display: block", vec![]),
            ]
        }
    }

    fn provider() -> AutocompleteProvider {
        AutocompleteProvider::new(Arc::new(StubExpander), Arc::new(StubSnippets))
    }

    fn html_editor(text: &str) -> Editor {
        Editor::new(EditorId(1), "text.html.basic", text)
    }

    #[test]
    fn test_no_suggestions_without_dialect() {
        let mut provider = provider();
        let mut editor = Editor::new(EditorId(1), "source.rust", "div");
        editor.set_cursor(Position::new(0, 3));
        let suggestions = provider.get_suggestions(
            &mut editor,
            &SuggestionRequest {
                position: Position::new(0, 3),
                activated_manually: true,
            },
        );
        assert!(suggestions.is_empty());
    }

    #[test]
    fn test_element_name_context_at_abbreviation_start() {
        let mut provider = provider();
        let mut editor = html_editor("a>b");
        editor.set_cursor(Position::new(0, 3));
        provider
            .markers_mut()
            .mark_abbreviation(&mut editor, Position::new(0, 3), Dialect::Html, &StubExpander)
            .unwrap();

        // Prefix "a" starting at offset 0
        assert!(provider.in_element_name_context(&editor, "a", Position::new(0, 1)));
    }

    #[test]
    fn test_element_name_context_after_operator() {
        let mut provider = provider();
        let mut editor = html_editor("a>b");
        editor.set_cursor(Position::new(0, 3));
        provider
            .markers_mut()
            .mark_abbreviation(&mut editor, Position::new(0, 3), Dialect::Html, &StubExpander)
            .unwrap();

        // Prefix "b" starts right after the `>` operator
        assert!(provider.in_element_name_context(&editor, "b", Position::new(0, 3)));
    }

    #[test]
    fn test_element_name_context_false_inside_content() {
        let mut provider = provider();
        let mut editor = html_editor("a.b");
        editor.set_cursor(Position::new(0, 3));
        provider
            .markers_mut()
            .mark_abbreviation(&mut editor, Position::new(0, 3), Dialect::Html, &StubExpander)
            .unwrap();

        // Prefix "b" at offset 2 follows `.`, which is not an element operator
        assert!(!provider.in_element_name_context(&editor, "b", Position::new(0, 3)));
    }

    #[test]
    fn test_element_name_context_without_marker() {
        let provider = provider();
        let editor = html_editor("a>b");
        assert!(!provider.in_element_name_context(&editor, "a", Position::new(0, 1)));
    }

    #[test]
    fn test_self_expanding_abbreviation_suppressed() {
        let mut provider = provider();
        let mut editor = Editor::new(EditorId(1), "source.pug", "li.item");
        editor.set_cursor(Position::new(0, 7));

        let suggestions = provider.get_suggestions(
            &mut editor,
            &SuggestionRequest {
                position: Position::new(0, 7),
                activated_manually: true,
            },
        );
        assert!(
            !suggestions
                .iter()
                .any(|s| s.kind == SuggestionKind::Abbreviation),
            "expansion identical to the buffer text must not be offered"
        );
    }

    #[test]
    fn test_master_switch_disables_auto_activation() {
        let mut provider = provider();
        provider.set_config(EngineConfig {
            auto_activate: false,
        });
        let mut editor = html_editor("div");
        editor.set_cursor(Position::new(0, 3));

        let auto = provider.get_suggestions(
            &mut editor,
            &SuggestionRequest {
                position: Position::new(0, 3),
                activated_manually: false,
            },
        );
        assert!(auto.is_empty());

        // Explicit activation still works
        let manual = provider.get_suggestions(
            &mut editor,
            &SuggestionRequest {
                position: Position::new(0, 3),
                activated_manually: true,
            },
        );
        assert!(manual
            .iter()
            .any(|s| s.kind == SuggestionKind::Abbreviation));
    }

    #[test]
    fn test_size_class_from_line_count() {
        assert_eq!(SizeClass::for_snippet("<br/>"), SizeClass::Regular);
        assert_eq!(SizeClass::for_snippet("<ul>\n</ul>"), SizeClass::Medium);
        assert_eq!(
            SizeClass::for_snippet("<ul>\n\t<li></li>\n</ul>"),
            SizeClass::Medium
        );
        assert_eq!(
            SizeClass::for_snippet("a\nb\nc\nd"),
            SizeClass::Small
        );
    }
}
