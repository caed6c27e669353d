//! zencomplete - abbreviation-expansion autocomplete engine
//!
//! This crate provides the marker lifecycle and context-aware autocomplete
//! engine behind abbreviation expansion ("zen coding") for markup and
//! stylesheet editing: deciding per keystroke whether an abbreviation is at
//! the cursor, tracking its span as a live buffer range across edits,
//! resolving the dialect and snippet universe for the cursor's context, and
//! reconciling the host's generic suggestion insertion with the
//! abbreviation's range-replacing semantics.
//!
//! The abbreviation grammar/expansion engine and the per-dialect snippet
//! registry are injected collaborators; see [`snippets::AbbreviationExpander`]
//! and [`snippets::SnippetSource`].

pub mod autocomplete;
pub mod buffer;
pub mod config;
pub mod config_paths;
pub mod editor;
pub mod marker;
pub mod snippets;
pub mod syntax;
pub mod tracing;
pub mod util;

// Re-export commonly used types
pub use autocomplete::{
    AutocompleteProvider, SizeClass, Suggestion, SuggestionKind, SuggestionRequest,
};
pub use buffer::{Position, Range, TextBuffer};
pub use config::EngineConfig;
pub use editor::{Editor, EditorId, ScopeSpan};
pub use marker::{AbbreviationMarker, MarkerId, MarkerRegistry};
pub use snippets::{
    AbbreviationExpander, CompletionCache, CssSnippet, ExpandOptions, RawSnippet, SnippetSource,
    UserSnippets,
};
pub use syntax::{detect_syntax, has_auto_activate_context, Dialect};
