//! Snippet collaborator interfaces, completion cache, and user overrides.

mod cache;
mod registry;
mod user;

pub use cache::{filter_by_prefix, CompletionCache, SnippetCompletion};
pub use registry::{
    plain_field, snippet_field, AbbreviationExpander, CssSnippet, ExpandOptions, FieldRenderer,
    RawSnippet, SnippetSource,
};
pub use user::UserSnippets;
