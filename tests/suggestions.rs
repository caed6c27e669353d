//! Suggestion assembly tests - dialect gating, prefix filtering, caching

mod common;

use std::sync::Arc;

use common::{css_editor, html_editor, provider, provider_with, request, FixtureSnippets};
use zencomplete::autocomplete::SuggestionKind;
use zencomplete::editor::{Editor, EditorId};
use zencomplete::{Position, Range};

// ========================================================================
// Markup suggestions
// ========================================================================

#[test]
fn test_markup_abbreviation_without_named_snippets() {
    // Auto-activation, no prior marker: the request itself marks `ul>li`
    // and offers exactly its expansion. No registry name starts with "li",
    // so no named snippets show up alongside.
    let mut provider = provider();
    let mut editor = html_editor("ul>li", 0, 5);

    let suggestions = provider.get_suggestions(&mut editor, &request(0, 5, false));

    assert_eq!(suggestions.len(), 1);
    let abbr = &suggestions[0];
    assert_eq!(abbr.kind, SuggestionKind::Abbreviation);
    assert_eq!(abbr.payload, "<ul>\n\t<li>${1}</li>\n</ul>");
    assert_eq!(abbr.replacement_prefix, "ul>li");
    assert!(abbr.marker.is_some());
}

#[test]
fn test_markup_named_snippets_in_element_context() {
    // Caret right after the `>` operator: element-name context, so names
    // starting with the prefix are offered after the abbreviation.
    let mut provider = provider();
    let mut editor = html_editor("ul>pic", 0, 6);

    let suggestions = provider.get_suggestions(&mut editor, &request(0, 6, false));

    assert_eq!(suggestions[0].kind, SuggestionKind::Abbreviation);
    let named: Vec<_> = suggestions
        .iter()
        .filter(|s| s.kind == SuggestionKind::NamedSnippet)
        .collect();
    assert_eq!(named.len(), 1);
    assert_eq!(named[0].display_text, "pic");
    assert_eq!(named[0].payload, "pic");
    assert_eq!(named[0].replacement_prefix, "pic");
    assert_eq!(named[0].right_label.as_deref(), Some("<picture></picture>"));
}

#[test]
fn test_no_suggestions_for_unknown_grammar() {
    let mut provider = provider();
    let mut editor = Editor::new(EditorId(9), "source.rust", "div");
    editor.set_cursor(Position::new(0, 3));

    let suggestions = provider.get_suggestions(&mut editor, &request(0, 3, true));
    assert!(suggestions.is_empty());
}

#[test]
fn test_auto_activation_vetoed_inside_string() {
    let mut provider = provider();
    let mut editor = html_editor("<a href=\"div\">", 0, 12);
    editor.add_scope_span(
        Range::new(Position::new(0, 9), Position::new(0, 12)),
        "string.quoted.double.html",
    );

    let auto = provider.get_suggestions(&mut editor, &request(0, 12, false));
    assert!(auto.is_empty());
}

// ========================================================================
// Stylesheet suggestions
// ========================================================================

#[test]
fn test_stylesheet_prefix_filtering() {
    // Prefix "di" in property-name position: named snippets filtered to
    // names starting with "di". "di" itself is no valid abbreviation, so
    // there is no abbreviation candidate.
    let mut provider = provider();
    let mut editor = css_editor("a { di }", 0, 6);

    let suggestions = provider.get_suggestions(&mut editor, &request(0, 6, false));

    assert!(!suggestions.is_empty());
    assert!(suggestions
        .iter()
        .all(|s| s.kind == SuggestionKind::NamedSnippet));
    let names: Vec<_> = suggestions.iter().map(|s| s.display_text.as_str()).collect();
    assert_eq!(names, vec!["dib", "dif"]);
}

#[test]
fn test_stylesheet_keyword_preview_and_hint() {
    let mut provider = provider();
    let mut editor = css_editor("a { d }", 0, 5);

    let suggestions = provider.get_suggestions(&mut editor, &request(0, 5, false));

    let d = suggestions
        .iter()
        .find(|s| s.display_text == "d")
        .expect("completion for `d`");
    assert_eq!(d.right_label.as_deref(), Some("display block | none"));
    assert!(d.hint.is_some());
}

#[test]
fn test_stylesheet_suppressed_in_property_value() {
    let mut provider = provider();
    let mut editor = css_editor("a { display: di }", 0, 15);
    editor.add_scope_span(
        Range::new(Position::new(0, 12), Position::new(0, 16)),
        "meta.property-value.css",
    );

    let suggestions = provider.get_suggestions(&mut editor, &request(0, 15, false));
    assert!(suggestions
        .iter()
        .all(|s| s.kind != SuggestionKind::NamedSnippet));
}

#[test]
fn test_stylesheet_abbreviation_expands() {
    let mut provider = provider();
    let mut editor = css_editor("a { dib }", 0, 7);

    let suggestions = provider.get_suggestions(&mut editor, &request(0, 7, false));

    let abbr = suggestions
        .iter()
        .find(|s| s.kind == SuggestionKind::Abbreviation)
        .expect("abbreviation candidate for `dib`");
    assert_eq!(abbr.payload, "display: inline-block;");
}

// ========================================================================
// Completion cache behavior
// ========================================================================

#[test]
fn test_snippet_list_built_once_per_dialect() {
    let snippets = Arc::new(FixtureSnippets::default());
    let mut provider = provider_with(snippets.clone());

    let mut editor = css_editor("a { di }", 0, 6);
    let first = provider.get_suggestions(&mut editor, &request(0, 6, false));
    let second = provider.get_suggestions(&mut editor, &request(0, 6, false));

    assert_eq!(snippets.stylesheet_builds.get(), 1);
    let names = |s: &[zencomplete::Suggestion]| {
        s.iter().map(|c| c.display_text.clone()).collect::<Vec<_>>()
    };
    assert_eq!(names(&first), names(&second));
}

#[test]
fn test_cache_cleared_on_user_snippets_change() {
    let snippets = Arc::new(FixtureSnippets::default());
    let mut provider = provider_with(snippets.clone());
    let mut editor = css_editor("a { di }", 0, 6);

    provider.get_suggestions(&mut editor, &request(0, 6, false));
    provider.set_user_snippets(
        zencomplete::UserSnippets::from_json(r#"{ "stylesheet": { "dig": "display: grid;" } }"#)
            .unwrap(),
    );
    let after = provider.get_suggestions(&mut editor, &request(0, 6, false));

    assert_eq!(snippets.stylesheet_builds.get(), 2);
    assert!(after.iter().any(|s| s.display_text == "dig"));
}

#[test]
fn test_user_markup_override_changes_preview() {
    let mut provider = provider();
    provider.set_user_snippets(
        zencomplete::UserSnippets::from_json(r#"{ "markup": { "pic": "div" } }"#).unwrap(),
    );
    let mut editor = html_editor("ul>pic", 0, 6);

    let suggestions = provider.get_suggestions(&mut editor, &request(0, 6, false));
    let pic = suggestions
        .iter()
        .find(|s| s.display_text == "pic")
        .expect("overridden completion");
    assert_eq!(pic.right_label.as_deref(), Some("<div></div>"));
}
