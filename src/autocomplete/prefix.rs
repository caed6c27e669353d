//! Completion prefix extraction.
//!
//! The prefix is the longest token immediately before the cursor that could
//! be a snippet name. It is only used for named-snippet completions;
//! abbreviation detection goes through the span extractor instead.

use crate::buffer::Position;
use crate::editor::Editor;

/// Char class for markup snippet-name prefixes: word chars, `:`, `-`.
pub fn is_markup_prefix_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | ':' | '-')
}

/// Stylesheet prefixes additionally admit `@` (at-rules) and `$` (variables).
pub fn is_stylesheet_prefix_char(c: char) -> bool {
    is_markup_prefix_char(c) || matches!(c, '@' | '$')
}

/// Longest suffix of the text before `position` on its line whose characters
/// all satisfy `class`.
///
/// Returns the empty string when there is no match; callers treat that as
/// "no named-snippet prefix available". Never crosses a line boundary.
pub fn get_prefix(editor: &Editor, position: Position, class: fn(char) -> bool) -> String {
    let Some(line) = editor.buffer().line(position.line) else {
        return String::new();
    };
    let chars: Vec<char> = line.chars().collect();
    let col = position.column.min(chars.len());
    let mut start = col;
    while start > 0 && class(chars[start - 1]) {
        start -= 1;
    }
    chars[start..col].iter().collect()
}

/// Prefix for markup dialects.
pub fn markup_prefix(editor: &Editor, position: Position) -> String {
    get_prefix(editor, position, is_markup_prefix_char)
}

/// Prefix for stylesheet dialects.
pub fn stylesheet_prefix(editor: &Editor, position: Position) -> String {
    get_prefix(editor, position, is_stylesheet_prefix_char)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::EditorId;

    fn editor(text: &str) -> Editor {
        Editor::new(EditorId(1), "text.html.basic", text)
    }

    #[test]
    fn test_prefix_basic() {
        let ed = editor("hello div");
        assert_eq!(markup_prefix(&ed, Position::new(0, 9)), "div");
        assert_eq!(markup_prefix(&ed, Position::new(0, 8)), "di");
        assert_eq!(markup_prefix(&ed, Position::new(0, 6)), "");
    }

    #[test]
    fn test_prefix_admits_colon_and_hyphen() {
        let ed = editor("x fig-caption");
        assert_eq!(markup_prefix(&ed, Position::new(0, 13)), "fig-caption");
        let ed = editor("xsl:tmpl");
        assert_eq!(markup_prefix(&ed, Position::new(0, 8)), "xsl:tmpl");
    }

    #[test]
    fn test_stylesheet_prefix_admits_at_and_dollar() {
        let ed = editor("  @media");
        assert_eq!(stylesheet_prefix(&ed, Position::new(0, 8)), "@media");
        assert_eq!(markup_prefix(&ed, Position::new(0, 8)), "media");

        let ed = editor("color: $base");
        assert_eq!(stylesheet_prefix(&ed, Position::new(0, 12)), "$base");
    }

    #[test]
    fn test_prefix_empty_on_no_match() {
        let ed = editor("foo ");
        assert_eq!(markup_prefix(&ed, Position::new(0, 4)), "");
        let ed = editor("");
        assert_eq!(markup_prefix(&ed, Position::new(0, 0)), "");
    }

    #[test]
    fn test_prefix_never_crosses_lines() {
        let ed = editor("div\nspan");
        // Column 0 of line 1: nothing to the left on that line
        assert_eq!(markup_prefix(&ed, Position::new(1, 0)), "");
        assert_eq!(markup_prefix(&ed, Position::new(1, 4)), "span");
    }

    #[test]
    fn test_prefix_idempotent() {
        let ed = editor("ul>li");
        let first = markup_prefix(&ed, Position::new(0, 5));
        let second = markup_prefix(&ed, Position::new(0, 5));
        assert_eq!(first, "li");
        assert_eq!(first, second);
    }
}
