//! Host editor model: document buffer, cursor, scope spans, tracked ranges,
//! and transactional undo.
//!
//! This is the engine's stand-in for the editor host it runs inside. It owns
//! the pieces the suggestion pipeline needs from a host:
//!
//! - buffer text with a single active cursor
//! - syntax scopes at a position (a root grammar scope plus positioned
//!   scope spans reported by the host's syntax layer)
//! - a live-range-tracking primitive: registered ranges are translated on
//!   every edit without bookkeeping by their owners
//! - transactions: edit groups that undo/redo as one step

mod history;

pub use history::{EditHistory, EditOp, Transaction};

use crate::buffer::{position_after, Position, Range, TextBuffer};
use std::collections::HashMap;

/// Identifies one editor instance across the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EditorId(pub u64);

/// Handle to a live tracked range registered with an editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangeId(u64);

/// A named syntax scope covering a buffer range.
///
/// How a host's syntax layer reports context: the scope name follows TextMate
/// conventions ("string.quoted.double.html", "meta.property-value.css").
#[derive(Debug, Clone)]
pub struct ScopeSpan {
    pub range: Range,
    pub scope: String,
}

impl ScopeSpan {
    pub fn new(range: Range, scope: impl Into<String>) -> Self {
        Self {
            range,
            scope: scope.into(),
        }
    }
}

/// Open transaction state: collected ops plus the cursor at entry.
#[derive(Debug)]
struct OpenTransaction {
    ops: Vec<EditOp>,
    cursor_before: Position,
}

/// The host editor model.
#[derive(Debug)]
pub struct Editor {
    id: EditorId,
    buffer: TextBuffer,
    cursor: Position,
    /// Root grammar scope, e.g. "text.html.basic" or "source.css"
    grammar: String,
    scope_spans: Vec<ScopeSpan>,
    tracked: HashMap<RangeId, Range>,
    next_range_id: u64,
    history: EditHistory,
    open_txn: Option<OpenTransaction>,
}

impl Editor {
    pub fn new(id: EditorId, grammar: impl Into<String>, text: &str) -> Self {
        Self {
            id,
            buffer: TextBuffer::from_text(text),
            cursor: Position::zero(),
            grammar: grammar.into(),
            scope_spans: Vec::new(),
            tracked: HashMap::new(),
            next_range_id: 0,
            history: EditHistory::new(),
            open_txn: None,
        }
    }

    pub fn id(&self) -> EditorId {
        self.id
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn text(&self) -> String {
        self.buffer.content()
    }

    pub fn text_in_range(&self, range: Range) -> String {
        self.buffer.text_in_range(range)
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn set_cursor(&mut self, pos: Position) {
        self.cursor = self.buffer.clamp_position(pos);
    }

    pub fn grammar(&self) -> &str {
        &self.grammar
    }

    pub fn set_grammar(&mut self, grammar: impl Into<String>) {
        self.grammar = grammar.into();
    }

    // =========================================================================
    // Scopes
    // =========================================================================

    /// Replace all scope spans (the host re-reports them after parsing).
    pub fn set_scope_spans(&mut self, spans: Vec<ScopeSpan>) {
        self.scope_spans = spans;
    }

    pub fn add_scope_span(&mut self, range: Range, scope: impl Into<String>) {
        self.scope_spans.push(ScopeSpan::new(range, scope));
    }

    /// Scope descriptor at a position: the root grammar scope first, then
    /// every span containing the position (endpoint-inclusive: the cursor
    /// sits between characters, so a span's trailing edge still applies).
    pub fn scopes_at(&self, pos: Position) -> Vec<&str> {
        let mut scopes = vec![self.grammar.as_str()];
        for span in &self.scope_spans {
            if span.range.contains_inclusive(pos) {
                scopes.push(span.scope.as_str());
            }
        }
        scopes
    }

    /// Check whether any scope at the cursor matches a scope selector prefix.
    ///
    /// Selector matching follows TextMate segment rules: "string.quoted"
    /// matches "string.quoted.double.html" but not "string.quotedish".
    pub fn has_scope(&self, selector: &str) -> bool {
        self.has_scope_at(self.cursor, selector)
    }

    pub fn has_scope_at(&self, pos: Position, selector: &str) -> bool {
        self.scopes_at(pos)
            .iter()
            .any(|scope| scope_matches(scope, selector))
    }

    // =========================================================================
    // Tracked ranges
    // =========================================================================

    /// Register a range for live tracking. The returned handle stays valid
    /// until [`Editor::untrack_range`]; the range is translated on every edit.
    pub fn track_range(&mut self, range: Range) -> RangeId {
        let id = RangeId(self.next_range_id);
        self.next_range_id += 1;
        self.tracked.insert(id, range);
        id
    }

    /// Current range for a tracking handle.
    pub fn range(&self, id: RangeId) -> Option<Range> {
        self.tracked.get(&id).copied()
    }

    pub fn untrack_range(&mut self, id: RangeId) {
        self.tracked.remove(&id);
    }

    #[cfg(test)]
    pub(crate) fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    // =========================================================================
    // Edits
    // =========================================================================

    /// Replace the text in a range. Records into the open transaction (or as
    /// a single-op transaction) and translates every tracked range, scope
    /// span, and the cursor across the edit.
    pub fn replace_range(&mut self, range: Range, text: &str) {
        self.apply_replace(range, text, true);
    }

    /// Insert text at a position.
    pub fn insert_text(&mut self, pos: Position, text: &str) {
        self.replace_range(Range::collapsed(pos), text);
    }

    /// Insert text at the cursor, as typing would. The cursor ends up after
    /// the inserted text via the same translation tracked ranges get.
    pub fn type_text(&mut self, text: &str) {
        self.insert_text(self.cursor, text);
    }

    /// Run `f` with all contained edits grouped into one undoable transaction.
    ///
    /// Nested calls flatten into the outermost transaction.
    pub fn transact(&mut self, f: impl FnOnce(&mut Editor)) {
        if self.open_txn.is_some() {
            f(self);
            return;
        }
        self.open_txn = Some(OpenTransaction {
            ops: Vec::new(),
            cursor_before: self.cursor,
        });
        f(self);
        let txn = self.open_txn.take().expect("transaction still open");
        if !txn.ops.is_empty() {
            self.history.push(Transaction {
                ops: txn.ops,
                cursor_before: txn.cursor_before,
                cursor_after: self.cursor,
            });
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Revert the most recent transaction. Restores the cursor captured
    /// before the transaction ran.
    pub fn undo(&mut self) -> bool {
        let Some(txn) = self.history.pop_undo() else {
            return false;
        };
        for op in txn.inverse().ops {
            self.apply_op(&op);
        }
        self.cursor = self.buffer.clamp_position(txn.cursor_before);
        true
    }

    /// Re-apply the most recently undone transaction.
    pub fn redo(&mut self) -> bool {
        let Some(txn) = self.history.pop_redo() else {
            return false;
        };
        for op in &txn.ops {
            self.apply_op(op);
        }
        self.cursor = self.buffer.clamp_position(txn.cursor_after);
        true
    }

    /// Apply a history op without recording it again.
    fn apply_op(&mut self, op: &EditOp) {
        let start = self.buffer.offset_to_position(op.offset);
        let end = position_after(start, &op.deleted_text);
        let current = self.buffer.text_in_range(Range { start, end });
        if current != op.deleted_text {
            tracing::warn!(
                offset = op.offset,
                expected = %op.deleted_text,
                found = %current,
                "history op does not match buffer content"
            );
        }
        self.apply_replace(Range { start, end }, &op.inserted_text, false);
    }

    fn apply_replace(&mut self, range: Range, text: &str, record: bool) {
        let range = Range::new(
            self.buffer.clamp_position(range.start),
            self.buffer.clamp_position(range.end),
        );
        let cursor_before = self.cursor;
        let offset = self.buffer.position_to_offset(range.start);
        let removed = self.buffer.replace(range, text);

        let old_end = range.end;
        let new_end = position_after(range.start, text);

        for tracked in self.tracked.values_mut() {
            let start = translate_position(tracked.start, range.start, old_end, new_end);
            let end = translate_position(tracked.end, range.start, old_end, new_end);
            *tracked = Range::new(start, end);
        }
        for span in &mut self.scope_spans {
            let start = translate_position(span.range.start, range.start, old_end, new_end);
            let end = translate_position(span.range.end, range.start, old_end, new_end);
            span.range = Range::new(start, end);
        }
        self.cursor = self
            .buffer
            .clamp_position(translate_position(self.cursor, range.start, old_end, new_end));

        if record {
            let op = EditOp::new(offset, removed, text.to_string());
            match &mut self.open_txn {
                Some(txn) => txn.ops.push(op),
                None => self.history.push(Transaction {
                    ops: vec![op],
                    cursor_before,
                    cursor_after: self.cursor,
                }),
            }
        }
    }
}

/// Translate a position across a replace of `[edit_start, old_end)` whose new
/// content ends at `new_end`.
///
/// Points before the edit are untouched; points at or after the old end shift
/// by the edit delta (a point exactly at a pure insertion ends up after the
/// inserted text, which is what keeps a marker growing as its abbreviation is
/// typed at the end); points inside the replaced span clamp to the new end.
fn translate_position(
    p: Position,
    edit_start: Position,
    old_end: Position,
    new_end: Position,
) -> Position {
    if p < edit_start {
        return p;
    }
    if p >= old_end {
        if p.line == old_end.line {
            return Position::new(new_end.line, new_end.column + (p.column - old_end.column));
        }
        return Position::new(p.line - old_end.line + new_end.line, p.column);
    }
    // interior points collapse onto the new end of the edit
    new_end
}

/// TextMate-style scope selector prefix match on dot-separated segments.
pub(crate) fn scope_matches(scope: &str, selector: &str) -> bool {
    scope == selector
        || (scope.starts_with(selector) && scope.as_bytes().get(selector.len()) == Some(&b'.'))
}
