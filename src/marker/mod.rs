//! Abbreviation markers and the per-editor marker registry.
//!
//! A marker is one candidate abbreviation span tracked in a live buffer. Its
//! range rides the editor's tracked-range primitive, so edits move it without
//! bookkeeping here; its abbreviation text and expanded snippet are snapshots
//! taken at mark time and refreshed only through re-validation.
//!
//! At most one live marker exists per editor; marking replaces any prior one.

mod extract;

pub use extract::{extract_abbreviation, Extracted};

use std::collections::HashMap;

use crate::buffer::{Position, Range};
use crate::editor::{Editor, EditorId, RangeId};
use crate::snippets::{AbbreviationExpander, ExpandOptions};
use crate::syntax::Dialect;

/// Identifies a marker across the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(u64);

/// One candidate abbreviation span tracked in a live buffer.
#[derive(Debug, Clone)]
pub struct AbbreviationMarker {
    id: MarkerId,
    editor: EditorId,
    range_id: RangeId,
    abbreviation: String,
    snippet: String,
    dialect: Dialect,
    destroyed: bool,
}

impl AbbreviationMarker {
    pub fn id(&self) -> MarkerId {
        self.id
    }

    pub fn editor(&self) -> EditorId {
        self.editor
    }

    /// The shorthand text as last computed from the buffer.
    pub fn abbreviation(&self) -> &str {
        &self.abbreviation
    }

    /// The expanded snippet computed for [`Self::abbreviation`].
    pub fn snippet(&self) -> &str {
        &self.snippet
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Current tracked range in the owning editor.
    pub fn range(&self, editor: &Editor) -> Option<Range> {
        if self.destroyed {
            return None;
        }
        editor.range(self.range_id)
    }
}

/// Owns the live abbreviation markers across all open editors.
#[derive(Debug, Default)]
pub struct MarkerRegistry {
    markers: HashMap<EditorId, AbbreviationMarker>,
    next_id: u64,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self {
            markers: HashMap::new(),
            next_id: 0,
        }
    }

    /// The live marker whose range contains `position` (default: the
    /// editor's cursor), if any. Containment counts both endpoints.
    pub fn find_marker(
        &self,
        editor: &Editor,
        position: Option<Position>,
    ) -> Option<&AbbreviationMarker> {
        let pos = position.unwrap_or_else(|| editor.cursor());
        let marker = self.markers.get(&editor.id())?;
        if marker.destroyed {
            return None;
        }
        let range = editor.range(marker.range_id)?;
        range.contains_inclusive(pos).then_some(marker)
    }

    /// Marker lookup by id, across editors. Destroyed markers are gone.
    pub fn get(&self, id: MarkerId) -> Option<&AbbreviationMarker> {
        self.markers
            .values()
            .find(|m| m.id == id && !m.destroyed)
    }

    /// Try to mark an abbreviation at `position`.
    ///
    /// Extracts a plausible span from the line, validates it by attempting
    /// expansion (a parse failure is a quiet no-match), and replaces any
    /// prior marker for this editor. Callers only invoke this inside a
    /// completion request the host made, never from the buffer-change
    /// notification path, so the extraction cost stays bounded.
    pub fn mark_abbreviation(
        &mut self,
        editor: &mut Editor,
        position: Position,
        dialect: Dialect,
        expander: &dyn AbbreviationExpander,
    ) -> Option<MarkerId> {
        let line = editor.buffer().line(position.line)?.into_owned();
        let extracted = extract_abbreviation(&line, position.column)?;

        let options = ExpandOptions::for_insertion(dialect);
        let snippet = match expander.expand(&extracted.abbreviation, &options) {
            Ok(snippet) => snippet,
            Err(e) => {
                tracing::debug!(
                    abbreviation = %extracted.abbreviation,
                    "abbreviation did not parse: {e}"
                );
                return None;
            }
        };

        self.clear(editor);

        let range = Range::new(
            Position::new(position.line, extracted.start),
            Position::new(position.line, extracted.end),
        );
        let range_id = editor.track_range(range);
        let id = MarkerId(self.next_id);
        self.next_id += 1;

        tracing::debug!(abbreviation = %extracted.abbreviation, %range, "marked abbreviation");
        self.markers.insert(
            editor.id(),
            AbbreviationMarker {
                id,
                editor: editor.id(),
                range_id,
                abbreviation: extracted.abbreviation,
                snippet,
                dialect,
                destroyed: false,
            },
        );
        Some(id)
    }

    /// Destroy a marker by id. A stale id is a no-op.
    pub fn destroy(&mut self, editor: &mut Editor, id: MarkerId) {
        let is_current = self
            .markers
            .get(&editor.id())
            .is_some_and(|marker| marker.id == id);
        if is_current {
            if let Some(marker) = self.markers.remove(&editor.id()) {
                editor.untrack_range(marker.range_id);
                tracing::debug!(abbreviation = %marker.abbreviation, "destroyed marker");
            }
        }
    }

    /// Remove the editor's marker, if any.
    pub fn clear(&mut self, editor: &mut Editor) {
        if let Some(marker) = self.markers.remove(&editor.id()) {
            editor.untrack_range(marker.range_id);
        }
    }

    /// Re-validate the editor's marker after a buffer change.
    ///
    /// The range has already been translated by the editor; what needs
    /// checking is whether its current text still parses as an abbreviation.
    /// Success refreshes the text/snippet snapshots, failure (or an emptied
    /// range) destroys the marker.
    pub fn handle_buffer_change(
        &mut self,
        editor: &mut Editor,
        expander: &dyn AbbreviationExpander,
    ) {
        let Some((range_id, dialect)) = self
            .markers
            .get(&editor.id())
            .map(|marker| (marker.range_id, marker.dialect))
        else {
            return;
        };
        let Some(range) = editor.range(range_id) else {
            self.clear(editor);
            return;
        };

        let text = editor.text_in_range(range);
        if text.is_empty() || text.contains('\n') {
            self.clear(editor);
            return;
        }

        let options = ExpandOptions::for_insertion(dialect);
        match expander.expand(&text, &options) {
            Ok(snippet) => {
                if let Some(marker) = self.markers.get_mut(&editor.id()) {
                    marker.abbreviation = text;
                    marker.snippet = snippet;
                }
            }
            Err(e) => {
                tracing::debug!(abbreviation = %text, "marker invalidated by edit: {e}");
                self.clear(editor);
            }
        }
    }

    /// Drop state for a disposed editor. Its tracked ranges died with it.
    pub fn editor_disposed(&mut self, editor: EditorId) {
        self.markers.remove(&editor);
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }
}
