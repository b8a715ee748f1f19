//! Drag-and-drop reordering gesture.

use super::order_editor::OrderedItemListEditor;

/// State of a reorder drag.
///
/// The live order is updated on every hover, so dropping or cancelling
/// simply ends the gesture; there is nothing to revert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragGesture {
    /// No drag in progress.
    #[default]
    Idle,
    /// An entry is being dragged; `index` is where it currently sits.
    Dragging {
        /// Current index of the dragged entry.
        index: usize,
    },
}

impl DragGesture {
    /// Starts dragging the entry at `index`.
    ///
    /// Ignored while another drag is active or when `index` is out of range.
    pub const fn begin(&mut self, index: usize, len: usize) -> bool {
        if matches!(self, Self::Idle) && index < len {
            *self = Self::Dragging { index };
            true
        } else {
            false
        }
    }

    /// Moves the dragged entry over `target`, returning its new index if it moved.
    pub fn hover(&mut self, editor: &mut OrderedItemListEditor, target: usize) -> Option<usize> {
        let Self::Dragging { index } = *self else {
            return None;
        };

        let moved = editor.move_entry(index, target)?;
        *self = Self::Dragging { index: moved };
        Some(moved)
    }

    /// Ends the drag, returning where the entry was dropped.
    pub const fn release(&mut self) -> Option<usize> {
        let dropped = self.dragging_index();
        *self = Self::Idle;
        dropped
    }

    /// Abandons the drag. Returns whether one was active.
    pub const fn cancel(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        *self = Self::Idle;
        was_dragging
    }

    /// Index of the dragged entry, if dragging.
    #[must_use]
    pub const fn dragging_index(&self) -> Option<usize> {
        match self {
            Self::Idle => None,
            Self::Dragging { index } => Some(*index),
        }
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiweave_domain::{GlobalPolicy, Item};
    use pretty_assertions::assert_eq;

    fn editor() -> OrderedItemListEditor {
        OrderedItemListEditor::initialize(
            vec![Item::new("A", "a"), Item::new("B", "b"), Item::new("C", "c")],
            None,
            GlobalPolicy::default(),
        )
    }

    fn ids(editor: &OrderedItemListEditor) -> Vec<&str> {
        editor.order().item_ids().collect()
    }

    #[test]
    fn test_begin_requires_idle_and_valid_index() {
        let mut drag = DragGesture::default();

        assert!(!drag.begin(3, 3));
        assert_eq!(drag, DragGesture::Idle);

        assert!(drag.begin(1, 3));
        assert!(!drag.begin(0, 3));
        assert_eq!(drag.dragging_index(), Some(1));
    }

    #[test]
    fn test_hover_follows_the_dragged_entry() {
        let mut editor = editor();
        let mut drag = DragGesture::default();
        drag.begin(0, editor.order().len());

        assert_eq!(drag.hover(&mut editor, 1), Some(1));
        assert_eq!(drag.hover(&mut editor, 1), None);
        assert_eq!(drag.hover(&mut editor, 10), Some(2));

        assert_eq!(ids(&editor), vec!["B", "C", "A"]);
        assert_eq!(drag, DragGesture::Dragging { index: 2 });
    }

    #[test]
    fn test_hover_while_idle_does_nothing() {
        let mut editor = editor();
        let mut drag = DragGesture::default();

        assert_eq!(drag.hover(&mut editor, 2), None);
        assert_eq!(ids(&editor), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_release_and_cancel_keep_live_order() {
        let mut editor = editor();
        let mut drag = DragGesture::default();

        drag.begin(2, 3);
        drag.hover(&mut editor, 0);
        assert_eq!(drag.release(), Some(0));
        assert_eq!(drag, DragGesture::Idle);
        assert_eq!(ids(&editor), vec!["C", "A", "B"]);

        drag.begin(0, 3);
        drag.hover(&mut editor, 1);
        assert!(drag.cancel());
        assert!(!drag.cancel());
        assert_eq!(ids(&editor), vec!["A", "C", "B"]);
        assert_eq!(drag.release(), None);
    }
}
