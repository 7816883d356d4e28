use crate::document::Document;

/// One history item: a full deep-cloned document snapshot plus the comment
/// shown in the undo menu. Documents here are small enough that snapshot
/// cloning beats per-field diffing; undo is just a swap.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub document: Document,
    pub comment: String,
}

/// Undo/redo stacks of document snapshots.
///
/// The stacks are mutually exclusive: any new commit clears the redo stack.
/// `undo`/`redo` are no-ops on an empty stack; callers gate UI affordances
/// on `can_undo`/`can_redo`.
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Record the state displaced by a commit. Clears the redo stack.
    pub fn push(&mut self, pre_commit: Document, comment: &str) {
        self.undo_stack.push(HistoryEntry {
            document: pre_commit,
            comment: comment.to_string(),
        });
        self.redo_stack.clear();
    }

    /// Swap the live document with the top undo snapshot. Returns the
    /// comment of the restored entry, or `None` if there was nothing to undo.
    pub fn undo(&mut self, live: &mut Document) -> Option<String> {
        let entry = self.undo_stack.pop()?;
        self.redo_stack.push(HistoryEntry {
            document: std::mem::replace(live, entry.document),
            comment: entry.comment.clone(),
        });
        Some(entry.comment)
    }

    /// Swap the live document with the top redo snapshot.
    pub fn redo(&mut self, live: &mut Document) -> Option<String> {
        let entry = self.redo_stack.pop()?;
        self.undo_stack.push(HistoryEntry {
            document: std::mem::replace(live, entry.document),
            comment: entry.comment.clone(),
        });
        Some(entry.comment)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_comment(&self) -> Option<&str> {
        self.undo_stack.last().map(|e| e.comment.as_str())
    }

    pub fn redo_comment(&self) -> Option<&str> {
        self.redo_stack.last().map(|e| e.comment.as_str())
    }

    pub fn depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
