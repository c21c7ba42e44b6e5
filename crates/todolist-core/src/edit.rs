use crate::task::{Task, TaskId};

/// Unsaved inline edit of one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub task_id: TaskId,
    pub title: String,
    pub category: String,
}

/// Single-slot holder for the task currently being edited.
///
/// Opening a session while another is open replaces it; the old draft is
/// returned to the caller and otherwise dropped.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    draft: Option<EditDraft>,
}

impl EditSession {
    pub fn open(&mut self, task: &Task) -> Option<EditDraft> {
        self.draft.replace(EditDraft {
            task_id: task.id.clone(),
            title: task.title.clone(),
            category: task.category.clone(),
        })
    }

    /// No-op when no session is open.
    pub fn update_draft_title(&mut self, text: impl Into<String>) {
        if let Some(draft) = self.draft.as_mut() {
            draft.title = text.into();
        }
    }

    /// No-op when no session is open.
    pub fn update_draft_category(&mut self, text: impl Into<String>) {
        if let Some(draft) = self.draft.as_mut() {
            draft.category = text.into();
        }
    }

    pub fn clear(&mut self) -> Option<EditDraft> {
        self.draft.take()
    }

    pub fn current(&self) -> Option<&EditDraft> {
        self.draft.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    pub fn is_editing(&self, id: &TaskId) -> bool {
        self.draft.as_ref().is_some_and(|d| d.task_id == *id)
    }
}
