//! Task cache and the synchronization policy around it.
//!
//! [`SyncController`] is the only writer of the cached task list. Every
//! mutation goes to the remote service first and, on success, is followed by
//! a full reload; nothing is patched locally. Remote failures are logged and
//! otherwise swallowed.
//!
//! Operations take `&self` so several may be in flight at once on a single
//! thread (e.g. under `tokio::join!`). State borrows never span an `.await`;
//! whichever reload finishes last decides the cache.

use std::cell::{Cell, Ref, RefCell};

use todolist_core::edit::{EditDraft, EditSession};
use todolist_core::filter::{derive_categories, filter_tasks, CategoryFilter, StatusFilter};
use todolist_core::task::{is_blank, CreateTask, Task, TaskId, UpdateTask};
use todolist_service::TaskService;
use tracing::{debug, warn};

use crate::confirm::Confirm;

pub const DELETE_PROMPT: &str = "Delete this task?";

/// Everything the task screen renders from.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub tasks: Vec<Task>,
    pub status_filter: StatusFilter,
    pub category_filter: CategoryFilter,
    pub edit: EditSession,
}

impl ViewState {
    pub fn visible_tasks(&self) -> Vec<&Task> {
        filter_tasks(&self.tasks, self.status_filter, &self.category_filter)
    }

    pub fn categories(&self) -> Vec<String> {
        derive_categories(&self.tasks)
    }
}

/// What became of a requested operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The remote call succeeded (the follow-up reload may still have failed).
    Applied,
    /// Nothing was sent: blank input, declined confirmation, no open edit, or
    /// the controller was torn down.
    Skipped,
    /// The remote call failed; the failure was logged.
    Failed,
}

/// Counts a remote call as in flight until dropped.
struct InFlight<'a>(&'a Cell<usize>);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a Cell<usize>) -> Self {
        counter.set(counter.get() + 1);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

pub struct SyncController<S, C> {
    service: S,
    confirm: C,
    username: String,
    state: RefCell<ViewState>,
    pending: Cell<usize>,
    torn_down: Cell<bool>,
}

impl<S: TaskService, C: Confirm> SyncController<S, C> {
    /// Controller with an empty cache. Call [`Self::load_tasks`] to populate it.
    pub fn new(service: S, confirm: C, username: &str) -> Self {
        Self {
            service,
            confirm,
            username: username.to_string(),
            state: RefCell::new(ViewState::default()),
            pending: Cell::new(0),
            torn_down: Cell::new(false),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Borrow the current view state. Do not hold across an `.await`.
    pub fn state(&self) -> Ref<'_, ViewState> {
        self.state.borrow()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.state.borrow().tasks.clone()
    }

    pub fn visible_tasks(&self) -> Vec<Task> {
        self.state
            .borrow()
            .visible_tasks()
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn categories(&self) -> Vec<String> {
        self.state.borrow().categories()
    }

    pub fn edit_draft(&self) -> Option<EditDraft> {
        self.state.borrow().edit.current().cloned()
    }

    /// Remote calls issued and not yet completed.
    pub fn pending_requests(&self) -> usize {
        self.pending.get()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.get()
    }

    /// Stop accepting work. Completions arriving afterwards are discarded.
    pub fn teardown(&self) {
        debug!("sync controller for {} torn down", self.username);
        self.torn_down.set(true);
    }

    // -- Filters --

    pub fn set_status_filter(&self, status: StatusFilter) {
        self.state.borrow_mut().status_filter = status;
    }

    pub fn set_category_filter(&self, category: CategoryFilter) {
        self.state.borrow_mut().category_filter = category;
    }

    // -- Remote operations --

    /// Replace the cache with the server's list. On failure the cache is kept.
    pub async fn load_tasks(&self) -> Outcome {
        if self.torn_down.get() {
            debug!("load skipped: controller torn down");
            return Outcome::Skipped;
        }

        let result = {
            let _in_flight = InFlight::enter(&self.pending);
            self.service.list_tasks(&self.username).await
        };

        match result {
            Ok(tasks) => {
                if self.torn_down.get() {
                    debug!("discarding {} tasks loaded after teardown", tasks.len());
                    return Outcome::Skipped;
                }
                debug!("loaded {} tasks", tasks.len());
                self.state.borrow_mut().tasks = tasks;
                Outcome::Applied
            }
            Err(e) => {
                warn!("failed to load tasks: {e}");
                Outcome::Failed
            }
        }
    }

    pub async fn add_task(&self, title: &str, category: &str) -> Outcome {
        if is_blank(title) {
            debug!("add skipped: blank title");
            return Outcome::Skipped;
        }
        let input = CreateTask::new(&self.username, title, category);
        self.write("add task", self.service.create_task(&input))
            .await
    }

    pub async fn toggle_complete(&self, id: &TaskId, currently_completed: bool) -> Outcome {
        let update = UpdateTask::completed(!currently_completed);
        self.write("toggle task", self.service.update_task(id, &update))
            .await
    }

    /// Delete after the confirmation capability accepts.
    pub async fn delete_task(&self, id: &TaskId) -> Outcome {
        if self.torn_down.get() {
            return Outcome::Skipped;
        }
        if !self.confirm.confirm(DELETE_PROMPT) {
            debug!("delete of task {id} declined");
            return Outcome::Skipped;
        }
        self.write("delete task", self.service.delete_task(id)).await
    }

    // -- Edit session --

    /// Open an edit session for `task`, replacing any session already open.
    pub fn start_edit(&self, task: &Task) {
        if let Some(previous) = self.state.borrow_mut().edit.open(task) {
            debug!("discarded unsaved edit of task {}", previous.task_id);
        }
    }

    pub fn update_draft_title(&self, text: &str) {
        self.state.borrow_mut().edit.update_draft_title(text);
    }

    pub fn update_draft_category(&self, text: &str) {
        self.state.borrow_mut().edit.update_draft_category(text);
    }

    /// Send the open draft as an update of task `id`.
    ///
    /// A blank draft title leaves the session as it is. The session closes only
    /// when the server accepts the update.
    pub async fn save_edit(&self, id: &TaskId) -> Outcome {
        let Some(draft) = self.edit_draft() else {
            debug!("save skipped: no edit in progress");
            return Outcome::Skipped;
        };
        if is_blank(&draft.title) {
            debug!("save skipped: blank title");
            return Outcome::Skipped;
        }
        let update = UpdateTask::details(&draft.title, &draft.category);
        self.write_then(
            "save task",
            self.service.update_task(id, &update),
            || {
                self.state.borrow_mut().edit.clear();
            },
        )
        .await
    }

    pub fn cancel_edit(&self) {
        self.state.borrow_mut().edit.clear();
    }

    // -- Reload-after-write --

    async fn write<F>(&self, op: &str, call: F) -> Outcome
    where
        F: std::future::Future<Output = Result<(), todolist_service::ServiceError>>,
    {
        self.write_then(op, call, || {}).await
    }

    /// Run `call`; on success apply `on_success` and reload the full list.
    async fn write_then<F, A>(&self, op: &str, call: F, on_success: A) -> Outcome
    where
        F: std::future::Future<Output = Result<(), todolist_service::ServiceError>>,
        A: FnOnce(),
    {
        if self.torn_down.get() {
            debug!("{op} skipped: controller torn down");
            return Outcome::Skipped;
        }

        let result = {
            let _in_flight = InFlight::enter(&self.pending);
            call.await
        };

        match result {
            Ok(()) => {
                if self.torn_down.get() {
                    debug!("{op} completed after teardown");
                    return Outcome::Applied;
                }
                on_success();
                self.load_tasks().await;
                Outcome::Applied
            }
            Err(e) => {
                warn!("failed to {op}: {e}");
                Outcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_flight_counter_is_released_on_drop() {
        let counter = Cell::new(0);
        {
            let _a = InFlight::enter(&counter);
            let _b = InFlight::enter(&counter);
            assert_eq!(counter.get(), 2);
        }
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn view_state_derives_from_cache_and_filters() {
        let mut state = ViewState::default();
        state.tasks = vec![
            Task {
                id: TaskId::from(1),
                title: "a".into(),
                category: "work".into(),
                completed: true,
                created_at: String::new(),
            },
            Task {
                id: TaskId::from(2),
                title: "b".into(),
                category: "home".into(),
                completed: false,
                created_at: String::new(),
            },
        ];
        assert_eq!(state.categories(), vec!["all", "work", "home"]);

        state.status_filter = StatusFilter::Pending;
        let visible = state.visible_tasks();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "b");
    }
}
