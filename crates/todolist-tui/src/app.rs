use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use todolist_core::filter::CategoryFilter;
use todolist_core::task::{Task, TaskId};
use todolist_service::HttpService;
use tokio::runtime::Runtime;

use crate::components::task_list::{InlineEdit, TaskList};
use crate::confirm::ModalAnswer;
use crate::controller::{Outcome, SyncController, DELETE_PROMPT};

/// Which input of a two-field form has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Category,
}

impl Field {
    fn toggle(self) -> Self {
        match self {
            Field::Title => Field::Category,
            Field::Category => Field::Title,
        }
    }
}

/// What the app is currently doing
#[derive(Debug, Clone)]
pub enum Mode {
    Normal,
    NewTask {
        title: String,
        category: String,
        field: Field,
    },
    /// The draft itself lives in the controller's edit session.
    EditTask {
        field: Field,
    },
    ConfirmDelete {
        task: Task,
    },
}

pub struct App {
    rt: Runtime,
    controller: SyncController<HttpService, ModalAnswer>,
    answer: ModalAnswer,
    list: TaskList,
    mode: Mode,
    status_message: Option<String>,
}

impl App {
    /// Build the app for `username` and load its tasks.
    ///
    /// Controller calls are driven to completion on a private current-thread
    /// runtime, so the caller must not already be inside a tokio runtime.
    pub fn new(service: HttpService, username: &str) -> Result<Self> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to start client runtime")?;
        let answer = ModalAnswer::default();
        let controller = SyncController::new(service, answer.clone(), username);

        let mut app = Self {
            rt,
            controller,
            answer,
            list: TaskList::new(),
            mode: Mode::Normal,
            status_message: None,
        };
        app.rt.block_on(app.controller.load_tasks());
        app.sync_selection(None);
        Ok(app)
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn controller(&self) -> &SyncController<HttpService, ModalAnswer> {
        &self.controller
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn selected_task(&self) -> Option<Task> {
        self.list
            .selected_task(&self.controller.visible_tasks())
            .cloned()
    }

    pub fn is_input_mode(&self) -> bool {
        matches!(self.mode, Mode::NewTask { .. } | Mode::EditTask { .. })
    }

    /// Clamp the cursor to the visible list, keeping `keep` highlighted if it
    /// is still visible.
    fn sync_selection(&mut self, keep: Option<TaskId>) {
        let visible = self.controller.visible_tasks();
        self.list.sync(visible.len());
        if let Some(id) = keep {
            self.list.select_task_by_id(&visible, &id);
        }
    }

    fn reload(&mut self) {
        let keep = self.selected_task().map(|t| t.id);
        self.rt.block_on(self.controller.load_tasks());
        self.sync_selection(keep);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.status_message = None;

        match self.mode.clone() {
            Mode::Normal => self.handle_normal(key),
            Mode::NewTask {
                title,
                category,
                field,
            } => self.handle_new_task(key, title, category, field),
            Mode::EditTask { field } => self.handle_edit_task(key, field),
            Mode::ConfirmDelete { task } => self.handle_confirm_delete(key, task),
        }
    }

    fn handle_normal(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('n') => {
                self.mode = Mode::NewTask {
                    title: String::new(),
                    category: String::new(),
                    field: Field::Title,
                };
            }
            KeyCode::Char(' ') => {
                if let Some(task) = self.selected_task() {
                    self.rt
                        .block_on(self.controller.toggle_complete(&task.id, task.completed));
                    self.sync_selection(Some(task.id));
                }
            }
            KeyCode::Char('e') => {
                if let Some(task) = self.selected_task() {
                    self.controller.start_edit(&task);
                    self.mode = Mode::EditTask { field: Field::Title };
                }
            }
            KeyCode::Char('d') => {
                if let Some(task) = self.selected_task() {
                    self.mode = Mode::ConfirmDelete { task };
                }
            }
            KeyCode::Char('f') => {
                let next = self.controller.state().status_filter.next();
                self.controller.set_status_filter(next);
                self.sync_selection(None);
                self.status_message = Some(format!("Status: {next}"));
            }
            KeyCode::Char('c') => {
                let next = self.next_category();
                self.status_message = Some(format!("Category: {next}"));
                self.controller.set_category_filter(next);
                self.sync_selection(None);
            }
            KeyCode::Char('r') => self.reload(),
            _ => {
                let len = self.controller.state().visible_tasks().len();
                self.list.handle_key(key, len);
            }
        }
    }

    /// The category after the current filter in picker order. A filter that
    /// no longer names a known category wraps back to "all".
    fn next_category(&self) -> CategoryFilter {
        let categories = self.controller.categories();
        let current = self.controller.state().category_filter.clone();
        let idx = categories
            .iter()
            .position(|c| c == current.as_str())
            .map_or(0, |i| (i + 1) % categories.len());
        categories
            .get(idx)
            .map(|c| CategoryFilter::from_str(c))
            .unwrap_or_default()
    }

    fn handle_new_task(
        &mut self,
        key: KeyEvent,
        mut title: String,
        mut category: String,
        field: Field,
    ) {
        let input = match field {
            Field::Title => &mut title,
            Field::Category => &mut category,
        };
        match key.code {
            KeyCode::Enter => {
                let outcome = self.rt.block_on(self.controller.add_task(&title, &category));
                if outcome == Outcome::Applied {
                    self.sync_selection(None);
                    self.status_message = Some("Task created".into());
                    self.mode = Mode::Normal;
                }
                return;
            }
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                return;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.mode = Mode::NewTask {
                    title,
                    category,
                    field: field.toggle(),
                };
                return;
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            _ => return,
        }
        self.mode = Mode::NewTask {
            title,
            category,
            field,
        };
    }

    fn handle_edit_task(&mut self, key: KeyEvent, field: Field) {
        let Some(draft) = self.controller.edit_draft() else {
            self.mode = Mode::Normal;
            return;
        };
        let mut text = match field {
            Field::Title => draft.title.clone(),
            Field::Category => draft.category.clone(),
        };
        match key.code {
            KeyCode::Enter => {
                let outcome = self.rt.block_on(self.controller.save_edit(&draft.task_id));
                if outcome == Outcome::Applied {
                    self.sync_selection(Some(draft.task_id));
                    self.status_message = Some("Task updated".into());
                    self.mode = Mode::Normal;
                }
                return;
            }
            KeyCode::Esc => {
                self.controller.cancel_edit();
                self.mode = Mode::Normal;
                return;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.mode = Mode::EditTask {
                    field: field.toggle(),
                };
                return;
            }
            KeyCode::Backspace => {
                text.pop();
            }
            KeyCode::Char(c) => text.push(c),
            _ => return,
        }
        match field {
            Field::Title => self.controller.update_draft_title(&text),
            Field::Category => self.controller.update_draft_category(&text),
        }
    }

    fn handle_confirm_delete(&mut self, key: KeyEvent, task: Task) {
        let accepted = matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y'));
        self.answer.answer(accepted);
        let outcome = self.rt.block_on(self.controller.delete_task(&task.id));
        if outcome == Outcome::Applied {
            self.sync_selection(None);
            self.status_message = Some(format!("Deleted: {}", task.title));
        }
        self.mode = Mode::Normal;
    }

    // ---- Rendering ----

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_title_bar(frame, layout[0]);
        self.render_filter_bar(frame, layout[1]);

        let visible = self.controller.visible_tasks();
        let draft = self.controller.edit_draft();
        let inline = match (&self.mode, draft.as_ref()) {
            (Mode::EditTask { field }, Some(draft)) => Some(InlineEdit {
                draft,
                category_active: *field == Field::Category,
            }),
            _ => None,
        };
        self.list.render(frame, layout[2], &visible, inline);

        self.render_status_bar(frame, layout[3]);

        match &self.mode {
            Mode::Normal | Mode::EditTask { .. } => {}
            Mode::NewTask {
                title,
                category,
                field,
            } => self.render_new_task(frame, title, category, *field, area),
            Mode::ConfirmDelete { task } => self.render_confirm_delete_dialog(frame, task, area),
        }
    }

    fn render_title_bar(&self, frame: &mut Frame, area: Rect) {
        let title = Line::from(vec![
            Span::styled(" todolist ", Style::default().bold().fg(Color::Cyan)),
            Span::raw("| "),
            Span::styled(self.controller.username(), Style::default().fg(Color::Yellow)),
        ]);
        frame.render_widget(title, area);
    }

    fn render_filter_bar(&self, frame: &mut Frame, area: Rect) {
        let state = self.controller.state();
        let line = Line::from(vec![
            Span::styled(" Status: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                state.status_filter.display_name(),
                Style::default().fg(Color::Green),
            ),
            Span::styled("  Category: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                state.category_filter.as_str().to_string(),
                Style::default().fg(Color::Magenta),
            ),
        ]);
        frame.render_widget(line, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        if let Some(ref msg) = self.status_message {
            let line = Line::from(Span::styled(
                format!(" {msg}"),
                Style::default().fg(Color::Green),
            ));
            frame.render_widget(line, area);
            return;
        }

        let hints = match &self.mode {
            Mode::Normal => vec![
                ("q", "quit"),
                ("j/k", "move"),
                ("n", "new"),
                ("space", "done"),
                ("e", "edit"),
                ("d", "del"),
                ("f", "status"),
                ("c", "category"),
                ("r", "reload"),
            ],
            Mode::NewTask { .. } => vec![("Tab", "next field"), ("Enter", "create"), ("Esc", "cancel")],
            Mode::EditTask { .. } => vec![("Tab", "next field"), ("Enter", "save"), ("Esc", "cancel")],
            Mode::ConfirmDelete { .. } => vec![("y", "confirm"), ("any", "cancel")],
        };

        let spans: Vec<Span> = hints
            .into_iter()
            .flat_map(|(key, desc)| {
                vec![
                    Span::styled(format!(" {key}"), Style::default().fg(Color::Yellow).bold()),
                    Span::raw(format!(" {desc} ")),
                ]
            })
            .collect();

        frame.render_widget(Line::from(spans), area);
    }

    fn render_new_task(
        &self,
        frame: &mut Frame,
        title: &str,
        category: &str,
        field: Field,
        area: Rect,
    ) {
        let input_area = Rect {
            x: area.x,
            y: area.y + area.height.saturating_sub(4),
            width: area.width,
            height: 4.min(area.height),
        };
        frame.render_widget(Clear, input_area);

        let label = |name: &'static str, active: bool| {
            let style = if active {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Span::styled(name, style)
        };
        let text = vec![
            Line::from(vec![label("Title:    ", field == Field::Title), Span::raw(title)]),
            Line::from(vec![
                label("Category: ", field == Field::Category),
                Span::raw(category),
            ]),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" New task ");
        frame.render_widget(Paragraph::new(text).block(block), input_area);
    }

    fn render_confirm_delete_dialog(&self, frame: &mut Frame, task: &Task, area: Rect) {
        let popup = centered_rect(50, 20, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Confirm Delete ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));

        let text = format!("{DELETE_PROMPT}\n\"{}\"\n\n(y)es / (any key) cancel", task.title);
        let paragraph = Paragraph::new(text)
            .block(block)
            .wrap(Wrap { trim: false })
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, popup);
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.controller.teardown();
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
