use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use todolist_core::edit::EditDraft;
use todolist_core::task::{Task, TaskId};

/// Draft rendered in place of the row being edited.
pub struct InlineEdit<'a> {
    pub draft: &'a EditDraft,
    pub category_active: bool,
}

/// Cursor over the visible tasks. The tasks themselves live in the
/// controller; this only tracks which row is highlighted.
#[derive(Debug, Default)]
pub struct TaskList {
    list_state: ListState,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    pub fn selected_task<'a>(&self, tasks: &'a [Task]) -> Option<&'a Task> {
        tasks.get(self.list_state.selected()?)
    }

    /// Keep the cursor inside a list of `len` rows.
    pub fn sync(&mut self, len: usize) {
        match self.list_state.selected() {
            _ if len == 0 => self.list_state.select(None),
            None => self.list_state.select(Some(0)),
            Some(idx) if idx >= len => self.list_state.select(Some(len - 1)),
            Some(_) => {}
        }
    }

    /// Move the cursor onto the task with `id`. Returns `false` and leaves the
    /// cursor alone if it is not among `tasks`.
    pub fn select_task_by_id(&mut self, tasks: &[Task], id: &TaskId) -> bool {
        match tasks.iter().position(|t| t.id == *id) {
            Some(idx) => {
                self.list_state.select(Some(idx));
                true
            }
            None => false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, len: usize) {
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        let current = self.list_state.selected().unwrap_or(0).min(len - 1);
        let next = match key.code {
            KeyCode::Char('j') | KeyCode::Down => (current + 1).min(len - 1),
            KeyCode::Char('k') | KeyCode::Up => current.saturating_sub(1),
            KeyCode::Char('g') | KeyCode::Home => 0,
            KeyCode::Char('G') | KeyCode::End => len - 1,
            _ => current,
        };
        self.list_state.select(Some(next));
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        tasks: &[Task],
        edit: Option<InlineEdit<'_>>,
    ) {
        let block = Block::default()
            .title(format!(" Tasks ({}) ", tasks.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        if tasks.is_empty() {
            let placeholder = Paragraph::new("No tasks")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(placeholder, area);
            return;
        }

        let items: Vec<ListItem> = tasks
            .iter()
            .map(|task| match edit {
                Some(ref inline) if inline.draft.task_id == task.id => edit_row(task, inline),
                _ => task_row(task),
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan).bold())
            .highlight_symbol("> ");

        let mut state = self.list_state.clone();
        frame.render_stateful_widget(list, area, &mut state);
    }
}

fn checkbox(task: &Task) -> Span<'static> {
    if task.completed {
        Span::styled("[x] ", Style::default().fg(Color::Green))
    } else {
        Span::styled("[ ] ", Style::default().fg(Color::DarkGray))
    }
}

fn task_row(task: &Task) -> ListItem<'_> {
    let title_style = if task.completed {
        Style::default().fg(Color::DarkGray).crossed_out()
    } else {
        Style::default()
    };
    ListItem::new(Line::from(vec![
        checkbox(task),
        Span::styled(task.title.as_str(), title_style),
        Span::styled(
            format!("  #{}", task.category),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(
            format!("  {}", task.created_at),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
}

fn edit_row<'a>(task: &Task, inline: &InlineEdit<'a>) -> ListItem<'a> {
    let active = Style::default().fg(Color::Yellow).underlined();
    let idle = Style::default().fg(Color::Yellow);
    let (title_style, category_style) = if inline.category_active {
        (idle, active)
    } else {
        (active, idle)
    };
    ListItem::new(Line::from(vec![
        checkbox(task),
        Span::styled(inline.draft.title.as_str(), title_style),
        Span::raw("  #"),
        Span::styled(inline.draft.category.as_str(), category_style),
    ]))
}
