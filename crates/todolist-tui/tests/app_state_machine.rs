//! State machine tests for the TUI App.
//!
//! Each test spawns a test server on a separate thread (the App drives its own
//! current-thread runtime, so the server cannot share it), registers a user,
//! seeds tasks, builds an App and simulates key events.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use todolist_core::filter::{CategoryFilter, StatusFilter};
use todolist_core::task::{CreateTask, UNCATEGORIZED};
use todolist_core::user::Registration;
use todolist_service::{HttpService, TaskService};
use todolist_tui::app::{App, Field, Mode};

const USER: &str = "alice";

/// Spawn the test server on its own thread, return the base URL.
fn spawn_server() -> String {
    let (tx, rx) = std::sync::mpsc::sync_channel(1);
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let server = todolist_server::test_helpers::spawn_test_server().await;
            tx.send(server.base_url.clone()).unwrap();
            std::future::pending::<()>().await;
        });
    });
    rx.recv().unwrap()
}

/// Register `alice` and create `tasks` (title, category) in order.
fn seed(url: &str, tasks: &[(&str, &str)]) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let svc = HttpService::new(url);
    rt.block_on(async {
        svc.register(&Registration {
            username: USER.into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        })
        .await
        .unwrap();
        for (title, category) in tasks {
            svc.create_task(&CreateTask::new(USER, title, category))
                .await
                .unwrap();
        }
    });
}

fn make_app_with(tasks: &[(&str, &str)]) -> App {
    let url = spawn_server();
    seed(&url, tasks);
    App::new(HttpService::new(&url), USER).unwrap()
}

fn make_app() -> App {
    make_app_with(&[])
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn char_key(c: char) -> KeyEvent {
    key(KeyCode::Char(c))
}

/// Draw one frame and return the screen as text, row by row.
fn screen(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
    terminal.draw(|frame| app.render(frame)).unwrap();
    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn type_str(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_key(char_key(c));
    }
}

// ---- Startup ----

#[test]
fn app_starts_normal_with_empty_list() {
    let app = make_app();
    assert!(matches!(app.mode(), Mode::Normal));
    assert!(!app.is_input_mode());
    assert!(app.selected_task().is_none());
    assert!(app.controller().tasks().is_empty());
}

#[test]
fn app_loads_existing_tasks() {
    let app = make_app_with(&[("first", "work"), ("second", "home")]);
    assert_eq!(app.controller().tasks().len(), 2);
    assert!(app.selected_task().is_some());
}

// ---- Rendering ----

#[test]
fn idle_frame_shows_user_and_placeholder() {
    let app = make_app();
    let text = screen(&app);
    let title_row = text.lines().next().unwrap();
    assert!(title_row.contains("todolist"));
    assert!(title_row.contains(USER));
    assert_eq!(title_row.trim_end(), " todolist | alice");
    assert!(text.contains("No tasks"));
}

#[test]
fn frame_lists_tasks_with_category() {
    let app = make_app_with(&[("Buy milk", "home")]);
    let text = screen(&app);
    assert!(text.contains("[ ] Buy milk"));
    assert!(text.contains("#home"));
    assert!(!text.contains("No tasks"));
}

// ---- New task ----

#[test]
fn n_enters_new_task() {
    let mut app = make_app();
    app.handle_key(char_key('n'));
    assert!(matches!(
        app.mode(),
        Mode::NewTask {
            field: Field::Title,
            ..
        }
    ));
    assert!(app.is_input_mode());
}

#[test]
fn new_task_esc_cancels() {
    let mut app = make_app();
    app.handle_key(char_key('n'));
    type_str(&mut app, "abc");
    app.handle_key(key(KeyCode::Esc));
    assert!(matches!(app.mode(), Mode::Normal));
    assert!(app.controller().tasks().is_empty());
}

#[test]
fn new_task_with_category_is_created() {
    let mut app = make_app();
    app.handle_key(char_key('n'));
    type_str(&mut app, "Buy milk");
    app.handle_key(key(KeyCode::Tab));
    type_str(&mut app, "home");
    app.handle_key(key(KeyCode::Enter));

    assert!(matches!(app.mode(), Mode::Normal));
    assert_eq!(app.status_message(), Some("Task created"));
    let tasks = app.controller().tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Buy milk");
    assert_eq!(tasks[0].category, "home");
    assert!(!tasks[0].completed);
}

#[test]
fn new_task_without_category_is_uncategorized() {
    let mut app = make_app();
    app.handle_key(char_key('n'));
    type_str(&mut app, "Call mom");
    app.handle_key(key(KeyCode::Enter));

    assert_eq!(app.controller().tasks()[0].category, UNCATEGORIZED);
}

#[test]
fn blank_title_keeps_form_open() {
    let mut app = make_app();
    app.handle_key(char_key('n'));
    app.handle_key(key(KeyCode::Tab));
    type_str(&mut app, "work");
    app.handle_key(key(KeyCode::Enter));

    match app.mode() {
        Mode::NewTask {
            title, category, ..
        } => {
            assert!(title.is_empty());
            assert_eq!(category, "work");
        }
        other => panic!("expected NewTask, got {other:?}"),
    }
    assert!(app.controller().tasks().is_empty());
}

#[test]
fn new_task_backspace_edits_active_field() {
    let mut app = make_app();
    app.handle_key(char_key('n'));
    type_str(&mut app, "ab");
    app.handle_key(key(KeyCode::Backspace));
    match app.mode() {
        Mode::NewTask { title, .. } => assert_eq!(title, "a"),
        other => panic!("expected NewTask, got {other:?}"),
    }
}

#[test]
fn q_is_text_while_typing() {
    let mut app = make_app();
    app.handle_key(char_key('n'));
    app.handle_key(char_key('q'));
    match app.mode() {
        Mode::NewTask { title, .. } => assert_eq!(title, "q"),
        other => panic!("expected NewTask, got {other:?}"),
    }
}

// ---- Toggle ----

#[test]
fn space_toggles_completion() {
    let mut app = make_app_with(&[("Test Task", "work")]);

    app.handle_key(char_key(' '));
    assert!(app.controller().tasks()[0].completed);
    assert!(app.selected_task().unwrap().completed);

    app.handle_key(char_key(' '));
    assert!(!app.controller().tasks()[0].completed);
}

// ---- Edit ----

#[test]
fn e_opens_inline_edit_with_task_values() {
    let mut app = make_app_with(&[("Test Task", "work")]);
    app.handle_key(char_key('e'));

    assert!(matches!(
        app.mode(),
        Mode::EditTask {
            field: Field::Title
        }
    ));
    let draft = app.controller().edit_draft().unwrap();
    assert_eq!(draft.title, "Test Task");
    assert_eq!(draft.category, "work");
}

#[test]
fn edit_and_save_updates_task() {
    let mut app = make_app_with(&[("Test Task", "work")]);
    app.handle_key(char_key('e'));
    for _ in 0.."Task".len() {
        app.handle_key(key(KeyCode::Backspace));
    }
    type_str(&mut app, "Item");
    app.handle_key(key(KeyCode::Tab));
    for _ in 0.."work".len() {
        app.handle_key(key(KeyCode::Backspace));
    }
    type_str(&mut app, "chores");
    app.handle_key(key(KeyCode::Enter));

    assert!(matches!(app.mode(), Mode::Normal));
    assert!(app.controller().edit_draft().is_none());
    let task = &app.controller().tasks()[0];
    assert_eq!(task.title, "Test Item");
    assert_eq!(task.category, "chores");
}

#[test]
fn edit_esc_discards_draft() {
    let mut app = make_app_with(&[("Test Task", "work")]);
    app.handle_key(char_key('e'));
    type_str(&mut app, " changed");
    app.handle_key(key(KeyCode::Esc));

    assert!(matches!(app.mode(), Mode::Normal));
    assert!(app.controller().edit_draft().is_none());
    assert_eq!(app.controller().tasks()[0].title, "Test Task");
}

#[test]
fn blank_edit_title_stays_in_edit() {
    let mut app = make_app_with(&[("ab", "work")]);
    app.handle_key(char_key('e'));
    app.handle_key(key(KeyCode::Backspace));
    app.handle_key(key(KeyCode::Backspace));
    app.handle_key(key(KeyCode::Enter));

    assert!(matches!(app.mode(), Mode::EditTask { .. }));
    assert_eq!(app.controller().edit_draft().unwrap().title, "");
    assert_eq!(app.controller().tasks()[0].title, "ab");
}

// ---- Delete ----

#[test]
fn d_enters_confirm_delete() {
    let mut app = make_app_with(&[("Test Task", "work")]);
    app.handle_key(char_key('d'));
    assert!(matches!(app.mode(), Mode::ConfirmDelete { .. }));
    assert!(!app.is_input_mode());
}

#[test]
fn declined_delete_keeps_task() {
    let mut app = make_app_with(&[("Test Task", "work")]);
    app.handle_key(char_key('d'));
    app.handle_key(char_key('n'));

    assert!(matches!(app.mode(), Mode::Normal));
    assert_eq!(app.controller().tasks().len(), 1);
}

#[test]
fn confirmed_delete_removes_task() {
    let mut app = make_app_with(&[("Test Task", "work")]);
    app.handle_key(char_key('d'));
    app.handle_key(char_key('y'));

    assert!(matches!(app.mode(), Mode::Normal));
    assert!(app.controller().tasks().is_empty());
    assert_eq!(app.status_message(), Some("Deleted: Test Task"));
    assert!(app.selected_task().is_none());
}

#[test]
fn d_on_empty_list_does_nothing() {
    let mut app = make_app();
    app.handle_key(char_key('d'));
    assert!(matches!(app.mode(), Mode::Normal));
}

// ---- Filters ----

#[test]
fn f_cycles_status_filter() {
    let mut app = make_app_with(&[("open", "work"), ("closed", "work")]);
    // Newest first: "closed" is selected.
    app.handle_key(char_key(' '));

    app.handle_key(char_key('f'));
    assert_eq!(app.controller().state().status_filter, StatusFilter::Pending);
    let visible = app.controller().visible_tasks();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].title, "open");

    app.handle_key(char_key('f'));
    assert_eq!(app.controller().state().status_filter, StatusFilter::Completed);
    assert_eq!(app.controller().visible_tasks()[0].title, "closed");

    app.handle_key(char_key('f'));
    assert_eq!(app.controller().state().status_filter, StatusFilter::All);
    assert_eq!(app.controller().visible_tasks().len(), 2);
}

#[test]
fn c_cycles_category_filter() {
    let mut app = make_app_with(&[("a", "work"), ("b", "home")]);
    // Picker order follows the cache: newest ("home") first.
    assert_eq!(app.controller().categories(), vec!["all", "home", "work"]);

    app.handle_key(char_key('c'));
    assert_eq!(
        app.controller().state().category_filter,
        CategoryFilter::Named("home".into())
    );
    assert_eq!(app.controller().visible_tasks()[0].title, "b");

    app.handle_key(char_key('c'));
    assert_eq!(
        app.controller().state().category_filter,
        CategoryFilter::Named("work".into())
    );

    app.handle_key(char_key('c'));
    assert_eq!(app.controller().state().category_filter, CategoryFilter::All);
}

#[test]
fn r_reloads_from_server() {
    let url = spawn_server();
    seed(&url, &[("first", "work")]);
    let mut app = App::new(HttpService::new(&url), USER).unwrap();

    let rt = tokio::runtime::Runtime::new().unwrap();
    let other = HttpService::new(&url);
    rt.block_on(other.create_task(&CreateTask::new(USER, "second", "")))
        .unwrap();

    assert_eq!(app.controller().tasks().len(), 1);
    app.handle_key(char_key('r'));
    assert_eq!(app.controller().tasks().len(), 2);
}

// ---- Navigation ----

#[test]
fn j_k_move_selection() {
    let mut app = make_app_with(&[("one", "x"), ("two", "x"), ("three", "x")]);
    assert_eq!(app.selected_task().unwrap().title, "three");
    app.handle_key(char_key('j'));
    assert_eq!(app.selected_task().unwrap().title, "two");
    app.handle_key(char_key('k'));
    assert_eq!(app.selected_task().unwrap().title, "three");
}
