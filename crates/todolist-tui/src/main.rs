use std::io;

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use todolist_core::user::{Credentials, Registration};
use todolist_service::HttpService;

use todolist_tui::app::App;
use todolist_tui::config::{ClientConfig, Command};
use todolist_tui::logging;

fn main() -> Result<()> {
    let config = ClientConfig::parse();
    let _guard = logging::init(&config.log_path())?;

    if let Some(Command::Register {
        ref username,
        ref password,
        ref confirm_password,
    }) = config.command
    {
        let form = Registration {
            username: username.clone(),
            password: password.clone(),
            confirm_password: confirm_password.clone(),
        };
        return register(&config, &form);
    }

    let Some(ref username) = config.username else {
        bail!("no username given; pass --username or set TODOLIST_USERNAME");
    };

    let username = match config.password {
        Some(ref password) => login(&config, &Credentials::new(username, password))?,
        None => username.clone(),
    };
    tracing::info!("starting todolist for {username} against {}", config.server_url);

    let result = run_tui(build_service(&config)?, &username);
    tracing::info!("todolist exiting");
    result
}

fn build_service(config: &ClientConfig) -> Result<HttpService> {
    match config.request_timeout() {
        Some(timeout) => HttpService::with_timeout(&config.server_url, timeout)
            .context("failed to build HTTP client"),
        None => Ok(HttpService::new(&config.server_url)),
    }
}

/// Run one auth request on a throwaway runtime. The UI builds its own.
fn block_on<F: std::future::Future>(future: F) -> Result<F::Output> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    Ok(rt.block_on(future))
}

fn register(config: &ClientConfig, form: &Registration) -> Result<()> {
    let service = build_service(config)?;
    match block_on(service.register(form))? {
        Ok(message) => {
            println!("{message}");
            Ok(())
        }
        Err(e) => bail!("registration failed: {}", e.user_message()),
    }
}

fn login(config: &ClientConfig, credentials: &Credentials) -> Result<String> {
    let service = build_service(config)?;
    match block_on(service.login(credentials))? {
        Ok(username) => Ok(username),
        Err(e) => bail!("login failed: {}", e.user_message()),
    }
}

fn run_tui(service: HttpService, username: &str) -> Result<()> {
    let mut app = App::new(service, username)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e}");
    }

    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if let Event::Key(key) = event::read()? {
            // Ctrl+C always quits
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }
            // q quits unless we're typing
            if key.code == KeyCode::Char('q') && !app.is_input_mode() {
                break;
            }
            app.handle_key(key);
        }
    }

    app.controller().teardown();
    Ok(())
}
