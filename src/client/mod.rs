//! Client - user-facing terminal interface
//!
//! The UI loop owns the session and the roster snapshot. Network calls
//! run as spawned tasks that report back over a channel; the loop applies
//! each result and re-renders. Within one user action the sequence
//! request -> response -> UI update is strictly ordered; across actions
//! nothing is, and stale roster fetches are dropped by generation.

pub mod actions;
mod app;
mod completion;
mod input;
mod ui;

use crate::api::{ActionReply, ApiClient, ApiError, AuthCheck, LoginReply, Roster};
use crate::config::Config;
use crate::roster::RosterView;
use crate::session::{Mode, Session, TokenStore};
use actions::ActionKind;
use anyhow::Result;
use app::{App, InputMode};
use crossterm::{
    event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use input::{parse_input, ParsedInput};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::Stdout;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// Results of background network tasks, applied on the UI loop
#[derive(Debug)]
pub enum UiEvent {
    RosterFetched {
        generation: u64,
        result: Result<Roster, ApiError>,
    },
    LoginFinished {
        result: Result<LoginReply, ApiError>,
    },
    ActionFinished {
        kind: ActionKind,
        result: Result<ActionReply, ApiError>,
    },
    AuthRechecked {
        result: Result<AuthCheck, ApiError>,
    },
}

/// Run the interactive client until the user quits
pub async fn run(config: Config) -> Result<()> {
    let api = ApiClient::new(&config.server.base_url);
    let mut session = Session::new(TokenStore::new(config.token_path()));
    session.restore(&api).await;
    let mut mode_rx = session.subscribe();

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &config, api, &mut session, &mut mode_rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    config: &Config,
    api: ApiClient,
    session: &mut Session,
    mode_rx: &mut watch::Receiver<Mode>,
) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::channel::<UiEvent>(64);
    let (input_tx, mut input_rx) = mpsc::channel(100);

    // Input thread
    std::thread::spawn(move || loop {
        if let Ok(event) = crossterm::event::read() {
            if input_tx.blocking_send(event).is_err() {
                break;
            }
        }
    });

    let mut app = App::new(config.appearance.clone(), config.dismiss_delay());
    let mut roster = RosterView::new();
    spawn_refresh(&api, &mut roster, &event_tx);

    loop {
        app.sweep_feedback();
        terminal.draw(|f| ui::draw(f, &app, &roster, session))?;

        tokio::select! {
            Some(event) = event_rx.recv() => {
                handle_ui_event(event, &mut app, &mut roster, session, &api, &event_tx);
            }
            Some(event) = input_rx.recv() => {
                if let Event::Key(key) = event {
                    if key.kind == KeyEventKind::Press
                        && handle_key(key, &mut app, &mut roster, session, &api, &event_tx)
                    {
                        return Ok(());
                    }
                }
            }
            Ok(()) = mode_rx.changed() => {
                // Removal-control visibility depends on mode
                spawn_refresh(&api, &mut roster, &event_tx);
            }
            _ = tokio::time::sleep(Duration::from_millis(200)) => {}
        }
    }
}

fn spawn_refresh(api: &ApiClient, roster: &mut RosterView, events: &mpsc::Sender<UiEvent>) {
    let generation = roster.begin_refresh();
    let api = api.clone();
    let events = events.clone();
    tokio::spawn(async move {
        let result = api.activities().await;
        let _ = events
            .send(UiEvent::RosterFetched { generation, result })
            .await;
    });
}

fn spawn_login(
    api: &ApiClient,
    events: &mpsc::Sender<UiEvent>,
    username: String,
    password: String,
) {
    let api = api.clone();
    let events = events.clone();
    tokio::spawn(async move {
        let result = api.login(&username, &password).await;
        let _ = events.send(UiEvent::LoginFinished { result }).await;
    });
}

fn spawn_auth_recheck(session: &Session, api: &ApiClient, events: &mpsc::Sender<UiEvent>) {
    let Some(token) = session.token().map(String::from) else {
        return;
    };
    let api = api.clone();
    let events = events.clone();
    tokio::spawn(async move {
        let result = api.check_auth(&token).await;
        let _ = events.send(UiEvent::AuthRechecked { result }).await;
    });
}

fn handle_ui_event(
    event: UiEvent,
    app: &mut App,
    roster: &mut RosterView,
    session: &mut Session,
    api: &ApiClient,
    events: &mpsc::Sender<UiEvent>,
) {
    match event {
        UiEvent::RosterFetched { generation, result } => {
            roster.apply(generation, result);
        }
        UiEvent::LoginFinished { result } => match result {
            Ok(reply) => {
                let name = reply.name.clone();
                session.establish(reply);
                app.show_success(format!("Welcome, {}", name));
            }
            Err(e) => {
                app.show_error(
                    e.detail()
                        .unwrap_or("Login failed. Please try again.")
                        .to_string(),
                );
            }
        },
        UiEvent::ActionFinished { kind, result } => {
            app.action_in_flight = false;
            match result {
                Ok(reply) => {
                    app.show_success(reply.message);
                    spawn_refresh(api, roster, events);
                }
                Err(e) => {
                    app.show_error(e.detail().unwrap_or(kind.fallback_error()).to_string());
                    // An invalid credential means the session may have
                    // expired server-side; re-validate so the UI flips
                    if e.is_unauthorized() {
                        spawn_auth_recheck(session, api, events);
                    }
                }
            }
        }
        UiEvent::AuthRechecked { result } => match result {
            Ok(check) if !check.authenticated => {
                session.clear_local();
                app.show_error("Your session has expired. Sign in again.");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("Session re-check failed: {}", e);
            }
        },
    }
}

/// Handle one key press. Returns true when the client should exit.
fn handle_key(
    key: KeyEvent,
    app: &mut App,
    roster: &mut RosterView,
    session: &mut Session,
    api: &ApiClient,
    events: &mpsc::Sender<UiEvent>,
) -> bool {
    if let InputMode::Password { username } = &app.input_mode {
        let username = username.clone();
        handle_password_key(key, app, api, events, username);
        return false;
    }

    if app.line_editor.is_empty() && handle_scroll_keys(&key, app) {
        return false;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if app.line_editor.is_empty() {
                return true;
            }
            app.line_editor.clear();
            app.completions = None;
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.completions = None;
            app.line_editor.insert(c);
        }
        KeyCode::Backspace => {
            app.line_editor.backspace();
        }
        KeyCode::Delete => {
            app.line_editor.delete();
        }
        KeyCode::Left => {
            app.line_editor.move_left();
        }
        KeyCode::Right => {
            app.line_editor.move_right();
        }
        KeyCode::Home => app.line_editor.move_home(),
        KeyCode::End => app.line_editor.move_end(),
        KeyCode::Esc => {
            if app.show_help {
                app.show_help = false;
            } else {
                app.completions = None;
            }
        }
        KeyCode::Tab => {
            let names: Vec<String> = roster
                .roster()
                .map(|r| r.names().map(String::from).collect())
                .unwrap_or_default();
            let matches = completion::complete(app.line_editor.content(), &names);
            if matches.len() == 1 {
                app.line_editor.set(&matches[0]);
                app.completions = None;
            } else if !matches.is_empty() {
                if let Some(prefix) = completion::common_prefix(&matches) {
                    if prefix.len() > app.line_editor.content().len() {
                        app.line_editor.set(&prefix);
                    }
                }
                app.completions = Some(matches);
            } else {
                app.completions = None;
            }
        }
        KeyCode::Enter => {
            app.completions = None;
            let line = app.line_editor.take();
            return dispatch_command(&line, app, roster, session, api, events);
        }
        _ => {}
    }
    false
}

/// Scroll the roster while the input line is empty
fn handle_scroll_keys(key: &KeyEvent, app: &mut App) -> bool {
    let page = 10;
    match key.code {
        KeyCode::Up => {
            app.scroll_up(1);
            true
        }
        KeyCode::Down => {
            app.scroll_down(1);
            true
        }
        KeyCode::PageUp => {
            app.scroll_up(page);
            true
        }
        KeyCode::PageDown => {
            app.scroll_down(page);
            true
        }
        _ => false,
    }
}

fn handle_password_key(
    key: KeyEvent,
    app: &mut App,
    api: &ApiClient,
    events: &mpsc::Sender<UiEvent>,
    username: String,
) {
    match key.code {
        KeyCode::Enter => {
            let password = app.line_editor.take();
            app.input_mode = InputMode::Command;
            spawn_login(api, events, username, password);
        }
        KeyCode::Esc => {
            app.line_editor.clear();
            app.input_mode = InputMode::Command;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.line_editor.clear();
            app.input_mode = InputMode::Command;
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.line_editor.insert(c);
        }
        KeyCode::Backspace => {
            app.line_editor.backspace();
        }
        _ => {}
    }
}

/// Execute a parsed `:` command. Returns true when the client should exit.
fn dispatch_command(
    line: &str,
    app: &mut App,
    roster: &mut RosterView,
    session: &mut Session,
    api: &ApiClient,
    events: &mpsc::Sender<UiEvent>,
) -> bool {
    match parse_input(line) {
        ParsedInput::Empty => {}
        ParsedInput::Login { username } => {
            app.input_mode = InputMode::Password { username };
        }
        ParsedInput::Logout => {
            if !session.is_authenticated() {
                app.show_error("Not signed in.");
            } else if let Some(token) = session.clear_local() {
                let api = api.clone();
                tokio::spawn(async move {
                    if let Err(e) = api.logout(&token).await {
                        tracing::warn!("Logout request failed: {}", e);
                    }
                });
            }
        }
        ParsedInput::Signup { activity, email } => {
            submit_action(ActionKind::Signup, activity, email, app, session, api, events);
        }
        ParsedInput::Remove { activity, email } => {
            submit_action(
                ActionKind::Unregister,
                activity,
                email,
                app,
                session,
                api,
                events,
            );
        }
        ParsedInput::Refresh => spawn_refresh(api, roster, events),
        ParsedInput::Help => app.show_help = !app.show_help,
        ParsedInput::Quit => return true,
        ParsedInput::Invalid { usage } => app.show_error(format!("Usage: {}", usage)),
        ParsedInput::Unknown(cmd) => {
            app.show_error(format!("Unknown command: {}. Try :help.", cmd));
        }
    }
    false
}

fn submit_action(
    kind: ActionKind,
    activity: String,
    email: String,
    app: &mut App,
    session: &Session,
    api: &ApiClient,
    events: &mpsc::Sender<UiEvent>,
) {
    match actions::submit(kind, activity, email, session, api, events) {
        Ok(()) => app.action_in_flight = true,
        Err(notice) => app.show_error(notice),
    }
}
