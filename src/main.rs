//! rollcall - a terminal client for an extracurricular-activity signup service

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use rollcall::api::{ApiClient, Roster};
use rollcall::client;
use rollcall::config::Config;
use rollcall::session::{Session, TokenStore};

#[derive(Parser)]
#[command(name = "rollcall")]
#[command(about = "A terminal client for the extracurricular-activity signup service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to config file
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Server base URL (overrides the config file)
    #[arg(long)]
    server_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session token
    Login {
        /// Manager username
        username: String,
    },
    /// End the current session
    Logout,
    /// Print the activity roster
    List,
    /// Register a participant for an activity
    Signup {
        /// Activity name
        activity: String,
        /// Participant email
        email: String,
    },
    /// Remove a participant from an activity
    Unregister {
        /// Activity name
        activity: String,
        /// Participant email
        email: String,
    },
    /// Show who is signed in
    Whoami,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(url) = cli.server_url {
        config.server.base_url = url;
    }

    let api = ApiClient::new(&config.server.base_url);
    let store = TokenStore::new(config.token_path());

    match cli.command {
        Some(Commands::Login { username }) => {
            let password = prompt_password(&format!("Password for {}: ", username))?;
            let mut session = Session::new(store);
            let name = session.login(&api, &username, &password).await?;
            println!("Welcome, {}", name);
            Ok(())
        }
        Some(Commands::Logout) => {
            let mut session = Session::new(store);
            session.logout(&api).await;
            println!("Signed out.");
            Ok(())
        }
        Some(Commands::List) => {
            let roster = api.activities().await?;
            print_roster(&roster);
            Ok(())
        }
        Some(Commands::Signup { activity, email }) => {
            let token = store.load().ok_or_else(signed_out_error)?;
            let reply = api.signup(&token, &activity, &email).await?;
            println!("{}", reply.message);
            Ok(())
        }
        Some(Commands::Unregister { activity, email }) => {
            let token = store.load().ok_or_else(signed_out_error)?;
            let reply = api.unregister(&token, &activity, &email).await?;
            println!("{}", reply.message);
            Ok(())
        }
        Some(Commands::Whoami) => {
            match store.load() {
                None => println!("Not signed in."),
                Some(token) => {
                    let check = api.check_auth(&token).await?;
                    if check.authenticated {
                        println!("{}", check.name.as_deref().unwrap_or("unknown user"));
                    } else {
                        println!("Session expired. Sign in again.");
                    }
                }
            }
            Ok(())
        }
        None => client::run(config).await,
    }
}

fn signed_out_error() -> anyhow::Error {
    anyhow!("not signed in; run `rollcall login <username>` first")
}

fn print_roster(roster: &Roster) {
    for (name, activity) in roster.iter() {
        println!("{} ({} spots left)", name, activity.spots_left());
        println!("  {}", activity.description);
        println!("  Schedule: {}", activity.schedule);
        if activity.participants.is_empty() {
            println!("  No participants yet");
        } else {
            println!("  Participants:");
            for email in &activity.participants {
                println!("    {}", email);
            }
        }
        println!();
    }
}

/// Read a password from the terminal without echoing it
fn prompt_password(prompt: &str) -> Result<String> {
    use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
    use std::io::Write;

    print!("{}", prompt);
    std::io::stdout().flush()?;

    crossterm::terminal::enable_raw_mode()?;
    let mut password = String::new();
    let outcome = loop {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Enter => break Ok(password),
                KeyCode::Esc => break Err(anyhow!("cancelled")),
                KeyCode::Backspace => {
                    password.pop();
                }
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    break Err(anyhow!("cancelled"));
                }
                KeyCode::Char(c) => password.push(c),
                _ => {}
            },
            _ => {}
        }
    };
    crossterm::terminal::disable_raw_mode()?;
    println!();
    outcome
}
