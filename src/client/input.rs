//! Input handling - parse prompt input into commands

/// Parsed prompt input
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedInput {
    Empty,

    /// `:login <username>` - prompts for the password next
    Login { username: String },

    /// `:logout`
    Logout,

    /// `:refresh` - re-fetch the activity list
    Refresh,

    /// `:signup <activity...> <email>` - the email is the last word
    Signup { activity: String, email: String },

    /// `:remove <activity...> <email>`
    Remove { activity: String, email: String },

    /// `:help`
    Help,

    /// `:quit`
    Quit,

    /// Recognized command with bad arguments
    Invalid { usage: &'static str },

    /// Anything unrecognized, echoed back to the user
    Unknown(String),
}

/// Parse a line of prompt input
pub fn parse_input(line: &str) -> ParsedInput {
    let line = line.trim();
    if line.is_empty() {
        return ParsedInput::Empty;
    }
    let Some(rest) = line.strip_prefix(':') else {
        return ParsedInput::Unknown(line.to_string());
    };

    let mut words = rest.split_whitespace();
    let command = words.next().unwrap_or("").to_lowercase();
    let args: Vec<&str> = words.collect();

    match command.as_str() {
        "login" => match args.as_slice() {
            [username] => ParsedInput::Login {
                username: username.to_string(),
            },
            _ => ParsedInput::Invalid {
                usage: ":login <username>",
            },
        },
        "logout" => ParsedInput::Logout,
        "refresh" | "list" => ParsedInput::Refresh,
        "signup" | "register" => match split_activity_email(&args) {
            Some((activity, email)) => ParsedInput::Signup { activity, email },
            None => ParsedInput::Invalid {
                usage: ":signup <activity> <email>",
            },
        },
        "remove" | "unregister" => match split_activity_email(&args) {
            Some((activity, email)) => ParsedInput::Remove { activity, email },
            None => ParsedInput::Invalid {
                usage: ":remove <activity> <email>",
            },
        },
        "help" => ParsedInput::Help,
        "quit" | "exit" => ParsedInput::Quit,
        other => ParsedInput::Unknown(format!(":{}", other)),
    }
}

/// Activity names may contain spaces; the email is always the last word.
fn split_activity_email(args: &[&str]) -> Option<(String, String)> {
    let (email, activity) = args.split_last()?;
    if activity.is_empty() {
        return None;
    }
    Some((activity.join(" "), email.to_string()))
}
