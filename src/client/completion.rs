//! Tab completion for commands and activity names

/// Available control commands for completion
pub const COMMANDS: &[&str] = &[
    "login",
    "logout",
    "signup",
    "remove",
    "refresh",
    "help",
    "quit",
];

/// Complete a partial input string.
/// Returns a list of possible completions.
pub fn complete(input: &str, activities: &[String]) -> Vec<String> {
    let input = input.trim_start();
    let Some(rest) = input.strip_prefix(':') else {
        return vec![];
    };

    // Completing an argument: only the mutation commands take an
    // activity name first
    if let Some(space_idx) = rest.find(' ') {
        let cmd = &rest[..space_idx];
        if matches!(cmd, "signup" | "register" | "remove" | "unregister") {
            let partial = rest[space_idx..].trim_start();
            return complete_activity(cmd, partial, activities);
        }
        return vec![];
    }

    complete_command(rest)
}

fn complete_command(partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    COMMANDS
        .iter()
        .filter(|cmd| cmd.starts_with(&partial_lower))
        .map(|cmd| format!(":{}", cmd))
        .collect()
}

/// Complete the activity argument, keeping the command prefix intact.
/// A trailing space is appended so the email can be typed next.
fn complete_activity(cmd: &str, partial: &str, activities: &[String]) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    activities
        .iter()
        .filter(|name| name.to_lowercase().starts_with(&partial_lower))
        .map(|name| format!(":{} {} ", cmd, name))
        .collect()
}

/// Get the common prefix of all completions
pub fn common_prefix(completions: &[String]) -> Option<String> {
    let first = completions.first()?;
    if completions.len() == 1 {
        return Some(first.clone());
    }

    let mut prefix_len = first.len();
    for completion in &completions[1..] {
        let common_len = first
            .chars()
            .zip(completion.chars())
            .take_while(|(a, b)| a == b)
            .count();
        prefix_len = prefix_len.min(common_len);
    }

    if prefix_len > 0 {
        Some(first.chars().take(prefix_len).collect())
    } else {
        None
    }
}
