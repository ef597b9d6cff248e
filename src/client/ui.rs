//! Rendering - status bar, roster cards, feedback line, prompt

use super::app::{App, FeedbackKind, InputMode};
use crate::api::Activity;
use crate::config::AppearanceConfig;
use crate::roster::{RosterState, RosterView};
use crate::session::Session;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

pub const FETCH_FAILED_NOTICE: &str = "Failed to load activities. Please try again later.";

const HELP_TEXT: &[&str] = &[
    "rollcall - activity signup client",
    "",
    "Commands:",
    "  :login <username>            Sign in (prompts for the password)",
    "  :logout                      Sign out",
    "  :signup <activity> <email>   Register a participant",
    "  :remove <activity> <email>   Remove a participant",
    "  :refresh                     Re-fetch the activity list",
    "  :help                        Toggle this help",
    "  :quit                        Exit",
    "",
    "Activity names may contain spaces; the email is the last word.",
    "",
    "Keys:",
    "  Tab                 Complete commands and activity names",
    "  Up/Down, PgUp/PgDn  Scroll the roster (while the input is empty)",
    "  Ctrl+C              Clear the input, or exit when it is empty",
];

pub fn draw(f: &mut Frame, app: &App, roster: &RosterView, session: &Session) {
    let mut constraints = vec![
        Constraint::Length(1), // Status bar
        Constraint::Length(1), // Separator
        Constraint::Min(0),    // Roster
        Constraint::Length(1), // Separator
        Constraint::Length(1), // Feedback
    ];
    if app.completions.is_some() {
        constraints.push(Constraint::Length(1)); // Completions
    }
    constraints.push(Constraint::Length(1)); // Input

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    draw_status_bar(f, app, session, chunks[0]);
    f.render_widget(Span::raw("─".repeat(chunks[1].width as usize)), chunks[1]);
    draw_roster(f, app, roster, session, chunks[2]);
    f.render_widget(Span::raw("─".repeat(chunks[3].width as usize)), chunks[3]);
    draw_feedback(f, app, chunks[4]);

    if let Some(completions) = &app.completions {
        let text = format!("Completions: {}", completions.join("  "));
        let p = Paragraph::new(Span::styled(text, Style::default().fg(Color::Yellow)));
        f.render_widget(p, chunks[5]);
        draw_input(f, app, chunks[6]);
    } else {
        draw_input(f, app, chunks[5]);
    }

    draw_help_popup(f, app);
}

fn draw_status_bar(f: &mut Frame, app: &App, session: &Session, area: Rect) {
    let mut spans = vec![Span::styled(
        "rollcall",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    match session.display_name() {
        Some(name) => spans.push(Span::styled(
            format!("  Welcome, {}", name),
            Style::default().fg(Color::Green),
        )),
        None => spans.push(Span::styled(
            "  signed out - :login <username>",
            Style::default().fg(Color::DarkGray),
        )),
    }
    if app.action_in_flight {
        spans.push(Span::styled(
            "  [working...]",
            Style::default().fg(Color::Yellow),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_roster(f: &mut Frame, app: &App, roster: &RosterView, session: &Session, area: Rect) {
    let lines = roster_lines(roster, session.is_authenticated(), &app.appearance);
    let max_scroll = lines.len().saturating_sub(area.height as usize);
    let scroll = app.scroll.min(max_scroll);
    let visible: Vec<Line> = lines.into_iter().skip(scroll).collect();
    f.render_widget(Paragraph::new(visible), area);
}

/// Build the full display line list for the roster area
fn roster_lines(
    roster: &RosterView,
    authenticated: bool,
    appearance: &AppearanceConfig,
) -> Vec<Line<'static>> {
    match roster.state() {
        RosterState::Loading => vec![Line::from(Span::styled(
            "Loading activities...",
            Style::default().fg(Color::DarkGray),
        ))],
        RosterState::Failed => vec![Line::from(Span::styled(
            FETCH_FAILED_NOTICE,
            Style::default().fg(Color::Red),
        ))],
        RosterState::Loaded(r) => {
            if r.is_empty() {
                return vec![Line::from("No activities available.")];
            }
            let mut lines = Vec::new();
            for (name, activity) in r.iter() {
                lines.extend(card_lines(name, activity, authenticated, appearance));
                lines.push(Line::default());
            }
            lines
        }
    }
}

/// Build the display lines for one activity card. Participant rows carry
/// a removal marker only when the viewer is authenticated.
fn card_lines(
    name: &str,
    activity: &Activity,
    authenticated: bool,
    appearance: &AppearanceConfig,
) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            name.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  ({} spots left)", activity.spots_left()),
            Style::default().fg(Color::Cyan),
        ),
    ])];
    if appearance.show_descriptions {
        lines.push(Line::from(format!("  {}", activity.description)));
    }
    if appearance.show_schedule {
        lines.push(Line::from(format!("  Schedule: {}", activity.schedule)));
    }
    if activity.participants.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No participants yet",
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    } else {
        lines.push(Line::from("  Participants:"));
        for email in &activity.participants {
            let mut spans = vec![Span::raw("    ")];
            if authenticated {
                spans.push(Span::styled("✗ ", Style::default().fg(Color::Red)));
            }
            spans.push(Span::raw(email.clone()));
            lines.push(Line::from(spans));
        }
    }
    lines
}

fn draw_feedback(f: &mut Frame, app: &App, area: Rect) {
    let Some(feedback) = &app.feedback else {
        return;
    };
    let style = match feedback.kind {
        FeedbackKind::Success => Style::default().fg(Color::Green),
        FeedbackKind::Error => Style::default().fg(Color::Red),
    };
    f.render_widget(
        Paragraph::new(Span::styled(feedback.text.clone(), style)),
        area,
    );
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let (prompt, masked) = match &app.input_mode {
        InputMode::Command => ("> ".to_string(), false),
        InputMode::Password { username } => (format!("Password for {}: ", username), true),
    };

    let content = app.line_editor.content();
    let text = if masked {
        "*".repeat(content.chars().count())
    } else {
        content.to_string()
    };
    let cursor_chars = if masked {
        text.chars().count()
    } else {
        content[..app.line_editor.cursor_position()].chars().count()
    };

    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(prompt.clone(), Style::default().fg(Color::Blue)),
            Span::raw(text),
        ])),
        area,
    );
    f.set_cursor_position(Position::new(
        area.x + (prompt.chars().count() + cursor_chars) as u16,
        area.y,
    ));
}

fn draw_help_popup(f: &mut Frame, app: &App) {
    if !app.show_help {
        return;
    }

    let size = f.area();
    let width = size.width.saturating_sub(10).min(70);
    let height = size
        .height
        .saturating_sub(4)
        .min(HELP_TEXT.len() as u16 + 2);
    let area = Rect::new(
        (size.width.saturating_sub(width)) / 2,
        (size.height.saturating_sub(height)) / 2,
        width,
        height,
    );

    let block = Block::default()
        .title("Help (:help to close)")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .style(Style::default().bg(Color::Black));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let lines: Vec<ListItem> = HELP_TEXT.iter().map(|&s| ListItem::new(s)).collect();
    let list = List::new(lines).style(Style::default().fg(Color::White));
    f.render_widget(list, inner_area);
}
