//! Client-held UI state

use crate::config::AppearanceConfig;
use std::time::{Duration, Instant};

/// Input line editor with cursor position tracking
pub struct LineEditor {
    buffer: String,
    cursor: usize,
}

impl LineEditor {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
        }
    }

    pub fn content(&self) -> &str {
        &self.buffer
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn insert(&mut self, c: char) {
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) -> bool {
        let Some((idx, _)) = self.buffer[..self.cursor].char_indices().last() else {
            return false;
        };
        self.buffer.remove(idx);
        self.cursor = idx;
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.buffer.len() {
            return false;
        }
        self.buffer.remove(self.cursor);
        true
    }

    pub fn move_left(&mut self) -> bool {
        match self.buffer[..self.cursor].char_indices().last() {
            Some((idx, _)) => {
                self.cursor = idx;
                true
            }
            None => false,
        }
    }

    pub fn move_right(&mut self) -> bool {
        match self.buffer[self.cursor..].chars().next() {
            Some(c) => {
                self.cursor += c.len_utf8();
                true
            }
            None => false,
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.buffer.len();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    pub fn set(&mut self, content: &str) {
        self.buffer = content.to_string();
        self.cursor = self.buffer.len();
    }

    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Error,
}

/// Transient status message; replaced by the next one or swept on expiry
pub struct Feedback {
    pub text: String,
    pub kind: FeedbackKind,
    expires_at: Instant,
}

/// What the input line currently collects
pub enum InputMode {
    Command,
    /// Masked password entry, after `:login <username>`
    Password { username: String },
}

pub struct App {
    pub line_editor: LineEditor,
    pub input_mode: InputMode,
    pub feedback: Option<Feedback>,
    pub completions: Option<Vec<String>>,
    pub scroll: usize,
    pub show_help: bool,
    pub action_in_flight: bool,
    pub appearance: AppearanceConfig,
    dismiss_after: Duration,
}

impl App {
    pub fn new(appearance: AppearanceConfig, dismiss_after: Duration) -> Self {
        Self {
            line_editor: LineEditor::new(),
            input_mode: InputMode::Command,
            feedback: None,
            completions: None,
            scroll: 0,
            show_help: false,
            action_in_flight: false,
            appearance,
            dismiss_after,
        }
    }

    pub fn show_success(&mut self, text: impl Into<String>) {
        self.set_feedback(text.into(), FeedbackKind::Success);
    }

    pub fn show_error(&mut self, text: impl Into<String>) {
        self.set_feedback(text.into(), FeedbackKind::Error);
    }

    fn set_feedback(&mut self, text: String, kind: FeedbackKind) {
        self.feedback = Some(Feedback {
            text,
            kind,
            expires_at: Instant::now() + self.dismiss_after,
        });
    }

    /// Drop the feedback message once its dismissal deadline passes.
    /// A newer message carries its own deadline, superseding the old one.
    pub fn sweep_feedback(&mut self) {
        if let Some(feedback) = &self.feedback {
            if Instant::now() >= feedback.expires_at {
                self.feedback = None;
            }
        }
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_add(lines);
    }
}
