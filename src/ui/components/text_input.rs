use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::Theme;
use crate::ui::{Component, EventResult, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextInputEvent {
    /// The value was edited.
    Changed(String),
    Submitted(String),
    Cancelled,
}

/// Single-line inline text field.
///
/// The cursor counts characters, not bytes, so accented input edits cleanly.
pub struct TextInput {
    label: String,
    value: String,
    cursor: usize,
    placeholder: Option<String>,
    focused: bool,
}

impl TextInput {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: String::new(),
            cursor: 0,
            placeholder: None,
            focused: false,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self.cursor = self.char_count();
        self
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub const fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    fn delete_char_before_cursor(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
        true
    }

    fn delete_char_at_cursor(&mut self) -> bool {
        if self.cursor >= self.char_count() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
        true
    }

    fn delete_word_before_cursor(&mut self) -> bool {
        let chars: Vec<char> = self.value.chars().collect();
        let mut pos = self.cursor;
        while pos > 0 && chars[pos - 1] == ' ' {
            pos -= 1;
        }
        while pos > 0 && chars[pos - 1] != ' ' {
            pos -= 1;
        }
        if pos == self.cursor {
            return false;
        }
        let (start, end) = (self.byte_index(pos), self.byte_index(self.cursor));
        self.value.drain(start..end);
        self.cursor = pos;
        true
    }

    fn clear_line(&mut self) -> bool {
        let had_text = !self.value.is_empty();
        self.value.clear();
        self.cursor = 0;
        had_text
    }

    fn edited(&self, changed: bool) -> EventResult<TextInputEvent> {
        if changed {
            TextInputEvent::Changed(self.value.clone()).into()
        } else {
            EventResult::Consumed
        }
    }
}

impl Component for TextInput {
    type Output = TextInputEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        Ok(match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => TextInputEvent::Submitted(self.value.clone()).into(),
            (KeyCode::Esc, _) => TextInputEvent::Cancelled.into(),

            (KeyCode::Backspace, KeyModifiers::ALT)
            | (KeyCode::Char('w'), KeyModifiers::CONTROL) => {
                let changed = self.delete_word_before_cursor();
                self.edited(changed)
            }
            (KeyCode::Backspace, _) => {
                let changed = self.delete_char_before_cursor();
                self.edited(changed)
            }
            (KeyCode::Delete, _) => {
                let changed = self.delete_char_at_cursor();
                self.edited(changed)
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                let changed = self.clear_line();
                self.edited(changed)
            }

            (KeyCode::Left, _) => {
                self.cursor = self.cursor.saturating_sub(1);
                EventResult::Consumed
            }
            (KeyCode::Right, _) => {
                self.cursor = (self.cursor + 1).min(self.char_count());
                EventResult::Consumed
            }
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.cursor = 0;
                EventResult::Consumed
            }
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor = self.char_count();
                EventResult::Consumed
            }

            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.insert_char(c);
                self.edited(true)
            }

            _ => EventResult::Consumed,
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let input_style = Style::default().fg(theme.text());
        let cursor_style = Style::default()
            .fg(theme.base())
            .bg(theme.text())
            .add_modifier(Modifier::BOLD);
        let placeholder_style = Style::default().fg(theme.overlay0());

        let line = match (&self.placeholder, self.value.is_empty(), self.focused) {
            (Some(placeholder), true, focused) => {
                let mut spans = Vec::new();
                if focused {
                    spans.push(Span::styled(" ", cursor_style));
                }
                spans.push(Span::styled(placeholder.clone(), placeholder_style));
                Line::from(spans)
            }
            (_, _, false) => Line::from(Span::styled(self.value.clone(), input_style)),
            (_, _, true) => {
                let split = self.byte_index(self.cursor);
                let (before, after) = self.value.split_at(split);
                let mut rest = after.chars();
                let under_cursor = rest.next().unwrap_or(' ');
                Line::from(vec![
                    Span::styled(before.to_string(), input_style),
                    Span::styled(under_cursor.to_string(), cursor_style),
                    Span::styled(rest.as_str().to_string(), input_style),
                ])
            }
        };

        let border_color = if self.focused {
            theme.lavender()
        } else {
            theme.surface1()
        };
        let block = Block::default()
            .title(format!(" {} ", self.label))
            .title_style(Style::default().fg(theme.mauve()).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(border_color));

        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}
