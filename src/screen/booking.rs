use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::Theme;
use crate::catalog::ServiceRecord;
use crate::commands::{HandoffCmd, MessageDraft};
use crate::config::{BookingAction, KeyResolver};
use crate::screen::ScreenMsg;
use crate::ui::{EventResult, Keybinding, Result, Screen};

/// Shown when the screen was opened without a service.
const PLACEHOLDER_NAME: &str = "Service";

/// Summary of the chosen service with the messaging handoff.
pub struct BookingScreen {
    record: Option<ServiceRecord>,
    resolver: Arc<KeyResolver>,
}

impl BookingScreen {
    pub const fn new(record: Option<ServiceRecord>, resolver: Arc<KeyResolver>) -> Self {
        Self { record, resolver }
    }

    pub fn name(&self) -> &str {
        self.record.as_ref().map_or(PLACEHOLDER_NAME, |r| r.name.as_str())
    }

    pub fn price(&self) -> u32 {
        self.record.as_ref().map_or(0, |r| r.price)
    }

    fn draft(&self) -> MessageDraft {
        MessageDraft::new(self.name(), self.price())
    }
}

impl Screen for BookingScreen {
    type Msg = ScreenMsg;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Msg>> {
        if self.resolver.matches_booking(&key, BookingAction::Handoff) {
            return Ok(ScreenMsg::from(HandoffCmd::new(self.draft())).into());
        }
        Ok(EventResult::Ignored)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let card = area.centered(Constraint::Percentage(60), Constraint::Length(11));
        let handoff_key = self.resolver.display_booking(BookingAction::Handoff);

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("Booking {}", self.name()),
                Style::default().fg(theme.text()).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("Price: R$ {}", self.price()),
                Style::default().fg(theme.green()),
            )),
        ];
        if let Some(record) = &self.record {
            lines.push(Line::from(Span::styled(
                record.description.clone(),
                Style::default().fg(theme.subtext0()),
            )));
        }
        lines.extend([
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    format!("[{handoff_key}]"),
                    Style::default().fg(theme.peach()).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    " Book via messaging app",
                    Style::default().fg(theme.blue()),
                ),
            ]),
            Line::from(Span::styled(
                "The booking link is copied to your clipboard.",
                Style::default().fg(theme.overlay0()),
            )),
        ]);

        let block = Block::default()
            .title(" Booking ")
            .title_style(Style::default().fg(theme.mauve()).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.lavender()));

        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            card,
        );
    }

    fn breadcrumbs(&self) -> Vec<String> {
        vec!["Services".to_string(), self.name().to_string()]
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        vec![Keybinding::new(
            self.resolver.display_booking(BookingAction::Handoff),
            "Book via messaging",
        )]
    }
}
