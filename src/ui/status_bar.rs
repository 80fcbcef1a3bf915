use std::sync::Arc;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::Theme;
use crate::config::{GlobalAction, KeyResolver};
use crate::ui::Keybinding;

/// Bottom bar with the navigation path and the key hints of the active screen.
pub struct StatusBar {
    resolver: Arc<KeyResolver>,
}

impl StatusBar {
    pub const fn new(resolver: Arc<KeyResolver>) -> Self {
        Self { resolver }
    }

    pub const fn height() -> u16 {
        4
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        breadcrumbs: &[String],
        local_keybindings: &[Keybinding],
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.surface1()));

        let separator = Span::styled(" › ", Style::default().fg(theme.surface2()));
        let mut path = vec![Span::styled(
            "nearby",
            Style::default().fg(theme.mauve()).add_modifier(Modifier::BOLD),
        )];
        for crumb in breadcrumbs {
            path.push(separator.clone());
            path.push(Span::styled(crumb.clone(), Style::default().fg(theme.lavender())));
        }

        let mut hints = Vec::new();
        for kb in local_keybindings.iter().chain(self.global_keybindings().iter()) {
            hints.push(Span::styled(kb.key.clone(), Style::default().fg(theme.peach())));
            hints.push(Span::raw(" "));
            hints.push(Span::styled(
                kb.description.clone(),
                Style::default().fg(theme.subtext0()),
            ));
            hints.push(Span::styled("  │  ", Style::default().fg(theme.surface2())));
        }
        hints.pop();

        let paragraph = Paragraph::new(vec![Line::from(path), Line::from(hints)])
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn global_keybindings(&self) -> Vec<Keybinding> {
        vec![
            Keybinding::new(self.resolver.display_global(GlobalAction::Back), "Back"),
            Keybinding::new(self.resolver.display_global(GlobalAction::Quit), "Quit"),
        ]
    }
}
