use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{List as RatatuiList, ListItem, ListState};

use crate::Theme;
use crate::config::{KeyResolver, NavAction};
use crate::ui::{Component, EventResult, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent<T> {
    Changed(T),
    Activated(T),
}

pub trait ListRow {
    fn render_row(&self, theme: &Theme) -> ListItem<'static>;
}

/// Selectable list with keyboard navigation.
pub struct List<T: ListRow + Clone> {
    items: Vec<T>,
    state: ListState,
    resolver: Arc<KeyResolver>,
}

impl<T: ListRow + Clone> List<T> {
    pub fn new(items: Vec<T>, resolver: Arc<KeyResolver>) -> Self {
        let mut state = ListState::default();
        if !items.is_empty() {
            state.select(Some(0));
        }
        Self {
            items,
            state,
            resolver,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn selected(&self) -> Option<&T> {
        self.state.selected().and_then(|i| self.items.get(i))
    }

    /// Replace the rows, keeping the cursor in range.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;

        if self.items.is_empty() {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= self.items.len() {
                self.state.select(Some(self.items.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    fn change_event(&self, before: Option<usize>) -> EventResult<ListEvent<T>> {
        if let Some(selected) = self.state.selected()
            && Some(selected) != before
            && let Some(item) = self.items.get(selected)
        {
            return ListEvent::Changed(item.clone()).into();
        }
        EventResult::Consumed
    }

    fn select_clamped(&mut self, index: usize) {
        if !self.items.is_empty() {
            self.state.select(Some(index.min(self.items.len() - 1)));
        }
    }
}

impl<T: ListRow + Clone> Component for List<T> {
    type Output = ListEvent<T>;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        let before = self.state.selected();

        if self.resolver.matches_nav(&key, NavAction::Down) {
            self.select_clamped(before.map_or(0, |i| i + 1));
            return Ok(self.change_event(before));
        }
        if self.resolver.matches_nav(&key, NavAction::Up) {
            self.select_clamped(before.map_or(0, |i| i.saturating_sub(1)));
            return Ok(self.change_event(before));
        }
        if self.resolver.matches_nav(&key, NavAction::Home) {
            self.select_clamped(0);
            return Ok(self.change_event(before));
        }
        if self.resolver.matches_nav(&key, NavAction::End) {
            self.select_clamped(usize::MAX);
            return Ok(self.change_event(before));
        }
        if self.resolver.matches_nav(&key, NavAction::Select) {
            return Ok(self
                .selected()
                .cloned()
                .map_or(EventResult::Ignored, |item| ListEvent::Activated(item).into()));
        }

        Ok(EventResult::Ignored)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let items: Vec<ListItem> = self.items.iter().map(|i| i.render_row(theme)).collect();

        let list = RatatuiList::new(items)
            .highlight_style(
                Style::default()
                    .bg(theme.selection_bg())
                    .fg(theme.lavender())
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(list, area, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(&'static str);

    impl ListRow for Row {
        fn render_row(&self, _theme: &Theme) -> ListItem<'static> {
            ListItem::new(self.0)
        }
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn list(rows: &[&'static str]) -> List<Row> {
        List::new(
            rows.iter().copied().map(Row).collect(),
            Arc::new(KeyResolver::default()),
        )
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let mut list = list(&["a", "b"]);
        assert_eq!(
            list.handle_key(press(KeyCode::Char('j'))).unwrap(),
            EventResult::Event(ListEvent::Changed(Row("b")))
        );
        assert_eq!(
            list.handle_key(press(KeyCode::Down)).unwrap(),
            EventResult::Consumed
        );
        assert_eq!(list.selected(), Some(&Row("b")));
        list.handle_key(press(KeyCode::Char('g'))).unwrap();
        assert_eq!(list.selected(), Some(&Row("a")));
    }

    #[test]
    fn test_enter_activates_selection() {
        let mut list = list(&["a", "b"]);
        list.handle_key(press(KeyCode::End)).unwrap();
        assert_eq!(
            list.handle_key(press(KeyCode::Enter)).unwrap(),
            EventResult::Event(ListEvent::Activated(Row("b")))
        );
    }

    #[test]
    fn test_empty_list_ignores_activation() {
        let mut list = list(&[]);
        assert_eq!(
            list.handle_key(press(KeyCode::Enter)).unwrap(),
            EventResult::Ignored
        );
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn test_set_items_clamps_cursor() {
        let mut list = list(&["a", "b", "c"]);
        list.handle_key(press(KeyCode::End)).unwrap();
        list.set_items(vec![Row("x")]);
        assert_eq!(list.selected(), Some(&Row("x")));
        list.set_items(vec![]);
        assert_eq!(list.selected(), None);
        list.set_items(vec![Row("y")]);
        assert_eq!(list.selected(), Some(&Row("y")));
    }
}
