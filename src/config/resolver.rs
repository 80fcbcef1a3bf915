use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::config::actions::{BookingAction, DialogAction, GlobalAction, ListingAction, NavAction};
use crate::config::keybindings::KeybindingsConfig;

/// Maps key events to the actions configured for them.
pub struct KeyResolver {
    pub keybindings: Arc<KeybindingsConfig>,
}

impl KeyResolver {
    pub const fn new(keybindings: Arc<KeybindingsConfig>) -> Self {
        Self { keybindings }
    }

    pub fn matches_global(&self, event: &KeyEvent, action: GlobalAction) -> bool {
        let kb = &self.keybindings.global;
        match action {
            GlobalAction::Quit => kb.quit.matches(event),
            GlobalAction::Back => kb.back.matches(event),
        }
    }

    pub fn display_global(&self, action: GlobalAction) -> String {
        let kb = &self.keybindings.global;
        match action {
            GlobalAction::Quit => kb.quit.display(),
            GlobalAction::Back => kb.back.display(),
        }
    }

    pub fn matches_nav(&self, event: &KeyEvent, action: NavAction) -> bool {
        let kb = &self.keybindings.navigation;
        match action {
            NavAction::Up => kb.up.matches(event),
            NavAction::Down => kb.down.matches(event),
            NavAction::Home => kb.home.matches(event),
            NavAction::End => kb.end.matches(event),
            NavAction::Select => kb.select.matches(event),
        }
    }

    pub fn display_nav(&self, action: NavAction) -> String {
        let kb = &self.keybindings.navigation;
        match action {
            NavAction::Up => kb.up.display(),
            NavAction::Down => kb.down.display(),
            NavAction::Home => kb.home.display(),
            NavAction::End => kb.end.display(),
            NavAction::Select => kb.select.display(),
        }
    }

    pub fn matches_listing(&self, event: &KeyEvent, action: ListingAction) -> bool {
        let kb = &self.keybindings.listing;
        match action {
            ListingAction::EditNeighborhood => kb.edit_neighborhood.matches(event),
            ListingAction::EditRadius => kb.edit_radius.matches(event),
            ListingAction::ToggleCategory => kb.toggle_category.matches(event),
            ListingAction::RefreshLocation => kb.refresh_location.matches(event),
            ListingAction::ToggleMap => kb.toggle_map.matches(event),
        }
    }

    pub fn display_listing(&self, action: ListingAction) -> String {
        let kb = &self.keybindings.listing;
        match action {
            ListingAction::EditNeighborhood => kb.edit_neighborhood.display(),
            ListingAction::EditRadius => kb.edit_radius.display(),
            ListingAction::ToggleCategory => kb.toggle_category.display(),
            ListingAction::RefreshLocation => kb.refresh_location.display(),
            ListingAction::ToggleMap => kb.toggle_map.display(),
        }
    }

    pub fn matches_booking(&self, event: &KeyEvent, action: BookingAction) -> bool {
        let kb = &self.keybindings.booking;
        match action {
            BookingAction::Handoff => kb.handoff.matches(event),
        }
    }

    pub fn display_booking(&self, action: BookingAction) -> String {
        let kb = &self.keybindings.booking;
        match action {
            BookingAction::Handoff => kb.handoff.display(),
        }
    }

    pub fn matches_dialog(&self, event: &KeyEvent, action: DialogAction) -> bool {
        let kb = &self.keybindings.dialog;
        match action {
            DialogAction::Confirm => kb.confirm.matches(event),
            DialogAction::Cancel => kb.cancel.matches(event),
            DialogAction::Dismiss => kb.dismiss.matches(event),
        }
    }
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self::new(Arc::new(KeybindingsConfig::default()))
    }
}
