use crossterm::event::KeyCode;

use crate::config::key::{Key, KeyBinding};
use crate::config::keybindings::{
    BookingKeybindings, DialogKeybindings, GlobalKeybindings, ListingKeybindings,
    NavigationKeybindings,
};

impl Default for GlobalKeybindings {
    fn default() -> Self {
        Self {
            quit: Key::new(KeyCode::Char('q')).into(),
            back: Key::new(KeyCode::Esc).into(),
        }
    }
}

impl Default for NavigationKeybindings {
    fn default() -> Self {
        Self {
            up: KeyBinding::multiple(vec![Key::new(KeyCode::Char('k')), Key::new(KeyCode::Up)]),
            down: KeyBinding::multiple(vec![
                Key::new(KeyCode::Char('j')),
                Key::new(KeyCode::Down),
            ]),
            home: KeyBinding::multiple(vec![
                Key::new(KeyCode::Char('g')),
                Key::new(KeyCode::Home),
            ]),
            end: KeyBinding::multiple(vec![Key::new(KeyCode::Char('G')), Key::new(KeyCode::End)]),
            select: Key::new(KeyCode::Enter).into(),
        }
    }
}

impl Default for ListingKeybindings {
    fn default() -> Self {
        Self {
            edit_neighborhood: Key::new(KeyCode::Char('/')).into(),
            edit_radius: Key::new(KeyCode::Char('d')).into(),
            toggle_category: KeyBinding::multiple(vec![
                Key::new(KeyCode::Char('c')),
                Key::new(KeyCode::Tab),
            ]),
            refresh_location: Key::new(KeyCode::Char('r')).into(),
            toggle_map: Key::new(KeyCode::Char('m')).into(),
        }
    }
}

impl Default for BookingKeybindings {
    fn default() -> Self {
        Self {
            handoff: Key::new(KeyCode::Char('w')).into(),
        }
    }
}

impl Default for DialogKeybindings {
    fn default() -> Self {
        Self {
            confirm: KeyBinding::multiple(vec![
                Key::new(KeyCode::Char('y')),
                Key::new(KeyCode::Char('Y')),
                Key::new(KeyCode::Enter),
            ]),
            cancel: KeyBinding::multiple(vec![
                Key::new(KeyCode::Char('n')),
                Key::new(KeyCode::Char('N')),
                Key::new(KeyCode::Esc),
            ]),
            dismiss: KeyBinding::multiple(vec![
                Key::new(KeyCode::Enter),
                Key::new(KeyCode::Esc),
                Key::new(KeyCode::Char('q')),
            ]),
        }
    }
}
