//! UI building blocks.
//!
//! - [`Component`]: reusable, interactive widgets that know nothing about the domain
//! - [`Screen`]: full-page views that turn component events into domain messages
//! - [`EventResult`]: outcome of handling a key

pub mod components;
pub mod widgets;

mod error_dialog;
mod status_bar;
mod toast;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

pub use color_eyre::Result;

use crate::Theme;

pub use components::{ConfirmDialog, ConfirmEvent, List, ListEvent, ListRow, TextInput, TextInputEvent};
pub use error_dialog::{ErrorDialog, ErrorDialogEvent};
pub use status_bar::StatusBar;
pub use toast::{Toast, ToastManager, ToastType};
pub use widgets::Spinner;

/// Result of handling an input event.
///
/// - `Ignored`: the handler did not recognize the input, the parent should process it
/// - `Consumed`: the input was handled but produced nothing
/// - `Event(E)`: the input was handled and produced an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult<E> {
    Ignored,
    Consumed,
    Event(E),
}

impl<E> From<E> for EventResult<E> {
    fn from(event: E) -> Self {
        Self::Event(event)
    }
}

/// A key hint shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybinding {
    pub key: String,
    pub description: String,
}

impl Keybinding {
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
        }
    }
}

/// Interactive UI building block.
pub trait Component {
    /// What the component reports to its parent, e.g. `ListEvent<T>`.
    type Output;

    /// Handle a key event.
    ///
    /// Returns `Err(...)` if an error occurred during handling.
    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        _ = key;
        Ok(EventResult::Ignored)
    }

    /// Called on each tick for animations and time-based updates.
    fn handle_tick(&mut self) {}

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);
}

/// Full-page view that orchestrates components.
///
/// Screens translate component events into messages for the app's
/// navigation stack.
pub trait Screen {
    type Msg;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Msg>>;

    fn handle_tick(&mut self) {}

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    /// Navigation path shown in the status bar, e.g. `["Services", "Booking"]`.
    fn breadcrumbs(&self) -> Vec<String> {
        vec![]
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        vec![]
    }
}
