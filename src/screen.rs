//! The app's two screens and the messages they send to the navigation stack.

mod booking;
mod listing;

use std::fmt;

use crate::catalog::ServiceRecord;
use crate::commands::Command;

pub use booking::BookingScreen;
pub use listing::ListingScreen;

/// Identity of a mounted screen instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenId(pub u64);

/// Tags location results with the screen and request that asked for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationTicket {
    pub screen: ScreenId,
    pub request: u64,
}

/// What a screen asks the App to do.
pub enum ScreenMsg {
    /// Push the booking screen. `None` is a missing payload.
    OpenBooking(Option<ServiceRecord>),
    /// Start location request number `request` for this screen.
    RequestLocation { request: u64 },
    /// Spawn a side effect.
    Run(Box<dyn Command>),
}

impl fmt::Debug for ScreenMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenBooking(record) => f
                .debug_tuple("OpenBooking")
                .field(&record.as_ref().map(|r| &r.id))
                .finish(),
            Self::RequestLocation { request } => f
                .debug_struct("RequestLocation")
                .field("request", request)
                .finish(),
            Self::Run(command) => f.debug_tuple("Run").field(&command.name()).finish(),
        }
    }
}

impl<T: Command> From<T> for ScreenMsg {
    fn from(value: T) -> Self {
        Self::Run(Box::new(value))
    }
}
