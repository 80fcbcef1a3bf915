//! Async side effects.
//!
//! Screens never perform I/O themselves. They return a [`Command`], the App
//! spawns it on the runtime, and the command reports back through the app
//! message channel.

mod handoff;
mod location;

use async_trait::async_trait;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;

use crate::app::AppMessage;

pub use handoff::{HandoffCmd, MessageDraft};
pub use location::RequestLocationCmd;

/// An async operation spawned by the App.
#[async_trait]
pub trait Command: Send + 'static {
    /// Human-readable name, used in logs and error messages.
    fn name(&self) -> String;

    async fn execute(self: Box<Self>, app_tx: UnboundedSender<AppMessage>) -> Result<()>;
}
