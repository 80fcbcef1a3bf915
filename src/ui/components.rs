mod confirm_dialog;
mod list;
mod text_input;

pub use confirm_dialog::{ConfirmDialog, ConfirmEvent};
pub use list::{List, ListEvent, ListRow};
pub use text_input::{TextInput, TextInputEvent};
