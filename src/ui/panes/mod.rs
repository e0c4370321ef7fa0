//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`conversation`]: The message log with sender labels, the typing cursor
//!   on a reply in progress, and the "typing…" indicator row
//! - [`input`]: The text-entry box and terminal cursor placement
//! - [`status`]: Status bar with the cycle badge and keybindings
//! - `utils`: Word wrap and input layout shared by the panes
//!
//! Each pane module exports a `render_*` function that draws into a [`Rect`]
//! handed out by [`App`](crate::ui::App).
//!
//! [`Rect`]: ratatui::layout::Rect

mod utils;

pub mod conversation;
pub mod input;
pub mod status;

// Re-export render functions for convenience
pub use conversation::render_conversation_pane;
pub use input::render_input_pane;
pub use status::{render_status_bar, CycleBadge};
