//! # Introduction
//!
//! chatty is a terminal chat widget. Text typed by the user is echoed into a
//! scrolling message log, and a reply picked from a fixed catalog is "typed
//! out" one character at a time, simulating a bot response. The terminal UI
//! is built with [ratatui](https://docs.rs/ratatui).
//!
//! ## Submit cycle
//!
//! ```text
//! Enter → user message → typing indicator → delay → reply source → animator → log
//! ```
//!
//! 1. [`input`]: the text-entry line and key classification (plain Enter
//!    sends, modified Enter inserts a newline).
//! 2. [`conversation`]: the cycle controller; owns the injected log, animator
//!    and reply source and refuses overlapping submits.
//! 3. [`reply`]: the [`reply::ReplySource`] trait and the canned catalog.
//! 4. [`animator`]: per-slot typing sessions advanced by a scheduler tick,
//!    each with a single-resolution [`animator::Completion`].
//! 5. [`message_log`]: append-only display slots and viewport state.
//! 6. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! Configuration lives in [`config`], errors in [`error`].

pub mod animator;
pub mod config;
pub mod conversation;
pub mod error;
pub mod input;
pub mod message_log;
pub mod reply;
pub mod ui;
