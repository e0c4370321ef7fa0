//! Error types for the chat widget
//!
//! [`ChatError`] covers the few ways a chat operation can be refused. Only
//! [`ChatError::InvalidInput`] and [`ChatError::Busy`] are expected in normal
//! use; they are reported in the status bar and the session carries on.

use crate::message_log::SlotId;
use thiserror::Error;

/// Errors produced by the message log, animator, conversation and config layers
#[derive(Error, Debug)]
pub enum ChatError {
    /// Submitted text was empty or whitespace only
    #[error("nothing to send")]
    InvalidInput,

    /// A submit arrived while a previous reply was still pending or typing
    #[error("still replying to the previous message")]
    Busy,

    /// A typing session is already running against this slot
    #[error("slot {slot} already has an active typing session")]
    SlotBusy { slot: SlotId },

    /// The handle was not issued by this log
    #[error("unknown display slot {slot}")]
    UnknownSlot { slot: SlotId },

    /// The message in this slot is complete and no longer accepts writes
    #[error("slot {slot} is sealed")]
    SlotSealed { slot: SlotId },

    /// A configuration value is out of range
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChatError {
    /// True for errors caused by user input rather than program state
    pub fn is_user_facing(&self) -> bool {
        matches!(self, ChatError::InvalidInput | ChatError::Busy)
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
