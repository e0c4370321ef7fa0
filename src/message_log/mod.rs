//! Append-only conversation log
//!
//! Every message lives in a display slot addressed by a [`SlotId`]. A slot is
//! created by [`MessageLog::append`], grows through [`MessageLog::write`] while
//! a reply is being typed, and is sealed once its text is final. Slots are
//! never removed; the only transient row is the typing indicator, which is
//! kept outside the message list.

use crate::error::{ChatError, Result};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Source of per-log ids so handles cannot cross logs
static NEXT_LOG_ID: AtomicUsize = AtomicUsize::new(0);

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// Label shown in front of the message in the conversation pane
    pub fn label(self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Bot => "Bot",
        }
    }
}

/// Opaque handle to a display slot, valid only for the log that issued it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId {
    log: usize,
    index: usize,
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

/// A message and the slot it is rendered into
#[derive(Debug, Clone)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    pub slot: SlotId,
    /// Set once the text is final
    pub complete: bool,
}

/// Anything an animator can reveal text into
pub trait DisplaySink {
    /// Extend the slot's text
    fn write(&mut self, slot: SlotId, text: &str) -> Result<()>;

    /// Mark the slot's text as final
    fn seal(&mut self, slot: SlotId) -> Result<()>;
}

/// Ordered list of messages plus the viewport state for the conversation pane
#[derive(Debug, Clone)]
pub struct MessageLog {
    id: usize,
    messages: Vec<Message>,
    indicator: bool,
    /// Scroll offset in rendered rows; `usize::MAX` pins to the bottom and is
    /// clamped by the renderer
    pub scroll: usize,
    follow_tail: bool,
}

impl MessageLog {
    pub fn new() -> Self {
        MessageLog {
            id: NEXT_LOG_ID.fetch_add(1, Ordering::Relaxed),
            messages: Vec::new(),
            indicator: false,
            scroll: usize::MAX,
            follow_tail: true,
        }
    }

    /// Create a new slot at the end of the log and return its handle
    pub fn append(&mut self, sender: Sender, text: impl Into<String>) -> SlotId {
        let slot = SlotId {
            log: self.id,
            index: self.messages.len(),
        };
        self.messages.push(Message {
            sender,
            text: text.into(),
            slot,
            complete: false,
        });
        self.pin_to_tail();
        slot
    }

    /// Replace the slot's text
    pub fn replace(&mut self, slot: SlotId, text: &str) -> Result<()> {
        let message = self.open_slot(slot)?;
        message.text.clear();
        message.text.push_str(text);
        self.pin_to_tail();
        Ok(())
    }

    pub fn get(&self, slot: SlotId) -> Option<&Message> {
        if slot.log != self.id {
            return None;
        }
        self.messages.get(slot.index)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Show the "bot is typing" row after the last message
    pub fn show_indicator(&mut self) {
        self.indicator = true;
        self.pin_to_tail();
    }

    pub fn clear_indicator(&mut self) {
        self.indicator = false;
    }

    pub fn indicator_visible(&self) -> bool {
        self.indicator
    }

    pub fn is_following(&self) -> bool {
        self.follow_tail
    }

    /// Scroll towards older messages; stops following new output
    pub fn scroll_up(&mut self, rows: usize) {
        self.follow_tail = false;
        self.scroll = self.scroll.saturating_sub(rows);
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.scroll = self.scroll.saturating_add(rows);
    }

    /// Limit the offset to `max_scroll`, the last valid offset for the
    /// rendered content. Reaching it resumes following new output.
    pub fn clamp_scroll(&mut self, max_scroll: usize) {
        if self.scroll >= max_scroll {
            self.scroll = max_scroll;
            self.follow_tail = true;
        }
    }

    /// Jump to the newest message and resume following it
    pub fn scroll_to_newest(&mut self) {
        self.follow_tail = true;
        self.scroll = usize::MAX;
    }

    fn pin_to_tail(&mut self) {
        if self.follow_tail {
            self.scroll = usize::MAX;
        }
    }

    fn slot_mut(&mut self, slot: SlotId) -> Result<&mut Message> {
        if slot.log != self.id {
            return Err(ChatError::UnknownSlot { slot });
        }
        self.messages
            .get_mut(slot.index)
            .ok_or(ChatError::UnknownSlot { slot })
    }

    fn open_slot(&mut self, slot: SlotId) -> Result<&mut Message> {
        let message = self.slot_mut(slot)?;
        if message.complete {
            return Err(ChatError::SlotSealed { slot });
        }
        Ok(message)
    }
}

impl DisplaySink for MessageLog {
    fn write(&mut self, slot: SlotId, text: &str) -> Result<()> {
        self.open_slot(slot)?.text.push_str(text);
        self.pin_to_tail();
        Ok(())
    }

    fn seal(&mut self, slot: SlotId) -> Result<()> {
        self.slot_mut(slot)?.complete = true;
        Ok(())
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_returns_slots_in_arrival_order() {
        let mut log = MessageLog::new();
        let a = log.append(Sender::User, "hi");
        let b = log.append(Sender::Bot, "");
        assert!(a < b);
        assert_eq!(log.messages()[0].text, "hi");
        assert_eq!(log.messages()[1].sender, Sender::Bot);
    }

    #[test]
    fn repeated_writes_extend_the_slot() {
        let mut log = MessageLog::new();
        let slot = log.append(Sender::Bot, "");
        for ch in ["a", "b", "c"] {
            log.write(slot, ch).unwrap();
        }
        assert_eq!(log.get(slot).unwrap().text, "abc");

        log.replace(slot, "xyz").unwrap();
        assert_eq!(log.get(slot).unwrap().text, "xyz");
    }

    #[test]
    fn sealed_slot_rejects_writes() {
        let mut log = MessageLog::new();
        let slot = log.append(Sender::Bot, "done");
        log.seal(slot).unwrap();
        assert!(matches!(
            log.write(slot, "!"),
            Err(ChatError::SlotSealed { .. })
        ));
        assert_eq!(log.get(slot).unwrap().text, "done");
    }

    #[test]
    fn foreign_handle_with_valid_index_is_rejected() {
        let mut other = MessageLog::new();
        let foreign = other.append(Sender::User, "x");

        let mut log = MessageLog::new();
        let own = log.append(Sender::Bot, "");
        assert!(matches!(
            log.write(foreign, "leak"),
            Err(ChatError::UnknownSlot { .. })
        ));
        assert!(matches!(
            log.seal(foreign),
            Err(ChatError::UnknownSlot { .. })
        ));
        assert!(log.get(foreign).is_none());
        assert_eq!(log.get(own).unwrap().text, "");
        assert!(!log.get(own).unwrap().complete);
    }

    #[test]
    fn foreign_handle_out_of_range_is_rejected() {
        let mut other = MessageLog::new();
        other.append(Sender::User, "a");
        let foreign = other.append(Sender::User, "b");

        let mut log = MessageLog::new();
        log.append(Sender::User, "only one");
        assert!(matches!(
            log.write(foreign, "x"),
            Err(ChatError::UnknownSlot { .. })
        ));
    }

    #[test]
    fn scrolling_up_stops_following_until_jump_to_newest() {
        let mut log = MessageLog::new();
        log.append(Sender::User, "one");
        log.scroll = 10;
        log.scroll_up(3);
        assert!(!log.is_following());
        assert_eq!(log.scroll, 7);

        log.append(Sender::User, "two");
        assert_eq!(log.scroll, 7);

        log.scroll_to_newest();
        assert!(log.is_following());
        assert_eq!(log.scroll, usize::MAX);
    }

    #[test]
    fn scrolling_back_to_the_bottom_resumes_following() {
        let mut log = MessageLog::new();
        log.append(Sender::User, "one");
        log.clamp_scroll(20);
        assert_eq!(log.scroll, 20);

        log.scroll_up(5);
        log.clamp_scroll(20);
        assert!(!log.is_following());
        assert_eq!(log.scroll, 15);

        log.scroll_down(10);
        log.clamp_scroll(20);
        assert!(log.is_following());
        assert_eq!(log.scroll, 20);

        log.append(Sender::Bot, "two");
        assert_eq!(log.scroll, usize::MAX);
    }
}
