//! Character-by-character reveal of reply text
//!
//! A [`TypingAnimator`] owns one session per display slot. Sessions do not
//! own timers; the event loop calls [`TypingAnimator::tick`] with the current
//! instant and every character that has come due is written to the
//! [`DisplaySink`] in source order. The loop can sleep until
//! [`TypingAnimator::next_deadline`].
//!
//! ```text
//! animate(slot, text) ──► Session { cursor: 0 }
//!                             │ tick: one char per cadence
//!                             ▼
//!                         Session { cursor: len } ──► seal(slot), Completion = Finished
//! ```
//!
//! Each session hands out a [`Completion`] that resolves exactly once, either
//! after the last character has been written or when the session is cancelled.

use crate::error::{ChatError, Result};
use crate::message_log::{DisplaySink, SlotId};
use rustc_hash::FxHashMap;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::debug;

/// Default delay between two revealed characters
pub const DEFAULT_CADENCE: Duration = Duration::from_millis(25);

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every character was written
    Finished,
    /// The session was cancelled before the text was fully revealed
    Cancelled,
}

/// Single-resolution completion signal for one session
///
/// Can be awaited, or polled without a runtime through [`Completion::try_outcome`].
#[derive(Debug)]
pub struct Completion {
    rx: oneshot::Receiver<Outcome>,
    resolved: Option<Outcome>,
}

impl Completion {
    /// Non-blocking check; returns the outcome once the session has ended
    pub fn try_outcome(&mut self) -> Option<Outcome> {
        if self.resolved.is_none() {
            self.resolved = match self.rx.try_recv() {
                Ok(outcome) => Some(outcome),
                Err(TryRecvError::Empty) => None,
                // The animator was dropped with the session still running
                Err(TryRecvError::Closed) => Some(Outcome::Cancelled),
            };
        }
        self.resolved
    }
}

impl Future for Completion {
    type Output = Outcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Outcome> {
        if let Some(outcome) = self.resolved {
            return Poll::Ready(outcome);
        }
        let outcome = match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(outcome)) => outcome,
            Poll::Ready(Err(_)) => Outcome::Cancelled,
            Poll::Pending => return Poll::Pending,
        };
        self.resolved = Some(outcome);
        Poll::Ready(outcome)
    }
}

/// One in-progress reveal against a single slot
#[derive(Debug)]
struct Session {
    source: Vec<char>,
    cursor: usize,
    next_due: Instant,
    done: Option<oneshot::Sender<Outcome>>,
}

impl Session {
    fn new(text: &str, now: Instant, cadence: Duration) -> (Self, Completion) {
        let (tx, rx) = oneshot::channel();
        let source: Vec<char> = text.chars().collect();
        // An empty reply has nothing to wait for and ends on the next tick
        let next_due = if source.is_empty() { now } else { now + cadence };
        let session = Session {
            source,
            cursor: 0,
            next_due,
            done: Some(tx),
        };
        let completion = Completion { rx, resolved: None };
        (session, completion)
    }

    /// Next character if it is due at `now`; advances the cursor
    fn due_char(&mut self, now: Instant, cadence: Duration) -> Option<char> {
        if self.next_due > now {
            return None;
        }
        let ch = *self.source.get(self.cursor)?;
        self.cursor += 1;
        self.next_due += cadence;
        Some(ch)
    }

    /// All characters written; an empty session also waits for its due time
    fn is_finished(&self, now: Instant) -> bool {
        self.cursor >= self.source.len() && (self.cursor > 0 || self.next_due <= now)
    }

    fn resolve(mut self, outcome: Outcome) {
        if let Some(tx) = self.done.take() {
            // Nobody waiting is fine
            let _ = tx.send(outcome);
        }
    }
}

/// Scheduler for typing sessions, at most one per slot
#[derive(Debug)]
pub struct TypingAnimator {
    cadence: Duration,
    sessions: FxHashMap<SlotId, Session>,
}

impl TypingAnimator {
    pub fn new(cadence: Duration) -> Self {
        TypingAnimator {
            cadence,
            sessions: FxHashMap::default(),
        }
    }

    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    /// Start revealing `text` into `slot`; the first character is due one
    /// cadence after `now`
    pub fn animate(&mut self, slot: SlotId, text: &str, now: Instant) -> Result<Completion> {
        if self.sessions.contains_key(&slot) {
            return Err(ChatError::SlotBusy { slot });
        }
        let (session, completion) = Session::new(text, now, self.cadence);
        debug!(%slot, chars = session.source.len(), "typing session started");
        self.sessions.insert(slot, session);
        Ok(completion)
    }

    /// Write every character due at `now`, then end sessions with nothing left to write.
    ///
    /// Returns the slots whose sessions finished during this tick.
    pub fn tick<S: DisplaySink + ?Sized>(
        &mut self,
        now: Instant,
        sink: &mut S,
    ) -> Result<Vec<SlotId>> {
        let mut slots: Vec<SlotId> = self.sessions.keys().copied().collect();
        slots.sort_unstable();

        let mut finished = Vec::new();
        for slot in slots {
            let Some(session) = self.sessions.get_mut(&slot) else {
                continue;
            };
            let mut buf = [0u8; 4];
            while let Some(ch) = session.due_char(now, self.cadence) {
                sink.write(slot, ch.encode_utf8(&mut buf))?;
            }
            if session.is_finished(now) {
                if let Some(session) = self.sessions.remove(&slot) {
                    sink.seal(slot)?;
                    session.resolve(Outcome::Finished);
                    debug!(%slot, "typing session finished");
                    finished.push(slot);
                }
            }
        }
        Ok(finished)
    }

    /// Stop the session on `slot`, sealing whatever was revealed so far.
    ///
    /// Returns `false` if no session was active.
    pub fn cancel<S: DisplaySink + ?Sized>(
        &mut self,
        slot: SlotId,
        sink: &mut S,
    ) -> Result<bool> {
        let Some(session) = self.sessions.remove(&slot) else {
            return Ok(false);
        };
        debug!(%slot, revealed = session.cursor, "typing session cancelled");
        sink.seal(slot)?;
        session.resolve(Outcome::Cancelled);
        Ok(true)
    }

    /// Earliest instant at which a tick would make progress
    pub fn next_deadline(&self) -> Option<Instant> {
        self.sessions.values().map(|s| s.next_due).min()
    }

    pub fn is_active(&self, slot: SlotId) -> bool {
        self.sessions.contains_key(&slot)
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Characters revealed so far on `slot`, if a session is active
    pub fn progress(&self, slot: SlotId) -> Option<(usize, usize)> {
        self.sessions
            .get(&slot)
            .map(|s| (s.cursor, s.source.len()))
    }
}

impl Default for TypingAnimator {
    fn default() -> Self {
        Self::new(DEFAULT_CADENCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message_log::{MessageLog, Sender};

    /// Records every sink call in order
    #[derive(Default)]
    struct RecordingSink {
        events: Vec<SinkEvent>,
    }

    #[derive(Debug, PartialEq)]
    enum SinkEvent {
        Write(SlotId, String),
        Seal(SlotId),
    }

    impl DisplaySink for RecordingSink {
        fn write(&mut self, slot: SlotId, text: &str) -> Result<()> {
            self.events.push(SinkEvent::Write(slot, text.to_string()));
            Ok(())
        }

        fn seal(&mut self, slot: SlotId) -> Result<()> {
            self.events.push(SinkEvent::Seal(slot));
            Ok(())
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn slot() -> SlotId {
        MessageLog::new().append(Sender::Bot, "")
    }

    #[test]
    fn writes_one_char_per_cadence() {
        let start = Instant::now();
        let mut animator = TypingAnimator::new(ms(25));
        let mut sink = RecordingSink::default();
        let slot = slot();
        let mut done = animator.animate(slot, "abc", start).unwrap();

        animator.tick(start + ms(10), &mut sink).unwrap();
        assert!(sink.events.is_empty());

        animator.tick(start + ms(25), &mut sink).unwrap();
        assert_eq!(sink.events, vec![SinkEvent::Write(slot, "a".into())]);
        assert_eq!(done.try_outcome(), None);
        assert_eq!(animator.progress(slot), Some((1, 3)));
    }

    #[test]
    fn n_writes_then_exactly_one_completion() {
        let start = Instant::now();
        let mut animator = TypingAnimator::new(ms(25));
        let mut sink = RecordingSink::default();
        let slot = slot();
        let text = "Hello, wörld";
        let mut done = animator.animate(slot, text, start).unwrap();

        let n = text.chars().count();
        for step in 1..=n {
            animator.tick(start + ms(25 * step as u64), &mut sink).unwrap();
            if step < n {
                assert_eq!(done.try_outcome(), None, "resolved early at {step}");
            }
        }
        assert_eq!(done.try_outcome(), Some(Outcome::Finished));

        let writes: Vec<&str> = sink
            .events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Write(_, s) => Some(s.as_str()),
                SinkEvent::Seal(_) => None,
            })
            .collect();
        assert_eq!(writes.len(), n);
        assert_eq!(writes.concat(), text);
        assert_eq!(sink.events.last(), Some(&SinkEvent::Seal(slot)));
        assert!(!animator.is_active(slot));
        assert_eq!(animator.next_deadline(), None);
    }

    #[test]
    fn late_tick_catches_up_in_order() {
        let start = Instant::now();
        let mut animator = TypingAnimator::new(ms(25));
        let mut log = MessageLog::new();
        let slot = log.append(Sender::Bot, "");
        let mut done = animator.animate(slot, "typing", start).unwrap();

        let finished = animator.tick(start + ms(1_000), &mut log).unwrap();
        assert_eq!(finished, vec![slot]);
        assert_eq!(log.get(slot).unwrap().text, "typing");
        assert!(log.get(slot).unwrap().complete);
        assert_eq!(done.try_outcome(), Some(Outcome::Finished));
    }

    #[test]
    fn no_trailing_writes_after_finish() {
        let start = Instant::now();
        let mut animator = TypingAnimator::new(ms(25));
        let mut sink = RecordingSink::default();
        let slot = slot();
        animator.animate(slot, "ok", start).unwrap();

        animator.tick(start + ms(50), &mut sink).unwrap();
        let count = sink.events.len();
        animator.tick(start + ms(500), &mut sink).unwrap();
        assert_eq!(sink.events.len(), count);
    }

    #[test]
    fn second_session_on_active_slot_is_rejected() {
        let start = Instant::now();
        let mut animator = TypingAnimator::default();
        let slot = slot();
        animator.animate(slot, "first", start).unwrap();
        assert!(matches!(
            animator.animate(slot, "second", start),
            Err(ChatError::SlotBusy { .. })
        ));
        assert_eq!(animator.active_sessions(), 1);
    }

    #[test]
    fn cancel_resolves_cancelled_and_stops_writes() {
        let start = Instant::now();
        let mut animator = TypingAnimator::new(ms(25));
        let mut sink = RecordingSink::default();
        let slot = slot();
        let mut done = animator.animate(slot, "abcdef", start).unwrap();

        animator.tick(start + ms(50), &mut sink).unwrap();
        assert!(animator.cancel(slot, &mut sink).unwrap());
        assert_eq!(done.try_outcome(), Some(Outcome::Cancelled));

        let before = sink.events.len();
        animator.tick(start + ms(500), &mut sink).unwrap();
        assert_eq!(sink.events.len(), before);
        assert!(!animator.cancel(slot, &mut sink).unwrap());
    }

    #[test]
    fn empty_text_finishes_on_next_tick_without_writes() {
        let start = Instant::now();
        let mut animator = TypingAnimator::new(ms(25));
        let mut sink = RecordingSink::default();
        let slot = slot();
        let mut done = animator.animate(slot, "", start).unwrap();
        assert_eq!(animator.next_deadline(), Some(start));

        animator.tick(start, &mut sink).unwrap();
        assert_eq!(sink.events, vec![SinkEvent::Seal(slot)]);
        assert_eq!(done.try_outcome(), Some(Outcome::Finished));
    }

    #[tokio::test]
    async fn completion_can_be_awaited() {
        let start = Instant::now();
        let mut animator = TypingAnimator::new(ms(25));
        let mut sink = RecordingSink::default();
        let slot = slot();
        let done = animator.animate(slot, "hey", start).unwrap();

        animator.tick(start + ms(75), &mut sink).unwrap();
        assert_eq!(done.await, Outcome::Finished);
    }

    #[tokio::test]
    async fn dropped_animator_resolves_as_cancelled() {
        let mut animator = TypingAnimator::default();
        let done = animator.animate(slot(), "never shown", Instant::now()).unwrap();
        drop(animator);
        assert_eq!(done.await, Outcome::Cancelled);
    }
}
