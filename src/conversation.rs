//! Submit cycle: user message, simulated delay, typed-out reply
//!
//! A [`Conversation`] owns the injected log, animator and reply source and
//! moves through three phases:
//!
//! ```text
//! Idle ──submit──► AwaitingReply { due } ──tick ≥ due──► Typing { slot } ──completion──► Idle
//! ```
//!
//! Only one cycle runs at a time. A submit while a cycle is in flight is
//! refused with [`ChatError::Busy`] and leaves the input untouched.

use crate::animator::{Completion, TypingAnimator};
use crate::config::Config;
use crate::error::{ChatError, Result};
use crate::input::InputLine;
use crate::message_log::{DisplaySink, MessageLog, Sender, SlotId};
use crate::reply::{CannedReplies, ReplySource};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default simulated round-trip before a reply starts typing
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(600);

/// Where the current cycle is
#[derive(Debug)]
pub enum Phase {
    Idle,
    /// User message shown, typing indicator up, reply not fetched yet
    AwaitingReply { user_text: String, due: Instant },
    /// Reply text is being revealed into `slot`
    Typing { slot: SlotId, completion: Completion },
}

pub struct Conversation {
    log: MessageLog,
    animator: TypingAnimator,
    replies: Box<dyn ReplySource>,
    reply_delay: Duration,
    phase: Phase,
}

impl Conversation {
    pub fn new(
        log: MessageLog,
        animator: TypingAnimator,
        replies: Box<dyn ReplySource>,
        reply_delay: Duration,
    ) -> Self {
        Conversation {
            log,
            animator,
            replies,
            reply_delay,
            phase: Phase::Idle,
        }
    }

    /// Empty log and canned replies, timed from `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let replies = CannedReplies::new(
            config.reply.catalog.clone(),
            config.reply.suffix.clone(),
            config.reply.seed,
        )?;
        Ok(Self::new(
            MessageLog::new(),
            TypingAnimator::new(config.cadence()),
            Box::new(replies),
            config.reply_delay(),
        ))
    }

    /// Send the input line's text as a user message.
    ///
    /// On success the line is cleared and the new message's slot returned.
    pub fn submit(&mut self, input: &mut InputLine, now: Instant) -> Result<SlotId> {
        if input.is_blank() {
            debug!("blank submit ignored");
            return Err(ChatError::InvalidInput);
        }
        if self.is_busy() {
            debug!("submit refused, cycle in flight");
            return Err(ChatError::Busy);
        }

        let user_text = input.take().trim().to_string();
        let slot = self.log.append(Sender::User, user_text.as_str());
        self.log.seal(slot)?;
        self.log.show_indicator();
        info!(%slot, chars = user_text.chars().count(), "user message sent");

        self.phase = Phase::AwaitingReply {
            user_text,
            due: now + self.reply_delay,
        };
        Ok(slot)
    }

    /// Advance the cycle to `now`
    pub fn tick(&mut self, now: Instant) -> Result<()> {
        self.phase = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::AwaitingReply { user_text, due } if due <= now => {
                self.start_reply(&user_text, now)?
            }
            other => other,
        };

        self.animator.tick(now, &mut self.log)?;

        if let Phase::Typing { slot, completion } = &mut self.phase {
            if let Some(outcome) = completion.try_outcome() {
                info!(%slot, ?outcome, "reply cycle ended");
                self.phase = Phase::Idle;
            }
        }
        Ok(())
    }

    /// Abandon the cycle in flight, keeping whatever reply text is already
    /// visible. Returns `false` when idle.
    pub fn stop_reply(&mut self) -> Result<bool> {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => Ok(false),
            Phase::AwaitingReply { .. } => {
                self.log.clear_indicator();
                info!("pending reply dropped");
                Ok(true)
            }
            Phase::Typing { slot, .. } => {
                self.animator.cancel(slot, &mut self.log)?;
                Ok(true)
            }
        }
    }

    /// Instant at which [`Conversation::tick`] next has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        match &self.phase {
            Phase::Idle => None,
            Phase::AwaitingReply { due, .. } => Some(*due),
            Phase::Typing { .. } => self.animator.next_deadline(),
        }
    }

    pub fn is_busy(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut MessageLog {
        &mut self.log
    }

    pub fn animator(&self) -> &TypingAnimator {
        &self.animator
    }

    /// Indicator off, reply fetched, bot slot created, animation started
    fn start_reply(&mut self, user_text: &str, now: Instant) -> Result<Phase> {
        self.log.clear_indicator();
        let reply = self.replies.reply(user_text);
        let slot = self.log.append(Sender::Bot, "");
        let completion = self.animator.animate(slot, &reply, now)?;
        info!(%slot, chars = reply.chars().count(), "reply started typing");
        Ok(Phase::Typing { slot, completion })
    }
}
