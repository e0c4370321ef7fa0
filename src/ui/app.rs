//! Main TUI application state and logic

use crate::conversation::{Conversation, Phase};
use crate::error::Result;
use crate::input::{self, InputAction, InputLine};
use crate::ui::panes::{self, CycleBadge};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::time::{Duration, Instant};
use tracing::warn;

/// Upper bound on how long the loop sleeps when nothing is scheduled
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Input box height including borders
const INPUT_HEIGHT: u16 = 5;

/// Rows moved per PageUp/PageDown
const SCROLL_STEP: usize = 5;

/// The main application state
pub struct App {
    /// Submit cycle, message log and animator
    pub conversation: Conversation,

    /// The text-entry line
    pub input: InputLine,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether the status message reports a failure
    pub status_is_error: bool,
}

impl App {
    pub fn new(conversation: Conversation) -> Self {
        App {
            conversation,
            input: InputLine::new(),
            should_quit: false,
            status_message: String::from("Ready!"),
            status_is_error: false,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            let now = Instant::now();
            self.tick(now);

            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Sleep until the next character or reply is due, or a key arrives
            if event::poll(self.poll_timeout(Instant::now()))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key, Instant::now());
                    }
                }
            }
        }

        Ok(())
    }

    /// Advance the conversation; failures land in the status bar
    pub fn tick(&mut self, now: Instant) {
        let was_busy = self.conversation.is_busy();
        if let Err(e) = self.conversation.tick(now) {
            warn!("conversation tick failed: {e}");
            self.set_status(format!("Error: {}", e), true);
            return;
        }
        if was_busy && !self.conversation.is_busy() {
            self.set_status("Ready!", false);
        }
    }

    fn poll_timeout(&self, now: Instant) -> Duration {
        match self.conversation.next_deadline() {
            Some(deadline) => deadline.saturating_duration_since(now).min(IDLE_POLL),
            None => IDLE_POLL,
        }
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Conversation, input box, status bar
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(INPUT_HEIGHT),
                Constraint::Length(1),
            ])
            .split(size);

        let badge = self.badge();
        let waiting = self.conversation.is_busy();

        panes::render_conversation_pane(frame, chunks[0], self.conversation.log_mut());
        panes::render_input_pane(frame, chunks[1], &self.input, waiting);
        panes::render_status_bar(
            frame,
            chunks[2],
            &self.status_message,
            badge,
            self.status_is_error,
        );
    }

    fn badge(&self) -> CycleBadge {
        match self.conversation.phase() {
            Phase::Idle => CycleBadge::Ready,
            Phase::AwaitingReply { .. } => CycleBadge::Waiting,
            Phase::Typing { slot, .. } => {
                let (done, total) = self
                    .conversation
                    .animator()
                    .progress(*slot)
                    .unwrap_or((0, 0));
                CycleBadge::Typing(done, total)
            }
        }
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
            }
            KeyCode::Char('x') if ctrl => self.stop_reply(),
            KeyCode::PageUp => {
                self.conversation.log_mut().scroll_up(SCROLL_STEP);
            }
            KeyCode::PageDown => {
                self.conversation.log_mut().scroll_down(SCROLL_STEP);
            }
            KeyCode::End if ctrl => {
                self.conversation.log_mut().scroll_to_newest();
            }
            _ => match input::classify(key) {
                InputAction::Submit => self.submit(now),
                action => {
                    self.input.apply(action);
                }
            },
        }
    }

    fn submit(&mut self, now: Instant) {
        match self.conversation.submit(&mut self.input, now) {
            Ok(_) => {
                // Sending always brings the newest message into view
                self.conversation.log_mut().scroll_to_newest();
                self.set_status("Sent", false);
            }
            Err(e) if e.is_user_facing() => {
                self.set_status(e.to_string(), false);
            }
            Err(e) => {
                warn!("submit failed: {e}");
                self.set_status(format!("Error: {}", e), true);
            }
        }
    }

    fn stop_reply(&mut self) {
        match self.conversation.stop_reply() {
            Ok(true) => self.set_status("Reply stopped", false),
            Ok(false) => self.set_status("Nothing to stop", false),
            Err(e) => {
                warn!("stopping reply failed: {e}");
                self.set_status(format!("Error: {}", e), true);
            }
        }
    }

    fn set_status(&mut self, message: impl Into<String>, is_error: bool) {
        self.status_message = message.into();
        self.status_is_error = is_error;
    }
}
