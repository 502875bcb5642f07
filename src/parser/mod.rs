//! Escape-sequence state machine for terminal input
//!
//! Converts the raw byte stream a terminal sends into [`Event`]s, one byte
//! at a time. The parser is streaming: `feed` drains every currently
//! available byte without blocking, and state is preserved across calls so
//! sequences may arrive split over arbitrary chunk boundaries.
//!
//! The one asynchronous wrinkle is ESC disambiguation: a lone ESC is
//! indistinguishable from the start of a sequence until either another byte
//! arrives or a short timeout passes. The parser records the deadline; the
//! embedder drives the clock through [`Parser::deadline`] and
//! [`Parser::poll_timeout`].

mod table;

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::error::{Error, Result};
use crate::event::{control_char, Event, Modifiers, SpecialKey};
use table::{Act, Handler, State};

/// Default lone-ESC disambiguation delay
pub const DEFAULT_ESC_TIMEOUT: Duration = Duration::from_millis(10);

/// Initial capacity of the parameter accumulation store
const STORE_CAPACITY: usize = 64;

/// The terminal input parser
#[derive(Debug)]
pub struct Parser {
    state: State,
    /// Unconsumed input bytes; processing pops from the front
    queue: VecDeque<u8>,
    /// Accumulates CSI parameter bytes and partial UTF-8 sequences
    store: Vec<u8>,
    /// Deadline for interpreting a lone ESC as a standalone keypress
    deadline: Option<Instant>,
    esc_timeout: Duration,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a parser with the default ESC disambiguation timeout
    pub fn new() -> Self {
        Self::with_esc_timeout(DEFAULT_ESC_TIMEOUT)
    }

    /// Create a parser with a specific ESC disambiguation timeout
    pub fn with_esc_timeout(esc_timeout: Duration) -> Self {
        Parser {
            state: State::Rest,
            queue: VecDeque::new(),
            store: Vec::with_capacity(STORE_CAPACITY),
            deadline: None,
            esc_timeout,
        }
    }

    /// Feed a chunk of input bytes, appending decoded events to `events`.
    ///
    /// Processes every queued byte before returning; never blocks waiting
    /// for more input. On an unknown `CSI <code> ~` sequence the offending
    /// byte is consumed, the state resets to Rest, and the error is
    /// returned; events decoded earlier in the chunk are already in
    /// `events` and remaining bytes stay queued for the next call.
    pub fn feed(&mut self, bytes: &[u8], events: &mut Vec<Event>) -> Result<()> {
        self.queue.extend(bytes);

        while let Some(c) = self.queue.pop_front() {
            // Any byte beats the pending ESC timeout
            self.deadline = None;

            trace!(byte = c, state = ?self.state, "input byte");
            let acts = table::lookup(self.state, c);
            self.apply(c, acts, events)?;
        }
        Ok(())
    }

    /// The instant at which a pending lone ESC resolves, if one is armed
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fire the lone-ESC timeout if its deadline has passed.
    ///
    /// Returns the standalone ESC control event when it fires. Safe to call
    /// at any time; does nothing while no timeout is armed or before the
    /// deadline.
    pub fn poll_timeout(&mut self, now: Instant) -> Option<Event> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;
        self.state = State::Rest;
        trace!("lone ESC timeout fired");
        control_char(0x1B, false).map(Event::Control)
    }

    fn apply(&mut self, c: u8, acts: &'static [Act], events: &mut Vec<Event>) -> Result<()> {
        for act in acts {
            match *act {
                Act::Goto(next) => {
                    trace!(from = ?self.state, to = ?next, "state change");
                    self.state = next;
                }
                Act::ArmEscTimeout => {
                    self.deadline = Some(Instant::now() + self.esc_timeout);
                }
                Act::Keypress => {
                    events.push(Event::Keypress((c as char).to_string()));
                }
                Act::Control { fatal } => {
                    if let Some(ctrl) = control_char(c, fatal) {
                        events.push(Event::Control(ctrl));
                    }
                }
                Act::Store => {
                    self.store.push(c);
                }
                Act::Utf8Lead => self.utf8_lead(c, events),
                Act::Utf8Cont { next, emit } => {
                    if c & 0xC0 != 0x80 {
                        // Not 0b10xxxxxx: abandon the sequence
                        self.dump_invalid(c, events);
                        break;
                    }
                    self.store.push(c);
                    if emit {
                        let text = self.fetch_store();
                        events.push(Event::Keypress(text));
                    }
                    self.state = next;
                }
                Act::Abort => {
                    self.dump_invalid(c, events);
                    break;
                }
                Act::Call(handler) => {
                    if let Err(e) = self.call(handler, events) {
                        self.state = State::Rest;
                        return Err(e);
                    }
                }
            }
        }
        Ok(())
    }

    /// Classify a byte arriving in Rest: UTF-8 lead bytes open a
    /// multi-byte sequence, anything else is a one-byte keypress.
    fn utf8_lead(&mut self, c: u8, events: &mut Vec<Event>) {
        if c & 0xF8 == 0xF0 {
            // 0b11110xxx
            self.state = State::Utf8Rem3;
        } else if c & 0xF0 == 0xE0 {
            // 0b1110xxxx
            self.state = State::Utf8Rem2;
        } else if c & 0xE0 == 0xC0 {
            // 0b110xxxxx
            self.state = State::Utf8Rem1;
        } else {
            events.push(Event::Keypress((c as char).to_string()));
            return;
        }
        self.store.push(c);
    }

    /// Invalid-sequence recovery: every buffered byte becomes an
    /// individual keypress, and the offending byte is reprocessed from
    /// Rest on the next loop iteration.
    fn dump_invalid(&mut self, c: u8, events: &mut Vec<Event>) {
        for b in self.store.drain(..) {
            events.push(Event::Keypress((b as char).to_string()));
        }
        self.queue.push_front(c);
        self.state = State::Rest;
    }

    /// Take the store contents as text, resetting its length to zero
    fn fetch_store(&mut self) -> String {
        let s = String::from_utf8_lossy(&self.store).into_owned();
        self.store.clear();
        s
    }

    fn call(&mut self, handler: Handler, events: &mut Vec<Event>) -> Result<()> {
        match handler {
            Handler::CursorPos => {
                let s = self.fetch_store();
                let mut fields = s.split(';');
                let row = fields.next().and_then(|f| f.parse().ok()).unwrap_or(0);
                let col = fields.next().and_then(|f| f.parse().ok()).unwrap_or(0);
                trace!(row, col, "cursor position report");
                events.push(Event::Position { row, col });
            }
            Handler::DeviceStatus => {
                let status = self.fetch_store();
                trace!(status = %status, "device status report");
                events.push(Event::DeviceStatus(status));
            }
            Handler::KeyId(name) => {
                let s = self.fetch_store();
                let mods = Modifiers::from_params(&s);
                events.push(Event::Special { name, mods });
            }
            Handler::TildeKey => {
                let s = self.fetch_store();
                let code = s.split(';').next().and_then(|f| f.parse().ok());
                let name = code
                    .and_then(SpecialKey::from_tilde_code)
                    .ok_or_else(|| Error::UnknownKeySequence(s.clone()))?;
                let mods = Modifiers::from_params(&s);
                events.push(Event::Special { name, mods });
            }
        }
        Ok(())
    }
}
