//! Terminal session
//!
//! Ties the pieces together: a [`Parser`] decoding input bytes, a
//! [`Dispatcher`] delivering the resulting events to observers, and an
//! [`Output`] driver writing escape sequences back to the terminal.
//!
//! The session does no I/O of its own on the input side. The embedder owns
//! the read loop and hands bytes to [`Session::feed`]; between reads it
//! consults [`Session::deadline`] so the poll timeout can wake it when a
//! lone ESC needs resolving.

use std::io::Write;

use tracing::{debug, info};

use crate::config::Config;
use crate::dispatch::{Dispatcher, SubscriberId};
use crate::error::{Error, Result};
use crate::event::{Event, EventKind};
use crate::output::Output;
use crate::parser::Parser;
use crate::tty::WindowSize;

/// Facts about the terminal a session is constructed over.
///
/// Gathering them is the embedder's job (see [`crate::tty`]); keeping the
/// session itself free of descriptor handling makes it testable against an
/// in-memory sink.
#[derive(Debug)]
pub struct SessionOptions<W: Write> {
    pub output: W,
    pub input_is_tty: bool,
    pub output_is_tty: bool,
    /// Terminal type, normally from `TERM`
    pub term: Option<String>,
    pub size: WindowSize,
    pub config: Config,
}

/// A running terminal session
pub struct Session<W: Write> {
    parser: Parser,
    dispatcher: Dispatcher,
    output: Output<W>,
    torn_down: bool,
}

impl<W: Write> Session<W> {
    /// Construct a session, validating the terminal first.
    ///
    /// Fails with [`Error::NotATty`] unless both ends are terminal
    /// devices, and with [`Error::UnusableTerminal`] when the terminal
    /// type is missing or known to lack escape-sequence support.
    pub fn new(opts: SessionOptions<W>) -> Result<Self> {
        if !opts.input_is_tty || !opts.output_is_tty {
            return Err(Error::NotATty);
        }
        match opts.term.as_deref() {
            None | Some("") | Some("dumb") => return Err(Error::UnusableTerminal),
            Some(term) => info!(term, rows = opts.size.rows, cols = opts.size.cols, "session open"),
        }

        let charset = opts.config.charset.charset();
        Ok(Session {
            parser: Parser::with_esc_timeout(opts.config.escape_timeout()),
            dispatcher: Dispatcher::new(),
            output: Output::new(opts.output, opts.size.rows, opts.size.cols, charset),
            torn_down: false,
        })
    }

    /// Register an observer for one kind of event
    pub fn subscribe<F>(&mut self, kind: EventKind, callback: F) -> SubscriberId
    where
        F: FnMut(&Event) + 'static,
    {
        self.dispatcher.subscribe(kind, callback)
    }

    /// Remove an observer
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.dispatcher.unsubscribe(id)
    }

    /// Decode a chunk of input bytes and deliver the resulting events
    pub fn feed(&mut self, bytes: &[u8]) -> Result<()> {
        let mut events = Vec::new();
        let parse_result = self.parser.feed(bytes, &mut events);
        for event in &events {
            self.deliver(event)?;
        }
        parse_result
    }

    /// Deadline of a pending lone-ESC timeout, for the embedder's poll
    pub fn deadline(&self) -> Option<std::time::Instant> {
        self.parser.deadline()
    }

    /// Fire the lone-ESC timeout if due, delivering the resulting event
    pub fn poll_timeout(&mut self, now: std::time::Instant) -> Result<()> {
        if let Some(event) = self.parser.poll_timeout(now) {
            self.deliver(&event)?;
        }
        Ok(())
    }

    fn deliver(&mut self, event: &Event) -> Result<()> {
        if let Event::Control(ctrl) = event {
            if ctrl.fatal_if_unhandled && self.dispatcher.count(EventKind::Control) == 0 {
                self.terminate()?;
            }
        }
        self.dispatcher.dispatch(event);
        Ok(())
    }

    /// Unobserved interrupt: restore the screen and end the process
    fn terminate(&mut self) -> Result<()> {
        debug!("unhandled interrupt, terminating");
        self.output.clear()?;
        self.output.moveto(1, 1)?;
        self.output.write("terminated (^C)\n")?;
        self.output.sink_mut().flush()?;
        std::process::exit(1)
    }

    /// Record a new terminal size and tell observers about it
    pub fn notify_resize(&mut self, size: WindowSize) {
        debug!(rows = size.rows, cols = size.cols, "resize");
        self.output.set_size(size.rows, size.cols);
        self.dispatcher.dispatch(&Event::Resize {
            rows: size.rows,
            cols: size.cols,
        });
    }

    /// Current size as known to the output driver
    pub fn current_size(&self) -> WindowSize {
        let (rows, cols) = self.output.size();
        WindowSize { rows, cols }
    }

    /// The output driver, for writing to the terminal
    pub fn output(&mut self) -> &mut Output<W> {
        &mut self.output
    }

    /// Restore the terminal to a sane state.
    ///
    /// Idempotent; also invoked from `Drop` so the screen is restored even
    /// on an error path.
    pub fn teardown(&mut self) -> Result<()> {
        if self.torn_down {
            return Ok(());
        }
        self.torn_down = true;
        info!("session teardown");
        self.output.soft_reset()?;
        self.output.sink_mut().flush()?;
        Ok(())
    }
}

impl<W: Write> Drop for Session<W> {
    fn drop(&mut self) {
        let _ = self.teardown();
    }
}
