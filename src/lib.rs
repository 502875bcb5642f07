//! Terminal input and output toolkit
//!
//! Decodes the byte stream an xterm-compatible terminal sends into
//! structured events, and writes ANSI escape sequences back. The pieces:
//!
//! - `parser`: table-driven escape-sequence state machine for input
//! - `event`: decoded event types and key/modifier vocabulary
//! - `dispatch`: synchronous observer registry keyed by event kind
//! - `width`: display-width and grapheme-cluster measurement
//! - `output`: escape-sequence writer with box drawing
//! - `encode`: the reverse direction, keys back into bytes
//! - `session`: ties parser, dispatcher, and output together over a tty

pub mod config;
pub mod dispatch;
pub mod encode;
pub mod error;
pub mod event;
pub mod output;
pub mod parser;
pub mod session;
pub mod tty;
pub mod width;

pub use config::Config;
pub use dispatch::{Dispatcher, SubscriberId};
pub use encode::encode_special;
pub use error::{Error, Result};
pub use event::{ControlChar, Event, EventKind, Modifiers, SpecialKey};
pub use output::Output;
pub use parser::Parser;
pub use session::{Session, SessionOptions};
pub use tty::WindowSize;
pub use width::{graphemes, wcswidth, wcwidth};
