//! Key reader
//!
//! Interactive demonstration: puts the terminal in raw mode, decodes every
//! key it sends, and prints the events. Press `q` or ^C twice to leave.

use std::io::{self, Write};
use std::os::fd::BorrowedFd;
use std::os::unix::io::AsRawFd;
use std::process::ExitCode;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use nix::poll::{poll, PollFd, PollFlags};
use nix::unistd::read;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ansikit::event::{Event, EventKind};
use ansikit::{Config, Session, SessionOptions};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("keyread: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let stdin_fd = io::stdin().as_raw_fd();
    let stdout_fd = io::stdout().as_raw_fd();

    let size = ansikit::tty::window_size(stdout_fd).unwrap_or_default();
    let mut session = Session::new(SessionOptions {
        output: io::stdout(),
        input_is_tty: ansikit::tty::is_tty(stdin_fd),
        output_is_tty: ansikit::tty::is_tty(stdout_fd),
        term: ansikit::tty::term_from_env(),
        size,
        config: Config::load_or_default(),
    })?;

    let quit = Rc::new(Cell::new(false));

    session.subscribe(EventKind::Keypress, {
        let quit = Rc::clone(&quit);
        move |ev| {
            if let Event::Keypress(s) = ev {
                print!("keypress: {s:?}\r\n");
                if s == "q" {
                    quit.set(true);
                }
            }
        }
    });
    session.subscribe(EventKind::Control, {
        let quit = Rc::clone(&quit);
        move |ev| {
            if let Event::Control(ctrl) = ev {
                print!("control:  {} ({})\r\n", ctrl.key, ctrl.ascii);
                if ctrl.key == "^C" {
                    quit.set(true);
                }
            }
        }
    });
    session.subscribe(EventKind::Special, |ev| {
        if let Event::Special { name, mods } = ev {
            let mut tags = Vec::new();
            if mods.shift {
                tags.push("shift");
            }
            if mods.alt {
                tags.push("alt");
            }
            if mods.control {
                tags.push("control");
            }
            if mods.meta {
                tags.push("meta");
            }
            if tags.is_empty() {
                print!("special:  {name}\r\n");
            } else {
                print!("special:  {name} [{}]\r\n", tags.join(","));
            }
        }
    });
    session.subscribe(EventKind::Resize, |ev| {
        if let Event::Resize { rows, cols } = ev {
            print!("resize:   {rows}x{cols}\r\n");
        }
    });

    let _raw_guard = RawModeGuard::new()?;

    let out = session.output();
    out.clear()?;
    out.draw_box(2, 1, 40, 3)?;
    out.moveto(4, 2)?;
    out.bold()?;
    out.write("keyread: q or ^C quits")?;
    out.reset()?;
    out.moveto(1, 5)?;
    io::stdout().flush()?;

    let mut buf = [0u8; 1024];
    let mut last_size = session.current_size();

    while !quit.get() {
        // Wake for the lone-ESC deadline, otherwise at a slow tick so
        // terminal resizes are noticed
        let timeout_ms = match session.deadline() {
            Some(deadline) => deadline
                .saturating_duration_since(Instant::now())
                .as_millis()
                .max(1) as i32,
            None => 200,
        };

        // SAFETY: stdin stays open for the life of the process
        let borrowed_fd = unsafe { BorrowedFd::borrow_raw(stdin_fd) };
        let mut fds = [PollFd::new(&borrowed_fd, PollFlags::POLLIN)];
        let ready = poll(&mut fds, timeout_ms)?;

        if ready > 0 {
            let n = read(stdin_fd, &mut buf)?;
            if n == 0 {
                break;
            }
            if let Err(e) = session.feed(&buf[..n]) {
                print!("error:    {e}\r\n");
            }
        }

        session.poll_timeout(Instant::now())?;

        let size = ansikit::tty::window_size(stdout_fd).unwrap_or(last_size);
        if size != last_size {
            last_size = size;
            session.notify_resize(size);
        }
        io::stdout().flush()?;
    }

    session.teardown()?;
    Ok(())
}

/// RAII guard for raw terminal mode
struct RawModeGuard {
    original: nix::sys::termios::Termios,
}

impl RawModeGuard {
    fn new() -> io::Result<Self> {
        use nix::sys::termios::{self, SetArg};

        let original =
            termios::tcgetattr(io::stdin()).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

        let mut raw = original.clone();
        termios::cfmakeraw(&mut raw);
        raw.control_chars[nix::sys::termios::SpecialCharacterIndices::VMIN as usize] = 1;
        raw.control_chars[nix::sys::termios::SpecialCharacterIndices::VTIME as usize] = 0;

        termios::tcsetattr(io::stdin(), SetArg::TCSANOW, &raw)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

        Ok(Self { original })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        use nix::sys::termios::{self, SetArg};
        let _ = termios::tcsetattr(io::stdin(), SetArg::TCSANOW, &self.original);
    }
}
