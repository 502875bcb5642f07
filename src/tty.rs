//! Terminal device queries
//!
//! Thin wrappers over the POSIX calls a session needs at construction
//! time: tty detection, window-size lookup, and the `TERM` environment
//! check.

use std::env;
use std::os::unix::io::RawFd;

use nix::libc;
use tracing::debug;

use crate::error::{Error, Result};

/// Terminal dimensions in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub rows: u16,
    pub cols: u16,
}

impl Default for WindowSize {
    fn default() -> Self {
        WindowSize { rows: 24, cols: 80 }
    }
}

/// Whether `fd` refers to a terminal device
pub fn is_tty(fd: RawFd) -> bool {
    // SAFETY: isatty only inspects the descriptor
    unsafe { libc::isatty(fd) == 1 }
}

/// Query the kernel for the terminal size of `fd`
pub fn window_size(fd: RawFd) -> Result<WindowSize> {
    let mut winsize = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };

    // SAFETY: TIOCGWINSZ writes into the winsize struct we own
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut winsize) };
    if result < 0 {
        let errno = nix::errno::Errno::last();
        debug!(fd, %errno, "TIOCGWINSZ failed");
        return Err(Error::Io(std::io::Error::from(errno)));
    }

    Ok(WindowSize {
        rows: winsize.ws_row,
        cols: winsize.ws_col,
    })
}

/// The terminal type from the environment, if one is set and nonempty
pub fn term_from_env() -> Option<String> {
    env::var("TERM").ok().filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_size() {
        let size = WindowSize::default();
        assert_eq!((size.rows, size.cols), (24, 80));
    }

    #[test]
    fn test_window_size_on_non_tty_fails() {
        // /dev/null is never a terminal
        let file = std::fs::File::open("/dev/null").unwrap();
        use std::os::unix::io::AsRawFd;
        assert!(!is_tty(file.as_raw_fd()));
        assert!(window_size(file.as_raw_fd()).is_err());
    }
}
