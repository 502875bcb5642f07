//! ANSI output driver
//!
//! Emits escape sequences over any [`Write`] sink: cursor movement,
//! attributes, 256-colour selection, erasure, and box drawing. The driver
//! tracks the terminal size so that negative coordinates can be resolved
//! from the opposite edge, and counts nested line-drawing spans so the
//! VT100 alternate character set is switched exactly once per run.
//!
//! Nothing here flushes; callers flush the sink when a frame is complete.

pub mod linedraw;

use std::io::{self, Write};

use tracing::trace;

pub use linedraw::Charset;

const CSI: &str = "\x1b[";

/// Escape-sequence writer over an output sink
#[derive(Debug)]
pub struct Output<W: Write> {
    out: W,
    rows: u16,
    cols: u16,
    charset: Charset,
    /// Nesting depth of line-drawing spans
    ld_count: u32,
}

impl<W: Write> Output<W> {
    pub fn new(out: W, rows: u16, cols: u16, charset: Charset) -> Self {
        Output {
            out,
            rows,
            cols,
            charset,
            ld_count: 0,
        }
    }

    /// Write text verbatim
    pub fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    /// Record a new terminal size for coordinate resolution
    pub fn set_size(&mut self, rows: u16, cols: u16) {
        trace!(rows, cols, "output size updated");
        self.rows = rows;
        self.cols = cols;
    }

    /// Current size as (rows, cols)
    pub fn size(&self) -> (u16, u16) {
        (self.rows, self.cols)
    }

    /// Direct access to the sink, for flushing
    pub fn sink_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Resolve a column coordinate; negative values count from the right
    /// edge, -1 being the last column
    fn col(&self, x: i32) -> i32 {
        if x < 0 {
            self.cols as i32 + x + 1
        } else {
            x
        }
    }

    /// Resolve a row coordinate; negative values count from the bottom
    fn row(&self, y: i32) -> i32 {
        if y < 0 {
            self.rows as i32 + y + 1
        } else {
            y
        }
    }

    /// Clear the whole screen
    pub fn clear(&mut self) -> io::Result<()> {
        write!(self.out, "{CSI}2J")
    }

    /// Move the cursor to column `x`, row `y` (1-based, negatives resolve
    /// from the far edge)
    pub fn moveto(&mut self, x: i32, y: i32) -> io::Result<()> {
        let x = self.col(x);
        let y = self.row(y);
        write!(self.out, "{CSI}{y};{x}f")
    }

    /// Show or hide the cursor
    pub fn cursor(&mut self, visible: bool) -> io::Result<()> {
        if visible {
            write!(self.out, "{CSI}?25h")
        } else {
            write!(self.out, "{CSI}?25l")
        }
    }

    pub fn bold(&mut self) -> io::Result<()> {
        write!(self.out, "{CSI}1m")
    }

    pub fn reverse(&mut self) -> io::Result<()> {
        write!(self.out, "{CSI}7m")
    }

    /// Reset all character attributes
    pub fn reset(&mut self) -> io::Result<()> {
        write!(self.out, "{CSI}m")
    }

    /// Select a colour from the 256-colour palette, for the foreground or
    /// the background
    pub fn colour256(&mut self, num: u8, background: bool) -> io::Result<()> {
        let ground = if background { 48 } else { 38 };
        write!(self.out, "{CSI}{ground};5;{num}m")
    }

    /// Erase the entire current line
    pub fn erase_line(&mut self) -> io::Result<()> {
        write!(self.out, "{CSI}2K")
    }

    /// Erase from the start of the line to the cursor
    pub fn erase_start(&mut self) -> io::Result<()> {
        write!(self.out, "{CSI}1K")
    }

    /// Erase from the cursor to the end of the line
    pub fn erase_end(&mut self) -> io::Result<()> {
        write!(self.out, "{CSI}K")
    }

    /// Enter insert mode: printed characters push the rest of the line right
    pub fn insert_mode(&mut self) -> io::Result<()> {
        write!(self.out, "{CSI}4h")
    }

    /// Leave insert mode
    pub fn replace_mode(&mut self) -> io::Result<()> {
        write!(self.out, "{CSI}4l")
    }

    /// Write `text` in double-height lettering: the top half on row `y`,
    /// the bottom half on the row below
    pub fn double_height(&mut self, x: i32, y: i32, text: &str) -> io::Result<()> {
        let x = self.col(x);
        let y = self.row(y);
        self.moveto(x, y)?;
        write!(self.out, "\x1b#3")?;
        self.write(text)?;
        self.moveto(x, y + 1)?;
        write!(self.out, "\x1b#4")?;
        self.write(text)
    }

    /// Put the terminal back into its ordinary state: attributes reset,
    /// insert mode off, cursor visible
    pub fn soft_reset(&mut self) -> io::Result<()> {
        self.reset()?;
        self.replace_mode()?;
        self.cursor(true)
    }

    /// Begin a line-drawing span. Only the outermost span switches the
    /// character set; nested calls just bump the counter.
    pub fn enable_linedraw(&mut self) -> io::Result<()> {
        if self.ld_count == 0 {
            self.write(self.charset.enable)?;
        }
        self.ld_count += 1;
        Ok(())
    }

    /// End a line-drawing span, switching back on the outermost close
    pub fn disable_linedraw(&mut self) -> io::Result<()> {
        debug_assert!(self.ld_count > 0, "unbalanced disable_linedraw");
        self.ld_count = self.ld_count.saturating_sub(1);
        if self.ld_count == 0 {
            self.write(self.charset.disable)?;
        }
        Ok(())
    }

    /// Draw a horizontal line on row `y` between columns `x0` and `x1`
    /// inclusive
    pub fn draw_horizontal_line(&mut self, y: i32, x0: i32, x1: i32) -> io::Result<()> {
        let x0 = self.col(x0);
        let x1 = self.col(x1);
        self.enable_linedraw()?;
        self.moveto(x0, y)?;
        for _ in x0..=x1 {
            self.write(self.charset.horiz)?;
        }
        self.disable_linedraw()
    }

    /// Draw a vertical line on column `x` between rows `y0` and `y1`
    /// inclusive
    pub fn draw_vertical_line(&mut self, x: i32, y0: i32, y1: i32) -> io::Result<()> {
        let x = self.col(x);
        let y0 = self.row(y0);
        let y1 = self.row(y1);
        self.enable_linedraw()?;
        self.moveto(x, y0)?;
        for _ in y0..=y1 {
            self.write(self.charset.verti)?;
            // Down one row and back to the line's column
            write!(self.out, "{CSI}B{CSI}{x}G")?;
        }
        self.disable_linedraw()
    }

    /// Draw a box with corners at (`x0`, `y0`) and (`x1`, `y1`)
    pub fn draw_box(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> io::Result<()> {
        let x0 = self.col(x0);
        let x1 = self.col(x1);
        let y0 = self.row(y0);
        let y1 = self.row(y1);

        self.enable_linedraw()?;
        self.draw_horizontal_line(y0, x0 + 1, x1 - 1)?;
        self.draw_horizontal_line(y1, x0 + 1, x1 - 1)?;
        self.draw_vertical_line(x0, y0 + 1, y1 - 1)?;
        self.draw_vertical_line(x1, y0 + 1, y1 - 1)?;

        self.moveto(x0, y0)?;
        self.write(self.charset.topleft)?;
        self.moveto(x1, y0)?;
        self.write(self.charset.topright)?;
        self.moveto(x1, y1)?;
        self.write(self.charset.bottomright)?;
        self.moveto(x0, y1)?;
        self.write(self.charset.bottomleft)?;
        self.disable_linedraw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output() -> Output<Vec<u8>> {
        Output::new(Vec::new(), 24, 80, linedraw::VT100)
    }

    fn bytes(out: Output<Vec<u8>>) -> String {
        String::from_utf8(out.out).unwrap()
    }

    #[test]
    fn test_clear_and_moveto() {
        let mut out = output();
        out.clear().unwrap();
        out.moveto(1, 1).unwrap();
        assert_eq!(bytes(out), "\x1b[2J\x1b[1;1f");
    }

    #[test]
    fn test_moveto_negative_coordinates() {
        let mut out = output();
        // -1 is the far edge; row in the sequence comes first
        out.moveto(-1, -1).unwrap();
        out.moveto(-5, 3).unwrap();
        assert_eq!(bytes(out), "\x1b[24;80f\x1b[3;76f");
    }

    #[test]
    fn test_cursor_visibility() {
        let mut out = output();
        out.cursor(false).unwrap();
        out.cursor(true).unwrap();
        assert_eq!(bytes(out), "\x1b[?25l\x1b[?25h");
    }

    #[test]
    fn test_attributes() {
        let mut out = output();
        out.bold().unwrap();
        out.reverse().unwrap();
        out.reset().unwrap();
        assert_eq!(bytes(out), "\x1b[1m\x1b[7m\x1b[m");
    }

    #[test]
    fn test_colour256() {
        let mut out = output();
        out.colour256(208, false).unwrap();
        out.colour256(17, true).unwrap();
        assert_eq!(bytes(out), "\x1b[38;5;208m\x1b[48;5;17m");
    }

    #[test]
    fn test_erase_variants() {
        let mut out = output();
        out.erase_line().unwrap();
        out.erase_start().unwrap();
        out.erase_end().unwrap();
        assert_eq!(bytes(out), "\x1b[2K\x1b[1K\x1b[K");
    }

    #[test]
    fn test_insert_and_replace_mode() {
        let mut out = output();
        out.insert_mode().unwrap();
        out.replace_mode().unwrap();
        assert_eq!(bytes(out), "\x1b[4h\x1b[4l");
    }

    #[test]
    fn test_double_height() {
        let mut out = output();
        out.double_height(5, 2, "hi").unwrap();
        assert_eq!(bytes(out), "\x1b[2;5f\x1b#3hi\x1b[3;5f\x1b#4hi");
    }

    #[test]
    fn test_soft_reset() {
        let mut out = output();
        out.soft_reset().unwrap();
        assert_eq!(bytes(out), "\x1b[m\x1b[4l\x1b[?25h");
    }

    #[test]
    fn test_linedraw_nesting_switches_once() {
        let mut out = output();
        out.enable_linedraw().unwrap();
        out.enable_linedraw().unwrap();
        out.write("q").unwrap();
        out.disable_linedraw().unwrap();
        out.disable_linedraw().unwrap();
        assert_eq!(bytes(out), "\x1b(0q\x1b(B");
    }

    #[test]
    fn test_horizontal_line() {
        let mut out = output();
        out.draw_horizontal_line(2, 3, 5).unwrap();
        assert_eq!(bytes(out), "\x1b(0\x1b[2;3fqqq\x1b(B");
    }

    #[test]
    fn test_vertical_line() {
        let mut out = output();
        out.draw_vertical_line(4, 1, 2).unwrap();
        assert_eq!(bytes(out), "\x1b(0\x1b[1;4fx\x1b[B\x1b[4Gx\x1b[B\x1b[4G\x1b(B");
    }

    #[test]
    fn test_box_switches_charset_once() {
        let mut out = output();
        out.draw_box(1, 1, 4, 3).unwrap();
        let s = bytes(out);
        assert_eq!(s.matches("\x1b(0").count(), 1);
        assert_eq!(s.matches("\x1b(B").count(), 1);
        // All four corner glyphs appear
        for glyph in ["l", "k", "j", "m"] {
            assert!(s.contains(glyph), "missing corner {glyph} in {s:?}");
        }
    }

    #[test]
    fn test_ascii_charset_needs_no_switch() {
        let mut out = Output::new(Vec::new(), 24, 80, linedraw::ASCII);
        out.draw_horizontal_line(1, 1, 3).unwrap();
        assert_eq!(bytes(out), "\x1b[1;1f---");
    }

    #[test]
    fn test_set_size_changes_resolution() {
        let mut out = output();
        out.set_size(50, 132);
        assert_eq!(out.size(), (50, 132));
        out.moveto(-1, -1).unwrap();
        assert_eq!(bytes(out), "\x1b[50;132f");
    }
}
