//! Box-drawing character sets
//!
//! Three interchangeable glyph sets for drawing lines and boxes: the VT100
//! alternate character set (switched in and out with `ESC ( 0` / `ESC ( B`),
//! Unicode heavy box-drawing glyphs, and a plain ASCII fallback.

/// Glyphs and mode-switch sequences for one box-drawing style.
///
/// `enable` and `disable` bracket any run of drawing output; for styles
/// that need no terminal mode they are empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Charset {
    pub enable: &'static str,
    pub disable: &'static str,
    pub horiz: &'static str,
    pub verti: &'static str,
    pub topleft: &'static str,
    pub topright: &'static str,
    pub bottomright: &'static str,
    pub bottomleft: &'static str,
}

/// VT100 alternate character set, drawn with ordinary ASCII bytes while
/// the G0 designator points at the special-graphics set
pub const VT100: Charset = Charset {
    enable: "\x1b(0",
    disable: "\x1b(B",
    horiz: "q",
    verti: "x",
    topleft: "l",
    topright: "k",
    bottomright: "j",
    bottomleft: "m",
};

/// Unicode heavy box-drawing glyphs, for UTF-8 terminals
pub const UTF8: Charset = Charset {
    enable: "",
    disable: "",
    horiz: "\u{2501}",
    verti: "\u{2503}",
    topleft: "\u{250F}",
    topright: "\u{2513}",
    bottomright: "\u{251B}",
    bottomleft: "\u{2517}",
};

/// Plain ASCII approximation for terminals with neither capability
pub const ASCII: Charset = Charset {
    enable: "",
    disable: "",
    horiz: "-",
    verti: "|",
    topleft: "+",
    topright: "+",
    bottomright: "+",
    bottomleft: "+",
};
