//! Events produced by the input parser
//!
//! Events represent decoded terminal input: printable keypresses, control
//! characters, special keys (arrows, function keys), and terminal reports.
//! They are produced by the parser and delivered through the dispatcher.

use std::fmt;

/// Modifier keys held during a special keypress
///
/// Decoded from the `CSI 1;<n>` parameter: subtracting 1 from `n` gives a
/// 4-bit mask where bit 0 is shift, bit 1 alt, bit 2 control, bit 3 meta.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub control: bool,
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers held
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        alt: false,
        control: false,
        meta: false,
    };

    /// Check if any modifier is held
    pub fn any(&self) -> bool {
        self.shift || self.alt || self.control || self.meta
    }

    /// Apply one numeric modifier field from a CSI parameter string.
    ///
    /// Values outside 2..=16 are ignored: no recognized modifier.
    pub fn apply_code(&mut self, field: &str) {
        let n: u32 = match field.parse() {
            Ok(n) => n,
            Err(_) => return,
        };
        if !(2..=16).contains(&n) {
            return;
        }

        let mask = n - 1;
        if mask & 1 == 1 {
            self.shift = true;
        }
        if mask & 2 == 2 {
            self.alt = true;
        }
        if mask & 4 == 4 {
            self.control = true;
        }
        if mask & 8 == 8 {
            self.meta = true;
        }
    }

    /// Build modifiers from the fields after the first of a parameter string
    /// (e.g. the `5` of `1;5`).
    pub(crate) fn from_params(params: &str) -> Modifiers {
        let mut mods = Modifiers::NONE;
        for field in params.split(';').skip(1) {
            mods.apply_code(field);
        }
        mods
    }
}

/// Named non-printable keys delivered as `special` events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialKey {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Prior,
    Next,
    Insert,
    Delete,
    ReverseTab,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    F13,
    F14,
    F15,
    F16,
    F17,
    F18,
    F19,
    F20,
}

impl SpecialKey {
    /// The wire-compatible event name for this key
    pub fn name(&self) -> &'static str {
        match self {
            SpecialKey::Up => "up",
            SpecialKey::Down => "down",
            SpecialKey::Left => "left",
            SpecialKey::Right => "right",
            SpecialKey::Home => "home",
            SpecialKey::End => "end",
            SpecialKey::Prior => "prior",
            SpecialKey::Next => "next",
            SpecialKey::Insert => "insert",
            SpecialKey::Delete => "delete",
            SpecialKey::ReverseTab => "reverse-tab",
            SpecialKey::F1 => "F1",
            SpecialKey::F2 => "F2",
            SpecialKey::F3 => "F3",
            SpecialKey::F4 => "F4",
            SpecialKey::F5 => "F5",
            SpecialKey::F6 => "F6",
            SpecialKey::F7 => "F7",
            SpecialKey::F8 => "F8",
            SpecialKey::F9 => "F9",
            SpecialKey::F10 => "F10",
            SpecialKey::F11 => "F11",
            SpecialKey::F12 => "F12",
            SpecialKey::F13 => "F13",
            SpecialKey::F14 => "F14",
            SpecialKey::F15 => "F15",
            SpecialKey::F16 => "F16",
            SpecialKey::F17 => "F17",
            SpecialKey::F18 => "F18",
            SpecialKey::F19 => "F19",
            SpecialKey::F20 => "F20",
        }
    }

    /// Map the numeric code of a `CSI <code> ~` sequence to its key.
    ///
    /// Function-key codes have historical gaps at 16, 22, 27, and 30.
    pub fn from_tilde_code(code: u32) -> Option<SpecialKey> {
        Some(match code {
            1 => SpecialKey::Home,
            2 => SpecialKey::Insert,
            3 => SpecialKey::Delete,
            4 => SpecialKey::End,
            5 => SpecialKey::Prior,
            6 => SpecialKey::Next,
            11 => SpecialKey::F1,
            12 => SpecialKey::F2,
            13 => SpecialKey::F3,
            14 => SpecialKey::F4,
            15 => SpecialKey::F5,
            17 => SpecialKey::F6,
            18 => SpecialKey::F7,
            19 => SpecialKey::F8,
            20 => SpecialKey::F9,
            21 => SpecialKey::F10,
            23 => SpecialKey::F11,
            24 => SpecialKey::F12,
            25 => SpecialKey::F13,
            26 => SpecialKey::F14,
            28 => SpecialKey::F15,
            29 => SpecialKey::F16,
            31 => SpecialKey::F17,
            32 => SpecialKey::F18,
            33 => SpecialKey::F19,
            34 => SpecialKey::F20,
            _ => return None,
        })
    }

    /// The numeric code this key carries in a `CSI <code> ~` sequence.
    /// Arrows and reverse-tab have no tilde form.
    pub fn tilde_code(&self) -> Option<u32> {
        Some(match self {
            SpecialKey::Up
            | SpecialKey::Down
            | SpecialKey::Left
            | SpecialKey::Right
            | SpecialKey::ReverseTab => return None,
            SpecialKey::Home => 1,
            SpecialKey::Insert => 2,
            SpecialKey::Delete => 3,
            SpecialKey::End => 4,
            SpecialKey::Prior => 5,
            SpecialKey::Next => 6,
            SpecialKey::F1 => 11,
            SpecialKey::F2 => 12,
            SpecialKey::F3 => 13,
            SpecialKey::F4 => 14,
            SpecialKey::F5 => 15,
            SpecialKey::F6 => 17,
            SpecialKey::F7 => 18,
            SpecialKey::F8 => 19,
            SpecialKey::F9 => 20,
            SpecialKey::F10 => 21,
            SpecialKey::F11 => 23,
            SpecialKey::F12 => 24,
            SpecialKey::F13 => 25,
            SpecialKey::F14 => 26,
            SpecialKey::F15 => 28,
            SpecialKey::F16 => 29,
            SpecialKey::F17 => 31,
            SpecialKey::F18 => 32,
            SpecialKey::F19 => 33,
            SpecialKey::F20 => 34,
        })
    }
}

impl fmt::Display for SpecialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded C0 control character (or DEL)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlChar {
    /// Caret notation, e.g. `"^C"`
    pub key: &'static str,
    /// Standard ASCII mnemonic, e.g. `"ETX"`
    pub ascii: &'static str,
    /// Interrupt-style controls must not be silently swallowed: if true and
    /// no control observer is registered, the session terminates the process.
    pub fatal_if_unhandled: bool,
}

/// Caret notation and mnemonic for each of the 32 C0 bytes, indexed by byte
const C0_NAMES: [(&str, &str); 32] = [
    ("^@", "NUL"),
    ("^A", "SOH"),
    ("^B", "STX"),
    ("^C", "ETX"),
    ("^D", "EOT"),
    ("^E", "ENQ"),
    ("^F", "ACK"),
    ("^G", "BEL"),
    ("^H", "BS"),
    ("^I", "HT"),
    ("^J", "LF"),
    ("^K", "VT"),
    ("^L", "FF"),
    ("^M", "CR"),
    ("^N", "SO"),
    ("^O", "SI"),
    ("^P", "DLE"),
    ("^Q", "DC1"),
    ("^R", "DC2"),
    ("^S", "DC3"),
    ("^T", "DC4"),
    ("^U", "NAK"),
    ("^V", "SYN"),
    ("^W", "ETB"),
    ("^X", "CAN"),
    ("^Y", "EM"),
    ("^Z", "SUB"),
    ("^[", "ESC"),
    ("^\\", "FS"),
    ("^]", "GS"),
    ("^^", "RS"),
    ("^_", "US"),
];

/// Look up caret notation and mnemonic for a C0 byte or DEL
pub fn control_char(byte: u8, fatal_if_unhandled: bool) -> Option<ControlChar> {
    let (key, ascii) = match byte {
        0x00..=0x1F => C0_NAMES[byte as usize],
        0x7F => ("^?", "DEL"),
        _ => return None,
    };
    Some(ControlChar {
        key,
        ascii,
        fatal_if_unhandled,
    })
}

/// A decoded terminal input event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A printable keypress (one character, possibly multi-byte UTF-8)
    Keypress(String),
    /// A C0 control character or DEL
    Control(ControlChar),
    /// A named special key with held modifiers
    Special { name: SpecialKey, mods: Modifiers },
    /// Cursor position report (`CSI row;col R`)
    Position { row: u16, col: u16 },
    /// Device status report (`CSI ... n`), raw parameter string
    DeviceStatus(String),
    /// Terminal dimension change, delivered via `Session::notify_resize`
    Resize { rows: u16, cols: u16 },
}

impl Event {
    /// The dispatch category of this event
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Keypress(_) => EventKind::Keypress,
            Event::Control(_) => EventKind::Control,
            Event::Special { .. } => EventKind::Special,
            Event::Position { .. } => EventKind::Position,
            Event::DeviceStatus(_) => EventKind::DeviceStatus,
            Event::Resize { .. } => EventKind::Resize,
        }
    }
}

/// Event categories observers subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Keypress,
    Control,
    Special,
    Position,
    DeviceStatus,
    Resize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_char_lookup() {
        let etx = control_char(0x03, true).unwrap();
        assert_eq!(etx.key, "^C");
        assert_eq!(etx.ascii, "ETX");
        assert!(etx.fatal_if_unhandled);

        let tab = control_char(0x09, false).unwrap();
        assert_eq!(tab.key, "^I");
        assert_eq!(tab.ascii, "HT");

        let del = control_char(0x7F, false).unwrap();
        assert_eq!(del.key, "^?");
        assert_eq!(del.ascii, "DEL");

        assert!(control_char(b'a', false).is_none());
        assert!(control_char(0x80, false).is_none());
    }

    #[test]
    fn test_modifier_codes() {
        let mut mods = Modifiers::NONE;
        mods.apply_code("2");
        assert_eq!(
            mods,
            Modifiers {
                shift: true,
                ..Modifiers::NONE
            }
        );

        let mut mods = Modifiers::NONE;
        mods.apply_code("16");
        assert!(mods.shift && mods.alt && mods.control && mods.meta);

        // Out of range and garbage leave everything false
        for field in ["0", "1", "17", "99", "x", ""] {
            let mut mods = Modifiers::NONE;
            mods.apply_code(field);
            assert_eq!(mods, Modifiers::NONE, "field {:?}", field);
        }
    }

    #[test]
    fn test_modifiers_from_params() {
        assert_eq!(Modifiers::from_params("1;5").control, true);
        // First field is the key code, never a modifier
        assert_eq!(Modifiers::from_params("5"), Modifiers::NONE);
        assert_eq!(Modifiers::from_params(""), Modifiers::NONE);
    }

    #[test]
    fn test_tilde_code_gaps() {
        assert_eq!(SpecialKey::from_tilde_code(11), Some(SpecialKey::F1));
        assert_eq!(SpecialKey::from_tilde_code(34), Some(SpecialKey::F20));
        for gap in [16, 22, 27, 30] {
            assert_eq!(SpecialKey::from_tilde_code(gap), None, "code {}", gap);
        }
        assert_eq!(SpecialKey::from_tilde_code(0), None);
        assert_eq!(SpecialKey::from_tilde_code(35), None);
    }

    #[test]
    fn test_special_names() {
        assert_eq!(SpecialKey::Prior.name(), "prior");
        assert_eq!(SpecialKey::ReverseTab.name(), "reverse-tab");
        assert_eq!(SpecialKey::F20.name(), "F20");
    }
}
