//! Special-key encoding
//!
//! The inverse of the input parser: given a [`SpecialKey`] and a set of
//! [`Modifiers`], produce the byte sequence an xterm-compatible terminal
//! would send for that key. Useful for forwarding decoded keys to a child
//! process or for building test input.

use crate::event::{Modifiers, SpecialKey};

/// xterm modifier parameter: 1 plus the modifier bitmask
fn modifier_code(mods: Modifiers) -> u32 {
    let mut bits = 0;
    if mods.shift {
        bits |= 1;
    }
    if mods.alt {
        bits |= 2;
    }
    if mods.control {
        bits |= 4;
    }
    if mods.meta {
        bits |= 8;
    }
    bits + 1
}

/// CSI final letter for the keys that have one
fn csi_letter(key: SpecialKey) -> Option<char> {
    Some(match key {
        SpecialKey::Up => 'A',
        SpecialKey::Down => 'B',
        SpecialKey::Right => 'C',
        SpecialKey::Left => 'D',
        SpecialKey::Home => 'H',
        SpecialKey::End => 'F',
        SpecialKey::ReverseTab => 'Z',
        _ => return None,
    })
}

/// SS3 final letter for the bare F1 through F4 keys
fn ss3_letter(key: SpecialKey) -> Option<char> {
    Some(match key {
        SpecialKey::F1 => 'P',
        SpecialKey::F2 => 'Q',
        SpecialKey::F3 => 'R',
        SpecialKey::F4 => 'S',
        _ => return None,
    })
}

/// Encode a special key, with modifiers, as terminal input bytes
pub fn encode_special(key: SpecialKey, mods: Modifiers) -> Vec<u8> {
    let code = modifier_code(mods);

    if let Some(letter) = csi_letter(key) {
        return if mods.any() {
            format!("\x1b[1;{code}{letter}").into_bytes()
        } else {
            format!("\x1b[{letter}").into_bytes()
        };
    }

    // Unmodified F1-F4 use the compact SS3 form
    if !mods.any() {
        if let Some(letter) = ss3_letter(key) {
            return format!("\x1bO{letter}").into_bytes();
        }
    }

    // Everything else carries a tilde code
    let Some(tilde) = key.tilde_code() else {
        // Keys without one were handled by the CSI-letter branch
        return Vec::new();
    };
    if mods.any() {
        format!("\x1b[{tilde};{code}~").into_bytes()
    } else {
        format!("\x1b[{tilde}~").into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHIFT: Modifiers = Modifiers {
        shift: true,
        alt: false,
        control: false,
        meta: false,
    };
    const CTRL: Modifiers = Modifiers {
        shift: false,
        alt: false,
        control: true,
        meta: false,
    };

    #[test]
    fn test_bare_arrows() {
        assert_eq!(encode_special(SpecialKey::Up, Modifiers::NONE), b"\x1b[A");
        assert_eq!(encode_special(SpecialKey::Left, Modifiers::NONE), b"\x1b[D");
    }

    #[test]
    fn test_modified_arrows() {
        assert_eq!(encode_special(SpecialKey::Up, SHIFT), b"\x1b[1;2A");
        assert_eq!(encode_special(SpecialKey::Right, CTRL), b"\x1b[1;5C");
    }

    #[test]
    fn test_bare_function_keys() {
        assert_eq!(encode_special(SpecialKey::F1, Modifiers::NONE), b"\x1bOP");
        assert_eq!(encode_special(SpecialKey::F4, Modifiers::NONE), b"\x1bOS");
        assert_eq!(encode_special(SpecialKey::F5, Modifiers::NONE), b"\x1b[15~");
        assert_eq!(encode_special(SpecialKey::F20, Modifiers::NONE), b"\x1b[34~");
    }

    #[test]
    fn test_modified_function_keys_use_tilde_form() {
        assert_eq!(encode_special(SpecialKey::F1, CTRL), b"\x1b[11;5~");
        assert_eq!(encode_special(SpecialKey::F6, SHIFT), b"\x1b[17;2~");
    }

    #[test]
    fn test_page_keys() {
        assert_eq!(encode_special(SpecialKey::Prior, Modifiers::NONE), b"\x1b[5~");
        assert_eq!(encode_special(SpecialKey::Next, CTRL), b"\x1b[6;5~");
        assert_eq!(encode_special(SpecialKey::Insert, Modifiers::NONE), b"\x1b[2~");
        assert_eq!(encode_special(SpecialKey::Delete, Modifiers::NONE), b"\x1b[3~");
    }

    #[test]
    fn test_all_modifier_bits() {
        let all = Modifiers {
            shift: true,
            alt: true,
            control: true,
            meta: true,
        };
        assert_eq!(encode_special(SpecialKey::Up, all), b"\x1b[1;16A");
    }
}
