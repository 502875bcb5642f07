//! State-transition table for parsing data inbound from the terminal
//!
//! Each parser state has a row of `(byte, actions)` rules plus a mandatory
//! default action list, so lookup is total by construction. Actions are a
//! closed union matched exhaustively by the parser; the table itself is
//! static data.

use crate::event::SpecialKey;

/// Parse engine states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    /// Between sequences; printable bytes and controls arrive here
    Rest,
    /// After a lone ESC, awaiting disambiguation
    Escape,
    /// Inside a CSI sequence (`ESC [`), accumulating parameters
    Ctrlseq,
    /// Inside an SS3 sequence (`ESC O`)
    Ctrlseq2,
    /// One UTF-8 continuation byte outstanding
    Utf8Rem1,
    /// Two UTF-8 continuation bytes outstanding
    Utf8Rem2,
    /// Three UTF-8 continuation bytes outstanding
    Utf8Rem3,
}

/// Store-consuming handlers invoked by terminal bytes of a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Handler {
    /// `R`: parse `row;col` from the store, emit a position report
    CursorPos,
    /// `n`: emit the raw store as a device status report
    DeviceStatus,
    /// Letter-terminated key: modifiers from the store, fixed key name
    KeyId(SpecialKey),
    /// `~`-terminated key: numeric code plus modifiers from the store
    TildeKey,
}

/// One action of a transition entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Act {
    /// Change parser state
    Goto(State),
    /// Arm the lone-ESC disambiguation timeout
    ArmEscTimeout,
    /// Emit the current byte as a one-character keypress
    Keypress,
    /// Emit the current byte as a control event from the fixed C0/DEL table
    Control { fatal: bool },
    /// Append the current byte to the accumulation store
    Store,
    /// Classify a UTF-8 lead byte (or emit a single-byte keypress)
    Utf8Lead,
    /// Validate and store a UTF-8 continuation byte
    Utf8Cont { next: State, emit: bool },
    /// Invalid-sequence recovery: dump the store as keypresses and
    /// reprocess the current byte from Rest
    Abort,
    /// Invoke a store-consuming handler
    Call(Handler),
}

/// A transition rule selected by exact byte match
pub(crate) struct Rule {
    pub byte: u8,
    pub acts: &'static [Act],
}

/// All transitions out of one state
pub(crate) struct StateRow {
    pub rules: &'static [Rule],
    /// Applied when no rule matches; every state has one
    pub default: &'static [Act],
}

const fn rule(byte: u8, acts: &'static [Act]) -> Rule {
    Rule { byte, acts }
}

const CONTROL: &[Act] = &[Act::Control { fatal: false }];
const CONTROL_FATAL: &[Act] = &[Act::Control { fatal: true }];
const STORE: &[Act] = &[Act::Store];

static REST: StateRow = StateRow {
    rules: &[
        rule(0x1B, &[Act::Goto(State::Escape), Act::ArmEscTimeout]),
        rule(0x00, CONTROL),
        rule(0x01, CONTROL),
        rule(0x02, CONTROL),
        rule(0x03, CONTROL_FATAL),
        rule(0x04, CONTROL),
        rule(0x05, CONTROL),
        rule(0x06, CONTROL),
        rule(0x07, CONTROL),
        rule(0x08, CONTROL),
        rule(0x09, CONTROL),
        rule(0x0A, CONTROL),
        rule(0x0B, CONTROL),
        rule(0x0C, CONTROL),
        rule(0x0D, CONTROL),
        rule(0x0E, CONTROL),
        rule(0x0F, CONTROL),
        rule(0x10, CONTROL),
        rule(0x11, CONTROL),
        rule(0x12, CONTROL),
        rule(0x13, CONTROL),
        rule(0x14, CONTROL),
        rule(0x15, CONTROL),
        rule(0x16, CONTROL),
        rule(0x17, CONTROL),
        rule(0x18, CONTROL),
        rule(0x19, CONTROL),
        rule(0x1A, CONTROL),
        rule(0x1C, CONTROL),
        rule(0x1D, CONTROL),
        rule(0x1E, CONTROL),
        rule(0x1F, CONTROL),
        rule(0x7F, CONTROL),
    ],
    default: &[Act::Utf8Lead],
};

static ESCAPE: StateRow = StateRow {
    rules: &[
        rule(b'[', &[Act::Goto(State::Ctrlseq)]),
        rule(b'O', &[Act::Goto(State::Ctrlseq2)]),
    ],
    default: &[Act::Keypress, Act::Goto(State::Rest)],
};

static CTRLSEQ: StateRow = StateRow {
    rules: &[
        rule(b'0', STORE),
        rule(b'1', STORE),
        rule(b'2', STORE),
        rule(b'3', STORE),
        rule(b'4', STORE),
        rule(b'5', STORE),
        rule(b'6', STORE),
        rule(b'7', STORE),
        rule(b'8', STORE),
        rule(b'9', STORE),
        rule(b';', STORE),
        rule(b'~', &[Act::Call(Handler::TildeKey), Act::Goto(State::Rest)]),
        rule(b'n', &[Act::Call(Handler::DeviceStatus), Act::Goto(State::Rest)]),
        rule(b'R', &[Act::Call(Handler::CursorPos), Act::Goto(State::Rest)]),
        rule(b'A', &[Act::Call(Handler::KeyId(SpecialKey::Up)), Act::Goto(State::Rest)]),
        rule(b'B', &[Act::Call(Handler::KeyId(SpecialKey::Down)), Act::Goto(State::Rest)]),
        rule(b'C', &[Act::Call(Handler::KeyId(SpecialKey::Right)), Act::Goto(State::Rest)]),
        rule(b'D', &[Act::Call(Handler::KeyId(SpecialKey::Left)), Act::Goto(State::Rest)]),
        rule(b'H', &[Act::Call(Handler::KeyId(SpecialKey::Home)), Act::Goto(State::Rest)]),
        rule(b'F', &[Act::Call(Handler::KeyId(SpecialKey::End)), Act::Goto(State::Rest)]),
        rule(b'Z', &[Act::Call(Handler::KeyId(SpecialKey::ReverseTab)), Act::Goto(State::Rest)]),
    ],
    default: &[Act::Abort],
};

static CTRLSEQ2: StateRow = StateRow {
    rules: &[
        rule(b'A', &[Act::Call(Handler::KeyId(SpecialKey::Up)), Act::Goto(State::Rest)]),
        rule(b'B', &[Act::Call(Handler::KeyId(SpecialKey::Down)), Act::Goto(State::Rest)]),
        rule(b'C', &[Act::Call(Handler::KeyId(SpecialKey::Right)), Act::Goto(State::Rest)]),
        rule(b'D', &[Act::Call(Handler::KeyId(SpecialKey::Left)), Act::Goto(State::Rest)]),
        rule(b'H', &[Act::Call(Handler::KeyId(SpecialKey::Home)), Act::Goto(State::Rest)]),
        rule(b'F', &[Act::Call(Handler::KeyId(SpecialKey::End)), Act::Goto(State::Rest)]),
        rule(b'P', &[Act::Call(Handler::KeyId(SpecialKey::F1)), Act::Goto(State::Rest)]),
        rule(b'Q', &[Act::Call(Handler::KeyId(SpecialKey::F2)), Act::Goto(State::Rest)]),
        rule(b'R', &[Act::Call(Handler::KeyId(SpecialKey::F3)), Act::Goto(State::Rest)]),
        rule(b'S', &[Act::Call(Handler::KeyId(SpecialKey::F4)), Act::Goto(State::Rest)]),
    ],
    default: &[Act::Keypress, Act::Goto(State::Rest)],
};

static UTF8_REM3: StateRow = StateRow {
    rules: &[],
    default: &[Act::Utf8Cont {
        next: State::Utf8Rem2,
        emit: false,
    }],
};

static UTF8_REM2: StateRow = StateRow {
    rules: &[],
    default: &[Act::Utf8Cont {
        next: State::Utf8Rem1,
        emit: false,
    }],
};

static UTF8_REM1: StateRow = StateRow {
    rules: &[],
    default: &[Act::Utf8Cont {
        next: State::Rest,
        emit: true,
    }],
};

/// Look up the transitions for a state; total for every state
pub(crate) fn row(state: State) -> &'static StateRow {
    match state {
        State::Rest => &REST,
        State::Escape => &ESCAPE,
        State::Ctrlseq => &CTRLSEQ,
        State::Ctrlseq2 => &CTRLSEQ2,
        State::Utf8Rem1 => &UTF8_REM1,
        State::Utf8Rem2 => &UTF8_REM2,
        State::Utf8Rem3 => &UTF8_REM3,
    }
}

/// Find the action list for a byte in a state
pub(crate) fn lookup(state: State, byte: u8) -> &'static [Act] {
    let row = row(state);
    row.rules
        .iter()
        .find(|r| r.byte == byte)
        .map(|r| r.acts)
        .unwrap_or(row.default)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [State; 7] = [
        State::Rest,
        State::Escape,
        State::Ctrlseq,
        State::Ctrlseq2,
        State::Utf8Rem1,
        State::Utf8Rem2,
        State::Utf8Rem3,
    ];

    #[test]
    fn test_lookup_is_total() {
        // Every (state, byte) pair resolves to a non-empty action list
        for state in ALL_STATES {
            for byte in 0u16..=0xFF {
                let acts = lookup(state, byte as u8);
                assert!(!acts.is_empty(), "{:?} byte {:#X}", state, byte);
            }
        }
    }

    #[test]
    fn test_rules_unique_per_state() {
        for state in ALL_STATES {
            let rules = row(state).rules;
            for (i, a) in rules.iter().enumerate() {
                for b in &rules[i + 1..] {
                    assert_ne!(a.byte, b.byte, "{:?}: duplicate rule", state);
                }
            }
        }
    }

    #[test]
    fn test_rest_claims_all_controls() {
        // Every C0 byte and DEL has an explicit rule in Rest
        for byte in (0x00..=0x1F).chain([0x7F]) {
            let rules = row(State::Rest).rules;
            assert!(
                rules.iter().any(|r| r.byte == byte),
                "no Rest rule for {:#X}",
                byte
            );
        }
    }
}
