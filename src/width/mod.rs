//! Unicode display-width calculation and grapheme clustering
//!
//! Terminals advance the cursor by columns, not code points. This module
//! answers the two questions cursor accounting needs: how many columns does
//! a code point occupy, and which code points combine into a single drawn
//! unit. Width is signed: -1 marks a non-printing control code point whose
//! cursor effect is undefined.

mod tables;

use tables::{in_table, WIDE, ZERO_WIDTH};

/// Display width of a single code point: -1, 0, 1, or 2.
///
/// - `-1` for C0/C1 controls and DEL (non-printing, cursor undefined)
/// - `0` for NUL and for combining/zero-width code points
/// - `2` for East Asian Wide/Fullwidth code points and wide emoji
/// - `1` otherwise
pub fn wcwidth(ch: char) -> i32 {
    let cp = ch as u32;
    if cp == 0 {
        return 0;
    }
    if cp < 0x20 || (0x7F..=0x9F).contains(&cp) {
        return -1;
    }
    if in_table(ZERO_WIDTH, cp) {
        return 0;
    }
    if in_table(WIDE, cp) {
        return 2;
    }
    1
}

/// Display width of a whole string, summed per grapheme cluster.
///
/// If any cluster has width -1 the entire result is -1: a control character
/// anywhere leaves the final column position undefined. One poisoned
/// cluster poisons the whole string; this matches long-observed behavior
/// and is relied on by callers.
pub fn wcswidth(s: &str) -> i32 {
    let mut total = 0;
    for g in graphemes(s) {
        if g.width == -1 {
            return -1;
        }
        total += g.width;
    }
    total
}

/// One drawn unit: a base code point plus any zero-width marks that attach
/// to it, with the combined display width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grapheme<'a> {
    pub text: &'a str,
    pub width: i32,
}

/// Iterate the grapheme clusters of `s` left to right.
///
/// A code point starts a new cluster unless it is zero-width and the
/// current cluster's width is not -1; attached marks never change the
/// cluster width (variation selectors do not alter East Asian Width).
/// Control code points always stand alone.
pub fn graphemes(s: &str) -> Graphemes<'_> {
    Graphemes {
        s,
        iter: s.char_indices().peekable(),
    }
}

/// Lazy, restartable grapheme iterator returned by [`graphemes`]
pub struct Graphemes<'a> {
    s: &'a str,
    iter: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Iterator for Graphemes<'a> {
    type Item = Grapheme<'a>;

    fn next(&mut self) -> Option<Grapheme<'a>> {
        let (start, base) = self.iter.next()?;
        let width = wcwidth(base);
        let mut end = start + base.len_utf8();

        if width != -1 {
            while let Some(&(i, ch)) = self.iter.peek() {
                if wcwidth(ch) != 0 {
                    break;
                }
                end = i + ch.len_utf8();
                self.iter.next();
            }
        }

        Some(Grapheme {
            text: &self.s[start..end],
            width,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decompose(s: &str) -> (Vec<(String, i32)>, i32) {
        let parts = graphemes(s)
            .map(|g| (g.text.to_string(), g.width))
            .collect();
        (parts, wcswidth(s))
    }

    fn simple(s: &str, expected: i32) {
        let (parts, w) = decompose(s);
        assert_eq!(w, expected, "wcswidth({:?})", s);
        assert_eq!(
            parts,
            vec![(s.to_string(), expected)],
            "{:?} should be one cluster",
            s
        );
    }

    #[test]
    fn test_empty_string() {
        let (parts, w) = decompose("");
        assert_eq!(w, 0);
        assert!(parts.is_empty());
    }

    #[test]
    fn test_printing_ascii() {
        // Space and all printing ASCII characters are one column wide
        for cp in 0x20u32..0x7F {
            let s = char::from_u32(cp).unwrap().to_string();
            simple(&s, 1);
        }
    }

    #[test]
    fn test_ascii_control_characters() {
        simple("\u{0}", 0);
        simple("\u{1}", -1);
        simple("\u{11}", -1);
        simple("\u{7F}", -1);
    }

    #[test]
    fn test_supplementary_plane() {
        // One char per scalar; CJK Extension B and emoji are two columns
        simple("\u{23600}", 2);
        simple("\u{1F600}", 2);
        simple("\u{1F9D0}", 2);
    }

    #[test]
    fn test_spacing_diacritics() {
        // Diacritics that display on their own rather than combining
        simple("\u{B4}", 1);
        simple("\u{2CA}", 1);
    }

    #[test]
    fn test_combining_characters() {
        simple("\u{61}\u{30A}", 1);
        simple("\u{B15}\u{B44}", 1);
    }

    #[test]
    fn test_emoji_presentation_forms() {
        // Variation selectors pick a different look for the preceding
        // character but do not change East Asian Width, so the cursor
        // does not advance further.
        simple("\u{23}\u{FE0E}", 1);
        simple("\u{23}\u{FE0F}", 1);
    }

    #[test]
    fn test_wide_looking_single_column() {
        // Ligatures and non-East-Asian glyphs that render wide but carry
        // no Wide/Fullwidth East Asian Width value
        simple("\u{FDF2}", 1);
        simple("\u{FDFD}", 1);
        simple("\u{FDFC}", 1);
        simple("\u{FC51}", 1);
        simple("\u{A732}", 1);
        simple("\u{1D160}", 1);
    }

    #[test]
    fn test_multicolumn_characters() {
        simple("\u{FF23}", 2);
        simple("\u{FF29}", 2);
        simple("\u{D55C}", 2);
    }

    fn check(s: &str, parts: &[(&str, i32)], expected: i32) {
        let (got, w) = decompose(s);
        let want: Vec<(String, i32)> =
            parts.iter().map(|&(t, w)| (t.to_string(), w)).collect();
        assert_eq!(w, expected, "wcswidth({:?})", s);
        assert_eq!(got, want, "decomposition of {:?}", s);
    }

    #[test]
    fn test_grapheme_decomposition() {
        check(
            "ＣＨＩＣＫＥＮ",
            &[
                ("Ｃ", 2),
                ("Ｈ", 2),
                ("Ｉ", 2),
                ("Ｃ", 2),
                ("Ｋ", 2),
                ("Ｅ", 2),
                ("Ｎ", 2),
            ],
            14,
        );

        check(
            "ＣHＩCＫEＮ",
            &[
                ("Ｃ", 2),
                ("H", 1),
                ("Ｉ", 2),
                ("C", 1),
                ("Ｋ", 2),
                ("E", 1),
                ("Ｎ", 2),
            ],
            11,
        );

        check(
            "新疆 (Xinjiang)",
            &[
                ("新", 2),
                ("疆", 2),
                (" ", 1),
                ("(", 1),
                ("X", 1),
                ("i", 1),
                ("n", 1),
                ("j", 1),
                ("i", 1),
                ("a", 1),
                ("n", 1),
                ("g", 1),
                (")", 1),
            ],
            15,
        );

        check(
            "東京 (Tokyo)",
            &[
                ("東", 2),
                ("京", 2),
                (" ", 1),
                ("(", 1),
                ("T", 1),
                ("o", 1),
                ("k", 1),
                ("y", 1),
                ("o", 1),
                (")", 1),
            ],
            12,
        );
    }

    #[test]
    fn test_control_characters_poison_whole_string() {
        // A NUL after a control character stands alone; after a printable
        // it attaches to the cluster. Either way a -1 cluster anywhere
        // forces the whole-string result to -1.
        check(
            "\u{1}\u{0}\u{11}Q\u{1B} ",
            &[
                ("\u{1}", -1),
                ("\u{0}", 0),
                ("\u{11}", -1),
                ("Q", 1),
                ("\u{1B}", -1),
                (" ", 1),
            ],
            -1,
        );

        check(
            "\u{1}\u{11}Q\u{0}\u{1B} ",
            &[
                ("\u{1}", -1),
                ("\u{11}", -1),
                ("Q\u{0}", 1),
                ("\u{1B}", -1),
                (" ", 1),
            ],
            -1,
        );
    }

    #[test]
    fn test_leading_combining_marks() {
        check("i\u{30A}\u{327}", &[("i\u{30A}\u{327}", 1)], 1);
        check(
            "\u{30A}\u{327}i",
            &[("\u{30A}\u{327}", 0), ("i", 1)],
            1,
        );
    }

    #[test]
    fn test_restartable() {
        let s = "新a";
        let first: Vec<_> = graphemes(s).map(|g| g.width).collect();
        let second: Vec<_> = graphemes(s).map(|g| g.width).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![2, 1]);
    }
}
