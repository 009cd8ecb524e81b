//! Built-in Helvetica metrics and WinAnsi text encoding.
//!
//! The standard 14 fonts need no embedding, but text placement (right
//! alignment, centering, wrapping) needs their advance widths.

/// Built-in fonts referenced by the page resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Font {
    Regular,
    Bold,
}

impl Font {
    /// Resource name in the page's font dictionary.
    pub(crate) fn resource(&self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }

    pub(crate) fn base_font(&self) -> &'static str {
        match self {
            Self::Regular => "Helvetica",
            Self::Bold => "Helvetica-Bold",
        }
    }

    fn widths(&self) -> &'static [u16; 95] {
        match self {
            Self::Regular => &HELVETICA,
            Self::Bold => &HELVETICA_BOLD,
        }
    }

    /// Advance width of one WinAnsi code in 1/1000 em.
    fn advance(&self, code: u8) -> u16 {
        match code {
            0x20..=0x7E => self.widths()[(code - 0x20) as usize],
            0xA0 => 278,
            _ => match self {
                Self::Regular => 556,
                Self::Bold => 611,
            },
        }
    }

    /// Width of `text` in points at `size`.
    pub(crate) fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = encode_win_ansi(text)
            .into_iter()
            .map(|code| u32::from(self.advance(code)))
            .sum();
        units as f32 * size / 1000.0
    }

    /// Greedy word wrap into lines no wider than `max_width`.
    ///
    /// Explicit newlines start a new line; a single word wider than the
    /// line is broken between characters. Always returns at least one line.
    pub(crate) fn wrap(&self, text: &str, size: f32, max_width: f32) -> Vec<String> {
        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            let mut line = String::new();
            for word in paragraph.split_whitespace() {
                let candidate = if line.is_empty() {
                    word.to_string()
                } else {
                    format!("{line} {word}")
                };
                if self.text_width(&candidate, size) <= max_width {
                    line = candidate;
                    continue;
                }
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                if self.text_width(word, size) <= max_width {
                    line = word.to_string();
                } else {
                    for ch in word.chars() {
                        let mut next = line.clone();
                        next.push(ch);
                        if !line.is_empty() && self.text_width(&next, size) > max_width {
                            lines.push(std::mem::take(&mut line));
                            line.push(ch);
                        } else {
                            line = next;
                        }
                    }
                }
            }
            lines.push(line);
        }
        if lines.is_empty() {
            lines.push(String::new());
        }
        lines
    }
}

/// Encode text as WinAnsi (CP1252) bytes. Unmappable characters become `?`.
pub(crate) fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            '\t' | '\n' | '\r' => b' ',
            ' '..='~' => ch as u8,
            '\u{A0}'..='\u{FF}' => ch as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8A,
            '‹' => 0x8B,
            'Œ' => 0x8C,
            'Ž' => 0x8E,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9A,
            '›' => 0x9B,
            'œ' => 0x9C,
            'ž' => 0x9E,
            'Ÿ' => 0x9F,
            _ => b'?',
        })
        .collect()
}

// Advance widths for codes 0x20..=0x7E (Adobe AFM).
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euro_and_latin1_encoding() {
        assert_eq!(encode_win_ansi("€ 5,50"), b"\x80 5,50".to_vec());
        assert_eq!(encode_win_ansi("Café"), b"Caf\xe9".to_vec());
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
    }

    #[test]
    fn widths_match_afm() {
        // "0" is 556 units in both weights
        assert!((Font::Regular.text_width("0", 10.0) - 5.56).abs() < 1e-4);
        assert!((Font::Bold.text_width("i", 10.0) - 2.78).abs() < 1e-4);
        assert!(Font::Bold.text_width("Totaal", 9.0) > Font::Regular.text_width("Totaal", 9.0));
    }

    #[test]
    fn wrap_breaks_on_words() {
        let lines = Font::Regular.wrap("aaa bbb ccc", 10.0, Font::Regular.text_width("aaa bbb", 10.0));
        assert_eq!(lines, ["aaa bbb", "ccc"]);
    }

    #[test]
    fn wrap_splits_long_words_and_keeps_newlines() {
        let lines = Font::Regular.wrap("abcdefgh", 10.0, Font::Regular.text_width("abc", 10.0));
        assert!(lines.len() >= 3);
        assert_eq!(lines.concat(), "abcdefgh");

        let lines = Font::Regular.wrap("one\ntwo", 10.0, 500.0);
        assert_eq!(lines, ["one", "two"]);
        assert_eq!(Font::Regular.wrap("", 10.0, 100.0), [""]);
    }
}
