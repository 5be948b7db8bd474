//! Word splitter.
//!
//! A lossless three-way partition of text into whitespace runs, word runs
//! and everything else. Word characters are ASCII letters, digits and `_`;
//! there is no locale-aware segmentation, so non-Latin scripts fall into
//! "other" and are passed through untouched.

use super::PrefixLength;

/// One piece of the partition, borrowing from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Whitespace, preserved verbatim.
    Whitespace(&'a str),
    /// A maximal run of word characters.
    Word(WordUnit<'a>),
    /// Punctuation, symbols and non-ASCII letters, preserved verbatim.
    Other(&'a str),
}

/// A word split into its emphasized prefix and normal suffix.
///
/// Words of length ≤ 1 carry an empty prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordUnit<'a> {
    pub prefix: &'a str,
    pub suffix: &'a str,
}

impl<'a> WordUnit<'a> {
    fn new(word: &'a str, prefix: PrefixLength) -> Self {
        // Word characters are ASCII, so char counts equal byte offsets.
        let at = bold_count(word.len(), prefix);
        let (prefix, suffix) = word.split_at(at);
        Self { prefix, suffix }
    }

    /// Whether a split is drawn (the word has an emphasized part).
    #[inline]
    pub fn is_split(&self) -> bool {
        !self.prefix.is_empty()
    }

    /// Original word text.
    pub fn text(&self) -> String {
        format!("{}{}", self.prefix, self.suffix)
    }

    pub fn len(&self) -> usize {
        self.prefix.len() + self.suffix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a> Segment<'a> {
    /// Append this segment's original text to `out`.
    pub fn push_to(&self, out: &mut String) {
        match self {
            Self::Whitespace(s) | Self::Other(s) => out.push_str(s),
            Self::Word(word) => {
                out.push_str(word.prefix);
                out.push_str(word.suffix);
            }
        }
    }
}

/// Number of leading characters to emphasize for a word of `len` characters.
///
/// `0` for `len ≤ 1`, otherwise `min(prefix, ceil(len / 2))`.
#[inline]
pub fn bold_count(len: usize, prefix: PrefixLength) -> usize {
    if len <= 1 {
        0
    } else {
        prefix.get().min(len.div_ceil(2))
    }
}

#[inline]
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Space,
    Word,
    Other,
}

#[inline]
fn classify(c: char) -> Class {
    if c.is_whitespace() {
        Class::Space
    } else if is_word_char(c) {
        Class::Word
    } else {
        Class::Other
    }
}

/// Split `text` into ordered segments.
///
/// Concatenating the segments reproduces `text` exactly.
pub fn split(text: &str, prefix: PrefixLength) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((start, first)) = chars.next() {
        let class = classify(first);
        let mut end = start + first.len_utf8();
        while let Some(&(i, c)) = chars.peek() {
            if classify(c) != class {
                break;
            }
            end = i + c.len_utf8();
            chars.next();
        }

        let run = &text[start..end];
        segments.push(match class {
            Class::Space => Segment::Whitespace(run),
            Class::Word => Segment::Word(WordUnit::new(run, prefix)),
            Class::Other => Segment::Other(run),
        });
    }

    segments
}

/// Whether any word in the partition is split.
pub fn has_emphasis(segments: &[Segment<'_>]) -> bool {
    segments
        .iter()
        .any(|s| matches!(s, Segment::Word(w) if w.is_split()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(n: i64) -> PrefixLength {
        PrefixLength::new(n).unwrap()
    }

    fn join(segments: &[Segment<'_>]) -> String {
        let mut out = String::new();
        for s in segments {
            s.push_to(&mut out);
        }
        out
    }

    #[test]
    fn test_cat() {
        let segments = split("cat", p(2));
        assert_eq!(
            segments,
            vec![Segment::Word(WordUnit {
                prefix: "ca",
                suffix: "t"
            })]
        );
    }

    #[test]
    fn test_single_letter_is_not_split() {
        for n in 1..=10 {
            let segments = split("a", p(n));
            assert_eq!(
                segments,
                vec![Segment::Word(WordUnit {
                    prefix: "",
                    suffix: "a"
                })]
            );
            assert!(!has_emphasis(&segments));
        }
    }

    #[test]
    fn test_extraordinary() {
        let segments = split("extraordinary", p(2));
        let Segment::Word(word) = segments[0] else {
            panic!("expected a word");
        };
        assert_eq!(word.prefix, "ex");
        assert_eq!(word.suffix, "traordinary");
    }

    #[test]
    fn test_large_prefix_capped_at_half() {
        let Segment::Word(word) = split("four", p(10))[0] else {
            panic!("expected a word");
        };
        assert_eq!(word.prefix, "fo");
        assert_eq!(word.suffix, "ur");
    }

    #[test]
    fn test_bold_count_bounds() {
        for len in 2..64 {
            for n in 1..=10 {
                let count = bold_count(len, p(n));
                assert!(count >= 1 && count < len, "len={len} p={n} count={count}");
                assert_eq!(count, (n as usize).min(len.div_ceil(2)));
            }
        }
        assert_eq!(bold_count(0, p(3)), 0);
        assert_eq!(bold_count(1, p(3)), 0);
    }

    #[test]
    fn test_three_way_partition() {
        let segments = split("Hi, there!  ok_2", p(2));
        let kinds: Vec<_> = segments
            .iter()
            .map(|s| match s {
                Segment::Whitespace(_) => 's',
                Segment::Word(_) => 'w',
                Segment::Other(_) => 'o',
            })
            .collect();
        assert_eq!(kinds, vec!['w', 'o', 's', 'w', 'o', 's', 'w']);
    }

    #[test]
    fn test_lossless_on_mixed_input() {
        let inputs = [
            "",
            " ",
            "plain words here",
            "  leading and trailing  ",
            "tabs\tand\nnewlines\r\n",
            "naïve café — “quotes” …",
            "日本語のテキスト and English",
            "emoji 🎉 party_time 42x",
            "a.b,c;d:e!f?g",
            "\u{00A0}nbsp\u{2003}em",
        ];
        for input in inputs {
            for n in [1, 2, 5, 10] {
                assert_eq!(join(&split(input, p(n))), input, "input {input:?}");
            }
        }
    }

    #[test]
    fn test_non_ascii_letters_are_other() {
        let segments = split("café", p(2));
        assert_eq!(segments.len(), 2);
        assert!(matches!(segments[0], Segment::Word(w) if w.text() == "caf"));
        assert_eq!(segments[1], Segment::Other("é"));
    }

    #[test]
    fn test_has_emphasis() {
        assert!(has_emphasis(&split("to be", p(1))));
        assert!(!has_emphasis(&split("a - b", p(2))));
        assert!(!has_emphasis(&split("...", p(2))));
    }
}
