//! Locale-aware name ordering
//!
//! Approximates the CLDR root collation browsers use for `localeCompare`:
//! 1. base letters, ignoring case and accents; whitespace and punctuation
//!    sort before digits, digits before letters, and ASCII punctuation and
//!    symbols follow the root table order rather than code points
//! 2. accents, unaccented first
//! 3. case, lowercase first
//!
//! Names that tie on all three levels fall back to byte order.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Compare two names the way a directory listing orders them
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    CollationKey::new(a)
        .cmp(&CollationKey::new(b))
        .then_with(|| a.cmp(b))
}

/// ASCII punctuation and symbols in CLDR root primary order
const PUNCTUATION_ORDER: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CharClass {
    Space,
    Punctuation,
    Digit,
    Letter,
}

impl CharClass {
    fn of(c: char) -> Self {
        if c.is_whitespace() {
            Self::Space
        } else if c.is_alphabetic() {
            Self::Letter
        } else if c.is_numeric() {
            Self::Digit
        } else {
            Self::Punctuation
        }
    }
}

/// Primary weight within a class; code point breaks ties
///
/// Punctuation missing from the table sorts after every listed character.
fn punctuation_rank(c: char) -> usize {
    PUNCTUATION_ORDER
        .find(c)
        .unwrap_or(PUNCTUATION_ORDER.len())
}

/// Field order is comparison order
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct CollationKey {
    primary: Vec<(CharClass, usize, char)>,
    /// Combining marks attached to each base character
    secondary: Vec<Vec<char>>,
    /// `true` for an uppercase base character
    tertiary: Vec<bool>,
}

impl CollationKey {
    fn new(s: &str) -> Self {
        let mut key = Self {
            primary: Vec::with_capacity(s.len()),
            secondary: Vec::with_capacity(s.len()),
            tertiary: Vec::with_capacity(s.len()),
        };

        for c in s.nfd() {
            if is_combining_mark(c) {
                if let Some(marks) = key.secondary.last_mut() {
                    marks.push(c);
                    continue;
                }
            }
            key.primary.extend(c.to_lowercase().map(|lower| {
                let class = CharClass::of(lower);
                let rank = if class == CharClass::Punctuation {
                    punctuation_rank(lower)
                } else {
                    0
                };
                (class, rank, lower)
            }));
            key.secondary.push(Vec::new());
            key.tertiary.push(c.is_uppercase());
        }

        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(names: &[&str]) -> Vec<String> {
        let mut names: Vec<String> = names.iter().map(ToString::to_string).collect();
        names.sort_by(|a, b| locale_cmp(a, b));
        names
    }

    #[test]
    fn test_case_insensitive_primary() {
        assert_eq!(sorted(&["B", "a", "C"]), vec!["a", "B", "C"]);
        assert_eq!(sorted(&["Zeta", "alpha", "Beta"]), vec!["alpha", "Beta", "Zeta"]);
    }

    #[test]
    fn test_lowercase_first_on_tie() {
        assert_eq!(locale_cmp("a", "A"), Ordering::Less);
        assert_eq!(locale_cmp("README.md", "readme.md"), Ordering::Greater);
    }

    #[test]
    fn test_accents_between_base_letters() {
        assert_eq!(sorted(&["f", "é", "e"]), vec!["e", "é", "f"]);
        assert_eq!(sorted(&["résumé", "resume", "rez"]), vec!["resume", "résumé", "rez"]);
    }

    #[test]
    fn test_precomposed_and_decomposed_agree() {
        assert_eq!(locale_cmp("caf\u{e9}", "cafe\u{301}"), "caf\u{e9}".cmp("cafe\u{301}"));
        let a = CollationKey::new("caf\u{e9}");
        let b = CollationKey::new("cafe\u{301}");
        assert_eq!(a, b);
    }

    #[test]
    fn test_punctuation_and_digits_before_letters() {
        assert_eq!(
            sorted(&["zebra", "_config", "2024", "Apple", "~tmp"]),
            vec!["_config", "~tmp", "2024", "Apple", "zebra"]
        );
    }

    #[test]
    fn test_punctuation_follows_root_table() {
        assert_eq!(
            sorted(&["image.png", "image_2.png", "image-2.png"]),
            vec!["image_2.png", "image-2.png", "image.png"]
        );
        assert_eq!(
            sorted(&["a$b", "a~b", "a#b", "a.b", "a-b", "a_b"]),
            vec!["a_b", "a-b", "a.b", "a#b", "a~b", "a$b"]
        );
    }

    #[test]
    fn test_unlisted_punctuation_after_table() {
        assert_eq!(sorted(&["a\u{a7}b", "a$b"]), vec!["a$b", "a\u{a7}b"]);
    }

    #[test]
    fn test_not_numeric_aware() {
        assert_eq!(sorted(&["file2", "file10"]), vec!["file10", "file2"]);
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert_eq!(sorted(&["images-old", "images"]), vec!["images", "images-old"]);
    }

    #[test]
    fn test_total_order() {
        assert_eq!(locale_cmp("same", "same"), Ordering::Equal);
    }
}
