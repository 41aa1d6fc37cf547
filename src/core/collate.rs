//! Title collation.
//!
//! Comparison runs at three strengths, like a locale collator:
//!
//! 1. base characters, ignoring case and accents
//!    (whitespace and punctuation < digits < letters)
//! 2. accents, unaccented first
//! 3. case, lowercase first
//!
//! Strings equal at all three levels fall back to code point order so the
//! result is a total order.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

#[derive(Debug, Default)]
struct CollationKey {
    primary: Vec<(u8, char)>,
    secondary: Vec<Vec<char>>,
    tertiary: Vec<u8>,
}

fn char_class(c: char) -> u8 {
    if c.is_alphabetic() {
        2
    } else if c.is_numeric() {
        1
    } else {
        0
    }
}

impl CollationKey {
    fn new(s: &str) -> Self {
        let mut key = CollationKey::default();
        for c in s.nfd() {
            if is_combining_mark(c) {
                match key.secondary.last_mut() {
                    Some(accents) => accents.push(c),
                    None => key.push_base(c),
                }
                continue;
            }
            key.push_base(c);
        }
        key
    }

    fn push_base(&mut self, c: char) {
        let folded = c.to_lowercase().next().unwrap_or(c);
        self.primary.push((char_class(c), folded));
        self.secondary.push(Vec::new());
        self.tertiary.push(u8::from(c.is_uppercase()));
    }
}

/// Compares two titles for display ordering.
pub fn compare(a: &str, b: &str) -> Ordering {
    let ka = CollationKey::new(a);
    let kb = CollationKey::new(b);
    ka.primary
        .cmp(&kb.primary)
        .then_with(|| ka.secondary.cmp(&kb.secondary))
        .then_with(|| ka.tertiary.cmp(&kb.tertiary))
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut titles: Vec<&str>) -> Vec<&str> {
        titles.sort_by(|a, b| compare(a, b));
        titles
    }

    #[test]
    fn test_case_insensitive_at_primary_level() {
        assert_eq!(sorted(vec!["banana", "Apple", "cherry"]), vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_lowercase_before_uppercase_on_tie() {
        assert_eq!(compare("gita", "Gita"), Ordering::Less);
        assert_eq!(compare("Gita", "gita"), Ordering::Greater);
    }

    #[test]
    fn test_accents_sort_next_to_base_letter() {
        assert_eq!(
            sorted(vec!["Śrī Gītā", "Sankalpa", "Tattva", "Sri Guru"]),
            vec!["Sankalpa", "Śrī Gītā", "Sri Guru", "Tattva"]
        );
        assert_eq!(compare("Gita", "Gītā"), Ordering::Less);
    }

    #[test]
    fn test_shorter_prefix_first() {
        assert_eq!(compare("Gita", "Gita Mahatmya"), Ordering::Less);
    }

    #[test]
    fn test_punctuation_and_digits_before_letters() {
        assert_eq!(sorted(vec!["alpha", "1984", "(notes)"]), vec!["(notes)", "1984", "alpha"]);
    }

    #[test]
    fn test_identical_strings_equal() {
        assert_eq!(compare("Bhakti", "Bhakti"), Ordering::Equal);
    }
}
