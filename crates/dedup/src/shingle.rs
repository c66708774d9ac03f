//! Text normalization and token shingling

use rankdup_core::ShinglingConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Options for [`preprocess`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreprocessOptions {
    /// Replace `-` with a space before stripping punctuation, so hyphenated
    /// words become separate tokens instead of being glued together
    pub remove_hyphens: bool,
    /// Leave `'` in place
    pub keep_apostrophes: bool,
}

impl From<&ShinglingConfig> for PreprocessOptions {
    fn from(config: &ShinglingConfig) -> Self {
        Self {
            remove_hyphens: config.remove_hyphens,
            keep_apostrophes: config.keep_apostrophes,
        }
    }
}

/// Strip ASCII punctuation and lower-case `text`.
///
/// ```
/// use rankdup_dedup::{preprocess, PreprocessOptions};
///
/// assert_eq!(preprocess("Don't stop-me NOW!", PreprocessOptions::default()), "dont stopme now");
/// ```
pub fn preprocess(text: &str, options: PreprocessOptions) -> String {
    text.chars()
        .filter_map(|c| match c {
            '-' if options.remove_hyphens => Some(' '),
            '\'' if options.keep_apostrophes => Some(c),
            c if c.is_ascii_punctuation() => None,
            c => Some(c),
        })
        .collect::<String>()
        .to_lowercase()
}

/// An ordered run of tokens
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Shingle(Vec<String>);

impl Shingle {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tokens.into_iter().map(Into::into).collect())
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Shingle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(" "))
    }
}

/// Documents shorter than this are short regardless of the shingle length
pub const MIN_SHINGLE_TOKENS: usize = 3;

/// Split `text` on whitespace and return every `length`-token window in order.
///
/// Documents with fewer than [`MIN_SHINGLE_TOKENS`] tokens produce no
/// shingles, unless `keep_short` is set, in which case they produce one
/// shingle holding all of their tokens. Longer documents yield their windows,
/// which is none when `length` exceeds the token count. Repeated windows are
/// kept.
pub fn shingle(text: &str, length: usize, keep_short: bool) -> Vec<Shingle> {
    let tokens: Vec<&str> = text.split_whitespace().collect();

    if tokens.is_empty() || length == 0 {
        return Vec::new();
    }

    if tokens.len() < MIN_SHINGLE_TOKENS {
        return if keep_short {
            vec![Shingle::new(tokens)]
        } else {
            Vec::new()
        };
    }

    tokens
        .windows(length)
        .map(|window| Shingle::new(window.iter().copied()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_shingle_sentence() {
        let shingles = shingle("the cat sat on the mat", 3, false);
        assert_eq!(
            shingles,
            vec![
                Shingle::new(["the", "cat", "sat"]),
                Shingle::new(["cat", "sat", "on"]),
                Shingle::new(["sat", "on", "the"]),
                Shingle::new(["on", "the", "mat"]),
            ]
        );
    }

    #[test]
    fn test_short_documents() {
        assert!(shingle("hello world", 3, false).is_empty());
        assert_eq!(
            shingle("hello world", 3, true),
            vec![Shingle::new(["hello", "world"])]
        );
        assert!(shingle("   ", 3, true).is_empty());
    }

    #[test]
    fn test_short_cutoff_ignores_shingle_length() {
        assert!(shingle("a b", 2, false).is_empty());
        assert_eq!(shingle("a b", 2, true), vec![Shingle::new(["a", "b"])]);
        assert!(shingle("a b c", 4, true).is_empty());
        assert_eq!(
            shingle("a b c d", 2, false),
            vec![
                Shingle::new(["a", "b"]),
                Shingle::new(["b", "c"]),
                Shingle::new(["c", "d"]),
            ]
        );
    }

    #[test]
    fn test_exact_length_yields_one_window() {
        assert_eq!(shingle("a b c", 3, false), vec![Shingle::new(["a", "b", "c"])]);
    }

    #[test]
    fn test_repeated_windows_are_kept() {
        let shingles = shingle("la la la la", 2, false);
        assert_eq!(shingles.len(), 3);
        assert!(shingles.iter().all(|s| s == &Shingle::new(["la", "la"])));
    }

    #[test]
    fn test_preprocess_hyphens_and_apostrophes() {
        let text = "Rock-n-roll, isn't it?";

        assert_eq!(preprocess(text, PreprocessOptions::default()), "rocknroll isnt it");
        assert_eq!(
            preprocess(
                text,
                PreprocessOptions {
                    remove_hyphens: true,
                    keep_apostrophes: true,
                }
            ),
            "rock n roll isn't it"
        );
    }

    #[test]
    fn test_preprocess_keeps_non_ascii() {
        assert_eq!(
            preprocess("Ça Va?", PreprocessOptions::default()),
            "ça va"
        );
    }

    #[test]
    fn test_shingle_display() {
        assert_eq!(Shingle::new(["a", "b"]).to_string(), "(a b)");
    }
}
