//! Text statistics used by the scoring engine.
//!
//! Word and sentence counting here are deliberately simple so that scores
//! are reproducible: words are whitespace-separated tokens, sentences are
//! non-empty runs between `.`, `!` and `?`.

use regex::Regex;
use std::sync::LazyLock;

static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").expect("sentence pattern"));

/// Count whitespace-separated tokens
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Count non-empty segments after splitting on runs of sentence terminators
pub fn count_sentences(text: &str) -> usize {
    SENTENCE_BREAK
        .split(text)
        .filter(|segment| !segment.trim().is_empty())
        .count()
}

/// Text before the first sentence terminator (the whole text if there is none)
pub fn first_sentence(text: &str) -> &str {
    text.split(['.', '!', '?']).next().unwrap_or("")
}

/// Simplified Flesch reading ease.
///
/// `206.835 - 1.015 * (words / sentences)`, clamped to 0-100 and rounded to
/// one decimal. The syllable term of the full formula is omitted. A text
/// with no sentences averages zero words per sentence; a text with no words
/// scores 0.
pub fn readability_score(word_count: usize, sentence_count: usize) -> f64 {
    if word_count == 0 {
        return 0.0;
    }
    let avg_words_per_sentence = ratio(word_count as f64, sentence_count as f64);
    round_to((206.835 - 1.015 * avg_words_per_sentence).clamp(0.0, 100.0), 1)
}

/// `numerator / denominator`, or 0 when the denominator is zero
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 { 0.0 } else { numerator / denominator }
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("hello world"), 2);
        assert_eq!(count_words("  spaced   out\n\ttext "), 3);
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("word's with-hyphen"), 2);
    }

    #[test]
    fn test_count_sentences() {
        assert_eq!(count_sentences("One. Two! Three?"), 3);
        assert_eq!(count_sentences("Wait... what?!"), 2);
        assert_eq!(count_sentences("no terminator"), 1);
        assert_eq!(count_sentences("..."), 0);
        assert_eq!(count_sentences(""), 0);
    }

    #[test]
    fn test_first_sentence() {
        assert_eq!(first_sentence("Custom framing. Done right."), "Custom framing");
        assert_eq!(first_sentence("Is it framed? Yes"), "Is it framed");
        assert_eq!(first_sentence("no end"), "no end");
    }

    #[test]
    fn test_readability_score() {
        assert_eq!(readability_score(0, 0), 0.0);
        assert_eq!(readability_score(12, 0), 100.0);
        assert_eq!(readability_score(10, 1), 100.0);
        assert_eq!(readability_score(200, 1), 3.8);
        assert_eq!(readability_score(500, 1), 0.0);
    }

    #[test]
    fn test_ratio_guards_zero() {
        assert_eq!(ratio(5.0, 0.0), 0.0);
        assert_eq!(ratio(6.0, 200.0), 0.03);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(3.14159, 2), 3.14);
        assert_eq!(round_to(2.25, 1), 2.3);
        assert_eq!(round_to(4.0, 2), 4.0);
    }
}
