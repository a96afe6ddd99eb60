//! Token match strategies, ordered from strictest to loosest.

use serde::Serialize;
use std::fmt;

use crate::levenshtein;

/// Tokens within this many edits (exclusive) of a candidate match in the
/// [`MatchStrategy::Levenshtein`] pass.
pub const MAX_EDIT_DISTANCE: usize = 3;

/// One way of comparing a description token against a recognized candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Token equals the candidate exactly.
    Exact,
    /// Token equals the candidate ignoring case.
    CaseInsensitive,
    /// Token contains the candidate as a substring.
    WrapAround,
    /// Token is fewer than [`MAX_EDIT_DISTANCE`] edits from the candidate.
    Levenshtein,
}

impl MatchStrategy {
    /// All strategies in the order the search engine runs them.
    pub const PASSES: [MatchStrategy; 4] = [
        MatchStrategy::Exact,
        MatchStrategy::CaseInsensitive,
        MatchStrategy::WrapAround,
        MatchStrategy::Levenshtein,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStrategy::Exact => "exact",
            MatchStrategy::CaseInsensitive => "case_insensitive",
            MatchStrategy::WrapAround => "wrap_around",
            MatchStrategy::Levenshtein => "levenshtein",
        }
    }

    /// Whether `token` satisfies this strategy for `candidate`.
    pub fn matches(&self, token: &str, candidate: &str) -> bool {
        match self {
            MatchStrategy::Exact => token == candidate,
            MatchStrategy::CaseInsensitive => eq_ignore_case(token, candidate),
            MatchStrategy::WrapAround => token.contains(candidate),
            MatchStrategy::Levenshtein => {
                let distance = levenshtein::distance(candidate, token);
                tracing::trace!(candidate, token, distance, "levenshtein");
                distance < MAX_EDIT_DISTANCE
            }
        }
    }

    /// First token in `tokens` that satisfies this strategy, if any.
    pub fn first_match<'t>(&self, tokens: &[&'t str], candidate: &str) -> Option<&'t str> {
        tokens.iter().copied().find(|t| self.matches(t, candidate))
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Char-by-char comparison: two chars are equal when they are identical or
/// share their simple upper or lower case mapping. Lengths must agree.
fn eq_ignore_case(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    let mut a = a.chars();
    let mut b = b.chars();
    loop {
        match (a.next(), b.next()) {
            (None, None) => return true,
            (Some(x), Some(y)) if chars_eq_ignore_case(x, y) => {}
            _ => return false,
        }
    }
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || simple_upper(a) == simple_upper(b) || simple_lower(a) == simple_lower(b)
}

fn simple_upper(c: char) -> char {
    single(c.to_uppercase()).unwrap_or(c)
}

// The only multi-char lowercase mapping is U+0130, whose simple mapping is
// the leading 'i'.
fn simple_lower(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn single(mut mapping: impl Iterator<Item = char>) -> Option<char> {
    let first = mapping.next()?;
    mapping.next().is_none().then_some(first)
}
