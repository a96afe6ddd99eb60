//! Description tokenization.
//!
//! Descriptions are split on the literal space character. Runs of spaces
//! are not collapsed, so interior and leading empty tokens survive and take
//! part in matching. Trailing empty tokens are dropped, and an empty
//! description is a single empty token. This is the splitting behavior the
//! stored descriptions were originally indexed with.

/// Split a description into match tokens.
pub fn tokens(description: &str) -> Vec<&str> {
    if description.is_empty() {
        return vec![""];
    }

    let mut parts: Vec<&str> = description.split(' ').collect();
    while parts.last().is_some_and(|t| t.is_empty()) {
        parts.pop();
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_words() {
        assert_eq!(tokens("DFKI Demo Video"), vec!["DFKI", "Demo", "Video"]);
    }

    #[test]
    fn test_repeated_spaces_keep_empty_tokens() {
        assert_eq!(tokens("a  b"), vec!["a", "", "b"]);
        assert_eq!(tokens(" a"), vec!["", "a"]);
    }

    #[test]
    fn test_trailing_empty_tokens_dropped() {
        assert_eq!(tokens("a b  "), vec!["a", "b"]);
        assert!(tokens("   ").is_empty());
    }

    #[test]
    fn test_empty_description_is_one_empty_token() {
        assert_eq!(tokens(""), vec![""]);
    }

    #[test]
    fn test_only_space_is_a_separator() {
        assert_eq!(tokens("tab\tnew\nline"), vec!["tab\tnew\nline"]);
    }
}
