//! Small string helpers shared across the domain

/// Shorten a string to at most `max_len` bytes, ending in `...`.
///
/// The cut point is moved back to a char boundary, so multibyte input
/// never produces invalid UTF-8. Strings already within the limit come
/// back unchanged.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len.saturating_sub(3).min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_input_unchanged() {
        assert_eq!(truncate("answer", 10), "answer");
        assert_eq!(truncate("", 0), "");
        // Exactly at the limit is still unchanged.
        assert_eq!(truncate("twelve chars", 12), "twelve chars");
    }

    #[test]
    fn test_cut_with_ellipsis() {
        assert_eq!(truncate("a long final answer", 10), "a long ...");
        assert_eq!(truncate("ab", 1), "...");
    }

    #[test]
    fn test_cut_respects_char_boundaries() {
        // Each kana is 3 bytes; the cut backs up to a full character.
        assert_eq!(truncate("日本語テスト文字列", 15), "日本語テ...");
        assert_eq!(truncate("日本語", 20), "日本語");
    }
}
