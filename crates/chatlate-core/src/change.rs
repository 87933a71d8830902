/// Translate only non-empty text that differs from the previous iteration.
///
/// Comparison is exact: case and whitespace count.
pub fn should_translate(current: &str, previous: &str) -> bool {
    !current.is_empty() && current != previous
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_never_translated() {
        assert!(!should_translate("", ""));
        assert!(!should_translate("", "hello"));
    }

    #[test]
    fn test_new_text_is_translated() {
        assert!(should_translate("hello", ""));
        assert!(should_translate("hello", "world"));
    }

    #[test]
    fn test_repeated_text_is_skipped() {
        assert!(!should_translate("hello", "hello"));
    }

    #[test]
    fn test_comparison_is_exact() {
        assert!(should_translate("Hello", "hello"));
        assert!(should_translate("hello ", "hello"));
        assert!(should_translate("hello\nworld", "hello world"));
    }
}
