use once_cell::sync::Lazy;
use regex::Regex;

/// Three backticks followed by a run of ASCII word characters.
static FENCE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```([A-Za-z0-9_]+)").expect("fence marker pattern must be valid"));

/// Return the language tag of the first fence marker in `text`.
///
/// Only the leading word-character run is captured, so "```c++" yields `c`.
/// An empty capture is treated as no marker.
pub fn extract_fenced_language(text: &str) -> Option<&str> {
    FENCE_MARKER
        .captures(text.trim())
        .and_then(|captures| captures.get(1))
        .map(|tag| tag.as_str())
        .filter(|tag| !tag.is_empty())
}

/// Literal marker that opened the fence, as it appears in the source text.
pub(crate) fn fence_marker(language: &str) -> String {
    format!("```{language}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_language_after_backticks() {
        assert_eq!(
            extract_fenced_language("```go\nfmt.Println(1)\n```"),
            Some("go")
        );
    }

    #[test]
    fn marker_may_appear_anywhere() {
        assert_eq!(
            extract_fenced_language("  some preface ```rust\nlet x = 1;"),
            Some("rust")
        );
    }

    #[test]
    fn only_leading_word_run_is_captured() {
        assert_eq!(extract_fenced_language("```c++\nint main() {}"), Some("c"));
        assert_eq!(extract_fenced_language("```objective_c2 x"), Some("objective_c2"));
    }

    #[test]
    fn first_marker_wins() {
        assert_eq!(
            extract_fenced_language("```js\nconsole.log(1)\n```ts\n"),
            Some("js")
        );
    }

    #[test]
    fn bare_fences_have_no_language() {
        assert_eq!(extract_fenced_language("```\ncode\n```"), None);
        assert_eq!(extract_fenced_language("plain text"), None);
        assert_eq!(extract_fenced_language("``rust"), None);
        assert_eq!(extract_fenced_language("```é"), None);
    }
}
