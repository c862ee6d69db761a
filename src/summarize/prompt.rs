//! Prompt construction

use super::types::SummaryDetail;

/// Maximum number of characters of the document sent to the AI service
pub const EXCERPT_CHAR_LIMIT: usize = 4000;

/// The first `limit` characters of `text`, never splitting a character
pub fn excerpt(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Build the summary instruction for a document
pub fn build_prompt(text: &str, detail: SummaryDetail) -> String {
    format!(
        "Summarize these edits in {} detail: {}",
        detail,
        excerpt(text, EXCERPT_CHAR_LIMIT)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_detail_and_text() {
        let prompt = build_prompt("Hello Edited World", SummaryDetail::Brief);
        assert_eq!(prompt, "Summarize these edits in Brief detail: Hello Edited World");
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let text = "lorem ipsum ".repeat(1000);
        for detail in SummaryDetail::ALL {
            assert_eq!(build_prompt(&text, detail), build_prompt(&text, detail));
        }
    }

    #[test]
    fn test_excerpt_is_bounded() {
        let text = "x".repeat(10_000);
        assert_eq!(excerpt(&text, EXCERPT_CHAR_LIMIT).chars().count(), EXCERPT_CHAR_LIMIT);

        let prompt = build_prompt(&text, SummaryDetail::Detailed);
        let prefix = "Summarize these edits in Detailed detail: ";
        assert_eq!(prompt.len(), prefix.len() + EXCERPT_CHAR_LIMIT);
    }

    #[test]
    fn test_excerpt_counts_characters_not_bytes() {
        let text = "é".repeat(5000);
        let cut = excerpt(&text, EXCERPT_CHAR_LIMIT);
        assert_eq!(cut.chars().count(), EXCERPT_CHAR_LIMIT);
        assert_eq!(cut.len(), EXCERPT_CHAR_LIMIT * 2);
    }

    #[test]
    fn test_short_text_is_untouched() {
        assert_eq!(excerpt("short", EXCERPT_CHAR_LIMIT), "short");
        assert_eq!(excerpt("", EXCERPT_CHAR_LIMIT), "");
    }
}
