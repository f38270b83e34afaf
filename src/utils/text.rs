//! Text helpers shared by the embedding and analysis pipelines.

/// Replace newlines with spaces before sending text to the embedding
/// endpoint. Embedding models treat newlines as significant tokens and
/// transcripts are newline-heavy.
pub fn normalize_for_embedding(text: &str) -> String {
    text.replace('\n', " ")
}

/// True when the text is worth embedding at all.
pub fn is_embeddable(text: &str) -> bool {
    !text.trim().is_empty()
}

/// Truncate to at most `max_chars` characters, respecting UTF-8
/// boundaries. Byte slicing would panic mid-codepoint on accented
/// transcript text.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_for_embedding() {
        assert_eq!(
            normalize_for_embedding("hola\nmundo\ncruel"),
            "hola mundo cruel"
        );
        assert_eq!(normalize_for_embedding("sin saltos"), "sin saltos");
    }

    #[test]
    fn test_is_embeddable() {
        assert!(is_embeddable("hola"));
        assert!(!is_embeddable(""));
        assert!(!is_embeddable("   \n\t  "));
    }

    #[test]
    fn test_truncate_chars_respects_utf8() {
        let text = "atención al cliente";
        assert_eq!(truncate_chars(text, 7), "atenció");
        assert_eq!(truncate_chars(text, 100), text);
        assert_eq!(truncate_chars("", 10), "");
    }
}
