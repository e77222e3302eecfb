//! Splitting model replies into Discord-sized messages
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Line-aware splitting for replies over the message limit

/// Discord message content limit (bytes are a safe upper bound for characters)
pub const MESSAGE_LIMIT: usize = 2000;

/// Split `text` into pieces no longer than `limit` bytes.
///
/// Pieces break after a newline when one is available and never inside a
/// UTF-8 character. Empty input yields a single empty piece so callers always
/// have something to send. A piece always holds at least one character, even
/// when that character is wider than `limit`.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    if text.len() <= limit {
        return vec![text.to_string()];
    }

    let mut pieces = Vec::new();
    let mut rest = text;

    while rest.len() > limit {
        let mut cut = limit;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        if cut == 0 {
            cut = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }

        // Prefer the last newline inside the window
        let split_at = match rest[..cut].rfind('\n') {
            Some(pos) if pos > 0 => pos + 1,
            _ => cut,
        };

        let piece = rest[..split_at].trim_end();
        if !piece.is_empty() {
            pieces.push(piece.to_string());
        }
        rest = &rest[split_at..];
    }

    if !rest.trim().is_empty() {
        pieces.push(rest.trim_end().to_string());
    }

    pieces
}

/// Split for plain message content
pub fn chunk_for_message(text: &str) -> Vec<String> {
    split_message(text, MESSAGE_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_piece() {
        assert_eq!(split_message("hello", 100), vec!["hello"]);
        assert_eq!(split_message("", 100), vec![""]);
    }

    #[test]
    fn test_prefers_newlines() {
        let text = "first line\nsecond line\nthird line";
        let pieces = split_message(text, 24);
        assert_eq!(pieces, vec!["first line\nsecond line", "third line"]);
    }

    #[test]
    fn test_hard_split_without_newlines() {
        let text = "a".repeat(95);
        let pieces = split_message(&text, 30);
        assert_eq!(pieces.len(), 4);
        assert!(pieces.iter().all(|p| p.len() <= 30));
        assert_eq!(pieces.concat(), text);
    }

    #[test]
    fn test_multibyte_boundaries() {
        let text = "你好世界".repeat(300);
        for piece in chunk_for_message(&text) {
            assert!(piece.len() <= MESSAGE_LIMIT);
            assert!(!piece.is_empty());
        }
        assert_eq!(chunk_for_message(&text).concat(), text);
    }

    #[test]
    fn test_limit_narrower_than_a_character() {
        assert_eq!(split_message("你好", 2), vec!["你", "好"]);
        assert_eq!(split_message("ab", 0), vec!["a", "b"]);
    }

    #[test]
    fn test_exact_limit() {
        let text = "b".repeat(MESSAGE_LIMIT);
        assert_eq!(chunk_for_message(&text).len(), 1);
    }
}
