/// Discord's message content limit in characters.
pub const MESSAGE_LIMIT: usize = 2000;

/// Splits text into chunks of at most `limit` characters.
///
/// Prefers breaking at the last newline, then the last space inside the window, and
/// falls back to a hard cut.
pub fn split_message(content: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut rest: Vec<char> = content.chars().collect();

    while rest.len() > limit {
        let window = &rest[..limit];
        let cut = window
            .iter()
            .rposition(|c| *c == '\n')
            .or_else(|| window.iter().rposition(|c| *c == ' '))
            .filter(|pos| *pos > 0)
            .unwrap_or(limit);

        chunks.push(rest[..cut].iter().collect());
        let skip = if cut < rest.len() && (rest[cut] == '\n' || rest[cut] == ' ') {
            cut + 1
        } else {
            cut
        };
        rest.drain(..skip);
    }

    if !rest.is_empty() || chunks.is_empty() {
        chunks.push(rest.into_iter().collect());
    }

    chunks
}

/// Truncates to `max` characters, ending with an ellipsis when shortened.
pub fn truncate(content: &str, max: usize) -> String {
    if content.chars().count() <= max {
        return content.to_string();
    }
    let mut out: String = content.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_short_message_whole() {
        assert_eq!(split_message("hello", 2000), vec!["hello".to_string()]);
    }

    #[test]
    fn splits_on_newline() {
        let chunks = split_message("aaaa\nbbbb", 6);
        assert_eq!(chunks, vec!["aaaa".to_string(), "bbbb".to_string()]);
    }

    #[test]
    fn hard_cuts_without_break_points() {
        let chunks = split_message(&"x".repeat(4500), MESSAGE_LIMIT);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 2000);
        assert_eq!(chunks[2].chars().count(), 500);
    }

    #[test]
    fn never_exceeds_limit_with_multibyte_text() {
        let text = "é".repeat(2500);
        for chunk in split_message(&text, MESSAGE_LIMIT) {
            assert!(chunk.chars().count() <= MESSAGE_LIMIT);
        }
    }

    #[test]
    fn truncates_with_ellipsis() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
