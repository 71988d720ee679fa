use unicode_normalization::UnicodeNormalization;

const ALLOWED_PUNCTUATION: &str = ".,?!'\"-:;()@#/";

/// Reduces a note to the characters the builtin PDF fonts can draw. Emoji
/// and non-Latin scripts are lost.
pub fn sanitize_note(raw: &str) -> String {
    let cleaned: String = raw
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .map(straighten_quote)
        .filter(|c| is_allowed(*c))
        .collect();

    cleaned.trim().to_string()
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

fn straighten_quote(c: char) -> char {
    match c {
        '\u{2018}' | '\u{2019}' => '\'',
        '\u{201c}' | '\u{201d}' => '"',
        other => other,
    }
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_whitespace() || ALLOWED_PUNCTUATION.contains(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_input_reduces_to_plain_ascii() {
        let raw = "  Ｈｅｌｌｏ “café” it’s naïve 😀 done! ";
        assert_eq!(sanitize_note(raw), "Hello \"cafe\" it's naive  done!");
    }

    #[test]
    fn emoji_only_note_becomes_empty() {
        assert_eq!(sanitize_note("💖🌹✨"), "");
        assert_eq!(sanitize_note(""), "");
    }

    #[test]
    fn whitelisted_punctuation_is_kept() {
        let raw = "Met @ 7:30 (cafe #2); ok? yes! 15/11 - end.";
        assert_eq!(sanitize_note(raw), raw);
    }

    #[test]
    fn other_symbols_are_dropped() {
        assert_eq!(sanitize_note("50% & <b>bold</b> $5 {x}"), "50  bbold/b 5 x");
    }

    #[test]
    fn non_latin_scripts_are_dropped_but_newlines_survive() {
        assert_eq!(sanitize_note("line one\nпривет line two"), "line one\n line two");
    }

    #[test]
    fn compatibility_ligatures_expand() {
        assert_eq!(sanitize_note("ﬁne"), "fine");
    }
}
