use mdstream_macros::generate_byte_lookup_table;

generate_byte_lookup_table!(
    SIGNIFICANT_BYTES,
    ByteType,
    PUNCTUATION => b"*_~`[]!<>\\$#|:-.",
    WHITESPACE => b" \t\n\r",
    DIGIT => b"0123456789"
);

/// Returns true if `byte` could begin or end an inline construct (emphasis,
/// code span, link, image, autolink, strikethrough, math, table cell
/// delimiters, list/heading markers). Plain prose bytes are never
/// significant; the tokenizer can skip runs of them with a single `memchr`
/// scan for whichever significant byte it's waiting for next.
#[inline(always)]
pub(crate) fn byte_is_significant(byte: u8) -> bool {
    ByteType::is_punctuation(byte)
}

#[inline(always)]
pub(crate) fn byte_is_ascii_whitespace(byte: u8) -> bool {
    ByteType::is_whitespace(byte)
}

#[inline(always)]
pub(crate) fn byte_is_ascii_digit(byte: u8) -> bool {
    ByteType::is_digit(byte)
}

/// Returns true if `c` is a letter this crate treats as identifier-like:
/// either a normal Unicode identifier start/continue character, or one of
/// the Greek letters the math lexer recognizes by name (`alpha`, `beta`,
/// ...) when they appear literally in text rather than behind a `\command`.
#[inline(always)]
pub(crate) fn is_unicode_identifier_start(c: char) -> bool {
    unicode_xid::UnicodeXID::is_xid_start(c)
}

#[inline(always)]
pub(crate) fn is_unicode_identifier_continue(c: char) -> bool {
    unicode_xid::UnicodeXID::is_xid_continue(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_punctuation() {
        assert!(byte_is_significant(b'*'));
        assert!(byte_is_significant(b'$'));
        assert!(!byte_is_significant(b'x'));
    }

    #[test]
    fn classifies_whitespace() {
        assert!(byte_is_ascii_whitespace(b' '));
        assert!(byte_is_ascii_whitespace(b'\n'));
        assert!(!byte_is_ascii_whitespace(b'a'));
    }
}
