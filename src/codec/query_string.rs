//! URL-fragment-safe string form of the plain-JSON filter format
//!
//! The JSON text is run through a reversible character substitution: `*` is
//! the escape character, every character that is unsafe inside a URL
//! fragment maps to `*` plus one letter, and everything else passes through
//! unchanged. Encoding and decoding are strict inverses for any input
//! string.

use serde_json::Value;

use super::{from_plain_filter_json, to_plain_filter_json, FilterConfig};
use crate::design::FilterDesign;
use crate::error::{Error, Result};

const ESCAPE: char = '*';

/// (plain character, escape letter) pairs. The table covers every character
/// serde_json emits that is reserved or unsafe in a URL fragment.
const SUBSTITUTIONS: [(char, char); 19] = [
    ('"', 'q'),
    ('[', 'b'),
    (']', 'e'),
    ('{', 'c'),
    ('}', 'd'),
    (',', 'm'),
    (':', 'n'),
    (' ', 's'),
    ('&', 'a'),
    ('#', 'h'),
    ('%', 'p'),
    ('=', 't'),
    ('+', 'u'),
    ('/', 'f'),
    ('\\', 'x'),
    ('?', 'w'),
    ('\'', 'y'),
    ('<', 'l'),
    ('>', 'g'),
];

/// Serialize a design forest to the URL-fragment-safe string form.
pub fn to_simple_filter_query_string(designs: &[FilterDesign]) -> Result<String> {
    let plain = to_plain_filter_json(designs);
    let text = serde_json::to_string(&plain)?;
    Ok(encode(&text))
}

/// Parse a string produced by [`to_simple_filter_query_string`]. Malformed
/// strings are hard errors; they indicate a corrupted or foreign share-link.
pub fn from_simple_filter_query_string(input: &str) -> Result<Vec<FilterConfig>> {
    let text = decode(input)?;
    let value: Value = serde_json::from_str(&text)?;
    let array = value
        .as_array()
        .ok_or_else(|| Error::malformed_filter_string("expected a top-level JSON array"))?;
    array.iter().map(from_plain_filter_json).collect()
}

fn encode(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch == ESCAPE {
            output.push(ESCAPE);
            output.push(ESCAPE);
        } else if let Some((_, letter)) = SUBSTITUTIONS.iter().find(|(plain, _)| *plain == ch) {
            output.push(ESCAPE);
            output.push(*letter);
        } else {
            output.push(ch);
        }
    }
    output
}

fn decode(input: &str) -> Result<String> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != ESCAPE {
            output.push(ch);
            continue;
        }
        let escaped = chars.next().ok_or_else(|| {
            Error::malformed_filter_string("dangling escape character at end of input")
        })?;
        if escaped == ESCAPE {
            output.push(ESCAPE);
        } else if let Some((plain, _)) = SUBSTITUTIONS.iter().find(|(_, letter)| *letter == escaped)
        {
            output.push(*plain);
        } else {
            return Err(Error::malformed_filter_string(format!(
                "unknown escape sequence '{}{}'",
                ESCAPE, escaped
            )));
        }
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_inverse_for_reserved_characters() {
        let input: String = SUBSTITUTIONS.iter().map(|(plain, _)| *plain).collect();
        let encoded = encode(&input);
        assert!(!encoded.contains('"'));
        assert!(!encoded.contains('['));
        assert_eq!(decode(&encoded).unwrap(), input);
    }

    #[test]
    fn test_encode_escapes_the_escape_character() {
        assert_eq!(encode("a*b"), "a**b");
        assert_eq!(decode("a**b").unwrap(), "a*b");
    }

    #[test]
    fn test_decode_rejects_dangling_escape() {
        assert!(decode("abc*").is_err());
    }

    #[test]
    fn test_decode_rejects_unknown_escape() {
        assert!(decode("*z").is_err());
    }

    #[test]
    fn test_encoded_json_is_fragment_safe() {
        let encoded = encode(r#"[["d.db.t.f","=","v","or"]]"#);
        for reserved in ['"', '[', ']', ',', ' ', '&', '#', '%', '='] {
            assert!(!encoded.contains(reserved));
        }
    }
}
