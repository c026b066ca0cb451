//! Key encoding for document-store paths.
//!
//! Path segments may not contain `.`, `$`, `#`, `[`, `]` or `/`. Dots are common
//! in emails, so they map to `,`; the other reserved characters, `,`, `%` and
//! control characters are percent-encoded. The mapping is reversible.

const RESERVED: &[char] = &['$', '#', '[', ']', '/', '%', ','];

/// Encodes an email or item id into a single safe path segment.
pub fn encode_key(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == '.' {
            encoded.push(',');
        } else if RESERVED.contains(&c) || c.is_ascii_control() {
            encoded.push_str(&format!("%{:02X}", c as u32));
        } else {
            encoded.push(c);
        }
    }
    encoded
}

/// Reverses `encode_key`. Returns `None` for malformed escapes.
pub fn decode_key(encoded: &str) -> Option<String> {
    let bytes = encoded.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut index = 0;

    while index < bytes.len() {
        match bytes[index] {
            b',' => {
                decoded.push(b'.');
                index += 1;
            }
            b'%' => {
                let hex = encoded.get(index + 1..index + 3)?;
                decoded.push(u8::from_str_radix(hex, 16).ok()?);
                index += 3;
            }
            other => {
                decoded.push(other);
                index += 1;
            }
        }
    }

    String::from_utf8(decoded).ok()
}

#[cfg(test)]
mod tests {
    use super::{decode_key, encode_key};

    #[test]
    fn encodes_dots_and_reserved_characters() {
        assert_eq!(encode_key("ada.l@example.com"), "ada,l@example,com");
        assert_eq!(encode_key("a/b#c"), "a%2Fb%23c");
        assert_eq!(encode_key("x,y"), "x%2Cy");
    }

    #[test]
    fn decode_reverses_encode() {
        for raw in ["ada.l@example.com", "lip/stick #1", "100%,done", "crème"] {
            assert_eq!(decode_key(&encode_key(raw)).as_deref(), Some(raw));
        }
    }

    #[test]
    fn decode_rejects_truncated_escape() {
        assert_eq!(decode_key("abc%2"), None);
    }
}
