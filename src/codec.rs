//! Text-level codec shared by every extension kind.
//!
//! Config strings are handled in two stages: [`split_critical`] strips the
//! optional leading `critical` token, [`split_tokens`] turns the remainder
//! into trimmed tokens. Semantic validation of the tokens is left to the kind.

use crate::errors::{Error, Result};

/// Token that marks a config string as critical. Only recognized in first position.
pub const CRITICAL_TOKEN: &str = "critical";

/// Strip a leading `critical` token from a config string.
///
/// Returns the criticality and the remainder of the string.
pub fn split_critical(value: &str) -> (bool, &str) {
    let (first, rest) = value.split_once(',').unwrap_or((value, ""));

    if first.trim() == CRITICAL_TOKEN {
        (true, rest)
    } else {
        (false, value)
    }
}

/// Split a config string on commas into trimmed, non-empty tokens.
pub fn split_tokens(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Render bytes as colon-separated uppercase hex (`33:AB:00`).
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| hex::encode_upper([*b]))
        .collect::<Vec<_>>()
        .join(":")
}

/// Parse colon-separated (or plain) hex back into bytes.
pub fn hex_to_bytes(value: &str) -> Result<Vec<u8>> {
    let digits: String = value.trim().chars().filter(|c| *c != ':').collect();
    hex::decode(&digits).map_err(|_| Error::inconsistent(format!("Could not parse hex value: {value}")))
}

/// Parse `true`/`false` regardless of case and surrounding whitespace.
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_must_come_first() {
        assert_eq!(split_critical("critical,foobar"), (true, "foobar"));
        assert_eq!(split_critical("critical"), (true, ""));
        assert_eq!(split_critical("critical,"), (true, ""));
        assert_eq!(split_critical("foobar"), (false, "foobar"));
        assert_eq!(split_critical("foo,critical"), (false, "foo,critical"));
    }

    #[test]
    fn critical_is_case_sensitive() {
        assert_eq!(split_critical("Critical,foo"), (false, "Critical,foo"));
    }

    #[test]
    fn tokens_keep_order_and_duplicates() {
        assert_eq!(split_tokens(" foo, bar ,,foo"), ["foo", "bar", "foo"]);
        assert!(split_tokens("").is_empty());
    }

    #[test]
    fn hex() {
        assert_eq!(bytes_to_hex(b"333333"), "33:33:33:33:33:33");
        assert_eq!(bytes_to_hex(&[]), "");
        assert_eq!(hex_to_bytes("33:33:ab").unwrap(), [0x33, 0x33, 0xab]);
        assert_eq!(hex_to_bytes("3333").unwrap(), [0x33, 0x33]);
        assert!(hex_to_bytes("zz").is_err());
    }

    #[test]
    fn bools() {
        assert_eq!(parse_bool(" TRUE "), Some(true));
        assert_eq!(parse_bool("FAlse"), Some(false));
        assert_eq!(parse_bool("yes"), None);
    }
}
