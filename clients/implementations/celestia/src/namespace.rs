//! Conversion of user supplied hex strings into version 0 Celestia namespaces.

use celestia_types::nmt::Namespace;

/// Number of user-controlled bytes in a version 0 namespace id. The remaining
/// 18 bytes of the 28 byte id are zero.
pub const NAMESPACE_ID_V0_SIZE: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum NamespaceError {
    /// The input is not valid hex (odd length or a non-hex character).
    #[error("error decoding hex string {input:?}: {source}")]
    Decode {
        input: String,
        #[source]
        source: hex::FromHexError,
    },
    /// The input is valid hex but does not describe a version 0 namespace.
    #[error("invalid namespace {input:?}: {reason}")]
    Format { input: String, reason: String },
}

/// Parses `namespace_hex` as the 10 byte id of a version 0 namespace.
///
/// Hex digits are case-insensitive, so inputs that differ only in letter case spell the
/// same id and give the same namespace. Any two distinct ids give distinct namespaces.
/// The width must match exactly: shorter ids would be zero padded by the network, so
/// accepting them would let `"01"` and `"0001"` name the same namespace.
pub fn parse_namespace(namespace_hex: &str) -> Result<Namespace, NamespaceError> {
    let id = hex::decode(namespace_hex).map_err(|source| NamespaceError::Decode {
        input: namespace_hex.to_string(),
        source,
    })?;

    if id.len() != NAMESPACE_ID_V0_SIZE {
        return Err(NamespaceError::Format {
            input: namespace_hex.to_string(),
            reason: format!("expected {NAMESPACE_ID_V0_SIZE} bytes, got {}", id.len()),
        });
    }

    // Ids 0x00..=0xff are reserved for the network's own data and refused for blobs.
    if id[..NAMESPACE_ID_V0_SIZE - 1].iter().all(|b| *b == 0) {
        return Err(NamespaceError::Format {
            input: namespace_hex.to_string(),
            reason: "reserved namespace".to_string(),
        });
    }

    Namespace::new_v0(&id).map_err(|e| NamespaceError::Format {
        input: namespace_hex.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_hex_is_deterministic() {
        let first = parse_namespace("0102030405060708090a").unwrap();
        let second = parse_namespace("0102030405060708090a").unwrap();
        assert_eq!(first, second);

        let bytes = first.as_bytes();
        assert_eq!(bytes.len(), 29);
        assert_eq!(bytes[0], 0, "version byte");
        assert!(bytes[1..19].iter().all(|b| *b == 0), "v0 padding");
        assert_eq!(&bytes[19..], &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn upper_and_lower_case_agree() {
        assert_eq!(
            parse_namespace("ABCDEF0102030405060A").unwrap(),
            parse_namespace("abcdef0102030405060a").unwrap()
        );
    }

    #[test]
    fn distinct_ids_give_distinct_namespaces() {
        let a = parse_namespace("00000000000000000a0b").unwrap();
        let b = parse_namespace("0a0b0000000000000000").unwrap();
        assert_ne!(a, b);

        // Case folding is the only way two inputs meet.
        let mixed = parse_namespace("aBcDeF0102030405060A").unwrap();
        assert_eq!(mixed, parse_namespace("ABCDEF0102030405060a").unwrap());
    }

    #[test]
    fn odd_length_is_a_decode_error() {
        let err = parse_namespace("0102030405060708090").unwrap_err();
        assert!(matches!(
            err,
            NamespaceError::Decode {
                source: hex::FromHexError::OddLength,
                ..
            }
        ));
    }

    #[test]
    fn non_hex_character_is_a_decode_error() {
        let err = parse_namespace("01020304050607080g0a").unwrap_err();
        match err {
            NamespaceError::Decode { input, source } => {
                assert_eq!(input, "01020304050607080g0a");
                assert!(matches!(
                    source,
                    hex::FromHexError::InvalidHexCharacter { c: 'g', .. }
                ));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn wrong_width_is_a_format_error() {
        let too_long = "ff".repeat(29);
        for input in ["", "01", "0102030405", "0102030405060708090a0b", too_long.as_str()] {
            let err = parse_namespace(input).unwrap_err();
            assert!(
                matches!(err, NamespaceError::Format { .. }),
                "{input:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn reserved_namespaces_are_refused() {
        for input in ["00000000000000000000", "00000000000000000004", "000000000000000000ff"] {
            match parse_namespace(input).unwrap_err() {
                NamespaceError::Format { reason, .. } => assert_eq!(reason, "reserved namespace"),
                other => panic!("unexpected error: {other:?}"),
            }
        }
        parse_namespace("00000000000000000100").unwrap();
    }
}
