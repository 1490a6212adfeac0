use alloy_primitives::{Bytes, U256};

/// Errors produced while parsing a user supplied salt.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub(super) enum SaltError {
    #[error("salt is empty")]
    Empty,

    #[error("invalid hex salt {0:?}: {1}")]
    InvalidHex(String, hex::FromHexError),

    #[error("invalid decimal salt {0:?}: expected an unsigned integer below 2^256")]
    InvalidDecimal(String),
}

/// Parses a salt given on the command line.
///
/// `0x`-prefixed input is read as hex and returned as-is, an odd number of
/// digits gaining a leading zero nibble. Anything else must be a base-10
/// integer, which is returned as its 32-byte big-endian encoding. Padding
/// shorter hex salts to 32 bytes is left to the predictor, so that an
/// oversized salt is reported there as a length error.
pub(super) fn parse(input: &str) -> Result<Bytes, SaltError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(SaltError::Empty);
    }

    if let Some(digits) = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        let decoded = if digits.len() % 2 == 1 {
            hex::decode(format!("0{digits}"))
        } else {
            hex::decode(digits)
        };
        return decoded
            .map(Bytes::from)
            .map_err(|err| SaltError::InvalidHex(input.to_owned(), err));
    }

    if !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SaltError::InvalidDecimal(input.to_owned()));
    }
    U256::from_str_radix(input, 10)
        .map(|value| Bytes::copy_from_slice(&value.to_be_bytes::<32>()))
        .map_err(|_| SaltError::InvalidDecimal(input.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_salt() {
        let salt = parse("12345").unwrap();
        assert_eq!(salt.len(), 32);
        assert_eq!(salt[..30], [0u8; 30]);
        assert_eq!(salt[30..], [0x30, 0x39]);

        assert_eq!(parse("0").unwrap()[..], [0u8; 32]);
        assert_eq!(parse("  7 \n").unwrap()[31], 7);
    }

    #[test]
    fn test_decimal_bounds() {
        let max = U256::MAX.to_string();
        assert_eq!(parse(&max).unwrap()[..], [0xffu8; 32]);

        // 2^256
        let overflow =
            "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        assert!(matches!(parse(overflow), Err(SaltError::InvalidDecimal(_))));
    }

    #[test]
    fn test_hex_salt() {
        assert_eq!(parse("0xcafe").unwrap()[..], [0xca, 0xfe]);
        assert_eq!(parse("0XCAFE").unwrap()[..], [0xca, 0xfe]);
        assert_eq!(parse("0xabc").unwrap()[..], [0x0a, 0xbc]);
        assert!(parse("0x").unwrap().is_empty());

        let long = format!("0x{}", "11".repeat(33));
        assert_eq!(parse(&long).unwrap().len(), 33);
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse(""), Err(SaltError::Empty));
        assert_eq!(parse("   "), Err(SaltError::Empty));
        assert!(matches!(parse("0xzz"), Err(SaltError::InvalidHex(..))));
        assert!(matches!(parse("-1"), Err(SaltError::InvalidDecimal(_))));
        assert!(matches!(parse("12ab"), Err(SaltError::InvalidDecimal(_))));
        assert!(matches!(parse("+5"), Err(SaltError::InvalidDecimal(_))));
    }
}
