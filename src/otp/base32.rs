//! RFC 4648 base32 codec for OTP secrets.
//!
//! Decoding is narrow: only the uppercase alphabet `A-Z2-7`
//! is accepted, trailing `=` padding is stripped, and bits that do not
//! complete a full byte are discarded.

use ::base32::Alphabet;
use thiserror::Error;

/// Error returned when a secret contains a symbol outside the alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid base32 symbol {symbol:?} at position {position}")]
pub struct Base32DecodeError {
    /// The offending character.
    pub symbol: char,
    /// Character index of the symbol in the unpadded input.
    pub position: usize,
}

fn is_symbol(symbol: char) -> bool {
    matches!(symbol, 'A'..='Z' | '2'..='7')
}

/// Decodes a base32 string into bytes.
pub fn decode(input: &str) -> Result<Vec<u8>, Base32DecodeError> {
    let clean = input.trim_end_matches('=');
    if let Some((position, symbol)) = clean.chars().enumerate().find(|(_, c)| !is_symbol(*c)) {
        return Err(Base32DecodeError { symbol, position });
    }

    ::base32::decode(Alphabet::Rfc4648 { padding: false }, clean).ok_or_else(|| {
        // Unreachable once every symbol is in the alphabet.
        let symbol = clean.chars().last().unwrap_or('=');
        Base32DecodeError {
            symbol,
            position: clean.chars().count().saturating_sub(1),
        }
    })
}

/// Encodes bytes as canonical, `=`-padded base32.
pub fn encode(data: &[u8]) -> String {
    ::base32::encode(Alphabet::Rfc4648 { padding: true }, data)
}
