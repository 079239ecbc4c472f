//! Transport encoding of chunk bytes.
//!
//! Chunks travel as standard-alphabet base64. Decoding is lenient: padding
//! may be present or absent, non-zero trailing bits are tolerated, and ASCII
//! whitespace (line breaks from MIME-style encoders) is ignored.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use bytes::Bytes;

use crate::error::{ServerError, ServerResult};

const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

const CANONICAL: GeneralPurpose = base64::engine::general_purpose::STANDARD;

/// Decode one base64 chunk. `index` is only used in the error message.
pub fn decode_chunk(index: usize, encoded: &str) -> ServerResult<Bytes> {
    let compact: String;
    let input = if encoded.bytes().any(|b| b.is_ascii_whitespace()) {
        compact = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        compact.as_str()
    } else {
        encoded
    };
    LENIENT
        .decode(input)
        .map(Bytes::from)
        .map_err(|e| ServerError::Decode { index, reason: e.to_string() })
}

/// Decode every chunk of a request, failing on the first bad one.
pub fn decode_chunks(encoded: &[String]) -> ServerResult<Vec<Bytes>> {
    encoded
        .iter()
        .enumerate()
        .map(|(i, s)| decode_chunk(i, s))
        .collect()
}

/// Padded standard base64.
pub fn encode_chunk(data: &[u8]) -> String {
    CANONICAL.encode(data)
}
