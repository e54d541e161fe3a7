//! Textual encodings used on the wire: hex addresses, Move names, base64 and base58.

use crate::error::ParseError;
use fastcrypto::encoding::{Base58, Encoding};
use move_core_types::account_address::AccountAddress;
use move_core_types::identifier::Identifier;
use move_core_types::language_storage::TypeTag;
use std::str::FromStr;

// =============================================================================
// Addresses and Move names
// =============================================================================

/// Parse a `0x`-prefixed hex string (short forms are left-padded) into an
/// address, naming `context` in the error.
///
/// ```
/// use sui_ptb_types::encoding::parse_address;
///
/// let framework = parse_address("0x2", "package").unwrap();
/// assert_eq!(framework, sui_ptb_types::framework::SUI_FRAMEWORK);
/// assert!(parse_address("2", "package").is_err());
/// ```
pub fn parse_address(hex_str: &str, context: &'static str) -> Result<AccountAddress, ParseError> {
    AccountAddress::from_hex_literal(hex_str).map_err(|e| ParseError::InvalidAddress {
        context,
        value: hex_str.to_string(),
        reason: e.to_string(),
    })
}

/// Like [`parse_address`], after trimming whitespace and one pair of
/// surrounding double quotes (JSON-quoted input).
pub fn parse_address_lenient(
    input: &str,
    context: &'static str,
) -> Result<AccountAddress, ParseError> {
    let trimmed = input.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    parse_address(unquoted.trim(), context)
}

/// Full 66-character form (0x + 64 hex chars).
pub fn format_address(addr: &AccountAddress) -> String {
    format!("0x{}", hex::encode(addr.as_ref()))
}

pub fn parse_identifier(name: &str) -> Result<Identifier, ParseError> {
    Identifier::new(name).map_err(|_| ParseError::InvalidIdentifier {
        value: name.to_string(),
    })
}

/// Parse a Move type such as `u64`, `vector<u8>` or `0x2::sui::SUI`.
pub fn parse_type_tag(type_str: &str) -> Result<TypeTag, ParseError> {
    TypeTag::from_str(type_str.trim()).map_err(|e| ParseError::InvalidTypeTag {
        value: type_str.to_string(),
        reason: e.to_string(),
    })
}

// =============================================================================
// Base64 / Base58
// =============================================================================

/// Standard (padded) base64.
pub fn base64_encode(bytes: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

pub fn base64_decode(b64: &str) -> Result<Vec<u8>, base64::DecodeError> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.decode(b64.trim())
}

pub fn base58_encode(bytes: &[u8]) -> String {
    Base58::encode(bytes)
}

/// Decode base58 into exactly 32 bytes.
pub fn base58_decode_32(value: &str) -> Result<[u8; 32], ParseError> {
    let bytes = Base58::decode(value).map_err(|e| ParseError::InvalidDigest {
        value: value.to_string(),
        reason: e.to_string(),
    })?;
    <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| ParseError::InvalidDigest {
        value: value.to_string(),
        reason: format!("expected 32 bytes, got {}", bytes.len()),
    })
}
