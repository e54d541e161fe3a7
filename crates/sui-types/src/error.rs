//! Parse failures for the wire types in this crate.
//!
//! The builder crate maps these onto its own validation and signature errors,
//! so every variant keeps the offending input for the message.

use std::fmt;

/// Failure to parse a wire value from its textual or byte form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Not a `0x`-prefixed hex address of at most 32 bytes.
    InvalidAddress {
        context: &'static str,
        value: String,
        reason: String,
    },
    /// Not a base58 string decoding to exactly 32 bytes.
    InvalidDigest { value: String, reason: String },
    /// Not a valid Move identifier.
    InvalidIdentifier { value: String },
    /// Not a parseable Move type.
    InvalidTypeTag { value: String, reason: String },
    /// Serialized signature with the wrong total length.
    InvalidSignatureLength { expected: usize, actual: usize },
    /// Serialized signature whose first byte is not a known scheme flag.
    UnknownSignatureFlag(u8),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidAddress {
                context,
                value,
                reason,
            } => write!(f, "invalid {} '{}': {}", context, value, reason),
            ParseError::InvalidDigest { value, reason } => {
                write!(f, "invalid digest '{}': {}", value, reason)
            }
            ParseError::InvalidIdentifier { value } => {
                write!(f, "invalid Move identifier '{}'", value)
            }
            ParseError::InvalidTypeTag { value, reason } => {
                write!(f, "invalid type tag '{}': {}", value, reason)
            }
            ParseError::InvalidSignatureLength { expected, actual } => write!(
                f,
                "serialized signature must be {} bytes, got {}",
                expected, actual
            ),
            ParseError::UnknownSignatureFlag(flag) => {
                write!(f, "unknown signature scheme flag 0x{:02x}", flag)
            }
        }
    }
}

impl std::error::Error for ParseError {}
