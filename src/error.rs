//! Error taxonomy for building, costing, signing and submitting transactions.
//!
//! Every fallible operation in this crate returns [`Result`]. The variant of
//! [`Error`] names the stage that failed; [`Error::kind`] flattens it for
//! callers that only branch on the category.

use crate::builder::ArgumentId;
use std::fmt;
use sui_ptb_types::{ParseError, SignatureScheme};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed caller input; nothing was recorded.
    Validation(ValidationError),
    /// An operation was issued in the wrong lifecycle state.
    State(StateError),
    /// Serialization of the transaction failed.
    Encoding {
        operation: &'static str,
        message: String,
    },
    /// The dry run executed and reported failure.
    Simulation {
        /// Error string reported by the ledger
        error: String,
    },
    Signature(SignatureError),
    /// Transport or server failure from a remote collaborator.
    Rpc {
        operation: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    State,
    Encoding,
    Simulation,
    Signature,
    Rpc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Bad address, digest, identifier or type tag.
    Malformed(ParseError),
    /// Owned, immutable and receiving inputs need a digest.
    MissingDigest { object_id: String },
    /// The ledger reported an owner that cannot supply a transaction input.
    UnusableOwner {
        object_id: String,
        owner: &'static str,
    },
    /// A command was given an empty operand list.
    EmptyArguments {
        command: &'static str,
        field: &'static str,
    },
    /// The ID was never allocated by this builder.
    UnknownArgument { id: ArgumentId },
    /// The ID was allocated by a different builder.
    ForeignArgument { id: ArgumentId },
    /// A Move call slot must be exactly one of an argument or pure bytes.
    AmbiguousCallArgument { index: usize, supplied: &'static str },
    /// Nested results can only address command results.
    NotACommandResult { id: ArgumentId },
    LimitExceeded { what: &'static str, limit: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    MissingSender,
    MissingGasObject,
    MissingGasBudget,
    MissingGasPrice,
    NoCommands,
    /// A pipeline step was called out of order.
    UnexpectedStage {
        operation: &'static str,
        stage: &'static str,
    },
    /// A pipeline step was called after an earlier step failed.
    Aborted { operation: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    InvalidLength { expected: usize, actual: usize },
    UnsupportedScheme(u8),
    /// Key material could not be decoded.
    InvalidKey(String),
    /// The signature field was not valid base64.
    InvalidEncoding(String),
    /// Local verification is only available for Ed25519.
    VerificationUnsupported(SignatureScheme),
    VerificationFailed(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::State(_) => ErrorKind::State,
            Error::Encoding { .. } => ErrorKind::Encoding,
            Error::Simulation { .. } => ErrorKind::Simulation,
            Error::Signature(_) => ErrorKind::Signature,
            Error::Rpc { .. } => ErrorKind::Rpc,
        }
    }

    pub(crate) fn encoding(operation: &'static str, err: impl fmt::Display) -> Self {
        Error::Encoding {
            operation,
            message: err.to_string(),
        }
    }

    /// Keeps the whole `anyhow` context chain in the message.
    pub(crate) fn rpc(operation: &'static str, err: anyhow::Error) -> Self {
        Error::Rpc {
            operation,
            message: format!("{:#}", err),
        }
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::Validation(err)
    }
}

impl From<StateError> for Error {
    fn from(err: StateError) -> Self {
        Error::State(err)
    }
}

impl From<SignatureError> for Error {
    fn from(err: SignatureError) -> Self {
        Error::Signature(err)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::InvalidSignatureLength { expected, actual } => {
                Error::Signature(SignatureError::InvalidLength { expected, actual })
            }
            ParseError::UnknownSignatureFlag(flag) => {
                Error::Signature(SignatureError::UnsupportedScheme(flag))
            }
            other => Error::Validation(ValidationError::Malformed(other)),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Validation(err) => write!(f, "validation error: {}", err),
            Error::State(err) => write!(f, "state error: {}", err),
            Error::Encoding { operation, message } => {
                write!(f, "encoding error in {}: {}", operation, message)
            }
            Error::Simulation { error } => write!(f, "simulation failed: {}", error),
            Error::Signature(err) => write!(f, "signature error: {}", err),
            Error::Rpc { operation, message } => {
                write!(f, "rpc error in {}: {}", operation, message)
            }
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Malformed(err) => write!(f, "{}", err),
            ValidationError::MissingDigest { object_id } => {
                write!(f, "object {} needs a digest for this input kind", object_id)
            }
            ValidationError::UnusableOwner { object_id, owner } => {
                write!(f, "object {} has owner {} and cannot be an input", object_id, owner)
            }
            ValidationError::EmptyArguments { command, field } => {
                write!(f, "{} requires at least one entry in '{}'", command, field)
            }
            ValidationError::UnknownArgument { id } => {
                write!(f, "argument {} was never allocated", id)
            }
            ValidationError::ForeignArgument { id } => {
                write!(f, "argument {} belongs to another builder", id)
            }
            ValidationError::AmbiguousCallArgument { index, supplied } => write!(
                f,
                "move call argument {} must be either an argument or pure bytes, got {}",
                index, supplied
            ),
            ValidationError::NotACommandResult { id } => {
                write!(f, "argument {} is not a command result", id)
            }
            ValidationError::LimitExceeded { what, limit } => {
                write!(f, "too many {} (limit {})", what, limit)
            }
        }
    }
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::MissingSender => write!(f, "sender is not set"),
            StateError::MissingGasObject => write!(f, "no gas object was added"),
            StateError::MissingGasBudget => write!(f, "gas budget is not set"),
            StateError::MissingGasPrice => write!(f, "gas price is not set"),
            StateError::NoCommands => write!(f, "transaction has no commands"),
            StateError::UnexpectedStage { operation, stage } => {
                write!(f, "{} cannot run in stage {}", operation, stage)
            }
            StateError::Aborted { operation } => {
                write!(f, "{} called on an aborted pipeline", operation)
            }
        }
    }
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureError::InvalidLength { expected, actual } => write!(
                f,
                "serialized signature must be {} bytes, got {}",
                expected, actual
            ),
            SignatureError::UnsupportedScheme(flag) => {
                write!(f, "unsupported signature scheme flag 0x{:02x}", flag)
            }
            SignatureError::InvalidKey(msg) => write!(f, "invalid key: {}", msg),
            SignatureError::InvalidEncoding(msg) => {
                write!(f, "invalid signature encoding: {}", msg)
            }
            SignatureError::VerificationUnsupported(scheme) => {
                write!(f, "local verification is not available for {}", scheme)
            }
            SignatureError::VerificationFailed(msg) => {
                write!(f, "signature verification failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Validation(ValidationError::Malformed(err)) => Some(err),
            _ => None,
        }
    }
}

impl std::error::Error for ValidationError {}
impl std::error::Error for StateError {}
impl std::error::Error for SignatureError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_errors_map_to_kinds() {
        let err: Error = ParseError::UnknownSignatureFlag(9).into();
        assert_eq!(err.kind(), ErrorKind::Signature);

        let err: Error = ParseError::InvalidSignatureLength {
            expected: 97,
            actual: 3,
        }
        .into();
        assert_eq!(
            err,
            Error::Signature(SignatureError::InvalidLength {
                expected: 97,
                actual: 3
            })
        );

        let err: Error = ParseError::InvalidIdentifier {
            value: "9x".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_rpc_keeps_context_chain() {
        let inner = anyhow::anyhow!("connection refused").context("sui_getObject request failed");
        let err = Error::rpc("get_object", inner);
        let text = err.to_string();
        assert!(text.contains("sui_getObject request failed"));
        assert!(text.contains("connection refused"));
    }

    #[test]
    fn test_display_is_actionable() {
        let err = Error::from(ValidationError::EmptyArguments {
            command: "SplitCoins",
            field: "amounts",
        });
        assert_eq!(
            err.to_string(),
            "validation error: SplitCoins requires at least one entry in 'amounts'"
        );
        assert_eq!(
            Error::from(StateError::MissingSender).to_string(),
            "state error: sender is not set"
        );
    }
}
