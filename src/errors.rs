//! Error types.

use const_oid::ObjectIdentifier;
use thiserror::Error;

/// Alias for [`core::result::Result`] with the `x509-extensions` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum Error {
    /// Input matches none of the representations a kind accepts.
    #[error("Value is of unsupported type {type_name}")]
    UnsupportedInputType {
        /// Name of the type that was passed.
        type_name: &'static str,
    },

    /// A `critical` flag that cannot be read as a boolean.
    #[error("{value}: Invalid critical value passed")]
    InvalidCritical {
        /// Rendering of the offending value.
        value: String,
    },

    /// Tokens outside of a kind's vocabulary, sorted.
    #[error("Unknown value(s): {}", .values.join(", "))]
    UnknownValues {
        /// Every invalid token, sorted ascending.
        values: Vec<String>,
    },

    /// A value violating a cross-field invariant, or text that does not parse.
    #[error("{0}")]
    InconsistentValue(String),

    /// Operation that only concrete extension kinds can perform.
    #[error("{kind} does not support {operation}")]
    NotImplemented {
        /// Kind the operation was invoked on.
        kind: &'static str,
        /// Name of the operation.
        operation: &'static str,
    },

    /// Kind must always be critical but was given a non-critical flag.
    #[error("{kind} must always be marked as critical")]
    CriticalityPolicy {
        /// Kind that enforces the policy.
        kind: &'static str,
    },

    /// Wire extension bound to another OID than the requested kind.
    #[error("{kind} expects extension {expected}, got {actual}")]
    OidMismatch {
        /// Kind that was requested.
        kind: &'static str,
        /// OID bound to that kind.
        expected: ObjectIdentifier,
        /// OID of the wire extension.
        actual: ObjectIdentifier,
    },

    /// Text that is not a valid general name.
    #[error("Could not parse name: {0}")]
    InvalidGeneralName(String),

    /// List index past the end of the stored sequence.
    #[error("index {index} out of range for {len} elements")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Length of the sequence.
        len: usize,
    },

    /// Item requested for removal is not stored.
    #[error("{0} is not in the extension")]
    ItemNotFound(String),

    /// ASN.1 encoding or decoding error.
    #[error(transparent)]
    Asn1(#[from] der::Error),
}

impl Error {
    pub(crate) fn inconsistent(msg: impl Into<String>) -> Self {
        Error::InconsistentValue(msg.into())
    }

    pub(crate) fn unknown_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values: Vec<String> = values.into_iter().map(Into::into).collect();
        values.sort();
        values.dedup();
        Error::UnknownValues { values }
    }
}
