//! Error types for host-boundary decoding

use thiserror::Error;

/// Errors that can occur when packing or unpacking a tag function id
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagFunctionError {
    /// Low byte of the id is not a known function kind
    #[error("Unknown tag function kind: {0}")]
    UnknownKind(u8),

    /// Payload does not fit in the 20 bits the host id reserves for it
    #[error("Tag function payload too large: {0} (max {})", crate::tag_function::PAYLOAD_MAX)]
    PayloadOverflow(u32),
}

/// Errors that can occur when reading persisted surface settings
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// Stored value is not a decimal integer
    #[error("Invalid number for setting {key}: {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}
