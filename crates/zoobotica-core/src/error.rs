//! Error types for Zoobotica operations.

use crate::types::TraitType;
use std::error::Error;
use std::fmt;

/// Result type for Zoobotica operations.
pub type Result<T> = std::result::Result<T, ZoobotError>;

/// Errors that can occur in the core crate and the layers above it.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoobotError {
    /// A drop onto a body part was rejected.
    Drop(DropError),
    /// Persisted state could not be read or written.
    Storage(StorageError),
    /// Configuration errors.
    Config(ConfigError),
    /// Robot data handed to the analyzer was unusable.
    InvalidRobotData(String),
    /// I/O errors (wrapped).
    Io(String),
    /// Serialization errors.
    Serialization(String),
}

impl fmt::Display for ZoobotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoobotError::Drop(e) => write!(f, "Drop rejected: {}", e),
            ZoobotError::Storage(e) => write!(f, "Storage error: {}", e),
            ZoobotError::Config(e) => write!(f, "Config error: {}", e),
            ZoobotError::InvalidRobotData(msg) => write!(f, "Invalid robot data: {}", msg),
            ZoobotError::Io(msg) => write!(f, "I/O error: {}", msg),
            ZoobotError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl Error for ZoobotError {}

impl From<std::io::Error> for ZoobotError {
    fn from(e: std::io::Error) -> Self {
        ZoobotError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for ZoobotError {
    fn from(e: serde_json::Error) -> Self {
        ZoobotError::Serialization(e.to_string())
    }
}

impl From<DropError> for ZoobotError {
    fn from(e: DropError) -> Self {
        ZoobotError::Drop(e)
    }
}

impl From<StorageError> for ZoobotError {
    fn from(e: StorageError) -> Self {
        ZoobotError::Storage(e)
    }
}

/// Why a drag payload was not accepted onto a slot.
#[derive(Debug, Clone, PartialEq)]
pub enum DropError {
    /// No slot with this id exists.
    UnknownSlot(String),
    /// Neither transfer format held a decodable payload.
    Undecodable,
    /// The payload's type tag does not match the slot.
    TypeMismatch { expected: TraitType, found: String },
}

impl DropError {
    /// Short machine-readable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            DropError::UnknownSlot(_) => "unknown_slot",
            DropError::Undecodable => "undecodable",
            DropError::TypeMismatch { .. } => "type_mismatch",
        }
    }
}

impl fmt::Display for DropError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropError::UnknownSlot(id) => write!(f, "No body part with id {}", id),
            DropError::Undecodable => write!(f, "Drag payload could not be decoded"),
            DropError::TypeMismatch { expected, found } => {
                write!(f, "Slot accepts {} traits, got '{}'", expected, found)
            }
        }
    }
}

impl Error for DropError {}

/// Persisted profile errors.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// File written by an incompatible version.
    VersionMismatch { expected: u32, found: u32 },
    /// File exists but is not valid JSON for its kind.
    Corrupt(String),
    /// Write failed.
    SaveFailed(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::VersionMismatch { expected, found } => {
                write!(f, "Version mismatch: expected {}, found {}", expected, found)
            }
            StorageError::Corrupt(msg) => write!(f, "Stored file corrupt: {}", msg),
            StorageError::SaveFailed(msg) => write!(f, "Save failed: {}", msg),
        }
    }
}

impl Error for StorageError {}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Invalid value.
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
    /// Config written for a different schema version.
    UnsupportedVersion(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue {
                field,
                value,
                reason,
            } => {
                write!(f, "Invalid value for {}: {} ({})", field, value, reason)
            }
            ConfigError::UnsupportedVersion(v) => write!(f, "Unsupported config version: {}", v),
        }
    }
}

impl Error for ConfigError {}

// Convenience constructors
impl ZoobotError {
    pub fn invalid_robot_data(msg: impl Into<String>) -> Self {
        ZoobotError::InvalidRobotData(msg.into())
    }

    pub fn invalid_config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ZoobotError::Config(ConfigError::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        })
    }
}
