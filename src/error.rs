//! Standalone error types for memsim
//!
//! Uses thiserror for clean, idiomatic Rust error definitions.

use thiserror::Error;

#[cfg(feature = "logging")]
use tracing::debug;

/// Errors produced by the simulated heap
#[must_use = "errors should be handled"]
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// No free block satisfies the request. Recoverable: the caller may
    /// retry after freeing.
    #[error("out of memory: requested {requested} bytes, {available} free")]
    OutOfMemory { requested: usize, available: usize },

    /// No block starts at the given address, or the block there is not
    /// allocated. Indicates a caller error: double free, bad pointer, or
    /// free-after-reinitialize.
    #[error("invalid address: no allocated block at offset {address}")]
    InvalidAddress { address: usize },

    /// Rejected before any mutation: zero request size, unknown strategy
    /// name, and similar.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },
}

impl MemoryError {
    /// Check if the error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::OutOfMemory { .. })
    }

    /// Get error code for categorization
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::OutOfMemory { .. } => "SIM:ALLOC:OOM",
            Self::InvalidAddress { .. } => "SIM:ADDR:INVALID",
            Self::InvalidArgument { .. } => "SIM:ARG:INVALID",
        }
    }

    /// Create an out-of-memory error
    pub fn out_of_memory(requested: usize, available: usize) -> Self {
        #[cfg(feature = "logging")]
        debug!(requested, available, "allocation request cannot be satisfied");

        Self::OutOfMemory {
            requested,
            available,
        }
    }

    /// Create an invalid address error
    #[must_use]
    pub fn invalid_address(address: usize) -> Self {
        Self::InvalidAddress { address }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

/// Result type for simulator operations
pub type MemoryResult<T> = core::result::Result<T, MemoryError>;

/// Generic result type alias
pub type Result<T> = MemoryResult<T>;
