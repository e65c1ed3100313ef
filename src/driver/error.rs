//! Error types for the USART DMA transmit driver
//!
//! Errors are organized by severity:
//! - [`ConfigError`]: Setup failures, returned to the caller
//! - [`Fault`]: Broken driver invariants and hardware-reported transfer
//!   errors. These are never retried; the plain driver entry points route
//!   them to the [`Halt`](crate::hal::Halt) primitive.
//!
//! A full transmit buffer is not an error. It is reported through the
//! accepted byte count returned by `write`.

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration and setup errors
///
/// These errors occur while programming the transfer engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Driver already initialized
    AlreadyInitialized,
    /// DMA request channel out of range (must be 0-7)
    InvalidChannel,
    /// Stream stop timeout must be non-zero
    InvalidTimeout,
    /// Stream enable bit did not clear within the stop timeout
    StreamBusy,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::AlreadyInitialized => "already initialized",
            ConfigError::InvalidChannel => "invalid DMA channel",
            ConfigError::InvalidTimeout => "invalid stream stop timeout",
            ConfigError::StreamBusy => "DMA stream did not stop",
        }
    }
}

// =============================================================================
// Faults
// =============================================================================

/// Unrecoverable driver faults
///
/// A fault means either the atomicity contract between the writer and the
/// completion handler was broken, or the transfer engine reported an error
/// that points at a configuration or wiring problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    /// A transfer was scheduled while the stream was still enabled
    TransferActive,
    /// Stream reported a transfer error (bus error on source or destination)
    TransferError,
    /// Stream reported a direct mode error
    DirectModeError,
    /// Stream reported a FIFO overrun/underrun
    FifoError,
    /// Completion handler ran without a transfer-complete flag set
    UnexpectedInterrupt,
    /// Data was enqueued before the driver was set up
    NotInitialized,
}

impl core::fmt::Display for Fault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Fault {
    /// Returns a human-readable description of the fault
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Fault::TransferActive => "transfer scheduled while stream active",
            Fault::TransferError => "DMA transfer error",
            Fault::DirectModeError => "DMA direct mode error",
            Fault::FifoError => "DMA FIFO error",
            Fault::UnexpectedInterrupt => "unexpected DMA interrupt",
            Fault::NotInitialized => "driver not initialized",
        }
    }

    /// Whether the fault was reported by the hardware rather than detected
    /// by the driver's own invariant checks
    #[must_use]
    pub const fn is_hardware(&self) -> bool {
        matches!(
            self,
            Fault::TransferError | Fault::DirectModeError | Fault::FifoError
        )
    }
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for operations that can hit a fault
pub type FaultResult<T> = core::result::Result<T, Fault>;

// =============================================================================
// Unit Tests
// =============================================================================
