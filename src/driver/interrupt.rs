//! Interrupt status handling for the transmit DMA stream.
//!
//! This module provides the [`InterruptStatus`] structure for parsing
//! a stream's interrupt flags and deciding what the completion handler
//! must do with them.

use crate::driver::error::Fault;
use crate::internal::register::dma::{FLAG_DMEIF, FLAG_FEIF, FLAG_HTIF, FLAG_TCIF, FLAG_TEIF};

// =============================================================================
// Interrupt Status
// =============================================================================

/// Interrupt flags of one DMA stream.
///
/// The raw representation is stream-normalized: bit 0 is the stream's FIFO
/// error flag regardless of where the controller packs the group.
///
/// # Example
///
/// ```ignore
/// let status = stream.status();
/// if let Some(fault) = status.fault() {
///     H::halt(fault);
/// }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptStatus {
    /// Transfer complete - the programmed run has been sent
    pub transfer_complete: bool,
    /// Half transfer - half of the programmed run has been sent
    pub half_transfer: bool,
    /// Transfer error - bus error on source or destination
    pub transfer_error: bool,
    /// Direct mode error
    pub direct_mode_error: bool,
    /// FIFO error - overrun or underrun
    pub fifo_error: bool,
}

impl InterruptStatus {
    /// Flags acknowledged when a transfer completes
    pub const COMPLETION: Self = Self {
        transfer_complete: true,
        half_transfer: true,
        transfer_error: false,
        direct_mode_error: false,
        fifo_error: false,
    };

    /// Create from stream-normalized flag bits
    #[inline]
    pub fn from_raw(flags: u32) -> Self {
        Self {
            transfer_complete: (flags & FLAG_TCIF) != 0,
            half_transfer: (flags & FLAG_HTIF) != 0,
            transfer_error: (flags & FLAG_TEIF) != 0,
            direct_mode_error: (flags & FLAG_DMEIF) != 0,
            fifo_error: (flags & FLAG_FEIF) != 0,
        }
    }

    /// Convert to stream-normalized bits for clearing (write-1-to-clear)
    #[inline]
    pub fn to_raw(&self) -> u32 {
        let mut val = 0u32;
        if self.transfer_complete {
            val |= FLAG_TCIF;
        }
        if self.half_transfer {
            val |= FLAG_HTIF;
        }
        if self.transfer_error {
            val |= FLAG_TEIF;
        }
        if self.direct_mode_error {
            val |= FLAG_DMEIF;
        }
        if self.fifo_error {
            val |= FLAG_FEIF;
        }
        val
    }

    /// Check if any error flag is set
    #[inline]
    pub fn has_error(&self) -> bool {
        self.transfer_error || self.direct_mode_error || self.fifo_error
    }

    /// The fault reported by the error flags, if any
    ///
    /// Transfer errors take precedence over direct mode errors, which take
    /// precedence over FIFO errors.
    #[inline]
    pub fn fault(&self) -> Option<Fault> {
        if self.transfer_error {
            Some(Fault::TransferError)
        } else if self.direct_mode_error {
            Some(Fault::DirectModeError)
        } else if self.fifo_error {
            Some(Fault::FifoError)
        } else {
            None
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
