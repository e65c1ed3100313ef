//! Testing utilities and mock implementations
//!
//! Host-side stand-ins for the transfer engine and delay provider so the
//! driver can be exercised without hardware.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]

extern crate alloc;

use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use embedded_hal::delay::DelayNs;

use crate::driver::config::TxConfig;
use crate::driver::error::{ConfigError, ConfigResult};
use crate::driver::interrupt::InterruptStatus;
use crate::hal::{InterruptLine, TxStream};
use crate::internal::constants::{MAX_DMA_TRANSFER, STREAM_STOP_POLL_US};
use crate::internal::register::dma::{FLAG_HTIF, FLAG_TCIF};

// =============================================================================
// Mock Stream
// =============================================================================

/// One transfer handed to the mock stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub source: *const u8,
    pub len: usize,
}

/// Simulated DMA stream feeding a simulated USART data register
///
/// Starting a transfer only records it. [`complete`](Self::complete) plays
/// the role of the hardware: it copies the programmed run into the
/// `emitted` log, disables the stream and raises the completion flags.
///
/// Like an NVIC line after reset, the mock interrupt line starts masked.
///
/// # Example
///
/// ```ignore
/// let tx: UsartTx<MockStream, PanicHalt, 16> = UsartTx::new(MockStream::new());
/// tx.init(&TxConfig::new(), &mut MockDelay::new()).unwrap();
/// tx.write(b"hi");
///
/// tx.stream().complete();
/// tx.on_interrupt();
/// assert_eq!(tx.stream().emitted(), b"hi");
/// ```
#[derive(Debug)]
pub struct MockStream {
    max_transfer: usize,
    enabled: Cell<bool>,
    /// Stream-normalized interrupt flags
    flags: Cell<u32>,
    masked: Cell<bool>,
    mask_calls: Cell<usize>,
    unmask_calls: Cell<usize>,
    stuck: Cell<bool>,
    configured: Cell<Option<TxConfig>>,
    transfers: RefCell<Vec<Transfer>>,
    emitted: RefCell<Vec<u8>>,
    overlapping_starts: Cell<usize>,
}

impl MockStream {
    /// Create a mock with the real engine's transfer limit
    pub fn new() -> Self {
        Self::with_max_transfer(MAX_DMA_TRANSFER)
    }

    /// Create a mock that moves at most `max_transfer` bytes per transfer
    pub fn with_max_transfer(max_transfer: usize) -> Self {
        Self {
            max_transfer,
            enabled: Cell::new(false),
            flags: Cell::new(0),
            masked: Cell::new(true),
            mask_calls: Cell::new(0),
            unmask_calls: Cell::new(0),
            stuck: Cell::new(false),
            configured: Cell::new(None),
            transfers: RefCell::new(Vec::new()),
            emitted: RefCell::new(Vec::new()),
            overlapping_starts: Cell::new(0),
        }
    }

    /// Finish the running transfer
    ///
    /// Panics if no transfer is running.
    pub fn complete(&self) {
        assert!(self.enabled.get(), "no transfer running");
        let Some(last) = self.transfers.borrow().last().copied() else {
            panic!("stream enabled without a transfer");
        };

        // SAFETY: the driver keeps the run valid until the completion
        // interrupt has been handled.
        let bytes = unsafe { core::slice::from_raw_parts(last.source, last.len) };
        self.emitted.borrow_mut().extend_from_slice(bytes);

        self.enabled.set(false);
        self.flags.set(self.flags.get() | FLAG_TCIF | FLAG_HTIF);
    }

    /// Raise stream-normalized interrupt flags
    pub fn inject(&self, flags: u32) {
        self.flags.set(self.flags.get() | flags);
    }

    /// Make `configure` time out as if the stream never stopped
    pub fn set_stuck(&self, stuck: bool) {
        self.stuck.set(stuck);
    }

    pub fn is_masked(&self) -> bool {
        self.masked.get()
    }

    /// Number of `mask` calls since creation
    pub fn mask_calls(&self) -> usize {
        self.mask_calls.get()
    }

    /// Number of `unmask` calls since creation
    pub fn unmask_calls(&self) -> usize {
        self.unmask_calls.get()
    }

    /// Configuration applied by the last successful `configure`
    pub fn configured(&self) -> Option<TxConfig> {
        self.configured.get()
    }

    pub fn transfers(&self) -> Vec<Transfer> {
        self.transfers.borrow().clone()
    }

    /// Lengths of all started transfers, in order
    pub fn transfer_lens(&self) -> Vec<usize> {
        self.transfers.borrow().iter().map(|t| t.len).collect()
    }

    /// Every byte written to the simulated data register, in order
    pub fn emitted(&self) -> Vec<u8> {
        self.emitted.borrow().clone()
    }

    /// Number of transfers started while another was running
    pub fn overlapping_starts(&self) -> usize {
        self.overlapping_starts.get()
    }
}

impl Default for MockStream {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptLine for MockStream {
    fn mask(&self) -> bool {
        self.mask_calls.set(self.mask_calls.get() + 1);
        !self.masked.replace(true)
    }

    fn unmask(&self) {
        self.unmask_calls.set(self.unmask_calls.get() + 1);
        self.masked.set(false);
    }
}

impl TxStream for MockStream {
    fn max_transfer(&self) -> usize {
        self.max_transfer
    }

    fn configure<D: DelayNs>(&self, config: &TxConfig, delay: &mut D) -> ConfigResult<()> {
        if self.stuck.get() {
            for _ in 0..config.stop_timeout_us.div_ceil(STREAM_STOP_POLL_US) {
                delay.delay_us(STREAM_STOP_POLL_US);
            }
            return Err(ConfigError::StreamBusy);
        }

        self.enabled.set(false);
        self.flags.set(0);
        self.configured.set(Some(*config));
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    fn status(&self) -> InterruptStatus {
        InterruptStatus::from_raw(self.flags.get())
    }

    fn clear_status(&self, status: InterruptStatus) {
        self.flags.set(self.flags.get() & !status.to_raw());
    }

    fn start(&self, source: *const u8, len: usize) {
        assert!(len > 0, "zero-length transfer");
        assert!(len <= self.max_transfer, "transfer exceeds engine limit");
        if self.enabled.get() {
            self.overlapping_starts.set(self.overlapping_starts.get() + 1);
        }
        self.transfers.borrow_mut().push(Transfer { source, len });
        self.enabled.set(true);
    }
}

// =============================================================================
// Mock Delay
// =============================================================================

/// Mock delay that records the requested time instead of waiting
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Total nanoseconds delayed
    total_ns: u64,
}

impl MockDelay {
    /// Create a new mock delay
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total nanoseconds that were "delayed"
    pub fn total_ns(&self) -> u64 {
        self.total_ns
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_line_starts_masked() {
        let stream = MockStream::new();
        assert!(stream.is_masked());
        assert!(!stream.mask());
        stream.unmask();
        assert!(stream.mask());
        assert_eq!(stream.mask_calls(), 2);
        assert_eq!(stream.unmask_calls(), 1);
    }

    #[test]
    fn complete_copies_run_and_raises_flags() {
        let stream = MockStream::new();
        let data = [1u8, 2, 3, 4];
        stream.start(data.as_ptr(), 3);
        assert!(stream.is_enabled());

        stream.complete();
        assert!(!stream.is_enabled());
        assert_eq!(stream.emitted(), [1, 2, 3]);
        assert!(stream.status().transfer_complete);

        stream.clear_status(InterruptStatus::COMPLETION);
        assert_eq!(stream.status(), InterruptStatus::default());
    }

    #[test]
    fn stuck_stream_times_out() {
        let stream = MockStream::new();
        stream.set_stuck(true);
        let mut delay = MockDelay::new();
        let config = TxConfig::new().with_stop_timeout_us(100);

        assert_eq!(
            stream.configure(&config, &mut delay),
            Err(ConfigError::StreamBusy)
        );
        assert_eq!(delay.total_ns(), 100_000);
        assert_eq!(stream.configured(), None);
    }
}
