//! Transmit driver
//!
//! [`UsartTx`] owns the transmit ring and the DMA stream that drains it.
//! Three roles share it:
//!
//! - writers ([`write`](UsartTx::write)) reserve space, copy bytes in, and
//!   start a transfer when the stream is idle
//! - the scheduler programs the stream with the next contiguous run
//! - the completion handler ([`on_interrupt`](UsartTx::on_interrupt))
//!   retires the finished run and schedules the next one
//!
//! # Example
//!
//! ```ignore
//! static TX: UsartTxDefault = UsartTx::new(Usart1TxStream::new());
//!
//! // after clocks, pins and baud rate are set up
//! TX.init(&TxConfig::new(), &mut delay)?;
//! let accepted = TX.write(b"hello\r\n");
//!
//! #[interrupt]
//! fn DMA2_STREAM7() {
//!     TX.on_interrupt();
//! }
//! ```

use core::fmt;
use core::marker::PhantomData;
use core::sync::atomic::{AtomicU8, Ordering};

use critical_section::CriticalSection;
use embedded_hal::delay::DelayNs;

use crate::driver::config::TxConfig;
use crate::driver::error::{ConfigError, ConfigResult, Fault, FaultResult};
use crate::driver::interrupt::InterruptStatus;
use crate::hal::{Halt, PanicHalt, TxStream, Usart1TxStream};
use crate::internal::constants::DEFAULT_TX_BUFFER_LEN;
use crate::internal::ring::{Reservation, TxRing};
use crate::sync::IrqGuard;

/// Driver state values
const STATE_UNINIT: u8 = 0;
const STATE_CONFIGURING: u8 = 1;
const STATE_READY: u8 = 2;

/// Driver for USART1 on DMA2 stream 7 with the default 1 KiB buffer
pub type UsartTxDefault = UsartTx<Usart1TxStream, PanicHalt, DEFAULT_TX_BUFFER_LEN>;

// =============================================================================
// Driver
// =============================================================================

/// Interrupt/DMA-driven USART transmitter with an `N`-byte ring buffer
///
/// - `S`: the transfer engine
/// - `H`: the halt primitive invoked on faults
/// - `N`: buffer length in bytes (at least 2; at most `N - 1` bytes queue)
///
/// All methods take `&self`, so the driver can live in a `static` shared
/// between application code and the completion interrupt.
pub struct UsartTx<S, H, const N: usize> {
    ring: TxRing<N>,
    stream: S,
    state: AtomicU8,
    _halt: PhantomData<fn() -> H>,
}

impl<S, H, const N: usize> UsartTx<S, H, N>
where
    S: TxStream,
    H: Halt,
{
    /// Create an uninitialized driver. Const-compatible.
    pub const fn new(stream: S) -> Self {
        Self {
            ring: TxRing::new(),
            stream,
            state: AtomicU8::new(STATE_UNINIT),
            _halt: PhantomData,
        }
    }

    /// The transfer engine this driver feeds
    pub fn stream(&self) -> &S {
        &self.stream
    }

    // =========================================================================
    // Setup
    // =========================================================================

    /// Program the stream, empty the buffer and unmask the completion
    /// interrupt
    ///
    /// The USART must already be clocked and configured. Call once, before
    /// the first write. On failure the driver stays uninitialized and `init`
    /// may be retried.
    ///
    /// # Errors
    ///
    /// - `AlreadyInitialized` if setup already ran or is running
    /// - `InvalidChannel` / `InvalidTimeout` for a bad configuration
    /// - `StreamBusy` if the stream did not stop in time
    pub fn init<D: DelayNs>(&self, config: &TxConfig, delay: &mut D) -> ConfigResult<()> {
        config.validate()?;

        let claimed = critical_section::with(|_| {
            if self.state.load(Ordering::Acquire) != STATE_UNINIT {
                return false;
            }
            self.state.store(STATE_CONFIGURING, Ordering::Release);
            true
        });
        if !claimed {
            return Err(ConfigError::AlreadyInitialized);
        }

        {
            let _guard = IrqGuard::new(&self.stream);
            if let Err(e) = self.stream.configure(config, delay) {
                self.state.store(STATE_UNINIT, Ordering::Release);

                #[cfg(feature = "log")]
                log::warn!("usart tx setup failed: {e}");
                #[cfg(feature = "defmt")]
                defmt::warn!("usart tx setup failed: {}", e);

                return Err(e);
            }
            critical_section::with(|cs| self.ring.reset(cs));
            self.state.store(STATE_READY, Ordering::Release);
        }
        self.stream.unmask();

        #[cfg(feature = "log")]
        log::info!("usart tx ready: {N} byte buffer, channel {}", config.channel);
        #[cfg(feature = "defmt")]
        defmt::info!("usart tx ready: {} byte buffer, channel {}", N, config.channel);

        Ok(())
    }

    /// Whether [`init`](Self::init) has completed
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.state.load(Ordering::Acquire) == STATE_READY
    }

    // =========================================================================
    // Writer
    // =========================================================================

    /// Queue as much of `data` as fits and return the number of bytes taken
    ///
    /// Never blocks. A short count means the buffer is full; the caller
    /// decides whether to retry or drop the rest. Faults are routed to
    /// `H::halt`.
    ///
    /// At most [`max_pending`](Self::max_pending) (`N - 1`) bytes are ever
    /// queued, so the most a write can take is [`free`](Self::free), one
    /// less than `capacity() - pending()`. On an empty `UsartTx<_, _, 8>`,
    /// `write(&[0; 8])` returns 7.
    pub fn write(&self, data: &[u8]) -> usize {
        match self.try_write(data) {
            Ok(accepted) => accepted,
            Err(fault) => self.halt(fault),
        }
    }

    /// Like [`write`](Self::write), but returns faults instead of halting
    ///
    /// # Errors
    ///
    /// - `NotInitialized` if called before [`init`](Self::init)
    /// - `TransferActive` if a transfer was about to be started over a
    ///   running one
    pub fn try_write(&self, data: &[u8]) -> FaultResult<usize> {
        if !self.is_initialized() {
            return Err(Fault::NotInitialized);
        }

        let Some(reservation) = critical_section::with(|cs| self.ring.reserve(cs, data.len()))
        else {
            return Ok(0);
        };
        let accepted = reservation.len();

        // Copy runs with interrupts enabled; nested writers get their own region
        self.ring.fill(&reservation, data);
        self.publish(reservation)?;

        Ok(accepted)
    }

    /// Commit a filled reservation and start a transfer if the stream idles
    fn publish(&self, reservation: Reservation) -> FaultResult<()> {
        critical_section::with(|cs| {
            self.ring.commit(cs, reservation);
            if self.is_busy() || !self.ring.has_unsent() {
                return Ok(());
            }
            self.schedule(cs)
        })
    }

    // =========================================================================
    // Transfer Scheduling
    // =========================================================================

    /// Hand the next contiguous run of published bytes to the stream
    ///
    /// The run ends at the published cursor or the end of storage, whichever
    /// comes first, and never exceeds the stream's transfer limit.
    fn schedule(&self, cs: CriticalSection<'_>) -> FaultResult<()> {
        if self.stream.is_enabled() {
            return Err(Fault::TransferActive);
        }

        let (source, len) = self.ring.next_run(cs, self.stream.max_transfer());
        self.stream.start(source, len);
        Ok(())
    }

    // =========================================================================
    // Completion Handling
    // =========================================================================

    /// Completion interrupt handler
    ///
    /// Call from the stream's interrupt vector. Faults are routed to
    /// `H::halt`.
    pub fn on_interrupt(&self) {
        if let Err(fault) = self.try_on_interrupt() {
            self.halt(fault);
        }
    }

    /// Like [`on_interrupt`](Self::on_interrupt), but returns faults instead
    /// of halting
    ///
    /// Error flags are left set when a fault is returned.
    ///
    /// # Errors
    ///
    /// - `TransferError`, `DirectModeError`, `FifoError` if the stream
    ///   reported an error
    /// - `UnexpectedInterrupt` if no transfer-complete flag was set
    pub fn try_on_interrupt(&self) -> FaultResult<()> {
        critical_section::with(|cs| {
            let status = self.stream.status();
            if let Some(fault) = status.fault() {
                return Err(fault);
            }
            if !status.transfer_complete {
                return Err(Fault::UnexpectedInterrupt);
            }

            self.stream.clear_status(InterruptStatus::COMPLETION);
            self.ring.complete_run(cs);

            if self.ring.has_unsent() {
                self.schedule(cs)
            } else {
                Ok(())
            }
        })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Bytes queued but not yet confirmed sent
    pub fn pending(&self) -> usize {
        self.with_line_masked(TxRing::pending)
    }

    /// Bytes a write could accept right now
    pub fn free(&self) -> usize {
        self.with_line_masked(TxRing::free)
    }

    /// Read the ring with the completion interrupt masked
    ///
    /// The handler moves the read cursor, so both cursors must come from the
    /// same side of a completion.
    fn with_line_masked<R>(&self, read: impl FnOnce(&TxRing<N>) -> R) -> R {
        let _guard = IrqGuard::new(&self.stream);
        read(&self.ring)
    }

    /// Buffer length in bytes
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Most bytes that can be queued at once
    #[inline]
    pub const fn max_pending(&self) -> usize {
        N - 1
    }

    /// Whether a transfer is running or its completion is unacknowledged
    pub fn is_busy(&self) -> bool {
        if self.stream.is_enabled() {
            return true;
        }
        let status = self.stream.status();
        status.transfer_complete || status.has_error()
    }

    /// Whether the stream is stopped and nothing is queued
    pub fn is_idle(&self) -> bool {
        !self.is_busy() && self.pending() == 0
    }

    #[cold]
    fn halt(&self, fault: Fault) -> ! {
        #[cfg(any(feature = "log", feature = "defmt"))]
        let origin = if fault.is_hardware() { "dma" } else { "driver" };
        #[cfg(feature = "log")]
        log::error!("usart tx {origin} fault: {fault}");
        #[cfg(feature = "defmt")]
        defmt::error!("usart tx {} fault: {}", origin, fault);

        H::halt(fault)
    }
}

/// `write!` support
///
/// Returns `fmt::Error` when the buffer could not take the whole string.
/// The bytes that fit are still sent.
impl<S, H, const N: usize> fmt::Write for &UsartTx<S, H, N>
where
    S: TxStream,
    H: Halt,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.write(s.as_bytes()) == s.len() {
            Ok(())
        } else {
            Err(fmt::Error)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate alloc;
    use alloc::vec::Vec;
    use core::fmt::Write as _;

    use super::*;
    use crate::hal::InterruptLine;
    use crate::internal::register::dma::{FLAG_FEIF, FLAG_TCIF, FLAG_TEIF};
    use crate::testing::{MockDelay, MockStream};

    type Tx<const N: usize> = UsartTx<MockStream, PanicHalt, N>;

    fn ready<const N: usize>(stream: MockStream) -> Tx<N> {
        let tx = UsartTx::new(stream);
        tx.init(&TxConfig::new(), &mut MockDelay::new()).unwrap();
        tx
    }

    /// Complete the running transfer and run the handler
    fn step<const N: usize>(tx: &Tx<N>) {
        tx.stream().complete();
        tx.on_interrupt();
    }

    fn drain<const N: usize>(tx: &Tx<N>) {
        while tx.stream().is_enabled() {
            step(tx);
        }
    }

    fn seq(range: core::ops::Range<u8>) -> Vec<u8> {
        range.collect()
    }

    // ---- setup ----

    #[test]
    fn init_configures_stream_and_unmasks_line() {
        let tx: Tx<16> = UsartTx::new(MockStream::new());
        assert!(!tx.is_initialized());
        assert!(tx.stream().is_masked());

        let config = TxConfig::new().with_channel(5);
        assert_eq!(tx.init(&config, &mut MockDelay::new()), Ok(()));

        assert!(tx.is_initialized());
        assert!(!tx.stream().is_masked());
        assert_eq!(tx.stream().configured(), Some(config));
        assert_eq!(tx.pending(), 0);
    }

    #[test]
    fn init_twice_is_rejected() {
        let tx: Tx<16> = ready(MockStream::new());
        assert_eq!(
            tx.init(&TxConfig::new(), &mut MockDelay::new()),
            Err(ConfigError::AlreadyInitialized)
        );
        assert!(tx.is_initialized());
    }

    #[test]
    fn init_rejects_invalid_config() {
        let tx: Tx<16> = UsartTx::new(MockStream::new());
        let config = TxConfig::new().with_channel(9);
        assert_eq!(
            tx.init(&config, &mut MockDelay::new()),
            Err(ConfigError::InvalidChannel)
        );
        assert!(!tx.is_initialized());
        assert_eq!(tx.stream().configured(), None);
    }

    #[test]
    fn init_failure_leaves_driver_retryable() {
        let stream = MockStream::new();
        stream.set_stuck(true);
        let tx: Tx<16> = UsartTx::new(stream);
        let mut delay = MockDelay::new();

        assert_eq!(
            tx.init(&TxConfig::new(), &mut delay),
            Err(ConfigError::StreamBusy)
        );
        assert!(!tx.is_initialized());
        assert!(tx.stream().is_masked());
        assert!(delay.total_ns() > 0);

        tx.stream().set_stuck(false);
        assert_eq!(tx.init(&TxConfig::new(), &mut delay), Ok(()));
        assert!(tx.is_initialized());
    }

    #[test]
    fn init_resets_buffer() {
        let tx: Tx<16> = UsartTx::new(MockStream::new());
        // Leftover cursor state from before a reset
        critical_section::with(|cs| {
            let r = tx.ring.reserve(cs, 5).unwrap();
            tx.ring.commit(cs, r);
        });
        assert_eq!(tx.pending(), 5);

        tx.init(&TxConfig::new(), &mut MockDelay::new()).unwrap();
        assert_eq!(tx.pending(), 0);
    }

    // ---- writer ----

    #[test]
    fn write_before_init_is_a_fault() {
        let tx: Tx<16> = UsartTx::new(MockStream::new());
        assert_eq!(tx.try_write(b"abc"), Err(Fault::NotInitialized));
        assert_eq!(tx.pending(), 0);
        assert!(tx.stream().transfers().is_empty());
    }

    #[test]
    #[should_panic(expected = "driver not initialized")]
    fn write_before_init_halts() {
        let tx: Tx<16> = UsartTx::new(MockStream::new());
        tx.write(b"abc");
    }

    #[test]
    fn empty_write_has_no_side_effects() {
        let tx: Tx<16> = ready(MockStream::new());
        assert_eq!(tx.write(&[]), 0);
        assert_eq!(tx.pending(), 0);
        assert!(tx.stream().transfers().is_empty());
    }

    #[test]
    fn write_starts_transfer_when_idle() {
        let tx: Tx<16> = ready(MockStream::new());
        assert_eq!(tx.write(b"hello"), 5);

        assert!(tx.stream().is_enabled());
        assert_eq!(tx.stream().transfer_lens(), [5]);
        assert_eq!(tx.pending(), 5);
    }

    #[test]
    fn pending_is_sum_of_accepted_lengths() {
        let tx: Tx<16> = ready(MockStream::new());
        let mut total = 0;
        for chunk in [&b"ab"[..], b"cde", b"", b"fghij", b"k"] {
            total += tx.write(chunk);
            assert_eq!(tx.pending(), total);
        }
        assert_eq!(total, 11);
    }

    #[test]
    fn accepted_is_bounded_by_free_space() {
        let tx: Tx<16> = ready(MockStream::new());
        for n in [4usize, 9, 6, 3] {
            let free = tx.free();
            let accepted = tx.write(&[0x55; 16][..n]);
            assert!(accepted <= n.min(free));
            if n <= free {
                assert_eq!(accepted, n);
            }
        }
        assert_eq!(tx.free(), 0);
        assert_eq!(tx.write(b"x"), 0);
    }

    #[test]
    fn boundary_scenario_capacity_8() {
        let tx: Tx<8> = ready(MockStream::new());

        assert_eq!(tx.write(&[1, 2, 3, 4, 5]), 5);
        assert_eq!(tx.pending(), 5);

        // Seven bytes is the most the buffer holds
        assert_eq!(tx.write(&[6, 7, 8, 9, 10, 11]), 2);
        assert_eq!(tx.pending(), 7);
        assert_eq!(tx.free(), 0);

        drain(&tx);
        assert_eq!(tx.stream().emitted(), [1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(tx.pending(), 0);
    }

    #[test]
    fn full_buffer_is_never_mistaken_for_empty() {
        let tx: Tx<8> = ready(MockStream::new());
        assert_eq!(tx.write(&[0xAA; 8]), 7);
        assert_ne!(tx.pending(), 0);
        assert!(!tx.is_idle());
    }

    #[test]
    fn write_while_completion_unacknowledged_does_not_start() {
        let tx: Tx<16> = ready(MockStream::new());
        tx.write(b"ab");
        tx.stream().complete();
        assert!(!tx.stream().is_enabled());
        assert!(tx.is_busy());

        // Stream idle but the handler has not run yet
        assert_eq!(tx.write(b"cd"), 2);
        assert_eq!(tx.stream().transfer_lens(), [2]);

        tx.on_interrupt();
        assert_eq!(tx.stream().transfer_lens(), [2, 2]);
        drain(&tx);
        assert_eq!(tx.stream().emitted(), b"abcd");
    }

    #[test]
    fn nested_write_at_reservation_step_keeps_order() {
        let tx: Tx<16> = ready(MockStream::new());

        // Outer writer is preempted right after reserving
        let outer = critical_section::with(|cs| tx.ring.reserve(cs, 3)).unwrap();
        assert_eq!(outer.start(), 0);

        // Nested writer gets the next region and must not start a transfer
        // over the outer writer's unfilled bytes
        assert_eq!(tx.write(&[4, 5]), 2);
        assert!(tx.stream().transfers().is_empty());
        assert_eq!(tx.pending(), 5);

        tx.ring.fill(&outer, &[1, 2, 3]);
        tx.publish(outer).unwrap();

        drain(&tx);
        assert_eq!(tx.stream().emitted(), [1, 2, 3, 4, 5]);
        assert_eq!(tx.stream().overlapping_starts(), 0);
    }

    #[test]
    fn nested_writers_receive_disjoint_regions() {
        let tx: Tx<16> = ready(MockStream::new());

        let a = critical_section::with(|cs| tx.ring.reserve(cs, 4)).unwrap();
        let b = critical_section::with(|cs| tx.ring.reserve(cs, 4)).unwrap();
        let c = critical_section::with(|cs| tx.ring.reserve(cs, 10)).unwrap();
        assert_eq!((a.start(), a.len()), (0, 4));
        assert_eq!((b.start(), b.len()), (4, 4));
        // Clamped to what is left
        assert_eq!((c.start(), c.len()), (8, 7));

        // Innermost finishes first, outermost last
        tx.ring.fill(&c, &seq(8..15));
        tx.publish(c).unwrap();
        tx.ring.fill(&b, &seq(4..8));
        tx.publish(b).unwrap();
        assert!(tx.stream().transfers().is_empty());
        tx.ring.fill(&a, &seq(0..4));
        tx.publish(a).unwrap();

        drain(&tx);
        assert_eq!(tx.stream().emitted(), seq(0..15));
    }

    // ---- completion and wraparound ----

    #[test]
    fn drain_empties_buffer() {
        let tx: Tx<16> = ready(MockStream::new());
        tx.write(b"0123456789");
        drain(&tx);

        assert_eq!(tx.pending(), 0);
        assert!(tx.is_idle());
        assert_eq!(tx.stream().emitted(), b"0123456789");
    }

    #[test]
    fn handler_goes_idle_when_buffer_empty() {
        let tx: Tx<16> = ready(MockStream::new());
        tx.write(b"abc");
        step(&tx);

        assert!(!tx.stream().is_enabled());
        assert_eq!(tx.stream().transfer_lens(), [3]);
        assert_eq!(tx.stream().status(), InterruptStatus::default());

        // Next write restarts the engine
        tx.write(b"de");
        assert_eq!(tx.stream().transfer_lens(), [3, 2]);
    }

    #[test]
    fn wrap_is_sent_as_two_transfers() {
        let tx: Tx<16> = ready(MockStream::new());
        assert_eq!(tx.write(&seq(0..10)), 10);
        drain(&tx);

        assert_eq!(tx.write(&seq(100..112)), 12);
        // Up to the end of storage, then the remainder from index 0
        assert_eq!(tx.stream().transfer_lens(), [10, 6]);
        step(&tx);
        assert_eq!(tx.stream().transfer_lens(), [10, 6, 6]);
        drain(&tx);

        let mut expected = seq(0..10);
        expected.extend(seq(100..112));
        assert_eq!(tx.stream().emitted(), expected);
        assert_eq!(tx.pending(), 0);
    }

    #[test]
    fn wraparound_with_partial_drain_keeps_fifo_order() {
        let tx: Tx<16> = ready(MockStream::with_max_transfer(6));

        assert_eq!(tx.write(&seq(0..10)), 10);
        // Drain the first 6; bytes 6..10 are now in flight
        step(&tx);
        assert_eq!(tx.stream().emitted(), seq(0..6));
        assert_eq!(tx.pending(), 4);

        // 4 still queued, so 11 of 12 fit
        assert_eq!(tx.write(&seq(100..112)), 11);
        assert_eq!(tx.pending(), 15);

        drain(&tx);
        assert_eq!(tx.stream().transfer_lens(), [6, 4, 6, 5]);

        let mut expected = seq(0..10);
        expected.extend(seq(100..111));
        assert_eq!(tx.stream().emitted(), expected);
        assert_eq!(tx.pending(), 0);
    }

    #[test]
    fn runs_are_capped_at_max_transfer() {
        let tx: Tx<64> = ready(MockStream::with_max_transfer(8));
        assert_eq!(tx.write(&[0x11; 20]), 20);
        drain(&tx);
        assert_eq!(tx.stream().transfer_lens(), [8, 8, 4]);
    }

    #[test]
    fn interleaved_writes_and_completions_never_overlap() {
        let tx: Tx<16> = ready(MockStream::with_max_transfer(5));
        let mut sent = Vec::new();
        let mut next = 0u8;

        for round in 0..40 {
            let chunk: Vec<u8> = (0..(round % 7) as u8).map(|i| next.wrapping_add(i)).collect();
            let accepted = tx.write(&chunk);
            sent.extend_from_slice(&chunk[..accepted]);
            next = next.wrapping_add(accepted as u8);
            if round % 3 == 0 && tx.stream().is_enabled() {
                step(&tx);
            }
        }
        drain(&tx);

        assert_eq!(tx.stream().emitted(), sent);
        assert_eq!(tx.stream().overlapping_starts(), 0);
        assert_eq!(tx.pending(), 0);
    }

    // ---- faults ----

    #[test]
    fn schedule_over_running_transfer_is_a_fault() {
        let tx: Tx<16> = ready(MockStream::new());
        tx.write(b"abc");
        assert_eq!(
            critical_section::with(|cs| tx.schedule(cs)),
            Err(Fault::TransferActive)
        );
        assert_eq!(tx.stream().transfer_lens(), [3]);
    }

    #[test]
    fn spurious_interrupt_is_a_fault() {
        let tx: Tx<16> = ready(MockStream::new());
        assert_eq!(tx.try_on_interrupt(), Err(Fault::UnexpectedInterrupt));
    }

    #[test]
    #[should_panic(expected = "unexpected DMA interrupt")]
    fn spurious_interrupt_halts() {
        let tx: Tx<16> = ready(MockStream::new());
        tx.on_interrupt();
    }

    #[test]
    fn error_flag_is_a_fault_even_with_completion() {
        let tx: Tx<16> = ready(MockStream::new());
        tx.write(b"abc");
        tx.stream().inject(FLAG_TCIF | FLAG_TEIF);

        assert_eq!(tx.try_on_interrupt(), Err(Fault::TransferError));
        // Nothing retired
        assert_eq!(tx.pending(), 3);
    }

    #[test]
    #[should_panic(expected = "usart tx fault: DMA FIFO error")]
    fn fifo_error_halts() {
        let tx: Tx<16> = ready(MockStream::new());
        tx.write(b"abc");
        tx.stream().inject(FLAG_FEIF);
        tx.on_interrupt();
    }

    #[test]
    fn error_flags_block_new_transfers() {
        let tx: Tx<16> = ready(MockStream::new());
        tx.stream().inject(FLAG_TEIF);
        assert!(tx.is_busy());
        assert_eq!(tx.write(b"abc"), 3);
        assert!(tx.stream().transfers().is_empty());
    }

    // ---- queries ----

    #[test]
    fn capacity_and_max_pending() {
        let tx: Tx<32> = UsartTx::new(MockStream::new());
        assert_eq!(tx.capacity(), 32);
        assert_eq!(tx.max_pending(), 31);
    }

    #[test]
    fn write_accepts_free_not_capacity_minus_pending() {
        let tx: Tx<8> = ready(MockStream::new());
        assert_eq!(tx.write(&[0; 8]), 7);
        drain(&tx);

        tx.write(&[1, 2, 3]);
        let room = tx.capacity() - tx.pending();
        assert_eq!(tx.free(), room - 1);
        assert_eq!(tx.write(&[0; 8][..room]), room - 1);
        assert_eq!(tx.pending(), tx.max_pending());
    }

    #[test]
    fn queries_restore_line_mask_state() {
        let tx: Tx<16> = ready(MockStream::new());
        tx.pending();
        tx.free();
        assert!(!tx.stream().is_masked());

        tx.stream().mask();
        tx.pending();
        assert!(tx.stream().is_masked());
    }

    #[test]
    fn queries_read_ring_with_line_masked() {
        let tx: Tx<16> = ready(MockStream::new());
        tx.write(b"abc");
        assert!(!tx.stream().is_masked());

        let masked_during_read = tx.with_line_masked(|_| tx.stream().is_masked());
        assert!(masked_during_read);
        assert!(!tx.stream().is_masked());

        let (masks, unmasks) = (tx.stream().mask_calls(), tx.stream().unmask_calls());
        assert_eq!(tx.pending(), 3);
        assert_eq!(tx.free(), 12);
        assert_eq!(tx.stream().mask_calls(), masks + 2);
        assert_eq!(tx.stream().unmask_calls(), unmasks + 2);
        assert!(!tx.stream().is_masked());
    }

    #[test]
    fn queries_from_masked_context_do_not_unmask() {
        let tx: Tx<16> = ready(MockStream::new());
        tx.stream().mask();
        let unmasks = tx.stream().unmask_calls();

        tx.pending();
        tx.free();
        assert_eq!(tx.stream().unmask_calls(), unmasks);
        assert!(tx.stream().is_masked());
    }

    #[test]
    fn busy_and_idle_follow_transfer() {
        let tx: Tx<16> = ready(MockStream::new());
        assert!(tx.is_idle());
        assert!(!tx.is_busy());

        tx.write(b"x");
        assert!(tx.is_busy());
        assert!(!tx.is_idle());

        drain(&tx);
        assert!(tx.is_idle());
    }

    // ---- fmt::Write ----

    #[test]
    fn fmt_write_queues_formatted_text() {
        let tx: Tx<32> = ready(MockStream::new());
        let mut out = &tx;
        write!(out, "t={} ok", 42).unwrap();
        drain(&tx);
        assert_eq!(tx.stream().emitted(), b"t=42 ok");
    }

    #[test]
    fn fmt_write_reports_truncation() {
        let tx: Tx<8> = ready(MockStream::new());
        let mut out = &tx;
        assert_eq!(out.write_str("0123456789"), Err(fmt::Error));
        assert_eq!(tx.pending(), 7);

        drain(&tx);
        assert_eq!(tx.stream().emitted(), b"0123456");
    }
}
