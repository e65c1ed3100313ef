//! STM32 USART DMA Transmit Driver
//!
//! A `no_std`, `no_alloc` interrupt/DMA-driven transmit path for the USART
//! peripherals of STM32F2/F4-class microcontrollers.
//!
//! Application code queues bytes into a fixed-capacity ring buffer without
//! waiting on the wire. A DMA stream drains the buffer into the USART data
//! register one contiguous run at a time, and the stream's completion
//! interrupt keeps the pipeline fed until the buffer empties.
//!
//! # Architecture
//!
//! The driver is organized into three layers:
//!
//! 1. **Driver Layer** ([`driver`]): [`UsartTx`] with the writer, transfer
//!    scheduling and completion handling
//! 2. **HAL Layer** ([`hal`]): Hardware seams ([`TxStream`], [`InterruptLine`],
//!    [`Halt`]) and their implementations for DMA2 stream 7 / USART1
//! 3. **Register Layer** ([`unsafe_registers`]): Raw memory-mapped access
//!
//! ## Buffer Semantics
//!
//! - A buffer of `N` bytes holds at most `N - 1` queued bytes, so a full
//!   buffer never reads as empty
//! - `write` accepts as much as fits and returns the count; a full buffer is
//!   not an error
//! - Bytes leave in exactly the order they were accepted, including when
//!   writers nest (e.g. a write from an interrupt handler that preempted
//!   another write)
//! - A run that crosses the end of the buffer is sent as two transfers
//!
//! ## Faults
//!
//! Invariant violations and DMA error flags are unrecoverable. They are routed
//! to a [`Halt`] implementation; [`PanicHalt`] hands them to the panic
//! handler. Every fault-producing operation also has a `try_*` form that
//! returns the [`Fault`] instead.
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting for public types and setup/fault logging
//! - `log`: Enable setup/fault logging through the `log` facade
//!
//! A `critical-section` implementation must be provided by the application
//! (e.g. `cortex-m` with `critical-section-single-core`).
//!
//! # Example
//!
//! ```ignore
//! use usart_dma_tx::{TxConfig, UsartTx, UsartTxDefault, Usart1TxStream};
//!
//! static TX: UsartTxDefault = UsartTx::new(Usart1TxStream::new());
//!
//! // USART1 clocked, pins and baud rate configured by the board support code
//! TX.init(&TxConfig::new(), &mut delay).unwrap();
//!
//! let accepted = TX.write(b"boot ok\r\n");
//! core::fmt::Write::write_fmt(&mut &TX, format_args!("tick {}\r\n", n)).ok();
//!
//! #[interrupt]
//! fn DMA2_STREAM7() {
//!     TX.on_interrupt();
//! }
//! ```
//!
//! # Memory Requirements
//!
//! The driver is the buffer plus a few words of cursor state. With the
//! default configuration ([`UsartTxDefault`]) that is about 1 KB of SRAM,
//! which must be reachable by DMA2 (not CCM RAM on F4 parts).

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements
)]

// =============================================================================
// Modules
// =============================================================================

pub mod driver;
pub mod hal;
pub mod sync;

// Internal implementation details (pub(crate) only)
mod internal;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::config::{DmaPriority, FifoThreshold, TxConfig};
pub use driver::error::{ConfigError, ConfigResult, Fault, FaultResult};
pub use driver::interrupt::InterruptStatus;
pub use driver::tx::{UsartTx, UsartTxDefault};
pub use hal::{Halt, InterruptLine, NvicLine, PanicHalt, TxStream, Usart1TxStream};
pub use sync::IrqGuard;

/// Low-level register accessors for advanced use.
///
/// These are intentionally separated from the primary facade. Most users should
/// prefer the safe driver APIs instead of touching registers directly.
///
/// # Safety
///
/// Direct register access bypasses driver invariants. Writing a stream that
/// the driver owns, or unmasking its interrupt early, breaks the handoff
/// between writers and the completion handler.
pub mod unsafe_registers {
    pub use crate::internal::register::dma::DmaStreamRegs;
    pub use crate::internal::register::nvic::NvicRegs;
    pub use crate::internal::register::rcc::RccRegs;
    pub use crate::internal::register::usart::Usart1Regs;
    pub use crate::internal::register::{DMA1_BASE, DMA2_BASE, NVIC_BASE, RCC_BASE, USART1_BASE};
}

/// Shared driver constants.
///
/// These are grouped into a dedicated module to keep the top-level facade
/// focused on driver types.
pub mod constants {
    pub use crate::internal::constants::{
        // DMA stream
        DEFAULT_DMA_CHANNEL,
        DMA2_STREAM7_IRQ,
        MAX_DMA_CHANNEL,
        MAX_DMA_TRANSFER,
        // Buffer
        DEFAULT_TX_BUFFER_LEN,
        // Timing
        STREAM_STOP_POLL_US,
        STREAM_STOP_TIMEOUT_US,
        USART1_TX_STREAM,
    };
}

// =============================================================================
// Macro Helpers
// =============================================================================

/// Declare a static transmit driver bound to USART1 / DMA2 stream 7.
///
/// The buffer length defaults to
/// [`DEFAULT_TX_BUFFER_LEN`](crate::constants::DEFAULT_TX_BUFFER_LEN) and the
/// halt primitive to [`PanicHalt`].
///
/// # Examples
///
/// ```ignore
/// usart_dma_tx::usart_tx_static!(TX);
/// usart_dma_tx::usart_tx_static!(TRACE, 256);
/// usart_dma_tx::usart_tx_static!(LOG, 4096, MyHalt);
///
/// TX.init(&TxConfig::new(), &mut delay).unwrap();
/// ```
#[macro_export]
macro_rules! usart_tx_static {
    ($name:ident) => {
        $crate::usart_tx_static!($name, $crate::constants::DEFAULT_TX_BUFFER_LEN);
    };
    ($name:ident, $len:expr) => {
        $crate::usart_tx_static!($name, $len, $crate::PanicHalt);
    };
    ($name:ident, $len:expr, $halt:ty) => {
        static $name: $crate::UsartTx<$crate::Usart1TxStream, $halt, { $len }> =
            $crate::UsartTx::new($crate::Usart1TxStream::new());
    };
}
