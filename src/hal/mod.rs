//! Hardware Abstraction Layer
//!
//! The transmit driver talks to hardware only through the traits in this
//! module, so the same driver logic runs against the real DMA stream on
//! target and against a simulated stream in host tests.
//!
//! # Traits
//!
//! - [`InterruptLine`]: a single maskable interrupt source
//! - [`TxStream`]: the transfer engine moving bytes to the USART data register
//! - [`Halt`]: the irrecoverable halt primitive invoked on faults
//!
//! # Implementations
//!
//! - [`nvic`]: [`NvicLine`], an NVIC interrupt line
//! - [`stream`]: [`Usart1TxStream`], DMA2 stream 7 feeding USART1
//! - [`halt`]: [`PanicHalt`], halting through the panic handler
//!
//! # Delay Integration
//!
//! Stream setup waits for the hardware through `embedded_hal::delay::DelayNs`.
//! Pass any delay implementation from your HAL.

pub mod halt;
pub mod nvic;
pub mod stream;

use embedded_hal::delay::DelayNs;

use crate::driver::config::TxConfig;
use crate::driver::error::{ConfigResult, Fault};
use crate::driver::interrupt::InterruptStatus;

pub use halt::PanicHalt;
pub use nvic::NvicLine;
pub use stream::Usart1TxStream;

/// A single maskable interrupt source
pub trait InterruptLine {
    /// Mask the interrupt, returning whether it was unmasked before
    ///
    /// Once this returns, the handler cannot start until the line is
    /// unmasked again.
    fn mask(&self) -> bool;

    /// Unmask the interrupt
    fn unmask(&self);
}

/// Transfer engine moving bytes from memory to the USART data register
///
/// Implementations program hardware only; all bookkeeping lives in the
/// driver. Every method may be called from the completion interrupt.
pub trait TxStream: InterruptLine {
    /// Largest run a single transfer can move
    fn max_transfer(&self) -> usize;

    /// Stop the stream and program it for memory-to-peripheral byte
    /// transfers into the USART data register
    ///
    /// Leaves the stream disabled and its flags cleared.
    fn configure<D: DelayNs>(&self, config: &TxConfig, delay: &mut D) -> ConfigResult<()>;

    /// Whether a transfer is currently running
    fn is_enabled(&self) -> bool;

    /// Current interrupt flags
    fn status(&self) -> InterruptStatus;

    /// Acknowledge the given interrupt flags
    fn clear_status(&self, status: InterruptStatus);

    /// Program `len` bytes starting at `source` and arm the stream
    ///
    /// `source` stays valid until the completion interrupt for this
    /// transfer has been handled.
    fn start(&self, source: *const u8, len: usize);
}

/// The irrecoverable halt primitive
///
/// Called when the driver detects a [`Fault`]. What "halt" means (reset,
/// breakpoint, diagnostic dump) is up to the implementation.
pub trait Halt {
    /// Stop the system; never returns
    fn halt(fault: Fault) -> !;
}
