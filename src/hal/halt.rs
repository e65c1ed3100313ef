//! Halt primitive backed by the panic handler

use super::Halt;
use crate::driver::error::Fault;

/// Halts by panicking with the fault description
///
/// The application's panic handler (`panic-halt`, `panic-probe`, a reset
/// handler, ...) decides what happens next.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicHalt;

impl Halt for PanicHalt {
    fn halt(fault: Fault) -> ! {
        panic!("usart tx fault: {fault}")
    }
}
