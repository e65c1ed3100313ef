//! NVIC Register Definitions
//!
//! Interrupt set-enable and clear-enable banks. Each 32-bit register covers
//! 32 interrupt lines; writing a 1 acts on the line, writing 0 has no effect.

use super::{NVIC_BASE, read_reg, write_reg};

/// Interrupt Set-Enable Register bank offset
pub const ISER_OFFSET: usize = 0x000;
/// Interrupt Clear-Enable Register bank offset
pub const ICER_OFFSET: usize = 0x080;

/// Register index and bit mask for an interrupt number
#[inline(always)]
pub const fn line_position(irq: u16) -> (usize, u32) {
    ((irq as usize) / 32, 1 << (irq % 32))
}

/// NVIC register accessors
pub struct NvicRegs;

impl NvicRegs {
    /// Check whether an interrupt line is enabled
    #[inline(always)]
    pub fn is_enabled(irq: u16) -> bool {
        let (index, mask) = line_position(irq);
        unsafe { (read_reg(NVIC_BASE + ISER_OFFSET + index * 4) & mask) != 0 }
    }

    /// Enable an interrupt line
    #[inline(always)]
    pub fn enable(irq: u16) {
        let (index, mask) = line_position(irq);
        unsafe { write_reg(NVIC_BASE + ISER_OFFSET + index * 4, mask) }
    }

    /// Disable an interrupt line
    ///
    /// The caller is responsible for the barrier that makes the disable take
    /// effect before the next instruction.
    #[inline(always)]
    pub fn disable(irq: u16) {
        let (index, mask) = line_position(irq);
        unsafe { write_reg(NVIC_BASE + ICER_OFFSET + index * 4, mask) }
    }
}
