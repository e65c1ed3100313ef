//! Memory-mapped register definitions for the STM32F2/F4 USART TX path
//!
//! This module provides access to the DMA controller, USART, RCC and NVIC
//! registers used by the transmit driver. All register access is volatile to
//! ensure proper hardware interaction.

pub mod dma;
pub mod nvic;
pub mod rcc;
pub mod usart;

/// DMA1 controller base address
pub const DMA1_BASE: usize = 0x4002_6000;

/// DMA2 controller base address
pub const DMA2_BASE: usize = 0x4002_6400;

/// USART1 register block base address
pub const USART1_BASE: usize = 0x4001_1000;

/// RCC register block base address
pub const RCC_BASE: usize = 0x4002_3800;

/// NVIC register block base address (Cortex-M System Control Space)
pub const NVIC_BASE: usize = 0xE000_E100;

/// Read a 32-bit register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn read_reg(addr: usize) -> u32 {
    unsafe { core::ptr::read_volatile(addr as *const u32) }
}

/// Write a 32-bit value to a register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn write_reg(addr: usize, value: u32) {
    unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
}

/// Modify a register using a read-modify-write operation
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn modify_reg<F>(addr: usize, f: F)
where
    F: FnOnce(u32) -> u32,
{
    // SAFETY: caller guarantees address validity
    let value = unsafe { read_reg(addr) };
    unsafe { write_reg(addr, f(value)) }
}

/// Set bits in a register (read-modify-write)
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn set_bits(addr: usize, bits: u32) {
    // SAFETY: caller guarantees address validity
    unsafe { modify_reg(addr, |v| v | bits) }
}

/// Clear bits in a register (read-modify-write)
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn clear_bits(addr: usize, bits: u32) {
    // SAFETY: caller guarantees address validity
    unsafe { modify_reg(addr, |v| v & !bits) }
}

// =============================================================================
// Register Access Macros
// =============================================================================

/// Generate read/write accessor methods for a register at a fixed address.
///
/// # Example
/// ```ignore
/// impl UsartRegs {
///     reg_rw!(cr3, set_cr3, USART1_BASE, USART_CR3_OFFSET,
///             "Control register 3");
/// }
/// ```
macro_rules! reg_rw {
    ($read_fn:ident, $write_fn:ident, $base:expr, $offset:expr, $doc:expr) => {
        #[doc = concat!("Read ", $doc)]
        #[inline(always)]
        pub fn $read_fn() -> u32 {
            unsafe { $crate::internal::register::read_reg($base + $offset) }
        }

        #[doc = concat!("Write ", $doc)]
        #[inline(always)]
        pub fn $write_fn(value: u32) {
            unsafe { $crate::internal::register::write_reg($base + $offset, value) }
        }
    };
}

/// Generate set/clear bit operation methods for a register at a fixed address.
macro_rules! reg_bit_ops {
    ($set_fn:ident, $clear_fn:ident, $base:expr, $offset:expr, $bit:expr, $what:expr, $set_verb:expr, $clear_verb:expr) => {
        #[doc = concat!($set_verb, " ", $what)]
        #[inline(always)]
        pub fn $set_fn() {
            unsafe { $crate::internal::register::set_bits($base + $offset, $bit) }
        }

        #[doc = concat!($clear_verb, " ", $what)]
        #[inline(always)]
        pub fn $clear_fn() {
            unsafe { $crate::internal::register::clear_bits($base + $offset, $bit) }
        }
    };
}

/// Generate read/write accessor methods for a register relative to a
/// runtime base returned by `self.block_base()`.
///
/// Used for register blocks that exist in several instances, such as the
/// eight streams of a DMA controller.
macro_rules! block_reg_rw {
    ($read_fn:ident, $write_fn:ident, $offset:expr, $doc:expr) => {
        #[doc = concat!("Read ", $doc)]
        #[inline(always)]
        pub fn $read_fn(&self) -> u32 {
            unsafe { $crate::internal::register::read_reg(self.block_base() + $offset) }
        }

        #[doc = concat!("Write ", $doc)]
        #[inline(always)]
        pub fn $write_fn(&self, value: u32) {
            unsafe { $crate::internal::register::write_reg(self.block_base() + $offset, value) }
        }
    };
}

// Export macros for use in submodules
pub(crate) use block_reg_rw;
pub(crate) use reg_bit_ops;
pub(crate) use reg_rw;
