//! USART Register Definitions
//!
//! Only the registers the transmit path touches: the data register (DMA
//! destination) and control register 3 (DMA transmit enable).

use super::{USART1_BASE, reg_bit_ops, reg_rw};

/// Data Register offset
pub const USART_DR_OFFSET: usize = 0x04;
/// Control Register 3 offset
pub const USART_CR3_OFFSET: usize = 0x14;

/// CR3: DMA enable transmitter
pub const USART_CR3_DMAT: u32 = 1 << 7;

/// USART1 register accessors
pub struct Usart1Regs;

impl Usart1Regs {
    /// Address of the data register, used as the fixed DMA destination
    pub const DR_ADDR: usize = USART1_BASE + USART_DR_OFFSET;

    reg_rw!(cr3, set_cr3, USART1_BASE, USART_CR3_OFFSET, "control register 3");
    reg_bit_ops!(
        enable_tx_dma,
        disable_tx_dma,
        USART1_BASE,
        USART_CR3_OFFSET,
        USART_CR3_DMAT,
        "transmit DMA requests",
        "Enable",
        "Disable"
    );
}
