//! RCC Register Definitions
//!
//! The transmit setup only needs the AHB1 peripheral clock enable register.

use super::{RCC_BASE, reg_bit_ops};

/// AHB1 Peripheral Clock Enable Register offset
pub const RCC_AHB1ENR_OFFSET: usize = 0x30;

/// AHB1ENR: DMA2 clock enable
pub const RCC_AHB1ENR_DMA2EN: u32 = 1 << 22;

/// RCC register accessors
pub struct RccRegs;

impl RccRegs {
    reg_bit_ops!(
        enable_dma2_clock,
        disable_dma2_clock,
        RCC_BASE,
        RCC_AHB1ENR_OFFSET,
        RCC_AHB1ENR_DMA2EN,
        "DMA2 clock",
        "Enable",
        "Disable"
    );
}
