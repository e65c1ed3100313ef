//! DMA2 stream 7 bound to USART1 transmit
//!
//! Programs the stream for memory-to-peripheral 8-bit transfers with memory
//! increment, FIFO at the configured threshold, and completion plus all
//! error interrupts enabled. The peripheral address is fixed to the USART1
//! data register; the memory address and item count are rewritten for every
//! transfer.

use core::sync::atomic::{Ordering, fence};

use embedded_hal::delay::DelayNs;

use super::nvic::NvicLine;
use super::{InterruptLine, TxStream};
use crate::driver::config::TxConfig;
use crate::driver::error::{ConfigError, ConfigResult};
use crate::driver::interrupt::InterruptStatus;
use crate::internal::constants::{
    DMA2_STREAM7_IRQ, MAX_DMA_TRANSFER, STREAM_STOP_POLL_US, USART1_TX_STREAM,
};
use crate::internal::register::DMA2_BASE;
use crate::internal::register::dma::{
    DmaStreamRegs, FLAG_ALL, SXCR_DIR_MEM_TO_PERIPHERAL, SXCR_DMEIE, SXCR_MINC, SXCR_MSIZE_8BIT,
    SXCR_PL_MASK, SXCR_PL_SHIFT, SXCR_PSIZE_8BIT, SXCR_TCIE, SXCR_TEIE, SXFCR_DMDIS, SXFCR_FEIE,
    SXFCR_FTH_MASK, SXFCR_FTH_SHIFT, sxcr_chsel,
};
use crate::internal::register::rcc::RccRegs;
use crate::internal::register::usart::Usart1Regs;

/// USART1 transmit stream (DMA2 stream 7, NVIC line 70)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usart1TxStream {
    regs: DmaStreamRegs,
    line: NvicLine,
}

impl Usart1TxStream {
    /// Create the stream handle. Const-compatible.
    pub const fn new() -> Self {
        Self {
            regs: DmaStreamRegs::new(DMA2_BASE, USART1_TX_STREAM),
            line: NvicLine::new(DMA2_STREAM7_IRQ),
        }
    }

    /// The NVIC line of the stream's interrupt
    pub const fn line(&self) -> NvicLine {
        self.line
    }

    /// Disable the stream and wait for the enable bit to read back clear
    fn stop<D: DelayNs>(&self, timeout_us: u32, delay: &mut D) -> ConfigResult<()> {
        self.regs.disable();

        let max_polls = timeout_us.div_ceil(STREAM_STOP_POLL_US);
        for _ in 0..max_polls {
            if !self.regs.is_enabled() {
                return Ok(());
            }
            delay.delay_us(STREAM_STOP_POLL_US);
        }

        if self.regs.is_enabled() {
            Err(ConfigError::StreamBusy)
        } else {
            Ok(())
        }
    }
}

impl Default for Usart1TxStream {
    fn default() -> Self {
        Self::new()
    }
}

/// Stream configuration register value for a USART TX stream
pub(crate) const fn control_bits(config: &TxConfig) -> u32 {
    SXCR_DMEIE
        | SXCR_TEIE
        | SXCR_TCIE
        | SXCR_DIR_MEM_TO_PERIPHERAL
        | SXCR_MINC
        | SXCR_PSIZE_8BIT
        | SXCR_MSIZE_8BIT
        | ((config.priority.to_bits() << SXCR_PL_SHIFT) & SXCR_PL_MASK)
        | sxcr_chsel(config.channel)
}

/// FIFO control register value for a USART TX stream
pub(crate) const fn fifo_bits(config: &TxConfig) -> u32 {
    SXFCR_DMDIS
        | ((config.fifo_threshold.to_bits() << SXFCR_FTH_SHIFT) & SXFCR_FTH_MASK)
        | SXFCR_FEIE
}

impl InterruptLine for Usart1TxStream {
    #[inline]
    fn mask(&self) -> bool {
        self.line.mask()
    }

    #[inline]
    fn unmask(&self) {
        self.line.unmask();
    }
}

impl TxStream for Usart1TxStream {
    #[inline]
    fn max_transfer(&self) -> usize {
        MAX_DMA_TRANSFER
    }

    fn configure<D: DelayNs>(&self, config: &TxConfig, delay: &mut D) -> ConfigResult<()> {
        RccRegs::enable_dma2_clock();
        Usart1Regs::enable_tx_dma();

        self.stop(config.stop_timeout_us, delay)?;

        self.regs.set_cr(0);
        self.regs.clear_flags(FLAG_ALL);
        self.regs.set_cr(control_bits(config));
        self.regs.set_ndtr(0);
        self.regs.set_par(Usart1Regs::DR_ADDR as u32);
        self.regs.set_fcr(fifo_bits(config));
        Ok(())
    }

    #[inline]
    fn is_enabled(&self) -> bool {
        self.regs.is_enabled()
    }

    #[inline]
    fn status(&self) -> InterruptStatus {
        InterruptStatus::from_raw(self.regs.flags())
    }

    #[inline]
    fn clear_status(&self, status: InterruptStatus) {
        self.regs.clear_flags(status.to_raw());
    }

    fn start(&self, source: *const u8, len: usize) {
        self.regs.set_m0ar(source as u32);
        self.regs.set_ndtr(len as u32);
        // Buffer writes must land before the stream starts reading
        fence(Ordering::SeqCst);
        self.regs.enable();
    }
}
