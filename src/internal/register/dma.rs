//! DMA Controller Register Definitions
//!
//! Each STM32F2/F4 DMA controller has eight streams. A stream owns six
//! registers (configuration, item count, peripheral address, two memory
//! addresses, FIFO control); interrupt flags for all streams are packed into
//! two shared status registers with matching write-1-to-clear registers.

use super::{block_reg_rw, read_reg, write_reg};

// =============================================================================
// Register Offsets
// =============================================================================

/// Low Interrupt Status Register offset (streams 0-3)
pub const LISR_OFFSET: usize = 0x00;
/// High Interrupt Status Register offset (streams 4-7)
pub const HISR_OFFSET: usize = 0x04;
/// Low Interrupt Flag Clear Register offset (streams 0-3)
pub const LIFCR_OFFSET: usize = 0x08;
/// High Interrupt Flag Clear Register offset (streams 4-7)
pub const HIFCR_OFFSET: usize = 0x0C;

/// Offset of stream 0's register block
pub const STREAM0_OFFSET: usize = 0x10;
/// Distance between consecutive stream register blocks
pub const STREAM_STRIDE: usize = 0x18;

/// Stream Configuration Register offset (within a stream block)
pub const SXCR_OFFSET: usize = 0x00;
/// Stream Number of Data Register offset
pub const SXNDTR_OFFSET: usize = 0x04;
/// Stream Peripheral Address Register offset
pub const SXPAR_OFFSET: usize = 0x08;
/// Stream Memory 0 Address Register offset
pub const SXM0AR_OFFSET: usize = 0x0C;
/// Stream FIFO Control Register offset
pub const SXFCR_OFFSET: usize = 0x14;

/// Number of streams per controller
pub const STREAM_COUNT: usize = 8;

/// Bit position of each stream's flag group inside LISR/HISR (and the
/// clear registers), indexed by `stream % 4`.
pub const FLAG_SHIFTS: [u32; 4] = [0, 6, 16, 22];

// =============================================================================
// Stream Configuration Register (SxCR) Bits
// =============================================================================

/// Stream enable
pub const SXCR_EN: u32 = 1 << 0;
/// Direct mode error interrupt enable
pub const SXCR_DMEIE: u32 = 1 << 1;
/// Transfer error interrupt enable
pub const SXCR_TEIE: u32 = 1 << 2;
/// Half transfer interrupt enable
#[cfg(test)]
pub const SXCR_HTIE: u32 = 1 << 3;
/// Transfer complete interrupt enable
pub const SXCR_TCIE: u32 = 1 << 4;
/// Peripheral flow controller
#[cfg(test)]
pub const SXCR_PFCTRL: u32 = 1 << 5;
/// Data transfer direction shift
pub const SXCR_DIR_SHIFT: u32 = 6;
/// Data transfer direction: memory to peripheral
pub const SXCR_DIR_MEM_TO_PERIPHERAL: u32 = 0b01 << SXCR_DIR_SHIFT;
/// Circular mode
#[cfg(test)]
pub const SXCR_CIRC: u32 = 1 << 8;
/// Peripheral increment mode
#[cfg(test)]
pub const SXCR_PINC: u32 = 1 << 9;
/// Memory increment mode
pub const SXCR_MINC: u32 = 1 << 10;
/// Peripheral data size: 8 bits
pub const SXCR_PSIZE_8BIT: u32 = 0b00 << 11;
/// Memory data size: 8 bits
pub const SXCR_MSIZE_8BIT: u32 = 0b00 << 13;
/// Priority level shift
pub const SXCR_PL_SHIFT: u32 = 16;
/// Priority level mask
pub const SXCR_PL_MASK: u32 = 0b11 << SXCR_PL_SHIFT;
/// Channel selection shift
pub const SXCR_CHSEL_SHIFT: u32 = 25;
/// Channel selection mask
pub const SXCR_CHSEL_MASK: u32 = 0b111 << SXCR_CHSEL_SHIFT;

/// Build the CHSEL field for a request channel
#[inline(always)]
pub const fn sxcr_chsel(channel: u8) -> u32 {
    ((channel as u32) << SXCR_CHSEL_SHIFT) & SXCR_CHSEL_MASK
}

// =============================================================================
// Stream FIFO Control Register (SxFCR) Bits
// =============================================================================

/// FIFO threshold selection shift
pub const SXFCR_FTH_SHIFT: u32 = 0;
/// FIFO threshold selection mask
pub const SXFCR_FTH_MASK: u32 = 0b11;
/// Direct mode disable (1 = FIFO enabled)
pub const SXFCR_DMDIS: u32 = 1 << 2;
/// FIFO error interrupt enable
pub const SXFCR_FEIE: u32 = 1 << 7;

// =============================================================================
// Stream-normalized Interrupt Flags
// =============================================================================

/// FIFO error flag (relative to the stream's flag group)
pub const FLAG_FEIF: u32 = 1 << 0;
/// Direct mode error flag
pub const FLAG_DMEIF: u32 = 1 << 2;
/// Transfer error flag
pub const FLAG_TEIF: u32 = 1 << 3;
/// Half transfer flag
pub const FLAG_HTIF: u32 = 1 << 4;
/// Transfer complete flag
pub const FLAG_TCIF: u32 = 1 << 5;

/// All flags of one stream's group
pub const FLAG_ALL: u32 = FLAG_FEIF | FLAG_DMEIF | FLAG_TEIF | FLAG_HTIF | FLAG_TCIF;

// =============================================================================
// Register Access
// =============================================================================

/// Register accessor for one stream of a DMA controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmaStreamRegs {
    controller: usize,
    stream: usize,
}

impl DmaStreamRegs {
    /// Create an accessor for `stream` of the controller at `controller`
    ///
    /// Panics if `stream` is not one of the controller's streams.
    pub const fn new(controller: usize, stream: usize) -> Self {
        assert!(stream < STREAM_COUNT, "DMA stream index out of range");
        Self { controller, stream }
    }

    /// Stream number within its controller
    #[inline(always)]
    pub const fn stream(&self) -> usize {
        self.stream
    }

    /// Base address of the stream's register block
    #[inline(always)]
    const fn block_base(&self) -> usize {
        self.controller + STREAM0_OFFSET + STREAM_STRIDE * self.stream
    }

    /// Bit position of this stream's flag group
    #[inline(always)]
    pub const fn flag_shift(&self) -> u32 {
        FLAG_SHIFTS[self.stream % 4]
    }

    block_reg_rw!(cr, set_cr, SXCR_OFFSET, "stream configuration register");
    block_reg_rw!(ndtr, set_ndtr, SXNDTR_OFFSET, "stream number of data register");
    block_reg_rw!(par, set_par, SXPAR_OFFSET, "stream peripheral address register");
    block_reg_rw!(m0ar, set_m0ar, SXM0AR_OFFSET, "stream memory 0 address register");
    block_reg_rw!(fcr, set_fcr, SXFCR_OFFSET, "stream FIFO control register");

    /// Check whether the stream enable bit is set
    #[inline(always)]
    pub fn is_enabled(&self) -> bool {
        (self.cr() & SXCR_EN) != 0
    }

    /// Set the stream enable bit
    #[inline(always)]
    pub fn enable(&self) {
        self.set_cr(self.cr() | SXCR_EN);
    }

    /// Clear the stream enable bit
    #[inline(always)]
    pub fn disable(&self) {
        self.set_cr(self.cr() & !SXCR_EN);
    }

    /// Read this stream's interrupt flags in stream-normalized layout
    #[inline(always)]
    pub fn flags(&self) -> u32 {
        let offset = if self.stream < 4 { LISR_OFFSET } else { HISR_OFFSET };
        let raw = unsafe { read_reg(self.controller + offset) };
        (raw >> self.flag_shift()) & FLAG_ALL
    }

    /// Clear interrupt flags given in stream-normalized layout
    #[inline(always)]
    pub fn clear_flags(&self, flags: u32) {
        let offset = if self.stream < 4 { LIFCR_OFFSET } else { HIFCR_OFFSET };
        unsafe { write_reg(self.controller + offset, (flags & FLAG_ALL) << self.flag_shift()) }
    }
}
