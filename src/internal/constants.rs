//! Centralized Constants
//!
//! Defaults and timing values used by the transmit driver. Register bit
//! definitions live with their register blocks in `internal::register`.

// =============================================================================
// Buffer
// =============================================================================

/// Default transmit buffer length in bytes
pub const DEFAULT_TX_BUFFER_LEN: usize = 1024;

// =============================================================================
// DMA Stream Defaults
// =============================================================================

/// DMA request channel that routes USART1_TX to DMA2 stream 7
pub const DEFAULT_DMA_CHANNEL: u8 = 4;

/// Highest valid DMA request channel number
pub const MAX_DMA_CHANNEL: u8 = 7;

/// Largest item count the 16-bit NDTR register can hold
pub const MAX_DMA_TRANSFER: usize = 0xFFFF;

/// DMA2 stream feeding USART1_TX
pub const USART1_TX_STREAM: usize = 7;

/// NVIC interrupt number of DMA2 stream 7
pub const DMA2_STREAM7_IRQ: u16 = 70;

// =============================================================================
// Timing
// =============================================================================

/// Default time allowed for a stream to report disabled, in microseconds
pub const STREAM_STOP_TIMEOUT_US: u32 = 1_000;

/// Poll interval while waiting for the stream enable bit to clear
pub const STREAM_STOP_POLL_US: u32 = 10;
