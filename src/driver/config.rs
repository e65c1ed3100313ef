//! Configuration types for the USART DMA transmit driver

use crate::driver::error::{ConfigError, ConfigResult};
use crate::internal::constants::{DEFAULT_DMA_CHANNEL, MAX_DMA_CHANNEL, STREAM_STOP_TIMEOUT_US};

/// DMA stream priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DmaPriority {
    /// Low priority (default; console output rarely needs more)
    #[default]
    Low = 0,
    /// Medium priority
    Medium = 1,
    /// High priority
    High = 2,
    /// Very high priority
    VeryHigh = 3,
}

impl DmaPriority {
    /// Convert to the 2-bit PL field value
    #[must_use]
    pub const fn to_bits(self) -> u32 {
        self as u32
    }
}

/// FIFO threshold at which the stream drains its FIFO to the peripheral
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FifoThreshold {
    /// 1/4 full
    Quarter = 0,
    /// 1/2 full (default)
    #[default]
    Half = 1,
    /// 3/4 full
    ThreeQuarters = 2,
    /// Full
    Full = 3,
}

impl FifoThreshold {
    /// Convert to the 2-bit FTH field value
    #[must_use]
    pub const fn to_bits(self) -> u32 {
        self as u32
    }
}

/// Transfer engine configuration
///
/// Defaults match USART1 TX on DMA2 stream 7: request channel 4, low
/// priority, FIFO enabled at half threshold.
///
/// # Example
///
/// ```ignore
/// let config = TxConfig::new()
///     .with_priority(DmaPriority::Medium)
///     .with_fifo_threshold(FifoThreshold::Full);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxConfig {
    /// DMA request channel (CHSEL) that routes the USART TX request
    pub channel: u8,
    /// Stream priority
    pub priority: DmaPriority,
    /// FIFO threshold
    pub fifo_threshold: FifoThreshold,
    /// Time allowed for the stream to stop before reprogramming, in µs
    pub stop_timeout_us: u32,
}

impl TxConfig {
    /// Create a configuration with default values
    #[must_use]
    pub const fn new() -> Self {
        Self {
            channel: DEFAULT_DMA_CHANNEL,
            priority: DmaPriority::Low,
            fifo_threshold: FifoThreshold::Half,
            stop_timeout_us: STREAM_STOP_TIMEOUT_US,
        }
    }

    /// Set the DMA request channel
    #[must_use]
    pub const fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel;
        self
    }

    /// Set the stream priority
    #[must_use]
    pub const fn with_priority(mut self, priority: DmaPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the FIFO threshold
    #[must_use]
    pub const fn with_fifo_threshold(mut self, threshold: FifoThreshold) -> Self {
        self.fifo_threshold = threshold;
        self
    }

    /// Set the stream stop timeout in microseconds
    #[must_use]
    pub const fn with_stop_timeout_us(mut self, timeout_us: u32) -> Self {
        self.stop_timeout_us = timeout_us;
        self
    }

    /// Check the configuration for out-of-range values
    pub const fn validate(&self) -> ConfigResult<()> {
        if self.channel > MAX_DMA_CHANNEL {
            return Err(ConfigError::InvalidChannel);
        }
        if self.stop_timeout_us == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for TxConfig {
    fn default() -> Self {
        Self::new()
    }
}
