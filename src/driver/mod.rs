//! Core driver components for the USART transmit path.
//!
//! - [`config`] - Transfer engine configuration and builder
//! - [`error`] - Setup errors, faults and result aliases
//! - [`interrupt`] - Decoded stream interrupt flags
//! - [`tx`] - The transmit driver: writer, scheduler and completion handler
//!
//! # Example
//!
//! ```ignore
//! use usart_dma_tx::driver::{TxConfig, DmaPriority};
//!
//! let config = TxConfig::new().with_priority(DmaPriority::Medium);
//! ```

// Submodules
pub mod config;
pub mod error;
pub mod interrupt;
pub mod tx;

// Re-exports for convenience
pub use config::{DmaPriority, FifoThreshold, TxConfig};
pub use error::{ConfigError, ConfigResult, Fault, FaultResult};
pub use interrupt::InterruptStatus;
pub use tx::{UsartTx, UsartTxDefault};
