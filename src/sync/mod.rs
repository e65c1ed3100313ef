//! Synchronization Support
//!
//! The transmit driver shares its ring cursors between foreground writers and
//! the DMA completion interrupt. Two primitives guard them:
//!
//! - `critical_section::with` for every read-modify-write of driver state
//!   (reservation, commit, the check-and-start interlock, completion). The
//!   critical-section implementation is supplied by the application's HAL or
//!   runtime crate.
//! - [`IrqGuard`] for read-only snapshots that only need the completion
//!   interrupt held off.

mod guard;

pub use guard::IrqGuard;
