//! NVIC interrupt line control

use super::InterruptLine;
use crate::internal::register::nvic::NvicRegs;

/// One interrupt line of the Cortex-M NVIC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NvicLine {
    irq: u16,
}

impl NvicLine {
    /// Create a handle for interrupt number `irq`
    pub const fn new(irq: u16) -> Self {
        Self { irq }
    }

    /// Interrupt number
    pub const fn irq(&self) -> u16 {
        self.irq
    }
}

impl InterruptLine for NvicLine {
    fn mask(&self) -> bool {
        let was_enabled = NvicRegs::is_enabled(self.irq);
        NvicRegs::disable(self.irq);
        barrier();
        was_enabled
    }

    fn unmask(&self) {
        barrier();
        NvicRegs::enable(self.irq);
    }
}

/// Make an NVIC enable/disable take effect before the next instruction
#[inline(always)]
fn barrier() {
    // SAFETY: DSB/ISB only order memory accesses and flush the pipeline.
    #[cfg(target_arch = "arm")]
    unsafe {
        core::arch::asm!("dsb", "isb", options(nostack, preserves_flags));
    };
    #[cfg(not(target_arch = "arm"))]
    core::sync::atomic::compiler_fence(core::sync::atomic::Ordering::SeqCst);
}
