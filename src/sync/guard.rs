//! Scoped interrupt-line masking.

use crate::hal::InterruptLine;

/// Masks one interrupt line for as long as the guard lives.
///
/// On drop the line is unmasked only if it was unmasked when the guard was
/// created, so guards can nest and an inner guard never re-enables the
/// interrupt under an outer one. Release happens on every exit path,
/// including early returns and `?`.
///
/// # Example
///
/// ```ignore
/// let pending = {
///     let _guard = IrqGuard::new(&stream);
///     ring.pending()
/// };
/// ```
#[must_use = "the interrupt is unmasked again as soon as the guard is dropped"]
pub struct IrqGuard<'a, L: InterruptLine + ?Sized> {
    line: &'a L,
    was_unmasked: bool,
}

impl<'a, L: InterruptLine + ?Sized> IrqGuard<'a, L> {
    /// Mask `line` until the returned guard is dropped
    #[inline]
    pub fn new(line: &'a L) -> Self {
        let was_unmasked = line.mask();
        Self { line, was_unmasked }
    }
}

impl<L: InterruptLine + ?Sized> Drop for IrqGuard<'_, L> {
    #[inline]
    fn drop(&mut self) {
        if self.was_unmasked {
            self.line.unmask();
        }
    }
}
