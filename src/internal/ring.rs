//! Byte ring buffer shared between transmit writers and the DMA engine.
//!
//! The ring tracks four cursors into `storage`, all in `[0, N)`:
//!
//! - `read`: first byte not yet confirmed sent by the DMA engine
//! - `reserved`: end of the space handed out to writers
//! - `published`: end of the bytes writers have finished copying
//! - `in_flight`: length of the run most recently given to the engine
//!
//! Space between `published` and `reserved` belongs to writers that are
//! still copying and is never handed to the engine. At most `N - 1` bytes are
//! live, so `read == reserved` always means empty.
//!
//! Cursors are only updated inside an atomic section; callers prove this by
//! passing a [`CriticalSection`] token. Only plain atomic loads and stores are
//! used, so the ring works on cores without compare-and-swap.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicUsize, Ordering};

use critical_section::CriticalSection;

// =============================================================================
// Cursor Arithmetic
// =============================================================================

/// Number of bytes between `read` and `write` in a ring of `cap` bytes
#[inline(always)]
pub(crate) const fn occupancy(read: usize, write: usize, cap: usize) -> usize {
    if write >= read {
        write - read
    } else {
        cap - (read - write)
    }
}

/// Length of the contiguous run starting at `read`
///
/// Stops at `write` when it lies ahead, otherwise at the physical end of the
/// storage. The remainder past the end is picked up by the next run.
#[inline(always)]
pub(crate) const fn contiguous_run(read: usize, write: usize, cap: usize) -> usize {
    if read < write { write - read } else { cap - read }
}

/// Move a cursor forward by `n`, wrapping at `cap`
#[inline(always)]
pub(crate) const fn advance(cursor: usize, n: usize, cap: usize) -> usize {
    (cursor + n) % cap
}

/// Split a region of `len` bytes at `start` into the part up to the end of
/// storage and the part that wraps to index 0
#[inline(always)]
pub(crate) const fn split_at_wrap(start: usize, len: usize, cap: usize) -> (usize, usize) {
    let to_end = cap - start;
    if len <= to_end { (len, 0) } else { (to_end, len - to_end) }
}

// =============================================================================
// Reservation
// =============================================================================

/// A region of the ring handed to one writer
///
/// Must be filled and then committed exactly once.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "an uncommitted reservation blocks publication of later writes"]
pub(crate) struct Reservation {
    start: usize,
    len: usize,
}

impl Reservation {
    /// Index of the first reserved byte
    #[cfg(test)]
    pub(crate) const fn start(&self) -> usize {
        self.start
    }

    /// Number of reserved bytes
    pub(crate) const fn len(&self) -> usize {
        self.len
    }
}

// =============================================================================
// Transmit Ring
// =============================================================================

/// Fixed-capacity transmit ring of `N` bytes
pub(crate) struct TxRing<const N: usize> {
    storage: UnsafeCell<[u8; N]>,
    read: AtomicUsize,
    reserved: AtomicUsize,
    published: AtomicUsize,
    open_reservations: AtomicUsize,
    in_flight: AtomicUsize,
}

// SAFETY: cursor updates happen inside critical sections; storage regions are
// partitioned by cursors so writers and the DMA engine never alias a byte.
unsafe impl<const N: usize> Sync for TxRing<N> {}

impl<const N: usize> TxRing<N> {
    /// Create an empty ring. Const-compatible.
    pub(crate) const fn new() -> Self {
        const { assert!(N >= 2, "transmit ring needs at least two bytes") };
        Self {
            storage: UnsafeCell::new([0u8; N]),
            read: AtomicUsize::new(0),
            reserved: AtomicUsize::new(0),
            published: AtomicUsize::new(0),
            open_reservations: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Reset every cursor to 0 (empty)
    pub(crate) fn reset(&self, _cs: CriticalSection<'_>) {
        self.read.store(0, Ordering::Relaxed);
        self.reserved.store(0, Ordering::Relaxed);
        self.published.store(0, Ordering::Relaxed);
        self.open_reservations.store(0, Ordering::Relaxed);
        self.in_flight.store(0, Ordering::Relaxed);
    }

    /// Bytes reserved or queued but not yet confirmed sent
    ///
    /// Reads two cursors; the caller must keep the completion handler from
    /// running in between.
    #[inline]
    pub(crate) fn pending(&self) -> usize {
        let read = self.read.load(Ordering::Acquire);
        let reserved = self.reserved.load(Ordering::Acquire);
        occupancy(read, reserved, N)
    }

    /// Bytes a writer could reserve right now
    #[inline]
    pub(crate) fn free(&self) -> usize {
        N - 1 - self.pending()
    }

    /// Whether published bytes are waiting to be handed to the engine
    #[inline]
    pub(crate) fn has_unsent(&self) -> bool {
        self.read.load(Ordering::Acquire) != self.published.load(Ordering::Acquire)
    }

    /// Length of the run most recently handed to the engine
    #[cfg(test)]
    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Reserve up to `n` bytes for a writer
    ///
    /// Returns `None` when `n` is 0 or the ring is full.
    pub(crate) fn reserve(&self, _cs: CriticalSection<'_>, n: usize) -> Option<Reservation> {
        let len = n.min(self.free());
        if len == 0 {
            return None;
        }

        let start = self.reserved.load(Ordering::Relaxed);
        self.reserved.store(advance(start, len, N), Ordering::Release);
        let open = self.open_reservations.load(Ordering::Relaxed);
        self.open_reservations.store(open + 1, Ordering::Relaxed);

        Some(Reservation { start, len })
    }

    /// Copy `data` into a reserved region, wrapping at the end of storage
    ///
    /// Runs outside any atomic section. Only the first `reservation.len()`
    /// bytes of `data` are used.
    pub(crate) fn fill(&self, reservation: &Reservation, data: &[u8]) {
        let data = &data[..reservation.len];
        let (first, second) = split_at_wrap(reservation.start, reservation.len, N);
        let base = self.storage.get().cast::<u8>();

        // SAFETY: the reservation owns [start, start + len) modulo N. No other
        // writer holds it and the engine never reads past `published`.
        unsafe {
            core::ptr::copy_nonoverlapping(data.as_ptr(), base.add(reservation.start), first);
            if second > 0 {
                core::ptr::copy_nonoverlapping(data.as_ptr().add(first), base, second);
            }
        }
    }

    /// Close a reservation
    ///
    /// When the last open reservation closes, everything reserved so far
    /// becomes visible to the transfer scheduler. A nested writer that
    /// finishes first therefore waits for the writer it preempted.
    pub(crate) fn commit(&self, _cs: CriticalSection<'_>, _reservation: Reservation) {
        let open = self.open_reservations.load(Ordering::Relaxed) - 1;
        self.open_reservations.store(open, Ordering::Relaxed);
        if open == 0 {
            let reserved = self.reserved.load(Ordering::Relaxed);
            self.published.store(reserved, Ordering::Release);
        }
    }

    /// Take the next contiguous run of published bytes, at most `max` long
    ///
    /// Records the run length as in flight and returns the address of its
    /// first byte. Must only be called when [`has_unsent`](Self::has_unsent)
    /// is true.
    pub(crate) fn next_run(&self, _cs: CriticalSection<'_>, max: usize) -> (*const u8, usize) {
        let read = self.read.load(Ordering::Relaxed);
        let published = self.published.load(Ordering::Acquire);
        let len = contiguous_run(read, published, N).min(max);
        self.in_flight.store(len, Ordering::Release);

        let base = self.storage.get().cast::<u8>().cast_const();
        // SAFETY: read < N, so the pointer stays inside storage.
        (unsafe { base.add(read) }, len)
    }

    /// Retire the in-flight run after the engine reports completion
    pub(crate) fn complete_run(&self, _cs: CriticalSection<'_>) {
        let read = self.read.load(Ordering::Relaxed);
        let sent = self.in_flight.load(Ordering::Relaxed);
        self.read.store(advance(read, sent, N), Ordering::Release);
    }

    /// Address of the first storage byte
    #[cfg(test)]
    pub(crate) fn base_ptr(&self) -> *const u8 {
        self.storage.get().cast::<u8>().cast_const()
    }
}

// =============================================================================
// Tests
// =============================================================================
