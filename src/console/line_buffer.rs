//! Lock-free SPSC input line ring.
//!
//! ```text
//! UART IRQ ──▶ LineProducer ──▶ [ring] ──▶ LineConsumer ──▶ reader
//!              (head, ready)               (tail, reset)
//! ```
//!
//! The ring accumulates characters until a carriage return arrives or the
//! ring fills, then flags the line `ready`. The consumer drains it one
//! character at a time; once `tail` catches up with `head` both cursors and
//! the flag go back to zero for the next line.
//!
//! # Memory Ordering
//!
//! `head`, `tail`, `ready` and a producer epoch share one `AtomicU64`, so
//! every transition (including the consumer's reset of `head`) is a single
//! compare-and-swap against the exact state it was computed from.
//! - Producer stores the slot `Relaxed`, then publishes with `AcqRel` CAS
//! - Consumer loads the state `Acquire` before reading a slot
//! - The epoch changes on every producer mutation, so an erase followed by
//!   a retype between the consumer's slot read and its CAS is detected

use core::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};

use crate::config::CONSOLE_BUF_SIZE;
use crate::wait::{wait_until, Spin, Waiter};

/// Carriage return: terminates a line.
pub const LINE_TERMINATOR: u8 = b'\r';

const HEAD_SHIFT: u32 = 0;
const TAIL_SHIFT: u32 = 16;
const READY_BIT: u64 = 1 << 32;
const EPOCH_SHIFT: u32 = 33;
const EPOCH_MASK: u64 = (1 << 31) - 1;

/// Snapshot of the ring cursors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineState {
    head: u16,
    tail: u16,
    ready: bool,
    epoch: u32,
}

impl LineState {
    const EMPTY: Self = Self {
        head: 0,
        tail: 0,
        ready: false,
        epoch: 0,
    };

    fn unpack(raw: u64) -> Self {
        Self {
            head: (raw >> HEAD_SHIFT) as u16,
            tail: (raw >> TAIL_SHIFT) as u16,
            ready: raw & READY_BIT != 0,
            epoch: ((raw >> EPOCH_SHIFT) & EPOCH_MASK) as u32,
        }
    }

    fn pack(self) -> u64 {
        let ready = if self.ready { READY_BIT } else { 0 };
        ((self.head as u64) << HEAD_SHIFT)
            | ((self.tail as u64) << TAIL_SHIFT)
            | ready
            | (((self.epoch as u64) & EPOCH_MASK) << EPOCH_SHIFT)
    }

    /// Next write position.
    pub fn head(&self) -> usize {
        self.head as usize
    }

    /// Next read position.
    pub fn tail(&self) -> usize {
        self.tail as usize
    }

    /// A complete line (or a full ring) is waiting.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Unread characters.
    pub fn len(&self) -> usize {
        self.head.wrapping_sub(self.tail) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Cursors at zero and no line pending.
    pub fn is_reset(&self) -> bool {
        self.head == 0 && self.tail == 0 && !self.ready
    }

    /// Producer-side successor: bumps the epoch.
    fn produced(self, head: u16, ready: bool) -> Self {
        Self {
            head,
            ready,
            epoch: self.epoch.wrapping_add(1),
            ..self
        }
    }
}

/// Fixed-capacity input ring shared by one producer and one consumer.
///
/// `N` must be a power of two no larger than 2^15 so that the wrapping
/// 16-bit cursors map onto slots consistently.
pub struct LineQueue<const N: usize = CONSOLE_BUF_SIZE> {
    slots: [AtomicU8; N],
    state: AtomicU64,
    split: AtomicBool,
}

impl<const N: usize> LineQueue<N> {
    /// Mask for wrapping a cursor to a slot.
    const MASK: usize = N - 1;

    /// Create an empty ring.
    ///
    /// # Panics
    ///
    /// Panics at compile time if N is not a power of 2 or exceeds 2^15.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Line buffer size must be power of 2");
        assert!(N <= 1 << 15, "Line buffer size must fit 15-bit cursors");

        const EMPTY_SLOT: AtomicU8 = AtomicU8::new(0);

        Self {
            slots: [EMPTY_SLOT; N],
            state: AtomicU64::new(0),
            split: AtomicBool::new(false),
        }
    }

    /// Hand out the producer and consumer handles.
    ///
    /// Succeeds once; later calls return `None`.
    pub fn split(&self) -> Option<(LineProducer<'_, N>, LineConsumer<'_, N>)> {
        if self.split.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some((LineProducer { queue: self }, LineConsumer { queue: self }))
    }

    /// Current cursors.
    pub fn snapshot(&self) -> LineState {
        LineState::unpack(self.state.load(Ordering::Acquire))
    }

    /// Get the buffer capacity.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    #[inline]
    fn slot(&self, cursor: u16) -> &AtomicU8 {
        &self.slots[cursor as usize & Self::MASK]
    }

    #[inline]
    fn load(&self) -> LineState {
        LineState::unpack(self.state.load(Ordering::Acquire))
    }

    /// Publish `next` if the state is still `current`; on failure return
    /// what it actually is.
    #[inline]
    fn publish(&self, current: LineState, next: LineState) -> Result<(), LineState> {
        self.state
            .compare_exchange(current.pack(), next.pack(), Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(LineState::unpack)
    }
}

impl<const N: usize> Default for LineQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of [`LineProducer::push`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Push {
    /// Stored; `ready` tells whether this character completed a line.
    Stored { ready: bool },
    /// Ring full, character discarded.
    Dropped,
}

/// Writing end of a [`LineQueue`]. Owned by the receive path.
pub struct LineProducer<'a, const N: usize = CONSOLE_BUF_SIZE> {
    queue: &'a LineQueue<N>,
}

impl<'a, const N: usize> LineProducer<'a, N> {
    /// True if another character would be dropped.
    pub fn is_full(&self) -> bool {
        self.queue.load().len() >= N
    }

    /// True if there is an unread character to erase.
    pub fn can_erase(&self) -> bool {
        !self.queue.load().is_empty()
    }

    /// Append `c`.
    ///
    /// Flags the line ready when `c` is the terminator or the ring becomes
    /// exactly full. A terminator that also fills the ring is no different
    /// from a fill without one.
    pub fn push(&mut self, c: u8) -> Push {
        let mut current = self.queue.load();
        loop {
            let len = current.len();
            if len >= N {
                return Push::Dropped;
            }

            // Slot at head is outside [tail, head): the consumer never reads it.
            self.queue.slot(current.head).store(c, Ordering::Relaxed);

            let completes = c == LINE_TERMINATOR || len + 1 == N;
            let next = current.produced(current.head.wrapping_add(1), current.ready || completes);

            match self.queue.publish(current, next) {
                Ok(()) => return Push::Stored { ready: completes },
                // Consumer advanced or reset: retry against the new head.
                Err(actual) => current = actual,
            }
        }
    }

    /// Remove the most recently pushed unread character.
    ///
    /// Returns `false` (and changes nothing) when nothing is unread.
    pub fn erase(&mut self) -> bool {
        let mut current = self.queue.load();
        loop {
            if current.is_empty() {
                return false;
            }

            let next = current.produced(current.head.wrapping_sub(1), current.ready);
            match self.queue.publish(current, next) {
                Ok(()) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    /// The ring this handle writes to.
    pub fn queue(&self) -> &'a LineQueue<N> {
        self.queue
    }
}

/// Reading end of a [`LineQueue`].
pub struct LineConsumer<'a, const N: usize = CONSOLE_BUF_SIZE> {
    queue: &'a LineQueue<N>,
}

impl<'a, const N: usize> LineConsumer<'a, N> {
    /// True when a line is waiting to be read.
    pub fn line_ready(&self) -> bool {
        self.queue.load().is_ready()
    }

    /// Take one character of the pending line without blocking.
    ///
    /// Returns `None` while no line is ready. Reading the last unread
    /// character resets the ring for the next line.
    pub fn try_read_char(&mut self) -> Option<u8> {
        self.take().map(|(c, _)| c)
    }

    /// One character plus whether taking it drained the line.
    fn take(&mut self) -> Option<(u8, bool)> {
        let mut current = self.queue.load();
        loop {
            if !current.ready {
                return None;
            }

            if current.is_empty() {
                // Everything flagged ready was erased again: re-arm.
                let next = LineState {
                    epoch: current.epoch,
                    ..LineState::EMPTY
                };
                match self.queue.publish(current, next) {
                    Ok(()) => return None,
                    Err(actual) => {
                        current = actual;
                        continue;
                    }
                }
            }

            let c = self.queue.slot(current.tail).load(Ordering::Relaxed);

            let tail = current.tail.wrapping_add(1);
            let drained = tail == current.head;
            let next = if drained {
                LineState {
                    epoch: current.epoch,
                    ..LineState::EMPTY
                }
            } else {
                LineState { tail, ..current }
            };

            match self.queue.publish(current, next) {
                Ok(()) => return Some((c, drained)),
                // Producer moved underneath us; the slot read may be stale.
                Err(actual) => current = actual,
            }
        }
    }

    fn take_with(&mut self, waiter: &mut dyn Waiter) -> (u8, bool) {
        loop {
            wait_until(|| self.queue.load().is_ready(), waiter);
            if let Some(taken) = self.take() {
                return taken;
            }
        }
    }

    /// Block on `waiter` until a line is ready, then take one character.
    pub fn read_char_with(&mut self, waiter: &mut dyn Waiter) -> u8 {
        self.take_with(waiter).0
    }

    /// Spin until a line is ready, then take one character.
    ///
    /// Blocks forever if no line is ever terminated and the ring never fills.
    pub fn read_char(&mut self) -> u8 {
        self.read_char_with(&mut Spin)
    }

    /// Read the pending line into `buf`.
    ///
    /// Stops when the ring resets (the line is fully drained) or `buf` is
    /// full, and returns the number of bytes stored. The terminator, if
    /// any, is included.
    pub fn read_line_with(&mut self, buf: &mut [u8], waiter: &mut dyn Waiter) -> usize {
        let mut count = 0;
        while count < buf.len() {
            let (c, drained) = self.take_with(waiter);
            buf[count] = c;
            count += 1;
            if drained {
                break;
            }
        }
        count
    }

    /// [`read_line_with`](Self::read_line_with) using a spin wait.
    pub fn read_line(&mut self, buf: &mut [u8]) -> usize {
        self.read_line_with(buf, &mut Spin)
    }

    /// The ring this handle reads from.
    pub fn queue(&self) -> &'a LineQueue<N> {
        self.queue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_pack_roundtrip() {
        let state = LineState {
            head: 0xbeef,
            tail: 0x1234,
            ready: true,
            epoch: EPOCH_MASK as u32,
        };
        assert_eq!(LineState::unpack(state.pack()), state);
        assert_eq!(LineState::unpack(0), LineState::EMPTY);
    }

    #[test]
    fn test_split_once() {
        let queue = LineQueue::<8>::new();
        assert!(queue.split().is_some());
        assert!(queue.split().is_none());
    }

    #[test]
    fn test_push_read_line() {
        let queue = LineQueue::<8>::new();
        let (mut tx, mut rx) = queue.split().unwrap();

        assert_eq!(tx.push(b'o'), Push::Stored { ready: false });
        assert_eq!(tx.push(b'k'), Push::Stored { ready: false });
        assert_eq!(rx.try_read_char(), None);
        assert_eq!(tx.push(b'\r'), Push::Stored { ready: true });

        assert_eq!(rx.try_read_char(), Some(b'o'));
        assert_eq!(rx.try_read_char(), Some(b'k'));
        assert_eq!(rx.try_read_char(), Some(b'\r'));
        assert!(queue.snapshot().is_reset());
        assert_eq!(rx.try_read_char(), None);
    }

    #[test]
    fn test_epoch_advances_on_erase_and_retype() {
        let queue = LineQueue::<8>::new();
        let (mut tx, _rx) = queue.split().unwrap();

        tx.push(b'a');
        let before = queue.snapshot();
        assert!(tx.erase());
        tx.push(b'b');
        let after = queue.snapshot();

        assert_eq!(before.head(), after.head());
        assert_ne!(before.pack(), after.pack());
    }

    #[test]
    fn test_ready_then_erased_rearms() {
        let queue = LineQueue::<8>::new();
        let (mut tx, mut rx) = queue.split().unwrap();

        tx.push(b'\r');
        assert!(tx.erase());
        assert!(queue.snapshot().is_ready());

        assert_eq!(rx.try_read_char(), None);
        assert!(queue.snapshot().is_reset());
    }

    #[test]
    fn test_cursor_wraparound() {
        let queue = LineQueue::<4>::new();
        let (mut tx, mut rx) = queue.split().unwrap();

        // Keep two characters unread so the cursors never reset, and run
        // them past the 16-bit boundary.
        tx.push(b'a');
        tx.push(b'\r');
        assert_eq!(rx.try_read_char(), Some(b'a'));
        assert_eq!(rx.try_read_char(), Some(b'\r'));
        assert!(queue.snapshot().is_reset());

        let letter = |k: u32| b'a' + (k % 26) as u8;
        tx.push(b'\r');
        tx.push(letter(0));
        for i in 1..70_000u32 {
            assert_eq!(tx.push(letter(i)), Push::Stored { ready: false });
            let expected = if i == 1 { b'\r' } else { letter(i - 2) };
            assert_eq!(rx.try_read_char(), Some(expected));
        }

        let state = queue.snapshot();
        assert_eq!(state.len(), 2);
        assert!(state.is_ready());
        assert_eq!(state.head(), 70_001 % 65_536);
    }
}
