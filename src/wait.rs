//! Blocking points.
//!
//! Every place the console has to wait (transmitter ready, line ready) is a
//! predicate polled through a [`Waiter`]. The default [`Spin`] waiter issues a
//! spin-loop hint; a kernel can plug in `wfi`, a scheduler yield, or anything
//! else that eventually lets the predicate change.

/// Called between polls of a wait predicate.
pub trait Waiter {
    fn wait(&mut self);
}

/// Busy-wait with a spin-loop hint.
#[derive(Clone, Copy, Debug, Default)]
pub struct Spin;

impl Waiter for Spin {
    #[inline(always)]
    fn wait(&mut self) {
        core::hint::spin_loop();
    }
}

/// Block until `ready()` holds.
///
/// There is no timeout: a predicate that never becomes true hangs the caller.
#[inline]
pub fn wait_until(mut ready: impl FnMut() -> bool, waiter: &mut dyn Waiter) {
    while !ready() {
        waiter.wait();
    }
}
