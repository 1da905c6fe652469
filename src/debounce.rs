//! Debounce helper for chatty form actions (save / test / toggle buttons).
//!
//! A `Debouncer` delays running a closure until a quiet period has elapsed
//! since the last trigger.  Re-triggering replaces the pending timeout, and
//! gloo's `Timeout` cancels itself on drop, so a storm of calls collapses to
//! exactly one invocation.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;

pub struct Debouncer {
    delay_ms: u32,
    pending: Rc<RefCell<Option<Timeout>>>,
}

impl Debouncer {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            pending: Rc::new(RefCell::new(None)),
        }
    }

    /// Schedule `f` to run after the quiet period.  Any previously scheduled
    /// call that has not fired yet is cancelled.
    pub fn call<F>(&self, f: F)
    where
        F: FnOnce() + 'static,
    {
        let slot = self.pending.clone();
        let timeout = Timeout::new(self.delay_ms, move || {
            // Clear our own handle first; dropping an already-fired Timeout
            // is a no-op.
            slot.borrow_mut().take();
            f();
        });
        *self.pending.borrow_mut() = Some(timeout);
    }

    /// Drop any pending invocation without running it.
    pub fn cancel(&self) {
        self.pending.borrow_mut().take();
    }
}
