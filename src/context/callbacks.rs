/*!
General callbacks associated with a context.

Callbacks may be mutable functions.
Still, information passed from the engine is non-mutable.
*/

use crate::{context::GenericContext, structures::literal::CLiteral};

/// Polled between pieces of work; returning true requests cooperative termination.
pub type CallbackTerminate = dyn FnMut() -> bool;

/// Receives each literal fixed at the root, in external form.
pub type CallbackFixed = dyn FnMut(i32);

impl<R: rand::Rng> GenericContext<R> {
    pub fn set_callback_terminate(&mut self, callback: Box<CallbackTerminate>) {
        self.callback_terminate = Some(callback);
    }

    /// Polls the termination callback, latching the result.
    pub fn check_callback_terminate(&mut self) -> bool {
        if let Some(callback) = &mut self.callback_terminate {
            if callback() {
                self.termination_forced = true;
            }
        }
        self.termination_forced
    }

    /// Whether cooperative termination has been requested.
    pub fn termination_forced(&self) -> bool {
        self.termination_forced
    }

    pub fn set_callback_fixed(&mut self, callback: Box<CallbackFixed>) {
        self.callback_fixed = Some(callback);
    }

    /// Reports a fixed literal to the callback, immediately.
    pub(crate) fn notify_fixed(&mut self, literal: CLiteral) {
        let external = self.externalize(literal);
        if let Some(callback) = &mut self.callback_fixed {
            callback(external);
        }
    }

    /// Reports every fixed literal still pending on the notification trail.
    pub fn notify_fixed_assignments(&mut self) {
        while self.trail.notified < self.trail.notify_trail.len() {
            let literal = self.trail.notify_trail[self.trail.notified];
            self.trail.notified += 1;
            self.notify_fixed(literal);
        }
    }
}
