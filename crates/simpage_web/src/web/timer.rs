//! Single-shot playback timer on top of `setTimeout`.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::timers::callback::Timeout;

use simpage::playback::{ScheduledTick, TickToken};

pub type TickHandler = Rc<dyn Fn(TickToken)>;

/// Shared slot for the handler; filled once the page controller exists.
pub type HandlerSlot = Rc<RefCell<Option<TickHandler>>>;

type Pending = Rc<RefCell<Option<(TickToken, Timeout)>>>;

/// At most one timeout in flight. Replacing or canceling it clears the browser
/// timer, so a stale token only reaches the controller if the timer already fired.
pub struct TickTimer {
    handler: HandlerSlot,
    pending: Pending,
}

impl TickTimer {
    pub fn new(handler: HandlerSlot) -> Self {
        Self {
            handler,
            pending: Rc::new(RefCell::new(None)),
        }
    }

    pub fn schedule(&mut self, tick: ScheduledTick) {
        let handler = self.handler.clone();
        let pending = Rc::downgrade(&self.pending);
        let token = tick.token;

        let timeout = Timeout::new(tick.delay_ms, move || {
            // Keep the fired timeout alive until the handler returns.
            let _fired = pending.upgrade().and_then(|p| {
                let mut p = p.borrow_mut();
                match p.as_ref() {
                    Some((t, _)) if *t == token => p.take(),
                    _ => None,
                }
            });
            let handler = handler.borrow().clone();
            if let Some(handler) = handler {
                handler(token);
            }
        });

        let replaced = self.pending.borrow_mut().replace((token, timeout));
        if let Some((old, _)) = replaced {
            tracing::trace!(token = old.id(), "replaced pending tick");
        }
    }

    pub fn cancel(&mut self, token: TickToken) {
        let mut pending = self.pending.borrow_mut();
        if matches!(pending.as_ref(), Some((t, _)) if *t == token) {
            if let Some((_, timeout)) = pending.take() {
                drop(timeout.cancel());
            }
        }
    }
}
