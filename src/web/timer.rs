//! `setTimeout`-backed [`Scheduler`] for the browser.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Weak;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::SharedState;
use crate::coordinator::{Scheduler, TimerId};

pub(crate) struct TimeoutScheduler {
    target: Weak<RefCell<SharedState>>,
    timers: HashMap<TimerId, (i32, Closure<dyn FnMut()>)>,
    /// Closure of the timer currently running. Dropped on the next fire so it
    /// is never freed while executing.
    retired: Option<Closure<dyn FnMut()>>,
}

impl TimeoutScheduler {
    pub(crate) fn new(target: Weak<RefCell<SharedState>>) -> Self {
        Self {
            target,
            timers: HashMap::new(),
            retired: None,
        }
    }
}

impl Scheduler for TimeoutScheduler {
    fn schedule(&mut self, id: TimerId, delay_ms: u32) {
        let Some(window) = web_sys::window() else {
            tracing::error!(id, "no window; deferred command dropped");
            return;
        };
        let target = Weak::clone(&self.target);
        let closure = Closure::wrap(Box::new(move || {
            SharedState::fire(&target, id);
        }) as Box<dyn FnMut()>);
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay,
        ) {
            Ok(handle) => {
                self.timers.insert(id, (handle, closure));
            }
            Err(e) => tracing::error!(id, error = ?e, "setTimeout failed"),
        }
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some((handle, _closure)) = self.timers.remove(&id) {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(handle);
            }
        }
    }

    fn fired(&mut self, id: TimerId) {
        self.retired = self.timers.remove(&id).map(|(_, closure)| closure);
    }
}

impl Drop for TimeoutScheduler {
    fn drop(&mut self) {
        let ids: Vec<TimerId> = self.timers.keys().copied().collect();
        for id in ids {
            self.cancel(id);
        }
    }
}
