//! `window`-backed dialogs, timers and navigation.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::host::{Navigator, Notifier, Timer, TimerError};

/// `alert` / `confirm` dialogs.
#[derive(Debug, Clone)]
pub struct WindowNotifier {
    window: Window,
}

impl WindowNotifier {
    /// Create a notifier for a window.
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Notifier for WindowNotifier {
    fn notify(&self, message: &str) {
        let _ = self.window.alert_with_message(message);
    }

    fn confirm(&self, message: &str) -> bool {
        self.window.confirm_with_message(message).unwrap_or(false)
    }
}

/// `setTimeout` timers.
#[derive(Debug, Clone)]
pub struct WindowTimer {
    window: Window,
}

impl WindowTimer {
    /// Create a timer for a window.
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Timer for WindowTimer {
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> Result<(), TimerError> {
        let slot = Rc::new(RefCell::new(Some(callback)));
        let pending = Rc::clone(&slot);
        let js_callback = Closure::once_into_js(move || {
            let callback = pending.borrow_mut().take();
            if let Some(callback) = callback {
                callback();
            }
        });
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);

        let scheduled = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                js_callback.unchecked_ref(),
                millis,
            );
        if let Err(err) = scheduled {
            let callback = slot.borrow_mut().take();
            if let Some(callback) = callback {
                callback();
            }
            return Err(TimerError(format!("{:?}", err)));
        }
        Ok(())
    }
}

/// `location.reload()` navigation.
#[derive(Debug, Clone)]
pub struct WindowNavigator {
    window: Window,
}

impl WindowNavigator {
    /// Create a navigator for a window.
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Navigator for WindowNavigator {
    fn reload(&self) {
        let _ = self.window.location().reload();
    }
}
