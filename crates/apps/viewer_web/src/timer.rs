use std::fmt;
use std::time::Duration;

use runtime::IntervalTimer;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// `setInterval`-backed timer. The tick callback lives as long as the timer.
pub struct BrowserInterval {
    handle: Option<i32>,
    on_tick: Closure<dyn FnMut()>,
}

impl BrowserInterval {
    pub fn new(on_tick: impl FnMut() + 'static) -> Self {
        Self {
            handle: None,
            on_tick: Closure::<dyn FnMut()>::new(on_tick),
        }
    }
}

impl fmt::Debug for BrowserInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowserInterval")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

impl IntervalTimer for BrowserInterval {
    fn start(&mut self, period: Duration) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let period_ms = i32::try_from(period.as_millis()).unwrap_or(i32::MAX);
        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            self.on_tick.as_ref().unchecked_ref(),
            period_ms,
        ) {
            Ok(handle) => self.handle = Some(handle),
            Err(err) => web_sys::console::error_2(&JsValue::from_str("setInterval failed:"), &err),
        }
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Some(window) = web_sys::window() {
                window.clear_interval_with_handle(handle);
            }
        }
    }

    fn is_active(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for BrowserInterval {
    fn drop(&mut self) {
        self.cancel();
    }
}
