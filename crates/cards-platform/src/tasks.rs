//! Task spawning and timers on the browser event loop.

use futures::future::LocalBoxFuture;
use gloo_timers::future::TimeoutFuture;

use cards_core::ports::TaskPort;

/// Spawns onto the page's microtask queue; timers are `setTimeout`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTasks;

impl TaskPort for BrowserTasks {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }

    fn sleep(&self, ms: u64) -> LocalBoxFuture<'static, ()> {
        let millis = u32::try_from(ms).unwrap_or(u32::MAX);
        Box::pin(TimeoutFuture::new(millis))
    }
}
