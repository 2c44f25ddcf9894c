//! Background work for the UI thread.
//!
//! A task pushes its result into a [`TaskSlot`] and requests a repaint; the
//! frame loop takes results out on the next update, oldest first. Native
//! builds run each task on its own thread with a fresh tokio runtime, wasm
//! builds use `spawn_local`.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use eframe::egui;

/// `Send` where tasks run on other threads; nothing on wasm.
#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSend: Send {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send> MaybeSend for T {}

#[cfg(target_arch = "wasm32")]
pub trait MaybeSend {}
#[cfg(target_arch = "wasm32")]
impl<T> MaybeSend for T {}

/// Finished task results waiting for the frame loop.
pub struct TaskSlot<T> {
    inner: Arc<Mutex<VecDeque<T>>>,
}

impl<T> Clone for TaskSlot<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for TaskSlot<T> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::new())),
        }
    }
}

impl<T> TaskSlot<T> {
    fn guard(&self) -> MutexGuard<'_, VecDeque<T>> {
        // A panicking task leaves at most a stale value behind.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn put(&self, value: T) {
        self.guard().push_back(value);
    }

    pub fn take(&self) -> Option<T> {
        self.guard().pop_front()
    }
}

/// Returns an error when the task could not be started; its result will
/// then never arrive.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_task<T, F, Fut>(slot: &TaskSlot<T>, ctx: &egui::Context, make: F) -> Result<(), String>
where
    T: Send + 'static,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = T> + 'static,
{
    let rt = tokio::runtime::Runtime::new().map_err(|e| {
        tracing::error!(error = %e, "could not start task runtime");
        format!("could not start background task: {e}")
    })?;
    let slot = slot.clone();
    let ctx = ctx.clone();
    std::thread::spawn(move || {
        let value = rt.block_on(make());
        slot.put(value);
        ctx.request_repaint();
    });
    Ok(())
}

#[cfg(target_arch = "wasm32")]
pub fn spawn_task<T, F, Fut>(slot: &TaskSlot<T>, ctx: &egui::Context, make: F) -> Result<(), String>
where
    T: 'static,
    F: FnOnce() -> Fut + 'static,
    Fut: Future<Output = T> + 'static,
{
    let slot = slot.clone();
    let ctx = ctx.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let value = make().await;
        slot.put(value);
        ctx.request_repaint();
    });
    Ok(())
}
