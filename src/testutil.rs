use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{Notify, Semaphore};

use crate::render::{GalleryView, Tile};
use crate::source::{FetchError, PhotoSource};

/// Records everything the controller pushes at the page surfaces.
#[derive(Clone, Default)]
pub(crate) struct RecordingView {
    inner: Arc<Mutex<Recorded>>,
}

#[derive(Default)]
struct Recorded {
    renders: Vec<Vec<Tile>>,
    statuses: Vec<String>,
}

impl RecordingView {
    pub(crate) fn renders(&self) -> Vec<Vec<Tile>> {
        self.inner.lock().unwrap().renders.clone()
    }

    /// Last status line written; a cleared status records as "".
    pub(crate) fn last_status(&self) -> Option<String> {
        self.inner.lock().unwrap().statuses.last().cloned()
    }

    pub(crate) fn statuses(&self) -> Vec<String> {
        self.inner.lock().unwrap().statuses.clone()
    }
}

impl GalleryView for RecordingView {
    fn show_tiles(&mut self, tiles: &[Tile]) {
        self.inner.lock().unwrap().renders.push(tiles.to_vec());
    }

    fn set_status(&mut self, message: &str) {
        self.inner.lock().unwrap().statuses.push(message.to_string());
    }

    fn clear_status(&mut self) {
        self.inner.lock().unwrap().statuses.push(String::new());
    }
}

/// Scripted stand-in for the HTTP source. Replays a queue of responses,
/// falling back to a fixed one when the queue runs dry, and can gate its
/// first call to hold a fetch in flight.
pub(crate) struct ScriptedSource {
    queue: Mutex<VecDeque<Result<Value, FetchError>>>,
    fallback: Result<Value, FetchError>,
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
    entered: Notify,
    release: Semaphore,
    gate_pending: AtomicBool,
}

impl ScriptedSource {
    fn base(fallback: Result<Value, FetchError>) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback,
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
            entered: Notify::new(),
            release: Semaphore::new(0),
            gate_pending: AtomicBool::new(false),
        }
    }

    /// Same successful payload on every call.
    pub(crate) fn ok(value: Value) -> Self {
        Self::base(Ok(value))
    }

    /// Same failure on every call.
    pub(crate) fn failing(err: FetchError) -> Self {
        Self::base(Err(err))
    }

    /// Replay `responses` in order, then empty lists.
    pub(crate) fn with_responses(responses: Vec<Result<Value, FetchError>>) -> Self {
        let source = Self::base(Ok(Value::Array(Vec::new())));
        *source.queue.lock().unwrap() = responses.into();
        source
    }

    /// First call blocks at its suspend point until `release`; later
    /// calls pass straight through.
    pub(crate) fn gated(value: Value) -> Self {
        let source = Self::base(Ok(value));
        source.gate_pending.store(true, Ordering::SeqCst);
        source
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }

    /// Wait until a gated fetch has started.
    pub(crate) async fn entered(&self) {
        self.entered.notified().await;
    }

    pub(crate) fn release(&self) {
        self.release.add_permits(1);
    }
}

#[async_trait]
impl PhotoSource for ScriptedSource {
    async fn fetch_payload(&self, url: &str) -> Result<Value, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        if self.gate_pending.swap(false, Ordering::SeqCst) {
            self.entered.notify_one();
            let _permit = self.release.acquire().await.expect("gate semaphore closed");
        }
        if let Some(next) = self.queue.lock().unwrap().pop_front() {
            return next;
        }
        self.fallback.clone()
    }
}
