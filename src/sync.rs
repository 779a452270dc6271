use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::EndpointConfig;
use crate::payload::normalize;
use crate::render::{tiles, GalleryView};
use crate::source::PhotoSource;

/// Sync state. Exactly one holds at any time; it drives the single
/// status message shown to the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Unconfigured,
    Loading,
    Loaded,
    Empty,
    Error,
}

/// What a single refresh attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Dropped: endpoint unconfigured, or another fetch was in flight.
    Skipped,
    Loaded(usize),
    Empty,
    Failed,
}

pub(crate) const MSG_UNCONFIGURED: &str = "Photo gallery coming soon!";
pub(crate) const MSG_LOADING: &str = "Loading photos...";
pub(crate) const MSG_EMPTY: &str = "No photos yet. Check back soon!";
pub(crate) const MSG_ERROR: &str = "We can't load the gallery right now. Please try again later.";
pub(crate) const MSG_UPDATING: &str = "Updating gallery...";

/// Scoped hold on the single in-flight slot. Released on drop, so the
/// flag cannot leak on an early-return path.
struct FlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> FlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

struct ViewState {
    status: SyncStatus,
    view: Box<dyn GalleryView>,
}

/// Owns refresh scheduling, the in-flight guard, and all status
/// transitions. Constructed once per widget; the type makes no global
/// uniqueness assumption, a host may build several.
pub struct SyncController {
    config: Arc<EndpointConfig>,
    source: Arc<dyn PhotoSource>,
    in_flight: AtomicBool,
    state: Mutex<ViewState>,
}

impl SyncController {
    /// Starts in `Unconfigured` when the gallery URL fails the config
    /// gate; that state is terminal for the widget's lifetime. Otherwise
    /// starts in `Loading`.
    pub fn new(
        config: Arc<EndpointConfig>,
        source: Arc<dyn PhotoSource>,
        view: Box<dyn GalleryView>,
    ) -> Self {
        let mut state = ViewState { status: SyncStatus::Loading, view };
        if config.gallery_configured() {
            state.view.set_status(MSG_LOADING);
        } else {
            state.status = SyncStatus::Unconfigured;
            state.view.set_status(MSG_UNCONFIGURED);
        }
        Self {
            config,
            source,
            in_flight: AtomicBool::new(false),
            state: Mutex::new(state),
        }
    }

    pub fn status(&self) -> SyncStatus {
        self.state.lock().unwrap().status
    }

    /// One refresh attempt. A trigger landing while another fetch is in
    /// flight is dropped, not queued; the next timer tick or notification
    /// picks up any missed state naturally. An `Empty` or failed attempt
    /// leaves previously rendered tiles untouched.
    pub async fn refresh(&self) -> RefreshOutcome {
        if self.status() == SyncStatus::Unconfigured {
            return RefreshOutcome::Skipped;
        }
        let Some(_guard) = FlightGuard::acquire(&self.in_flight) else {
            debug!("refresh dropped, fetch already in flight");
            return RefreshOutcome::Skipped;
        };
        self.transition(SyncStatus::Loading);
        let url = cache_busted(&self.config.gallery_url);
        match self.source.fetch_payload(&url).await {
            Ok(payload) => {
                let items = normalize(&payload);
                if items.is_empty() {
                    self.transition(SyncStatus::Empty);
                    RefreshOutcome::Empty
                } else {
                    let count = items.len();
                    let rendered = tiles(&items);
                    let mut state = self.state.lock().unwrap();
                    state.status = SyncStatus::Loaded;
                    state.view.show_tiles(&rendered);
                    state.view.clear_status();
                    debug!(count, "gallery rendered");
                    RefreshOutcome::Loaded(count)
                }
            }
            Err(err) => {
                // Technical detail goes to the log; the visitor only ever
                // sees the generic message.
                warn!(error = %err, "gallery fetch failed");
                self.transition(SyncStatus::Error);
                RefreshOutcome::Failed
            }
        }
    }

    /// Recurring poll at the configured interval. Never started for an
    /// unconfigured gallery URL. Ticks that land while a fetch is in
    /// flight are skipped rather than queued.
    pub fn spawn_timer(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.gallery_configured() {
            return None;
        }
        let controller = Arc::clone(self);
        let period = controller.config.refresh_interval();
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick fires immediately; the startup refresh
            // already covers it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let _ = controller.refresh().await;
            }
        }))
    }

    /// Run a refresh after `delay`. Used by the upload bridge to let the
    /// upload surface finish its save-then-redirect sequence before the
    /// poll lands.
    pub fn schedule_refresh(self: &Arc<Self>, delay: Duration) -> JoinHandle<()> {
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = controller.refresh().await;
        })
    }

    /// Overwrite the status line without changing the sync state.
    pub(crate) fn set_message(&self, message: &str) {
        self.state.lock().unwrap().view.set_status(message);
    }

    fn transition(&self, next: SyncStatus) {
        let mut state = self.state.lock().unwrap();
        state.status = next;
        match next {
            SyncStatus::Unconfigured => state.view.set_status(MSG_UNCONFIGURED),
            SyncStatus::Loading => state.view.set_status(MSG_LOADING),
            SyncStatus::Loaded => state.view.clear_status(),
            SyncStatus::Empty => state.view.set_status(MSG_EMPTY),
            SyncStatus::Error => state.view.set_status(MSG_ERROR),
        }
        debug!(status = ?next, "status transition");
    }
}

/// Append a timestamped query parameter so intermediate caches never
/// serve a stale copy. Joined with `&` when the URL already has a query
/// string, else `?`.
pub(crate) fn cache_busted(url: &str) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}t={}", current_epoch_ms())
}

fn current_epoch_ms() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}
