pub mod bridge;
pub mod config;
pub mod payload;
pub mod render;
pub mod source;
pub mod sync;

#[cfg(test)]
pub(crate) mod testutil;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::bridge::{UploadBridge, UPLOAD_EVENT};
    pub use crate::config::{is_configured, EndpointConfig, DEFAULT_REFRESH_MS};
    pub use crate::payload::{normalize, GalleryItem, RemotePayload};
    pub use crate::render::{html_fragment, tiles, GalleryView, HtmlFileView, Tile};
    pub use crate::source::{FetchError, HttpSource, PhotoSource};
    pub use crate::sync::{RefreshOutcome, SyncController, SyncStatus};
    pub use crate::{GalleryWidget, UploadSurface};
}

use std::sync::Arc;

use anyhow::Result;

use crate::bridge::UploadBridge;
use crate::config::EndpointConfig;
use crate::render::GalleryView;
use crate::source::{HttpSource, PhotoSource};
use crate::sync::SyncController;

/// What the embedding page should do with the upload area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadSurface {
    /// Frame this URL as-is.
    Embedded(String),
    /// Not wired up yet; show a coming-soon note instead.
    ComingSoon,
}

/// Widget entry point. Owns the endpoint configuration and the sync
/// controller; build one per embedded gallery.
pub struct GalleryWidget {
    config: Arc<EndpointConfig>,
    controller: Arc<SyncController>,
}

impl GalleryWidget {
    /// Build a widget that polls the gallery endpoint over HTTP.
    pub fn new(config: EndpointConfig, view: Box<dyn GalleryView>) -> Result<Self> {
        let source = Arc::new(HttpSource::new()?);
        Ok(Self::with_source(config, source, view))
    }

    /// Build a widget with a custom payload source.
    pub fn with_source(
        config: EndpointConfig,
        source: Arc<dyn PhotoSource>,
        view: Box<dyn GalleryView>,
    ) -> Self {
        let config = Arc::new(config);
        let controller = Arc::new(SyncController::new(Arc::clone(&config), source, view));
        Self { config, controller }
    }

    pub fn config(&self) -> &EndpointConfig { &self.config }
    pub fn controller(&self) -> &Arc<SyncController> { &self.controller }

    /// How the page should present the upload area. Gated independently of
    /// the gallery endpoint.
    pub fn upload_surface(&self) -> UploadSurface {
        if self.config.upload_configured() {
            UploadSurface::Embedded(self.config.upload_url.clone())
        } else {
            UploadSurface::ComingSoon
        }
    }

    /// Listener for the upload surface's cross-origin notifications.
    pub fn bridge(&self) -> UploadBridge {
        UploadBridge::new(Arc::clone(&self.controller))
    }

    /// Initial load plus the recurring poll. Returns the timer task handle
    /// when one was started (never for an unconfigured gallery URL).
    pub async fn start(&self) -> Option<tokio::task::JoinHandle<()>> {
        let _ = self.controller.refresh().await;
        self.controller.spawn_timer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::SyncStatus;
    use crate::testutil::{RecordingView, ScriptedSource};
    use serde_json::json;

    #[tokio::test]
    async fn end_to_end_load_with_gated_upload_surface() {
        let config = EndpointConfig::from_parts(
            Some("".to_string()),
            Some("https://x/g".to_string()),
            Some(30_000),
        );
        let source = Arc::new(ScriptedSource::ok(json!({
            "items": [{"url": "https://x/1.jpg"}]
        })));
        let view = RecordingView::default();
        let widget = GalleryWidget::with_source(
            config,
            Arc::clone(&source) as Arc<dyn PhotoSource>,
            Box::new(view.clone()),
        );

        assert_eq!(widget.upload_surface(), UploadSurface::ComingSoon);

        let timer = widget.start().await;
        assert!(timer.is_some());
        timer.unwrap().abort();

        assert!(source.urls()[0].starts_with("https://x/g?t="));
        assert_eq!(widget.controller().status(), SyncStatus::Loaded);
        let renders = view.renders();
        assert_eq!(renders.len(), 1);
        assert_eq!(renders[0][0].caption, "Wedding photo 1");
        assert_eq!(view.last_status(), Some(String::new()));
    }

    #[tokio::test]
    async fn configured_upload_surface_is_embedded_as_is() {
        let config = EndpointConfig::from_parts(
            Some("https://script.google.com/macros/s/abc/exec".to_string()),
            None,
            None,
        );
        let source = Arc::new(ScriptedSource::ok(json!([])));
        let widget = GalleryWidget::with_source(
            config,
            source as Arc<dyn PhotoSource>,
            Box::new(RecordingView::default()),
        );
        assert_eq!(
            widget.upload_surface(),
            UploadSurface::Embedded("https://script.google.com/macros/s/abc/exec".to_string())
        );
        // Gallery side stays unconfigured and never starts polling.
        assert!(widget.start().await.is_none());
    }
}
