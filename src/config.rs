use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Reserved prefix marking a value that has not been filled in yet.
const PLACEHOLDER_PREFIX: &str = "replace_";

/// Poll interval used when the configured value is absent or unusable.
pub const DEFAULT_REFRESH_MS: u64 = 30_000;

/// Returns true when `value` names a real endpoint rather than an empty or
/// placeholder string. Pure and total; the upload and gallery URLs are gated
/// independently because a deployment may have one wired up before the other.
pub fn is_configured(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return false;
    }
    !trimmed.to_ascii_lowercase().starts_with(PLACEHOLDER_PREFIX)
}

/// Raw file shape; everything optional so a partial config still loads.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    upload_url: Option<String>,
    gallery_url: Option<String>,
    refresh_ms: Option<i64>,
}

/// Widget endpoints and poll interval. Read once at startup and never
/// mutated afterwards; shared via `Arc` by everything that needs it.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub upload_url: String,
    pub gallery_url: String,
    pub refresh_ms: u64,
}

impl EndpointConfig {
    /// Load from a TOML file, then apply `SNAPFEED_*` environment overrides.
    /// A missing file is not an error; it just leaves the widget unconfigured.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let raw = match path {
            Some(p) if p.exists() => {
                let text = std::fs::read_to_string(p)
                    .with_context(|| format!("reading config file: {}", p.display()))?;
                toml::from_str(&text)
                    .with_context(|| format!("parsing config file: {}", p.display()))?
            }
            _ => RawConfig::default(),
        };
        let env_ms = std::env::var("SNAPFEED_REFRESH_MS").ok().and_then(|s| s.parse().ok());
        Ok(Self::from_parts(
            std::env::var("SNAPFEED_UPLOAD_URL").ok().or(raw.upload_url),
            std::env::var("SNAPFEED_GALLERY_URL").ok().or(raw.gallery_url),
            env_ms.or(raw.refresh_ms),
        ))
    }

    /// Resolve optional inputs into a complete config. A missing or
    /// non-positive interval falls back to the default.
    pub fn from_parts(
        upload_url: Option<String>,
        gallery_url: Option<String>,
        refresh_ms: Option<i64>,
    ) -> Self {
        let refresh_ms = match refresh_ms {
            Some(n) if n > 0 => n as u64,
            _ => DEFAULT_REFRESH_MS,
        };
        Self {
            upload_url: upload_url.unwrap_or_default(),
            gallery_url: gallery_url.unwrap_or_default(),
            refresh_ms,
        }
    }

    pub fn upload_configured(&self) -> bool { is_configured(&self.upload_url) }
    pub fn gallery_configured(&self) -> bool { is_configured(&self.gallery_url) }
    pub fn refresh_interval(&self) -> Duration { Duration::from_millis(self.refresh_ms) }
}
