use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical photo reference, ready for rendering. `url` is never empty;
/// anything failing that during normalization is dropped, not defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub url: String,
    pub thumbnail: String,
    pub caption: String,
}

// Alias field names probed in priority order. The remote source's schema is
// not contractually fixed, so each field may arrive under several names.
const URL_ALIASES: [&str; 4] = ["url", "downloadUrl", "webContentLink", "link"];
const THUMBNAIL_ALIASES: [&str; 3] = ["thumbnail", "thumbnailLink", "thumb"];
const CAPTION_ALIASES: [&str; 2] = ["name", "caption"];

/// The remote endpoint's response reduced to the shapes we recognize:
/// either a bare list of item-like objects, or an object wrapping one
/// under `items` or `files`. Everything else is `Unrecognized`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RemotePayload<'a> {
    BareList(&'a [Value]),
    WrappedItems(&'a [Value]),
    WrappedFiles(&'a [Value]),
    Unrecognized,
}

impl<'a> RemotePayload<'a> {
    /// Classify an arbitrary JSON value. Wrapper keys are probed in fixed
    /// priority order (`items`, then `files`); a key whose value is not an
    /// array does not match.
    pub fn classify(value: &'a Value) -> Self {
        if let Value::Array(list) = value {
            return RemotePayload::BareList(list);
        }
        if let Some(Value::Array(list)) = value.get("items") {
            return RemotePayload::WrappedItems(list);
        }
        if let Some(Value::Array(list)) = value.get("files") {
            return RemotePayload::WrappedFiles(list);
        }
        RemotePayload::Unrecognized
    }

    pub fn entries(&self) -> Option<&'a [Value]> {
        match self {
            RemotePayload::BareList(list)
            | RemotePayload::WrappedItems(list)
            | RemotePayload::WrappedFiles(list) => Some(list),
            RemotePayload::Unrecognized => None,
        }
    }
}

/// Map a remote payload into the canonical item list. Pure and
/// deterministic; preserves input order, never sorts or dedupes. Elements
/// with no resolvable URL are dropped. String content is trusted as-is:
/// the only validity check is non-emptiness of the URL.
pub fn normalize(payload: &Value) -> Vec<GalleryItem> {
    let Some(entries) = RemotePayload::classify(payload).entries() else {
        return Vec::new();
    };
    let mut items = Vec::with_capacity(entries.len());
    for entry in entries {
        if entry.is_null() {
            continue;
        }
        let Some(url) = first_string(entry, &URL_ALIASES).filter(|u| !u.is_empty()) else {
            continue;
        };
        let thumbnail = first_string(entry, &THUMBNAIL_ALIASES)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| url.clone());
        let caption = first_string(entry, &CAPTION_ALIASES).unwrap_or_default();
        items.push(GalleryItem { url, thumbnail, caption });
    }
    items
}

fn first_string(entry: &Value, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .find_map(|key| entry.get(key).and_then(Value::as_str))
        .map(str::to_string)
}
