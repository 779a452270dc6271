use std::path::PathBuf;

use tracing::warn;

use crate::payload::GalleryItem;

/// One rendered gallery cell: a link to the full asset wrapping its
/// thumbnail, with a caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub href: String,
    pub thumbnail: String,
    pub caption: String,
}

/// Build display tiles from canonical items, in input order. Items without
/// a caption of their own get an implicit 1-indexed one.
pub fn tiles(items: &[GalleryItem]) -> Vec<Tile> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| Tile {
            href: item.url.clone(),
            thumbnail: item.thumbnail.clone(),
            caption: if item.caption.is_empty() {
                format!("Wedding photo {}", i + 1)
            } else {
                item.caption.clone()
            },
        })
        .collect()
}

/// Format tiles as a self-contained HTML fragment. Every call is a full
/// repaint; the caller replaces prior markup wholesale. Repaint frequency
/// is bounded by the refresh interval, so no diffing is done.
pub fn html_fragment(tiles: &[Tile]) -> String {
    let mut out = String::from("<div class=\"gallery-grid\">\n");
    for tile in tiles {
        out.push_str("  <a class=\"gallery-tile\" href=\"");
        out.push_str(&escape(&tile.href));
        out.push_str("\" target=\"_blank\" rel=\"noopener\">\n    <img src=\"");
        out.push_str(&escape(&tile.thumbnail));
        out.push_str("\" alt=\"");
        out.push_str(&escape(&tile.caption));
        out.push_str("\" loading=\"lazy\">\n    <span class=\"gallery-caption\">");
        out.push_str(&escape(&tile.caption));
        out.push_str("</span>\n  </a>\n");
    }
    out.push_str("</div>\n");
    out
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// The two page surfaces the widget owns: the tile container, fully
/// replaced on every render, and the single status line, overwritten on
/// every transition.
pub trait GalleryView: Send {
    fn show_tiles(&mut self, tiles: &[Tile]);
    fn set_status(&mut self, message: &str);
    fn clear_status(&mut self);
}

/// View that writes the rendered fragment and the status line to files,
/// for embedding by a static page. Write failures are logged, never fatal.
pub struct HtmlFileView {
    gallery_path: PathBuf,
    status_path: PathBuf,
}

impl HtmlFileView {
    pub fn new(gallery_path: PathBuf, status_path: PathBuf) -> Self {
        Self { gallery_path, status_path }
    }

    fn write(&self, path: &std::path::Path, contents: &str) {
        if let Err(e) = std::fs::write(path, contents) {
            warn!(path = %path.display(), error = %e, "failed to write view file");
        }
    }
}

impl GalleryView for HtmlFileView {
    fn show_tiles(&mut self, tiles: &[Tile]) {
        self.write(&self.gallery_path, &html_fragment(tiles));
    }

    fn set_status(&mut self, message: &str) {
        self.write(&self.status_path, message);
    }

    fn clear_status(&mut self) {
        self.write(&self.status_path, "");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(url: &str, caption: &str) -> GalleryItem {
        GalleryItem {
            url: url.to_string(),
            thumbnail: url.to_string(),
            caption: caption.to_string(),
        }
    }

    #[test]
    fn implicit_captions_are_one_indexed() {
        let out = tiles(&[item("https://x/1.jpg", ""), item("https://x/2.jpg", "")]);
        assert_eq!(out[0].caption, "Wedding photo 1");
        assert_eq!(out[1].caption, "Wedding photo 2");
    }

    #[test]
    fn own_captions_are_kept() {
        let out = tiles(&[item("https://x/1.jpg", "First look")]);
        assert_eq!(out[0].caption, "First look");
    }

    #[test]
    fn fragment_contains_one_tile_per_item_in_order() {
        let out = html_fragment(&tiles(&[item("https://x/1.jpg", ""), item("https://x/2.jpg", "")]));
        assert_eq!(out.matches("gallery-tile").count(), 2);
        let first = out.find("https://x/1.jpg").unwrap();
        let second = out.find("https://x/2.jpg").unwrap();
        assert!(first < second);
    }

    #[test]
    fn fragment_escapes_markup_in_remote_strings() {
        let out = html_fragment(&tiles(&[item("https://x/1.jpg?a=1&b=2", "<b>hi</b>")]));
        assert!(out.contains("a=1&amp;b=2"));
        assert!(out.contains("&lt;b&gt;hi&lt;/b&gt;"));
        assert!(!out.contains("<b>hi</b>"));
    }

    #[test]
    fn empty_list_renders_an_empty_grid() {
        let out = html_fragment(&[]);
        assert!(out.contains("gallery-grid"));
        assert!(!out.contains("gallery-tile"));
    }
}
