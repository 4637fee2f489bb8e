// src/specs/media.rs
//
// Where the store keeps product photos. The Magento media tree serves
// the same image under several layouts (plain, catalog/product,
// cache/N, and the a/b/ first-letter shards); we try the direct "xl"
// views in preference order and reject the uniform placeholder frame.

use std::error::Error;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::consts::{MEDIA_HOST, PLACEHOLDER_MAX_VARIANCE, PREFER_XL_ORDER};
use crate::core::net::Http;
use crate::file::sanitize_code_filename;

/// Anything that can produce a photo for an article code.
/// The packaging engine only sees this seam, so tests run offline.
pub trait ImageSource: Send + Sync {
    /// Returns (bytes, miss_reason). Exactly one side is Some.
    fn fetch(&self, code: &str) -> (Option<Vec<u8>>, Option<String>);
}

pub struct StoreImages {
    http: Http,
}

impl StoreImages {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        Ok(Self { http: Http::new()? })
    }

    /// Try every candidate URL in view-preference order.
    /// Returns (url, bytes, miss_reason); the reason is always set when
    /// nothing was found.
    pub fn fetch_best(&self, code: &str) -> (Option<String>, Option<Vec<u8>>, Option<String>) {
        let mut last_err = "no_direct_xl_image_found";
        for xl in PREFER_XL_ORDER {
            for url in candidate_urls(code, xl) {
                let Some(bytes) = self.http.get_image_bytes(&url) else {
                    last_err = "download_failed_or_not_image";
                    continue;
                };
                if is_placeholder(&bytes) {
                    last_err = "placeholder_detected";
                    continue;
                }
                return (Some(url), Some(bytes), None);
            }
        }
        (None, None, Some(s!(last_err)))
    }
}

impl ImageSource for StoreImages {
    fn fetch(&self, code: &str) -> (Option<Vec<u8>>, Option<String>) {
        let (_url, bytes, err) = self.fetch_best(code);
        (bytes, err)
    }
}

/* ---------- URL building ---------- */

static CACHE_SEG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(/media/catalog/product)/cache/[^/]+/").expect("valid regex")
});

/// Drop query/fragment, unescape JSON slashes, collapse the Magento
/// cache segment so all cache variants point at the original file.
pub fn decache(url: &str) -> String {
    let url = url.replace("\\/", "/");
    let url = strip_query(&url);
    CACHE_SEG.replace_all(&url, "$1/").into_owned()
}

pub fn strip_query(url: &str) -> String {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    s!(&url[..end])
}

/// All plausible direct-media URLs for one code and one xl view,
/// deduplicated in order.
pub fn candidate_urls(code: &str, xl_num: u32) -> Vec<String> {
    let prefix = sanitize_code_filename(code);
    let filenames = [
        format!("{prefix}-xl_{xl_num}.jpg"),
        format!("{prefix}-xl_{xl_num}_1.jpg"),
        format!("{prefix}-xl_{xl_num}_2.jpg"),
    ];

    let bases = [
        join!(MEDIA_HOST, "/media/"),
        join!(MEDIA_HOST, "/media/catalog/product/"),
        join!(MEDIA_HOST, "/media/catalog/product/cache/"),
        join!(MEDIA_HOST, "/media/catalog/product/cache/1/"),
        join!(MEDIA_HOST, "/media/catalog/product/cache/2/"),
        join!(MEDIA_HOST, "/media/catalog/product/cache/3/"),
    ];

    let mut chars = prefix.chars();
    let a = chars.next().map(|c| c.to_ascii_lowercase()).unwrap_or('x');
    let b = chars.next().map(|c| c.to_ascii_lowercase()).unwrap_or('x');

    let mut out: Vec<String> = Vec::new();
    for base in &bases {
        for f in &filenames {
            push_unique(&mut out, decache(&join!(base.as_str(), f)));
        }
        for f in &filenames {
            push_unique(&mut out, decache(&format!("{base}{a}/{b}/{f}")));
        }
    }
    out
}

fn push_unique(out: &mut Vec<String>, url: String) {
    if !out.contains(&url) {
        out.push(url);
    }
}

/* ---------- placeholder detection ---------- */

/// The store placeholder is a near-uniform frame: shrink, grayscale,
/// and call anything with tiny pixel variance a non-photo.
pub fn is_placeholder(img_bytes: &[u8]) -> bool {
    let Ok(im) = image::load_from_memory(img_bytes) else {
        return false;
    };
    let small = image::imageops::resize(&im.to_rgb8(), 90, 90, image::imageops::FilterType::Triangle);

    let n = (small.width() * small.height()) as f64;
    let mut sum = 0.0;
    for p in small.pixels() {
        sum += gray(p);
    }
    let mean = sum / n;
    let mut var = 0.0;
    for p in small.pixels() {
        let d = gray(p) - mean;
        var += d * d;
    }
    var / n < PLACEHOLDER_MAX_VARIANCE
}

fn gray(p: &image::Rgb<u8>) -> f64 {
    ((p.0[0] as u32 + p.0[1] as u32 + p.0[2] as u32) / 3) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(img: &image::RgbImage) -> Vec<u8> {
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn decache_collapses_cache_segment() {
        let url = "https:\\/\\/www.barcastores.com\\/media\\/catalog\\/product\\/cache\\/abc123\\/1\\/2\\/x.jpg?v=1";
        assert_eq!(
            decache(url),
            "https://www.barcastores.com/media/catalog/product/1/2/x.jpg"
        );
    }

    #[test]
    fn strip_query_handles_fragment() {
        assert_eq!(strip_query("http://h/p.jpg?a=1"), "http://h/p.jpg");
        assert_eq!(strip_query("http://h/p.jpg#frag"), "http://h/p.jpg");
        assert_eq!(strip_query("http://h/p.jpg"), "http://h/p.jpg");
    }

    #[test]
    fn candidates_start_with_plain_media_base() {
        let urls = candidate_urls("12/AB123", 5);
        assert_eq!(urls[0], "https://www.barcastores.com/media/12_AB123-xl_5.jpg");
        // sharded layout uses the first two prefix chars, lowercased
        assert!(urls.contains(&s!("https://www.barcastores.com/media/1/2/12_AB123-xl_5.jpg")));
    }

    #[test]
    fn candidates_are_unique() {
        let urls = candidate_urls("12/AB123", 5);
        let mut dedup = urls.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), urls.len());
        // the cache/1..3 bases all collapse onto catalog/product, which
        // the list already holds exactly once
        let product = "https://www.barcastores.com/media/catalog/product/12_AB123-xl_5.jpg";
        assert_eq!(urls.iter().filter(|u| u.as_str() == product).count(), 1);
    }

    #[test]
    fn uniform_frame_is_placeholder() {
        let img = image::RgbImage::from_pixel(120, 120, image::Rgb([230, 230, 230]));
        assert!(is_placeholder(&png_bytes(&img)));
    }

    #[test]
    fn busy_image_is_not_placeholder() {
        let img = image::RgbImage::from_fn(120, 120, |x, y| {
            if (x / 8 + y / 8) % 2 == 0 {
                image::Rgb([0, 0, 0])
            } else {
                image::Rgb([255, 255, 255])
            }
        });
        assert!(!is_placeholder(&png_bytes(&img)));
    }

    #[test]
    fn garbage_bytes_are_not_placeholder() {
        assert!(!is_placeholder(b"not an image"));
    }
}
