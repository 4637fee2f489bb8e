// src/catalog/layout.rs
//
// A6 card: photo on top (never upscaled), bordered info box below.
// 1240x1748 @ 300 dpi prints four cards per A4 sheet.

use std::error::Error;
use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use imageproc::rect::Rect;

use crate::catalog::item::CatalogItem;
use crate::config::consts::{
    BORDER_W, CANVAS_H, CANVAS_W, INFO_BORDER_W, JPG_QUALITY, MARGIN, PHOTO_H,
};
use crate::core::num::fmt_f64;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

// Card type scale, in pixels
const PX_HEADER: f32 = 56.0;
const PX_DESC: f32 = 40.0;
const PX_INFO: f32 = 34.0;
const PX_MISSING: f32 = 36.0;

/* ---------- font loading ---------- */

/// Same discovery strategy on every platform: explicit path, then the
/// BARCA_FONT variable, then the usual system font locations.
const FONT_SEARCH: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-fonts/LiberationSans-Regular.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\calibri.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
];

pub struct CardFont {
    font: FontVec,
}

impl CardFont {
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let data = std::fs::read(path)
            .map_err(|e| format!("Cannot read font {}: {}", path.display(), e))?;
        let font = FontVec::try_from_vec(data)
            .map_err(|_| format!("Not a usable font: {}", path.display()))?;
        Ok(Self { font })
    }

    pub fn discover(explicit: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        if let Some(p) = explicit {
            return Self::load(p);
        }
        if let Ok(p) = std::env::var("BARCA_FONT") {
            return Self::load(Path::new(&p));
        }
        for p in FONT_SEARCH {
            let p = Path::new(p);
            if p.exists() {
                if let Ok(f) = Self::load(p) {
                    return Ok(f);
                }
            }
        }
        Err("No usable TTF font found; pass --font <path> or set BARCA_FONT".into())
    }

    fn width(&self, text: &str, px: f32) -> f32 {
        text_size(PxScale::from(px), &self.font, text).0 as f32
    }

    fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, px: f32, text: &str) {
        draw_text_mut(canvas, BLACK, x, y, PxScale::from(px), &self.font, text);
    }
}

/* ---------- text layout ---------- */

/// Greedy word wrap against an arbitrary width measure. A single word
/// wider than the line stays on its own line rather than vanish.
pub fn wrap_text<F: Fn(&str) -> f32>(measure: F, text: &str, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut cur = s!();
    for w in text.split_whitespace() {
        let test = if cur.is_empty() { s!(w) } else { join!(cur.as_str(), " ", w) };
        if measure(&test) <= max_width {
            cur = test;
        } else {
            if !cur.is_empty() {
                lines.push(cur);
            }
            cur = s!(w);
        }
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}

/* ---------- drawing ---------- */

fn draw_border(canvas: &mut RgbImage, x0: i32, y0: i32, w: u32, h: u32, thickness: u32) {
    for i in 0..thickness {
        let rect = Rect::at(x0 + i as i32, y0 + i as i32).of_size(w - 2 * i, h - 2 * i);
        imageproc::drawing::draw_hollow_rect_mut(canvas, rect, BLACK);
    }
}

/// Center `photo` in the box, scaling down only.
fn paste_no_upscale(canvas: &mut RgbImage, photo: &RgbImage, x0: u32, y0: u32, x1: u32, y1: u32) {
    let (bw, bh) = (x1 - x0, y1 - y0);
    let (iw, ih) = (photo.width(), photo.height());

    let scale = (bw as f64 / iw as f64).min(bh as f64 / ih as f64).min(1.0);
    let scaled;
    let photo = if scale < 1.0 {
        let nw = ((iw as f64 * scale) as u32).max(1);
        let nh = ((ih as f64 * scale) as u32).max(1);
        scaled = image::imageops::resize(photo, nw, nh, image::imageops::FilterType::Lanczos3);
        &scaled
    } else {
        photo
    };

    let px = x0 + (bw - photo.width()) / 2;
    let py = y0 + (bh - photo.height()) / 2;
    image::imageops::overlay(canvas, photo, px as i64, py as i64);
}

/// Render one card to JPEG bytes. The card always renders; a missing
/// or undecodable photo becomes an annotated empty photo box.
pub fn draw_card(
    item: &CatalogItem,
    rank: usize,
    image_bytes: Option<&[u8]>,
    image_err: Option<&str>,
    font: &CardFont,
) -> Result<Vec<u8>, Box<dyn Error>> {
    let m = MARGIN as i32;
    let mut canvas = RgbImage::from_pixel(CANVAS_W, CANVAS_H, WHITE);

    // Outer border
    draw_border(&mut canvas, 0, 0, CANVAS_W, CANVAS_H, BORDER_W);

    // Photo box
    draw_border(&mut canvas, m, m, CANVAS_W - 2 * MARGIN, PHOTO_H - MARGIN, BORDER_W);

    let mut miss_reason = image_err;
    let mut pasted = false;
    if let Some(bytes) = image_bytes {
        match image::load_from_memory(bytes) {
            Ok(photo) => {
                let pad = MARGIN + BORDER_W;
                paste_no_upscale(
                    &mut canvas,
                    &photo.to_rgb8(),
                    pad,
                    pad,
                    CANVAS_W - pad,
                    PHOTO_H - BORDER_W,
                );
                pasted = true;
            }
            Err(_) => miss_reason = miss_reason.or(Some("bad_image_bytes")),
        }
    }
    if !pasted {
        font.draw(&mut canvas, m + 30, m + 40, PX_MISSING, "IMMAGINE NON TROVATA");
        if let Some(reason) = miss_reason {
            let line = format!("({reason})");
            font.draw(&mut canvas, m + 30, m + 40 + PX_MISSING as i32 + 10, PX_MISSING, &line);
        }
    }

    // Info box
    let info_y0 = (PHOTO_H + MARGIN) as i32;
    let info_h = CANVAS_H - PHOTO_H - 2 * MARGIN;
    draw_border(&mut canvas, m, info_y0, CANVAS_W - 2 * MARGIN, info_h, INFO_BORDER_W);

    let x = m + 30;
    let mut y = info_y0 + 22;

    // Header: rank + code
    font.draw(&mut canvas, x, y, PX_HEADER, &format!("#{rank:03}   {}", item.code));
    y += 72;

    // Description, max 2 lines
    let desc = item.product.trim();
    let maxw = (CANVAS_W - 2 * MARGIN - 60) as f32;
    for line in wrap_text(|t| font.width(t, PX_DESC), desc, maxw).iter().take(2) {
        font.draw(&mut canvas, x, y, PX_DESC, line);
        y += 48;
    }
    y += 6;

    for line in info_lines(item) {
        font.draw(&mut canvas, x, y, PX_INFO, &line);
        y += 44;
    }

    let mut buf = std::io::Cursor::new(Vec::new());
    let enc = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, JPG_QUALITY);
    canvas.write_with_encoder(enc)?;
    Ok(buf.into_inner())
}

fn info_lines(item: &CatalogItem) -> Vec<String> {
    let pv = format!("{:.1}%", item.perc_vendita);
    let mut lines = vec![
        format!("FORNITORE: {}", item.supplier),
        format!("% VENDITA: {pv}"),
        format!("CONSEGNATE: {}", item.consegnate),
        format!("VENDUTE: {}", item.vendute),
        format!("GIACENZA: {}", item.giacenza),
    ];
    if let Some(t) = item.tacco_mm {
        lines.push(format!("TACCO (mm): {}", fmt_f64(t)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_chars(s: &str) -> f32 {
        s.chars().count() as f32
    }

    #[test]
    fn wrap_packs_greedily() {
        assert_eq!(wrap_text(by_chars, "aa bb cc", 5.0), vec!["aa bb", "cc"]);
    }

    #[test]
    fn wrap_keeps_overlong_word() {
        assert_eq!(
            wrap_text(by_chars, "decolletissimo T30", 10.0),
            vec!["decolletissimo", "T30"]
        );
    }

    #[test]
    fn wrap_empty_is_empty() {
        assert!(wrap_text(by_chars, "", 10.0).is_empty());
        assert!(wrap_text(by_chars, "   ", 10.0).is_empty());
    }

    #[test]
    fn info_lines_formats_kpis() {
        let lines = info_lines(&item());
        assert_eq!(lines[1], "% VENDITA: 62.5%");
        assert_eq!(lines[5], "TACCO (mm): 90");
    }

    #[test]
    fn card_renders_without_photo() {
        // Skips quietly on machines without a system font.
        let Ok(font) = CardFont::discover(None) else { return };
        let bytes = draw_card(&item(), 1, None, Some("no_direct_xl_image_found"), &font).unwrap();
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (CANVAS_W, CANVAS_H));
    }

    #[test]
    fn card_renders_with_photo_and_never_upscales() {
        let Ok(font) = CardFont::discover(None) else { return };
        let small = image::RgbImage::from_pixel(50, 50, Rgb([10, 200, 10]));
        let mut buf = std::io::Cursor::new(Vec::new());
        small.write_to(&mut buf, image::ImageFormat::Png).unwrap();

        let bytes = draw_card(&item(), 7, Some(&buf.into_inner()), None, &font).unwrap();
        let img = image::load_from_memory(&bytes).unwrap().to_rgb8();
        // the 50x50 photo lands centered in the photo box, unscaled:
        // sample its center pixel
        let cx = CANVAS_W / 2;
        let cy = (MARGIN + BORDER_W + PHOTO_H - BORDER_W) / 2;
        let p = img.get_pixel(cx, cy);
        assert!(p.0[1] > 150 && p.0[0] < 100, "expected green photo pixel, got {:?}", p);
    }

    fn item() -> CatalogItem {
        CatalogItem {
            code: s!("12/AB123"),
            product: s!("Sandalo T30 nero"),
            supplier: s!("302 IMMA S.R.L."),
            consegnate: 8,
            vendute: 5,
            giacenza: 3,
            perc_vendita: 62.5,
            tacco_mm: Some(90.0),
        }
    }
}
