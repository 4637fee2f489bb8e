// src/catalog/zipgen.rs
//
// Packaging engine: fetch photos concurrently, render cards in rank
// order, and deliver one ZIP archive as bytes (no IO here).

use std::{
    error::Error,
    io::{Cursor, Write},
    sync::{atomic::{AtomicUsize, Ordering}, mpsc},
    thread,
    time::Duration,
};

use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

use crate::catalog::item::CatalogItem;
use crate::catalog::layout::{draw_card, CardFont};
use crate::config::consts::{JITTER_MS, REQUEST_PAUSE_MS};
use crate::config::options::CatalogOptions;
use crate::file::sanitize_code_filename;
use crate::progress::Progress;
use crate::specs::media::ImageSource;

/// What ended up in the archive.
pub struct CatalogSummary {
    pub cards: usize,
    pub with_photo: usize,
    pub missing: Vec<(String, String)>,
}

type Fetched = (Option<Vec<u8>>, Option<String>);

/// Build the full catalog archive for already-selected, already-sorted
/// items. Every item gets a card; photos that could not be found leave
/// a line in the missing report instead.
pub fn generate_catalog_zip(
    items: &[CatalogItem],
    opts: &CatalogOptions,
    source: &dyn ImageSource,
    font: &CardFont,
    mut progress: Option<&mut (dyn Progress + '_)>,
) -> Result<(Vec<u8>, CatalogSummary), Box<dyn Error>> {
    if let Some(p) = progress.as_deref_mut() {
        p.begin(items.len());
        p.log("Fetching product photos...");
    }

    let fetched = fetch_all(items, opts.workers, source, progress.as_deref_mut());

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let zopts = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut summary = CatalogSummary { cards: 0, with_photo: 0, missing: Vec::new() };

    for (i, (item, (bytes, err))) in items.iter().zip(fetched).enumerate() {
        let rank = i + 1;
        let stem = format!("{rank:03}_{}", sanitize_code_filename(&item.code));

        let card = draw_card(item, rank, bytes.as_deref(), err.as_deref(), font)?;
        zip.start_file(format!("{}/cards/{stem}.jpg", opts.folder), zopts)?;
        zip.write_all(&card)?;
        summary.cards += 1;

        if let Some(raw) = bytes {
            summary.with_photo += 1;
            if opts.include_raw {
                zip.start_file(format!("{}/_raw/{stem}.jpg", opts.folder), zopts)?;
                zip.write_all(&raw)?;
            }
        } else {
            let reason = err.unwrap_or_else(|| s!("missing"));
            summary.missing.push((item.code.clone(), reason));
        }
    }

    if !summary.missing.is_empty() {
        let report = summary
            .missing
            .iter()
            .map(|(code, reason)| join!(code.as_str(), "\t", reason))
            .collect::<Vec<_>>()
            .join("\n");
        zip.start_file(format!("{}/_missing_report.txt", opts.folder), zopts)?;
        zip.write_all(report.as_bytes())?;
    }

    let cursor = zip.finish()?;
    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    Ok((cursor.into_inner(), summary))
}

/// Fetch one photo per item over a small worker pool. Workers pull the
/// next index off a shared counter; the main thread aggregates results
/// back into rank order so the archive stays deterministic.
fn fetch_all(
    items: &[CatalogItem],
    workers: usize,
    source: &dyn ImageSource,
    mut progress: Option<&mut (dyn Progress + '_)>,
) -> Vec<Fetched> {
    let mut out: Vec<Fetched> = (0..items.len()).map(|_| (None, None)).collect();
    if items.is_empty() {
        return out;
    }

    let workers = workers.min(items.len()).max(1);
    let counter = AtomicUsize::new(0);
    let (res_tx, res_rx) = mpsc::channel::<(usize, Fetched)>();

    thread::scope(|s| {
        for _ in 0..workers {
            let tx = res_tx.clone();
            let counter = &counter;
            s.spawn(move || {
                loop {
                    let i = counter.fetch_add(1, Ordering::Relaxed);
                    if i >= items.len() {
                        break;
                    }
                    let result = source.fetch(&items[i].code);
                    let _ = tx.send((i, result));
                    // be polite, and stagger the workers a little
                    let pause = REQUEST_PAUSE_MS + (i as u64 * 13) % JITTER_MS;
                    thread::sleep(Duration::from_millis(pause));
                }
            });
        }
        drop(res_tx); // main thread is sole receiver now

        for _ in 0..items.len() {
            match res_rx.recv() {
                Ok((i, fetched)) => {
                    if let Some(p) = progress.as_deref_mut() {
                        match &fetched {
                            (Some(_), _) => p.item_done(&items[i].code),
                            (None, reason) => p.item_missed(
                                &items[i].code,
                                reason.as_deref().unwrap_or("unknown"),
                            ),
                        }
                    }
                    out[i] = fetched;
                }
                Err(_) => break, // workers ended early; bail gracefully
            }
        }
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::options::CatalogOptions;
    use crate::specs::media::ImageSource;

    struct StubSource;
    impl ImageSource for StubSource {
        fn fetch(&self, code: &str) -> (Option<Vec<u8>>, Option<String>) {
            if code.contains("MISS") {
                (None, Some(s!("no_direct_xl_image_found")))
            } else {
                let img = image::RgbImage::from_pixel(60, 60, image::Rgb([40, 80, 120]));
                let mut buf = Cursor::new(Vec::new());
                img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
                (Some(buf.into_inner()), None)
            }
        }
    }

    fn item(code: &str) -> CatalogItem {
        CatalogItem {
            code: s!(code),
            product: s!("SANDALO T30"),
            supplier: s!("IMMA S.R.L."),
            consegnate: 100,
            vendute: 90,
            giacenza: 95,
            perc_vendita: 90.0,
            tacco_mm: Some(30.0),
        }
    }

    #[test]
    fn fetch_all_preserves_rank_order() {
        let items = vec![item("1/AA"), item("1/MISS"), item("1/CC")];
        let fetched = fetch_all(&items, 3, &StubSource, None);
        assert!(fetched[0].0.is_some());
        assert!(fetched[1].0.is_none());
        assert_eq!(fetched[1].1.as_deref(), Some("no_direct_xl_image_found"));
        assert!(fetched[2].0.is_some());
    }

    #[test]
    fn archive_holds_cards_and_missing_report() {
        let Ok(font) = CardFont::discover(None) else { return };
        let items = vec![item("12/AB123"), item("12/MISS")];
        let opts = CatalogOptions { include_raw: true, ..CatalogOptions::default() };

        let (bytes, summary) =
            generate_catalog_zip(&items, &opts, &StubSource, &font, None).unwrap();
        assert_eq!(summary.cards, 2);
        assert_eq!(summary.with_photo, 1);
        assert_eq!(summary.missing, vec![(s!("12/MISS"), s!("no_direct_xl_image_found"))]);

        let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<String> = (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_owned())
            .collect();
        assert!(names.contains(&s!("BARCA/cards/001_12_AB123.jpg")));
        assert!(names.contains(&s!("BARCA/cards/002_12_MISS.jpg")));
        // raw photo only where a photo was actually fetched
        assert!(names.contains(&s!("BARCA/_raw/001_12_AB123.jpg")));
        assert!(!names.contains(&s!("BARCA/_raw/002_12_MISS.jpg")));
        assert!(names.contains(&s!("BARCA/_missing_report.txt")));
    }
}
