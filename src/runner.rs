// src/runner.rs
use std::{error::Error, fs, path::PathBuf};

use crate::{
    catalog::layout::CardFont,
    catalog::select::select_items,
    catalog::zipgen::generate_catalog_zip,
    config::consts::{DEFAULT_CLEAN_FILE, DEFAULT_ZIP_FILE},
    config::options::{CatalogInput, CatalogOptions, CleanOptions},
    file::resolve_out_path,
    progress::Progress,
    specs::{anart, media::StoreImages},
    store::{self, Dataset},
};

/// Summary of what was produced.
pub struct RunSummary {
    pub files_written: Vec<PathBuf>,
    pub rows: usize,
    pub missing: usize,
}

/// Clean a raw ANART report: write the canonical CSV and refresh the
/// `.store` cache so a following `catalog` run needs no -i.
pub fn run_clean(
    opts: &CleanOptions,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary, Box<dyn Error>> {
    logf!("clean: reading {}", opts.input.display());
    let raw = fs::read(&opts.input)
        .map_err(|e| format!("Cannot read {}: {}", opts.input.display(), e))?;
    let report = anart::clean_report(&raw);
    let ds = store::dataset_from_report(&report);

    let out = resolve_out_path(opts.out.as_deref(), DEFAULT_CLEAN_FILE)?;
    fs::write(&out, ds.to_csv_string())?;
    if let Err(e) = store::save_clean(&ds) {
        loge!("cache refresh failed: {e}");
    }

    if let Some(p) = progress.as_deref_mut() {
        p.log(&format!("{} rows -> {}", ds.rows.len(), out.display()));
    }
    logf!("clean: {} rows -> {}", ds.rows.len(), out.display());
    Ok(RunSummary { files_written: vec![out], rows: ds.rows.len(), missing: 0 })
}

/// Build the printable catalog: select, fetch, render, pack, write.
pub fn run_catalog(
    opts: &CatalogOptions,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary, Box<dyn Error>> {
    let ds = load_input(&opts.input)?;
    let items = select_items(&ds, &opts.select)?;
    logf!("catalog: {} of {} rows selected", items.len(), ds.rows.len());
    if items.is_empty() {
        return Err("No rows match the selection thresholds".into());
    }

    let font = CardFont::discover(opts.font.as_deref())?;
    let source = StoreImages::new()?;
    let (bytes, summary) =
        generate_catalog_zip(&items, opts, &source, &font, progress.as_deref_mut())?;

    let out = resolve_out_path(opts.out.as_deref(), DEFAULT_ZIP_FILE)?;
    fs::write(&out, &bytes)?;
    logf!(
        "catalog: {} cards ({} photos, {} missing) -> {}",
        summary.cards,
        summary.with_photo,
        summary.missing.len(),
        out.display()
    );
    Ok(RunSummary {
        files_written: vec![out],
        rows: summary.cards,
        missing: summary.missing.len(),
    })
}

fn load_input(input: &CatalogInput) -> Result<Dataset, Box<dyn Error>> {
    match input {
        CatalogInput::Clean(p) => store::load_clean_path(p),
        CatalogInput::Raw(p) => {
            let raw = fs::read(p).map_err(|e| format!("Cannot read {}: {}", p.display(), e))?;
            let ds = store::dataset_from_report(&anart::clean_report(&raw));
            if let Err(e) = store::save_clean(&ds) {
                loge!("cache refresh failed: {e}");
            }
            Ok(ds)
        }
        CatalogInput::StoreCache => store::load_clean_cache(),
    }
}
