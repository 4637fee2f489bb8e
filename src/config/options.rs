// src/config/options.rs
use std::path::PathBuf;

use super::consts::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    PercVendita,
    Giacenza,
    Consegnate,
    Vendute,
    TaccoMm,
}

impl SortField {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "perc" | "perc_vendita" => Some(SortField::PercVendita),
            "giac" | "giacenza" => Some(SortField::Giacenza),
            "con" | "consegnate" => Some(SortField::Consegnate),
            "vend" | "vendute" => Some(SortField::Vendute),
            "tacco" | "tacco_mm" => Some(SortField::TaccoMm),
            _ => None,
        }
    }
}

/// Which rows make it onto a card, and in what order.
#[derive(Clone, Debug)]
pub struct SelectOptions {
    pub giac_min: i64,
    pub perc_min: f64,
    pub reparto: Option<String>,
    pub categoria: Option<String>,
    pub fornitore: Option<String>,
    pub sort: SortField,
    pub ascending: bool,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            giac_min: DEFAULT_GIAC_MIN,
            perc_min: DEFAULT_PERC_MIN,
            reparto: None,
            categoria: None,
            fornitore: None,
            sort: SortField::PercVendita,
            ascending: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CleanOptions {
    pub input: PathBuf,
    pub out: Option<PathBuf>,
}

/// Where the catalog rows come from.
#[derive(Clone, Debug)]
pub enum CatalogInput {
    /// Already-clean CSV (any column order, headers matched by name).
    Clean(PathBuf),
    /// Raw ANART report; cleaned in-memory first.
    Raw(PathBuf),
    /// Whatever the last `clean` run left in `.store/`.
    StoreCache,
}

#[derive(Clone, Debug)]
pub struct CatalogOptions {
    pub input: CatalogInput,
    pub out: Option<PathBuf>,
    pub folder: String,
    pub select: SelectOptions,
    /// Also pack the untouched downloads under `_raw/`.
    pub include_raw: bool,
    pub workers: usize,
    pub font: Option<PathBuf>,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            input: CatalogInput::StoreCache,
            out: None,
            folder: s!(DEFAULT_FOLDER),
            select: SelectOptions::default(),
            include_raw: true,
            workers: WORKERS,
            font: None,
        }
    }
}
