// src/store.rs
use std::{error::Error, fs, io, path::{Path, PathBuf}};

use crate::config::consts::{CLEAN_CACHE_FILE, STORE_DIR};
use crate::core::heel::heel_mm;
use crate::core::num::fmt_f64;
use crate::csv::{parse_rows, rows_to_string};
use crate::specs::anart::ReportRow;

/// Canonical column order of the clean CSV.
pub const CLEAN_HEADERS: [&str; 12] = [
    "reparto", "categoria", "fornitore", "code", "product",
    "consegnate", "vendute", "giacenza",
    "prz_acq", "prz_vend", "valore_netto", "tacco_mm",
];

pub struct Dataset {
    pub headers: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Column index by lowercased, trimmed header name.
    pub fn col(&self, name: &str) -> Option<usize> {
        self.headers.as_ref()?.iter().position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    pub fn to_csv_string(&self) -> String {
        rows_to_string(&self.rows, &self.headers, ',')
    }
}

/// Flatten cleaned report rows into the canonical dataset, deriving
/// tacco_mm from the description on the way.
pub fn dataset_from_report(rows: &[ReportRow]) -> Dataset {
    let headers = Some(CLEAN_HEADERS.iter().map(|h| s!(*h)).collect());
    let rows = rows
        .iter()
        .map(|r| {
            vec![
                r.reparto.clone(),
                r.categoria.clone(),
                r.fornitore.clone(),
                r.code.clone(),
                r.product.clone(),
                r.consegnate.to_string(),
                r.vendute.to_string(),
                r.giacenza.to_string(),
                r.prz_acq.map(fmt_f64).unwrap_or_default(),
                r.prz_vend.map(fmt_f64).unwrap_or_default(),
                r.valore_netto.map(fmt_f64).unwrap_or_default(),
                heel_mm(&r.product).map(fmt_f64).unwrap_or_default(),
            ]
        })
        .collect();
    Dataset { headers, rows }
}

fn cache_path() -> PathBuf {
    PathBuf::from(STORE_DIR).join(CLEAN_CACHE_FILE)
}

/// Best-effort cache of the last clean run, so `catalog` can follow
/// `clean` without -i.
pub fn save_clean(ds: &Dataset) -> io::Result<PathBuf> {
    let p = cache_path();
    if let Some(parent) = p.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&p, ds.to_csv_string())?;
    Ok(p)
}

pub fn load_clean_cache() -> Result<Dataset, Box<dyn Error>> {
    let p = cache_path();
    if !p.exists() {
        return Err(format!(
            "No cached clean dataset at {}. Run `clean` first or pass -i.",
            p.display()
        )
        .into());
    }
    load_clean_path(&p)
}

/// Load any clean CSV. First row is the header; column order is free.
pub fn load_clean_path(path: &Path) -> Result<Dataset, Box<dyn Error>> {
    let data = fs::read(path)?;
    let text = crate::core::decode::decode_best_effort(&data);
    let mut rows = parse_rows(&text, ',');
    if rows.is_empty() {
        return Err(format!("Empty CSV: {}", path.display()).into());
    }
    let headers = rows.remove(0);
    Ok(Dataset { headers: Some(headers), rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> ReportRow {
        ReportRow {
            reparto: s!("CALZATURE DONNA"),
            categoria: s!("SANDALI"),
            fornitore: s!("302 IMMA S.R.L."),
            code: s!("12/AB123"),
            product: s!("SANDALO T30 NERO"),
            consegnate: 8,
            vendute: 5,
            giacenza: 3,
            prz_acq: Some(25.0),
            prz_vend: Some(59.0),
            valore_netto: None,
        }
    }

    #[test]
    fn dataset_carries_derived_heel() {
        let ds = dataset_from_report(&[row()]);
        let tacco = ds.col("tacco_mm").unwrap();
        assert_eq!(ds.rows[0][tacco], "30");
        assert_eq!(ds.rows[0][ds.col("valore_netto").unwrap()], "");
    }

    #[test]
    fn csv_string_round_trips() {
        let ds = dataset_from_report(&[row()]);
        let text = ds.to_csv_string();
        let mut parsed = parse_rows(&text, ',');
        let headers = parsed.remove(0);
        assert_eq!(headers, CLEAN_HEADERS.map(String::from).to_vec());
        assert_eq!(parsed, ds.rows);
    }

    #[test]
    fn col_lookup_is_case_insensitive() {
        let ds = Dataset {
            headers: Some(vec![s!(" Code "), s!("Product")]),
            rows: vec![],
        };
        assert_eq!(ds.col("code"), Some(0));
        assert_eq!(ds.col("product"), Some(1));
        assert_eq!(ds.col("missing"), None);
    }
}
