// src/catalog/item.rs
use std::error::Error;

use crate::core::heel::heel_mm;
use crate::core::num::{parse_float_lenient, parse_int_lenient};
use crate::store::Dataset;

/// One article, ready for a card.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogItem {
    pub code: String,
    pub product: String,
    pub supplier: String,
    pub consegnate: i64,
    pub vendute: i64,
    pub giacenza: i64,
    pub perc_vendita: f64,
    pub tacco_mm: Option<f64>,
}

/// Sell-through: sold over delivered, in percent. Zero deliveries
/// cannot be divided, so the KPI is 0.
pub fn perc_vendita(vendute: i64, consegnate: i64) -> f64 {
    if consegnate > 0 {
        vendute as f64 / consegnate as f64 * 100.0
    } else {
        0.0
    }
}

/// Typed items from a clean dataset. Columns are matched by name;
/// `tacco_mm` falls back to the description rules when the column is
/// absent or empty. Rows without a code are dropped.
pub fn items_from_dataset(ds: &Dataset) -> Result<Vec<CatalogItem>, Box<dyn Error>> {
    let required = ["fornitore", "code", "product", "consegnate", "vendute", "giacenza"];
    let missing: Vec<&str> = required.iter().copied().filter(|c| ds.col(c).is_none()).collect();
    if !missing.is_empty() {
        return Err(format!("Missing required columns: {}", missing.join(", ")).into());
    }

    let c_forn = ds.col("fornitore").unwrap();
    let c_code = ds.col("code").unwrap();
    let c_prod = ds.col("product").unwrap();
    let c_con = ds.col("consegnate").unwrap();
    let c_vend = ds.col("vendute").unwrap();
    let c_giac = ds.col("giacenza").unwrap();
    let c_tacco = ds.col("tacco_mm");

    let mut items = Vec::with_capacity(ds.rows.len());
    for row in &ds.rows {
        let cell = |i: usize| row.get(i).map(|s| s.trim()).unwrap_or("");

        let code = cell(c_code);
        if code.is_empty() {
            continue;
        }
        let product = cell(c_prod);

        let consegnate = parse_int_lenient(cell(c_con)).unwrap_or(0);
        let vendute = parse_int_lenient(cell(c_vend)).unwrap_or(0);
        let giacenza = parse_int_lenient(cell(c_giac)).unwrap_or(0);

        let tacco = c_tacco
            .and_then(|i| parse_float_lenient(cell(i)))
            .or_else(|| heel_mm(product));

        items.push(CatalogItem {
            code: s!(code),
            product: s!(product),
            supplier: s!(cell(c_forn)),
            consegnate,
            vendute,
            giacenza,
            perc_vendita: perc_vendita(vendute, consegnate),
            tacco_mm: tacco,
        });
    }
    Ok(items)
}
