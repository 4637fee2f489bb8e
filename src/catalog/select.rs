// src/catalog/select.rs
//
// Shop selection rules: keep well-stocked articles that actually sell,
// then order them for the printed catalog.

use std::cmp::Ordering;
use std::error::Error;

use crate::config::options::{SelectOptions, SortField};
use crate::catalog::item::{items_from_dataset, CatalogItem};
use crate::store::Dataset;

/// Full selection pipeline: optional exact-match column filters on the
/// dataset, then typed items, then KPI thresholds and sorting.
pub fn select_items(ds: &Dataset, opts: &SelectOptions) -> Result<Vec<CatalogItem>, Box<dyn Error>> {
    let filtered = filter_dataset(ds, opts);
    let mut items = items_from_dataset(&filtered)?;
    items.retain(|it| it.giacenza > opts.giac_min && it.perc_vendita > opts.perc_min);
    sort_items(&mut items, opts.sort, opts.ascending);
    Ok(items)
}

/// Exact-match filters on reparto / categoria / fornitore. A filter on
/// a column the CSV does not have simply matches nothing.
fn filter_dataset(ds: &Dataset, opts: &SelectOptions) -> Dataset {
    let wanted = [
        ("reparto", opts.reparto.as_deref()),
        ("categoria", opts.categoria.as_deref()),
        ("fornitore", opts.fornitore.as_deref()),
    ];

    let mut rows = ds.rows.clone();
    for (col, want) in wanted {
        let Some(want) = want else { continue };
        match ds.col(col) {
            Some(i) => rows.retain(|r| r.get(i).map(|v| v.trim() == want).unwrap_or(false)),
            None => rows.clear(),
        }
    }
    Dataset { headers: ds.headers.clone(), rows }
}

pub fn sort_items(items: &mut [CatalogItem], field: SortField, ascending: bool) {
    items.sort_by(|a, b| {
        let ord = match field {
            SortField::PercVendita => f64_cmp(a.perc_vendita, b.perc_vendita),
            SortField::Giacenza => a.giacenza.cmp(&b.giacenza),
            SortField::Consegnate => a.consegnate.cmp(&b.consegnate),
            SortField::Vendute => a.vendute.cmp(&b.vendute),
            // missing heels always sink to the end, whatever the order
            SortField::TaccoMm => match (a.tacco_mm, b.tacco_mm) {
                (Some(x), Some(y)) => f64_cmp(x, y),
                (Some(_), None) => return Ordering::Less,
                (None, Some(_)) => return Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        };
        if ascending { ord } else { ord.reverse() }
    });
}

fn f64_cmp(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::options::SelectOptions;

    fn ds(rows: Vec<Vec<&str>>) -> Dataset {
        Dataset {
            headers: Some(
                ["reparto", "fornitore", "code", "product", "consegnate", "vendute", "giacenza"]
                    .iter()
                    .map(|h| s!(*h))
                    .collect(),
            ),
            rows: rows.into_iter().map(|r| r.into_iter().map(String::from).collect()).collect(),
        }
    }

    fn opts() -> SelectOptions {
        SelectOptions {
            giac_min: 80,
            perc_min: 64.0,
            ..SelectOptions::default()
        }
    }

    #[test]
    fn thresholds_are_strict() {
        let d = ds(vec![
            // giacenza 81, perc 80 -> kept
            vec!["DONNA", "IMMA", "1/AA", "SANDALO T30", "100", "80", "81"],
            // giacenza exactly 80 -> dropped
            vec!["DONNA", "IMMA", "1/BB", "SANDALO T40", "100", "80", "80"],
            // perc exactly 64 -> dropped
            vec!["DONNA", "IMMA", "1/CC", "SANDALO T50", "100", "64", "90"],
        ]);
        let items = select_items(&d, &opts()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].code, "1/AA");
    }

    #[test]
    fn supplier_filter_is_exact() {
        let d = ds(vec![
            vec!["DONNA", "IMMA", "1/AA", "T30", "100", "90", "100"],
            vec!["DONNA", "TSAKIRIS", "1/BB", "T40", "100", "90", "100"],
        ]);
        let mut o = opts();
        o.fornitore = Some(s!("TSAKIRIS"));
        let items = select_items(&d, &o).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].code, "1/BB");
    }

    #[test]
    fn filter_on_absent_column_matches_nothing() {
        let d = ds(vec![vec!["DONNA", "IMMA", "1/AA", "T30", "100", "90", "100"]]);
        let mut o = opts();
        o.categoria = Some(s!("SANDALI"));
        assert!(select_items(&d, &o).unwrap().is_empty());
    }

    #[test]
    fn default_sort_is_perc_descending() {
        let d = ds(vec![
            vec!["DONNA", "IMMA", "1/AA", "T30", "100", "70", "100"],
            vec!["DONNA", "IMMA", "1/BB", "T40", "100", "90", "100"],
        ]);
        let items = select_items(&d, &opts()).unwrap();
        assert_eq!(items[0].code, "1/BB");
        assert_eq!(items[1].code, "1/AA");
    }

    #[test]
    fn tacco_sort_sinks_missing_heels() {
        let mut items = vec![
            item("A", Some(30.0)),
            item("B", None),
            item("C", Some(90.0)),
        ];
        sort_items(&mut items, SortField::TaccoMm, false);
        assert_eq!(codes(&items), ["C", "A", "B"]);
        sort_items(&mut items, SortField::TaccoMm, true);
        assert_eq!(codes(&items), ["A", "C", "B"]);
    }

    fn item(code: &str, tacco: Option<f64>) -> CatalogItem {
        CatalogItem {
            code: s!(code),
            product: s!(),
            supplier: s!(),
            consegnate: 1,
            vendute: 1,
            giacenza: 1,
            perc_vendita: 100.0,
            tacco_mm: tacco,
        }
    }

    fn codes(items: &[CatalogItem]) -> Vec<&str> {
        items.iter().map(|i| i.code.as_str()).collect()
    }
}
