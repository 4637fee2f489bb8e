// src/specs/anart.rs
//
// Parser for the 'ANALISI ARTICOLI' export (paginated report).
// Every data line repeats the literal row label ARTICOLO; after it the
// report alternates between two forms:
//   A) ARTICOLO, REPARTO, CATEGORIA, FORNITORE, N, <CODE+DESCR>, ORD, CON, VEND, VEN, GIAC, …
//   B) ARTICOLO, N, <CODE+DESCR>, ORD, CON, VEND, VEN, GIAC, …
// Form B inherits the last REPARTO/CATEGORIA/FORNITORE seen in a form A
// line. A third, rare form puts the article right after the label.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::decode::decode_best_effort;
use crate::core::num::parse_num_token;

/// One article line of the report, flattened.
/// ORD and VEN are parsed but not kept: VEN is *not* VENDUTE and the
/// order count has no downstream use.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportRow {
    pub reparto: String,
    pub categoria: String,
    pub fornitore: String,
    pub code: String,
    pub product: String,
    pub consegnate: i64,
    pub vendute: i64,
    pub giacenza: i64,
    pub prz_acq: Option<f64>,
    pub prz_vend: Option<f64>,
    pub valore_netto: Option<f64>,
}

static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\d{1,3}/[A-Z0-9]{2,}").expect("valid regex"));
static SUPPLIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bS\.?R\.?L\.?\b|\bS\.?P\.?A\.?\b").expect("valid regex"));

pub fn clean_report(data: &[u8]) -> Vec<ReportRow> {
    let text = decode_best_effort(data);

    let Some(label_idx) = find_label_index(&text) else {
        return Vec::new();
    };

    let mut last_reparto = s!();
    let mut last_categoria = s!();
    let mut last_fornitore = s!();

    let mut out = Vec::new();
    for line in balanced_lines(&text) {
        let f = quoted_fields(&line);
        if f.len() <= label_idx + 3 {
            continue;
        }
        if !f[label_idx].trim().eq_ignore_ascii_case("ARTICOLO") {
            continue;
        }

        let pos = label_idx + 1;

        let mut reparto = last_reparto.clone();
        let mut categoria = last_categoria.clone();
        let mut fornitore = last_fornitore.clone();

        // Form A: department/category/supplier present, then N, then article
        let pos_article = if f.len() > pos + 4
            && looks_like_reparto(&f[pos])
            && looks_like_reparto(&f[pos + 1])
            && looks_like_supplier(&f[pos + 2])
        {
            reparto = s!(f[pos].trim());
            categoria = s!(f[pos + 1].trim());
            fornitore = s!(f[pos + 2].trim());
            last_reparto = reparto.clone();
            last_categoria = categoria.clone();
            last_fornitore = fornitore.clone();
            Some(pos + 4)
        } else if f.len() > pos + 1 && is_digits(f[pos].trim()) && CODE_RE.is_match(f[pos + 1].trim()) {
            // Form B: N, article
            Some(pos + 1)
        } else if CODE_RE.is_match(f[pos].trim()) {
            // Form C: directly the article (rare)
            Some(pos)
        } else {
            None
        };

        let Some(pos_article) = pos_article else {
            continue;
        };
        if pos_article >= f.len() {
            continue;
        }

        let art_full = f[pos_article].trim();
        if art_full.is_empty() || art_full.to_uppercase().starts_with("TOTALI") {
            continue;
        }

        let mut parts = art_full.split_whitespace();
        let Some(code) = parts.next() else {
            continue;
        };
        if !CODE_RE.is_match(code) {
            continue;
        }
        let descr = parts.collect::<Vec<_>>().join(" ");

        // Numeric tail: ord, con, vend, ven, giac (+ prices/values if present)
        let mut nums: Vec<f64> = Vec::new();
        let mut j = pos_article + 1;
        while j < f.len() && nums.len() < 9 {
            if let Some(v) = parse_num_token(&f[j]) {
                nums.push(v);
            }
            j += 1;
        }
        if nums.len() < 5 {
            continue;
        }

        out.push(ReportRow {
            reparto,
            categoria,
            fornitore,
            code: s!(code),
            product: if descr.is_empty() { s!(art_full) } else { descr },
            consegnate: nums[1] as i64,
            vendute: nums[2] as i64,
            giacenza: nums[4] as i64,
            prz_acq: nums.get(5).copied(),
            prz_vend: nums.get(6).copied(),
            valore_netto: nums.get(8).copied(),
        });
    }

    out
}

/* ---------- line/field helpers ---------- */

/// Join physical lines until the quote count is even. The export wraps
/// long description fields across newlines.
pub fn balanced_lines(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut buf = s!();
    for line in text.lines() {
        if !buf.is_empty() {
            buf.push('\n');
        }
        buf.push_str(line);
        if buf.matches('"').count() % 2 == 0 {
            out.push(std::mem::take(&mut buf));
        }
    }
    if !buf.is_empty() {
        out.push(buf);
    }
    out
}

/// The quoted segments of a line, in order. Everything between quote
/// pairs; separators outside quotes are ignored.
pub fn quoted_fields(line: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut buf = s!();
    let mut in_quotes = false;
    for ch in line.chars() {
        match ch {
            '"' => {
                if in_quotes {
                    out.push(std::mem::take(&mut buf));
                }
                in_quotes = !in_quotes;
            }
            _ if in_quotes => buf.push(ch),
            _ => {}
        }
    }
    out
}

/// Column index of the ARTICOLO label in the first line that carries it.
fn find_label_index(text: &str) -> Option<usize> {
    for line in balanced_lines(text) {
        let f = quoted_fields(&line);
        for (i, v) in f.iter().enumerate() {
            if v.trim().eq_ignore_ascii_case("ARTICOLO") {
                return Some(i);
            }
        }
    }
    None
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn looks_like_reparto(x: &str) -> bool {
    let s = x.trim();
    !s.is_empty() && !is_digits(s) && s.chars().count() >= 4
}

// e.g. "302 IMMA S.R.L."
fn looks_like_supplier(x: &str) -> bool {
    let s = x.trim();
    SUPPLIER_RE.is_match(s) || starts_with_digits_space(s)
}

fn starts_with_digits_space(s: &str) -> bool {
    let mut seen_digit = false;
    for c in s.chars() {
        if c.is_ascii_digit() {
            seen_digit = true;
        } else {
            return seen_digit && c == ' ';
        }
    }
    false
}
