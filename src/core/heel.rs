// src/core/heel.rs
//
// Heel height from the article description, in millimetres.
// Shop rules (description only, never the code):
// - a "Txx" token wins: T30 => 30 mm
// - otherwise the first number in the description:
//   - "6,5" reads as 6 cm 5 mm => 65 mm
//   - an integer not ending in 0 is centimetres => *10
//   - an integer ending in 0 is already millimetres

use std::sync::LazyLock;

use regex::Regex;

static T_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bT\s*(\d+(?:[.,]\d{1,2})?)\b").expect("valid regex"));
static FIRST_NUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:[.,]\d{1,2})?)").expect("valid regex"));

pub fn heel_mm(descr: &str) -> Option<f64> {
    if descr.trim().is_empty() {
        return None;
    }
    let s = descr.to_uppercase();

    let token = match T_TOKEN.captures(&s) {
        Some(c) => c.get(1)?.as_str().to_string(),
        None => FIRST_NUM.captures(&s)?.get(1)?.as_str().to_string(),
    };

    if let Some(i) = token.find(['.', ',']) {
        let cm: i64 = token[..i].parse().ok()?;
        let mm: i64 = token[i + 1..].parse().ok()?;
        return Some((cm * 10 + mm) as f64);
    }

    let n: i64 = token.parse().ok()?;
    if n % 10 != 0 {
        Some((n * 10) as f64)
    } else {
        Some(n as f64)
    }
}
