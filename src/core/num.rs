// src/core/num.rs
//
// Number tokens in the ANART report use ',' as the decimal mark and
// sometimes '.' as a thousands separator ("1.234"). A bare "%" column
// shows up between real numbers and must not count as one.

/// Parse one report token. Returns None for anything that is not a
/// plain positive number in the export's locale.
pub fn parse_num_token(token: &str) -> Option<f64> {
    let s = token.trim();
    if s.is_empty() || s == "%" {
        return None;
    }
    if !is_num_shape(s) {
        return None;
    }

    let mut s = s.to_string();
    // '.' groups are thousands separators only when every group after
    // the first is exactly 3 digits
    if !s.contains(',') && s.contains('.') {
        let parts: Vec<&str> = s.split('.').collect();
        if parts[1..].iter().all(|p| p.len() == 3) {
            s = s.replace('.', "");
        }
    }
    let s = s.replace(',', ".");
    s.parse::<f64>().ok()
}

/// Leading digit, then only digits / '.' / ','.
fn is_num_shape(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_digit() || c == '.' || c == ',')
}

/// Lenient integer parse for clean-CSV cells ("12", "12,0", "12.0").
pub fn parse_int_lenient(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i64>()
        .ok()
        .or_else(|| s.replace(',', ".").parse::<f64>().ok().map(|f| f as i64))
}

/// Lenient float parse for clean-CSV cells (',' or '.' decimal mark).
pub fn parse_float_lenient(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.replace(',', ".").parse::<f64>().ok()
}

/// Format a float without a trailing ".0" when it is integral.
pub fn fmt_f64(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{:.0}", v)
    } else {
        format!("{}", v)
    }
}
