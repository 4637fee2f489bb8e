// src/core/decode.rs
//
// The back office exports with whatever encoding the terminal was set to.
// Try UTF-8 (with or without BOM) first, then fall back to Windows-1252,
// which maps every byte so the fallback cannot fail.

const BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// 0x80..=0x9F, where cp1252 deviates from Latin-1. 0x00 marks the five
/// unassigned slots; they decode to U+FFFD.
const CP1252_HIGH: [u32; 32] = [
    0x20AC, 0x0000, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021,
    0x02C6, 0x2030, 0x0160, 0x2039, 0x0152, 0x0000, 0x017D, 0x0000,
    0x0000, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014,
    0x02DC, 0x2122, 0x0161, 0x203A, 0x0153, 0x0000, 0x017E, 0x0178,
];

pub fn decode_best_effort(data: &[u8]) -> String {
    let data = data.strip_prefix(BOM).unwrap_or(data);
    match std::str::from_utf8(data) {
        Ok(s) => s.to_string(),
        Err(_) => decode_cp1252(data),
    }
}

fn decode_cp1252(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len());
    for &b in data {
        let ch = match b {
            0x80..=0x9F => {
                let cp = CP1252_HIGH[(b - 0x80) as usize];
                if cp == 0 {
                    '\u{FFFD}'
                } else {
                    char::from_u32(cp).unwrap_or('\u{FFFD}')
                }
            }
            _ => b as char, // ASCII and Latin-1 range map 1:1
        };
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_passthrough() {
        assert_eq!(decode_best_effort("perché".as_bytes()), "perché");
    }

    #[test]
    fn strips_bom() {
        let mut data = vec![0xEF, 0xBB, 0xBF];
        data.extend_from_slice(b"ARTICOLO");
        assert_eq!(decode_best_effort(&data), "ARTICOLO");
    }

    #[test]
    fn cp1252_fallback() {
        // 0xE8 = è in cp1252/latin1, invalid as standalone UTF-8
        assert_eq!(decode_best_effort(&[b'p', 0xE8]), "pè");
        // 0x80 = € only in cp1252
        assert_eq!(decode_best_effort(&[0x80]), "€");
    }

    #[test]
    fn empty_input() {
        assert_eq!(decode_best_effort(b""), "");
    }
}
