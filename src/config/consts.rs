// src/config/consts.rs

// Net config
pub const MEDIA_HOST: &str = "https://www.barcastores.com";
pub const REFERER: &str = "https://www.barcastores.com/";
pub const UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                      (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const HTTP_TIMEOUT_SECS: u64 = 20;
pub const HTTP_RETRY: u32 = 2;
pub const RETRY_PAUSE_MS: u64 = 200;

// Product photo views, best first. xl_5 is the on-model shot.
pub const PREFER_XL_ORDER: [u32; 9] = [5, 2, 1, 3, 4, 6, 7, 8, 9];

// Store placeholder is a near-uniform frame; anything this flat is not a photo.
pub const PLACEHOLDER_MAX_VARIANCE: f64 = 180.0;

// Local cache
pub const STORE_DIR: &str = ".store";
pub const CLEAN_CACHE_FILE: &str = "anart_clean.csv";

// Card canvas: A6 @ 300 dpi, four per A4 sheet.
pub const CANVAS_W: u32 = 1240;
pub const CANVAS_H: u32 = 1748;
pub const PHOTO_H: u32 = 1120;
pub const MARGIN: u32 = 40;
pub const BORDER_W: u32 = 6;
pub const INFO_BORDER_W: u32 = 8;
pub const JPG_QUALITY: u8 = 95;

// Selection defaults (shop rules)
pub const DEFAULT_GIAC_MIN: i64 = 80;
pub const DEFAULT_PERC_MIN: f64 = 64.0;

// Export
pub const DEFAULT_CLEAN_FILE: &str = "anart_clean.csv";
pub const DEFAULT_ZIP_FILE: &str = "barca_catalog.zip";
pub const DEFAULT_FOLDER: &str = "BARCA";

// Concurrency
pub const WORKERS: usize = 4;
pub const REQUEST_PAUSE_MS: u64 = 50; // be polite
pub const JITTER_MS: u64 = 50; // extra 0..50 ms
