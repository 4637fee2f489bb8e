// src/core/net.rs
//
// Blocking HTTP client for the store media tree. One shared reqwest
// client, browser-like headers, short retry loop. Anything that is not
// a 200 with an image/* Content-Type counts as a miss.

use std::error::Error;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, REFERER};

use crate::config::consts::{HTTP_RETRY, HTTP_TIMEOUT_SECS, REFERER as REFERER_URL, RETRY_PAUSE_MS, UA};

pub struct Http {
    client: Client,
}

impl Http {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let client = Client::builder()
            .user_agent(UA)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }

    /// GET `url` expecting an image. Returns None on any failure after
    /// retries; the caller decides what a miss means.
    pub fn get_image_bytes(&self, url: &str) -> Option<Vec<u8>> {
        for _ in 0..=HTTP_RETRY {
            match self.try_get(url) {
                Some(bytes) if !bytes.is_empty() => return Some(bytes),
                _ => {}
            }
            thread::sleep(Duration::from_millis(RETRY_PAUSE_MS));
        }
        None
    }

    fn try_get(&self, url: &str) -> Option<Vec<u8>> {
        let resp = self
            .client
            .get(url)
            .header(ACCEPT, "image/avif,image/webp,image/apng,image/*,*/*;q=0.8")
            .header(ACCEPT_LANGUAGE, "it-IT,it;q=0.9,en;q=0.7")
            .header(REFERER, REFERER_URL)
            .send()
            .ok()?;

        if !resp.status().is_success() || !is_image_response(&resp) {
            return None;
        }
        resp.bytes().ok().map(|b| b.to_vec())
    }
}

fn is_image_response(resp: &reqwest::blocking::Response) -> bool {
    resp.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|c| c.to_ascii_lowercase().contains("image/"))
        .unwrap_or(false)
}
