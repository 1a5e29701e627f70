//! Blocking HTTP client for SKS-style keyservers (pgp.mit.edu).
//!
//! A lookup is two page loads: the exact-match index page for the address,
//! whose first link points at the key, and the key page, whose first `<pre>`
//! holds the armored key ring.

use crate::config::KeyserverConfig;
use crate::error::{KeyserverError, KeyserverResult};
use crate::scrape::{first_link, first_pre_text};
use crate::KeyDirectory;
use gpgbuddy_armor::{find_block_of_type, PUBLIC_KEY_BLOCK};
use gpgbuddy_crypto::{ensure_identity, read_public_key, SignedPublicKey};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::io::Cursor;
use std::time::Duration;
use tracing::debug;

/// HTTP client for one keyserver.
pub struct KeyserverClient {
    client: Client,
    config: KeyserverConfig,
}

impl KeyserverClient {
    pub fn new(config: KeyserverConfig) -> KeyserverResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &KeyserverConfig {
        &self.config
    }

    /// Searches the index for `email` and returns the absolute URL of the
    /// first key listed.
    pub fn search(&self, email: &str) -> KeyserverResult<String> {
        let url = format!(
            "{}/pks/lookup?search={}&op=index&exact=on",
            self.config.base_url(),
            urlencoding::encode(email)
        );
        debug!(%url, "searching keyserver");

        let page = self.get_page(&url, email)?;
        let href = first_link(&page)?.ok_or_else(|| KeyserverError::NotFound(email.to_string()))?;
        Ok(format!("{}{href}", self.config.base_url()))
    }

    /// Downloads the key page at `url` and parses the first key on it.
    ///
    /// Only URLs on this keyserver's key endpoint are fetched.
    pub fn fetch_key(&self, url: &str) -> KeyserverResult<SignedPublicKey> {
        let endpoint = format!("{}/pks/lookup?op=get", self.config.base_url());
        if !url.contains(&endpoint) {
            return Err(KeyserverError::InvalidKeyUrl(url.to_string()));
        }
        debug!(%url, "fetching key");

        let page = self.get_page(url, url)?;
        let text = first_pre_text(&page)?
            .filter(|text| !text.trim().is_empty())
            .ok_or(KeyserverError::NoKeyText)?;

        let block = find_block_of_type(&mut Cursor::new(text.as_bytes()), PUBLIC_KEY_BLOCK)?;
        Ok(read_public_key(&block.body)?)
    }

    fn get_page(&self, url: &str, subject: &str) -> KeyserverResult<String> {
        let resp = self.client.get(url).send()?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(KeyserverError::NotFound(subject.to_string()));
        }
        if !status.is_success() {
            return Err(KeyserverError::Status(status.as_u16()));
        }

        Ok(resp.text()?)
    }
}

impl KeyDirectory for KeyserverClient {
    /// Returns the first key listed for `email`, provided it carries an
    /// identity with exactly that address.
    fn lookup(&self, email: &str) -> KeyserverResult<SignedPublicKey> {
        let url = self.search(email)?;
        let key = self.fetch_key(&url)?;
        ensure_identity(&key, email)?;
        Ok(key)
    }
}
