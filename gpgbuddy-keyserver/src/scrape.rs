//! Pulls the few values the lookup needs out of keyserver HTML pages.

use crate::error::{KeyserverError, KeyserverResult};

/// Returns the `href` of the first anchor on the page, entity-decoded.
pub fn first_link(html: &str) -> KeyserverResult<Option<String>> {
    let re = regex_lite::Regex::new(r#"(?is)<a\s[^>]*href\s*=\s*"([^"]*)""#)
        .map_err(|e| KeyserverError::Scrape(format!("Regex error: {e}")))?;

    Ok(re
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| decode_entities(m.as_str())))
}

/// Returns the text of the first `<pre>` element, with nested tags removed
/// and entities decoded.
pub fn first_pre_text(html: &str) -> KeyserverResult<Option<String>> {
    let pre = regex_lite::Regex::new(r"(?is)<pre[^>]*>(.*?)</pre>")
        .map_err(|e| KeyserverError::Scrape(format!("Regex error: {e}")))?;
    let tag = regex_lite::Regex::new(r"<[^>]+>")
        .map_err(|e| KeyserverError::Scrape(format!("Regex error: {e}")))?;

    Ok(pre
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| decode_entities(&tag.replace_all(m.as_str(), ""))))
}

/// Decodes the entities SKS pages use. `&amp;` goes last so `&amp;lt;`
/// stays `&lt;`.
fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x2F;", "/")
        .replace("&amp;", "&")
}
