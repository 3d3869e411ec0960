//! `Link` header pagination

use reqwest::header::{HeaderMap, LINK};

/// Extract the `rel="next"` URL from a `Link` header, if any.
///
/// GitHub sends `<url>; rel="next", <url>; rel="last"`; the last page carries
/// no `next` entry.
pub fn next_page_url(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(LINK)?.to_str().ok()?;
    parse_next_link(value)
}

fn parse_next_link(value: &str) -> Option<String> {
    value.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let url = parts.next()?.trim();
        let is_next = parts.any(|param| {
            let param = param.trim();
            param == "rel=\"next\"" || param == "rel=next"
        });

        if !is_next {
            return None;
        }

        url.strip_prefix('<')
            .and_then(|u| u.strip_suffix('>'))
            .map(str::to_string)
    })
}
