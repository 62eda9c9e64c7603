use crate::error::{Error, Result};
use std::borrow::Cow;
use url::Url;

pub(crate) fn parse_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| Error::malformed_url(raw, e))?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(Error::malformed_url(
                raw,
                format!("unsupported scheme {:?}", other),
            ))
        }
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(Error::malformed_url(raw, "missing host"));
    }
    Ok(url)
}

/// Split a URL into its normalized endpoint and its decoded query pairs.
///
/// The endpoint is `scheme://host[:port]/path` with scheme and host
/// lowercased, the default port (80 for http, 443 for https) dropped, and
/// query and fragment removed. Query pairs are form-decoded, so `+` is a space.
pub fn url_to_endpoint_and_queries(url: &Url) -> (String, Vec<(Cow<'_, str>, Cow<'_, str>)>) {
    // `Url` already lowercases scheme and host and forgets default ports.
    let host = url.host_str().unwrap_or("");
    let endpoint = match url.port() {
        Some(port) => format!("{}://{}:{}{}", url.scheme(), host, port, url.path()),
        None => format!("{}://{}{}", url.scheme(), host, url.path()),
    };
    (endpoint, url.query_pairs().collect())
}
