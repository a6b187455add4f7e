//! Shared URL/form parsing and response helpers for route handlers.

use crate::error::RequestError;

/// Parse URL-encoded form body into key-value pairs.
/// Handles `key=value&key2=value2` format (page bridge form bodies).
pub fn parse_form_body(body: &str) -> Vec<(String, String)> {
    if body.is_empty() {
        return Vec::new();
    }
    body.split('&')
        .filter_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next()?;
            let val = parts.next().unwrap_or("");
            Some((percent_decode(key), percent_decode(val)))
        })
        .collect()
}

/// Percent-decode a URL-encoded value. Decoded bytes are read as UTF-8 so
/// names like `Mölkky` survive the trip.
pub fn percent_decode(input: &str) -> String {
    let mut out = Vec::with_capacity(input.len());
    let mut bytes = input.bytes();
    while let Some(b) = bytes.next() {
        match b {
            b'%' => {
                let Some(hi) = bytes.next() else {
                    out.push(b'%');
                    continue;
                };
                let Some(lo) = bytes.next() else {
                    out.extend_from_slice(&[b'%', hi]);
                    continue;
                };
                let decoded = core::str::from_utf8(&[hi, lo])
                    .ok()
                    .and_then(|s| u8::from_str_radix(s, 16).ok());
                match decoded {
                    Some(val) => out.push(val),
                    None => out.extend_from_slice(&[b'%', hi, lo]),
                }
            }
            b'+' => out.push(b' '),
            _ => out.push(b),
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Parse a query string into key-value pairs.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    let q = query.strip_prefix('?').unwrap_or(query);
    parse_form_body(q)
}

/// Helper to get a value by key from a list of key-value pairs.
pub fn get_param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Like [`get_param`] but a missing or empty value is an error.
pub fn require_param<'a>(
    params: &'a [(String, String)],
    key: &'static str,
) -> Result<&'a str, RequestError> {
    match get_param(params, key) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(RequestError::MissingParam(key)),
    }
}

/// Parse a required numeric parameter.
pub fn require_number<T: std::str::FromStr>(
    params: &[(String, String)],
    key: &'static str,
) -> Result<T, RequestError> {
    require_param(params, key)?
        .trim()
        .parse()
        .map_err(|_| RequestError::InvalidParam(key))
}

/// Collapse a handler result into the response body.
pub fn respond(result: Result<String, RequestError>) -> String {
    result.unwrap_or_else(|e| {
        tracing::debug!(error = %e, "request rejected");
        e.to_json()
    })
}
