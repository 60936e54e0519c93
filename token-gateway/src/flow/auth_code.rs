//! Authorization code extraction from the inbound request

use http::HeaderMap;
use log::info;

/// Header that may carry the authorization code instead of the query string
pub(crate) const CODE_HEADER: &str = "code";

/// Returns the percent-decoded value of the first `key=value` pair in a raw query string.
///
/// Parsing is best effort and never fails: segments without `=` are skipped,
/// malformed escapes are kept literally and invalid UTF-8 becomes U+FFFD.
pub fn parse_query_param(raw: &str, key: &str) -> Option<String> {
    raw.split('&')
        .filter_map(|segment| segment.split_once('='))
        .find(|(name, _)| *name == key)
        .map(|(_, value)| decode_component(value))
}

/// Decodes a form-urlencoded value (`+` is a space)
fn decode_component(value: &str) -> String {
    let bytes = urlencoding::decode_binary(value.replace('+', " ").as_bytes()).into_owned();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Pulls the authorization code out of the request.
///
/// The `code` header wins over the `code` query parameter. The result is
/// trimmed and may be empty; an empty code is for the caller to reject.
pub fn extract_code(headers: &HeaderMap, raw_query: Option<&str>) -> String {
    let from_header = headers
        .get(CODE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let code = from_header
        .or_else(|| raw_query.and_then(|raw| parse_query_param(raw, "code")))
        .map(|code| code.trim().to_string())
        .unwrap_or_default();

    info!(
        "Received /token with code={}",
        if code.is_empty() { "<empty>" } else { "***" }
    );
    code
}
