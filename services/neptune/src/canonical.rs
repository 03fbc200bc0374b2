use crate::constants::FORM_URLENCODE_SET;
use crate::request::SigningRequest;
use graphsign_core::hash::hex_sha256;
use graphsign_core::time::{format_date, format_iso8601, DateTime};
use graphsign_core::{Error, Result};
use http::Method;
use percent_encoding::utf8_percent_encode;
use serde_json::Value;

/// The canonical form of a request, the input to signature computation.
#[derive(Debug)]
pub(crate) struct CanonicalRequest {
    /// Fixed URI path resolved from the action table.
    pub canonical_uri: &'static str,
    /// The url-encoded payload, before query-string normalization.
    pub request_parameters: String,
    /// Compact ISO 8601 timestamp: `20220313T072004Z`.
    pub amz_date: String,
    /// Date stamp bound into the credential scope: `20220313`.
    pub date_stamp: String,
    /// The canonical request string to be hashed and signed.
    pub text: String,
}

/// Build the canonical request for the given signing request at `now`.
pub(crate) fn build_canonical_request(
    req: &SigningRequest,
    now: DateTime,
) -> Result<CanonicalRequest> {
    let canonical_uri = req.action.canonical_uri();
    let request_parameters = if req.action.signs_payload() {
        form_urlencode(&req.payload)?
    } else {
        String::new()
    };

    let amz_date = format_iso8601(now);
    let date_stamp = format_date(now);

    // GET and DELETE carry the payload in the query string and sign an empty
    // body; POST signs the payload as the body and an empty query string.
    let (canonical_querystring, payload_hash) =
        if req.method == Method::GET || req.method == Method::DELETE {
            (normalize_query_string(&request_parameters), hex_sha256(b""))
        } else if req.method == Method::POST {
            (String::new(), hex_sha256(request_parameters.as_bytes()))
        } else {
            return Err(Error::unsupported_method(format!(
                "cannot sign requests with method {}",
                req.method
            )));
        };

    let canonical_headers = format!("host:{}:{}\nx-amz-date:{}\n", req.host, req.port, amz_date);

    let text = format!(
        "{}\n{}\n{}\n{}\nhost;x-amz-date\n{}",
        req.method, canonical_uri, canonical_querystring, canonical_headers, payload_hash
    );

    Ok(CanonicalRequest {
        canonical_uri,
        request_parameters,
        amz_date,
        date_stamp,
        text,
    })
}

/// Normalize an url-encoded query string for signing.
///
/// Pairs are split on `&`, whitespace-trimmed, a missing `=value` defaults
/// to the empty string, and the result is re-joined sorted lexicographically
/// by the full `key=value` string.
pub(crate) fn normalize_query_string(query: &str) -> String {
    let mut pairs: Vec<String> = query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|s| match s.split_once('=') {
            Some((k, v)) => format!("{}={}", k.trim(), v.trim()),
            None => format!("{}=", s.trim()),
        })
        .collect();
    pairs.sort_unstable();
    pairs.join("&")
}

/// Url-encode a payload mapping as a form string, `quote`-style: space
/// becomes `%20` (never `+`) and `/` is left unencoded.
fn form_urlencode(payload: &Value) -> Result<String> {
    let map = match payload {
        Value::Null => return Ok(String::new()),
        Value::String(s) if s.is_empty() => return Ok(String::new()),
        Value::Object(map) => map,
        other => {
            return Err(Error::malformed_query_payload(format!(
                "payload must be a mapping or empty, got {}",
                type_name(other)
            )))
        }
    };

    let mut encoded = String::new();
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 {
            encoded.push('&');
        }
        encoded.push_str(&quote(key));
        encoded.push('=');
        encoded.push_str(&quote(&leaf_to_string(key, value)?));
    }

    // Encoded single quotes are rewritten as encoded double quotes before
    // signing; downstream signature verification expects this exact byte
    // sequence.
    Ok(encoded.replace("%27", "%22"))
}

fn quote(s: &str) -> String {
    utf8_percent_encode(s, &FORM_URLENCODE_SET).to_string()
}

fn leaf_to_string(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(Error::malformed_query_payload(format!(
            "value for key {key:?} cannot be url-encoded: unsupported type {}",
            type_name(other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
